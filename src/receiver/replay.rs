// Fixwatch - a GNSS fix acquisition monitor
// Copyright (C) 2017-2018  Datong Sun (dndx@idndx.com)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Replays a recorded session from a JSON-lines file, one notification
//! per line:
//!
//! ```text
//! {"pvt": {"latitude": 59.3293, ..., "flags": 1}}
//! {"nmea": "$GPGGA,..."}
//! ```

use super::pvt::PvtSnapshot;
use super::{Receiver, ReceiverEvent};
use crate::error::{Error, ReadError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::thread;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Line {
    Pvt(PvtSnapshot),
    Nmea(String),
}

pub struct ReplayReceiver {
    reader: Box<dyn BufRead + Send>,
    interval: Duration,
    line_no: usize,
    pvt: Option<Result<PvtSnapshot, String>>,
    nmea: Option<String>,
}

impl ReplayReceiver {
    pub fn open<P: AsRef<Path>>(path: P, interval: Duration) -> Result<Self, Error> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|source| Error::Replay {
            path: path.to_path_buf(),
            source,
        })?;

        info!("replaying receiver session from {:?}", path);
        Ok(Self::from_reader(BufReader::new(f), interval))
    }

    pub fn from_reader<R: BufRead + Send + 'static>(reader: R, interval: Duration) -> Self {
        Self {
            reader: Box::new(reader),
            interval,
            line_no: 0,
            pvt: None,
            nmea: None,
        }
    }

    fn pace(&self) {
        if self.interval > Duration::from_millis(0) {
            thread::sleep(self.interval);
        }
    }
}

impl Receiver for ReplayReceiver {
    fn next_event(&mut self) -> Option<ReceiverEvent> {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => return None,
                Ok(_) => self.line_no += 1,
                Err(e) => {
                    warn!("replay read error after line {}: {}", self.line_no, e);
                    return None;
                }
            }

            if !buf.iter().all(u8::is_ascii_whitespace) {
                break;
            }
        }

        // bad UTF-8 is rejected here too, like any other malformed line
        match serde_json::from_slice::<Line>(&buf) {
            Ok(Line::Pvt(p)) => {
                self.pace();
                self.pvt = Some(Ok(p));
                Some(ReceiverEvent::Pvt)
            }
            Ok(Line::Nmea(s)) => {
                self.nmea = Some(s);
                Some(ReceiverEvent::Nmea)
            }
            Err(e) => {
                // surfaces as a failed PVT read so the frame is dropped
                self.pace();
                self.pvt = Some(Err(format!("line {}: {}", self.line_no, e)));
                Some(ReceiverEvent::Pvt)
            }
        }
    }

    fn read_pvt(&mut self) -> Result<PvtSnapshot, ReadError> {
        match self.pvt.take() {
            Some(Ok(p)) => Ok(p),
            Some(Err(e)) => Err(ReadError::Malformed(e)),
            None => Err(ReadError::NotAvailable),
        }
    }

    fn read_nmea(&mut self, buf: &mut Vec<u8>) -> Result<(), ReadError> {
        let s = self.nmea.take().ok_or(ReadError::NotAvailable)?;
        buf.extend_from_slice(s.as_bytes());
        Ok(())
    }
}
