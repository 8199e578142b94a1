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

//! Sorts receiver notifications into the PVT slot and the NMEA queue.
//! Runs on the notification thread and must never wait on the consumer.

use super::Notifier;
use crate::receiver::pvt::{NmeaRecord, NMEA_SENTENCE_MAX_LEN};
use crate::receiver::{Receiver, ReceiverEvent};

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum DropReason {
    ReadFailed,
    AllocationFailed,
    QueueFull,
}

/// What became of a single notification
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Classified {
    PvtReady,
    NmeaQueued,
    Dropped(DropReason),
    Ignored,
}

pub struct Classifier {
    notifier: Notifier,
}

impl Classifier {
    pub fn new(notifier: Notifier) -> Self {
        Self { notifier }
    }

    /// Handle notification `e`, reading its payload back from `r`
    pub fn on_event(&self, e: ReceiverEvent, r: &mut dyn Receiver) -> Classified {
        match e {
            ReceiverEvent::Pvt => match r.read_pvt() {
                Ok(pvt) => {
                    self.notifier.offer_pvt(pvt);
                    Classified::PvtReady
                }
                Err(e) => {
                    warn!("unable to read PVT, dropping: {}", e);
                    Classified::Dropped(DropReason::ReadFailed)
                }
            },
            ReceiverEvent::Nmea => self.on_nmea(r),
            ReceiverEvent::Other(code) => {
                trace!("ignoring receiver event {}", code);
                Classified::Ignored
            }
        }
    }

    fn on_nmea(&self, r: &mut dyn Receiver) -> Classified {
        let mut buf: Vec<u8> = Vec::new();
        if let Err(e) = buf.try_reserve_exact(NMEA_SENTENCE_MAX_LEN) {
            warn!("unable to allocate NMEA buffer, dropping: {}", e);
            return Classified::Dropped(DropReason::AllocationFailed);
        }

        if let Err(e) = r.read_nmea(&mut buf) {
            warn!("unable to read NMEA, dropping: {}", e);
            return Classified::Dropped(DropReason::ReadFailed);
        }

        match self.notifier.offer_nmea(NmeaRecord::new(buf)) {
            Ok(()) => Classified::NmeaQueued,
            Err(_) => {
                warn!("NMEA queue is full, dropping sentence");
                Classified::Dropped(DropReason::QueueFull)
            }
        }
    }

    /// Tell the consumer that this receiver is done
    pub fn close(&self) {
        self.notifier.close();
    }
}
