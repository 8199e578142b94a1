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

pub mod fake;
pub mod pvt;
pub mod replay;

use crate::error::ReadError;
use crate::event::classifier::Classifier;
use self::pvt::PvtSnapshot;
use std::thread::{spawn, JoinHandle};

/// Notifications raised by the receiver
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum ReceiverEvent {
    /// A new PVT frame can be read
    Pvt,
    /// A new NMEA sentence can be read
    Nmea,
    /// Anything else the receiver reports, by raw event code
    Other(i32),
}

/// A type for representing a GNSS receiver
pub trait Receiver: Send {
    /// Block until the receiver raises its next notification,
    /// `None` once the receiver will never notify again
    fn next_event(&mut self) -> Option<ReceiverEvent>;

    /// Read the PVT frame announced by the latest `ReceiverEvent::Pvt`
    fn read_pvt(&mut self) -> Result<PvtSnapshot, ReadError>;

    /// Read the sentence announced by the latest `ReceiverEvent::Nmea`
    /// into `buf`, which the caller has already reserved
    fn read_nmea(&mut self, buf: &mut Vec<u8>) -> Result<(), ReadError>;
}

/// Spawn the notification thread for `r`. Every notification is handed to
/// `c`, the only consumer, and the event port is closed once `r` runs dry.
pub fn spawn_notifier(mut r: Box<dyn Receiver>, c: Classifier) -> JoinHandle<()> {
    spawn(move || {
        while let Some(e) = r.next_event() {
            trace!("receiver raised {:?}", e);
            c.on_event(e, r.as_mut());
        }

        info!("receiver has no more events");
        c.close();
    })
}
