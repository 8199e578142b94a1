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

pub mod handle;

use self::handle::BasicHandle;
use crate::display::DisplayTracker;
use crate::error::Error;
use crate::event::classifier::Classifier;
use crate::event::{Notifier, Waiter};
use crate::receiver::{self, Receiver};
use std::io::Write;
use std::thread::JoinHandle;

pub struct Monitor<W: Write> {
    tracker: DisplayTracker<W>,
    waiter: Waiter,
    notifier: Notifier,
    receiver: Option<JoinHandle<()>>,
    handle: BasicHandle,
}

impl<W: Write> Monitor<W> {
    pub fn new(tracker: DisplayTracker<W>, waiter: Waiter, notifier: Notifier) -> Self {
        Monitor {
            tracker,
            waiter,
            notifier,
            receiver: None,
            handle: BasicHandle::new(),
        }
    }

    /// Register the classifier as the only consumer of `r`'s notifications
    pub fn link_receiver(&mut self, r: Box<dyn Receiver>) -> Result<(), Error> {
        if self.receiver.is_some() {
            return Err(Error::ReceiverAlreadyLinked);
        }

        let c = Classifier::new(self.notifier.clone());
        self.receiver = Some(receiver::spawn_notifier(r, c));
        debug!("spawned receiver notification thread");

        Ok(())
    }

    /// Wait for receiver events and keep the panel current. Only returns
    /// once the linked receiver has closed and every pending event has
    /// been rendered.
    pub fn run_forever(&mut self) {
        // main event loop
        while let Some(ready) = self.waiter.wait() {
            trace!(
                "wakeup: pvt={} nmea={} queued={}",
                ready.pvt.is_some(),
                ready.nmea.is_some(),
                self.waiter.pending_nmea()
            );

            // update the handle
            self.handle = BasicHandle::new();

            if let Err(e) = self.tracker.render_next(&self.handle, ready) {
                warn!("unable to update terminal: {}", e);
            }
        }

        info!("event source closed");

        if let Some(p) = self.tracker.current() {
            debug!(
                "last frame had fix: {}, searching renders: {}",
                p.fix_valid(),
                self.tracker.session().search_counter
            );
        }

        if let Some(h) = self.receiver.take() {
            if h.join().is_err() {
                error!("receiver notification thread panicked");
            }
        }
    }

    #[cfg(test)]
    pub fn tracker(&self) -> &DisplayTracker<W> {
        &self.tracker
    }
}
