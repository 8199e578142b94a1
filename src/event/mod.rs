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

//! Hand-off between the receiver's notification thread and the
//! acquisition loop.
//!
//! PVT frames go through a single slot where a newer frame replaces an
//! unread one. NMEA sentences go through a bounded FIFO that refuses new
//! records when full. Both share one condition variable so the consumer
//! has exactly one place to block.

pub mod classifier;

use crate::receiver::pvt::{NmeaRecord, PvtSnapshot};
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Default depth of the NMEA queue
pub const NMEA_QUEUE_CAPACITY: usize = 10;

struct Pending {
    pvt: Option<PvtSnapshot>,
    nmea: VecDeque<NmeaRecord>,
    capacity: usize,
    closed: bool,
}

struct Shared {
    pending: Mutex<Pending>,
    ready: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<Pending> {
        // state stays consistent even if a holder panicked, every
        // critical section is a single field update
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Whatever became available since the last wakeup
#[derive(Debug, Default)]
pub struct Ready {
    pub pvt: Option<PvtSnapshot>,
    pub nmea: Option<NmeaRecord>,
}

/// Producer half, used from the notification thread
#[derive(Clone)]
pub struct Notifier {
    shared: Arc<Shared>,
}

/// Consumer half, owned by the acquisition loop
pub struct Waiter {
    shared: Arc<Shared>,
}

/// Create a connected `Notifier`/`Waiter` pair whose NMEA queue holds at
/// most `nmea_capacity` records
pub fn channel(nmea_capacity: usize) -> (Notifier, Waiter) {
    let shared = Arc::new(Shared {
        pending: Mutex::new(Pending {
            pvt: None,
            nmea: VecDeque::with_capacity(nmea_capacity),
            capacity: nmea_capacity,
            closed: false,
        }),
        ready: Condvar::new(),
    });

    (
        Notifier {
            shared: shared.clone(),
        },
        Waiter { shared },
    )
}

impl Notifier {
    /// Publish `pvt` as the latest frame, replacing any unread one
    pub fn offer_pvt(&self, pvt: PvtSnapshot) {
        {
            let mut p = self.shared.lock();
            if p.pvt.replace(pvt).is_some() {
                debug!("unread PVT superseded");
            }
        }

        self.shared.ready.notify_one();
    }

    /// Queue `r` without waiting. A full queue hands the record back
    /// untouched and keeps the ones already queued.
    pub fn offer_nmea(&self, r: NmeaRecord) -> Result<(), NmeaRecord> {
        {
            let mut p = self.shared.lock();
            if p.nmea.len() >= p.capacity {
                return Err(r);
            }

            p.nmea.push_back(r);
        }

        self.shared.ready.notify_one();
        Ok(())
    }

    /// No more events will be offered. The waiter still receives
    /// whatever is pending.
    pub fn close(&self) {
        self.shared.lock().closed = true;
        self.shared.ready.notify_one();
    }
}

impl Waiter {
    /// Block until a PVT frame or an NMEA record is available and take
    /// them: the PVT slot and at most one NMEA record. Returns `None` once
    /// the port is closed and drained.
    pub fn wait(&self) -> Option<Ready> {
        let mut p = self.shared.lock();

        loop {
            if p.pvt.is_some() || !p.nmea.is_empty() {
                return Some(Ready {
                    pvt: p.pvt.take(),
                    nmea: p.nmea.pop_front(),
                });
            }

            if p.closed {
                return None;
            }

            p = self
                .shared
                .ready
                .wait(p)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Number of NMEA records queued but not yet taken
    pub fn pending_nmea(&self) -> usize {
        self.shared.lock().nmea.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receiver::pvt::tests::snapshot;
    use std::thread;
    use std::time::Duration;

    fn record(i: u8) -> NmeaRecord {
        NmeaRecord::new(vec![b'$', i])
    }

    #[test]
    fn test_pvt_supersedes_unread() {
        let (n, w) = channel(NMEA_QUEUE_CAPACITY);

        let mut first = snapshot(0, vec![]);
        first.latitude = 1.0;
        let mut second = snapshot(0, vec![]);
        second.latitude = 2.0;

        n.offer_pvt(first);
        n.offer_pvt(second.clone());

        let r = w.wait().unwrap();
        assert_eq!(r.pvt, Some(second));
        assert!(r.nmea.is_none());

        n.close();
        assert!(w.wait().is_none());
    }

    #[test]
    fn test_nmea_queue_drops_newest_when_full() {
        let (n, w) = channel(NMEA_QUEUE_CAPACITY);

        for i in 0..10 {
            assert!(n.offer_nmea(record(i)).is_ok());
        }

        assert_eq!(n.offer_nmea(record(10)), Err(record(10)));
        assert_eq!(w.pending_nmea(), 10);

        // existing entries survive, in order
        for i in 0..10 {
            assert_eq!(w.wait().unwrap().nmea, Some(record(i)));
        }
        assert_eq!(w.pending_nmea(), 0);
    }

    #[test]
    fn test_one_nmea_per_wakeup_alongside_pvt() {
        let (n, w) = channel(NMEA_QUEUE_CAPACITY);

        n.offer_nmea(record(1)).unwrap();
        n.offer_nmea(record(2)).unwrap();
        n.offer_pvt(snapshot(0, vec![]));

        let r = w.wait().unwrap();
        assert!(r.pvt.is_some());
        assert_eq!(r.nmea, Some(record(1)));

        let r = w.wait().unwrap();
        assert!(r.pvt.is_none());
        assert_eq!(r.nmea, Some(record(2)));
    }

    #[test]
    fn test_close_delivers_pending_first() {
        let (n, w) = channel(NMEA_QUEUE_CAPACITY);

        n.offer_nmea(record(1)).unwrap();
        n.close();

        assert_eq!(w.wait().unwrap().nmea, Some(record(1)));
        assert!(w.wait().is_none());
    }

    #[test]
    fn test_wait_blocks_until_offered() {
        let (n, w) = channel(NMEA_QUEUE_CAPACITY);

        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            n.offer_pvt(snapshot(1, vec![]));
            n.close();
        });

        let r = w.wait().unwrap();
        assert!(r.pvt.unwrap().fix_valid());
        assert!(w.wait().is_none());

        producer.join().unwrap();
    }
}
