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

//! A simulated receiver: searches for a while, then reports a steady fix.

use super::pvt::{PvtFlags, PvtSnapshot, SatelliteInfo};
use super::{Receiver, ReceiverEvent};
use crate::config::FakeConfig;
use crate::error::ReadError;
use chrono::Utc;
use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

const CHANNELS: u16 = 12;

/// One notification together with the payload it announces
#[derive(Debug, Clone)]
pub enum Step {
    Pvt(PvtSnapshot),
    Nmea(String),
    #[cfg(test)]
    Other(i32),
}

pub struct FakeReceiver {
    steps: VecDeque<Step>,
    simulation: Option<Simulation>,
    interval: Duration,
    pvt: Option<PvtSnapshot>,
    nmea: Option<String>,
}

struct Simulation {
    cfg: FakeConfig,
    cycle: u32,
    /// Stop after this many PVT frames, never when `None`
    limit: Option<u32>,
}

impl FakeReceiver {
    /// Simulated receiver driven by `cfg`, producing PVT frames every
    /// `cfg.interval_ms` until `limit` frames have been emitted
    pub fn new(cfg: FakeConfig, limit: Option<u32>) -> Self {
        Self {
            steps: VecDeque::new(),
            interval: Duration::from_millis(cfg.interval_ms),
            simulation: Some(Simulation {
                cfg,
                cycle: 0,
                limit,
            }),
            pvt: None,
            nmea: None,
        }
    }

    /// Receiver that plays back exactly `steps`, without pacing
    #[cfg(test)]
    pub fn scripted(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            simulation: None,
            interval: Duration::from_millis(0),
            pvt: None,
            nmea: None,
        }
    }

    fn refill(&mut self) {
        let sim = match self.simulation {
            Some(ref mut s) => s,
            None => return,
        };

        if sim.limit.map_or(false, |l| sim.cycle >= l) {
            return;
        }

        let pvt = sim.frame();
        let gga = gga(&pvt);
        sim.cycle += 1;

        self.steps.push_back(Step::Pvt(pvt));
        self.steps.push_back(Step::Nmea(gga));
    }
}

impl Simulation {
    fn frame(&self) -> PvtSnapshot {
        let fixed = self.cycle >= self.cfg.search_cycles;
        // more satellites show up while searching
        let tracked = self.cycle.saturating_add(1).min(u32::from(CHANNELS)) as u16;
        let used = if fixed { tracked.min(8) } else { 0 };

        let satellites = (1..=CHANNELS)
            .map(|i| SatelliteInfo {
                sv: if i <= tracked { i * 2 + 1 } else { 0 },
                used_in_fix: i <= used,
                unhealthy: i == 5 && i <= tracked,
            })
            .collect();

        let mut flags = PvtFlags::default();
        if fixed {
            flags.0 |=
                PvtFlags::FIX_VALID | PvtFlags::VELOCITY_VALID | PvtFlags::LEAP_SECOND_VALID;
        } else if self.cycle % 3 == 2 {
            flags.0 |= PvtFlags::NOT_ENOUGH_WINDOW_TIME;
        }

        // wander a few meters around the configured position
        let jitter = f64::from(self.cycle % 10) * 1.0e-5;

        PvtSnapshot {
            latitude: self.cfg.latitude + jitter,
            longitude: self.cfg.longitude - jitter,
            accuracy: if fixed { 6.5 } else { 0.0 },
            altitude: if fixed { 21.4 } else { 0.0 },
            altitude_accuracy: if fixed { 11.0 } else { 0.0 },
            speed: 0.3,
            speed_accuracy: 0.8,
            vertical_speed: 0.0,
            vertical_speed_accuracy: 1.2,
            heading: 90.0,
            heading_accuracy: 45.0,
            datetime: Utc::now().naive_utc(),
            pdop: 2.1,
            hdop: 1.3,
            vdop: 1.6,
            tdop: 1.1,
            satellites,
            flags,
        }
    }
}

/// Minimal GGA sentence for `p`, checksum included
fn gga(p: &PvtSnapshot) -> String {
    let quality = if p.fix_valid() { 1 } else { 0 };
    let body = format!(
        "GPGGA,{},{:.4},N,{:.4},E,{},{:02},{:.1},{:.1},M,,M,,",
        p.datetime.format("%H%M%S%.3f"),
        p.latitude.abs() * 100.0,
        p.longitude.abs() * 100.0,
        quality,
        p.satellite_stats().in_fix,
        p.hdop,
        p.altitude
    );
    let checksum = body.bytes().fold(0_u8, |acc, b| acc ^ b);

    format!("${}*{:02X}", body, checksum)
}

impl Receiver for FakeReceiver {
    fn next_event(&mut self) -> Option<ReceiverEvent> {
        if self.steps.is_empty() {
            self.refill();
        }

        match self.steps.pop_front()? {
            Step::Pvt(p) => {
                if self.interval > Duration::from_millis(0) {
                    thread::sleep(self.interval);
                }

                self.pvt = Some(p);
                Some(ReceiverEvent::Pvt)
            }
            Step::Nmea(s) => {
                self.nmea = Some(s);
                Some(ReceiverEvent::Nmea)
            }
            #[cfg(test)]
            Step::Other(code) => Some(ReceiverEvent::Other(code)),
        }
    }

    fn read_pvt(&mut self) -> Result<PvtSnapshot, ReadError> {
        self.pvt.take().ok_or(ReadError::NotAvailable)
    }

    fn read_nmea(&mut self, buf: &mut Vec<u8>) -> Result<(), ReadError> {
        let s = self.nmea.take().ok_or(ReadError::NotAvailable)?;
        buf.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick(search_cycles: u32) -> FakeConfig {
        FakeConfig {
            search_cycles,
            interval_ms: 0,
            ..FakeConfig::default()
        }
    }

    #[test]
    fn test_fake_receiver_searches_then_fixes() {
        let mut r = FakeReceiver::new(quick(2), Some(3));
        let mut fixes = vec![];

        while let Some(e) = r.next_event() {
            match e {
                ReceiverEvent::Pvt => fixes.push(r.read_pvt().unwrap().fix_valid()),
                ReceiverEvent::Nmea => {
                    let mut buf = vec![];
                    r.read_nmea(&mut buf).unwrap();
                    assert!(buf.starts_with(b"$GPGGA,"));
                }
                ReceiverEvent::Other(_) => unreachable!(),
            }
        }

        assert_eq!(fixes, vec![false, false, true]);
    }

    #[test]
    fn test_leap_second_valid_once_fixed() {
        let mut r = FakeReceiver::new(quick(1), Some(2));
        let mut leap = vec![];

        while let Some(e) = r.next_event() {
            if e == ReceiverEvent::Pvt {
                let flags = r.read_pvt().unwrap().flags;
                leap.push(flags.contains(PvtFlags::LEAP_SECOND_VALID));
            }
        }

        assert_eq!(leap, vec![false, true]);
    }

    #[test]
    fn test_fake_receiver_reads_once() {
        let mut r = FakeReceiver::new(quick(0), Some(1));

        assert_eq!(r.next_event(), Some(ReceiverEvent::Pvt));
        assert!(r.read_pvt().is_ok());
        assert!(r.read_pvt().is_err());
    }

    #[test]
    fn test_satellites_grow_while_searching() {
        let mut r = FakeReceiver::new(quick(20), Some(20));
        let mut tracked = vec![];

        while let Some(e) = r.next_event() {
            if e == ReceiverEvent::Pvt {
                tracked.push(r.read_pvt().unwrap().satellite_stats().tracked);
            }
        }

        assert_eq!(tracked[0], 1);
        assert_eq!(tracked[4], 5);
        assert_eq!(*tracked.last().unwrap(), CHANNELS as u8);
    }

    #[test]
    fn test_gga_checksum() {
        let s = gga(&FakeReceiver::new(quick(0), None).simulation.as_ref().unwrap().frame());
        let (body, sum) = s[1..].split_at(s.len() - 4);
        let expected = body.bytes().fold(0_u8, |acc, b| acc ^ b);
        assert_eq!(sum, format!("*{:02X}", expected));
    }

    #[test]
    fn test_scripted() {
        let mut r = FakeReceiver::scripted(vec![Step::Other(3), Step::Nmea("$X".to_string())]);

        assert_eq!(r.next_event(), Some(ReceiverEvent::Other(3)));
        assert_eq!(r.next_event(), Some(ReceiverEvent::Nmea));
        assert_eq!(r.next_event(), None);
    }
}
