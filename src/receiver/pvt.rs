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

use chrono::NaiveDateTime;
use std::str;

/// Longest NMEA sentence the receiver emits, including the terminator
pub const NMEA_SENTENCE_MAX_LEN: usize = 83;

/// Receiver status flags attached to every PVT frame
#[derive(PartialEq, Eq, Debug, Default, Copy, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PvtFlags(pub u8);

impl PvtFlags {
    pub const FIX_VALID: u8 = 0x01;
    pub const LEAP_SECOND_VALID: u8 = 0x02;
    pub const SLEEP_BETWEEN_PVT: u8 = 0x04;
    pub const DEADLINE_MISSED: u8 = 0x08;
    pub const NOT_ENOUGH_WINDOW_TIME: u8 = 0x10;
    pub const VELOCITY_VALID: u8 = 0x20;
    pub const SCHED_DOWNLOAD: u8 = 0x40;

    pub fn contains(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub fn fix_valid(self) -> bool {
        self.contains(Self::FIX_VALID)
    }
}

#[derive(PartialEq, Debug, Default, Copy, Clone, Serialize, Deserialize)]
pub struct SatelliteInfo {
    /// Satellite ID, 0 marks an unused tracking channel
    pub sv: u16,
    /// Satellite is part of the current solution
    #[serde(default)]
    pub used_in_fix: bool,
    #[serde(default)]
    pub unhealthy: bool,
}

#[derive(PartialEq, Eq, Debug, Default, Copy, Clone)]
pub struct SatelliteStats {
    pub tracked: u8,
    pub in_fix: u8,
    pub unhealthy: u8,
}

/// A single position, velocity and time solution as reported by the receiver.
///
/// Positions are in decimal degrees, distances in meters, speeds in
/// meters per second and headings in degrees.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PvtSnapshot {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f32,
    pub altitude: f32,
    pub altitude_accuracy: f32,
    pub speed: f32,
    pub speed_accuracy: f32,
    pub vertical_speed: f32,
    pub vertical_speed_accuracy: f32,
    pub heading: f32,
    pub heading_accuracy: f32,
    /// UTC, millisecond resolution
    pub datetime: NaiveDateTime,
    pub pdop: f32,
    pub hdop: f32,
    pub vdop: f32,
    pub tdop: f32,
    #[serde(default)]
    pub satellites: Vec<SatelliteInfo>,
    #[serde(default)]
    pub flags: PvtFlags,
}

impl PvtSnapshot {
    pub fn fix_valid(&self) -> bool {
        self.flags.fix_valid()
    }

    /// Count tracked satellites, and among those the ones used in
    /// the fix and the ones flagged unhealthy
    pub fn satellite_stats(&self) -> SatelliteStats {
        let mut stats = SatelliteStats::default();

        for s in self.satellites.iter().filter(|s| s.sv > 0) {
            stats.tracked = stats.tracked.saturating_add(1);

            if s.used_in_fix {
                stats.in_fix = stats.in_fix.saturating_add(1);
            }

            if s.unhealthy {
                stats.unhealthy = stats.unhealthy.saturating_add(1);
            }
        }

        stats
    }
}

/// An NMEA sentence exactly as the receiver formatted it. Never parsed,
/// only drained.
#[derive(PartialEq, Debug)]
pub struct NmeaRecord(Vec<u8>);

impl NmeaRecord {
    pub fn new(buf: Vec<u8>) -> Self {
        NmeaRecord(buf)
    }

    pub fn as_str(&self) -> Option<&str> {
        str::from_utf8(&self.0).ok()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// A snapshot with every field populated, used across the crate's tests
    pub fn snapshot(flags: u8, satellites: Vec<SatelliteInfo>) -> PvtSnapshot {
        PvtSnapshot {
            latitude: 60.1695,
            longitude: 24.9354,
            accuracy: 4.3,
            altitude: 12.5,
            altitude_accuracy: 8.0,
            speed: 0.1,
            speed_accuracy: 0.5,
            vertical_speed: -0.2,
            vertical_speed_accuracy: 0.7,
            heading: 181.3,
            heading_accuracy: 10.0,
            datetime: NaiveDate::from_ymd_opt(2025, 5, 16)
                .and_then(|d| d.and_hms_milli_opt(9, 8, 7, 65))
                .unwrap(),
            pdop: 1.8,
            hdop: 1.1,
            vdop: 1.4,
            tdop: 0.9,
            satellites,
            flags: PvtFlags(flags),
        }
    }

    fn sv(sv: u16, used_in_fix: bool, unhealthy: bool) -> SatelliteInfo {
        SatelliteInfo {
            sv,
            used_in_fix,
            unhealthy,
        }
    }

    #[test]
    fn test_satellite_stats() {
        let p = snapshot(
            0,
            vec![
                sv(3, true, false),
                sv(7, true, true),
                sv(12, false, false),
                sv(19, false, true),
                sv(0, true, true), // empty channel, ignored
                sv(0, false, false),
            ],
        );

        assert_eq!(
            p.satellite_stats(),
            SatelliteStats {
                tracked: 4,
                in_fix: 2,
                unhealthy: 2,
            }
        );
    }

    #[test]
    fn test_satellite_stats_empty() {
        assert_eq!(snapshot(0, vec![]).satellite_stats(), SatelliteStats::default());
    }

    #[test]
    fn test_flags() {
        let f = PvtFlags(PvtFlags::FIX_VALID | PvtFlags::SCHED_DOWNLOAD);
        assert!(f.fix_valid());
        assert!(f.contains(PvtFlags::SCHED_DOWNLOAD));
        assert!(!f.contains(PvtFlags::DEADLINE_MISSED));
        assert!(!PvtFlags::default().fix_valid());
    }

    #[test]
    fn test_deserialize_snapshot() {
        let js = r#"{
            "latitude": 59.3293, "longitude": 18.0686,
            "accuracy": 3.0, "altitude": 20.0, "altitude_accuracy": 5.0,
            "speed": 0.0, "speed_accuracy": 0.3,
            "vertical_speed": 0.0, "vertical_speed_accuracy": 0.4,
            "heading": 0.0, "heading_accuracy": 180.0,
            "datetime": "2025-05-16T10:20:30.123",
            "pdop": 1.0, "hdop": 1.0, "vdop": 1.0, "tdop": 1.0,
            "satellites": [{"sv": 5, "used_in_fix": true}, {"sv": 9}],
            "flags": 1
        }"#;

        let p: PvtSnapshot = serde_json::from_str(js).unwrap();
        assert!(p.fix_valid());
        assert_eq!(p.satellites[1], sv(9, false, false));
        assert_eq!(p.datetime.format("%H:%M:%S%.3f").to_string(), "10:20:30.123");
    }

    #[test]
    fn test_nmea_record() {
        let r = NmeaRecord::new(b"$GPGGA,,,,,,0,00,99.99,,,,,,*48".to_vec());
        assert_eq!(r.as_str(), Some("$GPGGA,,,,,,0,00,99.99,,,,,,*48"));
        assert_eq!(NmeaRecord::new(vec![0xff]).as_str(), None);
    }
}
