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

use crate::error::Error;
use crate::event::NMEA_QUEUE_CAPACITY;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Fixed point the distance of every fix is measured against
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct ReferencePosition {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(PartialEq, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FakeConfig {
    /// Number of no-fix frames before the simulated fix
    pub search_cycles: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub interval_ms: u64,
}

impl Default for FakeConfig {
    fn default() -> Self {
        Self {
            search_cycles: 5,
            latitude: 60.1695,
            longitude: 24.9354,
            interval_ms: 1000,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Decimal degrees, kept as text until `reference()` validates it
    pub reference_latitude: Option<String>,
    pub reference_longitude: Option<String>,
    /// JSON-lines file to replay instead of the simulated receiver
    pub replay: Option<PathBuf>,
    pub replay_interval_ms: u64,
    pub nmea_queue_capacity: usize,
    pub fake: FakeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_latitude: None,
            reference_longitude: None,
            replay: None,
            replay_interval_ms: 1000,
            nmea_queue_capacity: NMEA_QUEUE_CAPACITY,
            fake: FakeConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let f = File::open(path)?;

        serde_json::from_reader(BufReader::new(f)).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The reference position, if both coordinates are configured and
    /// valid. A malformed coordinate disables the distance readout.
    pub fn reference(&self) -> Option<ReferencePosition> {
        let (lat, lon) = match (&self.reference_latitude, &self.reference_longitude) {
            (Some(lat), Some(lon)) if !lat.trim().is_empty() && !lon.trim().is_empty() => {
                (lat.trim(), lon.trim())
            }
            _ => return None,
        };

        match (lat.parse::<f64>(), lon.parse::<f64>()) {
            (Ok(latitude), Ok(longitude)) if latitude.is_finite() && longitude.is_finite() => {
                Some(ReferencePosition {
                    latitude,
                    longitude,
                })
            }
            _ => {
                warn!(
                    "reference position ({:?}, {:?}) is malformed, distance disabled",
                    lat, lon
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_reference(lat: Option<&str>, lon: Option<&str>) -> Config {
        Config {
            reference_latitude: lat.map(String::from),
            reference_longitude: lon.map(String::from),
            ..Config::default()
        }
    }

    #[test]
    fn test_reference_valid() {
        assert_eq!(
            with_reference(Some("59.3293"), Some(" 18.0686")).reference(),
            Some(ReferencePosition {
                latitude: 59.3293,
                longitude: 18.0686,
            })
        );
    }

    #[test]
    fn test_reference_absent_or_empty() {
        assert_eq!(with_reference(None, None).reference(), None);
        assert_eq!(with_reference(Some("59.3293"), None).reference(), None);
        assert_eq!(with_reference(Some(""), Some("18.0686")).reference(), None);
    }

    #[test]
    fn test_reference_malformed() {
        assert_eq!(with_reference(Some("north"), Some("18.0686")).reference(), None);
        assert_eq!(with_reference(Some("59.3"), Some("inf")).reference(), None);
        assert_eq!(with_reference(Some("NaN"), Some("1")).reference(), None);
    }

    #[test]
    fn test_deserialize_partial() {
        let c: Config = serde_json::from_str(
            r#"{"reference_latitude": "59.3293", "fake": {"search_cycles": 2}}"#,
        )
        .unwrap();

        assert_eq!(c.reference_latitude.as_deref(), Some("59.3293"));
        assert_eq!(c.nmea_queue_capacity, NMEA_QUEUE_CAPACITY);
        assert_eq!(c.fake.search_cycles, 2);
        assert_eq!(c.fake.interval_ms, 1000);
        assert_eq!(c.reference(), None);
    }

    #[test]
    fn test_load_reports_path() {
        let path = ::std::env::temp_dir().join("fixwatch-bad-config.json");
        ::std::fs::write(&path, "{ not json").unwrap();

        match Config::load(&path) {
            Err(Error::Config { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected {:?}", other),
        }

        ::std::fs::remove_file(&path).unwrap();
    }
}
