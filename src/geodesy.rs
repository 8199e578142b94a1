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

//! Great-circle distance on a spherical Earth.

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance in meters between two points given in decimal degrees.
///
/// Inputs must be finite.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + (d_lon / 2.0).sin().powi(2) * lat1.to_radians().cos() * lat2.to_radians().cos();

    // rounding can push `a` a hair past 1 for antipodal points
    2.0 * EARTH_RADIUS_METERS * a.min(1.0).sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STOCKHOLM: (f64, f64) = (59.3293, 18.0686);
    const HELSINKI: (f64, f64) = (60.1695, 24.9354);

    #[test]
    fn test_same_point_is_zero() {
        for &(lat, lon) in &[STOCKHOLM, HELSINKI, (0.0, 0.0), (-90.0, 180.0)] {
            assert_eq!(distance(lat, lon, lat, lon), 0.0);
        }
    }

    #[test]
    fn test_symmetric() {
        let a = distance(STOCKHOLM.0, STOCKHOLM.1, HELSINKI.0, HELSINKI.1);
        let b = distance(HELSINKI.0, HELSINKI.1, STOCKHOLM.0, STOCKHOLM.1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_stockholm_helsinki() {
        let d = distance(STOCKHOLM.0, STOCKHOLM.1, HELSINKI.0, HELSINKI.1);
        assert!((d - 395_648.3).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_antipodal() {
        let d = distance(0.0, 0.0, 0.0, 180.0);
        let half_circumference = EARTH_RADIUS_METERS * ::std::f64::consts::PI;
        assert!((d - half_circumference).abs() < 1e-6);
        assert!(!d.is_nan());
    }

    #[test]
    fn test_non_negative() {
        assert!(distance(10.0, 10.0, -10.0, -10.0) > 0.0);
        assert!(distance(-33.9, 151.2, 51.5, -0.1) > 0.0);
    }
}
