// Fixwatch - a GNSS fix acquisition monitor
// Copyright (C) 2017  Datong Sun (dndx@idndx.com)
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

use std::time::Instant;

/// Per-cycle view of the outside world, taken once per loop iteration
pub trait Handle {
    fn get_clock(&self) -> Instant;
}

pub struct BasicHandle {
    clock: Instant,
}

impl Handle for BasicHandle {
    fn get_clock(&self) -> Instant {
        self.clock
    }
}

impl BasicHandle {
    pub fn new() -> Self {
        Self {
            clock: Instant::now(),
        }
    }
}

impl Default for BasicHandle {
    fn default() -> Self {
        BasicHandle::new()
    }
}

/// A handle frozen at a caller-chosen instant
#[cfg(test)]
pub struct FixedHandle(pub Instant);

#[cfg(test)]
impl Handle for FixedHandle {
    fn get_clock(&self) -> Instant {
        self.0
    }
}
