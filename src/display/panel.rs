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

//! Append-only line output with a bounded in-place redraw.

use crossterm::cursor::{MoveDown, MoveUp};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use std::fmt;
use std::io::{self, Write};

pub struct Panel<W: Write> {
    out: W,
}

impl<W: Write> Panel<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Blank the `lines` lines above the cursor and leave the cursor at
    /// the first of them
    pub fn erase(&mut self, lines: u16) -> io::Result<()> {
        if lines == 0 {
            return Ok(());
        }

        queue!(self.out, MoveUp(lines))?;

        for i in 0..lines {
            queue!(self.out, Clear(ClearType::CurrentLine))?;
            if i < lines - 1 {
                queue!(self.out, MoveDown(1))?;
            }
        }

        if lines > 1 {
            queue!(self.out, MoveUp(lines - 1))?;
        }

        Ok(())
    }

    pub fn line(&mut self, args: fmt::Arguments) -> io::Result<()> {
        self.out.write_fmt(args)?;
        self.out.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}
