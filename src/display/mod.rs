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

//! Keeps the status panel for the latest PVT frame on screen.
//!
//! Every frame redraws the panel in place. The height erased before
//! drawing is fixed per kind of the *previous* render: 4 lines after a
//! searching panel, 20 after a full fix. Advisory flag lines are not
//! accounted for.

pub mod panel;

use self::panel::Panel;
use crate::config::ReferencePosition;
use crate::event::Ready;
use crate::geodesy;
use crate::monitor::handle::Handle;
use crate::receiver::pvt::{PvtFlags, PvtSnapshot};
use std::io::{self, Write};
use std::time::Instant;

const SEARCHING_LINES: u16 = 4;
const FIX_LINES: u16 = 20;

const SEARCH_INDICATOR: [char; 4] = ['\\', '|', '/', '-'];

const SEPARATOR: &str = "-----------------------------------";

const ADVISORIES: [(u8, &str); 4] = [
    (PvtFlags::DEADLINE_MISSED, "GNSS operation blocked by LTE"),
    (PvtFlags::NOT_ENOUGH_WINDOW_TIME, "Insufficient GNSS time windows"),
    (PvtFlags::SLEEP_BETWEEN_PVT, "Sleep period(s) between PVT notifications"),
    (PvtFlags::SCHED_DOWNLOAD, "Scheduled navigation data download"),
];

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum RenderKind {
    Searching,
    Fix,
}

impl RenderKind {
    /// Lines to erase before drawing over a render of this kind
    pub fn height(self) -> u16 {
        match self {
            RenderKind::Searching => SEARCHING_LINES,
            RenderKind::Fix => FIX_LINES,
        }
    }
}

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct SessionState {
    /// Last time a valid fix was seen, or when searching started
    pub last_fix: Instant,
    pub search_counter: u32,
    pub first_render: bool,
    pub last_render: Option<RenderKind>,
}

pub struct DisplayTracker<W: Write> {
    panel: Panel<W>,
    reference: Option<ReferencePosition>,
    current: Option<PvtSnapshot>,
    session: SessionState,
}

impl<W: Write> DisplayTracker<W> {
    /// `started` is when the receiver began searching, the baseline for
    /// "seconds since last fix" until the first fix arrives
    pub fn new(out: W, reference: Option<ReferencePosition>, started: Instant) -> Self {
        Self {
            panel: Panel::new(out),
            reference,
            current: None,
            session: SessionState {
                last_fix: started,
                search_counter: 0,
                first_render: true,
                last_render: None,
            },
        }
    }

    /// Process one wakeup worth of events: the PVT frame first, then the
    /// NMEA record, which is released without output
    pub fn render_next(&mut self, handle: &dyn Handle, ready: Ready) -> io::Result<()> {
        let Ready { pvt, nmea } = ready;

        if let Some(pvt) = pvt {
            self.current = Some(pvt);
            self.render_current(handle.get_clock())?;
        }

        if let Some(r) = nmea {
            trace!("releasing NMEA record {:?}", r.as_str().unwrap_or("<binary>"));
        }

        Ok(())
    }

    fn render_current(&mut self, now: Instant) -> io::Result<()> {
        let pvt = match self.current {
            Some(ref p) => p,
            None => return Ok(()),
        };

        if !self.session.first_render {
            if let Some(prev) = self.session.last_render {
                self.panel.erase(prev.height())?;
            }
        }
        self.session.first_render = false;

        // a failed write below still leaves this many lines to erase
        let kind = if pvt.fix_valid() {
            RenderKind::Fix
        } else {
            RenderKind::Searching
        };
        self.session.last_render = Some(kind);

        let stats = pvt.satellite_stats();
        self.panel.line(format_args!(
            "Tracking: {:2} Using: {:2} Unhealthy: {}",
            stats.tracked, stats.in_fix, stats.unhealthy
        ))?;

        for &(flag, text) in ADVISORIES.iter() {
            if pvt.flags.contains(flag) {
                self.panel.line(format_args!("{}", text))?;
            }
        }

        self.panel.line(format_args!("{}", SEPARATOR))?;

        if kind == RenderKind::Fix {
            if now > self.session.last_fix {
                self.session.last_fix = now;
            }

            write_fix(&mut self.panel, pvt)?;

            if let Some(ref r) = self.reference {
                let d = geodesy::distance(pvt.latitude, pvt.longitude, r.latitude, r.longitude);
                self.panel
                    .line(format_args!("Distance from reference: {:.1}", d))?;
            }
        } else {
            let since = now.saturating_duration_since(self.session.last_fix);
            self.panel
                .line(format_args!("Seconds since last fix: {}", since.as_secs()))?;

            let c = SEARCH_INDICATOR[(self.session.search_counter % 4) as usize];
            self.session.search_counter = self.session.search_counter.wrapping_add(1);
            self.panel.line(format_args!("Searching [{}]", c))?;
        }

        self.panel.flush()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn current(&self) -> Option<&PvtSnapshot> {
        self.current.as_ref()
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        self.panel.get_ref()
    }
}

fn write_fix<W: Write>(p: &mut Panel<W>, pvt: &PvtSnapshot) -> io::Result<()> {
    p.line(format_args!("Latitude:          {:.6}", pvt.latitude))?;
    p.line(format_args!("Longitude:         {:.6}", pvt.longitude))?;
    p.line(format_args!("Accuracy:          {:.1} m", pvt.accuracy))?;
    p.line(format_args!("Altitude:          {:.1} m", pvt.altitude))?;
    p.line(format_args!("Altitude accuracy: {:.1} m", pvt.altitude_accuracy))?;
    p.line(format_args!("Speed:             {:.1} m/s", pvt.speed))?;
    p.line(format_args!("Speed accuracy:    {:.1} m/s", pvt.speed_accuracy))?;
    p.line(format_args!("V. speed:          {:.1} m/s", pvt.vertical_speed))?;
    p.line(format_args!("V. speed accuracy: {:.1} m/s", pvt.vertical_speed_accuracy))?;
    p.line(format_args!("Heading:           {:.1} deg", pvt.heading))?;
    p.line(format_args!("Heading accuracy:  {:.1} deg", pvt.heading_accuracy))?;
    p.line(format_args!("Date:              {}", pvt.datetime.format("%Y-%m-%d")))?;
    p.line(format_args!("Time (UTC):        {}", pvt.datetime.format("%H:%M:%S%.3f")))?;
    p.line(format_args!("PDOP:              {:.1}", pvt.pdop))?;
    p.line(format_args!("HDOP:              {:.1}", pvt.hdop))?;
    p.line(format_args!("VDOP:              {:.1}", pvt.vdop))?;
    p.line(format_args!("TDOP:              {:.1}", pvt.tdop))
}
