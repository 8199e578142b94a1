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

#[macro_use]
extern crate log;
extern crate chrono;
extern crate crossterm;
extern crate env_logger;
extern crate serde_json;
#[macro_use]
extern crate serde_derive;
extern crate thiserror;

mod config;
mod display;
mod error;
mod event;
mod geodesy;
mod monitor;
mod receiver;

use config::Config;
use display::DisplayTracker;
use error::Error;
use monitor::Monitor;
use receiver::fake::FakeReceiver;
use receiver::replay::ReplayReceiver;
use receiver::Receiver;
use std::env;
use std::io;
use std::process;
use std::time::{Duration, Instant};

fn setup() -> Result<Monitor<io::Stdout>, Error> {
    let config = match env::args_os().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let reference = config.reference();
    if let Some(ref r) = reference {
        info!("reference position {:.6}, {:.6}", r.latitude, r.longitude);
    }

    let receiver: Box<dyn Receiver> = match config.replay {
        Some(ref path) => Box::new(ReplayReceiver::open(
            path,
            Duration::from_millis(config.replay_interval_ms),
        )?),
        None => {
            info!("no replay file configured, using the simulated receiver");
            Box::new(FakeReceiver::new(config.fake.clone(), None))
        }
    };

    let (notifier, waiter) = event::channel(config.nmea_queue_capacity);
    let tracker = DisplayTracker::new(io::stdout(), reference, Instant::now());

    let mut m = Monitor::new(tracker, waiter, notifier);
    m.link_receiver(receiver)?;

    Ok(m)
}

fn main() {
    env_logger::init();

    info!("starting GNSS fix acquisition");

    match setup() {
        Ok(mut m) => m.run_forever(),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
