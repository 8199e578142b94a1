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

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Startup errors. Once the acquisition loop is running nothing is
/// propagated, everything is logged and dropped instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unable to parse config file {path:?}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unable to open replay file {path:?}: {source}")]
    Replay { path: PathBuf, source: io::Error },

    #[error("a receiver is already linked")]
    ReceiverAlreadyLinked,
}

/// Failure to read a payload back from the receiver after it
/// notified us about it
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("no payload of the requested kind is available")]
    NotAvailable,

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
