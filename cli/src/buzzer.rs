// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive a buzzer wired to a GPIO line exported through sysfs.
//!
//! The line is controlled by writing a single `0` or `1` to its `value`
//! pseudo-file. The file is opened and closed for every half-cycle so no
//! handle is held across the sleeps.

use std::fs::OpenOptions;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// The sysfs value file of the line the buzzer is wired to.
pub const BUZZER_GPIO: &str = "/sys/class/gpio/pioC18/value";

/// Errors returned when driving the buzzer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The value file could not be opened for writing.
    #[error("cannot open value file '{}'", .0.display())]
    Open(PathBuf, #[source] std::io::Error),

    /// The level could not be written to the value file.
    #[error("cannot write {} to value file '{}'", .1, .0.display())]
    Write(PathBuf, Level, #[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The physical level written to the line.
///
/// Whether `Low` or `High` sounds the buzzer depends on the board wiring.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Level {
    /// Written as `0`.
    Low,
    /// Written as `1`.
    High,
}

impl Level {
    /// The level opposite the current level.
    pub fn not(&self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Level::Low => "0",
            Level::High => "1",
        };
        write!(f, "{}", s)
    }
}

impl From<Level> for u8 {
    fn from(l: Level) -> u8 {
        match l {
            Level::Low => b'0',
            Level::High => b'1',
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Buzzer {
    path: PathBuf,
}

impl Default for Buzzer {
    fn default() -> Self {
        Buzzer::new(BUZZER_GPIO)
    }
}

impl Buzzer {
    pub fn new<P: Into<PathBuf>>(path: P) -> Buzzer {
        Buzzer { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a single level to the value file.
    ///
    /// The file must already exist, it is never created or truncated.
    pub fn set(&self, level: Level) -> Result<()> {
        let mut f = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| Error::Open(self.path.clone(), e))?;
        f.rewind()
            .and_then(|_| f.write_all(&[level.into()]))
            .map_err(|e| Error::Write(self.path.clone(), level, e))?;
        tracing::debug!(path = %self.path.display(), %level, "set level");
        Ok(())
    }

    /// Toggle the buzzer `count` times, holding each level for `delay`.
    ///
    /// Each cycle writes `0` then `1`. No sleep follows the final write.
    pub fn toggle(&self, count: u32, delay: Duration) -> Result<()> {
        self.toggle_with(count, delay, thread::sleep)
    }

    /// As [`toggle`](Buzzer::toggle), but sleeping via the provided function.
    pub fn toggle_with<F>(&self, count: u32, delay: Duration, mut sleep: F) -> Result<()>
    where
        F: FnMut(Duration),
    {
        for remaining in (1..=count).rev() {
            let mut level = Level::Low;
            self.set(level)?;
            sleep(delay);
            level = level.not();
            self.set(level)?;
            if remaining != 1 {
                sleep(delay);
            }
        }
        Ok(())
    }
}
