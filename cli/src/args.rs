// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

/// The hold time of each level if no delay is provided.
pub const DEFAULT_DELAY: Duration = Duration::from_micros(380_000);

/// Microseconds per unit of the delay argument.
pub const DELAY_SCALE: i64 = 760;

const HELP: &str = concat!(
    "Beep Buzzer V1.0\n",
    "\n Use: beep N t \n",
    "    N : Number of beeps.\n",
    "    t : Time between beeps in milliseconds, default 0.5s\n",
    "\n\nCopyright Hanscan Spain S.A.\n",
    "All Rights Reserved",
);

pub fn help_text() -> &'static str {
    HELP
}

/// What the command line asked for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Invocation {
    /// No arguments, so only print help.
    Help,

    /// More arguments than can be interpreted.
    TooManyArgs,

    /// Sound the buzzer.
    Beep { count: u32, delay: Duration },
}

impl Invocation {
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Invocation {
        match args {
            [] => Invocation::Help,
            [count] => Invocation::Beep {
                count: parse_count(count.as_ref()),
                delay: DEFAULT_DELAY,
            },
            [count, delay] => Invocation::Beep {
                count: parse_count(count.as_ref()),
                delay: scale_delay(parse_int(delay.as_ref())),
            },
            _ => Invocation::TooManyArgs,
        }
    }
}

// negative counts sound nothing
fn parse_count(s: &str) -> u32 {
    parse_int(s).max(0) as u32
}

// negative delays are held for zero time
fn scale_delay(t: i32) -> Duration {
    let us = (t as i64 * DELAY_SCALE).max(0);
    Duration::from_micros(us as u64)
}

/// Best-effort integer conversion.
///
/// Skips leading ASCII whitespace, accepts an optional sign, then converts the
/// leading decimal digits and ignores the remainder.
/// Input with no leading digits is 0, and out of range values saturate.
/// Never fails.
pub fn parse_int(s: &str) -> i32 {
    // the C locale isspace set, no Unicode whitespace
    let s = s.trim_start_matches(|c: char| {
        matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
    });
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut v: i64 = 0;
    for c in digits.bytes().take_while(u8::is_ascii_digit) {
        v = v * 10 + (c - b'0') as i64;
        if v > i32::MAX as i64 + 1 {
            break;
        }
    }
    if negative {
        v = -v;
    }
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
