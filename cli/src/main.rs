// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A command line tool for sounding a GPIO driven buzzer.

use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod args;
mod buzzer;

use args::Invocation;
use buzzer::Buzzer;

fn main() -> ExitCode {
    match Opts::try_parse() {
        Ok(opts) => {
            init_tracing(opts.verbose);
            return if run(&opts, &Buzzer::default()) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
        Err(e) => {
            _ = e.print();
            if !e.use_stderr() {
                // --help or --version
                return ExitCode::SUCCESS;
            }
        }
    }
    ExitCode::FAILURE
}

#[derive(Debug, Parser)]
#[command(
    name = "beep",
    version,
    override_help = args::help_text()
)]
struct Opts {
    /// Provide more detailed error messages and log each level change.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// The number of beeps, optionally followed by the time between beeps.
    ///
    /// Any token that is not a known flag is taken as a value, and everything
    /// after the first value is a value, including "-v".
    #[arg(value_name = "N t", allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<OsString>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn run(opts: &Opts, buzzer: &Buzzer) -> bool {
    let args: Vec<_> = opts.args.iter().map(|a| a.to_string_lossy()).collect();
    match Invocation::from_args(&args) {
        Invocation::Help => print_help(),
        Invocation::TooManyArgs => {
            eprintln!("Error! Incorrect parameter");
            print_help();
        }
        Invocation::Beep { count, delay } => {
            if let Err(e) = beep(buzzer, count, delay) {
                emit_error(opts, &e);
                return false;
            }
        }
    }
    true
}

fn print_help() {
    let mut stdout = std::io::stdout();
    _ = stdout.write_all(args::help_text().as_bytes());
    _ = stdout.flush();
}

fn beep(buzzer: &Buzzer, count: u32, delay: Duration) -> Result<()> {
    tracing::debug!(
        path = %buzzer.path().display(),
        count,
        delay_us = delay.as_micros() as u64,
        "beep"
    );
    buzzer
        .toggle(count, delay)
        .context("failed to sound buzzer")
}

fn emit_error(opts: &Opts, e: &anyhow::Error) {
    if opts.verbose {
        eprintln!("{e:#}");
    } else {
        eprintln!("{e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{NamedTempFile, TempDir};

    fn opts(args: &[&str]) -> Opts {
        Opts::try_parse_from(std::iter::once("beep").chain(args.iter().copied()))
            .expect("args should parse")
    }

    fn value_file() -> NamedTempFile {
        let f = NamedTempFile::new().expect("temp file should be created");
        fs::write(f.path(), "x").expect("temp file should be writable");
        f
    }

    fn read(f: &NamedTempFile) -> String {
        fs::read_to_string(f.path()).expect("value file should be readable")
    }

    mod parse {
        use super::*;

        #[test]
        fn positional() {
            let o = opts(&["2", "1000"]);
            assert!(!o.verbose);
            assert_eq!(o.args, ["2", "1000"]);
        }

        #[test]
        fn verbose() {
            let o = opts(&["-v", "3"]);
            assert!(o.verbose);
            assert_eq!(o.args, ["3"]);
        }

        #[test]
        fn negative() {
            let o = opts(&["-2", "-10"]);
            assert_eq!(o.args, ["-2", "-10"]);
        }

        #[test]
        fn help_flag() {
            let e = Opts::try_parse_from(["beep", "--help"]).expect_err("help should short-circuit");
            assert!(!e.use_stderr());
            assert!(e.to_string().contains("Beep Buzzer V1.0"));
        }

        #[test]
        fn unknown_flags_are_values() {
            assert_eq!(opts(&["-x"]).args, ["-x"]);
            assert_eq!(opts(&["--loud"]).args, ["--loud"]);
            assert_eq!(opts(&["3", "-x"]).args, ["3", "-x"]);
            assert_eq!(opts(&["1", "2", "--loud"]).args, ["1", "2", "--loud"]);
        }

        #[test]
        fn verbose_after_value() {
            let o = opts(&["3", "-v"]);
            assert!(!o.verbose);
            assert_eq!(o.args, ["3", "-v"]);
            assert_eq!(
                Invocation::from_args(&["3", "-v"]),
                Invocation::Beep {
                    count: 3,
                    delay: Duration::ZERO
                }
            );
        }
    }

    #[test]
    fn no_args_leaves_device_untouched() {
        let f = value_file();
        assert!(run(&opts(&[]), &Buzzer::new(f.path())));
        assert_eq!(read(&f), "x");
    }

    #[test]
    fn too_many_args_leaves_device_untouched() {
        let f = value_file();
        assert!(run(&opts(&["1", "2", "3"]), &Buzzer::new(f.path())));
        assert_eq!(read(&f), "x");
    }

    #[test]
    fn beeps() {
        let f = value_file();
        assert!(run(&opts(&["2", "1"]), &Buzzer::new(f.path())));
        assert_eq!(read(&f), "1");
    }

    #[test]
    fn malformed_count_does_nothing() {
        let f = value_file();
        assert!(run(&opts(&["lots", "1"]), &Buzzer::new(f.path())));
        assert_eq!(read(&f), "x");
    }

    #[test]
    fn hyphen_count_does_nothing() {
        let f = value_file();
        assert!(run(&opts(&["-x"]), &Buzzer::new(f.path())));
        assert_eq!(read(&f), "x");
    }

    #[test]
    fn hyphen_delay_is_zero() {
        let f = value_file();
        assert!(run(&opts(&["3", "-x"]), &Buzzer::new(f.path())));
        assert_eq!(read(&f), "1");
    }

    #[test]
    fn too_many_args_with_flag_leaves_device_untouched() {
        let f = value_file();
        assert!(run(&opts(&["1", "2", "--loud"]), &Buzzer::new(f.path())));
        assert_eq!(read(&f), "x");
    }

    #[test]
    fn missing_device_fails() {
        let dir = TempDir::new().expect("temp dir should be created");
        let p = dir.path().join("value");
        assert!(!run(&opts(&["1", "0"]), &Buzzer::new(&p)));
        assert!(!p.exists());
    }

    #[test]
    fn beep_error_names_path() {
        let dir = TempDir::new().expect("temp dir should be created");
        let p = dir.path().join("value");
        let e = beep(&Buzzer::new(&p), 1, Duration::ZERO).expect_err("beep should fail");
        assert_eq!(e.to_string(), "failed to sound buzzer");
        let chain = format!("{e:#}");
        assert!(chain.starts_with("failed to sound buzzer: cannot open value file"));
        assert!(chain.contains(&p.display().to_string()));
    }
}
