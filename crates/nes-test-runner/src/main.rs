//! Headless NES test ROM runner.
//!
//! Runs CPU test ROMs and reports pass/fail status.
//! Supports two modes:
//! 1. blargg protocol: $6000 status, $6004+ text
//! 2. nestest automation: start at $C000, results in $02/$03

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use emu_core::Cpu;
use nes_console::{Nes, NesConfig, RunOutcome, blargg};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_CYCLES: u64 = 200_000_000;

const NESTEST_ENTRY: u16 = 0xC000;
const NESTEST_END: u16 = 0xC66E;
const NESTEST_CYCLES: u64 = 26554;

const USAGE: &str = "\
Usage: nes-test-runner [options] <rom.nes> [rom2.nes ...]
  -v, --verbose      Debug logging
      --trace        Log every instruction in nestest format
      --lenient      Log memory faults instead of failing
      --nestest      Run nestest.nes automation from $C000
      --max-cycles N Cycle budget per ROM (default 200000000)";

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    verbose: bool,
    trace: bool,
    lenient: bool,
    nestest: bool,
    max_cycles: Option<u64>,
    roms: Vec<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options> {
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-v" | "--verbose" => options.verbose = true,
            "--trace" => options.trace = true,
            "--lenient" => options.lenient = true,
            "--nestest" => options.nestest = true,
            "--max-cycles" => {
                let value = args.next().context("--max-cycles needs a value")?;
                let cycles = value
                    .replace('_', "")
                    .parse()
                    .with_context(|| format!("bad cycle count {value:?}"))?;
                options.max_cycles = Some(cycles);
            }
            flag if flag.starts_with('-') => bail!("unknown option {flag}"),
            _ => options.roms.push(PathBuf::from(arg)),
        }
    }
    Ok(options)
}

fn init_logging(options: &Options) {
    let level = if options.trace {
        "trace"
    } else if options.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Result of running a test ROM.
#[derive(Debug)]
struct TestResult {
    passed: bool,
    code: u8,
    message: String,
    cycles: u64,
}

fn main() -> ExitCode {
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) if !options.roms.is_empty() => options,
        Ok(_) => {
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("error: {e:#}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&options);

    let mut total_passed = 0;
    let mut total_failed = 0;

    for path in &options.roms {
        let name = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        match run_test(path, &options) {
            Ok(result) => {
                let tag = if result.passed { "PASS" } else { "FAIL" };
                if result.passed {
                    total_passed += 1;
                } else {
                    total_failed += 1;
                }
                println!(
                    "[{tag}] {name} - ${:02X} ({}) after {} cycles",
                    result.code,
                    result.message.trim(),
                    result.cycles
                );
            }
            Err(e) => {
                total_failed += 1;
                println!("[FAIL] {name} - {e:#}");
            }
        }
    }

    println!();
    println!("Summary: {total_passed} passed, {total_failed} failed");

    if total_failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_test(path: &Path, options: &Options) -> Result<TestResult> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut config = NesConfig::new(data);
    // nestest runs off the end of its automation code into zero page
    config.strict_memory = !options.lenient && !options.nestest;
    config.trace_cpu = options.trace;
    let mut nes = Nes::new(&config).context("failed to load ROM")?;
    let budget = options.max_cycles.unwrap_or(DEFAULT_MAX_CYCLES);
    debug!(path = %path.display(), budget, "running");

    if options.nestest {
        run_nestest(&mut nes, budget)
    } else {
        let report = blargg::run(&mut nes, budget)?;
        Ok(TestResult {
            passed: report.passed(),
            code: report.code,
            message: report.message,
            cycles: report.cycles,
        })
    }
}

/// nestest automation: check the cycle count at the final RTS, then run on
/// until the CPU jams and read the result bytes.
fn run_nestest(nes: &mut Nes, budget: u64) -> Result<TestResult> {
    nes.jump(NESTEST_ENTRY);
    let outcome = nes.run_until(budget, |nes| nes.cpu().pc() == NESTEST_END)?;
    if outcome != RunOutcome::Stopped {
        bail!(
            "stopped at ${:04X} ({outcome:?}) before reaching ${NESTEST_END:04X}",
            nes.cpu().pc()
        );
    }
    let end_cycles = nes.cycles();

    let outcome = nes.run(budget)?;
    if outcome != RunOutcome::Halted {
        bail!("no halt after ${NESTEST_END:04X} ({outcome:?}, PC ${:04X})", nes.cpu().pc());
    }

    let official = nes.peek(0x02);
    let unofficial = nes.peek(0x03);
    info!(official, unofficial, end_cycles, "nestest finished");

    Ok(nestest_result(official, unofficial, end_cycles, nes.cycles()))
}

fn nestest_result(official: u8, unofficial: u8, end_cycles: u64, halt_cycles: u64) -> TestResult {
    let mut problems = Vec::new();
    if official != 0 {
        problems.push(format!("official ${official:02X}"));
    }
    if unofficial != 0 {
        problems.push(format!("unofficial ${unofficial:02X}"));
    }
    if end_cycles != NESTEST_CYCLES {
        problems.push(format!("CYC {end_cycles} at ${NESTEST_END:04X}, expected {NESTEST_CYCLES}"));
    }

    TestResult {
        passed: problems.is_empty(),
        code: official | unofficial,
        message: if problems.is_empty() {
            "ok".to_string()
        } else {
            problems.join(", ")
        },
        cycles: halt_cycles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_flags_and_roms() {
        let options =
            parse_args(args(&["-v", "--lenient", "a.nes", "--max-cycles", "1_000", "b.nes"]))
                .expect("valid arguments");
        assert!(options.verbose);
        assert!(options.lenient);
        assert!(!options.nestest);
        assert_eq!(options.max_cycles, Some(1000));
        assert_eq!(options.roms, vec![PathBuf::from("a.nes"), PathBuf::from("b.nes")]);
    }

    #[test]
    fn nestest_result_needs_zero_codes_and_cycle_count() {
        let pass = nestest_result(0, 0, NESTEST_CYCLES, NESTEST_CYCLES + 40);
        assert!(pass.passed);
        assert_eq!(pass.cycles, NESTEST_CYCLES + 40);

        let fail = nestest_result(0, 0x15, NESTEST_CYCLES, NESTEST_CYCLES);
        assert!(!fail.passed);
        assert_eq!(fail.code, 0x15);
        assert_eq!(fail.message, "unofficial $15");

        assert!(!nestest_result(0, 0, NESTEST_CYCLES + 1, NESTEST_CYCLES + 1).passed);
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(parse_args(args(&["--fast", "a.nes"])).is_err());
    }

    #[test]
    fn max_cycles_needs_a_number() {
        assert!(parse_args(args(&["--max-cycles"])).is_err());
        assert!(parse_args(args(&["--max-cycles", "lots"])).is_err());
    }
}
