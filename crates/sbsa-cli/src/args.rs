//! Command-line parsing.
//!
//! Options start with `--`; everything else is positional. A lone `-`
//! followed by a digit is a negative number, not an option.

use std::path::PathBuf;

use sbsa_core::config::StepSpec;
use sbsa_core::observe::LogLevel;
use sbsa_core::{RoundingMode, SpatialPhase};

use crate::error::CliError;

pub const USAGE: &str = "\
Size-based spatial addressing and wave field sampling

USAGE:
    sbsa [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
    encode <c0> <c1> ...        Encode integer coordinates into an address
    decode <address>            Decode an address into coordinates
    locate <x0> <x1> ...        Quantize a continuous point and encode it
    sample <address>            Sample the wave field at one address
    frame                       Sample a contiguous address range
    config                      Print the effective configuration as YAML

OPTIONS:
    --config <FILE>             Configuration file (default: search path)
    --bounds <B0,B1,...>        Override per-axis bounds
    --step <D | D0,D1,...>      Override the quantization step
    --rounding <MODE>           half_away_from_zero | half_even
    --spatial <MODE>            radial | planar | flat
    --time <T>                  Simulation time (sample, frame; default 0)
    --start <ADDRESS>           First address of a frame (default 0)
    --count <N>                 Number of cells in a frame
    --sequential                Sample frames on the calling thread only
    --example                   With `config`: print an example configuration
    --json                      Emit JSON instead of plain text
    --log-level <LEVEL>         trace | debug | info | warn | error
    -h, --help                  Print this help
    -V, --version               Print version";

/// Options that consume the following argument.
const VALUE_OPTIONS: &[&str] = &[
    "--config",
    "--bounds",
    "--step",
    "--rounding",
    "--spatial",
    "--time",
    "--start",
    "--count",
    "--log-level",
];

/// Options that stand alone.
const FLAG_OPTIONS: &[&str] = &["--json", "--sequential", "--example"];

/// Global settings shared by every command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub config: Option<PathBuf>,
    pub bounds: Option<Vec<u64>>,
    pub step: Option<StepSpec>,
    pub rounding: Option<RoundingMode>,
    pub spatial: Option<SpatialPhase>,
    pub log_level: Option<LogLevel>,
    pub json: bool,
    pub sequential: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Coordinates are kept signed so negatives report as out of bound.
    Encode { coords: Vec<i128> },
    Decode { address: u64 },
    Locate { point: Vec<f64> },
    Sample { address: u64, time: f64 },
    Frame { time: f64, start: u64, count: Option<u64> },
    Config { example: bool },
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub options: Options,
    pub command: Command,
}

fn is_option(arg: &str) -> bool {
    arg.starts_with("--") || arg == "-h" || arg == "-V"
}

fn parse_num<T: std::str::FromStr>(what: &str, raw: &str) -> Result<T, CliError> {
    raw.parse()
        .map_err(|_| CliError::usage(format!("invalid {}: '{}'", what, raw)))
}

fn parse_list<T: std::str::FromStr>(what: &str, raw: &str) -> Result<Vec<T>, CliError> {
    raw.split(',')
        .map(|part| parse_num(what, part.trim()))
        .collect()
}

impl Cli {
    /// Parse arguments (without the program name).
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut options = Options::default();
        let mut positionals: Vec<&str> = Vec::new();
        let mut time = 0.0;
        let mut start = 0;
        let mut count = None;
        let mut example = false;
        let mut help = false;
        let mut version = false;

        let mut iter = args.iter().map(String::as_str);
        while let Some(arg) = iter.next() {
            if !is_option(arg) {
                positionals.push(arg);
                continue;
            }
            if arg == "-h" || arg == "--help" {
                help = true;
                continue;
            }
            if arg == "-V" || arg == "--version" {
                version = true;
                continue;
            }
            if FLAG_OPTIONS.contains(&arg) {
                match arg {
                    "--json" => options.json = true,
                    "--sequential" => options.sequential = true,
                    _ => example = true,
                }
                continue;
            }
            if !VALUE_OPTIONS.contains(&arg) {
                return Err(CliError::usage(format!("unknown option '{}'", arg)));
            }

            let value = iter
                .next()
                .ok_or_else(|| CliError::usage(format!("{} requires a value", arg)))?;
            match arg {
                "--config" => options.config = Some(PathBuf::from(value)),
                "--bounds" => options.bounds = Some(parse_list("bound", value)?),
                "--step" => {
                    let steps: Vec<f64> = parse_list("step", value)?;
                    options.step = Some(match steps.as_slice() {
                        [single] => StepSpec::Uniform(*single),
                        _ => StepSpec::PerAxis(steps),
                    });
                }
                "--rounding" => options.rounding = Some(value.parse().map_err(CliError::Usage)?),
                "--spatial" => options.spatial = Some(value.parse().map_err(CliError::Usage)?),
                "--log-level" => options.log_level = Some(value.parse().map_err(CliError::Usage)?),
                "--time" => time = parse_num("time", value)?,
                "--start" => start = parse_num("start address", value)?,
                _ => count = Some(parse_num("count", value)?),
            }
        }

        if help {
            return Ok(Self {
                options,
                command: Command::Help,
            });
        }
        if version {
            return Ok(Self {
                options,
                command: Command::Version,
            });
        }

        let (name, rest) = positionals
            .split_first()
            .ok_or_else(|| CliError::usage("missing command"))?;

        let command = match *name {
            "encode" => {
                if rest.is_empty() {
                    return Err(CliError::usage("encode requires coordinates"));
                }
                Command::Encode {
                    coords: rest
                        .iter()
                        .map(|raw| parse_num("coordinate", raw))
                        .collect::<Result<_, _>>()?,
                }
            }
            "decode" => Command::Decode {
                address: parse_num("address", single_arg("decode", rest)?)?,
            },
            "locate" => {
                if rest.is_empty() {
                    return Err(CliError::usage("locate requires a point"));
                }
                Command::Locate {
                    point: rest
                        .iter()
                        .map(|raw| parse_num("coordinate", raw))
                        .collect::<Result<_, _>>()?,
                }
            }
            "sample" => Command::Sample {
                address: parse_num("address", single_arg("sample", rest)?)?,
                time,
            },
            "frame" => {
                no_args("frame", rest)?;
                Command::Frame { time, start, count }
            }
            "config" => {
                no_args("config", rest)?;
                Command::Config { example }
            }
            other => return Err(CliError::usage(format!("unknown command '{}'", other))),
        };

        Ok(Self { options, command })
    }
}

fn single_arg<'a>(command: &str, rest: &[&'a str]) -> Result<&'a str, CliError> {
    match rest {
        [one] => Ok(*one),
        [] => Err(CliError::usage(format!("{} requires an address", command))),
        _ => Err(CliError::usage(format!("{} takes exactly one address", command))),
    }
}

fn no_args(command: &str, rest: &[&str]) -> Result<(), CliError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(CliError::usage(format!(
            "unexpected argument '{}' for {}",
            rest[0], command
        )))
    }
}
