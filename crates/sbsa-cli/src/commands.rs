//! Command execution.
//!
//! Every command returns its textual result; `main` prints it and maps
//! errors to exit codes.

use serde_json::json;
use tracing::{debug, info};

use sbsa_core::observe::init_logging;
use sbsa_core::{sample_frame, Cell, DomainError, Hypercube, SbsaConfig};

use crate::args::{Cli, Command, Options, USAGE};
use crate::error::CliError;

/// Parse `args` (without the program name) and run the command.
pub fn run(args: &[String]) -> Result<String, CliError> {
    let cli = Cli::parse(args)?;
    match cli.command {
        Command::Help => return Ok(USAGE.to_string()),
        Command::Version => return Ok(format!("sbsa {}", env!("CARGO_PKG_VERSION"))),
        Command::Config { example: true } => return Ok(SbsaConfig::example_yaml()),
        _ => {}
    }

    let config = load_config(&cli.options)?;
    init_logging(&config.logging)?;
    debug!(command = ?cli.command, "running command");

    execute(&cli, &config)
}

/// Load the configuration file, apply command-line overrides and validate
/// the merged result.
pub fn load_config(options: &Options) -> Result<SbsaConfig, CliError> {
    let mut config = match options.config {
        Some(ref path) => SbsaConfig::load_from(path)?,
        None => SbsaConfig::load()?,
    };

    if let Some(ref bounds) = options.bounds {
        config.dimensions = bounds.len();
        config.bounds = bounds.clone();
    }
    if let Some(ref step) = options.step {
        config.quantization_step = step.clone();
    }
    if let Some(rounding) = options.rounding {
        config.rounding = rounding;
    }
    if let Some(spatial) = options.spatial {
        config.spatial_phase = spatial;
    }
    if let Some(level) = options.log_level {
        config.logging.level = level;
    }
    config.validate()?;
    Ok(config)
}

fn execute(cli: &Cli, config: &SbsaConfig) -> Result<String, CliError> {
    let json_out = cli.options.json;

    match cli.command {
        Command::Encode { ref coords } => {
            let cube = config.to_hypercube()?;
            let coords = unsigned_coords(&cube, coords)?;
            let address = cube.encode(&coords)?;
            let cell = Cell { address, coords };
            if json_out {
                Ok(serde_json::to_string(&cell)?)
            } else {
                Ok(address.to_string())
            }
        }
        Command::Decode { address } => {
            let cube = config.to_hypercube()?;
            let cell = Cell {
                address,
                coords: cube.decode(address)?,
            };
            if json_out {
                Ok(serde_json::to_string(&cell)?)
            } else {
                Ok(join(&cell.coords))
            }
        }
        Command::Locate { ref point } => {
            let cube = config.to_hypercube()?;
            let quantizer = config.to_quantizer()?;
            let cell = cube.locate(point, &quantizer)?;
            if json_out {
                Ok(serde_json::to_string(&cell)?)
            } else {
                Ok(format!("{} {}", cell.address, join(&cell.coords)))
            }
        }
        Command::Sample { address, time } => {
            let field = config.to_wave_field()?;
            let value = field.sample(address, time)?;
            if json_out {
                Ok(json!({ "address": address, "time": time, "value": value }).to_string())
            } else {
                Ok(value.to_string())
            }
        }
        Command::Frame { time, start, count } => {
            let field = config.to_wave_field()?;
            let capacity = field.hypercube().capacity();
            let max_len = config.sampling.max_frame_len as u64;

            let count = count.unwrap_or_else(|| capacity.saturating_sub(start).min(max_len));
            if count > max_len {
                return Err(CliError::usage(format!(
                    "frame of {} cells exceeds sampling.max_frame_len ({})",
                    count, max_len
                )));
            }
            let end = start
                .checked_add(count)
                .ok_or(DomainError::RangeOutOfBounds {
                    start,
                    end: u64::MAX,
                    capacity,
                })?;

            let parallel = config.sampling.parallel && !cli.options.sequential;
            let frame = sample_frame(&field, start..end, time, parallel)?;
            info!(start, len = frame.len(), time, parallel, "frame sampled");

            if json_out {
                Ok(serde_json::to_string(&frame)?)
            } else {
                Ok(frame
                    .pairs()
                    .map(|(address, value)| format!("{} {}", address, value))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
        Command::Config { .. } => Ok(serde_yaml::to_string(config)?),
        Command::Help | Command::Version => Ok(String::new()),
    }
}

/// Convert signed command-line coordinates, reporting negatives against the
/// axis bound.
fn unsigned_coords(cube: &Hypercube, coords: &[i128]) -> Result<Vec<u64>, DomainError> {
    if coords.len() != cube.dimensions() {
        return Err(DomainError::ArityMismatch {
            expected: cube.dimensions(),
            actual: coords.len(),
        });
    }
    coords
        .iter()
        .zip(cube.bounds())
        .enumerate()
        .map(|(axis, (&c, &bound))| {
            u64::try_from(c).map_err(|_| DomainError::CoordOutOfBound {
                axis,
                value: c,
                bound,
            })
        })
        .collect()
}

fn join(coords: &[u64]) -> String {
    coords
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
