use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use color_eyre::eyre::{WrapErr, bail};
use log::info;
use sequencer::Timings;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG: &str = "cube_config.toml";

/// Settings read from the TOML configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CubeConfig {
    pub timings: TimingsConfig,
    pub simulation: SimulationConfig,
}

/// Animation timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingsConfig {
    pub rotate_ms: u64,
    pub pause_ms: u64,
    pub scramble_rotate_ms: u64,
    pub scramble_pause_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Length of one simulated frame of `play`.
    pub frame_ms: u64,
    /// Seed used when no `--seed` is given. Unseeded runs are random.
    pub seed: Option<u64>,
}

impl Default for TimingsConfig {
    fn default() -> Self {
        let timings = Timings::default();
        TimingsConfig {
            rotate_ms: millis(timings.rotate),
            pause_ms: millis(timings.pause),
            scramble_rotate_ms: millis(timings.scramble_rotate),
            scramble_pause_ms: millis(timings.scramble_pause),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            frame_ms: 16,
            seed: None,
        }
    }
}

impl TimingsConfig {
    pub fn to_timings(&self) -> Timings {
        Timings {
            rotate: Duration::from_millis(self.rotate_ms),
            pause: Duration::from_millis(self.pause_ms),
            scramble_rotate: Duration::from_millis(self.scramble_rotate_ms),
            scramble_pause: Duration::from_millis(self.scramble_pause_ms),
        }
    }
}

impl SimulationConfig {
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

impl CubeConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> color_eyre::Result<CubeConfig> {
        let config = toml::from_str::<CubeConfig>(text)?;

        if config.timings.rotate_ms == 0 || config.timings.scramble_rotate_ms == 0 {
            bail!("Rotation times must be at least 1 ms");
        }
        if config.simulation.frame_ms == 0 {
            bail!("The simulation frame must be at least 1 ms");
        }

        Ok(config)
    }

    /// Load the configuration at `path`, or the default file when `path` is
    /// `None`. A missing default file means built-in defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> color_eyre::Result<CubeConfig> {
        let (path, explicit) = match path {
            Some(path) => (path.to_owned(), true),
            None => (PathBuf::from(DEFAULT_CONFIG), false),
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !explicit => {
                info!("No {} found, using the default configuration", path.display());
                return Ok(CubeConfig::default());
            }
            Err(e) => {
                return Err(e).wrap_err_with(|| {
                    format!("Failed to read the configuration file {}", path.display())
                });
            }
        };

        CubeConfig::from_toml(&text)
            .wrap_err_with(|| format!("Failed to parse the configuration file {}", path.display()))
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn defaults_match_the_sequencer() {
        let config = CubeConfig::default();
        assert_eq!(config.timings.to_timings(), Timings::default());
        assert_eq!(config.simulation.frame(), Duration::from_millis(16));
        assert_eq!(config.simulation.seed, None);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let config = CubeConfig::from_toml(
            "
            [timings]
            rotate_ms = 100

            [simulation]
            seed = 42
            ",
        )
        .unwrap();

        assert_eq!(config.timings.rotate_ms, 100);
        assert_eq!(config.timings.pause_ms, 1250);
        assert_eq!(config.simulation.frame_ms, 16);
        assert_eq!(config.simulation.seed, Some(42));
    }

    #[test]
    fn empty_file_is_the_default() {
        assert_eq!(CubeConfig::from_toml("").unwrap(), CubeConfig::default());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(CubeConfig::from_toml("[timings]\nrotate_ms = 0").is_err());
        assert!(CubeConfig::from_toml("[simulation]\nframe_ms = 0").is_err());
        assert!(CubeConfig::from_toml("[timings]\nspin_ms = 3").is_err());
        assert!(CubeConfig::from_toml("[timings]\nrotate_ms = \"fast\"").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[timings]\nscramble_pause_ms = 5").unwrap();

        let config = CubeConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.timings.scramble_pause_ms, 5);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CubeConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = CubeConfig {
            simulation: SimulationConfig {
                frame_ms: 33,
                seed: Some(7),
            },
            ..CubeConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(CubeConfig::from_toml(&text).unwrap(), config);
    }
}
