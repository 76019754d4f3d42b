//! Session configuration read from a TOML file.

use machines_td_runtime::SimulationConfig;
use machines_td_system_waves::Config as WaveConfig;
use serde::Deserialize;
use thiserror::Error;

/// Top-level layout of the configuration file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    waves: WaveSection,
}

/// `[waves]` table; omitted keys keep the scheduler defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WaveSection {
    spawn_interval_ticks: u32,
    rounds_per_wave: u32,
    boss_interval: u32,
    max_waves: u32,
    completion_bonus: u32,
}

impl Default for WaveSection {
    fn default() -> Self {
        let defaults = WaveConfig::default();
        Self {
            spawn_interval_ticks: defaults.spawn_interval_ticks(),
            rounds_per_wave: defaults.rounds_per_wave(),
            boss_interval: defaults.boss_interval(),
            max_waves: defaults.max_waves(),
            completion_bonus: defaults.completion_bonus(),
        }
    }
}

impl SessionConfig {
    /// Parses and validates the provided TOML document.
    pub(crate) fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let waves = &self.waves;
        let required = [
            ("waves.spawn_interval_ticks", waves.spawn_interval_ticks),
            ("waves.rounds_per_wave", waves.rounds_per_wave),
            ("waves.boss_interval", waves.boss_interval),
            ("waves.max_waves", waves.max_waves),
        ];
        match required.iter().find(|(_, value)| *value == 0) {
            Some(&(key, _)) => Err(ConfigError::Zero { key }),
            None => Ok(()),
        }
    }

    /// Simulation settings described by this configuration.
    pub(crate) fn simulation(&self) -> SimulationConfig {
        let waves = &self.waves;
        SimulationConfig::new(WaveConfig::new(
            waves.spawn_interval_ticks,
            waves.rounds_per_wave,
            waves.boss_interval,
            waves.max_waves,
            waves.completion_bonus,
        ))
    }
}

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The document is not valid TOML or contains unknown keys.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A key that must be positive was set to zero.
    #[error("`{key}` must be greater than zero")]
    Zero {
        /// Dotted key of the offending value.
        key: &'static str,
    },
}
