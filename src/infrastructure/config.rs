//! Registry configuration

use anyhow::{ensure, Context, Result};
use config::{Config, Environment};

use crate::domain::value_objects::RegistrySettings;

/// Loads [`RegistrySettings`] from the environment
///
/// Every setting may be overridden with a `POPREG_`-prefixed variable, e.g.
/// `POPREG_WALKING_TIREDNESS_DISTANCE=7.5` or `POPREG_DISTANCE_UNITS=miles`.
/// Anything unset keeps its default.
pub struct RegistryConfig;

impl RegistryConfig {
    /// Load configuration from an optional `.env` file and the process environment
    pub fn from_env() -> Result<RegistrySettings> {
        dotenvy::dotenv().ok();
        Self::from_source(Environment::with_prefix("POPREG"))
    }

    fn from_source(env: Environment) -> Result<RegistrySettings> {
        let settings: RegistrySettings = Config::builder()
            .add_source(env.try_parsing(true))
            .build()
            .context("failed to read registry configuration")?
            .try_deserialize()
            .context("invalid registry configuration")?;

        ensure!(
            settings.walking_tiredness_distance >= 0.0 && settings.running_tiredness_distance >= 0.0,
            "tiredness distances must not be negative"
        );
        ensure!(
            settings.max_living_parents > 0,
            "POPREG_MAX_LIVING_PARENTS must be at least 1"
        );
        ensure!(
            !settings.distance_units.trim().is_empty(),
            "POPREG_DISTANCE_UNITS must not be blank"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("POPREG").source(Some(map))
    }

    #[test]
    fn test_defaults_without_overrides() {
        let settings = RegistryConfig::from_source(env(&[])).unwrap();
        assert_eq!(settings, RegistrySettings::default());
    }

    #[test]
    fn test_overrides_from_prefixed_variables() {
        let settings = RegistryConfig::from_source(env(&[
            ("POPREG_WALKING_TIREDNESS_DISTANCE", "7.5"),
            ("POPREG_DISTANCE_UNITS", "miles"),
            ("POPREG_MAX_LIVING_PARENTS", "3"),
        ]))
        .unwrap();
        assert_eq!(settings.walking_tiredness_distance, 7.5);
        assert_eq!(settings.distance_units, "miles");
        assert_eq!(settings.max_living_parents, 3);
        assert_eq!(settings.running_tiredness_distance, 1.0);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(RegistryConfig::from_source(env(&[("POPREG_MAX_LIVING_PARENTS", "0")])).is_err());
        assert!(
            RegistryConfig::from_source(env(&[("POPREG_MAX_LIVING_PARENTS", "lots")])).is_err()
        );
    }
}
