//! Tracker configuration loader.

use std::path::Path;

use tracker_core::TrackerConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for tracker configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> LoadResult<TrackerConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML at {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<TrackerConfig> {
        let config: TrackerConfig = toml::from_str(content)?;
        if config.max_roster_size == 0 {
            anyhow::bail!("max_roster_size must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::PersistentDamageTiming;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = ConfigLoader::parse("").unwrap();
        assert_eq!(config, TrackerConfig::default());
    }

    #[test]
    fn parses_timing_and_roster_cap() {
        let config = ConfigLoader::parse(
            r#"
            persistent_damage_timing = "start_of_turn"
            max_roster_size = 12
            "#,
        )
        .unwrap();

        assert_eq!(
            config.persistent_damage_timing,
            PersistentDamageTiming::StartOfTurn
        );
        assert_eq!(config.max_roster_size, 12);
    }

    #[test]
    fn zero_roster_cap_is_rejected() {
        assert!(ConfigLoader::parse("max_roster_size = 0").is_err());
    }
}
