use serde::{Deserialize, Serialize};

/// Brewhouse defaults, loadable from a `runnings.toml` file. Command-line
/// flags override whatever is set here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Boil-off rate in gallons per hour.
    #[serde(default = "default_boil_off_rate")]
    pub boil_off_rate: f64,

    /// Boil duration in minutes.
    #[serde(default = "default_boil_duration")]
    pub boil_duration: f64,

    /// Cooling shrinkage as a percentage of the post-boil volume.
    #[serde(default = "default_shrinkage_pct")]
    pub shrinkage_pct: f64,

    /// Use runnings in the order given instead of sorting by gravity.
    #[serde(default)]
    pub keep_order: bool,
}

fn default_boil_off_rate() -> f64 {
    0.785
}

fn default_boil_duration() -> f64 {
    60.0
}

fn default_shrinkage_pct() -> f64 {
    4.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            boil_off_rate: default_boil_off_rate(),
            boil_duration: default_boil_duration(),
            shrinkage_pct: default_shrinkage_pct(),
            keep_order: false,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::empty();
        assert_eq!(config.boil_off_rate, 0.785);
        assert_eq!(config.boil_duration, 60.0);
        assert_eq!(config.shrinkage_pct, 4.0);
        assert!(!config.keep_order);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: Config = toml::from_str("boil_off_rate = 1.7\nkeep_order = true\n").unwrap();
        assert_eq!(config.boil_off_rate, 1.7);
        assert_eq!(config.boil_duration, 60.0);
        assert_eq!(config.shrinkage_pct, 4.0);
        assert!(config.keep_order);
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.boil_duration, 60.0);
    }
}
