//! Optional TOML file overriding the game rules.

use anyhow::{bail, Context, Result};
use prairie_burn_world::Config;
use std::{fs, path::Path};

const SUPPORTED_RULES_VERSION: u32 = 1;

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesFile {
    version: u32,
    wet_duration: Option<u32>,
    water_quota_divisor: Option<u32>,
    seed: Option<u64>,
}

/// Reads the rules file at `path` and applies it on top of the defaults.
pub(crate) fn load(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file at {}", path.display()))?;
    parse(&contents, Config::default())
        .with_context(|| format!("invalid rules file at {}", path.display()))
}

fn parse(contents: &str, base: Config) -> Result<Config> {
    let rules: RulesFile = toml::from_str(contents).context("failed to parse rules toml")?;
    if rules.version != SUPPORTED_RULES_VERSION {
        bail!(
            "unsupported rules version {}; expected {}",
            rules.version,
            SUPPORTED_RULES_VERSION
        );
    }
    if rules.wet_duration == Some(0) {
        bail!("wet_duration must be at least one step");
    }

    Ok(Config::new(
        rules.wet_duration.unwrap_or(base.wet_duration()),
        rules
            .water_quota_divisor
            .unwrap_or(base.water_quota_divisor()),
        rules.seed.unwrap_or(base.rng_seed()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_keep_defaults() {
        let config = parse("version = 1\nseed = 42\n", Config::default()).expect("valid rules");

        assert_eq!(config, Config::default().with_seed(42));
    }

    #[test]
    fn every_field_can_be_overridden() {
        let rules = r#"
            version = 1
            wet_duration = 4
            water_quota_divisor = 3
            seed = 7
        "#;

        let config = parse(rules, Config::default()).expect("valid rules");

        assert_eq!(config, Config::new(4, 3, 7));
    }

    #[test]
    fn rejects_unknown_versions_and_keys() {
        assert!(parse("version = 2", Config::default()).is_err());
        assert!(parse("version = 1\nspeed = 3", Config::default()).is_err());
        assert!(parse("wet_duration = 3", Config::default()).is_err());
    }

    #[test]
    fn rejects_water_that_never_lasts() {
        let error = parse("version = 1\nwet_duration = 0", Config::default())
            .expect_err("zero duration rejected");
        assert!(error.to_string().contains("wet_duration"));
    }

    #[test]
    fn load_reports_missing_files() {
        let error = load(Path::new("/nonexistent/prairie-burn/rules.toml"))
            .expect_err("missing file");
        assert!(error.to_string().contains("failed to read rules file"));
    }
}
