use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "DEMO";

const DEFAULT_TEMPLATE: &str = "template/index.html";
const DEFAULT_INPUT: &str = "leads.csv";
const DEFAULT_OUTPUT: &str = "output";
const DEFAULT_DELIMITER: &str = ",";

/// Resolved run settings: CLI flag > `DEMO_*` environment > defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub template: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub delimiter: u8,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub template: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub delimiter: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Layered {
    template: PathBuf,
    input: PathBuf,
    output: PathBuf,
    delimiter: String,
}

impl Settings {
    pub fn load(overrides: &Overrides) -> Result<Self> {
        Self::load_with_env(overrides, None)
    }

    /// `env` replaces the process environment; used by tests.
    fn load_with_env(overrides: &Overrides, env: Option<HashMap<String, String>>) -> Result<Self> {
        let path_str = |p: &Option<PathBuf>| p.as_ref().map(|p| p.to_string_lossy().into_owned());

        let layered: Layered = Config::builder()
            .set_default("template", DEFAULT_TEMPLATE)?
            .set_default("input", DEFAULT_INPUT)?
            .set_default("output", DEFAULT_OUTPUT)?
            .set_default("delimiter", DEFAULT_DELIMITER)?
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .set_override_option("template", path_str(&overrides.template))?
            .set_override_option("input", path_str(&overrides.input))?
            .set_override_option("output", path_str(&overrides.output))?
            .set_override_option("delimiter", overrides.delimiter.clone())?
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Invalid settings")?;

        Ok(Settings {
            delimiter: parse_delimiter(&layered.delimiter)?,
            template: layered.template,
            input: layered.input,
            output: layered.output,
        })
    }
}

fn parse_delimiter(s: &str) -> Result<u8> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => bail!("Delimiter must be a single ASCII character, got {:?}", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults() {
        let s = Settings::load_with_env(&Overrides::default(), env(&[])).unwrap();
        assert_eq!(s.template, PathBuf::from("template/index.html"));
        assert_eq!(s.input, PathBuf::from("leads.csv"));
        assert_eq!(s.output, PathBuf::from("output"));
        assert_eq!(s.delimiter, b',');
    }

    #[test]
    fn environment_over_defaults() {
        let s = Settings::load_with_env(
            &Overrides::default(),
            env(&[("DEMO_INPUT", "data/leads.tsv"), ("DEMO_DELIMITER", ";")]),
        )
        .unwrap();
        assert_eq!(s.input, PathBuf::from("data/leads.tsv"));
        assert_eq!(s.delimiter, b';');
        assert_eq!(s.output, PathBuf::from("output"));
    }

    #[test]
    fn cli_over_environment() {
        let overrides = Overrides {
            output: Some(PathBuf::from("public")),
            ..Default::default()
        };
        let s = Settings::load_with_env(&overrides, env(&[("DEMO_OUTPUT", "site")])).unwrap();
        assert_eq!(s.output, PathBuf::from("public"));
    }

    #[test]
    fn rejects_bad_delimiter() {
        let overrides = Overrides {
            delimiter: Some("::".into()),
            ..Default::default()
        };
        assert!(Settings::load_with_env(&overrides, env(&[])).is_err());
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("§").is_err());
        assert_eq!(parse_delimiter("\t").unwrap(), b'\t');
    }
}
