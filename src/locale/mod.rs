//! Localized console messages.
//!
//! Every message a maintenance run prints goes through [`Message`], rendered
//! for the active [`Locale`]. English is the default; Japanese is selected by
//! `--lang ja`, `settings.language: ja`, or a `ja*` system locale.

mod messages;

pub use messages::Message;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported message languages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    #[value(name = "en")]
    English,
    #[serde(rename = "ja")]
    #[value(name = "ja")]
    Japanese,
}

/// Environment variables consulted for the system locale, highest priority first.
const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];

impl Locale {
    /// Detect the locale from the process environment.
    pub fn detect() -> Self {
        Self::detect_with_env(|key| std::env::var(key))
    }

    /// Detect the locale with a custom env var lookup function.
    ///
    /// The first non-empty variable decides, the way POSIX resolves them.
    pub fn detect_with_env<F>(env_fn: F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        for var in LOCALE_VARS {
            if let Ok(value) = env_fn(var) {
                if value.is_empty() {
                    continue;
                }
                return if value.to_lowercase().starts_with("ja") {
                    Self::Japanese
                } else {
                    Self::English
                };
            }
        }
        Self::English
    }

    /// Pick the explicit choice if any, otherwise the configured one, otherwise detect.
    pub fn resolve(cli: Option<Locale>, configured: Option<Locale>) -> Self {
        cli.or(configured).unwrap_or_else(Self::detect)
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "ja" | "jp" | "japanese" => Ok(Self::Japanese),
            _ => Err(format!("unknown language: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env::VarError;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, VarError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn defaults_to_english() {
        assert_eq!(Locale::detect_with_env(env_from(&[])), Locale::English);
        assert_eq!(Locale::default(), Locale::English);
    }

    #[test]
    fn detects_japanese_from_lang() {
        let env = env_from(&[("LANG", "ja_JP.UTF-8")]);
        assert_eq!(Locale::detect_with_env(env), Locale::Japanese);
    }

    #[test]
    fn lc_all_overrides_lang() {
        let env = env_from(&[("LC_ALL", "en_US.UTF-8"), ("LANG", "ja_JP.UTF-8")]);
        assert_eq!(Locale::detect_with_env(env), Locale::English);
    }

    #[test]
    fn empty_values_are_skipped() {
        let env = env_from(&[("LC_ALL", ""), ("LC_MESSAGES", "ja_JP")]);
        assert_eq!(Locale::detect_with_env(env), Locale::Japanese);
    }

    #[test]
    fn resolve_prefers_cli_then_config() {
        assert_eq!(
            Locale::resolve(Some(Locale::Japanese), Some(Locale::English)),
            Locale::Japanese
        );
        assert_eq!(
            Locale::resolve(None, Some(Locale::Japanese)),
            Locale::Japanese
        );
    }

    #[test]
    fn parses_names() {
        assert_eq!("ja".parse::<Locale>(), Ok(Locale::Japanese));
        assert_eq!("English".parse::<Locale>(), Ok(Locale::English));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn deserializes_short_codes() {
        let locale: Locale = serde_yaml::from_str("ja").unwrap();
        assert_eq!(locale, Locale::Japanese);
        assert_eq!(serde_yaml::to_string(&Locale::English).unwrap().trim(), "en");
    }
}
