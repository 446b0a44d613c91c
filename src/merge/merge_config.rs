use std::{fmt::Display, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeConfigError {
    #[error("Unrecognized merge option `{0}`, the only supported option is `fallback_on_conflict`")]
    UnrecognizedOption(String),

    #[error(
        "Unrecognized conflict fallback `{0}`, expected one of `previous`, `next` or `current`"
    )]
    UnrecognizedFallback(String),
}

/// Which version wins a conflict that the caller hasn't decided.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fallback {
    /// Keep the common ancestor's content
    Previous,

    /// Take the incoming content
    #[default]
    Next,

    /// Keep the content of the current version
    Current,
}

impl Display for Fallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fallback::Previous => write!(f, "previous"),
            Fallback::Next => write!(f, "next"),
            Fallback::Current => write!(f, "current"),
        }
    }
}

impl FromStr for Fallback {
    type Err = MergeConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "previous" => Ok(Fallback::Previous),
            "next" => Ok(Fallback::Next),
            "current" => Ok(Fallback::Current),
            _ => Err(MergeConfigError::UnrecognizedFallback(value.to_owned())),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub fallback_on_conflict: Fallback,
}

impl MergeConfig {
    pub const FALLBACK_ON_CONFLICT: &'static str = "fallback_on_conflict";

    #[must_use]
    pub fn new(fallback_on_conflict: Fallback) -> Self {
        Self {
            fallback_on_conflict,
        }
    }

    /// Builds a configuration from loosely typed key-value pairs, such as the
    /// ones read from a properties file. Missing options keep their default.
    ///
    /// # Errors
    ///
    /// Returns `MergeConfigError` on the first unknown key or unparsable
    /// value.
    pub fn from_options<I, K, V>(options: I) -> Result<Self, MergeConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();

        for (key, value) in options {
            match key.as_ref() {
                Self::FALLBACK_ON_CONFLICT => {
                    config.fallback_on_conflict = value.as_ref().parse()?;
                }
                unknown => return Err(MergeConfigError::UnrecognizedOption(unknown.to_owned())),
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use test_case::test_case;

    use super::*;

    #[test_case("previous" => Ok(Fallback::Previous))]
    #[test_case("Next" => Ok(Fallback::Next))]
    #[test_case(" CURRENT " => Ok(Fallback::Current))]
    #[test_case("theirs" => Err(MergeConfigError::UnrecognizedFallback("theirs".to_owned())))]
    fn test_parse_fallback(value: &str) -> Result<Fallback, MergeConfigError> { value.parse() }

    #[test]
    fn test_default_falls_back_to_next() {
        assert_eq!(MergeConfig::default().fallback_on_conflict, Fallback::Next);
        assert_eq!(
            MergeConfig::from_options(Vec::<(String, String)>::new()),
            Ok(MergeConfig::default())
        );
    }

    #[test]
    fn test_from_options() {
        assert_eq!(
            MergeConfig::from_options([("fallback_on_conflict", "current")]),
            Ok(MergeConfig::new(Fallback::Current))
        );
    }

    #[test]
    fn test_from_options_rejects_unknown_keys() {
        let error = MergeConfig::from_options([("fallback_on_conflict", "next"), ("strict", "yes")])
            .unwrap_err();

        assert_snapshot!(
            error.to_string(),
            @"Unrecognized merge option `strict`, the only supported option is `fallback_on_conflict`"
        );
    }

    #[test]
    fn test_from_options_rejects_unknown_fallback() {
        let error = MergeConfig::from_options([("fallback_on_conflict", "ours")]).unwrap_err();

        assert_snapshot!(
            error.to_string(),
            @"Unrecognized conflict fallback `ours`, expected one of `previous`, `next` or `current`"
        );
    }
}
