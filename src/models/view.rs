use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Watched-state filter applied to the displayed list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Watched,
    Unwatched,
}

impl FilterMode {
    pub fn matches(self, watched: bool) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Watched => watched,
            FilterMode::Unwatched => !watched,
        }
    }
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::All => write!(f, "all"),
            FilterMode::Watched => write!(f, "watched"),
            FilterMode::Unwatched => write!(f, "unwatched"),
        }
    }
}

impl FromStr for FilterMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "watched" => Ok(FilterMode::Watched),
            "unwatched" => Ok(FilterMode::Unwatched),
            other => Err(AppError::InvalidInput(format!("Unknown filter mode: {}", other))),
        }
    }
}

/// Which view input changed most recently and therefore decides the displayed list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewDriver {
    Search,
    #[default]
    Filter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_mode_parse() {
        assert_eq!("all".parse::<FilterMode>().unwrap(), FilterMode::All);
        assert_eq!("Watched".parse::<FilterMode>().unwrap(), FilterMode::Watched);
        assert_eq!(" unwatched ".parse::<FilterMode>().unwrap(), FilterMode::Unwatched);
        assert!("seen".parse::<FilterMode>().is_err());
    }

    #[test]
    fn test_filter_mode_serde() {
        let json = serde_json::to_string(&FilterMode::Unwatched).unwrap();
        assert_eq!(json, r#""unwatched""#);
        assert_eq!(FilterMode::Watched.to_string(), "watched");
    }

    #[test]
    fn test_filter_mode_matches() {
        assert!(FilterMode::All.matches(true));
        assert!(FilterMode::All.matches(false));
        assert!(FilterMode::Watched.matches(true));
        assert!(!FilterMode::Watched.matches(false));
        assert!(FilterMode::Unwatched.matches(false));
    }
}
