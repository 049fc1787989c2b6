//! Engine configuration and the string option interface.

use std::path::PathBuf;

use thiserror::Error;

use crate::engines::engine_trait::GoParams;
use crate::search::difficulty::Difficulty;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineConfigError {
    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option {name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub difficulty: Difficulty,
    /// Overrides the difficulty's default depth.
    pub max_depth: Option<u8>,
    /// Overrides the difficulty's default time budget.
    pub move_time_ms: Option<u64>,
    /// Directory holding versioned evaluation tables. No persistence when
    /// unset.
    pub cache_dir: Option<PathBuf>,
    pub tolerate_version_mismatch: bool,
    /// Fixed seed for candidate selection.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            max_depth: None,
            move_time_ms: None,
            cache_dir: None,
            tolerate_version_mismatch: false,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Set one option by name. Names are matched case-insensitively.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineConfigError> {
        let value = value.trim();
        let invalid = |reason: String| EngineConfigError::InvalidValue {
            name: name.to_owned(),
            value: value.to_owned(),
            reason,
        };

        match name.trim().to_ascii_lowercase().as_str() {
            "difficulty" => {
                self.difficulty = value.parse().map_err(invalid)?;
            }
            "maxdepth" => {
                let depth: u8 = value.parse().map_err(|e| invalid(format!("{e}")))?;
                if depth == 0 {
                    return Err(invalid("depth must be positive".to_owned()));
                }
                self.max_depth = Some(depth);
            }
            "movetimems" => {
                self.move_time_ms = Some(value.parse().map_err(|e| invalid(format!("{e}")))?);
            }
            "cachedir" => {
                self.cache_dir = if value.is_empty() || value == "<empty>" {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "tolerateversionmismatch" => {
                self.tolerate_version_mismatch =
                    value.parse().map_err(|e| invalid(format!("{e}")))?;
            }
            "seed" => {
                self.seed = Some(value.parse().map_err(|e| invalid(format!("{e}")))?);
            }
            _ => return Err(EngineConfigError::UnknownOption(name.to_owned())),
        }
        Ok(())
    }

    pub fn effective_difficulty(&self, params: &GoParams) -> Difficulty {
        params.difficulty.unwrap_or(self.difficulty)
    }

    pub fn effective_depth(&self, params: &GoParams) -> u8 {
        params
            .depth
            .or(self.max_depth)
            .unwrap_or_else(|| self.effective_difficulty(params).default_depth())
            .max(1)
    }

    pub fn effective_move_time_ms(&self, params: &GoParams) -> u64 {
        params
            .movetime_ms
            .or(self.move_time_ms)
            .unwrap_or_else(|| self.effective_difficulty(params).default_move_time_ms())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{EngineConfig, EngineConfigError};
    use crate::engines::engine_trait::GoParams;
    use crate::search::difficulty::Difficulty;

    #[test]
    fn options_are_parsed_case_insensitively() {
        let mut config = EngineConfig::default();
        config.set_option("Difficulty", "hard").expect("difficulty");
        config.set_option("MaxDepth", "5").expect("depth");
        config.set_option("MoveTimeMs", "250").expect("time");
        config.set_option("CacheDir", "/tmp/coral").expect("dir");
        config
            .set_option("TolerateVersionMismatch", "true")
            .expect("tolerance");
        config.set_option("seed", "42").expect("seed");

        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.max_depth, Some(5));
        assert_eq!(config.move_time_ms, Some(250));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/coral")));
        assert!(config.tolerate_version_mismatch);
        assert_eq!(config.seed, Some(42));

        config.set_option("CacheDir", "").expect("clear dir");
        assert_eq!(config.cache_dir, None);
    }

    #[test]
    fn bad_options_are_rejected_without_change() {
        let mut config = EngineConfig::default();
        assert_eq!(
            config.set_option("Hash", "64"),
            Err(EngineConfigError::UnknownOption("Hash".to_owned()))
        );
        assert!(matches!(
            config.set_option("MaxDepth", "0"),
            Err(EngineConfigError::InvalidValue { .. })
        ));
        assert!(config.set_option("Difficulty", "brutal").is_err());
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn go_params_override_configuration() {
        let config = EngineConfig::for_difficulty(Difficulty::Easy);
        let defaults = GoParams::default();
        assert_eq!(config.effective_depth(&defaults), 2);
        assert_eq!(config.effective_move_time_ms(&defaults), 500);

        let params = GoParams {
            depth: Some(6),
            difficulty: Some(Difficulty::Hard),
            ..GoParams::default()
        };
        assert_eq!(config.effective_depth(&params), 6);
        assert_eq!(config.effective_move_time_ms(&params), 4000);
        assert_eq!(config.effective_difficulty(&params), Difficulty::Hard);
    }
}
