use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::prompts::store::STUDY_STYLE;

/// Display name for a level key that is not recognised
pub const UNKNOWN_LEVEL_NAME: &str = "未知水平";

/// Difficulty of the generated geography lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    #[default]
    Default,
    Beginner,
    Advanced,
    Practical,
    Professional,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 5] = [
        DifficultyLevel::Default,
        DifficultyLevel::Beginner,
        DifficultyLevel::Advanced,
        DifficultyLevel::Practical,
        DifficultyLevel::Professional,
    ];

    /// Key used in `data-level` attributes and prompt styles
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Default => "default",
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Advanced => "advanced",
            DifficultyLevel::Practical => "practical",
            DifficultyLevel::Professional => "professional",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DifficultyLevel::Default => "小学水平",
            DifficultyLevel::Beginner => "初中水平",
            DifficultyLevel::Advanced => "高中水平",
            DifficultyLevel::Practical => "大学水平",
            DifficultyLevel::Professional => "研究生水平",
        }
    }

    /// Prompt style for this level, e.g. `study.beginner`
    pub fn style(&self) -> String {
        format!("{}.{}", STUDY_STYLE, self.as_str())
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DifficultyLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("Unknown difficulty level: {}", s))
    }
}

/// Display name for a raw level key, with a fallback for unknown keys
pub fn get_level_name(level: &str) -> &'static str {
    level
        .parse::<DifficultyLevel>()
        .map(|l| l.display_name())
        .unwrap_or(UNKNOWN_LEVEL_NAME)
}
