//! Enumerations and token handling for task fields.
//!
//! This module defines the task `Category` along with the canonical tokens used
//! in the task file, and the boolean tokens used for the priority flag. File
//! parsing and user input share the same rules: tokens are trimmed and matched
//! case-insensitively, while writing always produces the canonical form.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

/// Fixed classification of a task.
#[derive(Debug, Clone, Copy, Serialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[value(alias = "persona")]
    Personal,
    #[value(alias = "trabajo")]
    Work,
    #[value(alias = "ocio")]
    Leisure,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Personal, Category::Work, Category::Leisure];

    /// Token written to the task file.
    pub fn token(self) -> &'static str {
        match self {
            Category::Personal => "Persona",
            Category::Work => "Trabajo",
            Category::Leisure => "Ocio",
        }
    }

    /// English label used in console output.
    pub fn label(self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Work => "Work",
            Category::Leisure => "Leisure",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid category '{0}', expected one of: persona, trabajo, ocio (or personal, work, leisure)")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "persona" | "personal" => Ok(Category::Personal),
            "trabajo" | "work" => Ok(Category::Work),
            "ocio" | "leisure" => Ok(Category::Leisure),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid boolean '{0}', expected 'true' or 'false'")]
pub struct ParseBoolError(pub String);

/// Parse a priority flag token ("true"/"false", any case).
pub fn parse_bool(s: &str) -> Result<bool, ParseBoolError> {
    match s.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseBoolError(s.to_string())),
    }
}

/// Format a priority flag as written to the task file.
pub fn format_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// Format a priority flag for display.
pub fn format_priority(high: bool) -> &'static str {
    if high {
        "High"
    } else {
        "Low"
    }
}
