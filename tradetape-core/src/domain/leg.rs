//! Leg classification — the composite `Type` column of the export.
//!
//! Each raw row carries a `Type` such as `"Entry Long"` or `"Exit Short"`.
//! This is the only place that string is interpreted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = LegParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(Direction::Long),
            "short" => Ok(Direction::Short),
            _ => Err(LegParseError::UnknownDirection(s.to_string())),
        }
    }
}

/// Which side of a round trip a row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegRole {
    Entry,
    Exit,
}

impl FromStr for LegRole {
    type Err = LegParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entry" => Ok(LegRole::Entry),
            "exit" => Ok(LegRole::Exit),
            _ => Err(LegParseError::UnknownRole(s.to_string())),
        }
    }
}

/// Parsed form of the `Type` column: role plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegType {
    pub role: LegRole,
    pub direction: Direction,
}

impl FromStr for LegType {
    type Err = LegParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let (Some(role), Some(direction), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(LegParseError::Malformed(s.to_string()));
        };
        Ok(LegType {
            role: role.parse()?,
            direction: direction.parse()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LegParseError {
    #[error("expected \"<Entry|Exit> <Long|Short>\", got {0:?}")]
    Malformed(String),

    #[error("unknown leg role {0:?}")]
    UnknownRole(String),

    #[error("unknown direction {0:?}")]
    UnknownDirection(String),
}
