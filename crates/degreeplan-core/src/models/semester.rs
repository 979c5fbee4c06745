//! Seasons and semester identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// Academic season, restricted to the four values the store accepts.
///
/// Declaration order is the chronological order within a calendar year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Two-letter code used by the terms table.
    pub fn code(&self) -> &'static str {
        match self {
            Season::Fall => "fa",
            Season::Spring => "sp",
            Season::Summer => "su",
            Season::Winter => "wi",
        }
    }

    /// Long form, as in "Fall 2024".
    pub fn long_name(&self) -> &'static str {
        match self {
            Season::Fall => "Fall",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Winter => "Winter",
        }
    }

    /// Abbreviated form, as in "Fa 2024".
    pub fn short_name(&self) -> &'static str {
        match self {
            Season::Fall => "Fa",
            Season::Spring => "Sp",
            Season::Summer => "Su",
            Season::Winter => "Wi",
        }
    }

    /// Parses a store code (`fa`, `sp`, `su`, `wi`).
    pub fn from_code(code: &str) -> Option<Season> {
        Season::ALL.into_iter().find(|s| s.code() == code)
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fall" | "fa" => Ok(Season::Fall),
            "spring" | "sp" => Ok(Season::Spring),
            "summer" | "su" => Ok(Season::Summer),
            "winter" | "wi" => Ok(Season::Winter),
            _ => Err(format!("Invalid season: {s}")),
        }
    }
}

/// Deterministic semester container id, rendered as `FALL2024`.
///
/// Ordering is chronological: by year, then by season.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct SemesterId {
    pub year: u16,
    pub season: Season,
}

impl SemesterId {
    pub fn new(season: Season, year: u16) -> Self {
        Self { year, season }
    }

    /// "Fall 2024"
    pub fn long_name(&self) -> String {
        format!("{} {}", self.season.long_name(), self.year)
    }

    /// "Fa 2024"
    pub fn short_name(&self) -> String {
        format!("{} {}", self.season.short_name(), self.year)
    }

    /// Parses a semester name in either the long ("Fall 2024") or the
    /// abbreviated ("Fa 2024") form. Case-insensitive.
    pub fn from_name(name: &str) -> Result<Self> {
        let invalid = || PlanError::InvalidSemesterName(name.to_string());
        let mut parts = name.split_whitespace();
        let (Some(season), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let season = season.parse::<Season>().map_err(|_| invalid())?;
        let year = parse_year(year).ok_or_else(invalid)?;
        Ok(Self { year, season })
    }

    /// Normalizes a semester name to its long form.
    pub fn canonical_name(name: &str) -> Result<String> {
        Self::from_name(name).map(|id| id.long_name())
    }
}

fn parse_year(s: &str) -> Option<u16> {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

impl fmt::Display for SemesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.season.long_name().to_uppercase(), self.year)
    }
}

impl FromStr for SemesterId {
    type Err = PlanError;

    /// Accepts `FALL2024` or `FA2024`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PlanError::InvalidSemesterId(s.to_string());
        let upper = s.trim().to_uppercase();
        let split = upper.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
        let (season, year) = upper.split_at(split);
        if season.is_empty() || !season.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(invalid());
        }
        let season = match season {
            "FALL" | "FA" => Season::Fall,
            "SPRING" | "SP" => Season::Spring,
            "SUMMER" | "SU" => Season::Summer,
            "WINTER" | "WI" => Season::Winter,
            _ => return Err(invalid()),
        };
        let year = parse_year(year).ok_or_else(invalid)?;
        Ok(Self { year, season })
    }
}

impl TryFrom<String> for SemesterId {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SemesterId> for String {
    fn from(id: SemesterId) -> Self {
        id.to_string()
    }
}
