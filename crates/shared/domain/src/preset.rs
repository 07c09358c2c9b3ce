//! Preset domain entity: a named price-watch configuration owned by a user.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    MAX_PAIRS_PER_PRESET, MAX_PERCENT, MAX_PRESET_NAME_LENGTH, MIN_PERCENT_EXCLUSIVE,
    PERCENT_DECIMALS, QUOTE_ASSET, SUPPORTED_INTERVALS,
};
use crate::error::{DomainError, DomainResult};

static PRESET_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9а-яА-ЯёЁ\s_-]+$").expect("valid preset name regex"));

static PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^[A-Z0-9]+{}$", QUOTE_ASSET)).expect("valid trading pair regex")
});

/// Candle timeframe watched by a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1s")]
    OneSecond,
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Interval {
    pub const ALL: [Interval; 7] = [
        Interval::OneSecond,
        Interval::OneMinute,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::OneHour,
        Interval::FourHours,
        Interval::OneDay,
    ];

    /// Exchange notation, e.g. `15m`
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneSecond => SUPPORTED_INTERVALS[0],
            Interval::OneMinute => SUPPORTED_INTERVALS[1],
            Interval::FiveMinutes => SUPPORTED_INTERVALS[2],
            Interval::FifteenMinutes => SUPPORTED_INTERVALS[3],
            Interval::OneHour => SUPPORTED_INTERVALS[4],
            Interval::FourHours => SUPPORTED_INTERVALS[5],
            Interval::OneDay => SUPPORTED_INTERVALS[6],
        }
    }
}

impl FromStr for Interval {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .into_iter()
            .find(|interval| interval.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Invalid interval: {}", s)))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the watcher needs to know about one preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetConfig {
    pub preset_name: String,
    pub pairs: Vec<String>,
    pub interval: Interval,
    pub percent: f64,
}

/// Stored preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub preset_id: Uuid,
    pub user_id: i64,
    pub preset_name: String,
    pub pairs: Vec<String>,
    pub interval: Interval,
    pub percent: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub alerts_triggered: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_alert: Option<DateTime<Utc>>,
}

impl Preset {
    pub fn config(&self) -> PresetConfig {
        PresetConfig {
            preset_name: self.preset_name.clone(),
            pairs: self.pairs.clone(),
            interval: self.interval,
            percent: self.percent,
        }
    }
}

/// Presets of one user, grouped for start-up loading
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPresets {
    pub presets: HashMap<Uuid, PresetConfig>,
    pub active_presets: HashSet<Uuid>,
}

impl UserPresets {
    /// Record a preset, marking it active when its flag is set
    pub fn insert(&mut self, preset: &Preset) {
        self.presets.insert(preset.preset_id, preset.config());
        if preset.is_active {
            self.active_presets.insert(preset.preset_id);
        }
    }
}

/// Preset creation data transfer object
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewPreset {
    pub preset_name: String,
    pub pairs: Vec<String>,
    pub interval: Interval,
    pub percent: f64,
    #[serde(default)]
    pub is_active: bool,
}

impl NewPreset {
    /// Validate and normalise the input.
    ///
    /// Names are trimmed, pairs upper-cased and deduplicated, and the
    /// percent rounded to two decimals.
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            preset_name: validate_preset_name(&self.preset_name)?,
            pairs: validate_pairs(&self.pairs)?,
            interval: self.interval,
            percent: validate_percent(self.percent)?,
            is_active: self.is_active,
        })
    }
}

pub fn validate_preset_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("Preset name cannot be empty"));
    }
    if name.chars().count() > MAX_PRESET_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "Preset name too long (max {} characters)",
            MAX_PRESET_NAME_LENGTH
        )));
    }
    if !PRESET_NAME_RE.is_match(name) {
        return Err(DomainError::validation("Preset name contains invalid characters"));
    }
    Ok(name.to_string())
}

pub fn validate_pairs(pairs: &[String]) -> DomainResult<Vec<String>> {
    if pairs.is_empty() {
        return Err(DomainError::validation("Pairs list cannot be empty"));
    }
    if pairs.len() > MAX_PAIRS_PER_PRESET {
        return Err(DomainError::validation(format!(
            "Too many pairs (max {})",
            MAX_PAIRS_PER_PRESET
        )));
    }

    let mut seen = HashSet::new();
    let mut validated = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let pair = pair.trim().to_uppercase();
        if !PAIR_RE.is_match(&pair) {
            return Err(DomainError::validation(format!("Invalid pair format: {}", pair)));
        }
        if seen.insert(pair.clone()) {
            validated.push(pair);
        }
    }
    Ok(validated)
}

pub fn validate_percent(percent: f64) -> DomainResult<f64> {
    if !percent.is_finite() || percent <= MIN_PERCENT_EXCLUSIVE {
        return Err(DomainError::validation("Percent must be positive"));
    }
    if percent > MAX_PERCENT {
        return Err(DomainError::validation(format!(
            "Percent too large (max {}%)",
            MAX_PERCENT
        )));
    }
    let scale = 10f64.powi(PERCENT_DECIMALS);
    Ok((percent * scale).round() / scale)
}
