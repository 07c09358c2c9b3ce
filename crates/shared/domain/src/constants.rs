//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Users
// =============================================================================

/// Running flag assigned to newly created users
pub const DEFAULT_IS_RUNNING: bool = false;

// =============================================================================
// Presets
// =============================================================================

/// Maximum preset name length after trimming
pub const MAX_PRESET_NAME_LENGTH: usize = 50;

/// Maximum number of trading pairs watched by one preset
pub const MAX_PAIRS_PER_PRESET: usize = 500;

/// Quote asset every watched pair must be priced in
pub const QUOTE_ASSET: &str = "USDT";

/// Smallest accepted change threshold is anything above zero
pub const MIN_PERCENT_EXCLUSIVE: f64 = 0.0;

/// Largest accepted change threshold, in percent
pub const MAX_PERCENT: f64 = 1000.0;

/// Decimal places kept on a change threshold
pub const PERCENT_DECIMALS: i32 = 2;

// =============================================================================
// Intervals
// =============================================================================

/// Candle timeframes a preset can watch, in ascending order
pub const SUPPORTED_INTERVALS: &[&str] = &["1s", "1m", "5m", "15m", "1h", "4h", "1d"];
