//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Users and their price-watch presets are shared by the storage layer and
//! whatever drives the bot.

pub mod constants;
pub mod error;
pub mod preset;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use preset::{Interval, NewPreset, Preset, PresetConfig, UserPresets};
pub use user::{validate_user_id, User, UserState};
