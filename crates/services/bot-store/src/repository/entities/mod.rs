//! SeaORM entities for the bot's tables.

pub mod preset;
pub mod user;
