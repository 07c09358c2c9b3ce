//! Application services layer - Use cases over the repositories.
//!
//! Services depend on repository traits, not on SeaORM, and add the
//! not-found and validation rules the repositories leave out.

mod preset_service;
mod state_service;
mod user_service;

pub use preset_service::{PresetManager, PresetService};
pub use state_service::{StateLoader, StateService};
pub use user_service::{UserManager, UserService};
