//! Repository layer for data access.

mod base;
pub mod entities;
mod preset_repository;
mod user_repository;

pub use base::{Pagination, PrimaryKeyOf, ReadRepository, Repository, WriteRepository};
pub use preset_repository::{PresetRepository, PresetStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests
#[cfg(any(test, feature = "test-utils"))]
pub use preset_repository::MockPresetRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
