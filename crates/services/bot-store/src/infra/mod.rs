//! Infrastructure layer - database connection, schema and transactions.

mod db;
pub mod migrations;
mod transaction;

pub use db::Database;
pub use migrations::Migrator;
pub use transaction::run_in_transaction;
