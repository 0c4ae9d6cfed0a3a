pub mod auth;
pub mod database;
pub mod error;
pub mod impls;
pub mod model;
pub mod snapshot;
pub mod store;

pub use auth::AdminGrant;
pub use database::Database;
pub use error::{CoreError, SnapshotError};
pub use store::{Transaction, UserStateStore};
