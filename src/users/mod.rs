#[cfg(test)]
pub mod memory;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use repo::{PgUserStore, UserStore};
pub use repo_types::{User, UserWrite};
pub use services::IdentityStore;
