//! CLI command implementations

pub mod cache;
pub mod config;
pub mod find;
pub mod index;
pub mod resolve;

pub use cache::execute as cache;
pub use config::execute as config;
pub use find::execute as find;
pub use index::execute as index;
pub use resolve::execute as resolve;
