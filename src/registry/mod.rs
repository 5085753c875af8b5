//! Schema registry: discovery, caching and everything derived from the
//! cached schemas

pub mod analysis;
pub mod expression;
pub mod scenario;
pub mod schema_registry;
pub mod slot;
pub mod summary;

pub use analysis::*;
pub use expression::{resolve_full_name, NameContext, COMMON_NAME_COLUMNS, UNKNOWN_NAME};
pub use scenario::*;
pub use schema_registry::*;
pub use slot::*;
pub use summary::*;
