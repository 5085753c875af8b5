pub mod cli;
pub mod config;
pub mod registry;
pub mod schema;
pub mod source;

pub use cli::{Cli, Commands};
pub use config::DiscoveryConfig;
pub use registry::{RegistrySlot, SchemaRegistry};
pub use schema::{ColumnCategory, TableIdentifier, TableSchema};
pub use source::{MetadataSource, SqliteSource};
