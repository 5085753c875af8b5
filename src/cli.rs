use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Catalog name used when neither the flags nor the config file set one
pub const DEFAULT_CATALOG: &str = "local";

/// SQLite schema name used when neither the flags nor the config file set one
pub const DEFAULT_DATASET: &str = "main";

#[derive(Parser, Debug)]
#[command(name = "column-discovery")]
#[command(version, about = "Discover table schemas and infer column semantics")]
pub struct Cli {
    /// JSON config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog name used in cache keys
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// Dataset (attached SQLite schema) holding the tables
    #[arg(long, global = true)]
    pub dataset: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover tables and print their schemas as JSON
    Discover {
        /// SQLite database path
        db: PathBuf,

        /// Tables to discover
        #[arg(required = true)]
        tables: Vec<String>,
    },

    /// Print the SQL expression for a person's full name
    FullName {
        /// SQLite database path
        db: PathBuf,

        table: String,
    },

    /// Print the physical column for a logical field
    Map {
        /// SQLite database path
        db: PathBuf,

        table: String,

        /// Logical field, e.g. customer_id or hire_date
        field: String,
    },

    /// Analyze a derivation expression against a table
    Analyze {
        /// SQLite database path
        db: PathBuf,

        table: String,

        /// Free-text derivation logic
        logic: String,
    },

    /// Discover every table named in a JSON scenario file and print a summary
    Scenarios {
        /// SQLite database path
        db: PathBuf,

        /// JSON array of scenario records
        scenarios: PathBuf,
    },

    /// List configured tables
    ListTables {
        /// SQLite database path
        db: PathBuf,
    },

    /// Describe a table's columns, name fields and mappings
    Describe {
        /// SQLite database path
        db: PathBuf,

        table: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
