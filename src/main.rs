use anyhow::{Context, Result};
use column_discovery::{
    cli::{Cli, Commands, DEFAULT_CATALOG, DEFAULT_DATASET},
    registry::{RegistrySlot, Scenario, SchemaRegistry},
    DiscoveryConfig, SqliteSource, TableSchema,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Everything a command needs: the slot owning the registry plus the
/// resolved catalog/dataset
struct Session {
    slot: RegistrySlot,
    catalog: String,
    dataset: String,
}

impl Session {
    fn open(cli: &Cli, db: &Path) -> Result<Self> {
        let config = DiscoveryConfig::load(cli.config.as_deref())
            .context("Failed to load configuration")?;

        let catalog = cli
            .catalog
            .clone()
            .or_else(|| config.catalog.clone())
            .unwrap_or_else(|| DEFAULT_CATALOG.to_string());
        let dataset = cli
            .dataset
            .clone()
            .or_else(|| config.dataset.clone())
            .unwrap_or_else(|| DEFAULT_DATASET.to_string());

        let source = SqliteSource::open(db)
            .with_context(|| format!("Failed to open database {:?}", db))?;
        let mut session = Self {
            slot: RegistrySlot::new(Rc::new(source)),
            catalog,
            dataset,
        };

        session
            .registry()
            .set_sample_dataset(config.sample_dataset.as_str());

        let seeded = config
            .seed(session.registry())
            .context("Failed to seed configured tables")?;
        if seeded > 0 {
            tracing::info!(tables = seeded, "Seeded configured tables");
        }

        Ok(session)
    }

    fn registry(&mut self) -> &mut SchemaRegistry {
        self.slot
            .get(Some(self.catalog.as_str()), Some(self.dataset.as_str()))
    }

    fn discover(&mut self, table: &str) -> Rc<TableSchema> {
        let (catalog, dataset) = (self.catalog.clone(), self.dataset.clone());
        self.registry().discover(&catalog, &dataset, table)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Discover { db, tables } => {
            let mut session = Session::open(&cli, db)?;
            let schemas: BTreeMap<&str, Rc<TableSchema>> = tables
                .iter()
                .map(|t| (t.as_str(), session.discover(t)))
                .collect();
            let schemas: BTreeMap<&str, &TableSchema> =
                schemas.iter().map(|(t, s)| (*t, s.as_ref())).collect();
            print_json(&schemas)?;
        }

        Commands::FullName { db, table } => {
            let mut session = Session::open(&cli, db)?;
            println!("{}", session.registry().full_name_expression(table));
        }

        Commands::Map { db, table, field } => {
            let mut session = Session::open(&cli, db)?;
            session.discover(table);
            println!("{}", session.registry().map_column(table, field));
        }

        Commands::Analyze { db, table, logic } => {
            let mut session = Session::open(&cli, db)?;
            session.discover(table);
            let analysis = session.registry().analyze_derivation_logic(logic, table);
            print_json(&analysis)?;
        }

        Commands::Scenarios { db, scenarios } => {
            let text = fs::read_to_string(scenarios)
                .with_context(|| format!("Failed to read scenarios {:?}", scenarios))?;
            let records: Vec<Scenario> =
                serde_json::from_str(&text).context("Failed to parse scenarios")?;

            let mut session = Session::open(&cli, db)?;
            let registry = session.registry();
            let discovered = registry.discover_all_from_scenarios(&records);
            tracing::info!(tables = discovered.len(), "Discovered scenario tables");
            print_json(&registry.summarize())?;
        }

        Commands::ListTables { db } => {
            let mut session = Session::open(&cli, db)?;
            let mut keys: Vec<&str> = session.registry().cache_keys().collect();
            keys.sort_unstable();

            if keys.is_empty() {
                println!("No configured tables");
            } else {
                println!("Configured tables:\n");
                for key in keys {
                    println!("  {}", key);
                }
            }
        }

        Commands::Describe { db, table } => {
            let mut session = Session::open(&cli, db)?;
            if session.registry().describe(table).is_none() {
                session.discover(table);
            }
            match session.registry().describe(table) {
                Some(description) => println!("{}", description),
                None => println!("Table '{}' not found", table),
            }
        }
    }

    Ok(())
}
