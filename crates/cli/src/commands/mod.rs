use clap::{Parser, Subcommand};
use docket::{DocketError, Schema, Store, StoreConfig, WriteMode};
use serde_json::Value;
use tokio::fs as tokio_fs;
use tracing::{debug, error};

/// Create collection command module.
pub mod create_collection;
/// Delete command module.
pub mod delete;
/// Find command module.
pub mod find;
/// Get command module.
pub mod get;
/// Init command module.
pub mod init;
/// Insert command module.
pub mod insert;
/// List command module.
pub mod list;
/// Update command module.
pub mod update;

/// The CLI for the Docket document store.
///
/// Provides commands to initialize a store directory, create collections, and run CRUD
/// operations on documents, optionally validated against a schema file.
///
/// # Examples
///
/// ```bash
/// docket insert --store-path db --collection User --schema user.schema.json \
///     --data '{"email": "a@x.com", "firstName": "A"}'
/// docket find --store-path db --collection User --field email --value a@x.com
/// ```
#[derive(Parser)]
#[command(name = "docket", version, about = "A schema-validated JSON document store")]
pub struct Cli {
    #[command(subcommand)]
    /// The subcommand to execute.
    pub command: Commands,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (can be used multiple times: -v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// How containers are rewritten after a mutation.
    ///
    /// Options:
    /// - atomic (staging file then rename, default)
    /// - in-place (overwrite the container directly)
    #[arg(long, value_name = "MODE", default_value = "atomic", global = true)]
    pub write_mode: WriteMode,

    /// Write containers without indentation.
    #[arg(long, global = true)]
    pub compact: bool,
}

impl Cli {
    /// Store settings derived from the global flags.
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig {
            write_mode: self.write_mode,
            pretty:     !self.compact,
        }
    }
}

/// Enumeration of all available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a store directory, optionally creating the collections of schema files.
    Init(init::InitArgs),
    /// Create an empty collection if it does not exist yet.
    CreateCollection(create_collection::CreateCollectionArgs),
    /// Insert a new document into a collection.
    ///
    /// The document data must be a JSON object. The stored document, including its assigned
    /// id and timestamps, is printed to stdout.
    Insert(insert::InsertArgs),
    /// List the documents of a collection, or the collections of the store.
    List(list::ListArgs),
    /// Retrieve a document by id.
    Get(get::GetArgs),
    /// Retrieve the first document whose field equals a value.
    Find(find::FindArgs),
    /// Merge fields into an existing document.
    Update(update::UpdateArgs),
    /// Delete a document by id.
    Delete(delete::DeleteArgs),
}

/// Execute the specified CLI command.
///
/// Builds the store configuration from the global flags and dispatches to the command
/// handler.
pub async fn run_command(cli: Cli) -> docket::Result<()> {
    let config = cli.store_config();
    debug!("Using store configuration {:?}", config);

    match cli.command {
        Commands::Init(args) => init::run(args, config).await,
        Commands::CreateCollection(args) => create_collection::run(args, config).await,
        Commands::Insert(args) => insert::run(args, config).await,
        Commands::List(args) => list::run(args, config).await,
        Commands::Get(args) => get::run(args, config).await,
        Commands::Find(args) => find::run(args, config).await,
        Commands::Update(args) => update::run(args, config).await,
        Commands::Delete(args) => delete::run(args, config).await,
    }
}

/// Opens the store at `store_path`. No I/O happens until a collection is accessed.
pub fn open_store(store_path: &str, config: StoreConfig) -> Store { Store::new_with_config(store_path, config) }

/// Reads a JSON schema declaration from `path`.
pub async fn load_schema(path: &str) -> docket::Result<Schema> {
    let content = tokio_fs::read_to_string(path).await.map_err(|e| {
        error!("Failed to read schema file {}: {}", path, e);
        DocketError::Config {
            message: format!("cannot read schema file {}: {}", path, e),
        }
    })?;
    Schema::from_json_str(&content)
}

/// Loads the schema at `path` and checks that it describes `collection`.
pub async fn load_schema_for(path: &str, collection: &str) -> docket::Result<Schema> {
    let schema = load_schema(path).await?;
    if schema.collection() != collection {
        error!(
            "Schema {} describes collection '{}', not '{}'",
            path,
            schema.collection(),
            collection
        );
        return Err(DocketError::Config {
            message: format!(
                "schema {} describes collection '{}', not '{}'",
                path,
                schema.collection(),
                collection
            ),
        });
    }
    Ok(schema)
}

/// Parses document data given on the command line.
pub fn parse_data(data: &str) -> docket::Result<Value> {
    serde_json::from_str(data).map_err(|e| {
        error!("Invalid JSON data: {}", e);
        DocketError::InvalidPayload {
            reason: e.to_string(),
        }
    })
}

/// Pretty-prints a JSON value to stdout.
pub fn print_json(value: &Value) -> docket::Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(|e| {
        DocketError::Config {
            message: format!("cannot render output: {}", e),
        }
    })?;
    #[allow(clippy::print_stdout, reason = "CLI output")]
    {
        println!("{}", rendered);
    }
    Ok(())
}
