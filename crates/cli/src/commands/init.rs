use clap::Args;
use docket::{DocketError, StoreConfig};
use tokio::fs as tokio_fs;
use tracing::{error, info};

use super::{load_schema, open_store};

/// Arguments for the init command.
#[derive(Args, Clone, Default)]
pub struct InitArgs {
    /// Path to the store directory
    #[arg(short, long)]
    pub path:   String,
    /// Schema files whose collections should be created (repeatable)
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: Vec<String>,
}

/// Initialize a store directory.
///
/// Creates the root directory and, for every schema file given, the empty container of
/// the collection it describes. Existing containers are left untouched, so running init
/// twice is harmless.
///
/// # Examples
/// ```rust,no_run
/// use docket_cli::commands::init::{run, InitArgs};
///
/// let args = InitArgs {
///     path:   "/tmp/my_store".to_string(),
///     schema: vec!["user.schema.json".to_string()],
/// };
/// run(args, docket::StoreConfig::default()).await?;
/// ```
pub async fn run(args: InitArgs, config: StoreConfig) -> docket::Result<()> {
    info!("Initializing store at {}", args.path);
    tokio_fs::create_dir_all(&args.path).await.map_err(|e| {
        error!("Failed to create store directory {}: {}", args.path, e);
        DocketError::Config {
            message: format!("cannot create store directory {}: {}", args.path, e),
        }
    })?;

    let store = open_store(&args.path, config);
    for schema_path in &args.schema {
        let schema = load_schema(schema_path).await?;
        store.ensure_collection(schema.collection()).await?;
        info!(
            "Collection '{}' ready from schema {}",
            schema.collection(),
            schema_path
        );
    }

    info!("Store initialized successfully at {}", args.path);
    Ok(())
}
