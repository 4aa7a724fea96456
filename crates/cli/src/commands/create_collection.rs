use clap::Args;
use docket::StoreConfig;
use tracing::{error, info};

use super::open_store;

/// Arguments for the create-collection command.
#[derive(Args, Clone, Default)]
pub struct CreateCollectionArgs {
    /// Store path
    #[arg(short, long)]
    pub store_path: String,
    /// Collection name
    #[arg(short, long)]
    pub name:       String,
}

/// Create a collection's empty container if it does not exist yet.
///
/// An existing collection keeps its documents.
///
/// # Examples
/// ```rust,no_run
/// use docket_cli::commands::create_collection::{run, CreateCollectionArgs};
///
/// let args = CreateCollectionArgs {
///     store_path: "/tmp/my_store".to_string(),
///     name:       "users".to_string(),
/// };
/// run(args, docket::StoreConfig::default()).await?;
/// ```
pub async fn run(args: CreateCollectionArgs, config: StoreConfig) -> docket::Result<()> {
    info!(
        "Creating collection '{}' in store {}",
        args.name, args.store_path
    );
    let store = open_store(&args.store_path, config);
    match store.ensure_collection(&args.name).await {
        Ok(()) => {
            info!("Collection '{}' created successfully", args.name);
            Ok(())
        },
        Err(e) => {
            error!(
                "Failed to create collection '{}' in store {}: {}",
                args.name, args.store_path, e
            );
            Err(e)
        },
    }
}
