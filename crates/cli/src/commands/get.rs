use clap::Args;
use docket::StoreConfig;
use tracing::{info, warn};

use super::{open_store, print_json};

/// Arguments for the get command.
#[derive(Args, Clone, Default)]
pub struct GetArgs {
    /// Store path
    #[arg(short, long)]
    pub store_path: String,
    /// Collection name
    #[arg(short, long)]
    pub collection: String,
    /// Document ID
    #[arg(short, long)]
    pub id:         String,
}

/// Retrieve a document by id.
///
/// The document is printed to stdout if it exists. A missing document is not an error;
/// a warning is logged and nothing is printed.
///
/// # Examples
/// ```rust,no_run
/// use docket_cli::commands::get::{run, GetArgs};
///
/// let args = GetArgs {
///     store_path: "/tmp/my_store".to_string(),
///     collection: "users".to_string(),
///     id:         "04718239561".to_string(),
/// };
/// run(args, docket::StoreConfig::default()).await?;
/// ```
pub async fn run(args: GetArgs, config: StoreConfig) -> docket::Result<()> {
    info!(
        "Getting document '{}' from collection '{}' in store {}",
        args.id, args.collection, args.store_path
    );
    let store = open_store(&args.store_path, config);
    let collection = store.collection(&args.collection).await?;

    match collection.find_by_id(&args.id).await? {
        Some(document) => print_json(&document.to_value()),
        None => {
            warn!(
                "Document '{}' not found in collection '{}'",
                args.id, args.collection
            );
            Ok(())
        },
    }
}
