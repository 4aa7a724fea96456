use clap::Args;
use docket::{DocketError, StoreConfig};
use serde_json::Value;
use tracing::{error, info, warn};

use super::{load_schema_for, open_store, parse_data, print_json};

/// Arguments for the update command.
#[derive(Args, Clone, Default)]
pub struct UpdateArgs {
    /// Store path
    #[arg(short, long)]
    pub store_path: String,
    /// Collection name
    #[arg(short, long)]
    pub collection: String,
    /// Document ID
    #[arg(short, long)]
    pub id:         String,
    /// JSON object with the fields to change (as string)
    #[arg(short, long)]
    pub data:       String,
    /// Schema file to validate the changed fields against
    #[arg(long, value_name = "FILE")]
    pub schema:     Option<String>,
}

/// Merge fields into an existing document.
///
/// Fields not named in `--data` are kept. The updated document is printed to stdout; a
/// missing id logs a warning and changes nothing.
///
/// # Examples
/// ```rust,no_run
/// use docket_cli::commands::update::{run, UpdateArgs};
///
/// let args = UpdateArgs {
///     store_path: "/tmp/my_store".to_string(),
///     collection: "User".to_string(),
///     id:         "04718239561".to_string(),
///     data:       r#"{"firstName": "Alicia"}"#.to_string(),
///     schema:     None,
/// };
/// run(args, docket::StoreConfig::default()).await?;
/// ```
pub async fn run(args: UpdateArgs, config: StoreConfig) -> docket::Result<()> {
    info!(
        "Updating document '{}' in collection '{}' in store {}",
        args.id, args.collection, args.store_path
    );
    let store = open_store(&args.store_path, config);
    let value = parse_data(&args.data)?;

    let result = match args.schema.as_deref() {
        Some(schema_path) => {
            let schema = load_schema_for(schema_path, &args.collection).await?;
            store.model(schema).await?.update_by_id(&args.id, value).await
        },
        None => {
            let Value::Object(patch) = value
            else {
                error!("Update data must be a JSON object");
                return Err(DocketError::InvalidPayload {
                    reason: "expected a JSON object".to_owned(),
                });
            };
            store
                .collection(&args.collection)
                .await?
                .update_by_id(&args.id, patch)
                .await
        },
    };

    match result {
        Ok(Some(document)) => {
            info!("Document '{}' updated successfully", args.id);
            print_json(&document.to_value())
        },
        Ok(None) => {
            warn!(
                "Document '{}' not found in collection '{}'",
                args.id, args.collection
            );
            Ok(())
        },
        Err(e) => {
            error!(
                "Failed to update document '{}' in collection '{}' in store {}: {}",
                args.id, args.collection, args.store_path, e
            );
            Err(e)
        },
    }
}
