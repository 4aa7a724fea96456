use clap::Args;
use docket::{DocketError, StoreConfig};
use serde_json::Value;
use tracing::{error, info};

use super::{load_schema_for, open_store, parse_data, print_json};

/// Arguments for the insert command.
#[derive(Args, Clone, Default)]
pub struct InsertArgs {
    /// Store path
    #[arg(short, long)]
    pub store_path: String,
    /// Collection name
    #[arg(short, long)]
    pub collection: String,
    /// JSON object to store (as string)
    #[arg(short, long)]
    pub data:       String,
    /// Schema file to validate the document against
    #[arg(long, value_name = "FILE")]
    pub schema:     Option<String>,
}

/// Insert a new document into a collection.
///
/// Without `--schema` the payload is stored as is. With it, the payload goes through the
/// validation layer first: unknown fields, missing required fields, wrong kinds and unique
/// collisions are rejected and nothing is written. The stored document is printed to
/// stdout.
///
/// # Examples
/// ```rust,no_run
/// use docket_cli::commands::insert::{run, InsertArgs};
///
/// let args = InsertArgs {
///     store_path: "/tmp/my_store".to_string(),
///     collection: "User".to_string(),
///     data:       r#"{"email": "a@x.com", "firstName": "A"}"#.to_string(),
///     schema:     Some("user.schema.json".to_string()),
/// };
/// run(args, docket::StoreConfig::default()).await?;
/// ```
pub async fn run(args: InsertArgs, config: StoreConfig) -> docket::Result<()> {
    info!(
        "Inserting document into collection '{}' in store {}",
        args.collection, args.store_path
    );
    let store = open_store(&args.store_path, config);
    let value = parse_data(&args.data)?;

    let result = match args.schema.as_deref() {
        Some(schema_path) => {
            let schema = load_schema_for(schema_path, &args.collection).await?;
            store.model(schema).await?.create(value).await
        },
        None => {
            let Value::Object(payload) = value
            else {
                error!("Document data must be a JSON object");
                return Err(DocketError::InvalidPayload {
                    reason: "expected a JSON object".to_owned(),
                });
            };
            store.collection(&args.collection).await?.append(payload).await
        },
    };

    match result {
        Ok(document) => {
            info!("Document '{}' inserted successfully", document.id());
            print_json(&document.to_value())
        },
        Err(e) => {
            error!(
                "Failed to insert document into collection '{}' in store {}: {}",
                args.collection, args.store_path, e
            );
            Err(e)
        },
    }
}
