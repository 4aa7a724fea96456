use clap::Args;
use docket::{Document, StoreConfig};
use serde_json::Value;
use tracing::{info, warn};

use super::{open_store, parse_data, print_json};

/// Arguments for the find command.
#[derive(Args, Clone, Default)]
pub struct FindArgs {
    /// Store path
    #[arg(short, long)]
    pub store_path: String,
    /// Collection name
    #[arg(short, long)]
    pub collection: String,
    /// Field to match, including `id`, `created_at` and `updated_at`
    #[arg(short, long)]
    pub field:      String,
    /// Value to match, taken as text
    #[arg(long)]
    pub value:      String,
    /// Parse `--value` as a JSON literal (number, boolean, null, list or quoted string)
    #[arg(long)]
    pub json_value: bool,
}

impl FindArgs {
    /// The value the field must strictly equal.
    fn match_value(&self) -> docket::Result<Value> {
        if self.json_value {
            parse_data(&self.value)
        }
        else {
            Ok(Value::String(self.value.clone()))
        }
    }
}

/// Returns the first document whose field strictly equals the requested value.
pub async fn lookup(args: &FindArgs, config: StoreConfig) -> docket::Result<Option<Document>> {
    let value = args.match_value()?;
    info!(
        "Finding document in collection '{}' where {} = {}",
        args.collection, args.field, value
    );
    let store = open_store(&args.store_path, config);
    let found = store
        .collection(&args.collection)
        .await?
        .find_by_field(&args.field, &value)
        .await?;
    if found.is_none() {
        warn!(
            "No document in collection '{}' where {} = {}",
            args.collection, args.field, value
        );
    }
    Ok(found)
}

/// Print the first document whose field strictly equals the value.
///
/// The value is compared as text unless `--json-value` is given, so ids and other
/// numeric-looking strings match as stored.
///
/// # Examples
/// ```rust,no_run
/// use docket_cli::commands::find::{run, FindArgs};
///
/// let args = FindArgs {
///     store_path: "/tmp/my_store".to_string(),
///     collection: "User".to_string(),
///     field:      "age".to_string(),
///     value:      "30".to_string(),
///     json_value: true,
/// };
/// run(args, docket::StoreConfig::default()).await?;
/// ```
pub async fn run(args: FindArgs, config: StoreConfig) -> docket::Result<()> {
    match lookup(&args, config).await? {
        Some(document) => print_json(&document.to_value()),
        None => Ok(()),
    }
}
