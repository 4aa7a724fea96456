use clap::Args;
use docket::StoreConfig;
use serde_json::Value;
use tracing::{error, info};

use super::{open_store, print_json};

/// Arguments for the list command.
#[derive(Args, Clone, Default)]
pub struct ListArgs {
    /// Store path
    #[arg(short, long)]
    pub store_path: String,
    /// Collection name; omit to list the collections of the store
    #[arg(short, long)]
    pub collection: Option<String>,
}

/// List the documents of a collection in stored order, or the store's collection names.
///
/// # Examples
/// ```rust,no_run
/// use docket_cli::commands::list::{run, ListArgs};
///
/// let args = ListArgs {
///     store_path: "/tmp/my_store".to_string(),
///     collection: Some("users".to_string()),
/// };
/// run(args, docket::StoreConfig::default()).await?;
/// ```
pub async fn run(args: ListArgs, config: StoreConfig) -> docket::Result<()> {
    let store = open_store(&args.store_path, config);

    let Some(collection) = args.collection
    else {
        info!("Listing collections in store {}", args.store_path);
        let names = store.list_collections().await?;
        info!("Found {} collections", names.len());
        return print_json(&Value::from(names));
    };

    info!(
        "Listing documents in collection '{}' in store {}",
        collection, args.store_path
    );
    match store.collection(&collection).await?.get_all().await {
        Ok(documents) => {
            info!(
                "Found {} documents in collection '{}'",
                documents.len(),
                collection
            );
            let rendered = documents.iter().map(|doc| doc.to_value()).collect();
            print_json(&Value::Array(rendered))
        },
        Err(e) => {
            error!(
                "Failed to list documents in collection '{}' in store {}: {}",
                collection, args.store_path, e
            );
            Err(e)
        },
    }
}

#[cfg(test)]
mod tests {
    use docket::{DocketError, Store};
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_list_documents() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path());
        let notes = store.collection("notes").await.unwrap();
        notes
            .append(json!({"n": 1}).as_object().cloned().unwrap())
            .await
            .unwrap();

        let args = ListArgs {
            store_path: temp_dir.path().to_string_lossy().to_string(),
            collection: Some("notes".to_string()),
        };
        assert!(run(args, StoreConfig::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_collections_of_missing_store() {
        let temp_dir = TempDir::new().unwrap();

        let args = ListArgs {
            store_path: temp_dir.path().join("absent").to_string_lossy().to_string(),
            collection: None,
        };
        assert!(run(args, StoreConfig::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_malformed_collection() {
        let temp_dir = TempDir::new().unwrap();
        tokio::fs::write(temp_dir.path().join("notes.json"), "{oops")
            .await
            .unwrap();

        let args = ListArgs {
            store_path: temp_dir.path().to_string_lossy().to_string(),
            collection: Some("notes".to_string()),
        };
        let err = run(args, StoreConfig::default()).await.unwrap_err();
        assert!(matches!(err, DocketError::Read { .. }));
    }
}
