use clap::Args;
use docket::StoreConfig;
use tracing::{info, warn};

use super::open_store;

/// Arguments for the delete command.
#[derive(Args, Clone, Default)]
pub struct DeleteArgs {
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

/// Delete a document by id.
///
/// Deleting an id that does not exist logs a warning and leaves the collection unchanged.
///
/// # Examples
/// ```rust,no_run
/// use docket_cli::commands::delete::{run, DeleteArgs};
///
/// let args = DeleteArgs {
///     store_path: "/tmp/my_store".to_string(),
///     collection: "users".to_string(),
///     id:         "04718239561".to_string(),
/// };
/// run(args, docket::StoreConfig::default()).await?;
/// ```
pub async fn run(args: DeleteArgs, config: StoreConfig) -> docket::Result<()> {
    info!(
        "Deleting document '{}' from collection '{}' in store {}",
        args.id, args.collection, args.store_path
    );
    let store = open_store(&args.store_path, config);
    let collection = store.collection(&args.collection).await?;

    if collection.delete_by_id(&args.id).await?.is_some() {
        info!("Document '{}' deleted successfully", args.id);
    }
    else {
        warn!(
            "Document '{}' not found in collection '{}'",
            args.id, args.collection
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use docket::Store;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_delete_success() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path());
        let users = store.collection("users").await.unwrap();
        let doc = users
            .append(json!({"name": "Alice"}).as_object().cloned().unwrap())
            .await
            .unwrap();

        let args = DeleteArgs {
            store_path: temp_dir.path().to_string_lossy().to_string(),
            collection: "users".to_string(),
            id:         doc.id().to_string(),
        };
        run(args, StoreConfig::default()).await.unwrap();

        assert_eq!(users.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_non_existent_document() {
        let temp_dir = TempDir::new().unwrap();

        let args = DeleteArgs {
            store_path: temp_dir.path().to_string_lossy().to_string(),
            collection: "users".to_string(),
            id:         "00000000000".to_string(),
        };
        assert!(run(args, StoreConfig::default()).await.is_ok());
    }
}
