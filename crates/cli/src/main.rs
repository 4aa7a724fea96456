use docket::DocketError;
use tracing::{error, warn};

/// CLI module for command-line interface logic.
mod cli;
/// Commands module for subcommand implementations.
mod commands;
/// Logging module for setting up tracing.
mod logging;

/// Exit status for a rejected document: the input was refused, nothing was written.
const EXIT_REJECTED: i32 = 2;
/// Exit status for storage and setup failures.
const EXIT_FAILURE: i32 = 1;

/// Logs `e` and returns the process exit status for it.
fn report(e: &DocketError) -> i32 {
    if e.is_validation() {
        warn!("Document rejected: {}", e);
        EXIT_REJECTED
    }
    else {
        error!("{}", e);
        EXIT_FAILURE
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        std::process::exit(report(&e));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_report_exit_codes() {
        let rejected = DocketError::DuplicateValue {
            collection: "User".to_string(),
            field:      "email".to_string(),
            value:      json!("a@x.com"),
        };
        assert_eq!(report(&rejected), EXIT_REJECTED);

        let failed = DocketError::read(
            "User",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(report(&failed), EXIT_FAILURE);
    }
}
