//! Integration tests for logging functionality

use bulkload::config::LoggingConfig;
use bulkload::domain::{BulkloadError, EntityKind};
use bulkload::logging::init_logging;
use bulkload::{log_batch_processing, log_error_with_context, log_import_complete, log_import_start};
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_max_size_mb, 100);
}

// Only one global subscriber can exist per process, so everything that depends on
// an installed subscriber lives in this single test.
#[test]
fn test_file_logging_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
        local_max_size_mb: 10,
    };

    assert!(!log_path.exists());
    let guard = init_logging("debug", &config).expect("logging should initialize");
    assert!(guard.has_file_output());
    assert!(log_path.is_dir());

    // A second subscriber is rejected
    assert!(matches!(
        init_logging("info", &LoggingConfig::default()),
        Err(BulkloadError::Configuration(_))
    ));

    log_import_start!(EntityKind::Users, "users.csv", "users_bulk_test");
    log_batch_processing!(1, 2, 1000, 1500);
    log_import_complete!("users_bulk_test", 1490, 4, 6, chrono::Duration::seconds(3));
    let error = BulkloadError::Source("file vanished".to_string());
    log_error_with_context!(&error, "Failed to load source file");

    drop(guard);
    let written: Vec<_> = std::fs::read_dir(&log_path).unwrap().collect();
    assert!(!written.is_empty());
}
