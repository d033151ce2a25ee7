use std::path::Path;

use event_discovery::logging::{init_logging, LOG_DIR};
use tempfile::TempDir;

#[test]
fn test_init_logging_installs_console_and_file_layers() {
    let dir = TempDir::new().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let guard = init_logging("debug");
    assert!(guard.is_some());
    assert!(Path::new(LOG_DIR).is_dir());

    tracing::info!(target: "event_discovery", "logging initialised");
    drop(guard);
}
