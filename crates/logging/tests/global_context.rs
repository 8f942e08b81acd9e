//! Integration test for the process-wide context and declared categories.
//!
//! Installation is once per process, so everything lives in one test.
#![cfg(feature = "enabled")]

use std::sync::Arc;

use logging::{ContextError, DiagnosticsContext, cat_assert, cat_error, cat_log, declare_category};
use logging_sink::CapturingConsole;
use settings_store::MemoryStore;

declare_category!(
    /// Physics diagnostics.
    PHYSICS = "Physics"
);

/// Verifies declared categories stay silent until a context is installed, then route through it.
#[test]
fn declared_categories_use_installed_context() {
    assert!(logging::global().is_none());
    assert!(PHYSICS.logger().is_none());
    cat_log!(PHYSICS, "before install");

    let dir = tempfile::tempdir().expect("tempdir");
    let log_path = dir.path().join("CategoricalLog.txt");
    let console = Arc::new(CapturingConsole::new());
    let ctx = DiagnosticsContext::builder(Arc::new(MemoryStore::new()))
        .console(console.clone())
        .log_file(&log_path)
        .build();
    logging::install(ctx.clone()).expect("first install");
    assert!(matches!(
        logging::install(ctx),
        Err(ContextError::AlreadyInstalled)
    ));

    cat_log!(PHYSICS, "step {}", 1);
    cat_error!(PHYSICS, "bad {}", "thing");
    cat_assert!(PHYSICS, 1 > 2);

    let texts = console.texts();
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0], "step 1");
    assert_eq!(texts[1], "bad thing");
    assert!(texts[2].contains("1 > 2"));

    let global = logging::global().expect("installed");
    assert_eq!(global.registry().registered_names(), vec!["Physics".to_owned()]);

    // The installed context is never dropped; shutdown is what flushes the file.
    let physics = PHYSICS.logger().and_then(|logger| logger.category_id()).expect("id");
    global.registry().set_file_logging(physics, true);
    cat_log!(PHYSICS, "kept on disk");
    assert!(logging::shutdown());
    assert!(!logging::shutdown());
    let contents = std::fs::read_to_string(&log_path).expect("read log");
    assert_eq!(contents, "kept on disk\n");
}
