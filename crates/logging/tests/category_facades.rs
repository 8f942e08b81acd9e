//! Integration tests for category loggers and assert handles.
#![cfg(feature = "enabled")]

use std::sync::Arc;

use logging::{DiagnosticsContext, PanicOnFailure, make_category_logger};
use logging_sink::{CapturingConsole, Severity};
use settings_store::{JsonFileStore, MemoryStore, SettingsStore};

fn context() -> (DiagnosticsContext, Arc<CapturingConsole>) {
    let console = Arc::new(CapturingConsole::new());
    let ctx = DiagnosticsContext::builder(Arc::new(MemoryStore::new()))
        .console(console.clone())
        .build();
    (ctx, console)
}

// ============================================================================
// Lazy Registration
// ============================================================================

/// Verifies the first call through a logger registers and persists its category.
#[test]
fn first_log_registers_and_persists() {
    let (ctx, console) = context();
    let logger = make_category_logger(&ctx, "Physics");
    assert!(ctx.registry().is_empty());

    logger.log("hello");
    let id = ctx.registry().category_id("Physics").expect("registered");
    assert_eq!(logger.category_id(), Some(id));
    assert_eq!(
        ctx.store()
            .get_string(&category::keys::name(id), ""),
        "Physics"
    );
    assert_eq!(console.texts(), vec!["hello".to_owned()]);
}

/// Verifies two facades for one name share the category.
#[test]
fn facades_for_same_name_share_id() {
    let (ctx, _) = context();
    let logger = ctx.category_logger("Physics");
    let asserts = ctx.category_assert("Physics");
    assert_eq!(logger.category_id(), asserts.category_id());
    assert_eq!(ctx.registry().len(), 1);
}

/// Verifies a facade picks up switches recovered from a persisted store.
#[test]
fn facade_sees_persisted_switches() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");

    {
        let ctx = DiagnosticsContext::builder(Arc::new(JsonFileStore::open(&path).expect("open")))
            .build();
        let id = ctx
            .category_logger("Physics")
            .category_id()
            .expect("registered");
        ctx.registry().set_console_logging(id, false);
        ctx.registry().save_category(id).expect("save");
    }

    let console = Arc::new(CapturingConsole::new());
    let ctx = DiagnosticsContext::builder(Arc::new(JsonFileStore::open(&path).expect("reopen")))
        .console(console.clone())
        .build();
    let logger = ctx.category_logger("Physics");
    assert!(!logger.is_enabled());
    logger.log("silent");
    assert!(console.is_empty());
}

/// Verifies unregistering through the context discards text queued for the freed id.
#[test]
fn unregistered_category_text_does_not_reach_reused_id() {
    let (ctx, console) = context();
    let first = ctx.category_logger("First");
    first.prepend_to_next_log("First only ");
    let freed = first.category_id().expect("registered");

    assert!(ctx.unregister_category("First"));
    assert!(!ctx.unregister_category("First"));

    let second = ctx.category_logger("Second");
    assert_eq!(second.category_id(), Some(freed));
    second.log("msg");
    assert_eq!(console.texts(), vec!["msg".to_owned()]);
}

// ============================================================================
// Facade Gating
// ============================================================================

/// Verifies a logger does not add a gate of its own on warnings.
#[test]
fn logger_warning_follows_dispatcher_rules() {
    let (ctx, console) = context();
    let logger = ctx.category_logger("Physics");
    let id = logger.category_id().expect("registered");
    ctx.registry().set_console_logging(id, false);

    logger.log("dropped");
    logger.log_warning("always shown by default");
    assert_eq!(
        console.drain().into_iter().map(|line| line.severity).collect::<Vec<_>>(),
        vec![Severity::Warning]
    );
}

/// Verifies assert handles gate on the asserts switch only.
#[test]
fn asserts_gate_on_assert_switch() {
    let (ctx, console) = context();
    let asserts = ctx.category_assert("Physics");
    let id = asserts.category_id().expect("registered");

    asserts.is_true(false, "first");
    ctx.registry().set_asserts(id, false);
    asserts.is_true(false, "second");
    ctx.registry().set_asserts(id, true);
    ctx.registry().set_console_logging(id, false);
    asserts.is_some::<u8>(None, "third");

    let texts = console.texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("first"));
    assert!(texts[1].contains("third"));
}

/// Verifies the panicking handler panics with the category name.
#[test]
fn panic_handler_panics_on_failure() {
    let ctx = DiagnosticsContext::builder(Arc::new(MemoryStore::new()))
        .console(Arc::new(CapturingConsole::new()))
        .assertion_handler(Arc::new(PanicOnFailure))
        .build();
    let asserts = ctx.category_assert("Physics");
    asserts.is_true(true, "fine");

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        asserts.is_equal(1, 2, "mismatch");
    }));
    let payload = result.expect_err("should panic");
    let message = payload
        .downcast_ref::<String>()
        .expect("formatted panic message");
    assert!(message.starts_with("[Physics] Assertion failed: mismatch"));
}
