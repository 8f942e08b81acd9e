//! End-to-end tests across a simulated process restart over one JSON store.
#![cfg(feature = "enabled")]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use catdebug::{
    CapturingConsole, DiagnosticsContext, GlobalOptions, JsonFileStore, cat_log, cat_warn,
};

fn open_context(settings: &Path, log: &Path) -> (DiagnosticsContext, Arc<CapturingConsole>) {
    let console = Arc::new(CapturingConsole::new());
    let store = JsonFileStore::open(settings).expect("open settings");
    let ctx = DiagnosticsContext::builder(Arc::new(store))
        .console(console.clone())
        .log_file(log)
        .build();
    (ctx, console)
}

/// Verifies ids, switches and options configured in one session apply to the next.
#[test]
fn configuration_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = dir.path().join("settings.json");
    let log = dir.path().join("CategoricalLog.txt");

    let (physics_id, audio_id) = {
        let (ctx, console) = open_context(&settings, &log);
        let physics = ctx.category_logger("Physics");
        let audio = ctx.category_logger("Audio");
        cat_log!(physics, "first session");

        let physics_id = physics.category_id().expect("physics");
        let audio_id = audio.category_id().expect("audio");
        ctx.registry().update_switches(physics_id, |switches| {
            switches.console_logging = false;
            switches.file_logging = true;
        });
        ctx.registry().save_category(physics_id).expect("save physics");
        ctx.dispatcher()
            .set_options(GlobalOptions::default().with_category_name(true).with_single_line(true));
        ctx.dispatcher().save_options().expect("save options");

        assert_eq!(console.texts(), vec!["first session".to_owned()]);
        assert!(ctx.shutdown());
        (physics_id, audio_id)
    };

    let (ctx, console) = open_context(&settings, &log);
    assert_eq!(ctx.registry().category_id("Physics"), Some(physics_id));
    assert_eq!(ctx.registry().category_id("Audio"), Some(audio_id));

    let physics = ctx.category_logger("Physics");
    let audio = ctx.category_logger("Audio");
    cat_log!(physics, "to file");
    cat_log!(audio, "to console");
    cat_warn!(physics, "still shown");
    assert!(ctx.shutdown());

    assert_eq!(
        console.texts(),
        vec![
            "Audio: to console".to_owned(),
            "Physics: still shown".to_owned(),
        ]
    );
    let contents = fs::read_to_string(&log).expect("read log");
    assert!(contents.starts_with("Physics: to file\n"));
    assert_eq!(
        fs::read_to_string(dir.path().join("CategoricalLog.txt.BAK")).expect("backup"),
        ""
    );
}

/// Verifies unregistering frees an id for the next registration after restart.
#[test]
fn freed_id_is_reused_after_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = dir.path().join("settings.json");
    let log = dir.path().join("log.txt");

    let freed = {
        let (ctx, _) = open_context(&settings, &log);
        let registry = ctx.registry();
        let first = registry.register_category("First").expect("first");
        registry.register_category("Second").expect("second");
        assert!(registry.unregister_category("First"));
        first
    };

    let (ctx, _) = open_context(&settings, &log);
    assert_eq!(ctx.registry().category_id("First"), None);
    assert_eq!(ctx.registry().register_category("Third").expect("third"), freed);
}
