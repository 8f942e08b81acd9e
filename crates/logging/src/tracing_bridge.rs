//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the category dispatcher.
//!
//! Events whose target is the name of a registered category are routed into
//! that category: `ERROR` events become errors, `WARN` events warnings, and
//! everything else a regular log call. Events for unknown targets are left
//! alone, so the layer can sit next to any other subscriber layers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{DiagnosticsContext, init_tracing};
//!
//! let ctx = DiagnosticsContext::builder(store).build();
//! ctx.registry().register_category("Physics")?;
//! init_tracing(ctx);
//!
//! tracing::warn!(target: "Physics", "tunnelling detected");
//! ```

use std::fmt::{self, Write as _};

use logging_sink::CONSOLE_TARGET;
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::context::DiagnosticsContext;

/// A tracing layer that forwards category-targeted events to a dispatcher.
#[derive(Clone, Debug)]
pub struct CategoryLayer {
    context: DiagnosticsContext,
}

impl CategoryLayer {
    /// Creates a layer dispatching through `context`.
    #[must_use]
    pub const fn new(context: DiagnosticsContext) -> Self {
        Self { context }
    }
}

impl<S> Layer<S> for CategoryLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        // Console echoes and the workspace's own diagnostics never loop back in;
        // some of the latter are emitted while the registry lock is held.
        if target == CONSOLE_TARGET || is_internal(target) {
            return;
        }
        let Some(id) = self.context.registry().category_id(target) else {
            return;
        };

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let text = visitor.finish();

        let dispatcher = self.context.dispatcher();
        match *metadata.level() {
            Level::ERROR => dispatcher.log_error(id, text),
            Level::WARN => dispatcher.log_warning(id, text),
            _ => dispatcher.log(id, text),
        }
    }
}

const INTERNAL_CRATES: [&str; 4] = ["category", "logging", "logging_sink", "settings_store"];

fn is_internal(target: &str) -> bool {
    let krate = target.split("::").next().unwrap_or(target);
    INTERNAL_CRATES.contains(&krate)
}

/// Visitor collecting the message and any extra fields of an event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_owned()
        } else {
            self.message + &self.fields
        }
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }
}

/// Installs a global subscriber with a [`CategoryLayer`] over `context`.
pub fn init_tracing(context: DiagnosticsContext) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(CategoryLayer::new(context))
        .init();
}

/// Like [`init_tracing`], with an additional filter layer in front.
pub fn init_tracing_with_filter<F>(context: DiagnosticsContext, filter: F)
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(CategoryLayer::new(context))
        .init();
}

#[cfg(all(test, feature = "enabled"))]
mod tests {
    use std::sync::Arc;

    use logging_sink::{CapturingConsole, ConsoleLine, Severity};
    use settings_store::MemoryStore;
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    fn context() -> (DiagnosticsContext, Arc<CapturingConsole>) {
        let console = Arc::new(CapturingConsole::new());
        let ctx = DiagnosticsContext::builder(Arc::new(MemoryStore::new()))
            .console(console.clone())
            .build();
        ctx.registry().register_category("Physics").expect("register");
        (ctx, console)
    }

    #[test]
    fn events_for_registered_targets_are_routed_by_level() {
        let (ctx, console) = context();
        let subscriber = tracing_subscriber::registry().with(CategoryLayer::new(ctx));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "Physics", "step");
            tracing::warn!(target: "Physics", "slow");
            tracing::error!(target: "Physics", bodies = 3, "exploded");
            tracing::info!(target: "Audio", "ignored");
        });

        assert_eq!(
            console.drain(),
            vec![
                ConsoleLine::new(Severity::Info, "step"),
                ConsoleLine::new(Severity::Warning, "slow"),
                ConsoleLine::new(Severity::Error, "exploded bodies=3"),
            ]
        );
    }

    #[test]
    fn console_target_is_never_routed() {
        let (ctx, console) = context();
        ctx.registry()
            .register_category(CONSOLE_TARGET)
            .expect("register");
        let subscriber = tracing_subscriber::registry().with(CategoryLayer::new(ctx));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "catdebug", "loop");
        });
        assert!(console.is_empty());
    }

    #[test]
    fn workspace_diagnostics_are_internal() {
        assert!(is_internal("category::registry"));
        assert!(is_internal("logging::file"));
        assert!(is_internal("settings_store"));
        assert!(!is_internal("physics_engine::solver"));
        assert!(!is_internal("Physics"));
    }

    #[test]
    fn field_only_events_render_fields() {
        let visitor = MessageVisitor {
            message: String::new(),
            fields: " a=1 b=2".to_owned(),
        };
        assert_eq!(visitor.finish(), "a=1 b=2");
    }
}
