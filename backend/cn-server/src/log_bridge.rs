//! Carries `tracing` span fields into the `log` output.
//!
//! The notifier opens a `cn_dispatch` span around every dispatch, while the
//! process writes its output through fern. `LogBridgeLayer` keeps each span's
//! fields in the registry so the formatter can append them, and forwards
//! `tracing` events (sqlx emits these) to the installed `log` logger.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_log::AsLog;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::{LookupSpan, Scope};

/// Layer that records span fields and forwards events to `log`
pub struct LogBridgeLayer;

impl<S> Layer<S> for LogBridgeLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = FieldList::default();
        attrs.record(&mut fields);
        span.extensions_mut().insert(fields);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(fields) = extensions.get_mut::<FieldList>() {
            values.record(fields);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let log_metadata = log::Metadata::builder()
            .level(metadata.level().as_log())
            .target(metadata.target())
            .build();

        let logger = log::logger();
        if !logger.enabled(&log_metadata) {
            return;
        }

        let mut fields = FieldList::default();
        event.record(&mut fields);

        // The formatter can't see the dispatcher from inside an event, so the
        // span context is rendered here.
        let context = ctx
            .event_scope(event)
            .and_then(render_scope)
            .map(|context| format!(" {{{context}}}"))
            .unwrap_or_default();

        logger.log(
            &log::Record::builder()
                .metadata(log_metadata)
                .args(format_args!("{fields}{context}"))
                .module_path(metadata.module_path())
                .file(metadata.file())
                .line(metadata.line())
                .build(),
        );
    }
}

/// Fields of every span entered on this thread, outermost first.
/// None outside any span or when no bridge subscriber is installed.
pub fn current_span_fields() -> Option<String> {
    tracing::dispatcher::get_default(|dispatch| {
        let registry = dispatch.downcast_ref::<Registry>()?;
        let current = registry.current_span();
        let span = registry.span(current.id()?)?;
        render_scope(span.scope())
    })
}

fn render_scope<'a, R>(scope: Scope<'a, R>) -> Option<String>
where
    R: LookupSpan<'a>,
{
    let rendered: Vec<String> = scope
        .from_root()
        .filter_map(|span| {
            span.extensions()
                .get::<FieldList>()
                .map(|fields| fields.pairs.clone())
        })
        .filter(|pairs| !pairs.is_empty())
        .collect();

    (!rendered.is_empty()).then(|| rendered.join(" "))
}

/// `message` plus `name=value` pairs in recording order
#[derive(Default)]
struct FieldList {
    message: Option<String>,
    pairs: String,
}

impl FieldList {
    fn push(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
            return;
        }
        if !self.pairs.is_empty() {
            self.pairs.push(' ');
        }
        let _ = write!(self.pairs, "{}={}", field.name(), value);
    }
}

impl Visit for FieldList {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, format_args!("{value}"));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format_args!("{value:?}"));
    }
}

impl fmt::Display for FieldList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, self.pairs.is_empty()) {
            (Some(message), true) => f.write_str(message),
            (Some(message), false) => write!(f, "{message} {}", self.pairs),
            (None, _) => f.write_str(&self.pairs),
        }
    }
}
