#![forbid(unsafe_code)]

//! In-memory `tracing` layer for asserting on what a balancing run logged.
//!
//! ```
//! use balanced_harness::trace_capture::capture;
//!
//! let log = capture(|| tracing::debug!(size = 3_u64, "hello"));
//! assert_eq!(log.messages(), vec!["hello".to_string()]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

/// A span as opened, with fields recorded later merged in.
///
/// Fields declared `Empty` and never recorded map to an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRecord {
    pub name: String,
    pub fields: HashMap<String, String>,
}

/// One event and the span it was emitted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub level: Level,
    pub message: String,
    pub fields: HashMap<String, String>,
    pub span: Option<String>,
}

#[derive(Debug, Default)]
struct Log {
    spans: Vec<SpanRecord>,
    by_id: HashMap<u64, usize>,
    events: Vec<EventRecord>,
}

/// Shared handle to everything captured so far. Cloning shares the log.
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    inner: Arc<Mutex<Log>>,
}

impl TraceLog {
    fn lock(&self) -> MutexGuard<'_, Log> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spans in the order they were opened.
    #[must_use]
    pub fn spans(&self) -> Vec<SpanRecord> {
        self.lock().spans.clone()
    }

    /// Spans with the given name.
    #[must_use]
    pub fn spans_named(&self, name: &str) -> Vec<SpanRecord> {
        self.lock()
            .spans
            .iter()
            .filter(|s| s.name == name)
            .cloned()
            .collect()
    }

    /// Events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        self.lock().events.clone()
    }

    /// Event messages in emission order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lock().events.iter().map(|e| e.message.clone()).collect()
    }

    /// Events whose message is exactly `message`.
    #[must_use]
    pub fn events_with_message(&self, message: &str) -> Vec<EventRecord> {
        self.lock()
            .events
            .iter()
            .filter(|e| e.message == message)
            .cloned()
            .collect()
    }
}

#[derive(Default)]
struct FieldMap(HashMap<String, String>);

impl Visit for FieldMap {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

impl<S> Layer<S> for TraceLog
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let mut fields = FieldMap::default();
        attrs.record(&mut fields);
        for declared in attrs.metadata().fields() {
            fields.0.entry(declared.name().to_string()).or_default();
        }

        let mut log = self.lock();
        let index = log.spans.len();
        log.by_id.insert(id.into_u64(), index);
        log.spans.push(SpanRecord {
            name: attrs.metadata().name().to_string(),
            fields: fields.0,
        });
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldMap::default();
        values.record(&mut fields);

        let mut log = self.lock();
        let Some(&index) = log.by_id.get(&id.into_u64()) else {
            return;
        };
        if let Some(span) = log.spans.get_mut(index) {
            span.fields.extend(fields.0);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut fields = FieldMap::default();
        event.record(&mut fields);
        let message = fields.0.remove("message").unwrap_or_default();
        let span = ctx.event_span(event).map(|s| s.name().to_string());

        self.lock().events.push(EventRecord {
            level: *event.metadata().level(),
            message,
            fields: fields.0,
            span,
        });
    }
}

/// Run `f` with every span and event down to `TRACE` captured.
pub fn capture<F: FnOnce()>(f: F) -> TraceLog {
    let log = TraceLog::default();
    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::TRACE)
        .with(log.clone());
    tracing::subscriber::with_default(subscriber, f);
    log
}
