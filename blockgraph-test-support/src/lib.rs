//! Shared test utilities used across blockgraph crates.

pub mod tracing {
    //! Capture layer for asserting on the spans and events emitted by the
    //! generation pipeline.
    use std::collections::HashMap;
    use std::fmt;
    use std::sync::{Arc, Mutex, PoisonError};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::Context;
    use tracing_subscriber::registry::LookupSpan;

    /// Layer that stores closed spans and emitted events so tests can inspect
    /// instrumentation after the fact.
    ///
    /// Clones share the same storage, so a clone can be handed to the
    /// subscriber while the original is kept for assertions.
    ///
    /// # Examples
    /// ```
    /// use blockgraph_test_support::tracing::CaptureLayer;
    /// use tracing_subscriber::layer::SubscriberExt;
    ///
    /// let layer = CaptureLayer::default();
    /// let subscriber = tracing_subscriber::registry().with(layer.clone());
    /// tracing::subscriber::with_default(subscriber, || {
    ///     let _span = tracing::info_span!("core.example", vertices = 3).entered();
    ///     tracing::info!("hello");
    /// });
    /// assert!(layer.span("core.example").is_some());
    /// assert!(layer.has_event(tracing::Level::INFO, "hello"));
    /// ```
    #[derive(Clone, Default)]
    pub struct CaptureLayer {
        store: Arc<Mutex<Captured>>,
    }

    #[derive(Default)]
    struct Captured {
        spans: Vec<CapturedSpan>,
        events: Vec<CapturedEvent>,
    }

    impl CaptureLayer {
        /// Closed spans in the order they closed.
        #[must_use]
        pub fn spans(&self) -> Vec<CapturedSpan> {
            self.with_store(|store| store.spans.clone())
        }

        /// Events in the order they were emitted.
        #[must_use]
        pub fn events(&self) -> Vec<CapturedEvent> {
            self.with_store(|store| store.events.clone())
        }

        /// Returns the first closed span with the given name.
        #[must_use]
        pub fn span(&self, name: &str) -> Option<CapturedSpan> {
            self.with_store(|store| store.spans.iter().find(|span| span.name == name).cloned())
        }

        /// Returns whether an event at `level` carried `message`.
        #[must_use]
        pub fn has_event(&self, level: Level, message: &str) -> bool {
            self.with_store(|store| {
                store
                    .events
                    .iter()
                    .any(|event| event.level == level && event.message() == Some(message))
            })
        }

        fn with_store<T>(&self, read: impl FnOnce(&mut Captured) -> T) -> T {
            let mut guard = self.store.lock().unwrap_or_else(PoisonError::into_inner);
            read(&mut guard)
        }
    }

    /// A span recorded once it closed.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CapturedSpan {
        /// Span name from the callsite metadata.
        pub name: String,
        /// Fields recorded at creation or later through `Span::record`.
        pub fields: HashMap<String, String>,
    }

    impl CapturedSpan {
        /// Returns the rendered value of `field`, if it was recorded.
        #[must_use]
        pub fn field(&self, field: &str) -> Option<&str> {
            self.fields.get(field).map(String::as_str)
        }
    }

    /// An event as seen by the layer.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CapturedEvent {
        /// Event level.
        pub level: Level,
        /// Event target, usually the emitting module path.
        pub target: String,
        /// Structured fields, including `message`.
        pub fields: HashMap<String, String>,
    }

    impl CapturedEvent {
        /// Returns the formatted `message` field.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.fields.get("message").map(String::as_str)
        }
    }

    struct PendingSpan {
        name: &'static str,
        fields: HashMap<String, String>,
    }

    impl<S> Layer<S> for CaptureLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut pending = PendingSpan {
                name: attrs.metadata().name(),
                fields: HashMap::new(),
            };
            attrs.record(&mut FieldCollector(&mut pending.fields));
            span.extensions_mut().insert(pending);
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            if let Some(pending) = span.extensions_mut().get_mut::<PendingSpan>() {
                values.record(&mut FieldCollector(&mut pending.fields));
            }
        }

        fn on_close(&self, id: Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(&id) else {
                return;
            };
            let Some(pending) = span.extensions_mut().remove::<PendingSpan>() else {
                return;
            };
            self.with_store(|store| {
                store.spans.push(CapturedSpan {
                    name: pending.name.to_owned(),
                    fields: pending.fields,
                });
            });
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = HashMap::new();
            event.record(&mut FieldCollector(&mut fields));
            let metadata = event.metadata();
            self.with_store(|store| {
                store.events.push(CapturedEvent {
                    level: *metadata.level(),
                    target: metadata.target().to_owned(),
                    fields,
                });
            });
        }
    }

    struct FieldCollector<'a>(&'a mut HashMap<String, String>);

    impl FieldCollector<'_> {
        fn put(&mut self, field: &Field, value: String) {
            self.0.insert(field.name().to_owned(), value);
        }
    }

    impl Visit for FieldCollector<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.put(field, format!("{value:?}"));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.put(field, value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.put(field, value.to_string());
        }

        fn record_bool(&mut self, field: &Field, value: bool) {
            self.put(field, value.to_string());
        }

        fn record_i64(&mut self, field: &Field, value: i64) {
            self.put(field, value.to_string());
        }

        fn record_u64(&mut self, field: &Field, value: u64) {
            self.put(field, value.to_string());
        }

        fn record_f64(&mut self, field: &Field, value: f64) {
            self.put(field, value.to_string());
        }
    }
}

pub mod ci;
