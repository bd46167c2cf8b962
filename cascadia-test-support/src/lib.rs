//! Shared test utilities used across cascadia crates.

pub mod graphs {
    //! Small hand-checkable graph fixtures as raw edge lists.
    //!
    //! Fixtures are plain data so that any crate can turn them into its own
    //! graph type without this crate depending on the simulation kernel.

    /// A node count plus an undirected edge list.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct EdgeList {
        /// Number of nodes, labelled `0..nodes`.
        pub nodes: usize,
        /// Undirected edges, each listed once.
        pub edges: Vec<(usize, usize)>,
    }

    /// Path `0 - 1 - ... - (nodes - 1)`.
    ///
    /// # Examples
    /// ```
    /// use cascadia_test_support::graphs::path;
    ///
    /// assert_eq!(path(3).edges, vec![(0, 1), (1, 2)]);
    /// ```
    #[must_use]
    pub fn path(nodes: usize) -> EdgeList {
        EdgeList {
            nodes,
            edges: (1..nodes).map(|node| (node - 1, node)).collect(),
        }
    }

    /// Star with centre `0` and leaves `1..=leaves`.
    #[must_use]
    pub fn star(leaves: usize) -> EdgeList {
        EdgeList {
            nodes: leaves + 1,
            edges: (1..=leaves).map(|leaf| (0, leaf)).collect(),
        }
    }

    /// Cycle over `nodes` nodes; needs at least three.
    #[must_use]
    pub fn cycle(nodes: usize) -> EdgeList {
        let mut list = path(nodes);
        if nodes >= 3 {
            list.edges.push((nodes - 1, 0));
        }
        list
    }

    /// Complete graph on `nodes` nodes.
    #[must_use]
    pub fn complete(nodes: usize) -> EdgeList {
        EdgeList {
            nodes,
            edges: (0..nodes)
                .flat_map(|left| ((left + 1)..nodes).map(move |right| (left, right)))
                .collect(),
        }
    }

    /// Triangle `0-1-2`, an edge `3-4` and isolated node `5`.
    #[must_use]
    pub fn triangle_edge_isolate() -> EdgeList {
        EdgeList {
            nodes: 6,
            edges: vec![(0, 1), (1, 2), (0, 2), (3, 4)],
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use rstest::rstest;

        #[rstest]
        #[case::path(path(5), 4)]
        #[case::star(star(4), 4)]
        #[case::cycle(cycle(5), 5)]
        #[case::complete(complete(5), 10)]
        #[case::mixed(triangle_edge_isolate(), 4)]
        fn fixtures_have_expected_edge_counts(#[case] list: EdgeList, #[case] edges: usize) {
            assert_eq!(list.edges.len(), edges);
            assert!(
                list.edges
                    .iter()
                    .all(|&(left, right)| left != right && left.max(right) < list.nodes)
            );
        }
    }
}

pub mod tracing {
    //! Capture layer for asserting spans and events emitted under test.
    use std::{
        collections::BTreeMap,
        fmt,
        sync::{Arc, Mutex, MutexGuard, PoisonError},
    };

    use tracing::{
        Event, Level, Subscriber,
        field::{Field, Visit},
        span::{Attributes, Id, Record},
    };
    use tracing_subscriber::{Layer, Registry, layer::Context, prelude::*, registry::LookupSpan};

    type Fields = BTreeMap<String, String>;

    /// A span observed from creation to close.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct CapturedSpan {
        /// Span name from its metadata.
        pub name: String,
        /// Fields recorded at creation or later via `Span::record`.
        pub fields: Fields,
    }

    impl CapturedSpan {
        /// Returns the rendered value of `field`, if recorded.
        #[must_use]
        pub fn field(&self, field: &str) -> Option<&str> {
            self.fields.get(field).map(String::as_str)
        }
    }

    /// An emitted event.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct CapturedEvent {
        /// Event level.
        pub level: Level,
        /// Structured fields, including `message`.
        pub fields: Fields,
    }

    impl CapturedEvent {
        /// Returns the event message, if any.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.fields.get("message").map(String::as_str)
        }
    }

    #[derive(Default)]
    struct Store {
        spans: Vec<CapturedSpan>,
        events: Vec<CapturedEvent>,
    }

    /// Layer recording closed spans and all events.
    ///
    /// Clones share the same storage, so a test keeps one handle and installs
    /// another.
    ///
    /// # Examples
    /// ```
    /// use cascadia_test_support::tracing::CaptureLayer;
    ///
    /// let capture = CaptureLayer::default();
    /// capture.in_scope(|| tracing::info_span!("demo", answer = 42).in_scope(|| {}));
    /// let span = capture.span("demo").expect("span was closed");
    /// assert_eq!(span.field("answer"), Some("42"));
    /// ```
    #[derive(Clone, Default)]
    pub struct CaptureLayer {
        store: Arc<Mutex<Store>>,
    }

    impl CaptureLayer {
        fn store(&self) -> MutexGuard<'_, Store> {
            self.store.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Runs `f` with this layer installed as the thread's default
        /// subscriber.
        pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
            let subscriber = Registry::default().with(self.clone());
            tracing::subscriber::with_default(subscriber, f)
        }

        /// Returns the closed spans in closing order.
        #[must_use]
        pub fn spans(&self) -> Vec<CapturedSpan> {
            self.store().spans.clone()
        }

        /// Returns the first closed span called `name`.
        #[must_use]
        pub fn span(&self, name: &str) -> Option<CapturedSpan> {
            self.store().spans.iter().find(|span| span.name == name).cloned()
        }

        /// Returns the events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<CapturedEvent> {
            self.store().events.clone()
        }

        /// Returns the events at `level`.
        #[must_use]
        pub fn events_at(&self, level: Level) -> Vec<CapturedEvent> {
            self.store()
                .events
                .iter()
                .filter(|event| event.level == level)
                .cloned()
                .collect()
        }
    }

    struct OpenSpan(CapturedSpan);

    impl<S> Layer<S> for CaptureLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut fields = Fields::new();
            attrs.record(&mut Stringify(&mut fields));
            span.extensions_mut().insert(OpenSpan(CapturedSpan {
                name: attrs.metadata().name().to_owned(),
                fields,
            }));
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut extensions = span.extensions_mut();
            if let Some(open) = extensions.get_mut::<OpenSpan>() {
                values.record(&mut Stringify(&mut open.0.fields));
            }
        }

        fn on_close(&self, id: Id, ctx: Context<'_, S>) {
            let closed = ctx
                .span(&id)
                .and_then(|span| span.extensions_mut().remove::<OpenSpan>());
            if let Some(OpenSpan(closed)) = closed {
                self.store().spans.push(closed);
            }
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields::new();
            event.record(&mut Stringify(&mut fields));
            self.store().events.push(CapturedEvent {
                level: *event.metadata().level(),
                fields,
            });
        }
    }

    /// Renders every field value to a string; `&str` values are kept unquoted.
    struct Stringify<'a>(&'a mut Fields);

    impl Visit for Stringify<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_owned(), value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.0.insert(field.name().to_owned(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_owned(), format!("{value:?}"));
        }
    }

}
