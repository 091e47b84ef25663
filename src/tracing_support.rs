//! Tracing support for algorithm runs.
//!
//! With the `tracing` feature every `compute` call opens a span named after
//! its algorithm, and [`init_tracing`] installs a layer that accumulates the
//! time spent in each span name.  Without the feature the span and event
//! macros compile to nothing.

#[cfg(feature = "tracing")]
mod enabled {
    use std::{
        cell::RefCell,
        collections::BTreeMap,
        sync::Once,
        time::{Duration, Instant},
    };

    use tracing_subscriber::{
        Layer, Registry, layer::Context, layer::SubscriberExt, registry::LookupSpan,
        util::SubscriberInitExt,
    };

    thread_local! {
        static SPAN_TIMINGS: RefCell<BTreeMap<&'static str, (Duration, usize)>> =
            const { RefCell::new(BTreeMap::new()) };
    }

    struct TimingLayer;

    impl<S> Layer<S> for TimingLayer
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_new_span(
            &self,
            _attrs: &tracing::span::Attributes<'_>,
            id: &tracing::Id,
            ctx: Context<'_, S>,
        ) {
            if let Some(span) = ctx.span(id) {
                span.extensions_mut().insert(Instant::now());
            }
        }

        fn on_close(&self, id: tracing::Id, ctx: Context<'_, S>) {
            if let Some(span) = ctx.span(&id) {
                let name = span.metadata().name();
                if let Some(start) = span.extensions().get::<Instant>() {
                    let elapsed = start.elapsed();
                    SPAN_TIMINGS.with(|totals| {
                        let mut totals = totals.borrow_mut();
                        let entry = totals.entry(name).or_insert((Duration::ZERO, 0));
                        entry.0 += elapsed;
                        entry.1 += 1;
                    });
                }
            }
        }
    }

    /// Installs the timing layer as the global subscriber.  Later calls, and
    /// calls made after another subscriber was installed, do nothing.
    pub fn init_tracing() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = Registry::default().with(TimingLayer).try_init();
        });
    }

    /// Returns `(span name, total time, count)` for every span closed on this
    /// thread since the last reset, slowest first.
    pub fn method_timings() -> Vec<(&'static str, Duration, usize)> {
        let mut entries: Vec<_> = SPAN_TIMINGS.with(|totals| {
            totals
                .borrow()
                .iter()
                .map(|(name, (duration, count))| (*name, *duration, *count))
                .collect()
        });
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    #[doc(hidden)]
    pub fn reset_method_timings() {
        init_tracing();
        SPAN_TIMINGS.with(|totals| totals.borrow_mut().clear());
    }

    #[doc(hidden)]
    pub fn dump_method_timings() {
        eprintln!("span timings (desc):");
        for (name, duration, count) in method_timings() {
            eprintln!("  {name}: {duration:?} ({count}x)");
        }
    }

    pub use tracing::{debug, info_span};
}

#[cfg(not(feature = "tracing"))]
mod disabled {
    use std::time::Duration;

    pub fn init_tracing() {}

    pub fn method_timings() -> Vec<(&'static str, Duration, usize)> {
        Vec::new()
    }

    #[doc(hidden)]
    pub fn reset_method_timings() {}

    #[doc(hidden)]
    pub fn dump_method_timings() {}

    macro_rules! info_span {
        ($name:expr) => {{ $crate::tracing_support::NoOpSpan }};
        ($name:expr, $($fields:tt)*) => {{ $crate::tracing_support::NoOpSpan }};
    }

    macro_rules! debug {
        ($($tokens:tt)*) => {{}};
    }

    pub(crate) use {debug, info_span};

    pub struct NoOpSpan;

    impl NoOpSpan {
        pub fn entered(self) -> NoOpSpanGuard {
            NoOpSpanGuard
        }
    }

    pub struct NoOpSpanGuard;
}

#[cfg(feature = "tracing")]
pub use enabled::*;

#[cfg(not(feature = "tracing"))]
pub use disabled::*;

#[cfg(not(feature = "tracing"))]
pub(crate) use disabled::{debug, info_span};
