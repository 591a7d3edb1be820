use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Deref;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

/// Observer interface for performance-span events.  Implement this trait
/// and wrap it in a [`Listener`] to receive timing data from the conversion
/// pipeline.
///
/// All methods are called synchronously from the conversion code; keep
/// them lightweight.
pub trait PerfListener {
    /// Return whether this listener cares about the given span.  If `false`,
    /// none of the other callbacks will fire for that span.
    fn is_interested_in_span(&self, span_id: u64) -> bool;
    /// Called when a span begins.
    fn on_span_start(&self, span_id: u64, start_time: Instant);
    /// Called at each checkpoint within a span, with the wall-clock duration
    /// since the previous checkpoint (or span start).
    fn on_check_point(
        &self,
        span_id: u64,
        point_time: Instant,
        duration_since_last_checkpoint: Duration,
        label: &str,
    );
    /// Called when a free-text annotation is attached to a span.
    fn on_annotate(&self, span_id: u64, annotation: &str);
    /// Called when a span ends, with its total duration.
    fn on_span_end(&self, span_id: u64, span_duration: Duration);
}

/// A clonable, reference-counted wrapper around a [`PerfListener`].
/// Clone is cheap (just an `Rc` bump); the underlying listener is shared.
#[derive(Clone)]
pub struct Listener {
    inner_impl: Rc<dyn PerfListener>,
}

impl Listener {
    /// Wrap a [`PerfListener`] implementation for use with [`PerfLogger`].
    pub fn new(listener: Rc<dyn PerfListener>) -> Listener {
        Listener {
            inner_impl: listener,
        }
    }
}

impl Deref for Listener {
    type Target = dyn PerfListener;
    fn deref(&self) -> &Self::Target {
        &*self.inner_impl
    }
}

struct PerfEvent {
    span_id: u64,
    start_time: Instant,
    last_point: Option<Instant>,
    listeners: Vec<Listener>,
}

impl PerfEvent {
    fn point(&mut self, label: &str) {
        let time = Instant::now();
        let since = time.duration_since(self.last_point.unwrap_or(self.start_time));
        self.listeners
            .iter()
            .for_each(|l| l.on_check_point(self.span_id, time, since, label));
        self.last_point = Some(time);
    }

    fn annotate(&self, annotation: &str) {
        self.listeners
            .iter()
            .for_each(|l| l.on_annotate(self.span_id, annotation));
    }
}

/// Tracks in-flight performance spans and fans events out to registered
/// [`Listener`]s.
///
/// **Not `Send` or `Sync`**; the internal event map uses `RefCell`.  Each
/// conversion creates its own `PerfLogger`.
pub struct PerfLogger {
    events: RefCell<HashMap<u64, PerfEvent>>,
    listeners: Vec<Listener>,
}

impl PerfLogger {
    /// Create a new logger with the given set of listeners.  Pass an empty
    /// `Vec` to disable all perf logging.
    pub fn new(listeners: Vec<Listener>) -> PerfLogger {
        PerfLogger {
            events: RefCell::new(HashMap::new()),
            listeners,
        }
    }

    /// A logger with no listeners; every span macro short-circuits.
    pub fn disabled() -> PerfLogger {
        PerfLogger::new(vec![])
    }

    pub fn is_active(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Begin a new span identified by `span_id`.  Only listeners that
    /// return `true` from [`PerfListener::is_interested_in_span`] are
    /// notified and stored.
    pub fn start(&self, span_id: u64) {
        let event_listeners = self
            .listeners
            .iter()
            .filter(|l| l.is_interested_in_span(span_id))
            .cloned()
            .collect::<Vec<_>>();
        if event_listeners.is_empty() {
            return;
        }
        let start_time = Instant::now();
        event_listeners
            .iter()
            .for_each(|l| l.on_span_start(span_id, start_time));
        self.events.borrow_mut().insert(
            span_id,
            PerfEvent {
                span_id,
                start_time,
                last_point: None,
                listeners: event_listeners,
            },
        );
    }

    /// Record a checkpoint with a `&str` label inside the given span.
    pub fn check_point_str(&self, span_id: u64, label: &str) {
        if let Some(event) = self.events.borrow_mut().get_mut(&span_id) {
            event.point(label);
        }
    }

    /// Attach a free-text annotation to the given span.
    pub fn annotate(&self, span_id: u64, annotation: String) {
        if let Some(event) = self.events.borrow().get(&span_id) {
            event.annotate(annotation.as_str());
        }
    }

    /// End the span, notify listeners with the total duration, and remove
    /// it from the active-events map.
    pub fn end(&self, span_id: u64) {
        if let Some(event) = self.events.borrow_mut().remove(&span_id) {
            let duration = event.start_time.elapsed();
            event
                .listeners
                .iter()
                .for_each(|l| l.on_span_end(span_id, duration));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::logging_defs::{ANNOTATE, FLATTEN};

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl PerfListener for Recorder {
        fn is_interested_in_span(&self, span_id: u64) -> bool {
            span_id == ANNOTATE
        }
        fn on_span_start(&self, span_id: u64, _start_time: Instant) {
            self.events.borrow_mut().push(format!("start:{span_id}"));
        }
        fn on_check_point(&self, _span_id: u64, _t: Instant, _d: Duration, label: &str) {
            self.events.borrow_mut().push(format!("point:{label}"));
        }
        fn on_annotate(&self, _span_id: u64, annotation: &str) {
            self.events.borrow_mut().push(format!("note:{annotation}"));
        }
        fn on_span_end(&self, span_id: u64, _span_duration: Duration) {
            self.events.borrow_mut().push(format!("end:{span_id}"));
        }
    }

    #[test]
    fn only_interesting_spans_reach_the_listener() {
        let recorder = Rc::new(Recorder::default());
        let logger = PerfLogger::new(vec![Listener::new(recorder.clone())]);

        logger.start(FLATTEN);
        logger.check_point_str(FLATTEN, "ignored");
        logger.end(FLATTEN);

        logger.start(ANNOTATE);
        logger.check_point_str(ANNOTATE, "collected");
        logger.annotate(ANNOTATE, "2 anchors".to_string());
        logger.end(ANNOTATE);

        assert_eq!(
            *recorder.events.borrow(),
            vec!["start:3", "point:collected", "note:2 anchors", "end:3"]
        );
    }

    #[test]
    fn disabled_logger_is_inactive() {
        let logger = PerfLogger::disabled();
        assert!(!logger.is_active());
        logger.start(ANNOTATE);
        logger.end(ANNOTATE);
    }
}
