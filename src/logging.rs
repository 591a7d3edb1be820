pub mod logger;

pub mod logging_defs;
#[macro_use]
pub mod macros;

use logger::PerfListener;
use logging_defs::*;
use std::cell::RefCell;
use std::time::Duration;
use std::time::Instant;

/// A [`PerfListener`] that records the total duration of every span it
/// sees, in the order the spans end.  The `linktext` driver uses it for
/// `--timing`; span checkpoints are forwarded to `log::trace!`.
#[derive(Debug, Default)]
pub struct SpanTimings {
    finished: RefCell<Vec<(&'static str, Duration)>>,
}

impl SpanTimings {
    /// Drain the recorded `(span name, duration)` pairs.
    pub fn take(&self) -> Vec<(&'static str, Duration)> {
        std::mem::take(&mut *self.finished.borrow_mut())
    }
}

impl PerfListener for SpanTimings {
    fn is_interested_in_span(&self, _span_id: u64) -> bool {
        true
    }

    fn on_span_start(&self, _span_id: u64, _start_time: Instant) {}

    fn on_check_point(
        &self,
        span_id: u64,
        _point_time: Instant,
        duration_since_last_checkpoint: Duration,
        point_label: &str,
    ) {
        log::trace!(
            "span {} point {}: {} seconds",
            name(span_id),
            point_label,
            duration_since_last_checkpoint.as_secs_f64()
        );
    }

    fn on_annotate(&self, span_id: u64, annotation: &str) {
        log::debug!("span {}: {}", name(span_id), annotation);
    }

    fn on_span_end(&self, span_id: u64, span_duration: Duration) {
        self.finished
            .borrow_mut()
            .push((name(span_id), span_duration));
    }
}
