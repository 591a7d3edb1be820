//! Thin wrappers around [`super::logger::PerfLogger`] that short-circuit when
//! the logger has no listeners (see `PerfLogger::is_active`).
//!
//! | Macro | Forwards to |
//! |---|---|
//! | `start_span!` | `PerfLogger::start` |
//! | `end_span!` | `PerfLogger::end` |
//! | `add_point_to_span_str!` | `PerfLogger::check_point_str` |
//! | `annotate_span!` | `PerfLogger::annotate` (owned label) |

macro_rules! start_span {
    ($logger:ident, $span_id:ident) => {
        if $logger.is_active() {
            $logger.start($span_id);
        }
    };
}

macro_rules! add_point_to_span_str {
    ($logger:ident, $span_id:ident, $point_str:expr) => {
        if $logger.is_active() {
            $logger.check_point_str($span_id, $point_str);
        }
    };
}

macro_rules! annotate_span {
    ($logger:ident, $span_id:ident, $annotation:expr) => {
        if $logger.is_active() {
            $logger.annotate($span_id, $annotation);
        }
    };
}

macro_rules! end_span {
    ($logger:ident, $span_id:ident) => {
        if $logger.is_active() {
            $logger.end($span_id);
        }
    };
}
