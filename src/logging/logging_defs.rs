/// Span IDs for performance-logging events.  Each ID must be unique;
/// simply increment when adding a new span.
pub const CONVERT: u64 = 1;
pub const PARSE: u64 = 2;
pub const ANNOTATE: u64 = 3;
pub const IMAGES: u64 = 4;
pub const FLATTEN: u64 = 5;

/// Human-readable name of a span id, or `"UNKNOWN"` for ids this crate
/// never emits.
pub fn name(span_id: u64) -> &'static str {
    match span_id {
        CONVERT => "CONVERT",
        PARSE => "PARSE",
        ANNOTATE => "ANNOTATE",
        IMAGES => "IMAGES",
        FLATTEN => "FLATTEN",
        _ => "UNKNOWN",
    }
}
