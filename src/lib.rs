//! Render HTML (typically an email body) as plain text while keeping every
//! hyperlink's destination next to its visible text.
//!
//! ## Quick start
//!
//! ```rust
//! use linktext_rs::{convert, AnnotationPolicy};
//!
//! let html = r#"<html><body><p>Read <a href="http://foo.com">bar</a>.</p></body></html>"#;
//! assert_eq!(convert(html, &AnnotationPolicy::default()), "Read bar [http://foo.com/].");
//! ```
//!
//! ## Module layout
//!
//! * **Top level**: [`convert`] and [`convert_with_options`] are the entry
//!   points.  [`AnnotationPolicy`] decides which links are annotated and
//!   with which delimiters; [`ConvertOptions`] adds a base URL and image
//!   handling.
//! * [`Document`]: a parsed tree with its base URL, offering a pure
//!   [`Document::annotate`] as well as in-place annotation and flattening.
//! * [`parser`]: thin wrappers around the underlying HTML parser.
//! * [`perf`]: listener types for per-stage timing of a [`Converter`] run.
//!
//! ## Policy options
//!
//! | key | value |
//! |---|---|
//! | `require_non_empty_text` | boolean, skip links without their own text |
//! | `require_http_scheme` | boolean, skip links that are not `http(s)://` |
//! | `skip_when_text_equals_href` | boolean, skip links that already show their URL |
//! | `delimiters` | `[]`, `<>`, or `OPEN CLOSE` |
//! | `delimiter_open`, `delimiter_close` | any string |
//!
//! Booleans accept `true/false`, `yes/no`, `on/off` and `1/0`.  Keys may be
//! written in snake_case, kebab-case or camelCase.

#[macro_use]
mod logging;

mod annotator;
mod config;
mod converter;
mod document;
mod error;
mod flattener;
mod images;
mod models;
mod node_utils;
mod utils;

pub use annotator::{annotate_links, collect_anchors};
pub use config::parse_option_pair;
pub use converter::Converter;
pub use document::Document;
pub use error::PolicyConfigError;
pub use flattener::flatten;
pub use images::remove_images;
pub use models::{
    Anchor, AnnotationFilters, AnnotationPolicy, ConvertOptions, Delimiters, ImageHandling,
};
pub use node_utils::NodeExt;

/// Per-stage performance listeners.
///
/// Register a [`perf::Listener`] with [`Converter::with_listeners`] to
/// receive span events for the `CONVERT`, `PARSE`, `ANNOTATE`, `IMAGES`
/// and `FLATTEN` stages.
pub mod perf {
    pub use crate::logging::logger::{Listener, PerfListener, PerfLogger};
    pub use crate::logging::logging_defs::{name, ANNOTATE, CONVERT, FLATTEN, IMAGES, PARSE};
    pub use crate::logging::SpanTimings;
}

/// Thin wrappers around the underlying HTML parser.
///
/// [`NodeRef`] is the reference-counted DOM node type used throughout the crate.
/// [`parse_html`] parses a complete HTML document into a [`NodeRef`] tree.
pub mod parser {
    use kuchikikiki::traits::TendrilSink;
    pub use kuchikikiki::NodeRef;
    pub use crate::node_utils::NodeExt;

    /// Parse an HTML string into a [`NodeRef`] document tree.
    ///
    /// The parser follows the HTML5 specification; an implicit `<html>`, `<head>`,
    /// and `<body>` are synthesised when missing, and malformed markup is
    /// repaired rather than rejected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use linktext_rs::parser::parse_html;
    ///
    /// let doc = parse_html("<div><p>hello</p></div>");
    /// assert!(doc.select_first("p").is_ok());
    /// ```
    pub fn parse_html(html: &str) -> NodeRef {
        kuchikikiki::parse_html().one(html)
    }
}

/// Convert an HTML document to plain text, annotating links per `policy`.
///
/// Relative hrefs resolve only against the document's own `<base href>`;
/// use [`convert_with_options`] to supply an external base URL.
///
/// # Examples
///
/// ```rust
/// use linktext_rs::{convert, AnnotationPolicy};
///
/// let policy = AnnotationPolicy::default();
/// assert_eq!(convert("<a href='mailto:x@y.com'>x</a>", &policy), "x");
/// assert_eq!(convert("<html><body></body></html>", &policy), "");
/// ```
pub fn convert(html_source: &str, policy: &AnnotationPolicy) -> String {
    convert_with_options(
        html_source,
        ConvertOptions {
            policy: policy.clone(),
            ..ConvertOptions::default()
        },
    )
}

/// Convert an HTML document to plain text with full control over the base
/// URL and image handling.
pub fn convert_with_options(html_source: &str, options: ConvertOptions) -> String {
    Converter::new(html_source, options).convert()
}
