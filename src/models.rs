use crate::parser::NodeRef;
use crate::utils::{has_http_scheme, text_matches_href};
use bitflags::bitflags;
use url::Url;

bitflags! {
    /// The filters an [`AnnotationPolicy`] applies before annotating an
    /// anchor.  Every set flag is one more reason to leave an anchor alone.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AnnotationFilters: u8 {
        /// Skip anchors whose immediate text is empty or whitespace only.
        const REQUIRE_NON_EMPTY_TEXT     = 1 << 0;
        /// Skip anchors whose resolved href is not `http://` or `https://`.
        const REQUIRE_HTTP_SCHEME        = 1 << 1;
        /// Skip anchors whose text already spells out the href.
        const SKIP_WHEN_TEXT_EQUALS_HREF = 1 << 2;
    }
}

/// The pair of strings wrapped around an appended URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Delimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Delimiters {
        Delimiters {
            open: open.into(),
            close: close.into(),
        }
    }

    /// `[` and `]`.
    pub fn square() -> Delimiters {
        Delimiters::new("[", "]")
    }

    /// `<` and `>`.
    pub fn angle() -> Delimiters {
        Delimiters::new("<", ">")
    }

    pub(crate) fn wrap(&self, href: &str) -> String {
        format!(" {}{}{}", self.open, href, self.close)
    }
}

impl Default for Delimiters {
    fn default() -> Delimiters {
        Delimiters::square()
    }
}

/// A hyperlink element as seen by an [`AnnotationPolicy`].
///
/// The fields are captured once, before any document mutation, so a policy
/// decision never observes another anchor's annotation.
#[derive(Debug, Clone)]
pub struct Anchor {
    pub(crate) node: NodeRef,
    /// The raw `href` attribute, or `None` when the attribute is absent.
    pub href: Option<String>,
    /// `href` resolved against the document base URL.  Relative values are
    /// kept verbatim when no base URL is known.
    pub resolved_href: Option<String>,
    /// Concatenation of the anchor's direct child text nodes.  Text inside
    /// nested elements is not included.
    pub immediate_text: String,
}

impl Anchor {
    /// The `<a>` element this anchor was read from.
    pub fn node(&self) -> &NodeRef {
        &self.node
    }
}

/// Decides which anchors get their URL appended, and how it is wrapped.
///
/// The default policy is the conservative one: every filter is enabled and
/// URLs are wrapped in square brackets.
///
/// # Examples
///
/// ```rust
/// use linktext_rs::{AnnotationFilters, AnnotationPolicy, Delimiters};
///
/// let mut policy = AnnotationPolicy::default();
/// policy.filters.remove(AnnotationFilters::REQUIRE_HTTP_SCHEME);
/// policy.delimiters = Delimiters::angle();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationPolicy {
    pub filters: AnnotationFilters,
    pub delimiters: Delimiters,
}

impl Default for AnnotationPolicy {
    fn default() -> AnnotationPolicy {
        AnnotationPolicy {
            filters: AnnotationFilters::all(),
            delimiters: Delimiters::default(),
        }
    }
}

impl AnnotationPolicy {
    /// A policy that annotates every anchor carrying an `href`.
    pub fn unfiltered() -> AnnotationPolicy {
        AnnotationPolicy {
            filters: AnnotationFilters::empty(),
            delimiters: Delimiters::default(),
        }
    }

    pub fn with_delimiters(mut self, delimiters: Delimiters) -> AnnotationPolicy {
        self.delimiters = delimiters;
        self
    }

    /// Whether `anchor` should have its resolved href appended.  Reads only
    /// the anchor's own href and text.
    pub fn should_annotate(&self, anchor: &Anchor) -> bool {
        let (Some(href), Some(resolved)) = (anchor.href.as_deref(), anchor.resolved_href.as_deref())
        else {
            return false;
        };
        let text = anchor.immediate_text.trim();

        if self.filters.contains(AnnotationFilters::REQUIRE_NON_EMPTY_TEXT) && text.is_empty() {
            return false;
        }
        if self.filters.contains(AnnotationFilters::REQUIRE_HTTP_SCHEME)
            && !has_http_scheme(resolved)
        {
            return false;
        }
        if self
            .filters
            .contains(AnnotationFilters::SKIP_WHEN_TEXT_EQUALS_HREF)
            && text_matches_href(text, href, resolved)
        {
            return false;
        }
        true
    }

    /// The text appended to an anchor whose resolved href is `resolved`.
    pub fn suffix_for(&self, resolved: &str) -> String {
        self.delimiters.wrap(resolved)
    }
}

/// What happens to `<img>` elements before flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageHandling {
    /// Leave images in place; they contribute no text.
    #[default]
    Keep,
    /// Detach every image.
    Remove,
    /// Replace images that have an `alt` text with `[IMAGE: <alt>]`.
    PreserveAlt,
}

/// Knobs for a full [`crate::convert_with_options`] run.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub policy: AnnotationPolicy,
    /// Base URL used when the document has no absolute `<base href>`.
    /// Without one, relative hrefs stay relative.
    pub base_url: Option<Url>,
    pub images: ImageHandling,
}
