use crate::annotator::{annotate_links, collect_anchors};
use crate::flattener::flatten;
use crate::logging::logger::PerfLogger;
use crate::models::{Anchor, AnnotationPolicy};
use crate::node_utils::deep_clone;
use crate::parser::{NodeRef, parse_html};
use crate::utils::document_base_url;
use url::Url;

/// A parsed HTML document together with its effective base URL.
///
/// Parsing is lenient: any input, including the empty string, produces a
/// tree with an (possibly empty) `<body>`.
///
/// # Examples
///
/// ```rust
/// use linktext_rs::{AnnotationPolicy, Document};
///
/// let doc = Document::parse(r#"<p><a href="http://foo.com">bar</a></p>"#);
/// let annotated = doc.annotate(&AnnotationPolicy::default());
/// assert_eq!(annotated.flatten(), "bar [http://foo.com/]");
/// assert_eq!(doc.flatten(), "bar");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    root: NodeRef,
    base_url: Option<Url>,
}

impl Document {
    pub fn parse(html: &str) -> Document {
        Document::parse_with_base(html, None)
    }

    /// Parse `html`, resolving relative links against `base_url` unless the
    /// document declares an absolute `<base href>` of its own.
    pub fn parse_with_base(html: &str, base_url: Option<&Url>) -> Document {
        let root = parse_html(html);
        Document::from_root(root, base_url)
    }

    /// Wrap an already parsed tree.
    pub fn from_root(root: NodeRef, base_url: Option<&Url>) -> Document {
        let base_url = document_base_url(&root, base_url);
        Document { root, base_url }
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// The URL relative hrefs resolve against, if any.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Every anchor in the body, in document order.
    pub fn anchors(&self) -> Vec<Anchor> {
        collect_anchors(&self.root, self.base_url.as_ref())
    }

    /// Return an annotated copy; `self` is left untouched.
    pub fn annotate(&self, policy: &AnnotationPolicy) -> Document {
        let copy = Document {
            root: deep_clone(&self.root),
            base_url: self.base_url.clone(),
        };
        copy.annotate_in_place(policy);
        copy
    }

    /// Annotate this document's anchors and return how many changed.  Not
    /// idempotent: a second call appends a second suffix.
    pub fn annotate_in_place(&self, policy: &AnnotationPolicy) -> usize {
        annotate_links(
            &self.root,
            policy,
            self.base_url.as_ref(),
            &PerfLogger::disabled(),
        )
    }

    /// Render the body as plain text.
    pub fn flatten(&self) -> String {
        flatten(&self.root)
    }

    /// Serialise the whole tree back to HTML.
    pub fn to_html(&self) -> String {
        self.root.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pure_annotation_leaves_source_untouched() {
        let doc = Document::parse(r#"<a href="http://foo.com">bar</a>"#);
        let before = doc.to_html();
        let annotated = doc.annotate(&AnnotationPolicy::default());
        assert_eq!(doc.to_html(), before);
        assert_eq!(annotated.flatten(), "bar [http://foo.com/]");
    }

    #[test]
    fn in_place_annotation_twice_appends_twice() {
        let doc = Document::parse(r#"<a href="http://foo.com">bar</a>"#);
        assert_eq!(doc.annotate_in_place(&AnnotationPolicy::default()), 1);
        assert_eq!(doc.annotate_in_place(&AnnotationPolicy::default()), 1);
        assert_eq!(doc.flatten(), "bar [http://foo.com/] [http://foo.com/]");
    }

    #[test]
    fn base_element_is_used_for_anchor_resolution() {
        let doc = Document::parse(
            r#"<html><head><base href="https://example.com/a/"></head>
               <body><a href="b.html">B</a></body></html>"#,
        );
        assert_eq!(doc.base_url().map(Url::as_str), Some("https://example.com/a/"));
        let anchors = doc.anchors();
        assert_eq!(anchors.len(), 1);
        assert_eq!(
            anchors[0].resolved_href.as_deref(),
            Some("https://example.com/a/b.html")
        );
    }
}
