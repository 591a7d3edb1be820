use crate::parser::{NodeExt, NodeRef};
use url::Url;

/// Collect every descendant of `node` matching the CSS `selector`, in
/// document order.  An invalid selector yields an empty list.
pub fn select_descendants(node: &NodeRef, selector: &str) -> Vec<NodeRef> {
    match node.select(selector) {
        Ok(nodes) => nodes.map(|n| n.as_node().clone()).collect(),
        Err(_) => vec![],
    }
}

/// The subtree that renders: `<body>` when the parser produced one,
/// otherwise `root` itself.
pub fn body_or_root(root: &NodeRef) -> NodeRef {
    match root.select_first("body") {
        Ok(body) => body.as_node().clone(),
        Err(_) => root.clone(),
    }
}

/// Compute the effective base URL of a document.
///
/// The first `<base href>` wins.  An absolute value is used as is; a
/// relative one is resolved against `external`.  Without a usable
/// `<base>`, `external` itself is the base.
pub fn document_base_url(doc: &NodeRef, external: Option<&Url>) -> Option<Url> {
    let base_href = doc
        .select_first("base[href]")
        .ok()
        .and_then(|base| base.as_node().attr_value("href"));
    let Some(base_href) = base_href else {
        return external.cloned();
    };
    let base_href = base_href.trim();
    if let Ok(parsed) = Url::parse(base_href) {
        return Some(parsed);
    }
    match external {
        Some(external) => external.join(base_href).ok().or_else(|| Some(external.clone())),
        None => None,
    }
}

/// Convert a potentially-relative URI to an absolute one using `base`.
/// Absolute URIs are normalised by the URL parser (for example
/// `http://foo.com` becomes `http://foo.com/`).  With no base, or when
/// joining fails, the trimmed input is returned unchanged.
pub fn resolve_href(uri: &str, base: Option<&Url>) -> String {
    let uri = uri.trim();
    if let Ok(parsed) = Url::parse(uri) {
        return parsed.into();
    }
    if let Some(base) = base {
        if let Ok(joined) = base.join(uri) {
            return joined.into();
        }
    }
    uri.to_string()
}

fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

/// `true` if `href` starts with `http://` or `https://`, ignoring ASCII case.
pub fn has_http_scheme(href: &str) -> bool {
    starts_with_ignore_ascii_case(href, "http://") || starts_with_ignore_ascii_case(href, "https://")
}

/// Whether the visible `text` of a link already spells out its target.
///
/// `text` matches when it equals the raw `href`, the `resolved` href, or
/// parses as an absolute URL that normalises to `resolved`.
pub fn text_matches_href(text: &str, href: &str, resolved: &str) -> bool {
    if text == href.trim() || text == resolved {
        return true;
    }
    Url::parse(text).is_ok_and(|parsed| parsed.as_str() == resolved)
}

/// Whitespace that HTML collapses.  Non-breaking and typographic spaces
/// are deliberately not in this set.
pub fn is_ascii_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0C')
}
