//! Appends each qualifying link's resolved URL to its visible text.
//!
//! Annotation runs in two phases.  Every anchor is first captured as an
//! [`Anchor`] and judged by the [`AnnotationPolicy`]; only then are the
//! selected anchors mutated.  No decision can therefore see another
//! anchor's suffix, which keeps the outcome independent of processing order
//! (including for nested anchors in malformed markup).

use crate::logging::logger::PerfLogger;
use crate::logging::logging_defs::ANNOTATE;
use crate::models::{Anchor, AnnotationPolicy};
use crate::parser::{NodeExt, NodeRef};
use crate::utils::{body_or_root, resolve_href, select_descendants};
use url::Url;

impl Anchor {
    /// Capture `node` as an anchor, resolving its `href` against `base`.
    /// Returns `None` when `node` is not an `<a>` element.
    pub fn from_node(node: &NodeRef, base: Option<&Url>) -> Option<Anchor> {
        if node.element_name() != Some("a") {
            return None;
        }
        let href = node.attr_value("href");
        let resolved_href = href.as_deref().map(|h| resolve_href(h, base));
        Some(Anchor {
            node: node.clone(),
            href,
            resolved_href,
            immediate_text: node.immediate_text(),
        })
    }
}

/// All anchors below the document body (or below `root` when there is no
/// body), in document order.
pub fn collect_anchors(root: &NodeRef, base: Option<&Url>) -> Vec<Anchor> {
    select_descendants(&body_or_root(root), "a")
        .iter()
        .filter_map(|node| Anchor::from_node(node, base))
        .collect()
}

/// The anchors `policy` selects, each paired with the text to append.
pub fn plan_annotations(anchors: &[Anchor], policy: &AnnotationPolicy) -> Vec<(NodeRef, String)> {
    anchors
        .iter()
        .filter_map(|anchor| {
            if !policy.should_annotate(anchor) {
                log::debug!(
                    "leaving link as is: href={:?} text={:?}",
                    anchor.href,
                    anchor.immediate_text
                );
                return None;
            }
            let resolved = anchor.resolved_href.as_deref()?;
            Some((anchor.node.clone(), policy.suffix_for(resolved)))
        })
        .collect()
}

/// Annotate every qualifying anchor under `root` in place and return how
/// many were changed.
///
/// The suffix is appended as a new last text node of the anchor, so for a
/// link whose only content is an image it lands at the end of the link's
/// full text.  Running this twice appends a second suffix.
pub fn annotate_links(
    root: &NodeRef,
    policy: &AnnotationPolicy,
    base: Option<&Url>,
    logger: &PerfLogger,
) -> usize {
    start_span!(logger, ANNOTATE);
    let anchors = collect_anchors(root, base);
    add_point_to_span_str!(logger, ANNOTATE, "anchors_collected");
    let plan = plan_annotations(&anchors, policy);
    add_point_to_span_str!(logger, ANNOTATE, "policy_evaluated");

    for (node, suffix) in &plan {
        log::debug!("annotating link: {suffix:?}");
        node.append(NodeRef::new_text(suffix.as_str()));
    }
    annotate_span!(
        logger,
        ANNOTATE,
        format!("{} of {} links annotated", plan.len(), anchors.len())
    );
    end_span!(logger, ANNOTATE);
    plan.len()
}
