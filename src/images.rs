use crate::logging::logger::PerfLogger;
use crate::logging::logging_defs::IMAGES;
use crate::parser::{NodeExt, NodeRef};
use crate::utils::select_descendants;

/// Detach every `<img>` under `root` and return how many were removed.
///
/// With `preserve_alt`, an image carrying a non-empty `alt` is replaced by
/// the text `[IMAGE: <alt>]`, so the description survives into the plain
/// text.
pub fn remove_images(root: &NodeRef, preserve_alt: bool, logger: &PerfLogger) -> usize {
    start_span!(logger, IMAGES);
    let images = select_descendants(root, "img");
    for img in &images {
        if preserve_alt {
            let alt = img.attr_value("alt").unwrap_or_default();
            let alt = alt.trim();
            if !alt.is_empty() {
                img.insert_after(NodeRef::new_text(format!("[IMAGE: {alt}]")));
            }
        }
        img.detach();
    }
    end_span!(logger, IMAGES);
    images.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;

    #[test]
    fn images_are_removed() {
        let doc = parse_html("<p>Hello World!<img src='hw.jpg' alt='Hello World!'></p>");
        assert_eq!(remove_images(&doc, false, &PerfLogger::disabled()), 1);
        let p = doc.select_first("p").unwrap();
        assert_eq!(p.as_node().inner_html(), "Hello World!");
    }

    #[test]
    fn alt_text_can_be_preserved() {
        let doc = parse_html("<p>Logo: <img src='a.png' alt=' ACME '><img src='b.png'></p>");
        assert_eq!(remove_images(&doc, true, &PerfLogger::disabled()), 2);
        let p = doc.select_first("p").unwrap();
        assert_eq!(p.as_node().inner_html(), "Logo: [IMAGE: ACME]");
    }
}
