use crate::annotator::annotate_links;
use crate::flattener::flatten_with_logger;
use crate::images::remove_images;
use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::models::{ConvertOptions, ImageHandling};
use crate::parser::parse_html;
use crate::utils::document_base_url;

/// One HTML-to-text run: parse, annotate links, handle images, flatten.
///
/// Prefer [`crate::convert`] / [`crate::convert_with_options`] unless you
/// need to attach perf listeners.
pub struct Converter<'a> {
    pub html: &'a str,
    pub options: ConvertOptions,
    logger: PerfLogger,
}

impl Converter<'_> {
    pub fn new<'a>(html: &'a str, options: ConvertOptions) -> Converter<'a> {
        Converter::with_listeners(html, options, vec![])
    }

    /// Like [`Converter::new`], with every stage reported to `listeners`.
    pub fn with_listeners<'a>(
        html: &'a str,
        options: ConvertOptions,
        listeners: Vec<Listener>,
    ) -> Converter<'a> {
        Converter {
            html,
            options,
            logger: PerfLogger::new(listeners),
        }
    }

    pub fn convert(self) -> String {
        let logger = &self.logger;
        start_span!(logger, CONVERT);

        start_span!(logger, PARSE);
        let document = parse_html(self.html);
        let base_url = document_base_url(&document, self.options.base_url.as_ref());
        end_span!(logger, PARSE);
        add_point_to_span_str!(logger, CONVERT, "parsed");

        annotate_links(&document, &self.options.policy, base_url.as_ref(), logger);
        add_point_to_span_str!(logger, CONVERT, "annotated");

        match self.options.images {
            ImageHandling::Keep => {}
            ImageHandling::Remove => {
                remove_images(&document, false, logger);
            }
            ImageHandling::PreserveAlt => {
                remove_images(&document, true, logger);
            }
        }

        let text = flatten_with_logger(&document, logger);
        add_point_to_span_str!(logger, CONVERT, "flattened");
        end_span!(logger, CONVERT);
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::SpanTimings;
    use crate::models::AnnotationPolicy;
    use std::rc::Rc;
    use url::Url;

    #[test]
    fn every_stage_reports_a_span() {
        let timings = Rc::new(SpanTimings::default());
        let options = ConvertOptions {
            images: ImageHandling::Remove,
            ..ConvertOptions::default()
        };
        let text = Converter::with_listeners(
            "<p><a href='http://a.com'>a</a><img src='x.png'></p>",
            options,
            vec![Listener::new(timings.clone())],
        )
        .convert();
        assert_eq!(text, "a [http://a.com/]");

        let names = timings.take().into_iter().map(|(n, _)| n).collect::<Vec<_>>();
        assert_eq!(names, vec!["PARSE", "ANNOTATE", "IMAGES", "FLATTEN", "CONVERT"]);
    }

    #[test]
    fn external_base_resolves_relative_links() {
        let options = ConvertOptions {
            policy: AnnotationPolicy::default(),
            base_url: Some(Url::parse("https://example.com/mail/").unwrap()),
            images: ImageHandling::Keep,
        };
        let text = Converter::new("<a href='unsubscribe'>Unsubscribe</a>", options).convert();
        assert_eq!(text, "Unsubscribe [https://example.com/mail/unsubscribe]");
    }

    #[test]
    fn image_alt_text_is_preserved_inside_links() {
        let options = ConvertOptions {
            images: ImageHandling::PreserveAlt,
            ..ConvertOptions::default()
        };
        let text = Converter::new(
            "<p>See <a href='http://a.com'>site <img src='x.png' alt='logo'></a></p>",
            options,
        )
        .convert();
        assert_eq!(text, "See site [IMAGE: logo] [http://a.com/]");
    }
}
