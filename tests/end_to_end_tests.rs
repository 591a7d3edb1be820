#[cfg(test)]
mod tests {
    use linktext_rs::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use url::Url;

    use std::fs;
    use std::path::Path;
    use test_generator::test_resources;

    #[derive(Deserialize, Debug, Default)]
    #[serde(deny_unknown_fields)]
    struct FixtureOptions {
        #[serde(default)]
        pub policy: Option<serde_json::Value>,
        #[serde(default)]
        pub base_url: Option<String>,
        #[serde(default)]
        pub images: Option<String>,
    }

    fn read_fixture(dir: &Path, name: &str) -> String {
        let path = dir.join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()))
    }

    fn load_options(dir: &Path) -> ConvertOptions {
        let path = dir.join("options.json");
        if !path.exists() {
            return ConvertOptions::default();
        }
        let fixture: FixtureOptions = serde_json::from_str(&read_fixture(dir, "options.json"))
            .unwrap_or_else(|err| panic!("bad {}: {err}", path.display()));

        let policy = match fixture.policy {
            Some(value) => AnnotationPolicy::from_json(&value.to_string())
                .unwrap_or_else(|err| panic!("bad policy in {}: {err}", path.display())),
            None => AnnotationPolicy::default(),
        };
        let images = match fixture.images.as_deref() {
            None | Some("keep") => ImageHandling::Keep,
            Some("remove") => ImageHandling::Remove,
            Some("preserve_alt") => ImageHandling::PreserveAlt,
            Some(other) => panic!("unknown image handling `{other}` in {}", path.display()),
        };
        ConvertOptions {
            policy,
            base_url: fixture
                .base_url
                .map(|url| Url::parse(&url).expect("fixture base_url must be absolute")),
            images,
        }
    }

    #[test_resources("./tests/fixtures/*")]
    fn fixture_converts_to_expected_text(resource: &str) {
        let dir = Path::new(resource);
        let source = read_fixture(dir, "source.html");
        let expected = read_fixture(dir, "expected.txt");
        let expected = expected.strip_suffix('\n').unwrap_or(&expected);

        let options = load_options(dir);
        let actual = convert_with_options(&source, options.clone());
        assert_eq!(actual, expected, "fixture {resource}");

        // Same input, same output.
        assert_eq!(convert_with_options(&source, options), actual);
    }

    #[test_resources("./tests/fixtures/*")]
    fn fixture_source_is_not_changed_by_pure_annotation(resource: &str) {
        let dir = Path::new(resource);
        let source = read_fixture(dir, "source.html");
        let options = load_options(dir);

        let doc = Document::parse_with_base(&source, options.base_url.as_ref());
        let before = doc.to_html();
        let annotated = doc.annotate(&options.policy);
        assert_eq!(doc.to_html(), before);

        assert_eq!(annotated.anchors().len(), doc.anchors().len());
    }

    #[test]
    fn default_policy_matches_documented_examples() {
        let policy = AnnotationPolicy::default();
        assert_eq!(
            convert(r#"<a href="http://foo.com">bar</a>"#, &policy),
            "bar [http://foo.com/]"
        );
        assert_eq!(
            convert(r#"<a href="http://foo.com">http://foo.com</a>"#, &policy),
            "http://foo.com"
        );
        assert_eq!(convert(r#"<a href="mailto:a@b.com">mail us</a>"#, &policy), "mail us");
        assert_eq!(convert("", &policy), "");
    }

    #[test]
    fn unfiltered_policy_annotates_every_link_with_an_href() {
        let policy = AnnotationPolicy::unfiltered().with_delimiters(Delimiters::angle());
        assert_eq!(
            convert(
                r#"<p><a href="mailto:a@b.com">a@b.com</a> <a href="x"><img src="x.png"></a> <a>none</a></p>"#,
                &policy
            ),
            "a@b.com <mailto:a@b.com> <x> none"
        );
    }
}
