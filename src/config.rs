//! Building an [`AnnotationPolicy`] from textual options.
//!
//! Three front ends feed the same keys: `KEY=VALUE` pairs
//! ([`AnnotationPolicy::set_option`]), a comma-separated list
//! ([`std::str::FromStr`]) and a JSON object ([`AnnotationPolicy::from_json`]).
//! Any unknown key is rejected before a document is ever parsed.

use crate::error::PolicyConfigError;
use crate::models::{AnnotationFilters, AnnotationPolicy, Delimiters};
use serde::Deserialize;
use std::str::FromStr;

/// JSON shape of a policy.  Absent keys keep their default value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyDocument {
    require_non_empty_text: Option<bool>,
    require_http_scheme: Option<bool>,
    skip_when_text_equals_href: Option<bool>,
    delimiters: Option<(String, String)>,
    delimiter_open: Option<String>,
    delimiter_close: Option<String>,
}

/// Fold `-` into `_` and camelCase into snake_case, so `requireHttpScheme`,
/// `require-http-scheme` and `require_http_scheme` name the same option.
fn canonical_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.trim().chars() {
        match ch {
            '-' => out.push('_'),
            c if c.is_ascii_uppercase() => {
                if !out.is_empty() && !out.ends_with('_') {
                    out.push('_');
                }
                out.push(c.to_ascii_lowercase());
            }
            c => out.push(c),
        }
    }
    out
}

fn parse_bool(key: &str, value: &str) -> Result<bool, PolicyConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(PolicyConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a boolean",
        }),
    }
}

/// `[]` style (exactly two characters) or `OPEN CLOSE` separated by a
/// single space.
fn parse_delimiters(key: &str, value: &str) -> Result<Delimiters, PolicyConfigError> {
    if let Some((open, close)) = value.split_once(' ') {
        if !open.is_empty() && !close.is_empty() && !close.contains(' ') {
            return Ok(Delimiters::new(open, close));
        }
    }
    let chars = value.chars().collect::<Vec<_>>();
    if let [open, close] = chars.as_slice() {
        return Ok(Delimiters::new(open.to_string(), close.to_string()));
    }
    Err(PolicyConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: "expected two characters or `OPEN CLOSE`",
    })
}

/// Split `KEY=VALUE`.  The value may itself contain `=`.
pub fn parse_option_pair(option: &str) -> Result<(String, String), PolicyConfigError> {
    match option.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(PolicyConfigError::MalformedOption(option.to_string())),
    }
}

impl AnnotationPolicy {
    /// Apply a single option.  See the crate documentation for the keys.
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<(), PolicyConfigError> {
        let canonical = canonical_key(key);
        let flag = match canonical.as_str() {
            "require_non_empty_text" => Some(AnnotationFilters::REQUIRE_NON_EMPTY_TEXT),
            "require_http_scheme" => Some(AnnotationFilters::REQUIRE_HTTP_SCHEME),
            "skip_when_text_equals_href" => Some(AnnotationFilters::SKIP_WHEN_TEXT_EQUALS_HREF),
            _ => None,
        };
        if let Some(flag) = flag {
            let enabled = parse_bool(key, value)?;
            self.filters.set(flag, enabled);
            return Ok(());
        }
        match canonical.as_str() {
            "delimiters" => self.delimiters = parse_delimiters(key, value)?,
            "delimiter_open" => self.delimiters.open = value.to_string(),
            "delimiter_close" => self.delimiters.close = value.to_string(),
            _ => return Err(PolicyConfigError::UnknownOption(key.to_string())),
        }
        Ok(())
    }

    /// Apply every `(key, value)` pair in order, stopping at the first bad
    /// one.
    pub fn with_options<I, K, V>(mut self, options: I) -> Result<AnnotationPolicy, PolicyConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in options {
            self.set_option(key.as_ref(), value.as_ref())?;
        }
        Ok(self)
    }

    /// The default policy with `options` applied.
    pub fn from_options<I, K, V>(options: I) -> Result<AnnotationPolicy, PolicyConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        AnnotationPolicy::default().with_options(options)
    }

    /// Read a policy from a JSON object such as
    /// `{"require_http_scheme": false, "delimiters": ["<", ">"]}`.
    pub fn from_json(json: &str) -> Result<AnnotationPolicy, PolicyConfigError> {
        let doc: PolicyDocument = serde_json::from_str(json)?;
        let mut policy = AnnotationPolicy::default();
        let flags = [
            (doc.require_non_empty_text, AnnotationFilters::REQUIRE_NON_EMPTY_TEXT),
            (doc.require_http_scheme, AnnotationFilters::REQUIRE_HTTP_SCHEME),
            (
                doc.skip_when_text_equals_href,
                AnnotationFilters::SKIP_WHEN_TEXT_EQUALS_HREF,
            ),
        ];
        for (value, flag) in flags {
            if let Some(enabled) = value {
                policy.filters.set(flag, enabled);
            }
        }
        if let Some((open, close)) = doc.delimiters {
            policy.delimiters = Delimiters::new(open, close);
        }
        if let Some(open) = doc.delimiter_open {
            policy.delimiters.open = open;
        }
        if let Some(close) = doc.delimiter_close {
            policy.delimiters.close = close;
        }
        Ok(policy)
    }
}

/// Parses `key=value[,key=value...]` on top of the default policy.  An
/// empty string yields the default policy.
impl FromStr for AnnotationPolicy {
    type Err = PolicyConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut policy = AnnotationPolicy::default();
        for option in s.split(',').filter(|o| !o.trim().is_empty()) {
            let (key, value) = parse_option_pair(option)?;
            policy.set_option(&key, &value)?;
        }
        Ok(policy)
    }
}
