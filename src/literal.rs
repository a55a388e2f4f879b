//! Literal value formatting applied before interning.
//!
//! Formatters are pure string→string functions chained in caller-specified
//! order over quoted object tokens. The store treats the output as opaque;
//! every built-in preserves the leading quote so literal classification
//! survives formatting.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// A pure literal rewriting step.
pub trait LiteralFormatter: Send + Sync {
    fn format(&self, raw: &str) -> String;
}

/// Apply a formatter chain in order.
pub fn apply_chain(formatters: &[Box<dyn LiteralFormatter>], raw: &str) -> String {
    let mut value = raw.to_string();
    for f in formatters {
        value = f.format(&value);
    }
    value
}

/// The usual chain: datatype stripping, then Unicode normalization, then
/// date truncation.
pub fn standard_chain() -> Vec<Box<dyn LiteralFormatter>> {
    vec![
        Box::new(StripDatatype),
        Box::new(NormalizeUnicode),
        Box::new(TruncateDate),
    ]
}

/// Drops an RDF datatype or language tag after the closing quote:
/// `"12"^^xsd:integer` → `"12"`, `"Berlin"@de` → `"Berlin"`.
pub struct StripDatatype;

impl LiteralFormatter for StripDatatype {
    fn format(&self, raw: &str) -> String {
        if raw.len() < 2 || !raw.starts_with('"') {
            return raw.to_string();
        }
        match raw[1..].find('"') {
            Some(pos) => raw[..pos + 2].to_string(),
            None => raw.to_string(),
        }
    }
}

/// NFC-normalizes the literal so visually identical values intern to one id.
pub struct NormalizeUnicode;

impl LiteralFormatter for NormalizeUnicode {
    fn format(&self, raw: &str) -> String {
        raw.nfc().collect()
    }
}

/// Truncates an ISO date literal to its year: `"1935-01-08"` → `"1935"`.
pub struct TruncateDate;

static ISO_DATE: OnceLock<Regex> = OnceLock::new();

impl LiteralFormatter for TruncateDate {
    fn format(&self, raw: &str) -> String {
        let re = ISO_DATE.get_or_init(|| {
            Regex::new(r#"^"(-?\d{1,4})-\d{2}-\d{2}"$"#).expect("date pattern is valid")
        });
        match re.captures(raw) {
            Some(caps) => format!("\"{}\"", &caps[1]),
            None => raw.to_string(),
        }
    }
}
