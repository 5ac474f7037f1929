use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

use crate::domain::{EnrichedFinding, Finding};

// http/https scheme followed by anything that is not whitespace, a comma,
// or a double quote; commas terminate matches so list punctuation is not
// swallowed into the URL.
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"https?://[^\s,"]+"#).unwrap());

/// Derives the enriched record from a normalized finding. Pure and total:
/// no I/O, no failure conditions.
pub fn enrich(finding: &Finding, raw: &Value) -> EnrichedFinding {
    let urls = extract_urls(&finding.description);
    let score = score(&finding.severity, urls.len());
    EnrichedFinding {
        id: finding.id.clone(),
        title: finding.title.clone(),
        severity: finding.severity.clone(),
        description: finding.description.clone(),
        urls,
        score,
        raw: raw.clone(),
    }
}

/// All URLs in `text`, non-overlapping, left-to-right, duplicates kept.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// severity * (1 + n_urls). Integer arithmetic when severity is integral,
/// float otherwise; no rounding or clamping.
fn score(severity: &Number, n_urls: usize) -> Number {
    let multiplier = 1 + n_urls as i64;
    if let Some(s) = severity.as_i64() {
        Number::from(s * multiplier)
    } else if let Some(s) = severity.as_u64() {
        Number::from(s * multiplier as u64)
    } else {
        let s = severity.as_f64().unwrap_or(0.0);
        Number::from_f64(s * multiplier as f64).unwrap_or_else(|| Number::from(0))
    }
}
