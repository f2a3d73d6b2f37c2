use crate::core::error::ReportError;
use crate::core::io;
use crate::core::model::StatSummary;
use aho_corasick::AhoCorasick;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

const EXPECTED_LAYOUTS: &str = "key:value lines or a CSV/TSV with category columns";

/// Substrings that mark a key or column header as a summary category.
pub const CATEGORY_VOCABULARY: [&str; 9] = [
    "complete",
    "duplicated",
    "fragmented",
    "missing",
    "single-copy",
    "single_copy",
    "total",
    "n",
    "busco_like_complete",
];

/// The labels counted by the token fallback, also the preferred display
/// order of a summary.
pub const CANONICAL_LABELS: [&str; 5] =
    ["complete", "single-copy", "duplicated", "fragmented", "missing"];

type Matcher = fn(&[&str]) -> Option<StatSummary>;

const MATCHERS: [(&str, Matcher); 3] = [
    ("key-value", match_key_value_lines),
    ("table", match_delimited_table),
    ("token-count", match_token_counts),
];

pub fn parse_omark_summary(path: &Path) -> Result<StatSummary, ReportError> {
    let text = io::read_text(path)?;
    parse_omark_text(&text)
}

pub fn parse_omark_text(text: &str) -> Result<StatSummary, ReportError> {
    let lines = io::content_lines(text);
    for (name, matcher) in MATCHERS {
        if let Some(summary) = matcher(&lines) {
            debug!(layout = name, keys = summary.len(), "OMArk summary matched");
            return Ok(summary);
        }
    }
    Err(ReportError::unparseable("OMArk stats", EXPECTED_LAYOUTS))
}

fn vocabulary() -> &'static AhoCorasick {
    static AC: OnceLock<AhoCorasick> = OnceLock::new();
    AC.get_or_init(|| AhoCorasick::new(CATEGORY_VOCABULARY).expect("vocabulary automaton"))
}

/// True when a lower-cased key contains any vocabulary substring.
pub fn is_category_key(key: &str) -> bool {
    vocabulary().is_match(key)
}

/// Trims, strips trailing `%` signs and parses; anything else is NaN.
pub fn to_number(raw: &str) -> f64 {
    raw.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .unwrap_or(f64::NAN)
}

/// Keys before the order of `CANONICAL_LABELS` first, then the rest in
/// discovery order.
pub fn display_order(summary: &StatSummary) -> Vec<&str> {
    let mut keys: Vec<&str> = CANONICAL_LABELS
        .into_iter()
        .filter(|k| summary.contains_key(k))
        .collect();
    keys.extend(summary.keys().filter(|k| !CANONICAL_LABELS.contains(k)));
    keys
}

/// `key: value` or `key<TAB>value`, split at the first separator.
pub fn match_key_value_lines(lines: &[&str]) -> Option<StatSummary> {
    let mut summary = StatSummary::new();
    for line in lines {
        let pair = line.split_once(':').or_else(|| line.split_once('\t'));
        let Some((key, value)) = pair else {
            continue;
        };
        let key = key.trim().to_lowercase();
        if is_category_key(&key) {
            summary.insert(key, to_number(value));
        }
    }
    (!summary.is_empty()).then_some(summary)
}

/// Header-keyed CSV or TSV. Each matching column keeps the value of the
/// last data row. Extra trailing fields are ignored; a row too short to
/// reach a matching column rejects the table.
pub fn match_delimited_table(lines: &[&str]) -> Option<StatSummary> {
    if lines.is_empty() {
        return None;
    }
    let delimiter = if lines.iter().take(5).any(|l| l.contains(',')) {
        b','
    } else {
        b'\t'
    };
    let data = lines.join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(|s| s.to_lowercase()).collect(),
        Err(e) => {
            debug!(error = %e, "table header unreadable");
            return None;
        }
    };
    let hits: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| is_category_key(h))
        .map(|(i, _)| i)
        .collect();
    if hits.is_empty() {
        return None;
    }

    let mut summary = StatSummary::new();
    let mut rows = 0usize;
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "table layout rejected");
                return None;
            }
        };
        rows += 1;
        for &i in &hits {
            let Some(value) = record.get(i) else {
                debug!(row = rows, column = i, "table row too short");
                return None;
            };
            summary.insert(headers[i].clone(), to_number(value));
        }
    }
    if rows > 1 {
        warn!(
            rows,
            "summary table has several data rows; only the last row is reported"
        );
    }
    (!summary.is_empty()).then_some(summary)
}

/// Counts literal occurrences of the canonical labels across the whole
/// lower-cased text.
pub fn match_token_counts(lines: &[&str]) -> Option<StatSummary> {
    let text = lines.join(" ").to_lowercase();
    let summary: StatSummary = CANONICAL_LABELS
        .into_iter()
        .map(|label| (label, text.matches(label).count() as f64))
        .collect();
    let seen = summary.iter().any(|(_, v)| v > 0.0);
    seen.then_some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_lines() {
        let got = parse_omark_text("complete: 80\nmissing: 5\n").unwrap();
        let pairs: Vec<_> = got.iter().collect();
        assert_eq!(pairs, vec![("complete", 80.0), ("missing", 5.0)]);
    }

    #[test]
    fn key_value_tab_and_percent() {
        let got = match_key_value_lines(&["Single-copy\t71.5%", "Duplicated\tabc"]).unwrap();
        assert_eq!(got.get("single-copy"), Some(71.5));
        assert!(got.get("duplicated").unwrap().is_nan());
    }

    #[test]
    fn key_value_ignores_unknown_keys() {
        assert!(match_key_value_lines(&["species: yeast", "lineage: fungi"]).is_some());
        assert!(match_key_value_lines(&["date: today", "lab: x"]).is_none());
    }

    #[test]
    fn colon_takes_priority_over_tab() {
        let got = match_key_value_lines(&["complete\tmore: 12"]).unwrap();
        assert_eq!(got.get("complete\tmore"), Some(12.0));
    }

    #[test]
    fn csv_table_last_row_wins() {
        let lines = ["Species,Complete,Missing", "a,10,2", "b,20,3"];
        let got = match_delimited_table(&lines).unwrap();
        let pairs: Vec<_> = got.iter().collect();
        assert_eq!(pairs, vec![("complete", 20.0), ("missing", 3.0)]);
    }

    #[test]
    fn table_reached_when_no_key_value_lines() {
        let text = "Sample,Complete,Fragmented\nyeast,95.1,1.2\n";
        let got = parse_omark_text(text).unwrap();
        assert_eq!(got.get("complete"), Some(95.1));
        assert_eq!(got.get("fragmented"), Some(1.2));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let got = parse_omark_text("Sample,Complete,Missing\nyeast,95.1,2.0,extra\n").unwrap();
        let pairs: Vec<_> = got.iter().collect();
        assert_eq!(pairs, vec![("complete", 95.1), ("missing", 2.0)]);
    }

    #[test]
    fn short_row_rejects_table() {
        let lines = ["sample,complete,missing", "yeast,95.1"];
        assert!(match_delimited_table(&lines).is_none());
    }

    #[test]
    fn table_without_rows_is_rejected() {
        assert!(match_delimited_table(&["complete,missing"]).is_none());
    }

    #[test]
    fn token_counting_fallback() {
        let text = "Complete complete, MISSING\nsomething duplicated\n";
        let got = parse_omark_text(text).unwrap();
        let pairs: Vec<_> = got.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("complete", 2.0),
                ("single-copy", 0.0),
                ("duplicated", 1.0),
                ("fragmented", 0.0),
                ("missing", 1.0)
            ]
        );
    }

    #[test]
    fn unrecognised_layout_fails() {
        let err = parse_omark_text("hello world\nfoo bar\n").unwrap_err();
        match err {
            ReportError::UnparseableSummary { what, expected } => {
                assert_eq!(what, "OMArk stats");
                assert!(expected.contains("key:value"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn display_order_prefers_canonical_labels() {
        let s: StatSummary = [
            ("total", 100.0),
            ("missing", 1.0),
            ("complete", 90.0),
            ("inconsistent", 3.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            display_order(&s),
            vec!["complete", "missing", "total", "inconsistent"]
        );
    }

    #[test]
    fn to_number_handles_percent_and_garbage() {
        assert_eq!(to_number(" 12.5% "), 12.5);
        assert_eq!(to_number("7"), 7.0);
        assert_eq!(to_number("5%%"), 5.0);
        assert!(to_number("n/a").is_nan());
    }

    #[test]
    fn parse_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("omark.sum");
        std::fs::write(&path, "complete: 80\nmissing: 5\n").unwrap();
        assert_eq!(
            parse_omark_summary(&path).unwrap(),
            parse_omark_summary(&path).unwrap()
        );
    }
}
