use crate::core::error::ReportError;
use crate::core::io;
use crate::core::model::BuscoSummary;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

const EXPECTED_LAYOUTS: &str = "a 'short_summary*.txt' style line like \
    'C:..%[S:..%,D:..%],F:..%,M:..%,n:..' or a verbose key:value summary";

type Matcher = fn(&[&str]) -> Option<BuscoSummary>;

/// Layout matchers in priority order; the first hit wins.
const MATCHERS: [(&str, Matcher); 2] = [
    ("compact", match_compact_line),
    ("verbose", match_verbose_lines),
];

pub fn parse_busco_summary(path: &Path) -> Result<BuscoSummary, ReportError> {
    let text = io::read_text(path)?;
    parse_busco_text(&text)
}

pub fn parse_busco_text(text: &str) -> Result<BuscoSummary, ReportError> {
    let lines = io::content_lines(text);
    for (name, matcher) in MATCHERS {
        if let Some(summary) = matcher(&lines) {
            debug!(layout = name, "BUSCO summary matched");
            return Ok(summary);
        }
    }
    Err(ReportError::unparseable("BUSCO stats", EXPECTED_LAYOUTS))
}

fn compact_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"C:(?P<C>[\d.]+)%\s*\[\s*S:(?P<S>[\d.]+)%\s*,\s*D:(?P<D>[\d.]+)%\s*\]\s*,\s*F:(?P<F>[\d.]+)%\s*,\s*M:(?P<M>[\d.]+)%\s*,\s*n:(?P<n>\d+)",
        )
        .expect("compact BUSCO regex")
    })
}

fn percent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([\d.]+)\s*%").expect("percent regex"))
}

fn count_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(n|Number of BUSCOs|Total BUSCO groups)\D+(\d+)").expect("count regex")
    })
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"))
}

/// `C:95.3%[S:93.1%,D:2.2%],F:2.6%,M:2.1%,n:255` on any single line.
pub fn match_compact_line(lines: &[&str]) -> Option<BuscoSummary> {
    lines.iter().find_map(|line| {
        let caps = compact_re().captures(line)?;
        let pct = |name: &str| caps[name].parse::<f64>().ok();
        let n: u64 = caps["n"].parse().ok()?;
        Some(BuscoSummary {
            complete: pct("C")?,
            single_copy: pct("S")?,
            duplicated: pct("D")?,
            fragmented: pct("F")?,
            missing: pct("M")?,
            total_count: n as f64,
        })
    })
}

#[derive(Default)]
struct VerboseFields {
    complete: Option<f64>,
    single_copy: Option<f64>,
    duplicated: Option<f64>,
    fragmented: Option<f64>,
    missing: Option<f64>,
    total_count: Option<f64>,
}

impl VerboseFields {
    fn any(&self) -> bool {
        [
            self.complete,
            self.single_copy,
            self.duplicated,
            self.fragmented,
            self.missing,
            self.total_count,
        ]
        .iter()
        .any(Option::is_some)
    }
}

/// One category per line, e.g. `Complete BUSCOs (C): 95.3%`. Categories
/// that never appear default to zero.
pub fn match_verbose_lines(lines: &[&str]) -> Option<BuscoSummary> {
    let mut found = VerboseFields::default();
    for line in lines {
        let line = whitespace_re().replace_all(line, " ");
        let pct = percent_re()
            .captures(&line)
            .and_then(|c| c[1].parse::<f64>().ok());

        let slot = if line.contains("Complete and single-copy") || line.contains("(S)") {
            Some(&mut found.single_copy)
        } else if line.contains("Duplicated") || line.contains("(D)") {
            Some(&mut found.duplicated)
        } else if line.to_lowercase().starts_with("c:")
            || line.contains("Complete BUSCOs")
            || line.contains("(C)")
        {
            Some(&mut found.complete)
        } else if line.contains("Fragmented") || line.contains("(F)") {
            Some(&mut found.fragmented)
        } else if line.contains("Missing") || line.contains("(M)") {
            Some(&mut found.missing)
        } else {
            None
        };
        if let (Some(slot), Some(v)) = (slot, pct) {
            *slot = Some(v);
        }

        if let Some(n) = count_re()
            .captures(&line)
            .and_then(|c| c[2].parse::<u64>().ok())
        {
            found.total_count = Some(n as f64);
        }
    }

    if !found.any() {
        return None;
    }
    Some(BuscoSummary {
        complete: found.complete.unwrap_or(0.0),
        single_copy: found.single_copy.unwrap_or(0.0),
        duplicated: found.duplicated.unwrap_or(0.0),
        fragmented: found.fragmented.unwrap_or(0.0),
        missing: found.missing.unwrap_or(0.0),
        total_count: found.total_count.unwrap_or(0.0),
    })
}
