/// Occurrences per category label, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryCount {
    entries: Vec<(String, u64)>,
}

impl CategoryCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, label: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == label) {
            Some((_, v)) => *v += 1,
            None => self.entries.push((label.to_string(), 1)),
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(k, _)| k == label)
            .map(|(_, v)| *v)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Metric name to value. Re-inserting a key overwrites its value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatSummary {
    entries: Vec<(String, f64)>,
}

impl StatSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Percent when every non-NaN value lies in [0, 100] and there is at
    /// least one such value; otherwise Count.
    pub fn value_scale(&self) -> ValueScale {
        let mut seen = false;
        for (_, v) in self.iter() {
            if v.is_nan() {
                continue;
            }
            if !(0.0..=100.0).contains(&v) {
                return ValueScale::Count;
            }
            seen = true;
        }
        if seen {
            ValueScale::Percent
        } else {
            ValueScale::Count
        }
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for StatSummary {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut summary = StatSummary::new();
        for (k, v) in iter {
            summary.insert(k, v);
        }
        summary
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueScale {
    Percent,
    Count,
}

impl ValueScale {
    pub fn axis_label(self) -> &'static str {
        match self {
            ValueScale::Percent => "Percent (%)",
            ValueScale::Count => "Count",
        }
    }
}

pub const BUSCO_COMPLETE: &str = "Complete";
pub const BUSCO_SINGLE: &str = "Single-copy";
pub const BUSCO_DUPLICATED: &str = "Duplicated";
pub const BUSCO_FRAGMENTED: &str = "Fragmented";
pub const BUSCO_MISSING: &str = "Missing";
pub const BUSCO_TOTAL: &str = "Total BUSCO groups (n)";

/// The five percentage categories, in display order.
pub const BUSCO_CATEGORIES: [&str; 5] = [
    BUSCO_COMPLETE,
    BUSCO_SINGLE,
    BUSCO_DUPLICATED,
    BUSCO_FRAGMENTED,
    BUSCO_MISSING,
];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuscoSummary {
    pub complete: f64,
    pub single_copy: f64,
    pub duplicated: f64,
    pub fragmented: f64,
    pub missing: f64,
    pub total_count: f64,
}

impl BuscoSummary {
    pub fn percentages(&self) -> [(&'static str, f64); 5] {
        [
            (BUSCO_COMPLETE, self.complete),
            (BUSCO_SINGLE, self.single_copy),
            (BUSCO_DUPLICATED, self.duplicated),
            (BUSCO_FRAGMENTED, self.fragmented),
            (BUSCO_MISSING, self.missing),
        ]
    }

    pub fn to_stat_summary(&self) -> StatSummary {
        let mut summary: StatSummary = self.percentages().into_iter().collect();
        summary.insert(BUSCO_TOTAL, self.total_count);
        summary
    }
}

/// One row of a BUSCO results table.
#[derive(Clone, Debug, PartialEq)]
pub struct BuscoTableRow {
    pub organism: String,
    pub version: String,
    pub group: String,
    pub dataset_name: String,
    pub single_copy: f64,
    pub multi_copy: f64,
    pub fragmented: f64,
    pub missing: f64,
    pub one_line_summary: String,
}

impl BuscoTableRow {
    pub fn segments(&self) -> [f64; 4] {
        [self.single_copy, self.multi_copy, self.fragmented, self.missing]
    }
}
