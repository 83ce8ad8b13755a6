//! History filtering, ordering, and summary statistics.

use lumen_rs_protocol::{GenerationRecord, GenerationStatus};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Ordering applied to query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Most recent timestamp first.
    #[default]
    Newest,
    /// Oldest timestamp first.
    Oldest,
    /// Case-insensitive prompt order.
    Prompt,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "prompt" => Ok(Self::Prompt),
            other => Err(format!(
                "unknown sort order '{other}' (expected newest, oldest, or prompt)"
            )),
        }
    }
}

/// Filter over stored records. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Case-insensitive substring matched against the prompt.
    pub search: Option<String>,
    /// Exact style identifier.
    pub style: Option<String>,
    /// Exact lifecycle status.
    pub status: Option<GenerationStatus>,
    pub sort: SortOrder,
    /// Maximum number of results after sorting; zero means unlimited.
    pub limit: Option<usize>,
}

impl RecordQuery {
    /// Filter, sort, and truncate `records`.
    pub fn apply(&self, records: Vec<GenerationRecord>) -> Vec<GenerationRecord> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<GenerationRecord> = records
            .into_iter()
            .filter(|record| self.matches(record, needle.as_deref()))
            .collect();

        match self.sort {
            SortOrder::Newest => matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortOrder::Oldest => matched.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
            SortOrder::Prompt => {
                matched.sort_by_cached_key(|record| record.prompt.to_lowercase());
            }
        }

        if let Some(limit) = self.limit.filter(|limit| *limit > 0) {
            matched.truncate(limit);
        }
        matched
    }

    fn matches(&self, record: &GenerationRecord, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            if !record.prompt.to_lowercase().contains(needle) {
                return false;
            }
        }
        if let Some(style) = &self.style {
            if record.style.as_deref() != Some(style.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        true
    }
}

/// Counts over the stored history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStats {
    pub total: usize,
    pub generating: usize,
    pub completed: usize,
    pub failed: usize,
    /// Records per style identifier; unstyled records are not counted here.
    pub by_style: BTreeMap<String, usize>,
}

impl RecordStats {
    /// Tally statistics for a set of records.
    pub fn collect(records: &[GenerationRecord]) -> Self {
        let mut stats = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.status {
                GenerationStatus::Generating => stats.generating += 1,
                GenerationStatus::Completed => stats.completed += 1,
                GenerationStatus::Error => stats.failed += 1,
            }
            if let Some(style) = &record.style {
                *stats.by_style.entry(style.clone()).or_default() += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordQuery, RecordStats, SortOrder};
    use lumen_rs_protocol::{GenerationRecord, GenerationStatus};
    use pretty_assertions::assert_eq;

    fn record(id: &str, prompt: &str, style: Option<&str>, timestamp: i64) -> GenerationRecord {
        GenerationRecord::generating(prompt, style.map(str::to_string), timestamp)
            .completed(id, format!("https://img.test/{id}.png"))
    }

    fn ids(records: &[GenerationRecord]) -> Vec<&str> {
        records.iter().map(|record| record.id.as_str()).collect()
    }

    #[test]
    fn search_is_case_insensitive() {
        let records = vec![
            record("a", "A Red Fox", None, 1),
            record("b", "blue whale", None, 2),
        ];
        let query = RecordQuery {
            search: Some("red fox".to_string()),
            ..RecordQuery::default()
        };
        assert_eq!(ids(&query.apply(records)), vec!["a"]);
    }

    #[test]
    fn filters_by_style_and_status() {
        let failed = GenerationRecord::generating("c", Some("vintage".to_string()), 3)
            .failed("c", "boom");
        let records = vec![
            record("a", "a", Some("vintage"), 1),
            record("b", "b", Some("abstract"), 2),
            failed,
        ];
        let query = RecordQuery {
            style: Some("vintage".to_string()),
            status: Some(GenerationStatus::Completed),
            ..RecordQuery::default()
        };
        assert_eq!(ids(&query.apply(records)), vec!["a"]);
    }

    #[test]
    fn sorts_and_limits() {
        let records = vec![
            record("b", "banana", None, 2),
            record("c", "Cherry", None, 3),
            record("a", "apple", None, 1),
        ];
        let newest = RecordQuery::default().apply(records.clone());
        assert_eq!(ids(&newest), vec!["c", "b", "a"]);

        let oldest = RecordQuery {
            sort: SortOrder::Oldest,
            limit: Some(2),
            ..RecordQuery::default()
        }
        .apply(records.clone());
        assert_eq!(ids(&oldest), vec!["a", "b"]);

        let by_prompt = RecordQuery {
            sort: SortOrder::Prompt,
            ..RecordQuery::default()
        }
        .apply(records);
        assert_eq!(ids(&by_prompt), vec!["a", "b", "c"]);
    }

    #[test]
    fn parses_sort_order() {
        assert_eq!("Oldest".parse::<SortOrder>(), Ok(SortOrder::Oldest));
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn stats_count_status_and_style() {
        let records = vec![
            record("a", "a", Some("vintage"), 1),
            record("b", "b", Some("vintage"), 2),
            GenerationRecord::generating("c", None, 3).failed("c", "boom"),
        ];
        let stats = RecordStats::collect(&records);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.generating, 0);
        assert_eq!(stats.by_style.get("vintage"), Some(&2));
    }
}
