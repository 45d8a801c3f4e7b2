//! Multi-source comparison of extracted product records
//!
//! Source 0 is the reference set. `common` and `unique_per_source[0]` partition the
//! reference records by membership in the other sources; comparison sources are
//! diffed against the reference only, unless the symmetric policy is selected.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::product::ProductRecord;

pub const MIN_SOURCES: usize = 2;

/// How uniqueness is decided for comparison sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonPolicy {
    /// Source i > 0 is unique where its id is absent from source 0
    #[default]
    ReferenceAnchored,
    /// Source i is unique where its id is absent from every other source
    Symmetric,
}

impl std::str::FromStr for ComparisonPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "reference_anchored" | "reference" => Ok(Self::ReferenceAnchored),
            "symmetric" => Ok(Self::Symmetric),
            other => Err(format!(
                "unknown comparison policy '{other}' (expected reference-anchored or symmetric)"
            )),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("at least {MIN_SOURCES} record sequences are required, got {count}")]
pub struct CompareInputError {
    pub count: usize,
}

/// Comparator output, consumed read-only by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// One entry per input source, same order and length as the input
    pub unique_per_source: Vec<Vec<ProductRecord>>,
    /// Reference records whose id appears in every other source
    pub common: Vec<ProductRecord>,
}

impl ComparisonResult {
    pub fn source_count(&self) -> usize {
        self.unique_per_source.len()
    }

    /// Length of the common group followed by each unique group
    pub fn counts(&self) -> (usize, Vec<usize>) {
        (
            self.common.len(),
            self.unique_per_source.iter().map(Vec::len).collect(),
        )
    }
}

/// Compare with the default reference-anchored policy
pub fn compare(sources: &[Vec<ProductRecord>]) -> Result<ComparisonResult, CompareInputError> {
    compare_with_policy(sources, ComparisonPolicy::ReferenceAnchored)
}

pub fn compare_with_policy(
    sources: &[Vec<ProductRecord>],
    policy: ComparisonPolicy,
) -> Result<ComparisonResult, CompareInputError> {
    if sources.len() < MIN_SOURCES {
        return Err(CompareInputError {
            count: sources.len(),
        });
    }

    let id_sets: Vec<HashSet<&str>> = sources
        .iter()
        .map(|records| records.iter().map(|r| r.id.as_str()).collect())
        .collect();

    let reference = &sources[0];
    let others = &id_sets[1..];

    let common = first_occurrences(reference, |id| others.iter().all(|set| set.contains(id)));
    let unique_reference =
        first_occurrences(reference, |id| others.iter().all(|set| !set.contains(id)));

    let mut unique_per_source = Vec::with_capacity(sources.len());
    unique_per_source.push(unique_reference);

    for (i, records) in sources.iter().enumerate().skip(1) {
        let unique = match policy {
            ComparisonPolicy::ReferenceAnchored => {
                first_occurrences(records, |id| !id_sets[0].contains(id))
            }
            ComparisonPolicy::Symmetric => first_occurrences(records, |id| {
                id_sets
                    .iter()
                    .enumerate()
                    .all(|(j, set)| j == i || !set.contains(id))
            }),
        };
        unique_per_source.push(unique);
    }

    Ok(ComparisonResult {
        unique_per_source,
        common,
    })
}

/// Records passing `keep`, in input order, first occurrence per id only
fn first_occurrences<F>(records: &[ProductRecord], keep: F) -> Vec<ProductRecord>
where
    F: Fn(&str) -> bool,
{
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.id.as_str()))
        .filter(|r| keep(r.id.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(index: usize, ids: &[&str]) -> Vec<ProductRecord> {
        ids.iter()
            .map(|id| ProductRecord::new(index, *id).with_name(format!("name-{id}")))
            .collect()
    }

    fn ids(records: &[ProductRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_two_source_diff() {
        let result = compare(&[source(0, &["A", "B", "C"]), source(1, &["B", "C", "D"])]).unwrap();

        assert_eq!(ids(&result.common), vec!["B", "C"]);
        assert_eq!(ids(&result.unique_per_source[0]), vec!["A"]);
        assert_eq!(ids(&result.unique_per_source[1]), vec!["D"]);
    }

    #[test]
    fn test_common_requires_every_other_source() {
        let result = compare(&[source(0, &["A", "B"]), source(1, &["A"]), source(2, &["B"])]).unwrap();

        assert!(result.common.is_empty());
        // A and B each appear in some other source, so neither is unique to source 0
        assert!(result.unique_per_source[0].is_empty());
        assert!(result.unique_per_source[1].is_empty());
        assert!(result.unique_per_source[2].is_empty());
    }

    #[test]
    fn test_comparison_sources_checked_against_reference_only() {
        // X is shared by sources 1 and 2 but absent from the reference
        let result = compare(&[
            source(0, &["A"]),
            source(1, &["A", "X"]),
            source(2, &["A", "X", "Y"]),
        ])
        .unwrap();

        assert_eq!(ids(&result.common), vec!["A"]);
        assert!(result.unique_per_source[0].is_empty());
        assert_eq!(ids(&result.unique_per_source[1]), vec!["X"]);
        assert_eq!(ids(&result.unique_per_source[2]), vec!["X", "Y"]);
    }

    #[test]
    fn test_symmetric_policy() {
        let result = compare_with_policy(
            &[
                source(0, &["A"]),
                source(1, &["A", "X"]),
                source(2, &["A", "X", "Y"]),
            ],
            ComparisonPolicy::Symmetric,
        )
        .unwrap();

        assert_eq!(ids(&result.common), vec!["A"]);
        assert!(result.unique_per_source[1].is_empty());
        assert_eq!(ids(&result.unique_per_source[2]), vec!["Y"]);
    }

    #[test]
    fn test_duplicate_ids_first_occurrence_wins() {
        let reference = vec![
            ProductRecord::new(0, "A").with_name("x"),
            ProductRecord::new(0, "A").with_name("y"),
        ];
        let result = compare(&[reference.clone(), Vec::new()]).unwrap();
        assert_eq!(result.unique_per_source[0].len(), 1);
        assert_eq!(result.unique_per_source[0][0].name, "x");

        let result = compare(&[reference, source(1, &["A"])]).unwrap();
        assert_eq!(result.common.len(), 1);
        assert_eq!(result.common[0].name, "x");
    }

    #[test]
    fn test_duplicates_in_comparison_source() {
        let result = compare(&[source(0, &["A"]), source(1, &["D", "D", "A"])]).unwrap();
        assert_eq!(ids(&result.unique_per_source[1]), vec!["D"]);
    }

    #[test]
    fn test_empty_reference_source() {
        let result = compare(&[Vec::new(), source(1, &["A"])]).unwrap();
        assert!(result.common.is_empty());
        assert!(result.unique_per_source[0].is_empty());
        assert_eq!(ids(&result.unique_per_source[1]), vec!["A"]);
    }

    #[test]
    fn test_empty_comparison_source() {
        let result = compare(&[source(0, &["A", "B"]), Vec::new()]).unwrap();
        assert!(result.common.is_empty());
        assert_eq!(ids(&result.unique_per_source[0]), vec!["A", "B"]);
        assert!(result.unique_per_source[1].is_empty());
    }

    #[test]
    fn test_rejects_single_source() {
        assert_eq!(compare(&[source(0, &["A"])]), Err(CompareInputError { count: 1 }));
        assert_eq!(compare(&[]), Err(CompareInputError { count: 0 }));
    }

    #[test]
    fn test_result_shape_and_idempotence() {
        let sources = vec![
            source(0, &["A", "B", "C"]),
            source(1, &["C", "Q"]),
            source(2, &["C", "B"]),
            source(3, &[]),
        ];
        let first = compare(&sources).unwrap();
        let second = compare(&sources).unwrap();

        assert_eq!(first.source_count(), 4);
        assert_eq!(first, second);
    }

    #[test]
    fn test_common_and_unique_reference_are_disjoint() {
        let result = compare(&[
            source(0, &["A", "B", "C"]),
            source(1, &["A", "C"]),
            source(2, &["A", "Z"]),
        ])
        .unwrap();

        assert_eq!(ids(&result.common), vec!["A"]);
        assert_eq!(ids(&result.unique_per_source[0]), vec!["B"]);
        for record in &result.common {
            assert!(!result.unique_per_source[0].iter().any(|r| r.id == record.id));
        }
    }

    #[test]
    fn test_counts() {
        let result = compare(&[source(0, &["A", "B"]), source(1, &["B", "C", "D"])]).unwrap();
        assert_eq!(result.counts(), (1, vec![1, 2]));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "reference-anchored".parse::<ComparisonPolicy>().unwrap(),
            ComparisonPolicy::ReferenceAnchored
        );
        assert_eq!("Symmetric".parse::<ComparisonPolicy>().unwrap(), ComparisonPolicy::Symmetric);
        assert!("pairwise".parse::<ComparisonPolicy>().is_err());
    }
}
