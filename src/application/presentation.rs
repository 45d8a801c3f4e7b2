//! View model for a finished comparison
//!
//! Read-only over `ComparisonReport`: the common group first, then one group per
//! source in input order, each with its record count in the title.

use serde::Serialize;

use super::comparison_service::ComparisonReport;
use super::page_title::{describe_source, SourceTitle};
use crate::domain::ProductRecord;

pub const NO_COMMON_ITEMS: &str = "No common items.";
pub const ALL_IN_REFERENCE: &str = "All products present in first URL.";
pub const NONE_UNIQUE_TO_REFERENCE: &str = "No products unique to this URL.";

/// One product card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub name: String,
    pub id: String,
    pub url: String,
    pub image_url: String,
}

impl From<&ProductRecord> for CardView {
    fn from(record: &ProductRecord) -> Self {
        Self {
            name: record.name.clone(),
            id: record.id.clone(),
            url: record.url.clone(),
            image_url: record.image_url.clone(),
        }
    }
}

/// A titled group of cards; `empty_message` is shown when `cards` is empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceTitle>,
    pub count: usize,
    pub cards: Vec<CardView>,
    pub empty_message: &'static str,
}

impl GroupView {
    fn new(
        title: String,
        source: Option<SourceTitle>,
        records: &[ProductRecord],
        empty_message: &'static str,
    ) -> Self {
        Self {
            title,
            source,
            count: records.len(),
            cards: records.iter().map(CardView::from).collect(),
            empty_message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub common: GroupView,
    pub per_source: Vec<GroupView>,
}

impl ComparisonView {
    pub fn build(report: &ComparisonReport) -> Self {
        let result = &report.result;

        let common = GroupView::new(
            format!("Common Items ({})", result.common.len()),
            None,
            &result.common,
            NO_COMMON_ITEMS,
        );

        let per_source = report
            .sources
            .iter()
            .zip(&result.unique_per_source)
            .map(|(source, unique)| {
                let title = describe_source(&source.url);
                let empty_message = if source.is_reference() {
                    NONE_UNIQUE_TO_REFERENCE
                } else {
                    ALL_IN_REFERENCE
                };
                GroupView::new(
                    format!("{} ({} unique)", title, unique.len()),
                    Some(title),
                    unique,
                    empty_message,
                )
            })
            .collect();

        Self { common, per_source }
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupView> {
        std::iter::once(&self.common).chain(&self.per_source)
    }
}

/// Plain-text listing of a view for terminal output
pub fn render_text(view: &ComparisonView) -> String {
    let mut out = String::new();

    for group in view.groups() {
        push_line(&mut out, 0, &group.title);
        if group.cards.is_empty() {
            push_line(&mut out, 2, group.empty_message);
        }
        for card in &group.cards {
            let name = if card.name.is_empty() { "(unnamed)" } else { card.name.as_str() };
            push_line(&mut out, 2, &format!("- {} [{}]", name, card.id));
            if !card.url.is_empty() {
                push_line(&mut out, 4, &card.url);
            }
            if !card.image_url.is_empty() {
                push_line(&mut out, 4, &format!("image: {}", card.image_url));
            }
        }
        out.push('\n');
    }

    out
}

fn push_line(out: &mut String, indent: usize, line: &str) {
    out.extend(std::iter::repeat_n(' ', indent));
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{compare, Source};
    use chrono::Utc;
    use uuid::Uuid;

    fn record(source_index: usize, id: &str, name: &str) -> ProductRecord {
        ProductRecord::new(source_index, id)
            .with_name(name)
            .with_url(format!("https://shop.example.com/p/{id}"))
    }

    fn report(sources: Vec<Vec<ProductRecord>>, urls: &[&str]) -> ComparisonReport {
        ComparisonReport {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            sources: urls
                .iter()
                .enumerate()
                .map(|(i, url)| Source::new(i, *url))
                .collect(),
            skipped_per_source: vec![0; sources.len()],
            result: compare(&sources).unwrap(),
            elapsed_ms: 0,
        }
    }

    #[test]
    fn test_build_titles_and_counts() {
        let report = report(
            vec![
                vec![record(0, "A", "Alpha"), record(0, "B", "Beta"), record(0, "C", "Gamma")],
                vec![record(1, "B", "Beta"), record(1, "C", "Gamma"), record(1, "D", "Delta")],
            ],
            &[
                "https://shop.example.com/search?Ntt=align%20pant",
                "https://shop.example.com/c/women-pants/_/N-1",
            ],
        );

        let view = ComparisonView::build(&report);

        assert_eq!(view.common.title, "Common Items (2)");
        let common_ids: Vec<_> = view.common.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(common_ids, vec!["B", "C"]);

        assert_eq!(view.per_source.len(), 2);
        assert_eq!(view.per_source[0].title, "Search: align pant (1 unique)");
        assert_eq!(view.per_source[1].title, "Browse: women-pants (1 unique)");
        assert_eq!(view.per_source[1].cards[0].name, "Delta");
    }

    #[test]
    fn test_empty_group_messages() {
        let report = report(
            vec![vec![record(0, "A", "Alpha")], vec![record(1, "A", "Alpha")]],
            &["https://shop.example.com/c/a", "https://shop.example.com/c/b"],
        );

        let view = ComparisonView::build(&report);
        let text = render_text(&view);

        assert_eq!(view.per_source[0].empty_message, NONE_UNIQUE_TO_REFERENCE);
        assert_eq!(view.per_source[1].empty_message, ALL_IN_REFERENCE);
        assert!(text.contains("Common Items (1)\n  - Alpha [A]"));
        assert!(text.contains("Browse: b (0 unique)\n  All products present in first URL."));
    }

    #[test]
    fn test_no_common_items() {
        let report = report(
            vec![vec![record(0, "A", "")], vec![record(1, "B", "Beta")]],
            &["https://shop.example.com/c/a", "https://shop.example.com/c/b"],
        );

        let text = render_text(&ComparisonView::build(&report));

        assert!(text.starts_with("Common Items (0)\n  No common items.\n"));
        assert!(text.contains("  - (unnamed) [A]\n    https://shop.example.com/p/A"));
    }

    #[test]
    fn test_view_serializes() {
        let report = report(
            vec![vec![record(0, "A", "Alpha")], vec![]],
            &["https://shop.example.com/c/a", "https://shop.example.com/c/b"],
        );

        let json = serde_json::to_value(ComparisonView::build(&report)).unwrap();

        assert_eq!(json["common"]["count"], 0);
        assert_eq!(json["perSource"][0]["cards"][0]["imageUrl"], "");
        assert_eq!(json["perSource"][1]["source"]["kind"], "browse");
    }
}
