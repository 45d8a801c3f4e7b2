//! Record extraction through the public extractor API

use serde_json::json;

use listing_diff_lib::domain::{PayloadShape, RawPayload};
use listing_diff_lib::infrastructure::parsing::{decode_payload, ParsingConfig, RecordExtractor};

fn json_document(records: serde_json::Value) -> RawPayload {
    RawPayload::Json(json!({
        "contents": [{ "mainContent": [{ "contents": [{ "records": records }] }] }]
    }))
}

#[test]
fn test_record_without_any_id_reduces_output_by_one() {
    let extractor = RecordExtractor::new().unwrap();
    let with_ids = json!([
        { "attributes": { "product.id": ["A"] } },
        { "attributes": { "product.repositoryId": ["  repo-B  "] } }
    ]);
    let mut with_orphan = with_ids.clone();
    with_orphan
        .as_array_mut()
        .unwrap()
        .insert(1, json!({ "attributes": { "product.displayName": ["Orphan"] } }));

    let baseline = extractor.extract(&json_document(with_ids), 0).unwrap();
    let report = extractor.extract_report(&json_document(with_orphan), 0).unwrap();

    assert_eq!(baseline.len(), 2);
    assert_eq!(report.records.len(), baseline.len());
    assert_eq!(report.skipped, 1);
    assert_eq!(report.records[1].id, "repo-B");
}

#[test]
fn test_primary_id_wins_over_repository_id() {
    let extractor = RecordExtractor::new().unwrap();
    let payload = json_document(json!([
        { "attributes": { "product.id": ["prod1"], "product.repositoryId": ["repo1"] } },
        { "attributes": { "product.id": ["   "], "product.repositoryId": ["repo2"] } }
    ]));

    let records = extractor.extract(&payload, 0).unwrap();
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["prod1", "repo2"]);
}

#[test]
fn test_absent_records_array_is_empty_not_error() {
    let extractor = RecordExtractor::new().unwrap();
    let payload = decode_payload(r#"{"contents": [{"mainContent": []}]}"#.to_string(), PayloadShape::Json, 0)
        .unwrap();

    assert!(extractor.extract(&payload, 0).unwrap().is_empty());
}

#[test]
fn test_html_tile_missing_id_attribute_is_excluded() {
    let config = ParsingConfig {
        shape: PayloadShape::Html,
        ..ParsingConfig::default()
    };
    let extractor = RecordExtractor::with_config(&config).unwrap();
    let markup = r#"
        <div id="product-list">
          <div data-testid="product-tile"><div data-productid="one"><h3 class="product-tile__product-name">One</h3></div></div>
          <div data-testid="product-tile"><div><h3 class="product-tile__product-name">No id</h3></div></div>
          <div data-testid="product-tile"><div data-productid="three"><h3 class="product-tile__product-name">Three</h3></div></div>
        </div>
    "#;

    let report = extractor
        .extract_report(&RawPayload::Html(markup.to_string()), 2)
        .unwrap();

    let ids: Vec<_> = report.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["one", "three"]);
    assert_eq!(report.skipped, 1);
    assert!(report.records.iter().all(|r| r.source_index == 2));
}
