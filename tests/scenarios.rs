use symres::{
    build_index, normalize, resolve, validate, CanonicalId, CanonicalRecord, IssueKind, MatchType,
    MultiKeyIndex, NormalizeOptions, RecordStatus, ValidateOptions, WarningKind,
};

fn brca1_tp53() -> MultiKeyIndex {
    let _ = tracing_subscriber::fmt::try_init();
    build_index(vec![
        CanonicalRecord::new("1", "BRCA1").with_alias("BRCA-1"),
        CanonicalRecord::new("2", "TP53").with_previous("P53"),
    ])
}

#[test]
fn resolve_walks_every_tier() {
    let index = brca1_tp53();

    let cases = [
        ("brca1", Some("1"), MatchType::Exact),
        ("BRCA-1", Some("1"), MatchType::Alias),
        ("p53", Some("2"), MatchType::Previous),
        ("EGFR", None, MatchType::NotFound),
    ];
    for (query, id, confidence) in cases {
        let result = resolve(query, &index);
        assert_eq!(result.canonical_id, id.map(CanonicalId::new), "query {query}");
        assert_eq!(result.confidence, confidence, "query {query}");
    }
}

#[test]
fn shared_alias_reports_both_candidates() {
    let index = build_index(vec![
        CanonicalRecord::new("id1", "GENEA").with_alias("X"),
        CanonicalRecord::new("id2", "GENEB").with_alias("X"),
    ]);
    let result = resolve("X", &index);
    assert_eq!(result.confidence, MatchType::Ambiguous);
    assert_eq!(
        result.candidate_ids,
        vec![CanonicalId::new("id1"), CanonicalId::new("id2")]
    );
}

#[test]
fn normalize_dedupes_case_variants() {
    let index = brca1_tp53();
    let outcome = normalize(&["BRCA1", "brca1", "TP53"], &index, &NormalizeOptions::new()).unwrap();

    assert_eq!(outcome.found.len(), 2);
    let duplicates: Vec<_> = outcome
        .warnings
        .iter()
        .filter(|w| matches!(w.kind, WarningKind::Duplicate { .. }))
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert!(matches!(
        duplicates[0].kind,
        WarningKind::Duplicate { first_position: 1, .. }
    ));
}

#[test]
fn validate_mixed_panel() {
    let index = brca1_tp53();
    let outcome = validate(&["BRCA1", "P53", "NOTREAL", ""], &index, &ValidateOptions::new()).unwrap();

    let valid: Vec<&str> = outcome.valid.iter().map(|v| v.record.current_name.as_str()).collect();
    assert_eq!(valid, vec!["BRCA1"]);

    let kinds: Vec<IssueKind> = outcome.issues.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![IssueKind::PreviousSymbol, IssueKind::NotFound, IssueKind::EmptyOrNa]
    );
    assert_eq!(outcome.replacements[0].input, "P53");
    assert_eq!(outcome.replacements[0].suggested.as_deref(), Some("TP53"));
}

#[test]
fn withdrawn_match_is_filed_separately() {
    let index = build_index(vec![
        CanonicalRecord::new("1", "BRCA1").with_status(RecordStatus::Withdrawn)
    ]);
    let options = NormalizeOptions::new().status_filter([RecordStatus::Approved]);
    let outcome = normalize(&["BRCA1"], &index, &options).unwrap();

    assert!(outcome.found.is_empty());
    assert!(outcome.not_found.is_empty());
    assert_eq!(outcome.withdrawn.len(), 1);
    assert_eq!(outcome.withdrawn[0].query, "BRCA1");
}

#[test]
fn all_failed_batch_is_still_a_complete_outcome() {
    let index = brca1_tp53();
    let outcome = normalize(&["NOPE1", "NOPE2"], &index, &NormalizeOptions::new()).unwrap();
    assert!(outcome.found.is_empty());
    assert_eq!(outcome.not_found.len(), 2);
    assert_eq!(outcome.summary.total_input, 2);

    let outcome = validate(&["NOPE1", "NA"], &index, &ValidateOptions::new()).unwrap();
    assert!(outcome.valid.is_empty());
    assert_eq!(outcome.issues.len(), 2);
    assert!(outcome.report.contains("Valid: 0"));
}

#[test]
fn outcomes_serialize_for_transport() {
    let index = brca1_tp53();
    let batch = normalize(&["BRCA-1", "x"], &index, &NormalizeOptions::new()).unwrap();
    let json = serde_json::to_value(&batch).unwrap();
    assert_eq!(json["found"][0]["match_type"], "alias");
    assert_eq!(json["found"][0]["fields"]["current_name"], "BRCA1");
    assert_eq!(json["warnings"][0]["kind"], "not_found");
    assert_eq!(json["summary"]["by_match_type"]["alias"], 1);

    let panel = validate(&["P53"], &index, &ValidateOptions::new()).unwrap();
    let json = serde_json::to_value(&panel).unwrap();
    assert_eq!(json["issues"][0]["kind"], "previous_symbol");
    assert_eq!(json["summary"]["by_kind"]["previous_symbol"], 1);
}
