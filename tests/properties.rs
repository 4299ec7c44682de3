use proptest::prelude::*;

use symres::{
    build_index, normalize, resolve, validate, CanonicalId, CanonicalRecord, MatchType,
    NormalizeOptions, RecordStatus, ValidateOptions,
};

/// Records with unique ids and unique current names; aliases and previous
/// names are drawn from a small pool so collisions and ambiguity are common.
fn arb_records() -> impl Strategy<Value = Vec<CanonicalRecord>> {
    let names = prop::collection::vec("[A-E][0-3]", 0..4);
    prop::collection::vec((names.clone(), names, any::<bool>()), 1..12).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (aliases, previous, withdrawn))| {
                let mut record = CanonicalRecord::new(format!("ID:{i}"), format!("GENE{i}"));
                record.alias_names = aliases;
                record.previous_names = previous;
                if withdrawn {
                    record.status = RecordStatus::Withdrawn;
                }
                record
            })
            .collect()
    })
}

fn arb_queries() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            "[A-E][0-3]",
            "gene[0-9]{1,2}",
            Just(String::new()),
            Just("NA".to_string()),
        ],
        1..16,
    )
}

proptest! {
    #[test]
    fn referenced_ids_exist(records in arb_records()) {
        let index = build_index(records);
        for id in index.referenced_ids() {
            prop_assert!(index.record(id).is_some());
        }
    }

    #[test]
    fn own_current_name_resolves_exact(records in arb_records()) {
        let index = build_index(records.clone());
        for record in &records {
            let result = resolve(&record.current_name.to_lowercase(), &index);
            prop_assert_eq!(result.confidence, MatchType::Exact);
            prop_assert_eq!(result.canonical_id.as_ref(), Some(&record.canonical_id));
        }
    }

    #[test]
    fn resolve_is_deterministic(records in arb_records(), queries in arb_queries()) {
        let index = build_index(records.clone());
        let rebuilt = build_index(records);
        for query in &queries {
            prop_assert_eq!(resolve(query, &index), resolve(query, &index));
            prop_assert_eq!(resolve(query, &index), resolve(query, &rebuilt));
        }
    }

    #[test]
    fn current_name_beats_colliding_alias(records in arb_records(), pick in any::<prop::sample::Index>()) {
        let target = pick.get(&records).clone();
        let mut records = records;
        records.push(
            CanonicalRecord::new("ID:shadow", "SHADOW")
                .with_alias(target.current_name.clone())
                .with_previous(target.current_name.clone()),
        );
        let index = build_index(records);
        let result = resolve(&target.current_name, &index);
        prop_assert_eq!(result.confidence, MatchType::Exact);
        prop_assert_eq!(result.canonical_id, Some(target.canonical_id));
    }

    #[test]
    fn doubled_query_matches_single(records in arb_records(), query in "[A-E][0-3]|GENE[0-9]") {
        let index = build_index(records);
        let options = NormalizeOptions::new().any_status();

        let single = normalize(&[query.clone()], &index, &options).unwrap();
        let doubled = normalize(&[query.clone(), query], &index, &options).unwrap();

        prop_assert_eq!(&single.found, &doubled.found);
        let expected_duplicates = usize::from(!single.found.is_empty());
        prop_assert_eq!(doubled.summary.duplicates_removed, expected_duplicates);
        prop_assert_eq!(doubled.warnings.len(), single.warnings.len() * 2 + expected_duplicates);
    }

    #[test]
    fn validate_accounts_for_every_item(records in arb_records(), queries in arb_queries()) {
        let index = build_index(records);
        let outcome = validate(&queries, &index, &ValidateOptions::new()).unwrap();
        prop_assert_eq!(outcome.valid.len() + outcome.issues.len(), queries.len());
        prop_assert_eq!(outcome.summary.errors + outcome.summary.warnings, outcome.issues.len());
    }

    #[test]
    fn normalize_counts_add_up(records in arb_records(), queries in arb_queries()) {
        let index = build_index(records);
        let outcome = normalize(&queries, &index, &NormalizeOptions::new()).unwrap();
        let s = &outcome.summary;
        prop_assert_eq!(
            s.found + s.not_found + s.withdrawn + s.filtered_out + s.duplicates_removed + s.blank,
            queries.len()
        );
        for found in &outcome.found {
            prop_assert!(index.record(&found.canonical_id).is_some());
            prop_assert_ne!(found.canonical_id.clone(), CanonicalId::new(""));
        }
    }
}
