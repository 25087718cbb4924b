//! End-to-end scenarios for the comparison pipeline.

mod common;

use common::{ids, people, table};
use querydiff_core::prelude::*;
use querydiff_core::report::DEFAULT_PREVIEW_LIMIT;
use querydiff_core::Side;

#[test]
fn test_mismatch_and_right_only_are_reported() {
    let left = people(&[(1, "A"), (2, "B")]);
    let right = people(&[(1, "A"), (2, "C"), (3, "D")]);

    let report = compare(&left, &right, &ColumnMapping::identity(), &JoinKeySet::new(["id"])).unwrap();

    assert_eq!(report.summary.total_rows_query1, 2);
    assert_eq!(report.summary.total_rows_query2, 3);
    assert_eq!(report.summary.matches, 1);
    assert_eq!(report.summary.mismatches, 1);
    assert_eq!(report.summary.only_in_query1, 0);
    assert_eq!(report.summary.only_in_query2, 1);

    assert_eq!(report.mismatches.len(), 1);
    let mismatch = &report.mismatches[0];
    assert_eq!(mismatch.key.get("id"), Some(&Value::Int(2)));
    let diff = mismatch.differences.get("name").unwrap();
    assert_eq!(diff.query1, Value::from("B"));
    assert_eq!(diff.query2, Value::from("C"));

    assert_eq!(report.only_in_query2.len(), 1);
    assert_eq!(report.only_in_query2[0].get("id"), Some(&Value::Int(3)));
    assert_eq!(report.only_in_query2[0].get("name"), Some(&Value::from("D")));
}

#[test]
fn test_empty_keys_fall_back_to_first_common_column() {
    let left = table(
        &["id", "email"],
        vec![vec![Value::Int(1), Value::from("a@x")]],
    );
    let right = table(
        &["email", "id"],
        vec![vec![Value::from("b@x"), Value::Int(1)]],
    );

    let report = compare(&left, &right, &ColumnMapping::identity(), &JoinKeySet::empty()).unwrap();

    // Joined on "id" (first in left order), so the email difference shows up.
    assert_eq!(report.summary.mismatches, 1);
    assert_eq!(report.mismatches[0].key.get("id"), Some(&Value::Int(1)));
    assert!(report.mismatches[0].differences.get("email").is_some());
    assert_eq!(report.columns.mapped, ["id", "email"]);
}

#[test]
fn test_mapped_columns_are_compared_under_left_names() {
    let left = table(
        &["id", "name", "city"],
        vec![vec![Value::Int(1), Value::from("Ann"), Value::from("Oslo")]],
    );
    let right = table(
        &["user_id", "full_name", "city"],
        vec![vec![Value::Int(1), Value::from("Ann"), Value::from("Bergen")]],
    );
    let mapping = ColumnMapping::new([("id", "user_id"), ("name", "full_name")]).unwrap();

    let report = compare(&left, &right, &mapping, &JoinKeySet::new(["id"])).unwrap();

    assert_eq!(report.summary.mismatches, 1);
    let differences = &report.mismatches[0].differences;
    assert_eq!(differences.len(), 1);
    // "city" is not in the mapping and is compared under its own name.
    assert!(differences.get("city").is_some());

    assert_eq!(report.columns.query1, ["id", "name", "city"]);
    assert_eq!(report.columns.query2, ["user_id", "full_name", "city"]);
    assert_eq!(report.columns.mapped, ["id", "name", "city"]);
}

#[test]
fn test_matches_are_merged_with_side_suffixes() {
    let left = table(
        &["id", "name", "left_extra"],
        vec![vec![Value::Int(1), Value::from("A"), Value::Bool(true)]],
    );
    let right = table(
        &["id", "name", "right_extra"],
        vec![vec![Value::Int(1), Value::from("A"), Value::Int(9)]],
    );

    let report = compare(&left, &right, &ColumnMapping::identity(), &JoinKeySet::new(["id"])).unwrap();

    let merged = &report.matches[0];
    let columns: Vec<&str> = merged.columns().collect();
    assert_eq!(
        columns,
        ["id", "name_query1", "left_extra", "name_query2", "right_extra"]
    );
    assert_eq!(merged.get("right_extra"), Some(&Value::Int(9)));
}

#[test]
fn test_suffixed_name_clashing_with_left_column_is_rejected() {
    let left = table(
        &["id", "name", "name_query1"],
        vec![vec![Value::Int(1), Value::from("A"), Value::from("L-extra")]],
    );
    let right = table(&["id", "name"], vec![vec![Value::Int(1), Value::from("A")]]);

    let err = compare(&left, &right, &ColumnMapping::identity(), &JoinKeySet::new(["id"])).unwrap_err();

    assert!(matches!(err, CompareError::SchemaMismatch { side: None, .. }));
    assert_eq!(
        err.to_string(),
        "Schema mismatch: merged column 'name_query1' would appear twice in matched rows"
    );
}

#[test]
fn test_suffixed_name_clashing_with_right_column_is_rejected() {
    let left = table(&["id", "name"], vec![vec![Value::Int(1), Value::from("A")]]);
    let right = table(
        &["id", "name", "name_query2"],
        vec![vec![Value::Int(1), Value::from("A"), Value::from("R-extra")]],
    );

    let err = compare(&left, &right, &ColumnMapping::identity(), &JoinKeySet::new(["id"])).unwrap_err();

    assert!(err.to_string().contains("'name_query2'"), "{err}");
}

#[test]
fn test_previews_are_bounded_but_counts_are_not() {
    let left = ids(250);
    let right = ids(0);

    let report = compare(&left, &right, &ColumnMapping::identity(), &JoinKeySet::new(["id"])).unwrap();

    assert_eq!(report.summary.only_in_query1, 250);
    assert_eq!(report.only_in_query1.len(), DEFAULT_PREVIEW_LIMIT);
    assert_eq!(report.only_in_query1[0].get("id"), Some(&Value::Int(0)));

    let report = compare(&left, &left, &ColumnMapping::identity(), &JoinKeySet::new(["id"])).unwrap();
    assert_eq!(report.summary.matches, 250);
    assert_eq!(report.matches.len(), DEFAULT_PREVIEW_LIMIT);
    assert!(report.is_identical());
}

#[test]
fn test_custom_preview_limit() {
    let left = people(&[(1, "a"), (2, "b"), (3, "c")]);
    let right = people(&[(1, "x"), (2, "y"), (3, "z")]);
    let options = CompareOptions::default().preview_limit(2);

    let report = compare_with(
        &left,
        &right,
        &ColumnMapping::identity(),
        &JoinKeySet::new(["id"]),
        &options,
    )
    .unwrap();

    assert_eq!(report.summary.mismatches, 3);
    assert_eq!(report.mismatches.len(), 2);
}

#[test]
fn test_missing_join_key_fails_before_rows_are_touched() {
    let left = people(&[(1, "A")]);
    let right = table(&["uid", "name"], vec![vec![Value::Int(1), Value::from("A")]]);

    let err = compare(&left, &right, &ColumnMapping::identity(), &JoinKeySet::new(["id"])).unwrap_err();

    assert!(matches!(
        err,
        CompareError::SchemaMismatch {
            side: Some(Side::Right),
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "Schema mismatch: join key 'id' not found in query2 columns"
    );
}

#[test]
fn test_conflicting_mapping_is_rejected() {
    let left = people(&[(1, "A")]);
    let right = people(&[(1, "A")]);
    let mapping = ColumnMapping::new([("id", "name")]).unwrap();

    let err = compare(&left, &right, &mapping, &JoinKeySet::new(["id"])).unwrap_err();

    assert!(matches!(err, CompareError::InvalidMapping(_)));
}

#[test]
fn test_duplicate_keys_produce_cross_product() {
    let left = people(&[(1, "A"), (1, "A")]);
    let right = people(&[(1, "A"), (1, "B")]);

    let report = compare(&left, &right, &ColumnMapping::identity(), &JoinKeySet::new(["id"])).unwrap();

    assert_eq!(report.summary.matches, 2);
    assert_eq!(report.summary.mismatches, 2);
    assert_eq!(report.summary.matched_pairs(), 4);
}

#[test]
fn test_report_serializes_with_stable_field_names() {
    let left = people(&[(1, "A"), (2, "B")]);
    let right = people(&[(2, "C"), (3, "D")]);

    let report = compare(&left, &right, &ColumnMapping::identity(), &JoinKeySet::new(["id"])).unwrap();
    let json = serde_json::to_string(&report).unwrap();

    for field in [
        "\"summary\":",
        "\"matches\":",
        "\"only_in_query1\":[{\"id\":1,\"name\":\"A\"}]",
        "\"only_in_query2\":[{\"id\":3,\"name\":\"D\"}]",
        "\"mismatches\":[{\"key\":{\"id\":2},\"differences\":{\"name\":{\"query1\":\"B\",\"query2\":\"C\"}}}]",
        "\"columns\":{\"query1\":[\"id\",\"name\"],\"query2\":[\"id\",\"name\"],\"mapped\":[\"id\",\"name\"]}",
        "\"total_rows_query1\":2",
        "\"execution_time\":",
    ] {
        assert!(json.contains(field), "missing {field} in {json}");
    }
}
