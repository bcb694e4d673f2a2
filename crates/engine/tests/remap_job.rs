use oid_engine::{RemapConfig, RemapError, RemapJob};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn job_in(dir: &Path) -> RemapJob {
    RemapJob {
        mapping_path: dir.join("old_to_new.json"),
        table_path: dir.join("template.csv"),
        output_path: dir.join("template_fixed.csv"),
        unmapped_path: dir.join("unmapped.txt"),
    }
}

fn rows_json(rows: &[oid_engine::JsonRow]) -> Value {
    Value::Array(rows.iter().cloned().map(Value::Object).collect())
}

#[test]
fn end_to_end_remaps_ids_and_parents() {
    let temp = tempdir().unwrap();
    let job = job_in(temp.path());
    fs::write(&job.mapping_path, r#"{"1": "100"}"#).unwrap();
    fs::write(
        &job.table_path,
        "id_perkiraan,nama,id_parent\n1,Aset,1\n2,Kas,1\n",
    )
    .unwrap();

    let outcome = job.run(&RemapConfig::default()).unwrap();

    assert_eq!(
        rows_json(&outcome.rows),
        json!([
            {"id_perkiraan": 100, "nama": "Aset", "id_parent": 0},
            {"id_perkiraan": 2, "nama": "Kas", "id_parent": 100},
        ])
    );
    assert_eq!(
        fs::read_to_string(&job.output_path).unwrap(),
        "id_perkiraan,nama,id_parent\n100,Aset,0\n2,Kas,100\n"
    );
    assert_eq!(outcome.unmapped, vec!["2".to_string()]);
    assert!(outcome.unmapped_written);
    assert_eq!(fs::read_to_string(&job.unmapped_path).unwrap(), "2\n");
}

#[test]
fn parent_resolving_to_own_id_after_conversion_is_cleared() {
    let temp = tempdir().unwrap();
    let job = job_in(temp.path());
    fs::write(&job.mapping_path, r#"{"X": "7"}"#).unwrap();
    fs::write(&job.table_path, "id_perkiraan,id_parent\n007,X\n").unwrap();

    let outcome = job.run(&RemapConfig::default()).unwrap();

    assert_eq!(
        rows_json(&outcome.rows),
        json!([{"id_perkiraan": 7, "id_parent": 0}])
    );
    assert_eq!(
        fs::read_to_string(&job.output_path).unwrap(),
        "id_perkiraan,id_parent\n7,0\n"
    );
}

#[test]
fn unmapped_identifier_falls_back_to_canonical_form() {
    let temp = tempdir().unwrap();
    let job = job_in(temp.path());
    fs::write(&job.mapping_path, "{}").unwrap();
    fs::write(&job.table_path, "id_perkiraan\n z1 \n").unwrap();

    let outcome = job.run(&RemapConfig::default()).unwrap();

    // Non-numeric leftovers coerce to 0 but are still reported canonically.
    assert_eq!(rows_json(&outcome.rows), json!([{"id_perkiraan": 0}]));
    assert_eq!(fs::read_to_string(&job.unmapped_path).unwrap(), "Z1\n");
}

#[test]
fn fully_mapped_run_keeps_previous_unmapped_report() {
    let temp = tempdir().unwrap();
    let job = job_in(temp.path());
    fs::write(&job.mapping_path, r#"{"a": 7}"#).unwrap();
    fs::write(&job.table_path, "id_perkiraan\nA\n").unwrap();
    fs::write(&job.unmapped_path, "OLD\n").unwrap();

    let outcome = job.run(&RemapConfig::default()).unwrap();

    assert!(!outcome.unmapped_written);
    assert!(outcome.unmapped.is_empty());
    assert_eq!(fs::read_to_string(&job.unmapped_path).unwrap(), "OLD\n");
}

#[test]
fn missing_inputs_are_all_reported() {
    let temp = tempdir().unwrap();
    let job = job_in(temp.path());

    let err = job.run(&RemapConfig::default()).unwrap_err();

    assert_eq!(err.status_code(), 404);
    let RemapError::NotFound { paths } = &err else {
        panic!("expected NotFound, got {err:?}");
    };
    assert_eq!(paths, &vec![job.mapping_path.clone(), job.table_path.clone()]);
    let message = err.to_string();
    assert!(message.contains("old_to_new.json") && message.contains("template.csv"));
}

#[test]
fn missing_identifier_column_writes_nothing() {
    let temp = tempdir().unwrap();
    let job = job_in(temp.path());
    fs::write(&job.mapping_path, r#"{"1": "2"}"#).unwrap();
    fs::write(&job.table_path, "kode,id_parent\n1,0\n").unwrap();

    let err = job.run(&RemapConfig::default()).unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(err.to_string(), "Column 'id_perkiraan' not found in CSV.");
    assert!(!job.output_path.exists());
    assert!(!job.unmapped_path.exists());
}

#[test]
fn malformed_mapping_is_an_unexpected_failure() {
    let temp = tempdir().unwrap();
    let job = job_in(temp.path());
    fs::write(&job.mapping_path, "{not json").unwrap();
    fs::write(&job.table_path, "id_perkiraan\n1\n").unwrap();

    let err = job.run(&RemapConfig::default()).unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert!(matches!(err, RemapError::Json(_)));
}

#[test]
fn custom_column_names_are_honored() {
    let temp = tempdir().unwrap();
    let job = job_in(temp.path());
    fs::write(&job.mapping_path, r#"{"10": "11", "20": "21"}"#).unwrap();
    fs::write(&job.table_path, "oid,induk\n10,20\n20,0\n").unwrap();
    let config = RemapConfig {
        id_column: "oid".to_string(),
        parent_column: "induk".to_string(),
        ..RemapConfig::default()
    };

    let outcome = job.run(&config).unwrap();

    assert_eq!(
        rows_json(&outcome.rows),
        json!([{"oid": 11, "induk": 21}, {"oid": 21, "induk": 0}])
    );
}
