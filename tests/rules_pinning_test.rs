use anyhow::Result;
use pricing_explain::{
    ExplainEngine, ExplainError, FileRulesSource, JsonRecordStore, RecordKind,
};
use tempfile::TempDir;

const RULES_V1: &str = r#"version = 1
currency = "ILS"
rounding = 2

[entries."rates.hour_electric"]
type = "hour"
value = 800
"#;

const RECORDS: &str = r#"{
  "records": [
    {"kind": "task", "id": "t-1", "rateKey": "rates.hour_electric", "quantity": "2.0"}
  ]
}"#;

struct Harness {
    _dir: TempDir,
    rules_path: std::path::PathBuf,
    engine: ExplainEngine<JsonRecordStore, FileRulesSource, JsonRecordStore>,
}

fn setup(rules: &str) -> Result<Harness> {
    let dir = TempDir::new()?;
    let rules_path = dir.path().join("rates.toml");
    let records_path = dir.path().join("records.json");
    std::fs::write(&rules_path, rules)?;
    std::fs::write(&records_path, RECORDS)?;

    let store = JsonRecordStore::from_file(&records_path)?;
    let engine = ExplainEngine::new(
        store.clone(),
        FileRulesSource::new(),
        store,
        rules_path.to_str().unwrap(),
    );
    Ok(Harness {
        _dir: dir,
        rules_path,
        engine,
    })
}

#[tokio::test]
async fn test_one_byte_change_invalidates_pin() -> Result<()> {
    let harness = setup(RULES_V1)?;
    let before = harness.engine.explain(RecordKind::Task, "t-1").await?;

    // A comment is invisible to the parser but not to the hash.
    std::fs::write(&harness.rules_path, format!("# touched\n{RULES_V1}"))?;
    let after = harness.engine.explain(RecordKind::Task, "t-1").await?;

    assert_eq!(after.rules_version, before.rules_version);
    assert_eq!(after.total, before.total);
    assert_ne!(after.rules_hash, before.rules_hash);
    assert_ne!(after.pricing_hash, before.pricing_hash);
    Ok(())
}

#[tokio::test]
async fn test_version_and_hash_are_independent_signals() -> Result<()> {
    let harness = setup(RULES_V1)?;
    let before = harness.engine.explain(RecordKind::Task, "t-1").await?;

    // Version bumped, rate unchanged: new hash, new version, same total.
    std::fs::write(
        &harness.rules_path,
        RULES_V1.replace("version = 1", "version = 2"),
    )?;
    let after = harness.engine.explain(RecordKind::Task, "t-1").await?;

    assert_eq!(after.rules_version, 2);
    assert_ne!(after.rules_hash, before.rules_hash);
    assert_eq!(after.total, before.total);
    Ok(())
}

#[tokio::test]
async fn test_hash_has_fingerprint_shape() -> Result<()> {
    let harness = setup(RULES_V1)?;
    let explanation = harness.engine.explain(RecordKind::Task, "t-1").await?;

    for hash in [&explanation.rules_hash, &explanation.pricing_hash] {
        assert_eq!(hash.len(), 12);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
    Ok(())
}

#[tokio::test]
async fn test_unreadable_rules_source() -> Result<()> {
    let harness = setup(RULES_V1)?;
    std::fs::remove_file(&harness.rules_path)?;

    let err = harness
        .engine
        .explain(RecordKind::Task, "t-1")
        .await
        .unwrap_err();
    assert!(matches!(err, ExplainError::RulesUnavailable { .. }));
    assert!(err.is_retryable());
    Ok(())
}

#[tokio::test]
async fn test_malformed_rules_source() -> Result<()> {
    let harness = setup(RULES_V1)?;
    // Drop the required version field.
    std::fs::write(&harness.rules_path, "currency = \"ILS\"\nrounding = 2\n")?;

    let err = harness
        .engine
        .explain(RecordKind::Task, "t-1")
        .await
        .unwrap_err();
    assert!(matches!(err, ExplainError::RulesMalformed { .. }));
    assert!(!err.is_retryable());
    Ok(())
}

#[tokio::test]
async fn test_record_referencing_removed_rule() -> Result<()> {
    let harness = setup(
        r#"version = 3
currency = "ILS"
rounding = 2

[entries."rates.hour_plumbing"]
type = "hour"
value = 600
"#,
    )?;

    let err = harness
        .engine
        .explain(RecordKind::Task, "t-1")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ExplainError::RateKeyNotFound { ref key, ref record_id }
            if key == "rates.hour_electric" && record_id == "t-1"
    ));
    Ok(())
}
