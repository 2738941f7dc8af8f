use anyhow::Result;
use lastmile_admin::domain::model::OrderStatus;
use lastmile_admin::domain::ports::{OrderRepository, ZoneRepository};
use lastmile_admin::utils::validation::Validate;
use lastmile_admin::{Fixtures, InMemoryStore, LocalStorage, SessionReplay, SessionScript};
use tempfile::TempDir;

const RESHAPE_SCRIPT: &str = r#"
[session]
name = "olaya-reshape"
description = "Stretch Al Olaya north and book an order in the new corner"

[[steps]]
action = "locate"
lng = 46.695
lat = 24.815

[[steps]]
action = "begin_edit"
zone_id = "zone-001"

[[steps]]
action = "move_vertex"
index = 1
to = [46.70, 24.85]

[[steps]]
action = "commit_edit"

[[steps]]
action = "create_order"
type = "delivery"
warehouse_id = "wh-001"
customer_name = "Faisal Al-Qahtani"
customer_phone = "+966559876543"
location = { lng = 46.695, lat = 24.815 }

[[steps]]
action = "cancel_order"
order_id = "ord-007"

[[steps]]
action = "assign_rider"
rider_id = "rider-002"
zone_id = "zone-001"
"#;

fn write_script(dir: &TempDir, name: &str, content: &str) -> Result<std::path::PathBuf> {
    let path = dir.path().join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}

#[tokio::test]
async fn test_replay_script_and_snapshot() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let script_path = write_script(&temp_dir, "reshape.toml", RESHAPE_SCRIPT)?;

    let script = SessionScript::from_file(&script_path)?;
    script.validate()?;

    let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
    let report = SessionReplay::new(&mut store, "admin-003").run(&script);

    assert_eq!(report.steps.len(), 7);
    assert_eq!(report.failed(), 0, "{:?}", report.steps);
    assert!(!report.aborted);
    assert!(report.discarded_edit.is_none());
    assert_eq!(report.steps[0].message, "no zone found for this location");
    assert!(report.steps[4].message.contains("zone-001"));

    assert_eq!(store.order("ord-007").map(|o| o.status), Some(OrderStatus::Cancelled));

    // snapshot through the storage port and read it back
    let storage = LocalStorage::new(temp_dir.path());
    store.snapshot().save(&storage, "out/state.json").await?;
    assert!(temp_dir.path().join("out/state.json").exists());

    let restored = Fixtures::load(&storage, "out/state.json").await?;
    let restored = InMemoryStore::from_fixtures(restored);
    assert_eq!(restored.zones(), store.zones());
    assert_eq!(restored.orders().len(), store.orders().len());
    assert!(restored
        .zone("zone-001")
        .map(|z| z.polygon.outer_ring().contains(&[46.70, 24.85]))
        .unwrap_or(false));

    Ok(())
}

#[tokio::test]
async fn test_continue_runs_past_failures() -> Result<()> {
    let script = SessionScript::from_toml_str(
        r#"
[session]
name = "sloppy"

[[steps]]
action = "move_vertex"
index = 0
to = [46.0, 24.0]

[[steps]]
action = "reassign_order"
order_id = "ord-018"
rider_id = "rider-404"

[[steps]]
action = "rename_zone"
zone_id = "zone-002"
name = "Al Malaz North"

[error_handling]
on_step_error = "continue"
"#,
    )?;

    let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
    let report = SessionReplay::new(&mut store, "admin-001").run(&script);

    let oks: Vec<bool> = report.steps.iter().map(|s| s.ok).collect();
    assert_eq!(oks, vec![false, false, true]);
    assert_eq!(report.steps[1].message, "Rider 'rider-404' does not exist");
    assert_eq!(store.zone("zone-002").map(|z| z.name.as_str()), Some("Al Malaz North"));
    Ok(())
}

#[tokio::test]
async fn test_unfinished_edit_is_discarded() -> Result<()> {
    let script = SessionScript::from_toml_str(
        r#"
[session]
name = "forgetful"

[[steps]]
action = "begin_edit"
zone_id = "zone-006"

[[steps]]
action = "remove_vertex"
index = 0
"#,
    )?;

    let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
    let before = store.zone("zone-006").cloned();
    let report = SessionReplay::new(&mut store, "admin-001").run(&script);

    assert_eq!(report.failed(), 0);
    assert_eq!(report.discarded_edit.as_deref(), Some("zone-006"));
    assert_eq!(store.zone("zone-006").cloned(), before);
    Ok(())
}

#[tokio::test]
async fn test_missing_script_file() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");
    assert!(SessionScript::from_file(&missing).is_err());
}
