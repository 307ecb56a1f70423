//! CLI command integration tests.
//! Each test uses a temp directory via GEOCACHE_DATA_DIR for full isolation.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn geocache_cmd(data_dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("geocache").unwrap();
    cmd.env("GEOCACHE_DATA_DIR", data_dir.path());
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {output:?}");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn look_fresh_slot() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(geocache_cmd(&dir).args(["look", "--slot", "test-look"]));

    let mut lines = stdout.lines();
    let status = lines.next().unwrap();
    assert!(status.contains("(cell 0:0)"), "{status}");
    assert!(status.contains("33 caches in range"), "{status}");

    let caches: Vec<&str> = lines.collect();
    assert_eq!(caches.len(), 33);
    assert_eq!(caches[0], "cache -8:-5  7 tokens");
    assert!(caches.contains(&"cache -8:4  0 tokens"));

    assert!(dir.path().join("saves").join("test-look.db").exists());
}

#[test]
fn look_is_deterministic_across_slots() {
    let dir = TempDir::new().unwrap();
    let a = stdout_of(geocache_cmd(&dir).args(["look", "--slot", "a"]));
    let b = stdout_of(geocache_cmd(&dir).args(["look", "--slot", "b"]));
    assert_eq!(a, b);
}

#[test]
fn move_shifts_the_neighborhood() {
    let dir = TempDir::new().unwrap();
    geocache_cmd(&dir)
        .args(["move", "east", "--slot", "test-move"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(cell 0:1)"))
        .stdout(predicate::str::contains("33 caches in range"));

    geocache_cmd(&dir)
        .args(["move", "north", "--slot", "test-move"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(cell 1:1)"))
        .stdout(predicate::str::contains("32 caches in range"));

    geocache_cmd(&dir)
        .args(["move", "s", "--slot", "test-move"])
        .assert()
        .success();

    // position is persisted
    geocache_cmd(&dir)
        .args(["move", "w", "--slot", "test-move"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(cell 0:0)"))
        .stdout(predicate::str::contains("33 caches in range"));
}

#[test]
fn move_rejects_unknown_direction() {
    let dir = TempDir::new().unwrap();
    geocache_cmd(&dir)
        .args(["move", "up"])
        .assert()
        .failure();
}

#[test]
fn collect_then_inventory() {
    let dir = TempDir::new().unwrap();
    geocache_cmd(&dir)
        .args(["collect", "2", "2", "--slot", "test-collect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("collected 2:2#"))
        .stdout(predicate::str::contains("(1 left)"));

    geocache_cmd(&dir)
        .args(["inventory", "--slot", "test-collect"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("2:2#"));
}

#[test]
fn collect_negative_cell() {
    let dir = TempDir::new().unwrap();
    geocache_cmd(&dir)
        .args(["collect", "-6", "-3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("collected -6:-3#"))
        .stdout(predicate::str::contains("(3 left)"));
}

#[test]
fn unmet_preconditions_are_noops() {
    let dir = TempDir::new().unwrap();

    geocache_cmd(&dir)
        .args(["collect", "-8", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cache -8:4 is empty"));

    geocache_cmd(&dir)
        .args(["collect", "100", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no cache in range at 100:100"));

    geocache_cmd(&dir)
        .args(["deposit", "2", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to deposit"));

    geocache_cmd(&dir)
        .args(["inventory"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tokens"));
}

#[test]
fn collect_and_deposit_move_one_token() {
    let dir = TempDir::new().unwrap();
    geocache_cmd(&dir)
        .args(["collect", "1", "-4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(5 left)"));

    geocache_cmd(&dir)
        .args(["deposit", "-8", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deposited 1:-4#"))
        .stdout(predicate::str::contains("into -8:4 (1 held)"));

    geocache_cmd(&dir)
        .args(["inventory"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tokens"));
}

#[test]
fn caches_are_remembered_after_leaving() {
    let dir = TempDir::new().unwrap();
    geocache_cmd(&dir)
        .args(["collect", "-6", "-3"])
        .assert()
        .success();

    let away = stdout_of(geocache_cmd(&dir).args(["goto", "0.01", "0.01"]));
    assert!(away.contains("(cell 100:100)"), "{away}");
    assert!(!away.contains("cache -6:-3"));

    geocache_cmd(&dir)
        .args(["goto", "0", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cache -6:-3  3 tokens"));
}

#[test]
fn goto_accepts_negative_coordinates() {
    let dir = TempDir::new().unwrap();
    geocache_cmd(&dir)
        .args(["goto", "-0.0005", "-0.0005"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(cell -5:-5)"));
}

#[test]
fn goto_rejects_positions_off_the_globe() {
    let dir = TempDir::new().unwrap();
    for (lat, lng) in [("1e10", "0"), ("0", "-180.5"), ("91", "0"), ("NaN", "0")] {
        geocache_cmd(&dir)
            .args(["goto", lat, lng])
            .assert()
            .failure();
    }

    // the saved position was never touched
    geocache_cmd(&dir)
        .arg("look")
        .assert()
        .success()
        .stdout(predicate::str::contains("(cell 0:0)"));
}

#[test]
fn export_import_roundtrip() {
    let dir = TempDir::new().unwrap();
    geocache_cmd(&dir)
        .args(["collect", "2", "2", "--slot", "slot-a"])
        .assert()
        .success();
    geocache_cmd(&dir)
        .args(["move", "north", "--slot", "slot-a"])
        .assert()
        .success();

    let export_path = dir.path().join("export.json");
    geocache_cmd(&dir)
        .args(["export", "--slot", "slot-a"])
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("exported to"));

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(raw["inventory"].as_array().unwrap().len(), 1);

    geocache_cmd(&dir)
        .args(["import", "--slot", "slot-b"])
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("imported from"))
        .stdout(predicate::str::contains("(cell 1:0)"));

    let inv_a = stdout_of(geocache_cmd(&dir).args(["inventory", "--slot", "slot-a"]));
    let inv_b = stdout_of(geocache_cmd(&dir).args(["inventory", "--slot", "slot-b"]));
    assert_eq!(inv_a, inv_b);

    let look_a = stdout_of(geocache_cmd(&dir).args(["look", "--slot", "slot-a"]));
    let look_b = stdout_of(geocache_cmd(&dir).args(["look", "--slot", "slot-b"]));
    assert_eq!(look_a, look_b);
}

#[test]
fn import_invalid_file_fails() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    geocache_cmd(&dir)
        .arg("import")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to import JSON"));
}

#[test]
fn config_file_changes_the_world() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[game]\nneighborhood_size = 1\nspawn_probability = 1.0\n",
    )
    .unwrap();
    geocache_cmd(&dir)
        .arg("look")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 caches in range"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[game]\ntile_degrees = 0.0\n").unwrap();
    geocache_cmd(&dir)
        .arg("look")
        .assert()
        .failure()
        .stderr(predicate::str::contains("tile_degrees"));
}

#[test]
fn missing_required_args() {
    let dir = TempDir::new().unwrap();

    geocache_cmd(&dir)
        .args(["move"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));

    geocache_cmd(&dir)
        .args(["collect", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));

    geocache_cmd(&dir)
        .args(["export"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));

    geocache_cmd(&dir)
        .args(["import"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}
