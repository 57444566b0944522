use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn overmark_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("overmark").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd
}

#[test]
fn help_prints_usage() {
    let temp = TempDir::new().unwrap();
    overmark_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Pointer-driven screen annotation engine",
        ));
}

#[test]
fn version_prints_package_version() {
    let temp = TempDir::new().unwrap();
    overmark_cmd(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn script_is_required() {
    let temp = TempDir::new().unwrap();
    overmark_cmd(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn print_config_shows_defaults() {
    let temp = TempDir::new().unwrap();
    overmark_cmd(&temp)
        .arg("--print-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[drawing]"))
        .stdout(predicate::str::contains("history_limit = 50"));
}

#[test]
fn print_config_reads_explicit_file() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("custom.toml");
    std::fs::write(&config, "[canvas]\nhistory_limit = 7\n").unwrap();

    overmark_cmd(&temp)
        .args(["--print-config", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("history_limit = 7"));
}

#[test]
fn script_renders_png_to_output() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("events.json");
    let output = temp.path().join("out").join("result.png");
    std::fs::write(
        &script,
        r#"[
            {"event": "tool", "tool": "star"},
            {"event": "color", "color": "green"},
            {"event": "drag", "from": [20, 20], "to": [120, 100]},
            {"event": "tool", "tool": "brush"},
            {"event": "down", "x": 150, "y": 30},
            {"event": "move", "x": 180, "y": 60}
        ]"#,
    )
    .unwrap();

    overmark_cmd(&temp)
        .arg("--script")
        .arg(&script)
        .args(["--width", "200", "--height", "150", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("6 steps, 2 objects, 2 undo steps"));

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
}

#[test]
fn malformed_script_fails() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("broken.json");
    std::fs::write(&script, r#"[{"event": "warp", "x": 1}]"#).unwrap();

    overmark_cmd(&temp)
        .arg("--script")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid script"));
}

#[test]
fn missing_script_file_fails() {
    let temp = TempDir::new().unwrap();
    overmark_cmd(&temp)
        .args(["--script", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read script"));
}

#[test]
fn save_writes_into_configured_directory() {
    let temp = TempDir::new().unwrap();
    let exports = temp.path().join("exports");
    let config_dir = temp.path().join("overmark");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "[export]\nsave_directory = {:?}\nfilename_template = \"fixed_name\"\n",
            exports.display().to_string()
        ),
    )
    .unwrap();

    let script = temp.path().join("events.json");
    std::fs::write(
        &script,
        r#"[{"event": "drag", "from": [5, 5], "to": [40, 40]}]"#,
    )
    .unwrap();

    overmark_cmd(&temp)
        .arg("--script")
        .arg(&script)
        .args(["--width", "64", "--height", "64", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved"));

    assert!(exports.join("fixed_name.png").exists());
}
