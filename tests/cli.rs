use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn shapeboard_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shapeboard").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_prints_usage() {
    let temp = TempDir::new().unwrap();
    shapeboard_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Extensible shape scene editor"));
}

#[test]
fn kinds_lists_builtins_in_order() {
    let temp = TempDir::new().unwrap();
    shapeboard_cmd(&temp)
        .arg("kinds")
        .assert()
        .success()
        .stdout("Line\nRectangle\nEllipse\nPolyline\nPolygon\n");
}

#[test]
fn missing_plugin_is_reported_but_not_fatal() {
    let temp = TempDir::new().unwrap();
    shapeboard_cmd(&temp)
        .args(["--plugin", "/nonexistent/libnothing.so", "kinds"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Polygon"))
        .stderr(predicate::str::contains("failed to load plugin"));
}

#[test]
fn add_creates_file_and_appends() {
    let temp = TempDir::new().unwrap();
    let scene = temp.path().join("scene.txt");

    shapeboard_cmd(&temp)
        .arg("add")
        .arg(&scene)
        .args(["--kind", "Rectangle", "--from", "50,80", "--to", "10,20"])
        .args(["--stroke", "red", "--thickness", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 shapes"));

    shapeboard_cmd(&temp)
        .arg("add")
        .arg(&scene)
        .args(["--kind", "Polygon", "--from", "0,0", "--to", "10,0"])
        .args(["--point", "10,10"])
        .assert()
        .success();

    let text = std::fs::read_to_string(&scene).unwrap();
    assert_eq!(
        text,
        "Rectangle|10,20,40,60|-65536|3|16777215\n\
         Polygon|0,0;10,0;10,10;0,0|-16777216|2|16777215|True\n"
    );
    assert!(temp.path().join("scene.txt.bak").exists());
}

#[test]
fn add_rejects_unknown_kind() {
    let temp = TempDir::new().unwrap();
    let scene = temp.path().join("scene.txt");
    shapeboard_cmd(&temp)
        .arg("add")
        .arg(&scene)
        .args(["--kind", "Hexagon", "--from", "0,0", "--to", "1,1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown shape kind 'Hexagon'"));
    assert!(!scene.exists());
}

#[test]
fn check_reports_the_failing_line() {
    let temp = TempDir::new().unwrap();
    let scene = temp.path().join("scene.txt");
    std::fs::write(
        &scene,
        "Line|0,0|5,5|-16777216|1|16777215\nTrapezoid|0,0;1,0;1,1;0,1|-16777216|1|16777215\n",
    )
    .unwrap();

    shapeboard_cmd(&temp)
        .arg("check")
        .arg(&scene)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"))
        .stderr(predicate::str::contains("unknown shape kind 'Trapezoid'"));
}

#[test]
fn check_accepts_valid_scene() {
    let temp = TempDir::new().unwrap();
    let scene = temp.path().join("scene.txt");
    std::fs::write(&scene, "Ellipse|0,0,10,10|-16777216|1|16777215\n\n").unwrap();

    shapeboard_cmd(&temp)
        .arg("check")
        .arg(&scene)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK (1 shapes)"));
}

#[test]
fn info_json_summarizes_kinds() {
    let temp = TempDir::new().unwrap();
    let scene = temp.path().join("scene.txt");
    std::fs::write(
        &scene,
        "Line|0,0|5,5|-16777216|1|16777215\nLine|1,1|2,2|-16777216|1|16777215\nPolyline|0,0;3,3|-16777216|1|False\n",
    )
    .unwrap();

    let output = shapeboard_cmd(&temp)
        .args(["info", "--json"])
        .arg(&scene)
        .output()
        .unwrap();
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["shape_count"], 3);
    assert_eq!(summary["kinds"]["Line"], 2);
    assert_eq!(summary["kinds"]["Polyline"], 1);
    assert_eq!(summary["compressed"], false);
}

#[test]
fn explicit_config_sets_tool_defaults() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("custom.toml");
    std::fs::write(
        &config,
        "[drawing]\ndefault_shape = \"Ellipse\"\nstroke_thickness = 7\n\n[storage]\nbackup = false\n",
    )
    .unwrap();
    let scene = temp.path().join("scene.txt");

    shapeboard_cmd(&temp)
        .arg("--config")
        .arg(&config)
        .arg("add")
        .arg(&scene)
        .args(["--from", "0,0", "--to", "4,4"])
        .assert()
        .success();

    let text = std::fs::read_to_string(&scene).unwrap();
    assert_eq!(text, "Ellipse|0,0,4,4|-16777216|7|16777215\n");
}

#[test]
fn missing_explicit_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    shapeboard_cmd(&temp)
        .args(["--config"])
        .arg(temp.path().join("absent.toml"))
        .arg("kinds")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config"));
}

#[cfg(feature = "cairo")]
#[test]
fn render_writes_png() {
    let temp = TempDir::new().unwrap();
    let scene = temp.path().join("scene.txt");
    let png = temp.path().join("scene.png");
    std::fs::write(&scene, "Rectangle|2,2,20,10|-65536|2|-256\n").unwrap();

    shapeboard_cmd(&temp)
        .arg("render")
        .arg(&scene)
        .arg("--output")
        .arg(&png)
        .args(["--width", "64", "--height", "32"])
        .assert()
        .success();

    let bytes = std::fs::read(&png).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}
