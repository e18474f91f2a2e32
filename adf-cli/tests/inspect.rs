use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn inspect_defaults_to_treeviz() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("notes.md");
    fs::write(&input_path, "# Hi\n\n**bold**").unwrap();

    let mut cmd = cargo_bin_cmd!("adf");
    cmd.arg("inspect").arg(input_path.as_os_str());

    cmd.assert().success().stdout(
        "⧉ Document (2 blocks)\n├─ § h1 Hi\n│ └─ ◦ Hi\n└─ ¶ bold\n  └─ ◦ bold [strong]\n",
    );
}

#[test]
fn inspect_label_width_and_marks_overrides() {
    let mut cmd = cargo_bin_cmd!("adf");
    cmd.arg("inspect")
        .arg("-")
        .arg("--extra-label-width")
        .arg("4")
        .arg("--extra-show-marks")
        .arg("false")
        .write_stdin("*abcdefgh*");

    cmd.assert()
        .success()
        .stdout("⧉ Document (1 block)\n└─ ¶ abc…\n  └─ ◦ abc…\n");
}

#[test]
fn inspect_json_transform() {
    let mut cmd = cargo_bin_cmd!("adf");
    cmd.arg("inspect")
        .arg("-")
        .arg("adf-json")
        .arg("--extra-pretty")
        .arg("false")
        .write_stdin("---");

    cmd.assert()
        .success()
        .stdout("{\"type\":\"doc\",\"version\":1,\"content\":[{\"type\":\"rule\"}]}\n");
}

#[test]
fn inspect_text_of_adf_file() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("reply.json");
    fs::write(
        &input_path,
        r#"{"type":"doc","version":1,"content":[{"type":"heading","attrs":{"level":3},"content":[{"type":"text","text":"Done"}]}]}"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("adf");
    cmd.arg("inspect").arg(input_path.as_os_str()).arg("text");

    cmd.assert().success().stdout("Done\n");
}

#[test]
fn inspect_rejects_unknown_transform() {
    let mut cmd = cargo_bin_cmd!("adf");
    cmd.arg("inspect").arg("-").arg("ast-tag").write_stdin("x");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn config_file_controls_tree_labels() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("adf.toml");
    fs::write(&config_path, "[inspect]\nshow_marks = false\nlabel_width = 4\n").unwrap();

    let mut cmd = cargo_bin_cmd!("adf");
    cmd.arg("inspect")
        .arg("-")
        .arg("--config")
        .arg(config_path.as_os_str())
        .write_stdin("**abcdefgh**");

    cmd.assert()
        .success()
        .stdout("⧉ Document (1 block)\n└─ ¶ abc…\n  └─ ◦ abc…\n");
}

#[test]
fn convert_to_treeviz_uses_inspect_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("adf.toml");
    fs::write(&config_path, "[inspect]\nlabel_width = 4\n").unwrap();

    let mut cmd = cargo_bin_cmd!("adf");
    cmd.arg("-")
        .arg("--to")
        .arg("treeviz")
        .arg("--config")
        .arg(config_path.as_os_str())
        .write_stdin("**abcdefgh**");

    cmd.assert()
        .success()
        .stdout("⧉ Document (1 block)\n└─ ¶ abc…\n  └─ ◦ abc… [strong]\n");
}
