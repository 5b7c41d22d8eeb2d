use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn generate_run_dir(temp: &std::path::Path) -> PathBuf {
    let src = temp.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("greeter.rb"),
        "# Greets by name.\ndef greet(name)\n  \"hi #{name}\"\nend\n",
    )
    .unwrap();

    let output = Command::cargo_bin("docweave")
        .expect("binary")
        .arg("generate")
        .arg(&src)
        .arg("--out-dir")
        .arg(temp.join("documentation"))
        .arg("--generator")
        .arg("stub")
        .output()
        .expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    PathBuf::from(String::from_utf8_lossy(&output.stdout).trim())
}

#[test]
fn rebuild_renders_markdown_from_store() {
    let temp = tempdir().unwrap();
    let run_dir = generate_run_dir(temp.path());

    let output = Command::cargo_bin("docweave")
        .expect("binary")
        .arg("rebuild")
        .arg("--cache-dir")
        .arg(&run_dir)
        .arg("--format")
        .arg("markdown")
        .output()
        .expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let index = fs::read_to_string(run_dir.join("markdown").join("index.md")).unwrap();
    assert!(index.contains("* [greeter.rb](greeter.rb.md)"));
    let page = fs::read_to_string(run_dir.join("markdown").join("greeter.rb.md")).unwrap();
    assert!(page.contains("# greeter.rb"));
    assert!(page.contains("Language: ruby"));
}

#[test]
fn rebuild_into_separate_out_dir() {
    let temp = tempdir().unwrap();
    let run_dir = generate_run_dir(temp.path());
    let out = temp.path().join("rendered");

    let output = Command::cargo_bin("docweave")
        .expect("binary")
        .arg("rebuild")
        .arg("--cache-dir")
        .arg(&run_dir)
        .arg("--format")
        .arg("comments")
        .arg("--out-dir")
        .arg(&out)
        .output()
        .expect("command run");
    assert!(output.status.success());

    let comments =
        fs::read_to_string(out.join("comments").join("greeter.rb.comments")).unwrap();
    assert!(comments.contains("# Greets by name."));
}

#[test]
fn rebuild_without_store_fails() {
    let temp = tempdir().unwrap();

    Command::cargo_bin("docweave")
        .expect("binary")
        .arg("rebuild")
        .arg("--cache-dir")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No documentation records"));
}
