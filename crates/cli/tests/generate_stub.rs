use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn setup_sources(root: &Path) -> PathBuf {
    let src = root.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("greeter.rb"),
        "def greet(name)\n  \"hi #{name}\"\nend\n",
    )
    .unwrap();
    fs::write(src.join("mather.py"), "def add(a, b):\n    return a + b\n").unwrap();
    fs::write(src.join("README.md"), "# not a source unit\n").unwrap();
    src
}

fn run_generate(src: &Path, out: &Path, extra: &[&str]) -> std::process::Output {
    let mut cmd = Command::cargo_bin("docweave").expect("binary");
    cmd.arg("generate")
        .arg(src)
        .arg("--out-dir")
        .arg(out)
        .arg("--generator")
        .arg("stub");
    for arg in extra {
        cmd.arg(arg);
    }
    cmd.output().expect("command run")
}

#[test]
fn generate_with_stub_round_trips_sources() {
    let temp = tempdir().unwrap();
    let src = setup_sources(temp.path());
    let out = temp.path().join("documentation");

    let output = run_generate(&src, &out, &[]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // stdout carries the run directory
    let run_dir = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
    assert!(run_dir.starts_with(&out));
    assert!(run_dir.join("raw_documentation.json").exists());

    // the stub echoes code untouched, so annotated output equals the input
    let annotated = fs::read_to_string(run_dir.join("annotated").join("greeter.rb")).unwrap();
    assert_eq!(annotated, fs::read_to_string(src.join("greeter.rb")).unwrap());
    let annotated = fs::read_to_string(run_dir.join("annotated").join("mather.py")).unwrap();
    assert_eq!(annotated, fs::read_to_string(src.join("mather.py")).unwrap());

    assert!(!run_dir.join("annotated").join("README.md").exists());
}

#[test]
fn generate_json_reports_every_unit() {
    let temp = tempdir().unwrap();
    let src = setup_sources(temp.path());
    let out = temp.path().join("documentation");

    let output = run_generate(&src, &out, &["--json"]);
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let run_dir = body["run_dir"].as_str().unwrap();
    assert!(Path::new(run_dir).join("raw_documentation.json").exists());

    let units = body["summary"]["units"].as_array().unwrap();
    assert_eq!(units.len(), 2);
    assert_eq!(units[0]["name"], "greeter.rb");
    assert_eq!(units[0]["chunks"], 1);
    assert_eq!(units[0]["fallback_chunks"], 0);
    assert_eq!(units[1]["name"], "mather.py");
}

#[test]
fn generate_single_file_with_markdown_format() {
    let temp = tempdir().unwrap();
    let src = setup_sources(temp.path());
    let out = temp.path().join("documentation");

    let output = run_generate(
        &src.join("greeter.rb"),
        &out,
        &["--format", "markdown"],
    );
    assert!(output.status.success());

    let run_dir = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
    let index = fs::read_to_string(run_dir.join("markdown").join("index.md")).unwrap();
    assert!(index.contains("* [greeter.rb](greeter.rb.md)"));
    assert!(run_dir.join("markdown").join("greeter.rb.md").exists());
}

#[test]
fn generate_missing_path_fails() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("documentation");

    let output = run_generate(&temp.path().join("nope"), &out, &[]);
    assert!(!output.status.success());
    assert!(!out.exists());
}
