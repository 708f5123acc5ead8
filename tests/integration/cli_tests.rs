use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

/// Run the binary with a clean environment and an empty config file.
fn run(args: &[&str], config_dir: &Path) -> Output {
    let config = config_dir.join("empty.toml");
    fs::write(&config, "").unwrap();

    Command::new(env!("CARGO_BIN_EXE_dupfind"))
        .env_clear()
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .unwrap()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_cli_prints_report() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("tree");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.txt"), "hello").unwrap();
    fs::write(root.join("b.txt"), "hello").unwrap();
    fs::write(root.join("c.txt"), "world").unwrap();
    fs::write(root.join("d.bin"), vec![0u8; 1024]).unwrap();

    let output = run(&[root.to_str().unwrap()], dir.path());

    assert_eq!(output.status.code(), Some(0));
    let root = std::path::absolute(&root).unwrap();
    let expected = format!(
        "Matching Files:\n[ {},\n  {} ]\n\n-- Stats --\nNumber of files scanned: 4\nTotal data compared: 0.00MB\n",
        root.join("a.txt").display(),
        root.join("b.txt").display()
    );
    assert_eq!(stdout_of(&output), expected);
}

#[test]
fn test_cli_no_duplicates() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("tree");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("only.txt"), "lonely").unwrap();

    let output = run(&["-q", root.to_str().unwrap()], dir.path());

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout_of(&output),
        "Matching Files:\n-- Stats --\nNumber of files scanned: 1\nTotal data compared: 0.00MB\n"
    );
}

#[test]
fn test_cli_missing_argument_exits_one() {
    let dir = tempdir().unwrap();

    let output = run(&[], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));
}

#[test]
fn test_cli_extra_argument_exits_one() {
    let dir = tempdir().unwrap();

    let output = run(&["/a", "/b"], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));
}

#[test]
fn test_cli_nonexistent_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");

    let output = run(&[missing.to_str().unwrap()], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Path not found"));
    assert_eq!(
        stdout_of(&output),
        "Matching Files:\n-- Stats --\nNumber of files scanned: 0\nTotal data compared: 0.00MB\n"
    );
}

#[test]
fn test_cli_json_output() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("tree");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("x"), "12345").unwrap();
    fs::write(root.join("y"), "12345").unwrap();

    let output = run(&["--output", "json", root.to_str().unwrap()], dir.path());

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["duplicates"][0]["size"], 5);
    assert_eq!(value["duplicates"][0]["files"].as_array().unwrap().len(), 2);
    assert_eq!(value["summary"]["total_files"], 2);
    assert_eq!(value["summary"]["exit_code_name"], "DF000");
}

#[test]
fn test_cli_invalid_schedule_is_an_error() {
    let dir = tempdir().unwrap();

    let output = run(&["--buffer-schedule", "0", dir.path().to_str().unwrap()], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[DF001] Error:"));
}

#[test]
fn test_cli_help_exits_zero() {
    let dir = tempdir().unwrap();

    let output = run(&["--help"], dir.path());

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output).contains("<ROOT>"));
}
