use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn srcdump(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("srcdump").unwrap();
    cmd.current_dir(cwd);
    cmd
}

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_missing_arguments_print_usage_and_succeed() {
    let workdir = TempDir::new().unwrap();

    srcdump(workdir.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Usage: srcdump <input_folder> <output_file>"))
        .stdout(predicate::str::contains("Example:").count(2));

    srcdump(workdir.path())
        .arg("only-one")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_surplus_arguments_print_usage_and_succeed() {
    let workdir = TempDir::new().unwrap();

    srcdump(workdir.path())
        .args(["a", "b", "c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_missing_input_folder_fails() {
    let workdir = TempDir::new().unwrap();

    srcdump(workdir.path())
        .args(["no-such-dir", "out.txt"])
        .assert()
        .code(1)
        .stdout("Error: Input folder 'no-such-dir' not found.\n");

    assert!(!workdir.path().join("out_1.txt").exists());
}

#[test]
fn test_file_as_input_folder_fails() {
    let workdir = TempDir::new().unwrap();
    write(workdir.path(), "Program.cs", b"class P {}");

    srcdump(workdir.path())
        .args(["Program.cs", "out.txt"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Error: Input folder 'Program.cs' not found."));
}

#[test]
fn test_successive_runs_are_numbered() {
    let workdir = TempDir::new().unwrap();
    write(workdir.path(), "project/App.cs", b"class App {}");

    let first = Path::new("dumps").join("out_1.txt");
    let second = Path::new("dumps").join("out_2.txt");

    srcdump(workdir.path())
        .args(["project", "dumps/out.txt"])
        .assert()
        .success()
        .stdout(format!("Done. Output written to {}\n", first.display()));

    srcdump(workdir.path())
        .args(["project", "dumps/out.txt"])
        .assert()
        .success()
        .stdout(format!("Done. Output written to {}\n", second.display()));

    let first_content = fs::read_to_string(workdir.path().join(&first)).unwrap();
    let second_content = fs::read_to_string(workdir.path().join(&second)).unwrap();
    assert_eq!(first_content, second_content);
}

#[test]
fn test_snapshot_content_end_to_end() {
    let workdir = TempDir::new().unwrap();
    let project = workdir.path().join("project");
    write(&project, "a.cs", b"lower");
    write(&project, "A.CS", b"UPPER");
    write(&project, "b.txt", b"ignored");
    write(&project, "bin/c.cs", b"ignored");
    write(&project, ".hidden/d.cs", b"ignored");
    write(&project, "Views/Broken.xaml", &[0xff, 0xfe, 0xfd]);
    write(&project, "Views/Main.xaml", b"<Window/>");

    srcdump(workdir.path())
        .args(["project", "snap.txt"])
        .assert()
        .success();

    let content = fs::read_to_string(workdir.path().join("snap_1.txt")).unwrap();
    assert_eq!(content.matches(" File: ").count(), 4);
    assert!(!content.contains("ignored"));

    let upper = content.find("File: A.CS ").unwrap();
    let lower = content.find("File: a.cs ").unwrap();
    let broken = content.find("Broken.xaml").unwrap();
    let main = content.find("Main.xaml").unwrap();
    assert!(upper < lower && lower < broken && broken < main);

    assert!(content.contains("Error reading file: "));
    assert!(content.ends_with("<Window/>"));

    let lines: Vec<&str> = content.lines().collect();
    for (index, line) in lines.iter().enumerate() {
        if let Some(rest) = line.strip_prefix("-------------------- File: ") {
            let relative = rest.strip_suffix(" --------------------").unwrap();
            let rule = lines[index + 1];
            assert!(rule.chars().all(|c| c == '-'));
            assert_eq!(rule.chars().count(), 48 + relative.chars().count());
        }
    }
}

#[test]
fn test_dry_run_writes_nothing() {
    let workdir = TempDir::new().unwrap();
    write(workdir.path(), "project/Program.cs", b"class P {}");

    srcdump(workdir.path())
        .args(["project", "dumps/out.txt", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Program.cs"))
        .stdout(predicate::str::contains("out_1.txt"));

    assert!(!workdir.path().join("dumps").exists());
}

#[test]
fn test_json_report() {
    let workdir = TempDir::new().unwrap();
    write(workdir.path(), "project/appsettings.json", b"{\"a\": 1}");

    let output = srcdump(workdir.path())
        .args(["project", "out.txt", "--output-format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["output_path"], "out_1.txt");
    assert_eq!(report["summary"]["files_written"], 1);
    assert_eq!(report["files"][0]["relative_path"], "appsettings.json");
}

#[test]
fn test_extension_override_and_config_file() {
    let workdir = TempDir::new().unwrap();
    write(workdir.path(), "project/main.rs", b"fn main() {}");
    write(workdir.path(), "project/Program.cs", b"class P {}");
    write(workdir.path(), "project/target/gen.rs", b"generated");

    srcdump(workdir.path())
        .args(["project", "rs.txt", "--extensions", "rs", "--exclude", "target"])
        .assert()
        .success();

    let content = fs::read_to_string(workdir.path().join("rs_1.txt")).unwrap();
    assert!(content.contains("fn main() {}"));
    assert!(!content.contains("class P"));
    assert!(!content.contains("generated"));

    write(
        workdir.path(),
        "srcdump.toml",
        b"[filters]\nextensions = [\".cs\"]\n",
    );

    srcdump(workdir.path())
        .args(["project", "cs.txt"])
        .assert()
        .success();

    let content = fs::read_to_string(workdir.path().join("cs_1.txt")).unwrap();
    assert!(content.contains("class P"));
    assert!(!content.contains("fn main"));
}

#[test]
fn test_invalid_config_fails() {
    let workdir = TempDir::new().unwrap();
    write(workdir.path(), "project/Program.cs", b"class P {}");
    write(workdir.path(), "bad.toml", b"[filters]\nextensions = [\"cs\"]\n");

    srcdump(workdir.path())
        .args(["project", "out.txt", "--config", "bad.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must start with a dot"));
}

#[test]
fn test_generate_config() {
    let workdir = TempDir::new().unwrap();

    srcdump(workdir.path())
        .arg("--generate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("srcdump.toml"));

    let content = fs::read_to_string(workdir.path().join("srcdump.toml")).unwrap();
    assert!(content.contains("[traversal]"));
}

#[test]
fn test_help_succeeds() {
    let workdir = TempDir::new().unwrap();

    srcdump(workdir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("numbered"));
}
