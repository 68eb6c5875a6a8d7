use std::fs;
use std::process::Command;
use tempfile::TempDir;
use tsheet_cli::parse_language;

fn tsheet_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("tsheet"))
}

const EN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="en_US">
<context>
    <name>Dialog</name>
    <message>
        <source>Cancel</source>
        <translation>Cancel</translation>
    </message>
</context>
</TS>
"#;

const JA: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="ja_JP">
<context>
    <name>Dialog</name>
    <message>
        <source>Cancel</source>
        <translation type="unfinished"></translation>
    </message>
</context>
</TS>
"#;

#[test]
fn test_parse_language() {
    assert_eq!(parse_language("ja_JP").unwrap().as_str(), "ja_JP");
    let err = parse_language("fr_FR").unwrap_err();
    assert!(err.contains("fr_FR"));
    assert!(err.contains("zh_CN, en_US, ja_JP, ko_KR"));
}

#[test]
fn test_export_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = tsheet_cmd()
        .args(["export", "-i"])
        .arg(temp_dir.path().join("missing"))
        .arg("-o")
        .arg(temp_dir.path().join("out.xlsx"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
    assert!(!temp_dir.path().join("out.xlsx").exists());
}

#[test]
fn test_import_missing_table_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = tsheet_cmd()
        .args(["import", "-i"])
        .arg(temp_dir.path().join("missing.xlsx"))
        .arg("-o")
        .arg(temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_unknown_language_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let output = tsheet_cmd()
        .args(["export", "-i"])
        .arg(temp_dir.path())
        .args(["--lang", "fr_FR"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("fr_FR"));
}

#[test]
fn test_export_then_import_csv() {
    let docs = TempDir::new().unwrap();
    fs::write(docs.path().join("app_en_US.ts"), EN).unwrap();
    fs::write(docs.path().join("app_ja_JP.ts"), JA).unwrap();
    let out = TempDir::new().unwrap();
    let table = out.path().join("strings.csv");

    let output = tsheet_cmd()
        .args(["export", "-i"])
        .arg(docs.path())
        .arg("-o")
        .arg(&table)
        .output()
        .expect("Failed to execute command");
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let exported = fs::read_to_string(&table).unwrap();
    assert!(exported.starts_with("ClassName,Source,Comment,zh_CN,en_US,ja_JP,ko_KR"));
    assert!(exported.contains("Dialog,Cancel,,,Cancel,,"));

    fs::write(&table, exported.replace("Dialog,Cancel,,,Cancel,,", "Dialog,Cancel,,,Cancel,キャンセル,")).unwrap();

    let output = tsheet_cmd()
        .args(["import", "-i"])
        .arg(&table)
        .arg("-o")
        .arg(docs.path())
        .output()
        .expect("Failed to execute command");
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let ja = fs::read_to_string(docs.path().join("app_ja_JP.ts")).unwrap();
    assert!(ja.contains("<translation>キャンセル</translation>"));
    assert_eq!(fs::read_to_string(docs.path().join("app_en_US.ts")).unwrap(), EN);
}

#[test]
fn test_export_never_overwrites_existing_table() {
    let docs = TempDir::new().unwrap();
    fs::write(docs.path().join("app_en_US.ts"), EN).unwrap();
    let out = TempDir::new().unwrap();
    let table = out.path().join("strings.csv");
    fs::write(&table, "keep me").unwrap();

    let output = tsheet_cmd()
        .args(["export", "-i"])
        .arg(docs.path())
        .arg("-o")
        .arg(&table)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    assert_eq!(fs::read_to_string(&table).unwrap(), "keep me");
    assert!(out.path().join("strings-1.csv").exists());
}

#[test]
fn test_export_reports_broken_document() {
    let docs = TempDir::new().unwrap();
    fs::write(docs.path().join("app_en_US.ts"), EN).unwrap();
    fs::write(docs.path().join("broken.ts"), "<TS version=\"2.1\"></TS>").unwrap();
    let out = TempDir::new().unwrap();
    let table = out.path().join("strings.csv");

    let output = tsheet_cmd()
        .args(["export", "-i"])
        .arg(docs.path())
        .arg("-o")
        .arg(&table)
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("broken.ts"));
    assert!(table.exists());
}
