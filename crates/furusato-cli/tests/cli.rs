use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const CERTIFICATE: &str = "寄附金受領証明書\n\
    東京都渋谷区神南一丁目\n\
    寄附者住所 岡山県倉敷市西中新田\n\
    寄附日 令和5年4月10日\n\
    受領日 令和5年3月1日\n\
    寄附金額 ￥12,345円\n";

fn write_config(dir: &Path, json: &str) -> String {
    let path = dir.join("config.json");
    fs::write(&path, json).unwrap();
    path.to_str().unwrap().to_string()
}

fn furusato() -> Command {
    Command::cargo_bin("furusato").unwrap()
}

#[test]
fn extract_writes_one_row_per_page() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    fs::create_dir(&input).unwrap();
    fs::write(
        input.join("a.txt"),
        format!("{}\x0c\x0c大阪府大阪市 金額 7,000円\x0c", CERTIFICATE),
    )
    .unwrap();
    fs::write(input.join("notes.docx"), "ignored").unwrap();

    let config = write_config(dir.path(), "{}");
    let output = dir.path().join("out").join("result.csv");

    furusato()
        .args(["-c", &config, "extract"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 1 documents (3 pages)"));

    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"\xef\xbb\xbf"));
    let csv = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert_eq!(
        csv,
        "ファイル名,ページ数,市区町村名,日付,金額\n\
         a.txt,1,倉敷市,2023/03/01,12345\n\
         a.txt,2,,,\n\
         a.txt,3,大阪市,,7000\n"
    );
}

#[test]
fn extract_can_skip_blank_pages_without_bom() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("a.txt"), "\x0c令和6年1月5日").unwrap();

    let config = write_config(
        dir.path(),
        r#"{"extraction": {"emit_blank_pages": false}, "output": {"write_bom": false}}"#,
    );
    let output = dir.path().join("out.csv");

    furusato()
        .args(["-c", &config, "extract"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let csv = fs::read_to_string(&output).unwrap();
    assert_eq!(csv, "ファイル名,ページ数,市区町村名,日付,金額\na.txt,2,,2024/01/05,\n");
}

#[test]
fn extract_with_no_documents_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "{}");

    furusato()
        .args(["-c", &config, "extract"])
        .arg(dir.path().join("empty"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No supported documents"));
}

#[test]
fn page_prints_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scan.txt");
    fs::write(&input, CERTIFICATE).unwrap();
    let config = write_config(dir.path(), "{}");

    furusato()
        .args(["-c", &config, "page"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"municipality\": \"倉敷市\""))
        .stdout(predicate::str::contains("\"date\": \"2023/03/01\""))
        .stdout(predicate::str::contains("\"amount\": \"12345\""));
}

#[test]
fn page_rejects_out_of_range_page() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scan.txt");
    fs::write(&input, CERTIFICATE).unwrap();
    let config = write_config(dir.path(), "{}");

    furusato()
        .args(["-c", &config, "page", "-p", "2", "-f", "text"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn page_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "{}");

    furusato()
        .args(["-c", &config, "page"])
        .arg(dir.path().join("missing.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}
