use std::io::Write;

use assert_cmd::Command;
use flate2::write::GzEncoder;
use flate2::Compression;
use predicates::prelude::*;
use srcfacts::report::group_thousands;

const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<unit xmlns="http://www.srcML.org/srcML/src" revision="1.0.0" language="C++" url="demo" filename="a.cpp"><function><type><name>int</name></type> <name>main</name><parameter_list>()</parameter_list> <block>{<block_content>
    <decl_stmt><decl><type><name>int</name></type> <name>x</name> <init>= <expr><literal type="number">1</literal></expr></init></decl>;</decl_stmt>
    <return>return <expr><name>x</name> <operator>&lt;</operator> <literal type="number">2</literal></expr>;</return>
</block_content>}</block></function>
</unit>
"#;

fn srcfacts() -> Command {
    Command::new(env!("CARGO_BIN_EXE_srcfacts"))
}

#[test]
fn shows_help() {
    srcfacts()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("srcML"));
}

#[test]
fn reports_metrics_from_stdin() {
    srcfacts()
        .write_stdin(DOCUMENT)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# srcfacts: demo\n"))
        .stdout(predicate::str::contains("| Measure      | Value |"))
        .stdout(predicate::str::contains("| LOC          |     4 |"))
        .stdout(predicate::str::contains("| Files        |     1 |"))
        .stdout(predicate::str::contains("| Functions    |     1 |"))
        .stdout(predicate::str::contains("| Declarations |     1 |"))
        .stdout(predicate::str::contains("| Expressions  |     2 |"))
        .stderr(predicate::str::contains(" bytes\n"))
        .stderr(predicate::str::contains("MLOC/sec"));
}

#[test]
fn quiet_suppresses_diagnostics() {
    srcfacts()
        .arg("-q")
        .write_stdin(DOCUMENT)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn reads_file_argument() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.xml");
    std::fs::write(&path, DOCUMENT).unwrap();

    srcfacts()
        .arg(&path)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("| Functions    |     1 |"));
}

#[test]
fn reads_gzip_input() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(DOCUMENT.as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    srcfacts()
        .write_stdin(compressed)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# srcfacts: demo\n"))
        .stderr(predicate::str::contains(format!(
            "{} bytes",
            group_thousands(DOCUMENT.len() as u64)
        )));
}

#[test]
fn small_window_gives_same_report() {
    let default = srcfacts().arg("-q").write_stdin(DOCUMENT).output().unwrap();
    srcfacts()
        .args(["-q", "--block-size", "128", "--buffer-size", "512"])
        .write_stdin(DOCUMENT)
        .assert()
        .success()
        .stdout(default.stdout);
}

#[test]
fn missing_file_is_input_error() {
    srcfacts()
        .arg("does/not/exist.xml")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("input error"));
}

#[test]
fn rejects_bad_geometry() {
    srcfacts()
        .args(["--block-size", "64", "--buffer-size", "100"])
        .write_stdin(DOCUMENT)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"));
}

fn assert_parse_error(input: &str, message: &str) {
    srcfacts()
        .write_stdin(input)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("parser error"))
        .stderr(predicate::str::contains(message));
}

#[test]
fn rejects_empty_input() {
    assert_parse_error("", "empty input");
}

#[test]
fn rejects_unterminated_comment() {
    assert_parse_error("<unit><!-- never closed</unit>", "unterminated XML comment");
}

#[test]
fn rejects_attribute_without_closing_delimiter() {
    assert_parse_error("<unit url=\"demo></unit>", "attribute url missing delimiter");
}

#[test]
fn rejects_unterminated_cdata() {
    assert_parse_error("<unit><![CDATA[int x;</unit>", "unterminated CDATA");
}

#[test]
fn rejects_unterminated_doctype() {
    assert_parse_error("<!DOCTYPE unit [<!ELEMENT unit ANY>\n<unit/>", "unterminated DOCTYPE");
}

#[test]
fn rejects_empty_end_tag_name() {
    assert_parse_error("<unit></>", "invalid end tag name");
}

#[test]
fn rejects_extra_content() {
    assert_parse_error("<unit/><unit/>", "extra content at end of document");
}

#[test]
fn accepts_truncated_document() {
    srcfacts()
        .arg("-q")
        .write_stdin("<unit url=\"cut\"><expr>x\n</expr>")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# srcfacts: cut\n"))
        .stdout(predicate::str::contains("| LOC          |     1 |"))
        .stdout(predicate::str::contains("| Expressions  |     1 |"));
}

#[test]
fn rejects_block_below_lookahead() {
    srcfacts()
        .args(["--block-size", "4", "--buffer-size", "8"])
        .write_stdin(DOCUMENT)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"))
        .stderr(predicate::str::contains("minimum of 16"));
}
