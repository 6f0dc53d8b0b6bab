use assert_cmd::Command;
use predicates::prelude::*;

const CATALOG: &str = r#"<?xml ver="1"?><root><item id="1">hi</item><item id="2">bye</item><misc/></root>"#;

fn zxml() -> Command {
    Command::cargo_bin("zxml").unwrap_or_else(|err| panic!("binary not built: {err}"))
}

#[test]
fn fmt_from_stdin() {
    zxml()
        .arg("fmt")
        .write_stdin(CATALOG)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml ver=\"1\"?>\n<root>\n    <item id=\"1\">\n"))
        .stdout(predicate::str::contains("    <misc/>\n"));
}

#[test]
fn fmt_file_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("in.xml");
    let output = dir.path().join("out.xml");
    std::fs::write(&input, "<a><b>text</b></a>")?;

    zxml()
        .arg("fmt")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let written = std::fs::read_to_string(&output)?;
    assert_eq!(written, "<a>\n    <b>\n        text\n    </b>\n</a>\n");
    Ok(())
}

#[test]
fn fmt_reports_syntax_error_position() {
    zxml()
        .arg("fmt")
        .write_stdin("<a><b></a>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line 1 Coll 10"));
}

#[test]
fn find_by_attribute() {
    zxml()
        .args(["find", "--attr", "id=2"])
        .write_stdin(CATALOG)
        .assert()
        .success()
        .stdout("<item id=\"2\">\n    bye\n</item>\n");
}

#[test]
fn find_by_name_shallow() {
    zxml()
        .args(["find", "--name", "x", "--shallow"])
        .write_stdin("<r><x/><y><x/></y></r>")
        .assert()
        .success()
        .stdout("<x/>\n");
}

#[test]
fn find_without_matches_fails() {
    zxml()
        .args(["find", "--name", "nothing"])
        .write_stdin(CATALOG)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no matching nodes"));
}

#[test]
fn find_rejects_bad_attr() {
    zxml()
        .args(["find", "--attr", "novalue"])
        .write_stdin(CATALOG)
        .assert()
        .failure();
}

#[test]
fn stats_lists_groups() {
    zxml()
        .arg("stats")
        .write_stdin(CATALOG)
        .assert()
        .success()
        .stdout("root: root\nitem: 2\nmisc: 1\n");
}

#[test]
fn depth_limit_flag() {
    zxml()
        .args(["stats", "--max-depth", "1"])
        .write_stdin("<a><b/></a>")
        .assert()
        .failure();
}

#[test]
fn missing_input_file() {
    zxml()
        .args(["fmt", "does/not/exist.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}
