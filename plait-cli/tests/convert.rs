use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn json_to_path_value() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["convert", "--from", "json", "--to", "path-value"])
        .write_stdin(r#"{"x":{"a":"1","b":"2"}}"#);
    cmd.assert().success().stdout("x/a=1\nx/b=2\n");
}

#[test]
fn indices_follow_flags() {
    let input = r#"{"y":[{"x":"a"},{"x":"b"}]}"#;

    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["convert", "--from", "json", "--to", "path-value", "--indices"])
        .write_stdin(input);
    cmd.assert().success().stdout("y[0]/x=a\ny[1]/x=b\n");

    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args([
        "convert",
        "--from",
        "json",
        "--to",
        "path-value",
        "--show-path-indices",
        "--no-brackets",
    ])
    .write_stdin(input);
    cmd.assert().success().stdout("y/0/x=a\ny/1/x=b\n");
}

#[test]
fn linewise_writes_one_line_per_record() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["convert", "--from", "path-value", "--to", "name-value", "-l"])
        .write_stdin("x/a=1,y=2\nz=3\n");
    cmd.assert().success().stdout("x={a=1},y=2\nz=3\n");
}

#[test]
fn default_output_is_name_value() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["convert", "--from", "path-value"])
        .write_stdin("x/a=1\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("x={").and(predicate::str::contains("a=1")));
}

#[test]
fn take_last_keeps_the_last_value() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["convert", "--from", "path-value", "--to", "json", "--take-last"])
        .write_stdin("a=1\nb=2\na=3\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""a": "3""#).and(predicate::str::contains(r#""1""#).not()));
}

#[test]
fn take_last_keeps_array_appends_in_order() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["convert", "--from", "path-value", "--to", "json", "--take-last"])
        .write_stdin("y[0]=a\ny[1]=b\ny[0]=c\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::is_match(r#""y": \[\s*"c",\s*"b"\s*\]"#).unwrap());
}

#[test]
fn names_with_separators_are_quoted() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["convert", "--from", "json", "--to", "path-value"])
        .write_stdin(r#"{"a/b":"1","c=d":"2","e":{}}"#);
    cmd.assert()
        .success()
        .stdout("\"a/b\"=1\n\"c=d\"=2\ne=\n");
}

#[test]
fn verify_unique_rejects_repeated_paths() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args([
        "convert",
        "--from",
        "path-value",
        "--to",
        "json",
        "--take-last",
        "--unique-input",
    ])
    .write_stdin("a=1\na=2\n");
    cmd.assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::starts_with("plait convert: "));
}

#[test]
fn unknown_format_fails_before_reading() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["convert", "--from", "yaml", "--to", "json"])
        .write_stdin("a: 1\n");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("plait convert: Format 'yaml' not found"));
}

#[test]
fn parse_errors_carry_a_category() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["convert", "--from", "json", "--to", "xml"])
        .write_stdin("{");
    cmd.assert()
        .failure()
        .stderr(predicate::str::starts_with("plait convert: parsing error: "));
}

#[test]
fn list_formats() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.arg("--list-formats");
    cmd.assert().success().stdout(
        predicate::str::contains("path-value")
            .and(predicate::str::contains("json"))
            .and(predicate::str::contains("info")),
    );
}
