use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn sorts_single_numeric_field() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["sort", "--fields=a"]).write_stdin("2\n1\n3\n");
    cmd.assert().success().stdout("1\n2\n3\n");
}

#[test]
fn order_changes_key_priority() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["sort", "--fields=a,b", "--order=b,a"])
        .write_stdin("2,3\n3,1\n1,1\n2,2\n1,3\n");
    cmd.assert()
        .success()
        .stdout("1,1\n3,1\n2,2\n1,3\n2,3\n");
}

#[test]
fn empty_field_names_are_skipped() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["sort", "--fields=,b"]).write_stdin("2,3\n1,1\n3,2\n");
    cmd.assert().success().stdout("1,1\n3,2\n2,3\n");
}

#[test]
fn reverse_and_string_keys() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["sort", "-f", "name", "-s", "-r"])
        .write_stdin("b\na\n10\n9\n");
    cmd.assert().success().stdout("b\na\n9\n10\n");
}

#[test]
fn custom_delimiter_is_kept_in_output() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["sort", "-f", ",k", "-d", ";"])
        .write_stdin("x;2\ny;1\n");
    cmd.assert().success().stdout("y;1\nx;2\n");
}

#[test]
fn binary_records_keep_their_bytes() {
    let mut input = Vec::new();
    for (id, key) in [(1u32, 3.0f64), (2, 1.0), (3, 2.0)] {
        input.extend_from_slice(&id.to_le_bytes());
        input.extend_from_slice(&key.to_le_bytes());
    }
    let mut expected = Vec::new();
    for (id, key) in [(2u32, 1.0f64), (3, 2.0), (1, 3.0)] {
        expected.extend_from_slice(&id.to_le_bytes());
        expected.extend_from_slice(&key.to_le_bytes());
    }

    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["sort", "--fields=,k", "--binary=ui,d"])
        .write_stdin(input);
    cmd.assert().success().stdout(expected);
}

#[test]
fn unknown_order_field_fails() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["sort", "--fields=a", "--order=c"]).write_stdin("1\n");
    cmd.assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::starts_with(
            "plait sort: order field name \"c\" not found",
        ));
}

#[test]
fn bad_layout_fails() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["sort", "--fields=a", "--binary=q"]).write_stdin("");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid binary layout \"q\""));
}

#[test]
fn non_numeric_key_fails() {
    let mut cmd = cargo_bin_cmd!("plait");
    cmd.args(["sort", "--fields=a"]).write_stdin("1\nx\n");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("record 2"));
}
