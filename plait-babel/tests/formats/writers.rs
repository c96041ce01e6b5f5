//! Snapshots of multi-line writer output

use insta::assert_snapshot;
use plait_babel::{ConvertOptions, FormatRegistry};

fn render(source: &str, from: &str, to: &str) -> String {
    let registry = FormatRegistry::default();
    let options = ConvertOptions::default();
    let tree = registry.parse(source, from, &options).expect("should parse");
    registry.serialize(&tree, to, &options).expect("should serialize")
}

const SAMPLE: &str = r#"server={host=localhost,port=8080,alias=a,alias=b},name="two words""#;

#[test]
fn name_value_indented() {
    assert_snapshot!(render(SAMPLE, "name-value", "name-value"), @r#"
    server={
        host=localhost,
        port=8080,
        alias=a,
        alias=b
    },
    name="two words"
    "#);
}

#[test]
fn json_pretty() {
    assert_snapshot!(render(SAMPLE, "name-value", "json"), @r#"
    {
      "server": {
        "host": "localhost",
        "port": "8080",
        "alias": [
          "a",
          "b"
        ]
      },
      "name": "two words"
    }
    "#);
}

#[test]
fn info_blocks() {
    assert_snapshot!(render(SAMPLE, "name-value", "info"), @r#"
    server
    {
        host localhost
        port 8080
        alias a
        alias b
    }
    name "two words"
    "#);
}
