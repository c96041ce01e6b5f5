//! Cross-format conversions (text → tree → text)

use plait_babel::{ConvertOptions, FormatRegistry, IndexMode, Node, Path};

fn convert(source: &str, from: &str, to: &str, options: &ConvertOptions) -> String {
    let registry = FormatRegistry::default();
    let tree = registry.parse(source, from, options).expect("should parse");
    registry.serialize(&tree, to, options).expect("should serialize")
}

#[test]
fn json_to_path_value_with_arrays() {
    let options = ConvertOptions::default()
        .with_delimiter('\n')
        .with_index_mode(IndexMode::WithBrackets);
    let out = convert(
        r#"{"y":[{"x":"a"},{"x":"b"}],"z":{"w":"1"}}"#,
        "json",
        "path-value",
        &options,
    );
    assert_eq!(out, "y[0]/x=a\ny[1]/x=b\nz/w=1\n");
}

#[test]
fn path_value_to_json_and_back() {
    let options = ConvertOptions::default().with_delimiter('\n');
    let source = "server/host=localhost\nserver/port=8080\nname=demo\n";
    let json = convert(source, "path-value", "json", &options);
    let back = convert(&json, "json", "path-value", &options);
    assert_eq!(back, source);
}

#[test]
fn xml_to_name_value() {
    let options = ConvertOptions::default().with_linewise(true);
    let out = convert(
        r#"<config version="2"><name>demo</name></config>"#,
        "xml",
        "name-value",
        &options,
    );
    assert_eq!(out, "config={<xmlattr>={version=2},name=demo}");
}

#[test]
fn name_value_to_xml() {
    let options = ConvertOptions::default();
    let out = convert("r={a=1,a=2,b=x&y}", "name-value", "xml", &options);
    assert_eq!(
        out,
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<r><a>1</a><a>2</a><b>x&amp;y</b></r>\n"
    );
}

#[test]
fn ini_to_info_and_back() {
    let options = ConvertOptions::default();
    let ini = "title=demo\n[server]\nhost=localhost\nport=8080\n";
    let info = convert(ini, "ini", "info", &options);
    assert_eq!(convert(&info, "info", "ini", &options), ini);
}

#[test]
fn whole_stream_path_value_ignores_comments() {
    let options = ConvertOptions::default().with_delimiter('\n');
    let registry = FormatRegistry::default();
    let tree = registry
        .parse("# header\n\na/b=1\n# a=2\n", "path-value", &options)
        .unwrap();
    assert_eq!(tree.get(&Path::from("a/b")), Some(&Node::leaf("1")));
    assert_eq!(tree.children().unwrap().len(), 1);
}

#[test]
fn unknown_format_is_reported_by_name() {
    let registry = FormatRegistry::default();
    let err = registry
        .parse("a=1", "yaml", &ConvertOptions::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "Format 'yaml' not found");
}
