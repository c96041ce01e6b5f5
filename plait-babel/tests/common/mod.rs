//! Flattening engine tests: path=value text to tree and back.

use plait_babel::common::{build_tree, flatten, from_path_value_string, parse_path_values};
use plait_babel::{ConvertOptions, DuplicatePathPolicy, FormatError, IndexMode, Node, Path};

fn options() -> ConvertOptions {
    ConvertOptions::default()
}

fn path(s: &str) -> Path {
    Path::from(s)
}

#[test]
fn nested_paths_build_interior_nodes() {
    let tree = from_path_value_string("x/a=1,x/b=2,y=3", &options()).unwrap();
    assert_eq!(tree.get(&path("x/a")), Some(&Node::leaf("1")));
    assert_eq!(tree.get(&path("x/b")), Some(&Node::leaf("2")));
    assert_eq!(tree.get(&path("y")), Some(&Node::leaf("3")));
}

#[test]
fn bracketed_and_plain_indices_are_the_same() {
    let bracketed = from_path_value_string("y[0]/x=a,y[1]/x=b", &options()).unwrap();
    let plain = from_path_value_string("y/0/x=a,y/1/x=b", &options()).unwrap();
    assert_eq!(bracketed, plain);
    assert_eq!(bracketed.children().unwrap()["y"].len(), 2);
}

#[test]
fn index_past_the_end_is_a_bad_path() {
    let err = from_path_value_string("y[0]=a,y[2]=c", &options()).unwrap_err();
    assert!(matches!(err, FormatError::BadPath(_)));
}

#[test]
fn descending_through_a_value_is_a_bad_path() {
    let err = from_path_value_string("a=1,a/b=2", &options()).unwrap_err();
    assert!(matches!(err, FormatError::BadPath(_)));
}

#[test]
fn empty_value_can_grow_children() {
    let tree = from_path_value_string("a=,a/b=2", &options()).unwrap();
    assert_eq!(tree.get(&path("a/b")), Some(&Node::leaf("2")));
}

#[test]
fn brace_groups_prefix_their_pairs() {
    let pairs = parse_path_values("x={a=1,b={c=2}},y=3", &options()).unwrap();
    let rendered: Vec<String> = pairs.iter().map(|p| p.render(&options())).collect();
    assert_eq!(rendered, vec!["x/a=1", "x/b/c=2", "y=3"]);
}

#[test]
fn quoted_values_keep_delimiters() {
    let tree = from_path_value_string(r#"a="1,2",b="say \"hi\"""#, &options()).unwrap();
    assert_eq!(tree.get(&path("a")), Some(&Node::leaf("1,2")));
    assert_eq!(tree.get(&path("b")), Some(&Node::leaf("say \"hi\"")));
}

#[test]
fn unterminated_quote_is_a_parse_error() {
    let err = from_path_value_string(r#"a="open"#, &options()).unwrap_err();
    assert!(matches!(err, FormatError::ParseError(_)));
}

#[test]
fn allow_lets_the_later_value_win() {
    let pairs = parse_path_values("a=1,b=2,a=3", &options()).unwrap();
    let tree = build_tree(pairs, DuplicatePathPolicy::Allow).unwrap();
    let names: Vec<_> = tree.children().unwrap().keys().cloned().collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(tree.get(&path("a")), Some(&Node::leaf("3")));
}

#[test]
fn take_last_keeps_the_first_position_with_the_last_value() {
    let pairs = parse_path_values("a=1,b=2,a=3", &options()).unwrap();
    let tree = build_tree(pairs, DuplicatePathPolicy::TakeLast).unwrap();
    let names: Vec<_> = tree.children().unwrap().keys().cloned().collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(tree.get(&path("a")), Some(&Node::leaf("3")));
}

#[test]
fn take_last_with_indices_matches_allow() {
    let text = "y[0]/x=a,y[1]/x=b,y[0]/x=c,y[1]/x=d";
    let take_last = build_tree(
        parse_path_values(text, &options()).unwrap(),
        DuplicatePathPolicy::TakeLast,
    )
    .unwrap();
    let allow = from_path_value_string(text, &options()).unwrap();
    assert_eq!(take_last, allow);
    assert_eq!(take_last.get(&path("y[1]/x")), Some(&Node::leaf("d")));
}

#[test]
fn empty_subtrees_survive_the_round_trip() {
    let tree = Node::new()
        .with_child("a", Node::new())
        .with_child("b", Node::leaf("1"))
        .with_child("c", Node::new().with_child("d", Node::new()));
    let pairs = flatten(&tree);
    let rendered: Vec<String> = pairs.iter().map(|p| p.render(&options())).collect();
    assert_eq!(rendered, vec!["a=", "b=1", "c/d="]);
    assert_eq!(build_tree(pairs, DuplicatePathPolicy::Reject).unwrap(), tree);
}

#[test]
fn reject_names_the_repeated_path() {
    let pairs = parse_path_values("x/a=1,x/b=2,x/a=3", &options()).unwrap();
    match build_tree(pairs, DuplicatePathPolicy::Reject) {
        Err(FormatError::DuplicatePath(p)) => assert_eq!(p, path("x/a")),
        other => panic!("expected a duplicate path error, got {other:?}"),
    }
}

#[test]
fn flatten_marks_only_real_arrays() {
    let tree = from_path_value_string("y[0]/x=a,y[1]/x=b,z/x=c", &options()).unwrap();
    let with_brackets = options().with_index_mode(IndexMode::WithBrackets);
    let without = options().with_index_mode(IndexMode::WithoutBrackets);
    let disabled = options();

    let render = |o: &ConvertOptions| -> Vec<String> {
        flatten(&tree).iter().map(|p| p.render(o)).collect()
    };
    assert_eq!(render(&with_brackets), vec!["y[0]/x=a", "y[1]/x=b", "z/x=c"]);
    assert_eq!(render(&without), vec!["y/0/x=a", "y/1/x=b", "z/x=c"]);
    assert_eq!(render(&disabled), vec!["y/x=a", "y/x=b", "z/x=c"]);
}

#[test]
fn custom_equal_sign_and_delimiter() {
    let o = options().with_equal_sign(':').with_delimiter(';');
    let tree = from_path_value_string("a/b:1;c:x=y", &o).unwrap();
    assert_eq!(tree.get(&path("a/b")), Some(&Node::leaf("1")));
    assert_eq!(tree.get(&path("c")), Some(&Node::leaf("x=y")));
}
