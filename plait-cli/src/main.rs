// Command-line interface for plait
//
// plait bundles three stream filters that read stdin and write stdout:
//
//  plait sort --fields <names> [--order <names>] [--string] [--reverse] [--binary <layout>]
//      Grouping multi-key sort of delimited or fixed-layout records.
//  plait convert --from <format> [--to <format>] [--linewise]
//      Convert between tree formats (ini, info, json, xml, name-value, path-value).
//  plait get <paths>... [--from <format>] [--to <format>] [--regex]
//      Print the values found at x-paths or regex-matched paths.
//  plait --list-formats
//      List the tree formats known to the registry.
//
// Settings are layered: built-in defaults, then ./plait.toml when present, then the file
// passed with --config, then the flags below. Errors are printed as
// "plait <command>: [<category>: ]<message>" and exit with status 1.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use plait_babel::{
    for_each_line, Converter, ConvertOptions, DuplicatePathPolicy, FormatError, FormatRegistry,
    IndexMode, Query, Selector,
};
use plait_config::{ConvertConfig, Loader, PlaitConfig, PROJECT_CONFIG};
use plait_sort::{split_names, Layout, SortError, SortOptions};
use std::io::{self, BufWriter, Read, Write};
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// A failed command, printed as `plait <command>: <prefix><message>`
#[derive(Debug)]
struct CliError {
    prefix: &'static str,
    message: String,
}

impl CliError {
    fn generic(message: impl Into<String>) -> Self {
        CliError {
            prefix: "",
            message: message.into(),
        }
    }
}

impl From<FormatError> for CliError {
    fn from(err: FormatError) -> Self {
        CliError {
            prefix: err.category().prefix(),
            message: err.to_string(),
        }
    }
}

impl From<SortError> for CliError {
    fn from(err: SortError) -> Self {
        CliError::generic(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::generic(err.to_string())
    }
}

fn delimiter_arg() -> Arg {
    Arg::new("delimiter")
        .long("delimiter")
        .short('d')
        .value_name("CHAR")
        .help("Field delimiter; a single character, \\n or \\t")
        .value_parser(parse_char)
}

fn format_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("FORMAT")
        .help(help)
        .value_hint(ValueHint::Other)
}

/// Options shared by `convert` and `get`
fn tree_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("equal-sign")
            .long("equal-sign")
            .short('e')
            .value_name("CHAR")
            .help("Separator between path or name and value (default '=')")
            .value_parser(parse_char),
    )
    .arg(delimiter_arg())
    .arg(
        Arg::new("no-brackets")
            .long("no-brackets")
            .help("Write array indices as path elements, e.g. y/0/x instead of y[0]/x")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("take-last")
            .long("take-last")
            .help("If paths are repeated, keep only the last path=value")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("verify-unique")
            .long("verify-unique")
            .visible_alias("unique-input")
            .help("Fail on repeated input paths (takes precedence over --take-last)")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("linewise")
            .long("linewise")
            .short('l')
            .help("Treat each input line as an independent record")
            .action(ArgAction::SetTrue),
    )
}

fn build_cli() -> Command {
    Command::new("plait")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Stream filters for sorting records and converting tree formats")
        .long_about(
            "plait reads records on stdin and writes the result on stdout.\n\n\
            Commands:\n  \
            - sort:    grouping multi-key sort of delimited or binary records\n  \
            - convert: convert between ini, info, json, xml, name-value and path-value\n  \
            - get:     print the values found at the given paths\n\n\
            Settings come from ./plait.toml (if present) and --config, flags win.\n\n\
            Examples:\n  \
            echo -e \"2,3\\n3,1\\n1,1\" | plait sort --fields=a,b --order=b,a\n  \
            cat config.json | plait convert --from json --to path-value\n  \
            cat config.json | plait get x/y[0]/z",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available tree formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a plait.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log run summaries to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("sort")
                .about("Sort records by key fields")
                .long_about(
                    "Read all records, group them by the values of the key fields and write\n\
                    the groups in ascending key order. Records with equal keys keep their\n\
                    input order; --reverse reverses the order of the groups only.\n\n\
                    Examples:\n  \
                    echo -e \"2\\n1\\n3\" | plait sort --fields=a\n  \
                    echo -e \"2,3\\n1,1\\n3,2\" | plait sort --fields=,b\n  \
                    cat data.bin | plait sort --fields=t,,id --binary=d,d,ui",
                )
                .arg(
                    Arg::new("fields")
                        .long("fields")
                        .short('f')
                        .value_name("NAMES")
                        .help("Comma-separated input field names; empty names are skipped")
                        .required(true),
                )
                .arg(
                    Arg::new("order")
                        .long("order")
                        .value_name("NAMES")
                        .help("Key fields in sort priority (default: the named input fields)"),
                )
                .arg(
                    Arg::new("string")
                        .long("string")
                        .short('s')
                        .help("Compare keys as strings instead of numbers")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("reverse")
                        .long("reverse")
                        .short('r')
                        .help("Emit groups from the largest key down")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("binary")
                        .long("binary")
                        .short('b')
                        .value_name("LAYOUT")
                        .help("Fixed-size binary records, e.g. 3d,ui,s[8]"),
                )
                .arg(delimiter_arg())
                .arg(
                    Arg::new("flush")
                        .long("flush")
                        .help("Flush the output after every record")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(tree_args(
            Command::new("convert")
                .about("Convert between tree formats")
                .long_about(
                    "Convert a tree from one format into another.\n\n\
                    Formats: info, ini, json, xml, name-value, path-value\n\n\
                    The delimiter defaults to a newline when either side is path-value and\n\
                    the input is read as a whole, and to a comma otherwise.\n\n\
                    Examples:\n  \
                    cat a.json | plait convert --from json --to path-value\n  \
                    echo 'x={a=1,b=2}' | plait convert --from name-value --to json\n  \
                    cat lines.pv | plait convert --from path-value --to json --linewise",
                )
                .arg(format_arg("from", "Input format"))
                .arg(format_arg("to", "Output format (default: name-value)"))
                .arg(
                    Arg::new("indices")
                        .long("show-path-indices")
                        .visible_alias("indices")
                        .help("Show indices of array items, e.g. y[0]/x")
                        .action(ArgAction::SetTrue),
                ),
        ))
        .subcommand(tree_args(
            Command::new("get")
                .about("Print values at the given paths")
                .long_about(
                    "Parse a tree and print what is found at each path.\n\n\
                    A path without any of the characters .{}()\\*+?|^$ is an x-path such as\n\
                    command/type or y[0]/x; anything else is a regular expression matched\n\
                    against whole paths. Use --regex to treat [] as regex characters too.\n\n\
                    A non-empty value is printed on its own line; subtrees are written in\n\
                    the --to format. Missing x-paths print nothing.\n\n\
                    Examples:\n  \
                    cat a.json | plait get command/type\n  \
                    cat a.xml | plait get 'y\\[[0-9]\\]/x' --output-path",
                )
                .arg(
                    Arg::new("paths")
                        .help("X-paths or regular expressions")
                        .required(true)
                        .num_args(1..)
                        .value_hint(ValueHint::Other),
                )
                .arg(format_arg(
                    "from",
                    "Input format (guessed for json, xml and path-value when omitted)",
                ))
                .arg(format_arg("to", "Output format for subtrees (default: path-value)"))
                .arg(
                    Arg::new("regex")
                        .long("regex")
                        .help("Treat square brackets as regex characters")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output-path")
                        .long("output-path")
                        .help("Prefix values with the path they were found at")
                        .action(ArgAction::SetTrue),
                ),
        ))
}

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    if let Err(err) = run(&matches) {
        let command = match matches.subcommand_name() {
            Some(name) => format!("plait {name}"),
            None => "plait".to_string(),
        };
        eprintln!("{command}: {}{}", err.prefix, err.message);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return Ok(());
    }

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()))?;

    match matches.subcommand() {
        Some(("sort", sub_matches)) => handle_sort_command(sub_matches, &config),
        Some(("convert", sub_matches)) => handle_convert_command(sub_matches, &config),
        Some(("get", sub_matches)) => handle_get_command(sub_matches, &config),
        _ => Err(CliError::generic(
            "unknown subcommand; use --help for usage information",
        )),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_cli_config(explicit_path: Option<&str>) -> Result<PlaitConfig, CliError> {
    let loader = Loader::new().with_optional_file(PROJECT_CONFIG);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader
        .build()
        .map_err(|err| CliError::generic(format!("failed to load configuration: {err}")))
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    let registry = FormatRegistry::default();
    for (name, description) in registry.describe_formats() {
        println!("  {name:<12}{description}");
    }
}

/// Handle the sort command
fn handle_sort_command(matches: &ArgMatches, config: &PlaitConfig) -> Result<(), CliError> {
    let options = sort_options(matches, config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    plait_sort::sort(stdin.lock(), BufWriter::new(stdout.lock()), &options)?;
    Ok(())
}

fn sort_options(matches: &ArgMatches, config: &PlaitConfig) -> Result<SortOptions, CliError> {
    let mut options = SortOptions::from(&config.sort);
    if let Some(fields) = matches.get_one::<String>("fields") {
        options.fields = split_names(fields);
    }
    options.order = matches.get_one::<String>("order").map(|order| split_names(order));
    if let Some(layout) = matches.get_one::<String>("binary") {
        options.binary = Some(layout.parse::<Layout>()?);
    }
    if let Some(delimiter) = matches.get_one::<char>("delimiter") {
        options.delimiter = *delimiter;
    }
    options.string_keys |= matches.get_flag("string");
    options.reverse |= matches.get_flag("reverse");
    options.flush |= matches.get_flag("flush");
    Ok(options)
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches, config: &PlaitConfig) -> Result<(), CliError> {
    let mut settings = config.convert.clone();
    apply_convert_flags(&mut settings, matches);
    let options = ConvertOptions::from(&settings);

    let registry = FormatRegistry::default();
    let converter = Converter::new(&registry, &settings.from, &settings.to, options)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    if settings.linewise {
        let shutdown = register_shutdown()?;
        converter.run_linewise(stdin.lock(), BufWriter::new(stdout.lock()), &shutdown)?;
    } else {
        converter.run_whole(stdin.lock(), BufWriter::new(stdout.lock()))?;
    }
    Ok(())
}

/// Applies command line flags on top of the configured convert settings.
fn apply_convert_flags(settings: &mut ConvertConfig, matches: &ArgMatches) {
    if let Some(from) = matches.get_one::<String>("from") {
        settings.from = from.clone();
    }
    if let Some(to) = matches.get_one::<String>("to") {
        settings.to = to.clone();
    }
    if let Some(equal_sign) = matches.get_one::<char>("equal-sign") {
        settings.equal_sign = *equal_sign;
    }
    if let Some(delimiter) = matches.get_one::<char>("delimiter") {
        settings.delimiter = Some(*delimiter);
    }
    settings.linewise |= matches.get_flag("linewise");
    if let Some(duplicates) = duplicate_policy(matches) {
        settings.duplicates = duplicates;
    }
    if matches.get_flag("indices") {
        settings.index_mode = if matches.get_flag("no-brackets") {
            IndexMode::WithoutBrackets
        } else {
            IndexMode::WithBrackets
        };
    }
}

fn duplicate_policy(matches: &ArgMatches) -> Option<DuplicatePathPolicy> {
    if matches.get_flag("verify-unique") {
        Some(DuplicatePathPolicy::Reject)
    } else if matches.get_flag("take-last") {
        Some(DuplicatePathPolicy::TakeLast)
    } else {
        None
    }
}

/// Handle the get command
fn handle_get_command(matches: &ArgMatches, config: &PlaitConfig) -> Result<(), CliError> {
    let options = get_options(matches, config);
    let selectors = matches
        .get_many::<String>("paths")
        .into_iter()
        .flatten()
        .map(|pattern| Selector::parse(pattern, matches.get_flag("regex")))
        .collect::<Result<Vec<_>, _>>()?;
    let to = matches
        .get_one::<String>("to")
        .cloned()
        .unwrap_or_else(|| config.get.to.clone());
    let from = matches.get_one::<String>("from");
    let output_path = config.get.output_path || matches.get_flag("output-path");

    let registry = FormatRegistry::default();
    registry.get(&to)?;
    if let Some(from) = from {
        registry.get(from)?;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    if options.linewise {
        let Some(from) = from else {
            return Err(CliError::generic("if --linewise is given, --from must be given"));
        };
        let query = Query::new(&registry, from, &to, selectors, options)?
            .with_output_path(output_path);
        let shutdown = register_shutdown()?;
        for_each_line(
            stdin.lock(),
            BufWriter::new(stdout.lock()),
            &shutdown,
            |record| query.apply(record),
        )?;
    } else {
        let mut source = String::new();
        stdin.lock().read_to_string(&mut source)?;
        let from = match from {
            Some(from) => from.as_str(),
            None => registry.detect(&source),
        };
        let query = Query::new(&registry, from, &to, selectors, options)?
            .with_output_path(output_path);
        let mut out = BufWriter::new(stdout.lock());
        out.write_all(query.apply(&source)?.as_bytes())?;
        out.flush()?;
    }
    Ok(())
}

fn get_options(matches: &ArgMatches, config: &PlaitConfig) -> ConvertOptions {
    let linewise = config.convert.linewise || matches.get_flag("linewise");
    let delimiter = matches
        .get_one::<char>("delimiter")
        .copied()
        .or(config.convert.delimiter)
        .unwrap_or(if linewise { ',' } else { '\n' });
    let index_mode = if matches.get_flag("no-brackets") {
        IndexMode::WithoutBrackets
    } else {
        config.get.index_mode
    };
    ConvertOptions::new()
        .with_equal_sign(
            matches
                .get_one::<char>("equal-sign")
                .copied()
                .unwrap_or(config.convert.equal_sign),
        )
        .with_delimiter(delimiter)
        .with_index_mode(index_mode)
        .with_duplicates(duplicate_policy(matches).unwrap_or(config.convert.duplicates))
        .with_linewise(linewise)
}

/// Raises the returned flag on SIGINT or SIGTERM; a second signal exits.
fn register_shutdown() -> Result<Arc<AtomicBool>, CliError> {
    use signal_hook::consts::TERM_SIGNALS;
    use signal_hook::flag;

    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in TERM_SIGNALS {
        flag::register_conditional_shutdown(*signal, 1, Arc::clone(&shutdown))?;
        flag::register(*signal, Arc::clone(&shutdown))?;
    }
    Ok(shutdown)
}

/// Parses a single character argument; `\n` and `\t` stand for newline and tab.
fn parse_char(raw: &str) -> Result<char, String> {
    match raw {
        "\\n" => return Ok('\n'),
        "\\t" => return Ok('\t'),
        _ => {}
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("expected a single character, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plait_config::load_defaults;

    fn sub_matches(args: &[&str]) -> (String, ArgMatches) {
        let matches = build_cli().try_get_matches_from(args.iter().copied()).unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        (name.to_string(), sub.clone())
    }

    #[test]
    fn cli_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn parse_char_accepts_escapes() {
        assert_eq!(parse_char(";"), Ok(';'));
        assert_eq!(parse_char("\\n"), Ok('\n'));
        assert_eq!(parse_char("\\t"), Ok('\t'));
        assert!(parse_char("ab").is_err());
        assert!(parse_char("").is_err());
    }

    #[test]
    fn convert_flags_override_config() {
        let config = load_defaults().unwrap();
        let (_, matches) = sub_matches(&[
            "plait",
            "convert",
            "--from",
            "json",
            "--to",
            "path-value",
            "--indices",
            "--no-brackets",
            "--take-last",
        ]);
        let mut settings = config.convert.clone();
        apply_convert_flags(&mut settings, &matches);
        assert_eq!(settings.from, "json");
        assert_eq!(settings.index_mode, IndexMode::WithoutBrackets);
        assert_eq!(settings.duplicates, DuplicatePathPolicy::TakeLast);

        let options = ConvertOptions::from(&settings);
        assert_eq!(options.delimiter, '\n');
    }

    #[test]
    fn no_brackets_alone_keeps_indices_disabled() {
        let config = load_defaults().unwrap();
        let (_, matches) = sub_matches(&["plait", "convert", "--no-brackets"]);
        let mut settings = config.convert.clone();
        apply_convert_flags(&mut settings, &matches);
        assert_eq!(settings.index_mode, IndexMode::Disabled);
    }

    #[test]
    fn verify_unique_wins_over_take_last() {
        let (_, matches) = sub_matches(&[
            "plait",
            "convert",
            "--take-last",
            "--unique-input",
        ]);
        assert_eq!(duplicate_policy(&matches), Some(DuplicatePathPolicy::Reject));
    }

    #[test]
    fn get_defaults_depend_on_linewise() {
        let config = load_defaults().unwrap();
        let (_, matches) = sub_matches(&["plait", "get", "a/b"]);
        let options = get_options(&matches, &config);
        assert_eq!(options.delimiter, '\n');
        assert_eq!(options.index_mode, IndexMode::WithBrackets);

        let (_, matches) = sub_matches(&["plait", "get", "a/b", "-l", "--no-brackets"]);
        let options = get_options(&matches, &config);
        assert_eq!(options.delimiter, ',');
        assert_eq!(options.index_mode, IndexMode::WithoutBrackets);
        assert!(options.linewise);
    }

    #[test]
    fn sort_options_from_flags() {
        let config = load_defaults().unwrap();
        let (_, matches) = sub_matches(&[
            "plait", "sort", "-f", "a,,b", "--order", "b,a", "-s", "-r", "-d", ";",
        ]);
        let options = sort_options(&matches, &config).unwrap();
        assert_eq!(options.fields, vec!["a", "", "b"]);
        assert_eq!(options.order, Some(vec!["b".to_string(), "a".to_string()]));
        assert!(options.string_keys);
        assert!(options.reverse);
        assert_eq!(options.delimiter, ';');
        assert!(options.binary.is_none());
    }

    #[test]
    fn bad_layout_is_rejected_before_reading() {
        let config = load_defaults().unwrap();
        let (_, matches) = sub_matches(&["plait", "sort", "-f", "a", "-b", "q"]);
        assert!(sort_options(&matches, &config).is_err());
    }

    #[test]
    fn format_errors_keep_their_category() {
        let err = CliError::from(FormatError::BadPath("x".to_string()));
        assert_eq!(err.prefix, "bad path: ");
        let err = CliError::from(FormatError::FormatNotFound("yaml".to_string()));
        assert_eq!(err.prefix, "");
    }
}
