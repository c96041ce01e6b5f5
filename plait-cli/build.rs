use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of build_cli() from src/main.rs, reduced to what completions need.
// Build scripts can't access src/ modules.
const FORMATS: &[&str] = &["info", "ini", "json", "name-value", "path-value", "xml"];

fn flag(name: &'static str) -> Arg {
    Arg::new(name).long(name).action(ArgAction::SetTrue)
}

fn format(name: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_parser(clap::builder::PossibleValuesParser::new(FORMATS))
        .value_hint(ValueHint::Other)
}

fn tree_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("equal-sign").long("equal-sign").short('e'))
        .arg(Arg::new("delimiter").long("delimiter").short('d'))
        .arg(flag("no-brackets"))
        .arg(flag("take-last"))
        .arg(flag("verify-unique").visible_alias("unique-input"))
        .arg(flag("linewise").short('l'))
        .arg(format("from"))
        .arg(format("to"))
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("plait")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Stream filters for sorting records and converting tree formats")
        .arg_required_else_help(true)
        .arg(flag("list-formats").global(true))
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(flag("verbose").short('v').global(true))
        .subcommand(
            Command::new("sort")
                .about("Sort records by key fields")
                .arg(Arg::new("fields").long("fields").short('f').required(true))
                .arg(Arg::new("order").long("order"))
                .arg(flag("string").short('s'))
                .arg(flag("reverse").short('r'))
                .arg(Arg::new("binary").long("binary").short('b'))
                .arg(Arg::new("delimiter").long("delimiter").short('d'))
                .arg(flag("flush")),
        )
        .subcommand(tree_args(
            Command::new("convert")
                .about("Convert between tree formats")
                .arg(flag("indices").long("show-path-indices").visible_alias("indices")),
        ))
        .subcommand(tree_args(
            Command::new("get")
                .about("Print values at the given paths")
                .arg(Arg::new("paths").required(true).num_args(1..))
                .arg(flag("regex"))
                .arg(flag("output-path")),
        ));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "plait", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "plait", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "plait", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
