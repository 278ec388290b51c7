//! `wordplay` - render story templates from the command line.
//!
//! ```text
//! wordplay render chapter1.txt --vars state.yaml --flag lamp --var mood=sad
//! wordplay render --format json < chapter1.txt
//! wordplay headers chapter1.txt --format yaml
//! ```
//!
//! Templates are read from a file or, when none is given (or `-`), from
//! stdin. Log output goes to stderr; raise it with `-v`/`-vv` or `RUST_LOG`.

mod vars;

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use wordplay::Wordplay;

use crate::vars::VariablesFile;

#[derive(Parser, Debug)]
#[command(name = "wordplay", version)]
#[command(about = "Render Wordplay story templates")]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a template and print the result
    Render(RenderArgs),

    /// Print the header section of a template
    Headers(HeadersArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Template file; stdin when omitted or `-`
    file: Option<PathBuf>,

    /// YAML or JSON file with `flags`, `variables`, `injections` and `config` tables
    #[arg(long, value_name = "FILE")]
    vars: Option<PathBuf>,

    /// Set a boolean variable; a bare NAME means true
    #[arg(long = "flag", value_name = "NAME[=BOOL]", value_parser = parse_flag)]
    flags: Vec<(String, bool)>,

    /// Set a string variable
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    variables: Vec<(String, String)>,

    /// Provide an injection value
    #[arg(long = "inject", value_name = "ID=VALUE", value_parser = parse_assignment)]
    injections: Vec<(String, String)>,

    /// Fail on variables that were never set
    #[arg(long)]
    strict: bool,

    /// Bound on passes per rewrite stage
    #[arg(long, value_name = "N")]
    max_passes: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Args, Debug)]
struct HeadersArgs {
    /// Template file; stdin when omitted or `-`
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Yaml,
}

fn parse_assignment(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

fn parse_flag(raw: &str) -> std::result::Result<(String, bool), String> {
    let (name, value) = match raw.split_once('=') {
        Some((name, value)) => {
            let value = value
                .parse::<bool>()
                .map_err(|_| format!("expected true or false for '{name}', got '{value}'"))?;
            (name, value)
        }
        None => (raw, true),
    };
    if name.is_empty() {
        return Err("flag name is empty".to_string());
    }
    Ok((name.to_string(), value))
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Reads the template from `file`, or from `stdin` for `None` and `-`.
fn read_template(file: Option<&PathBuf>, mut stdin: impl Read) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read template {}", path.display())),
        _ => {
            let mut template = String::new();
            stdin
                .read_to_string(&mut template)
                .context("failed to read template from stdin")?;
            Ok(template)
        }
    }
}

fn render(args: &RenderArgs, stdin: impl Read, out: &mut impl Write) -> Result<()> {
    let state = match &args.vars {
        Some(path) => VariablesFile::load(path)?,
        None => VariablesFile::default(),
    };

    let mut config = state.config.clone().unwrap_or_default();
    if args.strict {
        config = config.strict();
    }
    if let Some(passes) = args.max_passes {
        config = config.max_passes(passes);
    }

    let mut engine = Wordplay::with_config(config);
    state.apply(&mut engine);
    for (name, value) in &args.flags {
        engine.set_variable(name.as_str(), *value);
    }
    for (name, value) in &args.variables {
        engine.set_variable(name.as_str(), value.as_str());
    }
    for (id, value) in &args.injections {
        engine.inject(id.as_str(), value.as_str());
    }

    let template = read_template(args.file.as_ref(), stdin)?;
    let rendered = engine.process(&template).context("failed to render template")?;
    tracing::info!(
        chars = rendered.text().chars().count(),
        anchors = rendered.anchored_objects().len(),
        meta = rendered.meta_objects().len(),
        "rendered template"
    );

    match args.format {
        Format::Text => writeln!(out, "{}", rendered.text())?,
        Format::Json => write_json(out, &rendered)?,
        Format::Yaml => write_yaml(out, &rendered)?,
    }
    Ok(())
}

fn headers(args: &HeadersArgs, stdin: impl Read, out: &mut impl Write) -> Result<()> {
    let template = read_template(args.file.as_ref(), stdin)?;
    let headers: BTreeMap<String, String> = Wordplay::new().extract_headers(&template);

    match args.format {
        Format::Text => {
            for (key, value) in &headers {
                writeln!(out, "{key} {value}")?;
            }
        }
        Format::Json => write_json(out, &headers)?,
        Format::Yaml => write_yaml(out, &headers)?,
    }
    Ok(())
}

fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to write JSON")?;
    writeln!(out)?;
    Ok(())
}

fn write_yaml<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_yaml::to_writer(&mut *out, value).context("failed to write YAML")?;
    Ok(())
}

fn run(cli: Cli, stdin: impl Read, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Command::Render(args) => render(args, stdin, out),
        Command::Headers(args) => headers(args, stdin, out),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(cli, io::stdin().lock(), &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(args: &[&str], stdin: &str) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("wordplay").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        run(cli, stdin.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // ==================== Argument parsing ====================

    #[test]
    fn flag_forms() {
        assert_eq!(parse_flag("lamp"), Ok(("lamp".into(), true)));
        assert_eq!(parse_flag("lamp=false"), Ok(("lamp".into(), false)));
        assert!(parse_flag("lamp=maybe").is_err());
        assert!(parse_flag("=true").is_err());
    }

    #[test]
    fn assignment_splits_at_first_equals() {
        assert_eq!(
            parse_assignment("motto=a=b"),
            Ok(("motto".into(), "a=b".into()))
        );
        assert_eq!(parse_assignment("empty="), Ok(("empty".into(), String::new())));
        assert!(parse_assignment("novalue").is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["wordplay", "-vv", "headers"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    // ==================== render ====================

    #[test]
    fn render_from_stdin_with_overrides() {
        let out = run_with(
            &["render", "--flag", "lit", "--var", "mood=sad", "--inject", "hero=Robin"],
            "{> hero } finds it { lit ? bright | dark } and feels { mood:sad blue | fine }.",
        )
        .unwrap();
        assert_eq!(out, "Robin finds it bright and feels blue.\n");
    }

    #[test]
    fn command_line_overrides_variables_file() {
        let vars = temp_file(".yaml", "flags:\n  lit: true\nvariables:\n  mood: happy\n");
        let template = temp_file(".txt", "{ lit ? on | off } { mood:happy :) | :( }");
        let out = run_with(
            &[
                "render",
                template.path().to_str().unwrap(),
                "--vars",
                vars.path().to_str().unwrap(),
                "--flag",
                "lit=false",
            ],
            "",
        )
        .unwrap();
        assert_eq!(out, "off :)\n");
    }

    #[test]
    fn render_json_output() {
        let out = run_with(
            &["render", "--format", "json"],
            "A {< k:v B } C\n$\n< m room exits:2",
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["text"], "A B C");
        assert_eq!(json["anchored_objects"][0]["position"], 2);
        assert_eq!(json["meta_objects"][0]["id"], "room");
        assert_eq!(json["meta_objects"][0]["data"]["exits"], "2");
    }

    #[test]
    fn render_yaml_output() {
        let out = run_with(&["render", "--format", "yaml"], "plain").unwrap();
        assert!(out.contains("text: plain"));
    }

    #[test]
    fn strict_flag_reports_unset_variable() {
        let err = run_with(&["render", "--strict"], "{ lamp ? a | b }").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("failed to render template"));
        assert!(message.contains("'lamp'"));
    }

    #[test]
    fn config_from_variables_file() {
        let vars = temp_file(".json", r#"{"config": {"variable_policy": "strict"}}"#);
        let result = run_with(
            &["render", "--vars", vars.path().to_str().unwrap()],
            "{ mood:sad blue | fine }",
        );
        assert!(result.is_err());
    }

    #[test]
    fn max_passes_limits_rendering() {
        let result = run_with(
            &[
                "render",
                "--max-passes",
                "3",
                "--inject",
                "open={>",
                "--inject",
                "again={>open}again}",
            ],
            "{>again}",
        );
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("did not settle after 3 passes"));
    }

    #[test]
    fn injection_cycle_is_reported() {
        let err = run_with(&["render", "--inject", "loop={>loop}"], "{>loop}").unwrap_err();
        assert!(format!("{err:#}").contains("injection 'loop' expands to itself"));
    }

    #[test]
    fn missing_template_file() {
        let err = run_with(&["render", "/no/such/template.txt"], "").unwrap_err();
        assert!(format!("{err:#}").contains("failed to read template"));
    }

    // ==================== headers ====================

    #[test]
    fn headers_as_text() {
        let out = run_with(&["headers"], "Story\n!$\ntitle The Lighthouse\nchapter 2").unwrap();
        assert_eq!(out, "chapter 2\ntitle The Lighthouse\n");
    }

    #[test]
    fn headers_as_json() {
        let template = temp_file(".txt", "Story\n!$\ntitle Night");
        let out = run_with(
            &["headers", template.path().to_str().unwrap(), "--format", "json"],
            "",
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["title"], "Night");
    }
}
