use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use formwright::io::ExtensionFormat;
use formwright::validation::normalize_select_options;
use formwright::{
    DocumentFormat, OutputDestination, OutputOptions, RenderOptions, Schema, ValidationOutcome,
    emit_document, emit_text, load_schema_str, prepare_schema, render_form,
};

#[derive(Debug, Parser)]
#[command(
    name = "formwright",
    version,
    about = "Validate nested form schemas and render them as HTML"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides it.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalise, validate and render a schema as an HTML fragment
    Render(RenderArgs),
    /// Print {"isValid", "error"} for a schema; exits with 1 when invalid
    Validate(SourceArgs),
    /// Parse select option text and write the normalised schema document
    Normalize(NormalizeArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Schema spec: file path, inline payload, or "-" for stdin
    #[arg(short = 's', long = "schema", value_name = "SPEC", env = "FORMWRIGHT_SCHEMA")]
    schema: String,
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Output destinations ("-" writes to stdout). Defaults to stdout.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Leading option text for selects that define no placeholder
    #[arg(long = "placeholder", value_name = "TEXT", conflicts_with = "default_placeholder")]
    placeholder: Option<String>,

    /// Use "Select..." as the leading option for selects without a placeholder
    #[arg(long = "default-placeholder")]
    default_placeholder: bool,

    /// Text printed in front of every hint
    #[arg(long = "hint-prefix", value_name = "TEXT", env = "FORMWRIGHT_HINT_PREFIX")]
    hint_prefix: Option<String>,
}

#[derive(Debug, Args)]
struct NormalizeArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Render(args) => render(args),
        Command::Validate(args) => validate(args),
        Command::Normalize(args) => normalize(args),
    }
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn render(args: RenderArgs) -> Result<ExitCode> {
    let destinations = resolve_destinations(&args.output)?;
    let schema = load_schema(&args.source.schema)?;
    let schema = prepare_schema(&schema).wrap_err("schema is not valid")?;

    let mut options = RenderOptions::default();
    if let Some(text) = args.placeholder {
        options = options.with_placeholder_text(text);
    } else if args.default_placeholder {
        options = options.with_default_placeholder();
    }
    if let Some(prefix) = args.hint_prefix {
        options = options.with_hint_prefix(prefix);
    }

    let html = render_form(&schema, &options);
    debug!(fields = schema.len(), bytes = html.len(), "rendered form");
    emit_text(&html, &destinations).map_err(Report::msg)?;
    Ok(ExitCode::SUCCESS)
}

fn validate(args: SourceArgs) -> Result<ExitCode> {
    let schema = load_schema(&args.schema)?;
    let outcome = ValidationOutcome::from(prepare_schema(&schema).map(|_| ()));
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(if outcome.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn normalize(args: NormalizeArgs) -> Result<ExitCode> {
    let destinations = resolve_destinations(&args.output)?;
    let format = output_format(&destinations, &args.source.schema)?;
    let schema = load_schema(&args.source.schema)?;
    let normalized = normalize_select_options(&schema)?;

    let options = OutputOptions::new(format)
        .with_pretty(!args.no_pretty)
        .with_destinations(destinations);
    emit_document(&normalized.to_value(), &options).map_err(Report::msg)?;
    Ok(ExitCode::SUCCESS)
}

fn load_schema(spec: &str) -> Result<Schema> {
    let format = format_hint(spec)?;
    let (contents, label) = read_spec(spec)?;
    load_schema_str(&contents, format).map_err(|err| eyre!("failed to load {label}: {err:#}"))
}

/// Read a file, stdin ("-"), or treat the spec itself as the document.
fn read_spec(spec: &str) -> Result<(String, String)> {
    if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read from stdin")?;
        return Ok((buffer, "schema from stdin".to_string()));
    }

    let path = Path::new(spec);
    if !path.exists() {
        return Ok((spec.to_string(), "inline schema".to_string()));
    }
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read file {}", path.display()))?;
    Ok((contents, format!("schema from {}", path.display())))
}

fn format_hint(spec: &str) -> Result<DocumentFormat> {
    if spec == "-" {
        return Ok(DocumentFormat::default());
    }
    match DocumentFormat::probe(Path::new(spec)) {
        ExtensionFormat::Known(format) => Ok(format),
        ExtensionFormat::UnsupportedFeature {
            format_name,
            feature_flag,
        } => Err(eyre!(
            "schema '{spec}' requires {format_name} support, but this build lacks the '{feature_flag}' feature"
        )),
        ExtensionFormat::Unknown => Ok(DocumentFormat::default()),
    }
}

fn output_format(destinations: &[OutputDestination], schema_spec: &str) -> Result<DocumentFormat> {
    let mut diagnostics = DiagnosticCollector::default();
    let mut detected: Option<DocumentFormat> = None;
    for destination in destinations {
        let OutputDestination::File(path) = destination else {
            continue;
        };
        match DocumentFormat::probe(path) {
            ExtensionFormat::Known(format) => match detected {
                Some(existing) if existing != format => diagnostics.push_output(format!(
                    "output file {} uses {format} but other destinations use {existing}; align extensions",
                    path.display()
                )),
                Some(_) => {}
                None => detected = Some(format),
            },
            ExtensionFormat::UnsupportedFeature {
                format_name,
                feature_flag,
            } => diagnostics.push_output(format!(
                "output file {} requires {format_name} support, but this build was compiled without the '{feature_flag}' feature",
                path.display()
            )),
            ExtensionFormat::Unknown => diagnostics.push_output(format!(
                "cannot infer format from output file {}; use .json/.yaml/.toml",
                path.display()
            )),
        }
    }
    diagnostics.into_result()?;

    match detected {
        Some(format) => Ok(format),
        None => format_hint(schema_spec),
    }
}

fn resolve_destinations(args: &OutputArgs) -> Result<Vec<OutputDestination>> {
    let mut diagnostics = DiagnosticCollector::default();
    let mut destinations = Vec::new();

    for raw in &args.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
            continue;
        }
        if raw == "-" {
            destinations.push(OutputDestination::Stdout);
            continue;
        }
        let path = PathBuf::from(raw);
        if path.exists() && !args.force {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
        destinations.push(OutputDestination::File(path));
    }

    diagnostics.into_result()?;
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }
    Ok(destinations)
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}
