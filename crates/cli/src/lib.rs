use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nepfont_convert::{ConversionClient, ConversionToggle, Orchestrator, ServiceSettings};
use nepfont_model::{
    eligible_target_fonts, is_convertible_selection, is_unicode_devanagari, selection_font,
    Document, DocumentFile, FontKey, FontRegistry, ScriptClassifier, Span, Strictness, TextHost,
};
use nepfont_storage::Storage;
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overrides where service settings are stored.
pub const CONFIG_DIR_ENV: &str = "NEPFONT_CONFIG_DIR";

#[derive(Debug, Parser)]
#[command(name = "nepfont")]
#[command(about = "Convert Nepali text between legacy fonts and Unicode")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the registered fonts.
    Fonts,
    /// Report how a piece of text would be classified.
    Classify {
        #[arg(value_name = "TEXT")]
        text: String,
        /// Font the text is styled with.
        #[arg(long)]
        font: Option<String>,
    },
    /// List the conversion targets offered for a selection.
    Targets {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Convert a selection of a document through the conversion service.
    Convert {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Destination font key or label.
        #[arg(long, value_name = "FONT")]
        to: String,
        /// Write the converted document here instead of in place.
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
    },
    /// Check that the conversion service answers.
    Check {
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
    },
    /// Inspect or initialise stored service settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the settings file location.
    Path,
    /// Print the effective settings.
    Show,
    /// Write the effective settings to disk.
    Init,
}

#[derive(Debug, Args)]
struct SelectionArgs {
    /// Document JSON file.
    #[arg(long, value_name = "FILE")]
    document: PathBuf,
    /// First selected character (default: start of document).
    #[arg(long)]
    start: Option<usize>,
    /// End of the selection, exclusive (default: end of document).
    #[arg(long)]
    end: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyOutput {
    strict_devanagari: bool,
    tolerant_devanagari: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    font: Option<FontReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FontReport {
    name: String,
    legacy: bool,
    nepali_encoded: bool,
    effective_source: Option<FontKey>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TargetsOutput<'a> {
    current_font: Option<&'a str>,
    convertible: bool,
    targets: Vec<&'a str>,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Fonts => run_fonts(),
        Commands::Classify { text, font } => run_classify(&text, font),
        Commands::Targets { selection } => run_targets(&selection),
        Commands::Convert { selection, to, output, endpoint } => {
            run_convert(&selection, &to, output.as_deref(), endpoint)
        }
        Commands::Check { endpoint } => run_check(endpoint),
        Commands::Config { command } => run_config(command),
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_fonts() -> Result<()> {
    let registry = FontRegistry::builtin();

    println!("{:<10}  {:<18}  LABEL", "KEY", "LOCAL NAME");
    for entry in registry.entries() {
        println!("{:<10}  {:<18}  {}", entry.key.as_str(), entry.local_name, entry.label);
    }

    Ok(())
}

fn run_classify(text: &str, font: Option<String>) -> Result<()> {
    let registry = FontRegistry::builtin();
    let classifier = ScriptClassifier::new(&registry);

    let font = font.map(|name| FontReport {
        legacy: classifier.is_encoded_in_known_legacy_font(&name),
        nepali_encoded: classifier.is_nepali_encoded(&name, text),
        effective_source: classifier.effective_source_font(&name, text),
        name,
    });

    let payload = ClassifyOutput {
        strict_devanagari: is_unicode_devanagari(text, Strictness::Strict),
        tolerant_devanagari: is_unicode_devanagari(text, Strictness::Tolerant),
        font,
    };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn run_targets(selection: &SelectionArgs) -> Result<()> {
    let registry = FontRegistry::builtin();
    let document = load_document(&selection.document)?;
    let span = selection_span(&document, selection)?;
    let units = document.text_units(span);

    let payload = TargetsOutput {
        current_font: selection_font(&units),
        convertible: is_convertible_selection(&registry, &units),
        targets: eligible_target_fonts(&registry, &units),
    };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn run_convert(
    selection: &SelectionArgs,
    to: &str,
    output: Option<&Path>,
    endpoint: Option<String>,
) -> Result<()> {
    let registry = FontRegistry::builtin();
    let destination =
        registry.resolve(to).cloned().with_context(|| format!("unknown target font: {to}"))?;

    let mut document = load_document(&selection.document)?;
    let span = selection_span(&document, selection)?;
    let settings = load_settings(endpoint)?;

    let client = ConversionClient::from_settings(&settings);
    let orchestrator = Orchestrator::new(&registry, &client, &settings);
    let result =
        orchestrator.convert(&mut document, span, &destination).context("conversion refused")?;

    let output = output.unwrap_or(selection.document.as_path());
    save_document(&document, output)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    if let Some(notice) = &result.notice {
        eprintln!("{}", notice.message);
    }

    Ok(())
}

fn run_check(endpoint: Option<String>) -> Result<()> {
    let settings = load_settings(endpoint)?;
    let client = ConversionClient::from_settings(&settings);

    let mut toggle = ConversionToggle::new();
    toggle.enable(&client)?;

    println!("{}", toggle.status_label());
    Ok(())
}

fn run_config(command: ConfigCommand) -> Result<()> {
    let storage = open_storage()?;

    match command {
        ConfigCommand::Path => {
            println!("{}", storage.settings_path().display());
        }
        ConfigCommand::Show => {
            let settings = storage.load_settings().context("failed to read service settings")?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigCommand::Init => {
            let settings = storage.load_settings().context("failed to read service settings")?;
            storage.save_settings(&settings).context("failed to write service settings")?;
            println!("{}", storage.settings_path().display());
        }
    }

    Ok(())
}

fn open_storage() -> Result<Storage> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) => Ok(Storage::with_root(PathBuf::from(dir))),
        None => Storage::from_default_project().context("failed to locate settings directory"),
    }
}

fn load_settings(endpoint: Option<String>) -> Result<ServiceSettings> {
    let storage = open_storage()?;
    let mut settings = storage.load_settings().context("failed to read service settings")?;
    if let Some(endpoint) = endpoint {
        debug!(%endpoint, "overriding conversion endpoint");
        settings.conversion_url = endpoint;
    }
    Ok(settings)
}

fn load_document(path: &Path) -> Result<Document> {
    ensure_file_exists(path)?;

    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file: DocumentFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse document {}", path.display()))?;

    Ok(Document::from(file))
}

fn save_document(document: &Document, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let bytes = serde_json::to_vec_pretty(&document.to_file())?;
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn selection_span(document: &Document, selection: &SelectionArgs) -> Result<Span> {
    let len = document.len();
    let start = selection.start.unwrap_or(0);
    let end = selection.end.unwrap_or(len);

    if start > end || end > len {
        anyhow::bail!("selection {start}..{end} is outside the document (length {len})");
    }

    Ok(Span::new(start, end))
}

fn ensure_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("file does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("path is not a file: {}", path.display());
    }

    Ok(())
}
