use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use super::DocumentFormat;

/// Where rendered HTML or a normalised schema document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }

    /// Write `payload` and a trailing newline. Files are replaced.
    fn write(&self, payload: &str) -> Result<()> {
        match self {
            OutputDestination::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{payload}").context("failed to write to stdout")?;
                stdout.flush().context("failed to flush stdout")
            }
            OutputDestination::File(path) => fs::write(path, format!("{payload}\n"))
                .with_context(|| format!("failed to write to file {}", path.display())),
        }
    }
}

/// Serialisation settings for [`emit_document`].
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::default())
    }
}

/// Serialise `value` once and send it to every destination.
pub fn emit_document(value: &Value, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let text = document_text(value, options.format, options.pretty)?;
    emit_text(text.trim_end_matches('\n'), &options.destinations)
}

/// Send an already formatted payload, such as rendered HTML, everywhere.
pub fn emit_text(payload: &str, destinations: &[OutputDestination]) -> Result<()> {
    destinations
        .iter()
        .try_for_each(|destination| destination.write(payload))
}

fn document_text(value: &Value, format: DocumentFormat, pretty: bool) -> Result<String> {
    let text: Result<String> = match format {
        DocumentFormat::Json if pretty => serde_json::to_string_pretty(value).map_err(Into::into),
        DocumentFormat::Json => serde_json::to_string(value).map_err(Into::into),
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(value).map_err(Into::into),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml if pretty => toml::to_string_pretty(value).map_err(Into::into),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::to_string(value).map_err(Into::into),
    };
    text.with_context(|| format!("failed to serialize {format} document"))
}
