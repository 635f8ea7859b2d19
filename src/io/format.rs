use std::fmt;
use std::path::Path;

/// Supported data formats for schema documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
    #[cfg(feature = "toml")]
    Toml,
}

/// Result of looking at a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionFormat {
    Known(DocumentFormat),
    /// Recognised, but this build was compiled without the feature.
    UnsupportedFeature {
        format_name: &'static str,
        feature_flag: &'static str,
    },
    Unknown,
}

impl DocumentFormat {
    pub fn available_formats() -> Vec<DocumentFormat> {
        vec![
            DocumentFormat::Json,
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml,
            #[cfg(feature = "toml")]
            DocumentFormat::Toml,
        ]
    }

    pub fn probe(path: &Path) -> ExtensionFormat {
        let Some(ext) = path.extension() else {
            return ExtensionFormat::Unknown;
        };
        let normalized = ext.to_string_lossy().to_ascii_lowercase();
        match normalized.as_str() {
            "json" => ExtensionFormat::Known(DocumentFormat::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => ExtensionFormat::Known(DocumentFormat::Yaml),
            #[cfg(not(feature = "yaml"))]
            "yaml" | "yml" => ExtensionFormat::UnsupportedFeature {
                format_name: "yaml",
                feature_flag: "yaml",
            },
            #[cfg(feature = "toml")]
            "toml" => ExtensionFormat::Known(DocumentFormat::Toml),
            #[cfg(not(feature = "toml"))]
            "toml" => ExtensionFormat::UnsupportedFeature {
                format_name: "toml",
                feature_flag: "toml",
            },
            _ => ExtensionFormat::Unknown,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => write!(f, "yaml"),
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => write!(f, "toml"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_extensions_case_insensitively() {
        assert_eq!(
            DocumentFormat::probe(Path::new("form.JSON")),
            ExtensionFormat::Known(DocumentFormat::Json)
        );
        assert_eq!(
            DocumentFormat::probe(Path::new("form.html")),
            ExtensionFormat::Unknown
        );
        assert_eq!(DocumentFormat::probe(Path::new("form")), ExtensionFormat::Unknown);
    }
}
