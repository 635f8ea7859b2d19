mod html;

pub use html::{bracket_path, render_form};

/// Placeholder text used by [`RenderOptions::with_default_placeholder`].
pub const DEFAULT_PLACEHOLDER: &str = "Select...";
const DEFAULT_HINT_PREFIX: &str = "Hint: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Leading empty-value option for select fields that do not define
    /// their own `placeholder`. `None` renders no leading option.
    pub default_placeholder: Option<String>,
    pub hint_prefix: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            default_placeholder: None,
            hint_prefix: DEFAULT_HINT_PREFIX.to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_default_placeholder(self) -> Self {
        self.with_placeholder_text(DEFAULT_PLACEHOLDER)
    }

    pub fn with_placeholder_text(mut self, text: impl Into<String>) -> Self {
        self.default_placeholder = Some(text.into());
        self
    }

    pub fn with_hint_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.hint_prefix = prefix.into();
        self
    }
}
