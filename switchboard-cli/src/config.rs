//! Console configuration loaded from a toml file.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

use switchboard_core::HelpStyle;

/// Settings for the interactive console.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Prompt shown before each input line
    pub prompt: String,

    /// Help entry lines per page
    pub page_height: usize,

    /// Display width used to wrap help for interactive invokers
    pub wrap_width: usize,

    /// Permission keys granted to the console invoker
    pub permissions: Vec<String>,

    /// Custom permission-refusal message; `<permission>` is substituted
    /// with the required key
    pub permission_message: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let style = HelpStyle::default();
        ConsoleConfig {
            prompt: "> ".to_string(),
            page_height: style.page_height,
            wrap_width: style.wrap_width,
            permissions: vec![
                "console.calc.div".to_string(),
                "console.reload".to_string(),
            ],
            permission_message: None,
        }
    }
}

impl ConsoleConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn help_style(&self) -> HelpStyle {
        HelpStyle {
            page_height: self.page_height,
            wrap_width: self.wrap_width,
        }
    }
}
