use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagscoutError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] ureq::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Unknown site: {0}")]
    UnknownSite(String),

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Clipboard unavailable: {0}")]
    ClipboardError(String),

    #[error("Claude CLI failed: {0}")]
    ClaudeFailed(String),

    #[error("Text generation failed: {0}")]
    GenerationError(String),
}

impl TagscoutError {
    /// Get an actionable hint for how to resolve this error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            TagscoutError::HttpError(_) => Some(
                "Check your internet connection, or save the page and run:\n  tagscout scan page.html --site shutterstock.com"
            ),
            TagscoutError::UnknownSite(_) => Some(
                "Run `tagscout sites` to see supported sites"
            ),
            TagscoutError::UnknownTopic(_) => Some(
                "Run `tagscout topics` to see built-in topics"
            ),
            TagscoutError::ClipboardError(_) => Some(
                "Install a clipboard tool (wl-copy, xclip or xsel), or export with --csv"
            ),
            TagscoutError::ClaudeFailed(_) => Some(
                "Install Claude CLI: curl -fsSL https://claude.ai/install.sh | bash\nOr switch backends in `tagscout config path`"
            ),
            TagscoutError::GenerationError(_) => Some(
                "Check the API key variable named by `ai.api_key_env` in your config"
            ),
            TagscoutError::TomlError(_) | TagscoutError::ConfigError(_) => Some(
                "Inspect your configuration with `tagscout config show`"
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TagscoutError>;
