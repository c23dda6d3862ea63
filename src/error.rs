use std::fmt;
use thiserror::Error;

/// Failure of a contributor retrieval
#[derive(Debug, Error)]
pub enum FetchError {
    /// The endpoint answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The request never produced a response
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The response body was not a contributor list
    #[error("invalid contributor payload from {url}: {message}")]
    Payload { url: String, message: String },

    /// Every attempt against one source failed
    #[error("{repo}: all {attempts} attempts failed")]
    SourceExhausted {
        repo: String,
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

/// Failure of the local contributor cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Stored bytes are not a gzip/UTF-8/JSON contributor envelope
    #[error("cached contributors are malformed: {0}")]
    Malformed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to read cache entry")]
    Read(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to write cache entry")]
    Write(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// User-friendly error wrapper
#[derive(Debug)]
pub struct UserError {
    message: String,
    details: Option<String>,
    suggestion: Option<String>,
}

impl UserError {
    /// Create a new user error
    pub fn new(message: impl Into<String>) -> Self {
        UserError {
            message: message.into(),
            details: None,
            suggestion: None,
        }
    }

    /// Add details about the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a suggestion for how to fix the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Format the error for display
    pub fn display(&self) {
        eprintln!("\n❌ Error: {}", self.message);

        if let Some(ref details) = self.details {
            eprintln!("\n   {}", details);
        }

        if let Some(ref suggestion) = self.suggestion {
            eprintln!("\n💡 {}", suggestion);
        }
    }
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref details) = self.details {
            write!(f, ": {}", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for UserError {}

/// Convert top-level failures to user-friendly messages
pub fn user_friendly_error(error: &anyhow::Error) -> UserError {
    let error_str = format!("{:#}", error);

    if error_str.contains("Failed to read config") {
        return UserError::new("Configuration file not found")
            .with_details("No contributors config.toml was found")
            .with_suggestion("Run 'contributors init' to create a configuration");
    }

    if error_str.contains("Failed to parse config") || error_str.contains("Invalid time") {
        return UserError::new("Invalid configuration file")
            .with_details("The configuration file contains invalid values")
            .with_suggestion("Check the TOML syntax and duration values in your config.toml");
    }

    if error_str.contains("Failed to create HTTP client") {
        return UserError::new("Could not set up the HTTP client")
            .with_details(error_str)
            .with_suggestion("Check the user_agent and accept values under [github]");
    }

    if error_str.contains("Permission denied") {
        return UserError::new("Permission denied")
            .with_details("Cannot write to the cache or config location")
            .with_suggestion("Check that you have write permissions to the cache directory");
    }

    UserError::new("An unexpected error occurred").with_details(error_str)
}

/// Wrap a result with user-friendly error handling
pub trait UserFriendly<T> {
    fn user_friendly(self) -> Result<T, UserError>;
}

impl<T> UserFriendly<T> for anyhow::Result<T> {
    fn user_friendly(self) -> Result<T, UserError> {
        self.map_err(|e| user_friendly_error(&e))
    }
}
