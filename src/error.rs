//! Error types and handling for the Powdertime application

use thiserror::Error;

/// Main error type for the Powdertime application
#[derive(Error, Debug)]
pub enum PowdertimeError {
    /// The search origin could not be resolved to coordinates
    #[error("Could not find coordinates for: {query} ({message})")]
    Geocode { query: String, message: String },

    /// A manually listed resort is not in the catalog
    #[error("Resort '{name}' not found in database. Available resorts: {}", available.join(", "))]
    UnknownResort { name: String, available: Vec<String> },

    /// A manually listed resort entry has an unusable shape
    #[error("Invalid resort specification: {message}")]
    InvalidSpec { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Notification delivery errors
    #[error("Notification error: {message}")]
    Notification { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl PowdertimeError {
    /// Create a new geocoding error for the query that failed
    pub fn geocode<Q: Into<String>, S: Into<String>>(query: Q, message: S) -> Self {
        Self::Geocode {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Create a new unknown-resort error listing the valid names
    pub fn unknown_resort<S: Into<String>>(name: S, available: Vec<String>) -> Self {
        Self::UnknownResort {
            name: name.into(),
            available,
        }
    }

    /// Create a new invalid resort specification error
    pub fn invalid_spec<S: Into<String>>(message: S) -> Self {
        Self::InvalidSpec {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new notification error
    pub fn notification<S: Into<String>>(message: S) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PowdertimeError::Geocode { query, .. } => {
                format!("Could not determine location '{query}'. Check the city, state or zipcode in your config.")
            }
            PowdertimeError::UnknownResort { .. } | PowdertimeError::InvalidSpec { .. } => {
                self.to_string()
            }
            PowdertimeError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file.")
            }
            PowdertimeError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            PowdertimeError::Notification { message } => {
                format!("Failed to send notification: {message}")
            }
            PowdertimeError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            PowdertimeError::General { message } => message.clone(),
        }
    }
}
