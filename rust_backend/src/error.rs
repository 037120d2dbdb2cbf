//! Error types for the Knox test pipeline.
//!
//! Every failure in the core is an invariant violation on already-validated
//! input, so errors carry enough context to find the offending step and are
//! never retried.

use std::fmt;

/// Result type for Knox pipeline operations
pub type KnoxResult<T> = Result<T, KnoxError>;

/// Structured context for pipeline errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "build_store", "compute_statistics")
    pub operation: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for the Knox pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KnoxError {
    /// Input rejected before any arithmetic: too few points, duplicate ids,
    /// malformed coordinates, or a statistic that is undefined for the data.
    #[error("Input error: {message} {context}")]
    InputError {
        message: String,
        context: ErrorContext,
    },

    /// Arithmetic produced a value outside its mathematical domain
    /// (negative variance).
    #[error("Domain error: {message} {context}")]
    DomainError {
        message: String,
        context: ErrorContext,
    },

    /// Thresholds or configuration file are invalid.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },
}

impl KnoxError {
    /// Create an input error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::InputError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an input error with context.
    pub fn input_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::InputError {
            message: message.into(),
            context,
        }
    }

    /// Create a domain error.
    pub fn domain(message: impl Into<String>) -> Self {
        Self::DomainError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a domain error with context.
    pub fn domain_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::DomainError {
            message: message.into(),
            context,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a configuration error with context.
    pub fn configuration_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context,
        }
    }

    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InputError { .. })
    }

    pub fn is_domain_error(&self) -> bool {
        matches!(self, Self::DomainError { .. })
    }

    /// Get the error message without context.
    pub fn message(&self) -> &str {
        match self {
            Self::InputError { message, .. }
            | Self::DomainError { message, .. }
            | Self::ConfigurationError { message, .. } => message,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::InputError { context, .. }
            | Self::DomainError { context, .. }
            | Self::ConfigurationError { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::InputError { context, .. }
            | Self::DomainError { context, .. }
            | Self::ConfigurationError { context, .. } => {
                context.operation = Some(operation.into());
            }
        }
        self
    }
}
