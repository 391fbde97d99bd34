//! Error types for the tokenizer and interpreter layers.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides
//! [`InterpretError`] and its conversion to [`TextError`].

use textmark_core::TextError;
use thiserror::Error;

/// Error type for content-stream tokenizing and interpretation.
///
/// Most variants describe a single recoverable fault; the interpreter turns
/// them into warnings and keeps going. They surface as errors only from the
/// strict entry points or when the whole page is unusable.
#[derive(Debug, Error)]
pub enum InterpretError {
    /// A malformed token in the content stream.
    #[error("malformed token at byte {offset}: {message}")]
    Tokenize { offset: usize, message: String },

    /// An operator whose operands are missing or of the wrong type.
    #[error("bad operands for `{operator}`: {message}")]
    Operand { operator: String, message: String },

    /// Error resolving font or encoding information.
    #[error("font error: {0}")]
    Font(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] TextError),
}

impl InterpretError {
    pub(crate) fn tokenize(offset: usize, message: impl Into<String>) -> Self {
        InterpretError::Tokenize {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn operand(operator: &str, message: impl Into<String>) -> Self {
        InterpretError::Operand {
            operator: operator.to_string(),
            message: message.into(),
        }
    }
}

impl From<InterpretError> for TextError {
    fn from(err: InterpretError) -> Self {
        match err {
            InterpretError::Tokenize { .. } => TextError::StreamDecode(err.to_string()),
            InterpretError::Operand { .. } | InterpretError::Font(_) => {
                TextError::Other(err.to_string())
            }
            InterpretError::Core(e) => e,
        }
    }
}
