use std::any::Any;
use std::borrow::Cow;
use thiserror::Error;

/// Raised when the value of an absent/failed container (or the error of a
/// succeeded one) is read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValueNotProvided {
    message: Cow<'static, str>,
}

impl ValueNotProvided {
    pub const DEFAULT_MESSAGE: &'static str = "Value not provided.";

    pub fn new() -> Self {
        Self {
            message: Cow::Borrowed(Self::DEFAULT_MESSAGE),
        }
    }

    pub fn with_message(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for ValueNotProvided {
    fn default() -> Self {
        Self::new()
    }
}

/// A panic caught at a `handle` boundary, converted into a failure value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("factory panicked: {message}")]
pub struct Panicked {
    message: String,
}

impl Panicked {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Extracts the panic message from a payload returned by
    /// `std::panic::catch_unwind`.
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "non-string panic payload".to_string(),
            },
        };

        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
