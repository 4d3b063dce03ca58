// ============================================================================
// ERRORS - Composition errors and wrapped-library errors
// ============================================================================

use thiserror::Error;

/// Error raised by the wrapped mapping library. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct LibraryError {
    pub message: String,
}

impl LibraryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<wasm_bindgen::JsValue> for LibraryError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        Self { message }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    /// A structurally required field was absent at construction. Always a
    /// usage error in how the component tree was composed.
    #[error("{component} requires `{field}` but it was not provided")]
    MissingRequiredContext {
        component: &'static str,
        field: &'static str,
    },

    #[error(transparent)]
    Library(#[from] LibraryError),
}

impl AdapterError {
    pub fn missing(component: &'static str, field: &'static str) -> Self {
        AdapterError::MissingRequiredContext { component, field }
    }

    /// Name of the missing field, if this is a composition error.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            AdapterError::MissingRequiredContext { field, .. } => Some(field),
            AdapterError::Library(_) => None,
        }
    }
}

pub type AdapterResult<T> = Result<T, AdapterError>;
pub type LibraryResult<T> = Result<T, LibraryError>;
