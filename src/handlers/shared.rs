use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// JSON envelope of every API response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: Option<T>, message: &str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.to_string()),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

impl<'a> ApiResponse<&'a ValidationError> {
    /// A rejected input. The message is shown to the user; the data names
    /// the offending field, if any.
    pub fn rejected(error: &'a ValidationError) -> Self {
        Self {
            success: false,
            message: Some(error.message.clone()),
            data: Some(error),
        }
    }
}
