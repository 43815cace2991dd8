use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire shape of every failure response
///
/// ```json
/// { "success": false, "error": { "message": "...", "status": 404, "details": [] } }
/// ```
///
/// `details` is omitted from the JSON entirely when there are none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
}

/// Inner `error` object of [`ErrorEnvelope`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    pub fn new(status: u16, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                message: message.into(),
                status,
                details,
            },
        }
    }
}
