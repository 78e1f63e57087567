use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON body returned for every failed request.
///
/// Successful responses carry the bare resource, so only the error side
/// needs an envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    #[schema(value_type = Option<Object>)]
    pub data: Option<()>,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error_msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: error_msg.into(),
        }
    }
}

/// Response for the `/headpat` health check endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct HeadpatResponse {
    pub message: &'static str,
}
