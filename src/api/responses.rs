use serde::{Deserialize, Serialize};

use super::error::ApiError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub struct ReverseRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReverseResponse {
    pub reversed: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, Debug)]
pub struct Endpoint {
    pub path: &'static str,
    pub method: &'static str,
    pub description: &'static str,
}

#[derive(Serialize, Debug)]
pub struct HomeResponse {
    pub message: &'static str,
    pub endpoints: Vec<Endpoint>,
    pub project_info: &'static str,
}

/// Status code plus a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

pub fn respond_with_json<T: Serialize>(status: u16, payload: &T) -> Reply {
    match serde_json::to_string(payload) {
        Ok(body) => Reply { status, body },
        Err(e) => Reply {
            status: 500,
            body: serde_json::json!({ "error": e.to_string() }).to_string(),
        },
    }
}

pub fn respond_with_error(err: &ApiError) -> Reply {
    respond_with_json(
        err.status(),
        &ErrorResponse {
            error: err.to_string(),
        },
    )
}
