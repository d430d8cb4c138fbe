use tracing::{debug, info};

use crate::{
    factorial,
    proto::Method,
    services,
    storage::NumericStore,
};

pub mod error;
pub mod responses;

use error::ApiError;
use responses::{
    respond_with_error, respond_with_json, Endpoint, HomeResponse, MessageResponse, Reply,
    ReverseRequest, ReverseResponse,
};

const FACTORIAL_PREFIX: &str = "/factorial/";

/// Dispatches a request by path and renders the outcome as a JSON reply.
pub fn route<S: NumericStore + ?Sized>(
    method: Method,
    path: &str,
    body: Option<&str>,
    store: &S,
) -> Reply {
    let result = match path {
        "/" => home(method),
        "/hello" => hello(method),
        "/reverse" => reverse(method, body),
        _ => match path.strip_prefix(FACTORIAL_PREFIX) {
            Some(param) => factorial(method, param, store),
            None => Err(ApiError::InvalidRoute),
        },
    };

    match result {
        Ok(reply) => reply,
        Err(e) => {
            debug!(?method, path, error = %e, "request rejected");
            respond_with_error(&e)
        }
    }
}

fn home(method: Method) -> Result<Reply, ApiError> {
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let response = HomeResponse {
        message: "Welcome to the API! Here are some useful endpoints:",
        endpoints: vec![
            Endpoint {
                path: "/hello",
                method: "GET",
                description: "Returns a greeting message.",
            },
            Endpoint {
                path: "/reverse",
                method: "POST",
                description: "Reverses the provided text.",
            },
            Endpoint {
                path: "/factorial/{n}",
                method: "GET",
                description: "Calculates the factorial of n.",
            },
        ],
        project_info: "Factorials are computed with arbitrary precision and memoized in a \
            shared in-memory store that every connection reads and extends.",
    };

    Ok(respond_with_json(200, &response))
}

fn hello(method: Method) -> Result<Reply, ApiError> {
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let response = MessageResponse {
        message: services::hello_message().to_owned(),
    };
    Ok(respond_with_json(200, &response))
}

fn reverse(method: Method, body: Option<&str>) -> Result<Reply, ApiError> {
    if method != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    let req: ReverseRequest = body
        .and_then(|b| serde_json::from_str(b).ok())
        .ok_or(ApiError::InvalidPayload)?;

    if req.text.is_empty() {
        return Err(ApiError::EmptyText);
    }

    let response = ReverseResponse {
        reversed: services::reverse_message(&req.text),
    };
    Ok(respond_with_json(200, &response))
}

fn factorial<S: NumericStore + ?Sized>(
    method: Method,
    param: &str,
    store: &S,
) -> Result<Reply, ApiError> {
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let n = parse_index(param)?;

    info!(n, "factorial requested");
    let value = factorial::compute(n, store);

    let response = MessageResponse {
        message: value.to_string(),
    };
    Ok(respond_with_json(200, &response))
}

/// Parses a factorial index. A minus sign is accepted only on zero.
fn parse_index(param: &str) -> Result<u64, ApiError> {
    match param.strip_prefix('-') {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b == b'0') => Ok(0),
        Some(_) => Err(ApiError::InvalidNumber),
        None => param.parse().map_err(|_| ApiError::InvalidNumber),
    }
}
