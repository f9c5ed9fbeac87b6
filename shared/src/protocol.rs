use crate::{Credentials, ErrorBody, LoginResponse, ServiceStatus, User};
use serde::{Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (or suffix).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the session token must be attached.
    const AUTHORIZED: bool;
}

// =========================================================
// Request Definitions
// =========================================================

/// Log in with username and password
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct LoginRequest(pub Credentials);

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const PATH: &'static str = "/login";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHORIZED: bool = false;
}

/// Create an account. A 2xx body may still carry an `error` field.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct RegisterRequest(pub Credentials);

impl ApiRequest for RegisterRequest {
    type Response = ErrorBody;
    const PATH: &'static str = "/register";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHORIZED: bool = false;
}

/// List all users
#[derive(Debug, Serialize)]
pub struct ListUsersRequest;

impl ApiRequest for ListUsersRequest {
    type Response = Vec<User>;
    const PATH: &'static str = "/users";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHORIZED: bool = true;
}

/// Status of every registered backend service
#[derive(Debug, Serialize)]
pub struct ServicesStatusRequest;

impl ApiRequest for ServicesStatusRequest {
    type Response = Vec<ServiceStatus>;
    const PATH: &'static str = "/services";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHORIZED: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_serialize_flat() {
        let body = serde_json::to_value(LoginRequest(Credentials::new("alice", "pw"))).unwrap();
        assert_eq!(body, serde_json::json!({"username": "alice", "password": "pw"}));
    }
}
