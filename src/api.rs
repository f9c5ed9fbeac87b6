use crate::error::ApiError;
use crate::request::{HttpClient, HttpMethod, HttpRequest};
use portal_shared::protocol::{
    ApiRequest, ListUsersRequest, LoginRequest, RegisterRequest, ServicesStatusRequest,
};
use portal_shared::{
    CONTENT_TYPE_JSON, Credentials, ErrorBody, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE,
    LoginResponse, ServiceStatus, User,
};

/// 后端 API 网关
///
/// 接受任何实现了 `HttpClient` 的客户端，从而解耦了具体的 HTTP 实现。
#[derive(Clone, Debug)]
pub struct PortalApi<C> {
    base_url: String,
    client: C,
}

impl<C: HttpClient> PortalApi<C> {
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送一个类型化的请求
    ///
    /// POST 请求以 JSON 发送请求体；`R::AUTHORIZED` 的请求带上会话 token。
    /// 非 2xx 响应尽量解析出服务端的 `error` 字段。
    pub async fn call<R: ApiRequest>(
        &self,
        request: &R,
        token: Option<&str>,
    ) -> Result<R::Response, ApiError> {
        let mut req = HttpRequest::new(&self.url(R::PATH), R::METHOD);

        if R::METHOD == HttpMethod::Post {
            let body = serde_json::to_string(request).map_err(ApiError::Encode)?;
            req = req
                .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_body(body);
        }

        if R::AUTHORIZED {
            if let Some(token) = token {
                req = req.with_header(HEADER_AUTHORIZATION, token);
            }
        }

        let resp = self.client.send(req).await?;

        if !resp.is_success() {
            let message = resp.json::<ErrorBody>().ok().and_then(|body| body.error);
            return Err(ApiError::Status {
                status: resp.status,
                message,
            });
        }

        resp.json::<R::Response>().map_err(ApiError::Decode)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.call(&LoginRequest(credentials.clone()), None).await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<ErrorBody, ApiError> {
        self.call(&RegisterRequest(credentials.clone()), None).await
    }

    pub async fn list_users(&self, token: &str) -> Result<Vec<User>, ApiError> {
        self.call(&ListUsersRequest, Some(token)).await
    }

    pub async fn services_status(&self, token: &str) -> Result<Vec<ServiceStatus>, ApiError> {
        self.call(&ServicesStatusRequest, Some(token)).await
    }
}
