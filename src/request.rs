use crate::error::TransportError;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::rc::Rc;

pub use portal_shared::protocol::HttpMethod;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::{HashMap, VecDeque};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器环境下的 Future 不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait::async_trait(?Send)]
impl<T: HttpClient + ?Sized> HttpClient for Rc<T> {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(req).await
    }
}

// =========================================================
// 实现层: reqwest 客户端 (Native)
// =========================================================

#[cfg(feature = "native")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

#[cfg(feature = "native")]
impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "native")]
#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in &req.headers {
            builder = builder.header(k, v);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::new(format!("{} {}: {}", req.method.as_str(), req.url, e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::new(format!("reading body of {}: {}", req.url, e)))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
#[derive(Clone)]
enum MockReply {
    Respond(u16, String),
    Fail(String),
}

/// 按 URL 排队的假响应；队列中最后一个响应会一直保留
#[cfg(test)]
#[derive(Default)]
pub struct MockHttpClient {
    responses: RefCell<HashMap<String, VecDeque<MockReply>>>,
    delays: RefCell<HashMap<String, std::time::Duration>>,
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.push(url, MockReply::Respond(status, body.to_string()));
    }

    pub fn mock_raw(&self, url: &str, status: u16, body: &str) {
        self.push(url, MockReply::Respond(status, body.to_string()));
    }

    pub fn mock_failure(&self, url: &str, message: &str) {
        self.push(url, MockReply::Fail(message.to_string()));
    }

    /// 响应前先 sleep，用于模拟慢请求
    pub fn mock_delay(&self, url: &str, delay: std::time::Duration) {
        self.delays.borrow_mut().insert(url.to_string(), delay);
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }

    fn push(&self, url: &str, reply: MockReply) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    fn next_reply(&self, url: &str) -> Option<MockReply> {
        let mut responses = self.responses.borrow_mut();
        let queue = responses.get_mut(url)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(req.clone());

        let delay = self.delays.borrow().get(&req.url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_reply(&req.url) {
            Some(MockReply::Respond(status, body)) => Ok(HttpResponse { status, body }),
            Some(MockReply::Fail(message)) => Err(TransportError::new(message)),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}
