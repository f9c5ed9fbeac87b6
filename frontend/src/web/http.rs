//! HTTP 请求封装模块
//!
//! 使用 `gloo-net` 的 fetch 封装实现核心库的 `HttpClient`。

use gloo_net::http::Request;
use portal::TransportError;
use portal::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};

/// 浏览器 fetch 客户端
#[derive(Clone, Copy, Default)]
pub struct FetchHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
        };

        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let response = match req.body {
            Some(body) => {
                builder
                    .body(body)
                    .map_err(|e| TransportError::new(format!("请求构建失败: {}", e)))?
                    .send()
                    .await
            }
            None => builder.send().await,
        }
        .map_err(|e| TransportError::new(format!("网络错误: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(format!("响应解析失败: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}
