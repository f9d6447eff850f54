use anyhow::{Context, Result};
use crux_http::protocol::{HttpHeader, HttpRequest, HttpResponse};
use log::info;
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use reqwest::{Client, Method};
use trait_variant::make;
use wifi_portal_core::BASE_URL;

/// Executes the core's HTTP effects against the device
#[make(Send)]
#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait DeviceClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[derive(Clone)]
pub struct ReqwestDeviceClient {
    client: Client,
    device_url: String,
}

impl ReqwestDeviceClient {
    pub fn new(device_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            client,
            device_url: device_url.trim_end_matches('/').to_string(),
        })
    }

    /// Replace the core's placeholder origin with the device address
    fn device_url(&self, url: &str) -> String {
        let path = url.strip_prefix(BASE_URL).unwrap_or(url);
        format!("{}/{}", self.device_url, path.trim_start_matches('/'))
    }
}

impl DeviceClient for ReqwestDeviceClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.device_url(&request.url);
        info!("{} {url}", request.method);

        let method = Method::from_bytes(request.method.as_bytes())
            .context(format!("invalid HTTP method {}", request.method))?;

        let mut builder = self.client.request(method, &url);
        for HttpHeader { name, value } in request.headers {
            builder = builder.header(name, value);
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let res = builder
            .send()
            .await
            .context(format!("failed to send request to {url}"))?;

        let status = res.status().as_u16();
        let body = res
            .bytes()
            .await
            .context("failed to read response body")?;

        Ok(HttpResponse::status(status).body(body.to_vec()).build())
    }
}
