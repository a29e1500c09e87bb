use anyhow::{Context, Result};
use crux_http::protocol::{HttpRequest, HttpResponse, HttpResult};
use crux_http::HttpError;
use log::debug;
use reqwest::{Client, Method};
use std::time::Duration;

/// Create the HTTP client used for all device requests
pub fn device_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to create device HTTP client")
}

/// Execute an HTTP effect requested by the core
///
/// Every outcome is reported back to the core: a response of any status is
/// `HttpResult::Ok`, transport failures become `HttpResult::Err`.
pub async fn execute(client: &Client, request: &HttpRequest) -> HttpResult {
    match send(client, request).await {
        Ok(response) => HttpResult::Ok(response),
        Err(e) => {
            debug!("{} {} failed: {e}", request.method, request.url);
            HttpResult::Err(e)
        }
    }
}

async fn send(client: &Client, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
    let method = Method::from_bytes(request.method.as_bytes())
        .map_err(|e| HttpError::Url(format!("invalid method {}: {e}", request.method)))?;

    let mut builder = client.request(method, request.url.as_str());
    for header in &request.headers {
        builder = builder.header(header.name.as_str(), header.value.as_str());
    }
    if !request.body.is_empty() {
        builder = builder.body(request.body.clone());
    }

    let response = builder.send().await.map_err(map_reqwest_error)?;
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(map_reqwest_error)?;

    debug!("{} {} -> {status}", request.method, request.url);

    Ok(HttpResponse::status(status).body(body.to_vec()).build())
}

fn map_reqwest_error(error: reqwest::Error) -> HttpError {
    if error.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Io(error.to_string())
    }
}
