//! Client for the pet-owner registry REST service.
//!
//! Each endpoint is split into a `build_*` step producing an [`HttpRequest`]
//! and a `parse_*` step consuming an [`HttpResponse`]. The async methods glue
//! the two together around a blocking `ureq` round-trip executed on tokio's
//! blocking pool. There is no retry, caching or batching; every failure is
//! returned to the caller as an [`ApiError`].

mod error;
mod http;
#[cfg(test)]
pub mod mock;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{Client, ClientPayload};

pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub fn build_list_clients(&self, search: Option<&str>) -> HttpRequest {
        let request = HttpRequest::new(HttpMethod::Get, self.url("clientes"));
        match search.map(str::trim).filter(|term| !term.is_empty()) {
            Some(term) => request.with_query("search", term),
            None => request,
        }
    }

    pub fn build_get_client(&self, id: i64) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.url(&id.to_string()))
    }

    pub fn build_create_client(&self, payload: &ClientPayload) -> Result<HttpRequest, ApiError> {
        // The server assigns ids; never send one on create.
        let payload = ClientPayload {
            id: None,
            ..payload.clone()
        };
        let body = to_json(&payload)?;
        Ok(HttpRequest::new(HttpMethod::Post, self.url("cadastrar")).with_json(body))
    }

    pub fn build_update_client(&self, payload: &ClientPayload) -> Result<HttpRequest, ApiError> {
        let body = to_json(payload)?;
        Ok(HttpRequest::new(HttpMethod::Put, self.url("atualizar")).with_json(body))
    }

    pub fn build_delete_client(&self, id: i64) -> Result<HttpRequest, ApiError> {
        let body = to_json(&serde_json::json!({ "id": id }))?;
        Ok(HttpRequest::new(HttpMethod::Delete, self.url("excluir")).with_json(body))
    }

    pub fn parse_list_clients(&self, response: HttpResponse) -> Result<Vec<Client>, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_client(&self, response: HttpResponse) -> Result<Client, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_delete_client(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub async fn list_clients(&self, search: Option<&str>) -> Result<Vec<Client>, ApiError> {
        let request = self.build_list_clients(search);
        let response = self.execute(request).await?;
        self.parse_list_clients(response)
    }

    pub async fn get_client(&self, id: i64) -> Result<Client, ApiError> {
        let request = self.build_get_client(id);
        let response = self.execute(request).await?;
        self.parse_client(response)
    }

    pub async fn create_client(&self, payload: &ClientPayload) -> Result<Client, ApiError> {
        let request = self.build_create_client(payload)?;
        let response = self.execute(request).await?;
        self.parse_client(response)
    }

    pub async fn update_client(&self, payload: &ClientPayload) -> Result<Client, ApiError> {
        let request = self.build_update_client(payload)?;
        let response = self.execute(request).await?;
        self.parse_client(response)
    }

    pub async fn delete_client(&self, id: i64) -> Result<(), ApiError> {
        let request = self.build_delete_client(id)?;
        let response = self.execute(request).await?;
        self.parse_delete_client(response)
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || send(&agent, request))
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
    }
}

fn send(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, ApiError> {
    debug!(method = ?request.method, url = %request.url, "sending request");

    let HttpRequest {
        method,
        url,
        query,
        headers,
        body,
    } = request;

    let result = match (method, body) {
        (HttpMethod::Get, _) => prepare(agent.get(&url), &query, &headers).call(),
        (HttpMethod::Post, body) => {
            let body = body.unwrap_or_default();
            prepare(agent.post(&url), &query, &headers).send(body.as_bytes())
        }
        (HttpMethod::Put, body) => {
            let body = body.unwrap_or_default();
            prepare(agent.put(&url), &query, &headers).send(body.as_bytes())
        }
        (HttpMethod::Delete, Some(body)) => {
            prepare(agent.delete(&url).force_send_body(), &query, &headers).send(body.as_bytes())
        }
        (HttpMethod::Delete, None) => prepare(agent.delete(&url), &query, &headers).call(),
    };

    let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    debug!(status, "received response");
    Ok(HttpResponse { status, body })
}

fn prepare<B>(
    mut builder: ureq::RequestBuilder<B>,
    query: &[(String, String)],
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in query {
        builder = builder.query(key, value);
    }
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
