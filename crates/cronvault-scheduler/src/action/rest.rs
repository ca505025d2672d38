use std::sync::Arc;

use async_trait::async_trait;
use cronvault_protocols::{CONTENT_TYPE_JSON, CoreError, CoreResult, RestAction, TokenProvider};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use tracing::debug;
use url::Url;

use super::{ActionRunner, RunContext};

/// Header carrying the run's correlation id.
pub const CORRELATION_HEADER: &str = "X-Correlation-ID";

/// Issues one HTTP request per run.
pub struct RestRunner {
    client: Client,
    method: Method,
    url: Url,
    content_type: String,
    payload: String,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl RestRunner {
    pub fn compile(
        action: &RestAction,
        client: Client,
        token_provider: Option<Arc<dyn TokenProvider>>,
    ) -> CoreResult<Self> {
        let url = Url::parse(&action.address).map_err(|e| {
            CoreError::contract_invalid(format!("invalid REST address {:?}", action.address))
                .with_source(e)
        })?;

        let method = match action.method.to_uppercase().as_str() {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "PATCH" => Method::PATCH,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            _ => {
                return Err(CoreError::contract_invalid(format!(
                    "unsupported REST method: {}",
                    action.method
                )));
            }
        };

        let content_type = action
            .content_type
            .as_deref()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(CONTENT_TYPE_JSON)
            .to_string();

        Ok(Self {
            client,
            method,
            url,
            content_type,
            payload: action.payload.clone(),
            token_provider,
        })
    }
}

#[async_trait]
impl ActionRunner for RestRunner {
    async fn run(&self, ctx: &RunContext) -> CoreResult<()> {
        let mut request = self
            .client
            .request(self.method.clone(), self.url.clone())
            .header(CORRELATION_HEADER, &ctx.correlation_id);

        if !self.payload.is_empty() {
            request = request
                .header(CONTENT_TYPE, &self.content_type)
                .body(self.payload.clone());
        }

        if let Some(provider) = &self.token_provider {
            let token = provider
                .bearer_token()
                .await
                .map_err(|e| e.context("failed to obtain bearer token"))?;
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            CoreError::server(format!("{} {} failed", self.method, self.url)).with_source(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::server(format!(
                "{} {} returned {}",
                self.method, self.url, status
            )));
        }

        debug!("{} {} returned {}", self.method, self.url, status);
        Ok(())
    }
}
