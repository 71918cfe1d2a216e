use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde_json::{Value, json};

use super::queries::GraphqlOperation;
use crate::core::{Context, Result, SchedulingError};

/// Authenticated HTTP access to the Appointy REST and GraphQL APIs.
///
/// Stateless apart from the connection pool, so one instance is shared
/// by every operation of a client.
#[derive(Clone, Debug)]
pub struct Transport {
    client: Client,
    context: Context,
}

impl Transport {
    pub fn new(context: Context, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, context })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.context.base_url, path)).map_err(|e| {
            SchedulingError::config(format!("Invalid API base url '{}': {}", self.context.base_url, e))
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Issue a REST call. The payload is sent as the JSON body; a
    /// non-2xx response becomes `SchedulingError::Backend`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        payload: Option<&Value>,
    ) -> Result<Value> {
        let url = self.url(path, query)?;
        tracing::debug!("{} {}", method, url);

        let mut req = self
            .client
            .request(method, url)
            .bearer_auth(&self.context.credential)
            .header("Content-Type", "application/json");
        if let Some(body) = payload {
            req = req.json(body);
        }

        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(SchedulingError::Backend {
                status: status.as_u16(),
                body: res.text().await.unwrap_or_default(),
            });
        }
        let text = res.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// POST a GraphQL document to `/graphql` and return its `data`
    /// object. GraphQL-level errors are reported as backend errors even
    /// when the HTTP status is 200.
    pub async fn graphql(&self, operation: &GraphqlOperation, variables: Value) -> Result<Value> {
        let payload = json!({
            "id": operation.name,
            "query": operation.document,
            "variables": variables,
        });
        let resp = self
            .request(Method::POST, "/graphql", &[], Some(&payload))
            .await?;

        if let Some(errors) = resp["errors"].as_array()
            && !errors.is_empty()
        {
            return Err(SchedulingError::Backend {
                status: 200,
                body: Value::Array(errors.clone()).to_string(),
            });
        }

        match resp.get("data") {
            Some(data) if !data.is_null() => Ok(data.clone()),
            _ => Err(SchedulingError::Backend {
                status: 200,
                body: format!("{} returned no data", operation.name),
            }),
        }
    }
}
