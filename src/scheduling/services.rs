use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::appointy::{DurationSecs, Transport};
use crate::core::{Result, SchedulingError};

const SERVICES_PATH: &str = "/api/v1/services:all";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Backend-native durations such as `"1800s"`. The first entry is
    /// the service's duration.
    #[serde(default)]
    pub duration: Vec<String>,
}

impl Service {
    pub fn duration(&self) -> Result<DurationSecs> {
        match self.duration.first() {
            Some(raw) => raw.parse(),
            None => Err(SchedulingError::format(format!(
                "Service {} has no duration",
                self.id
            ))),
        }
    }

    /// Human readable summary. A duration that can't be parsed is shown
    /// as unknown rather than failing the whole summary.
    pub fn summary(&self) -> String {
        let duration = match self.duration() {
            Ok(d) => format!("{} minutes", d.minutes()),
            Err(e) => {
                tracing::debug!("Unreadable duration for service {}: {}", self.id, e);
                String::from("unknown")
            }
        };
        let description = if self.description.trim().is_empty() {
            "No description"
        } else {
            self.description.trim()
        };
        format!(
            "## {}\nID: {}\nDescription: {}\nDuration: {}",
            self.title, self.id, description, duration
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListServicesResponse {
    #[serde(default)]
    services: Vec<Service>,
}

pub async fn list_services(transport: &Transport) -> Result<Vec<Service>> {
    let scope = transport.context().business_scope()?;
    let resp = transport
        .request(
            Method::GET,
            SERVICES_PATH,
            &[("parent", scope.as_str())],
            None,
        )
        .await?;
    let resp: ListServicesResponse = serde_json::from_value(resp)?;
    Ok(resp.services)
}

pub async fn get_service_info(transport: &Transport, service_id: &str) -> Result<String> {
    let services = list_services(transport).await?;
    Ok(services
        .iter()
        .find(|s| s.id == service_id)
        .map(Service::summary)
        .unwrap_or_else(|| format!("No service found with id {}", service_id)))
}
