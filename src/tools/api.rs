use std::sync::Arc;

use anyhow::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::catalog::{Method, catalog};
use super::{BoxedToolCall, Function, Properties, ToolCall, ToolType};
use crate::core::Actions;
use crate::scheduling::{
    AppointyClient, AvailabilityQuery, BookingLinkRequest, CreateAppointment, UpdateAppointment,
};

#[derive(Deserialize)]
struct StaffInfoArgs {
    service_id: String,
    duration: String,
}

#[derive(Deserialize)]
struct ServiceInfoArgs {
    service_id: String,
}

fn parse_args<T: DeserializeOwned>(args: &str) -> Result<T> {
    let args = if args.trim().is_empty() { "{}" } else { args };
    Ok(serde_json::from_str(args)?)
}

/// Runs scheduling operations by method name with JSON arguments and
/// returns the result as a JSON string.
pub struct AppointyApi {
    client: AppointyClient,
}

impl AppointyApi {
    pub fn new(client: AppointyClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AppointyClient {
        &self.client
    }

    pub async fn run(&self, method: &str, args: &str) -> Result<String> {
        self.run_method(method.parse()?, args).await
    }

    pub async fn run_method(&self, method: Method, args: &str) -> Result<String> {
        let client = &self.client;
        let out = match method {
            Method::CreateAppointment => {
                let args: CreateAppointment = parse_args(args)?;
                serde_json::to_string(&client.create_appointment(&args).await?)?
            }
            Method::ListAppointments => serde_json::to_string(&client.list_appointments().await?)?,
            Method::UpdateAppointment => {
                let args: UpdateAppointment = parse_args(args)?;
                serde_json::to_string(&client.update_appointment(&args).await?)?
            }
            Method::ListServices => serde_json::to_string(&client.list_services().await?)?,
            Method::GetStaffInfo => {
                let args: StaffInfoArgs = parse_args(args)?;
                let staff = client.get_staff_info(&args.service_id, &args.duration).await?;
                serde_json::to_string(&staff)?
            }
            Method::GetServiceInfo => {
                let args: ServiceInfoArgs = parse_args(args)?;
                serde_json::to_string(&client.get_service_info(&args.service_id).await?)?
            }
            Method::GetAvailableDates => {
                let args: AvailabilityQuery = parse_args(args)?;
                serde_json::to_string(&client.get_available_dates(&args).await?)?
            }
            Method::GetAvailableSlots => {
                let args: AvailabilityQuery = parse_args(args)?;
                serde_json::to_string(&client.get_available_slots(&args).await?)?
            }
            Method::GenerateBookingLink => {
                let args: BookingLinkRequest = parse_args(args)?;
                serde_json::to_string(&client.generate_booking_link(&args)?)?
            }
        };
        Ok(out)
    }
}

#[derive(Serialize)]
pub struct AppointyTool {
    pub r#type: ToolType,
    pub function: Function<Properties>,
    #[serde(skip)]
    method: Method,
    #[serde(skip)]
    display_name: &'static str,
    #[serde(skip)]
    api: Arc<AppointyApi>,
}

impl AppointyTool {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn display_name(&self) -> &str {
        self.display_name
    }
}

#[async_trait]
impl ToolCall for AppointyTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        tracing::debug!("Tool call: {}\nargs: {}", self.method, args);
        self.api.run_method(self.method, args).await
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }
}

/// Tools whose permission is granted by `actions`. Anything not
/// explicitly granted is left out.
pub fn toolkit(api: Arc<AppointyApi>, actions: &Actions) -> Vec<BoxedToolCall> {
    catalog()
        .into_iter()
        .filter(|def| actions.allows(&def.permission()))
        .map(|def| {
            Box::new(AppointyTool {
                r#type: ToolType::Function,
                function: def.function,
                method: def.method,
                display_name: def.name,
                api: api.clone(),
            }) as BoxedToolCall
        })
        .collect()
}
