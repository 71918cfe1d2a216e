use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::appointy::Transport;
use crate::core::Result;

const APPOINTMENTS_PATH: &str = "/api/v1/appointments";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub customer_name: String,
    pub customer_email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateAppointment {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub customer_name: String,
    pub customer_email: String,
}

/// Only the fields that are set are sent to the backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateAppointment {
    #[serde(skip_serializing)]
    pub appointment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

pub async fn create_appointment(
    transport: &Transport,
    appointment: &CreateAppointment,
) -> Result<Appointment> {
    let body = serde_json::to_value(appointment)?;
    let resp = transport
        .request(Method::POST, APPOINTMENTS_PATH, &[], Some(&body))
        .await?;
    Ok(serde_json::from_value(resp)?)
}

pub async fn list_appointments(transport: &Transport) -> Result<Vec<Appointment>> {
    let resp = transport
        .request(Method::GET, APPOINTMENTS_PATH, &[], None)
        .await?;
    Ok(serde_json::from_value(resp)?)
}

pub async fn update_appointment(
    transport: &Transport,
    update: &UpdateAppointment,
) -> Result<Appointment> {
    let path = format!(
        "{}/{}",
        APPOINTMENTS_PATH,
        urlencoding::encode(&update.appointment_id)
    );
    let body = serde_json::to_value(update)?;
    let resp = transport
        .request(Method::PUT, &path, &[], Some(&body))
        .await?;
    Ok(serde_json::from_value(resp)?)
}
