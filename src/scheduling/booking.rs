use serde::{Deserialize, Serialize};

use crate::core::{Result, SchedulingError};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookingLinkRequest {
    pub date: String,
    pub time: String,
    pub service_id: String,
    pub employee_id: String,
}

/// Deep link into the booking page with the slot preselected. Needs a
/// configured booking page; nothing is sent over the network.
pub fn generate_booking_link(base: Option<&str>, req: &BookingLinkRequest) -> Result<String> {
    let base = base
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .ok_or_else(|| SchedulingError::config("No booking link configured"))?;

    let separator = if base.contains('?') { '&' } else { '?' };
    Ok(format!(
        "{}{}date={}&time={}&service={}&employee={}",
        base,
        separator,
        urlencoding::encode(&req.date),
        urlencoding::encode(&req.time),
        urlencoding::encode(&req.service_id),
        urlencoding::encode(&req.employee_id),
    ))
}
