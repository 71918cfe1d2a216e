//! Staff, date and slot availability.
//!
//! These lookups are advisory: a backend or decode failure is reported
//! as `Lookup::Failed` instead of an error so that one bad lookup
//! doesn't abort a larger workflow. Configuration problems and an
//! unparseable staff duration are still returned as errors.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::employees::EmployeeCache;
use crate::appointy::codec::{decode_delimited_list, decode_identifier_set};
use crate::appointy::queries::{
    CALENDAR_PAGE_DATES, CALENDAR_PAGE_SLOTS, CalendarPage, ImprovedAvailability, field,
};
use crate::appointy::{AvailabilityFilter, DurationSecs, TimeSlot, Transport};
use crate::core::Result;

const STAFF_WINDOW_DAYS: i64 = 30;
const AVAILABLE_SLOT: &str = "Available";
const IMPROVED_AVAILABILITY_PATH: &str = "/api/v1/appointment/availability/improved-services-employees";

/// Outcome of an advisory lookup. `Resolved(vec![])` means the backend
/// answered and nothing is available; `Failed` means it couldn't be
/// determined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Lookup<T> {
    Resolved { items: Vec<T> },
    Failed { reason: String },
}

impl<T> Lookup<T> {
    /// Items found, or nothing if the lookup failed.
    pub fn items(&self) -> &[T] {
        match self {
            Lookup::Resolved { items } => items,
            Lookup::Failed { .. } => &[],
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Lookup::Resolved { items } => items,
            Lookup::Failed { .. } => vec![],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Lookup::Failed { .. })
    }

    fn advisory(result: Result<Vec<T>>, what: &str) -> Result<Self> {
        match result {
            Ok(items) => Ok(Lookup::Resolved { items }),
            Err(e) if e.is_configuration() => Err(e),
            Err(e) => {
                tracing::warn!("Lookup of {} failed: {}", what, e);
                Ok(Lookup::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Filters and range for the date and slot lookups. `start` and `end`
/// are sent to the backend as given, except that a bare `YYYY-MM-DD`
/// end date is moved to the following day so the range includes it.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    #[serde(default)]
    pub employee_ids: BTreeSet<String>,
    #[serde(default)]
    pub service_ids: BTreeSet<String>,
    pub start: String,
    pub end: String,
}

impl AvailabilityQuery {
    fn time_slot(&self) -> TimeSlot {
        let end = day_after(&self.end).unwrap_or_else(|| self.end.clone());
        TimeSlot::new(&self.start, &end)
    }
}

fn day_after(value: &str) -> Option<String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()?
        .succ_opt()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

pub struct AvailabilityResolver {
    transport: Transport,
    employees: Arc<EmployeeCache>,
    consumer_id: String,
}

impl AvailabilityResolver {
    pub fn new(transport: Transport, employees: Arc<EmployeeCache>, consumer_id: &str) -> Self {
        Self {
            transport,
            employees,
            consumer_id: consumer_id.to_string(),
        }
    }

    /// The filter sent when looking up staff for a service: the next
    /// thirty days from `now`, for the requested duration.
    pub fn staff_filter(
        &self,
        service_id: &str,
        duration: DurationSecs,
        now: DateTime<Utc>,
    ) -> Result<AvailabilityFilter> {
        let scope = self.transport.context().business_scope()?;
        Ok(AvailabilityFilter {
            time_slot: TimeSlot::between(now, now + Duration::days(STAFF_WINDOW_DAYS)),
            duration: Some(duration),
            parent: scope.to_string(),
            employee_ids: BTreeSet::new(),
            service_ids: BTreeSet::from([service_id.to_string()]),
            consumer_id: self.consumer_id.clone(),
            list_employees: false,
        })
    }

    fn range_filter(&self, query: &AvailabilityQuery) -> Result<AvailabilityFilter> {
        let scope = self.transport.context().business_scope()?;
        Ok(AvailabilityFilter {
            time_slot: query.time_slot(),
            duration: None,
            parent: scope.to_string(),
            employee_ids: query.employee_ids.clone(),
            service_ids: query.service_ids.clone(),
            consumer_id: self.consumer_id.clone(),
            list_employees: false,
        })
    }

    /// Names of the staff who can take `service_id` for `duration`
    /// (e.g. `"1800s"`) in the next thirty days. Ids missing from the
    /// roster come back as `Unknown (<id>)`.
    pub async fn staff_for_service(&self, service_id: &str, duration: &str) -> Result<Lookup<String>> {
        let duration: DurationSecs = duration.parse()?;
        let filter = self.staff_filter(service_id, duration, Utc::now())?;
        Lookup::advisory(self.fetch_staff(&filter).await, "staff")
    }

    async fn fetch_staff(&self, filter: &AvailabilityFilter) -> Result<Vec<String>> {
        let resp = self
            .transport
            .request(
                Method::POST,
                IMPROVED_AVAILABILITY_PATH,
                &[],
                Some(&serde_json::to_value(filter)?),
            )
            .await?;
        let availability: ImprovedAvailability = serde_json::from_value(resp)?;

        let encoded = match availability.employee_ids.filter(|i| !i.trim().is_empty()) {
            Some(encoded) => encoded,
            None => return Ok(vec![]),
        };
        let available: BTreeSet<String> = decode_identifier_set(&encoded)?
            .into_iter()
            .filter_map(|(id, is_available)| is_available.then_some(id))
            .collect();
        if available.is_empty() {
            return Ok(vec![]);
        }

        let names = self
            .employees
            .resolve(available.iter().map(String::as_str))
            .await?;
        Ok(names.into_values().collect())
    }

    /// Dates in the range with at least one opening, as the backend
    /// formats them.
    pub async fn available_dates(&self, query: &AvailabilityQuery) -> Result<Lookup<String>> {
        let filter = self.range_filter(query)?;
        Lookup::advisory(self.fetch_dates(&filter).await, "available dates")
    }

    async fn fetch_dates(&self, filter: &AvailabilityFilter) -> Result<Vec<String>> {
        let data = self
            .transport
            .graphql(&CALENDAR_PAGE_DATES, json!({ "filter": filter }))
            .await?;
        let page: CalendarPage = field(&data, "calendarPage")?;
        match page.dates_status.filter(|i| !i.trim().is_empty()) {
            Some(encoded) => decode_delimited_list(&encoded),
            None => Ok(vec![]),
        }
    }

    /// Bookable slots in the range rendered as `start - end`.
    pub async fn available_slots(&self, query: &AvailabilityQuery) -> Result<Lookup<String>> {
        let filter = self.range_filter(query)?;
        Lookup::advisory(self.fetch_slots(&filter).await, "available slots")
    }

    async fn fetch_slots(&self, filter: &AvailabilityFilter) -> Result<Vec<String>> {
        let data = self
            .transport
            .graphql(&CALENDAR_PAGE_SLOTS, json!({ "filter": filter }))
            .await?;
        let page: CalendarPage = field(&data, "calendarPage")?;
        Ok(page
            .slots
            .into_iter()
            .filter(|slot| slot.slot_type == AVAILABLE_SLOT)
            .map(|slot| format!("{} - {}", slot.time_slot.start, slot.time_slot.end))
            .collect())
    }
}
