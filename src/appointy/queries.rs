//! GraphQL documents and the wire shapes they return.

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::codec::DurationSecs;
use crate::core::Result;

/// Deserialize `data[key]`, treating a missing or null field as the
/// type's default.
pub fn field<T: DeserializeOwned + Default>(data: &Value, key: &str) -> Result<T> {
    match data.get(key) {
        Some(v) if !v.is_null() => Ok(serde_json::from_value(v.clone())?),
        _ => Ok(T::default()),
    }
}

/// A named GraphQL document. The name doubles as the request `id`.
#[derive(Debug)]
pub struct GraphqlOperation {
    pub name: &'static str,
    pub document: &'static str,
}

pub const IMPROVED_AVAILABILITY: GraphqlOperation = GraphqlOperation {
    name: "ImprovedAvailableServicesOrEmployeesQuery",
    document: r#"query ImprovedAvailableServicesOrEmployeesQuery($filter: AvailabilityFilter!) {
  improvedAvailableServicesOrEmployees(filter: $filter) {
    employeeIds
    serviceIds
  }
}"#,
};

pub const EMPLOYEE_NODES: GraphqlOperation = GraphqlOperation {
    name: "EmployeeNodesQuery",
    document: r#"query EmployeeNodesQuery($groupId: ID!, $ids: [ID!]!) {
  nodes(groupId: $groupId, ids: $ids) {
    __typename
    id
    ... on Employee {
      staffProfile {
        firstName
        lastName
      }
    }
  }
}"#,
};

pub const CALENDAR_PAGE_DATES: GraphqlOperation = GraphqlOperation {
    name: "CalendarPageQuery",
    document: r#"query CalendarPageQuery($filter: AvailabilityFilter!) {
  calendarPage(filter: $filter) {
    datesStatus
  }
}"#,
};

pub const CALENDAR_PAGE_SLOTS: GraphqlOperation = GraphqlOperation {
    name: "CalendarPageQuery",
    document: r#"query CalendarPageQuery($filter: AvailabilityFilter!) {
  calendarPage(filter: $filter) {
    slots {
      slotType
      timeSlot {
        start
        end
      }
    }
  }
}"#,
};

/// Half-open interval `[start, end)`, carried as the backend's strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
}

impl TimeSlot {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end: end.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityFilter {
    pub time_slot: TimeSlot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationSecs>,
    pub parent: String,
    pub employee_ids: BTreeSet<String>,
    pub service_ids: BTreeSet<String>,
    pub consumer_id: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub list_employees: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovedAvailability {
    #[serde(default)]
    pub employee_ids: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl StaffProfile {
    /// First and last name trimmed and joined by a single space.
    pub fn display_name(&self) -> String {
        [&self.first_name, &self.last_name]
            .into_iter()
            .filter_map(|i| i.as_deref().map(str::trim))
            .filter(|i| !i.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(rename = "__typename")]
    pub typename: String,
    pub id: String,
    #[serde(default)]
    pub staff_profile: Option<StaffProfile>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NodesResponse {
    #[serde(default)]
    pub nodes: Vec<Option<Node>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDescriptor {
    pub slot_type: String,
    pub time_slot: TimeSlot,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarPage {
    #[serde(default)]
    pub dates_status: Option<String>,
    #[serde(default)]
    pub slots: Vec<SlotDescriptor>,
}
