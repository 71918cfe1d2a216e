//! Employee id <-> display name mapping.
//!
//! The backend only hands out opaque employee ids in availability
//! results, so names are resolved through a second lookup and memoized
//! for the life of the client. Population is lazy and single-flight:
//! the lock is held across the whole load so concurrent callers wait for
//! and then share one completed roster.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

use crate::appointy::codec::decode_identifier_set;
use crate::appointy::queries::{
    EMPLOYEE_NODES, IMPROVED_AVAILABILITY, ImprovedAvailability, NodesResponse, field,
};
use crate::appointy::{AvailabilityFilter, TimeSlot, Transport};
use crate::core::Result;

/// How far ahead the roster query looks. Wide enough that every active
/// employee shows up regardless of bookable slots.
const ROSTER_HORIZON_DAYS: i64 = 180;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeIdentity {
    pub display_name: String,
    pub backend_id: String,
}

impl EmployeeIdentity {
    pub fn new(backend_id: &str, display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            backend_id: backend_id.to_string(),
        }
    }
}

/// Label used for ids the roster doesn't know about.
pub fn unknown_label(id: &str) -> String {
    format!("Unknown ({})", id)
}

/// Where the cache gets its roster from. Swappable so the cache can be
/// exercised without a backend.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn load_roster(&self) -> Result<Vec<EmployeeIdentity>>;
}

#[derive(Default)]
struct Roster {
    by_id: HashMap<String, String>,
    by_name: HashMap<String, String>,
    loaded_at: Option<Instant>,
}

impl Roster {
    fn is_fresh(&self, ttl: Option<Duration>) -> bool {
        match (self.loaded_at, ttl) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(at), Some(ttl)) => at.elapsed() < ttl,
        }
    }

    /// Later entries win: a repeated id takes the newest name and a
    /// repeated name points at the newest id.
    fn replace(&mut self, identities: Vec<EmployeeIdentity>) {
        self.by_id.clear();
        self.by_name.clear();
        for identity in identities {
            if let Some(old_name) = self
                .by_id
                .insert(identity.backend_id.clone(), identity.display_name.clone())
                && old_name != identity.display_name
                && self.by_name.get(&old_name) == Some(&identity.backend_id)
            {
                self.by_name.remove(&old_name);
            }
            self.by_name.insert(identity.display_name, identity.backend_id);
        }
        self.loaded_at = Some(Instant::now());
    }
}

pub struct EmployeeCache {
    source: Box<dyn RosterSource>,
    ttl: Option<Duration>,
    roster: Mutex<Roster>,
}

impl EmployeeCache {
    pub fn new(source: impl RosterSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            ttl: None,
            roster: Mutex::new(Roster::default()),
        }
    }

    /// Re-populate on the next lookup once `ttl` has passed. Without a
    /// ttl the roster lives as long as the cache.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    async fn loaded(&self) -> Result<MutexGuard<'_, Roster>> {
        let mut roster = self.roster.lock().await;
        if !roster.is_fresh(self.ttl) {
            let identities = self.source.load_roster().await?;
            tracing::info!("Loaded {} employees into roster cache", identities.len());
            roster.replace(identities);
        }
        Ok(roster)
    }

    /// Map each id to its display name, or to `Unknown (<id>)` when the
    /// roster has no entry for it.
    pub async fn resolve<'a, I>(&self, ids: I) -> Result<BTreeMap<String, String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let roster = self.loaded().await?;
        Ok(ids
            .into_iter()
            .map(|id| {
                let name = roster
                    .by_id
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| unknown_label(id));
                (id.to_string(), name)
            })
            .collect())
    }

    pub async fn resolve_name(&self, name: &str) -> Result<Option<String>> {
        let roster = self.loaded().await?;
        Ok(roster.by_name.get(name.trim()).cloned())
    }

    /// Drop the roster so the next lookup loads it again.
    pub async fn invalidate(&self) {
        *self.roster.lock().await = Roster::default();
    }

    pub async fn len(&self) -> usize {
        self.roster.lock().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Loads the roster from the backend: list every employee id known to
/// the business, then look up their staff profiles.
pub struct BackendRoster {
    transport: Transport,
    consumer_id: String,
}

impl BackendRoster {
    pub fn new(transport: Transport, consumer_id: &str) -> Self {
        Self {
            transport,
            consumer_id: consumer_id.to_string(),
        }
    }
}

#[async_trait]
impl RosterSource for BackendRoster {
    async fn load_roster(&self) -> Result<Vec<EmployeeIdentity>> {
        let scope = self.transport.context().business_scope()?;
        let now = Utc::now();
        let filter = AvailabilityFilter {
            time_slot: TimeSlot::between(now, now + chrono::Duration::days(ROSTER_HORIZON_DAYS)),
            duration: None,
            parent: scope.to_string(),
            employee_ids: BTreeSet::new(),
            service_ids: BTreeSet::new(),
            consumer_id: self.consumer_id.clone(),
            list_employees: true,
        };
        let data = self
            .transport
            .graphql(&IMPROVED_AVAILABILITY, json!({ "filter": filter }))
            .await?;
        let availability: ImprovedAvailability =
            field(&data, "improvedAvailableServicesOrEmployees")?;

        let encoded = match availability.employee_ids.filter(|i| !i.trim().is_empty()) {
            Some(encoded) => encoded,
            None => {
                tracing::warn!("Roster query for {} returned no employee ids", scope);
                return Ok(vec![]);
            }
        };
        let ids: BTreeSet<String> = decode_identifier_set(&encoded)?.into_keys().collect();
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let data = self
            .transport
            .graphql(
                &EMPLOYEE_NODES,
                json!({ "groupId": scope.group(), "ids": ids }),
            )
            .await?;
        let resp: NodesResponse = serde_json::from_value(data)?;

        Ok(resp
            .nodes
            .into_iter()
            .flatten()
            .filter(|node| node.typename == "Employee")
            .filter_map(|node| {
                let name = node.staff_profile.as_ref()?.display_name();
                (!name.is_empty()).then(|| EmployeeIdentity::new(&node.id, &name))
            })
            .collect())
    }
}
