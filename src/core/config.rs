use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{Result, SchedulingError};

const DEFAULT_API_BASE_URL: &str = "https://api.appointy.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Tenant scope in the form `group/company/location`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusinessScope(String);

impl BusinessScope {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.split('/').next().unwrap_or_default().is_empty() {
            return Err(SchedulingError::config("Business scope must not be empty"));
        }
        Ok(Self(raw.to_string()))
    }

    /// The group segment, used by queries that are scoped above a
    /// single location.
    pub fn group(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BusinessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the transport needs to talk to the backend on behalf of
/// one tenant. Immutable once the client is built.
#[derive(Clone, Debug)]
pub struct Context {
    pub base_url: String,
    pub credential: String,
    pub business: Option<BusinessScope>,
}

impl Context {
    pub fn new(base_url: &str, credential: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credential: credential.to_string(),
            business: None,
        }
    }

    pub fn with_business(mut self, scope: BusinessScope) -> Self {
        self.business = Some(scope);
        self
    }

    /// Availability and catalog operations can't run without a tenant.
    pub fn business_scope(&self) -> Result<&BusinessScope> {
        self.business
            .as_ref()
            .ok_or_else(|| SchedulingError::config("Missing business scope (parent id)"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Appointments,
    Services,
    Staff,
    Availability,
    Booking,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Appointments,
        Resource::Services,
        Resource::Staff,
        Resource::Availability,
        Resource::Booking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Appointments => "appointments",
            Resource::Services => "services",
            Resource::Staff => "staff",
            Resource::Availability => "availability",
            Resource::Booking => "booking",
        }
    }
}

impl FromStr for Resource {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| SchedulingError::config(format!("Unknown resource '{}'", s)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Create,
    Read,
    Update,
}

impl Capability {
    pub const ALL: [Capability; 3] = [Capability::Create, Capability::Read, Capability::Update];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Create => "create",
            Capability::Read => "read",
            Capability::Update => "update",
        }
    }
}

impl FromStr for Capability {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| SchedulingError::config(format!("Unknown capability '{}'", s)))
    }
}

/// A single grant, e.g. `appointments:read`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Permission {
    pub resource: Resource,
    pub capability: Capability,
}

impl Permission {
    pub const fn new(resource: Resource, capability: Capability) -> Self {
        Self {
            resource,
            capability,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource.as_str(), self.capability.as_str())
    }
}

impl FromStr for Permission {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self> {
        let (resource, capability) = s.trim().split_once(':').ok_or_else(|| {
            SchedulingError::config(format!("Expected resource:capability, got '{}'", s))
        })?;
        Ok(Self::new(resource.trim().parse()?, capability.trim().parse()?))
    }
}

/// The set of grants a toolkit is allowed to expose.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Actions(BTreeSet<Permission>);

impl Actions {
    pub fn all() -> Self {
        let grants = Resource::ALL
            .into_iter()
            .flat_map(|r| Capability::ALL.into_iter().map(move |c| Permission::new(r, c)))
            .collect();
        Self(grants)
    }

    pub fn allows(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }

    pub fn grant(mut self, permission: Permission) -> Self {
        self.0.insert(permission);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }
}

impl FromStr for Actions {
    type Err = SchedulingError;

    /// Parses a comma-separated list such as
    /// `appointments:read,appointments:create`.
    fn from_str(s: &str) -> Result<Self> {
        let grants = s
            .split(',')
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .map(Permission::from_str)
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self(grants))
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub context: Context,
    pub actions: Actions,
    pub booking_link: Option<String>,
    pub consumer_id: String,
    pub employee_cache_ttl: Option<Duration>,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            actions: Actions::all(),
            booking_link: None,
            consumer_id: String::new(),
            employee_cache_ttl: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self> {
        let base_url =
            env::var("APPOINTY_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let api_key = env::var("APPOINTY_API_KEY")
            .map_err(|_| SchedulingError::config("Missing env var APPOINTY_API_KEY"))?;

        let mut context = Context::new(&base_url, &api_key);
        if let Some(business_id) = non_empty_var("APPOINTY_BUSINESS_ID") {
            context = context.with_business(BusinessScope::parse(&business_id)?);
        }

        let actions = match non_empty_var("APPOINTY_ACTIONS") {
            Some(raw) => raw.parse()?,
            None => Actions::all(),
        };

        let employee_cache_ttl = non_empty_var("APPOINTY_EMPLOYEE_CACHE_TTL_SECS")
            .map(|v| parse_secs("APPOINTY_EMPLOYEE_CACHE_TTL_SECS", &v))
            .transpose()?;

        let request_timeout = non_empty_var("APPOINTY_REQUEST_TIMEOUT_SECS")
            .map(|v| parse_secs("APPOINTY_REQUEST_TIMEOUT_SECS", &v))
            .transpose()?
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));

        Ok(Self {
            context,
            actions,
            booking_link: non_empty_var("APPOINTY_BOOKING_LINK"),
            consumer_id: env::var("APPOINTY_CONSUMER_ID").unwrap_or_default(),
            employee_cache_ttl,
            request_timeout,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_secs(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| SchedulingError::config(format!("{} must be a number of seconds", key)))
}
