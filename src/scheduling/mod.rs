pub mod appointments;
pub mod availability;
pub mod booking;
pub mod employees;
pub mod services;

pub use appointments::{Appointment, CreateAppointment, UpdateAppointment};
pub use availability::{AvailabilityQuery, AvailabilityResolver, Lookup};
pub use booking::BookingLinkRequest;
pub use employees::{BackendRoster, EmployeeCache, EmployeeIdentity, RosterSource};
pub use services::Service;

use std::sync::Arc;

use crate::appointy::Transport;
use crate::core::{AppConfig, Context, Result};

/// One tenant's view of the scheduling backend. Owns the transport and
/// the employee roster cache, which lives as long as the client (or
/// until its ttl runs out / it is invalidated).
pub struct AppointyClient {
    transport: Transport,
    employees: Arc<EmployeeCache>,
    availability: AvailabilityResolver,
    booking_link: Option<String>,
}

impl AppointyClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let transport = Transport::new(config.context.clone(), config.request_timeout)?;
        let mut cache = EmployeeCache::new(BackendRoster::new(transport.clone(), &config.consumer_id));
        if let Some(ttl) = config.employee_cache_ttl {
            cache = cache.with_ttl(ttl);
        }
        Ok(Self::from_parts(config, transport, cache))
    }

    /// Build a client around a caller-supplied roster cache.
    pub fn with_employee_cache(config: &AppConfig, cache: EmployeeCache) -> Result<Self> {
        let transport = Transport::new(config.context.clone(), config.request_timeout)?;
        Ok(Self::from_parts(config, transport, cache))
    }

    fn from_parts(config: &AppConfig, transport: Transport, cache: EmployeeCache) -> Self {
        let employees = Arc::new(cache);
        let availability =
            AvailabilityResolver::new(transport.clone(), employees.clone(), &config.consumer_id);
        Self {
            transport,
            employees,
            availability,
            booking_link: config.booking_link.clone(),
        }
    }

    pub fn context(&self) -> &Context {
        self.transport.context()
    }

    pub fn employees(&self) -> &EmployeeCache {
        &self.employees
    }

    pub async fn create_appointment(&self, appointment: &CreateAppointment) -> Result<Appointment> {
        appointments::create_appointment(&self.transport, appointment).await
    }

    pub async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        appointments::list_appointments(&self.transport).await
    }

    pub async fn update_appointment(&self, update: &UpdateAppointment) -> Result<Appointment> {
        appointments::update_appointment(&self.transport, update).await
    }

    pub async fn list_services(&self) -> Result<Vec<Service>> {
        services::list_services(&self.transport).await
    }

    pub async fn get_service_info(&self, service_id: &str) -> Result<String> {
        services::get_service_info(&self.transport, service_id).await
    }

    pub async fn get_staff_info(&self, service_id: &str, duration: &str) -> Result<Lookup<String>> {
        self.availability.staff_for_service(service_id, duration).await
    }

    pub async fn get_available_dates(&self, query: &AvailabilityQuery) -> Result<Lookup<String>> {
        self.availability.available_dates(query).await
    }

    pub async fn get_available_slots(&self, query: &AvailabilityQuery) -> Result<Lookup<String>> {
        self.availability.available_slots(query).await
    }

    pub fn generate_booking_link(&self, req: &BookingLinkRequest) -> Result<String> {
        booking::generate_booking_link(self.booking_link.as_deref(), req)
    }

    /// Backend id for a staff member's display name, if on the roster.
    pub async fn resolve_employee_id(&self, name: &str) -> Result<Option<String>> {
        self.employees.resolve_name(name).await
    }

    pub async fn invalidate_employee_cache(&self) {
        self.employees.invalidate().await
    }
}
