use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};
use serde::Serialize;

use super::{Function, Parameters, Properties, Property};
use crate::core::{Capability, Permission, Resource};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    CreateAppointment,
    ListAppointments,
    UpdateAppointment,
    ListServices,
    GetStaffInfo,
    GetServiceInfo,
    GetAvailableDates,
    GetAvailableSlots,
    GenerateBookingLink,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::CreateAppointment,
        Method::ListAppointments,
        Method::UpdateAppointment,
        Method::ListServices,
        Method::GetStaffInfo,
        Method::GetServiceInfo,
        Method::GetAvailableDates,
        Method::GetAvailableSlots,
        Method::GenerateBookingLink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::CreateAppointment => "create_appointment",
            Method::ListAppointments => "list_appointments",
            Method::UpdateAppointment => "update_appointment",
            Method::ListServices => "list_services",
            Method::GetStaffInfo => "get_staff_info",
            Method::GetServiceInfo => "get_service_info",
            Method::GetAvailableDates => "get_available_dates",
            Method::GetAvailableSlots => "get_available_slots",
            Method::GenerateBookingLink => "generate_booking_link",
        }
    }

    /// The grant a configuration must hold to expose this tool.
    pub fn permission(&self) -> Permission {
        use Capability::*;
        use Resource::*;

        match self {
            Method::CreateAppointment => Permission::new(Appointments, Create),
            Method::ListAppointments => Permission::new(Appointments, Read),
            Method::UpdateAppointment => Permission::new(Appointments, Update),
            Method::ListServices | Method::GetServiceInfo => Permission::new(Services, Read),
            Method::GetStaffInfo => Permission::new(Staff, Read),
            Method::GetAvailableDates | Method::GetAvailableSlots => {
                Permission::new(Availability, Read)
            }
            Method::GenerateBookingLink => Permission::new(Booking, Create),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| anyhow!("Invalid method {}", s))
    }
}

#[derive(Clone, Debug)]
pub struct ToolDefinition {
    pub method: Method,
    pub name: &'static str,
    pub function: Function<Properties>,
}

impl ToolDefinition {
    pub fn permission(&self) -> Permission {
        self.method.permission()
    }
}

fn definition(
    method: Method,
    name: &'static str,
    description: &str,
    properties: Vec<(&str, Property)>,
    required: &[&str],
) -> ToolDefinition {
    let properties: Properties = properties
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    // Strict function calling needs every property to be required
    let strict = required.len() == properties.len();
    ToolDefinition {
        method,
        name,
        function: Function {
            name: method.as_str().to_string(),
            description: description.trim().to_string(),
            parameters: Parameters {
                r#type: String::from("object"),
                properties,
                required: required.iter().map(|i| i.to_string()).collect(),
                additional_properties: false,
            },
            strict,
        },
    }
}

const CREATE_APPOINTMENT: &str = "
This tool will create an appointment in Appointy.

It takes five arguments:
- title (str): The title of the appointment.
- start_time (str): The start time of the appointment.
- end_time (str): The end time of the appointment.
- customer_name (str): The name of the customer.
- customer_email (str): The email of the customer.
";

const LIST_APPOINTMENTS: &str = "
This tool will fetch a list of appointments from Appointy.

It takes no input.
";

const UPDATE_APPOINTMENT: &str = "
This tool will update an appointment in Appointy.

It takes six arguments:
- appointment_id (str): The ID of the appointment.
- title (str, optional): The title of the appointment.
- start_time (str, optional): The start time of the appointment.
- end_time (str, optional): The end time of the appointment.
- customer_name (str, optional): The name of the customer.
- customer_email (str, optional): The email of the customer.
";

const LIST_SERVICES: &str = "
This tool will fetch the services offered by the business, with their IDs, descriptions and durations.

It takes no input.
";

const GET_STAFF_INFO: &str = "
This tool will list the staff members who can perform a service in the next 30 days.

It takes two arguments:
- service_id (str): The ID of the service.
- duration (str): The length of the appointment in seconds, e.g. \"1800s\".
";

const GET_SERVICE_INFO: &str = "
This tool will describe a single service: its title, description and duration.

It takes one argument:
- service_id (str): The ID of the service.
";

const GET_AVAILABLE_DATES: &str = "
This tool will list the dates with open appointments in a date range.

It takes four arguments:
- start (str): First date of the range (YYYY-MM-DD or ISO-8601).
- end (str): Last date of the range (YYYY-MM-DD or ISO-8601).
- service_ids (list[str], optional): Only consider these services.
- employee_ids (list[str], optional): Only consider these staff members.
";

const GET_AVAILABLE_SLOTS: &str = "
This tool will list the open time slots in a date range, formatted as \"start - end\".

It takes four arguments:
- start (str): Start of the range (YYYY-MM-DD or ISO-8601).
- end (str): End of the range (YYYY-MM-DD or ISO-8601).
- service_ids (list[str], optional): Only consider these services.
- employee_ids (list[str], optional): Only consider these staff members.
";

const GENERATE_BOOKING_LINK: &str = "
This tool will generate a link the customer can use to book a slot.

It takes four arguments:
- date (str): The date of the slot.
- time (str): The start time of the slot.
- service_id (str): The ID of the service.
- employee_id (str): The ID of the staff member.
";

fn range_properties() -> Vec<(&'static str, Property)> {
    vec![
        ("start", Property::string("Start of the range.")),
        ("end", Property::string("End of the range.")),
        ("service_ids", Property::string_list("Service IDs to filter by.")),
        ("employee_ids", Property::string_list("Staff member IDs to filter by.")),
    ]
}

/// Every tool the toolkit knows about, regardless of permissions.
pub fn catalog() -> Vec<ToolDefinition> {
    vec![
        definition(
            Method::CreateAppointment,
            "Create Appointment",
            CREATE_APPOINTMENT,
            vec![
                ("title", Property::string("The title of the appointment.")),
                ("start_time", Property::string("The start time of the appointment.")),
                ("end_time", Property::string("The end time of the appointment.")),
                ("customer_name", Property::string("The name of the customer.")),
                ("customer_email", Property::string("The email of the customer.")),
            ],
            &["title", "start_time", "end_time", "customer_name", "customer_email"],
        ),
        definition(
            Method::ListAppointments,
            "List Appointments",
            LIST_APPOINTMENTS,
            vec![],
            &[],
        ),
        definition(
            Method::UpdateAppointment,
            "Update Appointment",
            UPDATE_APPOINTMENT,
            vec![
                ("appointment_id", Property::string("The ID of the appointment.")),
                ("title", Property::string("The title of the appointment.")),
                ("start_time", Property::string("The start time of the appointment.")),
                ("end_time", Property::string("The end time of the appointment.")),
                ("customer_name", Property::string("The name of the customer.")),
                ("customer_email", Property::string("The email of the customer.")),
            ],
            &["appointment_id"],
        ),
        definition(Method::ListServices, "List Services", LIST_SERVICES, vec![], &[]),
        definition(
            Method::GetStaffInfo,
            "Get Staff Info",
            GET_STAFF_INFO,
            vec![
                ("service_id", Property::string("The ID of the service.")),
                ("duration", Property::string("Appointment length in seconds, e.g. 1800s.")),
            ],
            &["service_id", "duration"],
        ),
        definition(
            Method::GetServiceInfo,
            "Get Service Info",
            GET_SERVICE_INFO,
            vec![("service_id", Property::string("The ID of the service."))],
            &["service_id"],
        ),
        definition(
            Method::GetAvailableDates,
            "Get Available Dates",
            GET_AVAILABLE_DATES,
            range_properties(),
            &["start", "end"],
        ),
        definition(
            Method::GetAvailableSlots,
            "Get Available Slots",
            GET_AVAILABLE_SLOTS,
            range_properties(),
            &["start", "end"],
        ),
        definition(
            Method::GenerateBookingLink,
            "Generate Booking Link",
            GENERATE_BOOKING_LINK,
            vec![
                ("date", Property::string("The date of the slot.")),
                ("time", Property::string("The start time of the slot.")),
                ("service_id", Property::string("The ID of the service.")),
                ("employee_id", Property::string("The ID of the staff member.")),
            ],
            &["date", "time", "service_id", "employee_id"],
        ),
    ]
}
