use anyhow::Result;
use clap::Subcommand;

use super::print_json;
use crate::scheduling::{AppointyClient, CreateAppointment, UpdateAppointment};

#[derive(Subcommand)]
pub enum AppointmentsCommand {
    /// List all appointments
    List {},
    /// Create an appointment
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        start_time: String,
        #[arg(long)]
        end_time: String,
        #[arg(long)]
        customer_name: String,
        #[arg(long)]
        customer_email: String,
    },
    /// Update the given fields of an appointment
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        start_time: Option<String>,
        #[arg(long)]
        end_time: Option<String>,
        #[arg(long)]
        customer_name: Option<String>,
        #[arg(long)]
        customer_email: Option<String>,
    },
}

pub async fn run(client: &AppointyClient, command: AppointmentsCommand) -> Result<()> {
    match command {
        AppointmentsCommand::List {} => {
            print_json(&client.list_appointments().await?)?;
        }
        AppointmentsCommand::Create {
            title,
            start_time,
            end_time,
            customer_name,
            customer_email,
        } => {
            let appointment = CreateAppointment {
                title,
                start_time,
                end_time,
                customer_name,
                customer_email,
            };
            print_json(&client.create_appointment(&appointment).await?)?;
        }
        AppointmentsCommand::Update {
            id,
            title,
            start_time,
            end_time,
            customer_name,
            customer_email,
        } => {
            let update = UpdateAppointment {
                appointment_id: id,
                title,
                start_time,
                end_time,
                customer_name,
                customer_email,
            };
            print_json(&client.update_appointment(&update).await?)?;
        }
    }
    Ok(())
}
