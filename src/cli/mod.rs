use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod appointments;
pub mod availability;
pub mod services;
pub mod tools;

use appointments::AppointmentsCommand;
use availability::RangeArgs;
use services::ServicesCommand;

use crate::core::AppConfig;
use crate::scheduling::AppointyClient;

#[derive(Subcommand)]
enum Command {
    /// Create, list and update appointments
    Appointments {
        #[command(subcommand)]
        command: AppointmentsCommand,
    },
    /// Look up the services offered by the business
    Services {
        #[command(subcommand)]
        command: ServicesCommand,
    },
    /// List staff who can perform a service in the next 30 days
    Staff {
        #[arg(long)]
        service_id: String,
        /// Appointment length, e.g. 1800s
        #[arg(long)]
        duration: String,
    },
    /// List dates with open appointments
    Dates {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// List open time slots
    Slots {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Print a booking link for a slot
    BookingLink {
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long)]
        service_id: String,
        #[arg(long)]
        employee_id: String,
    },
    /// Print the tool definitions allowed by APPOINTY_ACTIONS, or call one
    Tools {
        /// Name of a tool to call
        #[arg(long)]
        call: Option<String>,
        /// JSON arguments for the tool call
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(command) = args.command else {
        return Ok(());
    };

    let config = AppConfig::from_env()?;
    let client = AppointyClient::new(&config)?;

    // Handle each sub command
    match command {
        Command::Appointments { command } => {
            appointments::run(&client, command).await?;
        }
        Command::Services { command } => {
            services::run(&client, command).await?;
        }
        Command::Staff {
            service_id,
            duration,
        } => {
            print_json(&client.get_staff_info(&service_id, &duration).await?)?;
        }
        Command::Dates { range } => {
            print_json(&client.get_available_dates(&range.into()).await?)?;
        }
        Command::Slots { range } => {
            print_json(&client.get_available_slots(&range.into()).await?)?;
        }
        Command::BookingLink {
            date,
            time,
            service_id,
            employee_id,
        } => {
            let link = client.generate_booking_link(&crate::scheduling::BookingLinkRequest {
                date,
                time,
                service_id,
                employee_id,
            })?;
            println!("{}", link);
        }
        Command::Tools { call, args } => {
            tools::run(client, &config, call, &args).await?;
        }
    }

    Ok(())
}
