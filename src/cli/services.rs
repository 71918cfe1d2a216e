use anyhow::Result;
use clap::Subcommand;

use super::print_json;
use crate::scheduling::AppointyClient;

#[derive(Subcommand)]
pub enum ServicesCommand {
    /// List every service of the business
    List {},
    /// Describe a single service
    Info {
        #[arg(long)]
        id: String,
    },
}

pub async fn run(client: &AppointyClient, command: ServicesCommand) -> Result<()> {
    match command {
        ServicesCommand::List {} => print_json(&client.list_services().await?)?,
        ServicesCommand::Info { id } => println!("{}", client.get_service_info(&id).await?),
    }
    Ok(())
}
