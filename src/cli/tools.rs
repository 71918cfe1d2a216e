use std::sync::Arc;

use anyhow::{Result, anyhow};

use super::print_json;
use crate::core::AppConfig;
use crate::scheduling::AppointyClient;
use crate::tools::{AppointyApi, toolkit};

pub async fn run(
    client: AppointyClient,
    config: &AppConfig,
    call: Option<String>,
    args: &str,
) -> Result<()> {
    let tools = toolkit(Arc::new(AppointyApi::new(client)), &config.actions);

    let Some(name) = call else {
        return print_json(&tools);
    };

    let tool = tools
        .iter()
        .find(|t| t.function_name() == name)
        .ok_or_else(|| anyhow!("Tool {} is not enabled", name))?;
    println!("{}", tool.call(args).await?);
    Ok(())
}
