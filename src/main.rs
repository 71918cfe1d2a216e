use anyhow::Result;
use appointy::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
