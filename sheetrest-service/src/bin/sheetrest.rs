//! `sheetrest` server binary.

use sheetrest_core::error::Result;
use sheetrest_service::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
