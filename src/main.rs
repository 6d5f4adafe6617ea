use clap::Parser;
use coord_converter::cli::{run, Cli};
use coord_converter::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
