use clap::Parser;
use sgli_point_processor::cli::{run, Cli};
use sgli_point_processor::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
