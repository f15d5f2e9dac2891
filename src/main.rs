use anyhow::Result;
use rustlite_audit::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    rustlite_audit::init_tracing_with(cli.log_level());
    rustlite_audit::run(cli).await
}
