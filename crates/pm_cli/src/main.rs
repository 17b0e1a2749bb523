use std::process::ExitCode;

use clap::Parser;
use tracing::info;

mod cli;
mod commands;
mod logging;
mod render;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let ctx = commands::Context::new(&cli).await?;
    info!("🛡️ Памятка полицейского ready");

    match commands::run(cli.command, &ctx).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(notice) => {
            eprintln!("{}", notice);
            Ok(ExitCode::FAILURE)
        }
    }
}
