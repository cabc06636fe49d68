mod cli;
mod error;
mod logging;
mod output;
mod settings;

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use goswap_core::{DirFs, GoDevCatalog, ListFilter, Notice, Switcher, SystemToolchain};
use goswap_platform::ToolchainDirs;

use cli::{Cli, Command};
use error::AppError;
use settings::AppSettings;

fn build_switcher(settings: &AppSettings) -> Result<Switcher, AppError> {
    let dirs = ToolchainDirs::detect(settings.bin_dir.clone(), settings.sdk_dir.clone())?;
    let catalog = GoDevCatalog::new(settings.catalog_url.clone(), settings.http_timeout())?;

    Ok(Switcher::new(
        Box::new(DirFs::new(dirs.bin_dir.clone())),
        Box::new(DirFs::new(dirs.sdk_dir)),
        Box::new(SystemToolchain::new(dirs.bin_dir)),
        Box::new(catalog),
    ))
}

fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling");
            interrupt.cancel();
        }
    });
    cancel
}

async fn run(command: Command, settings: &AppSettings) -> Result<(), AppError> {
    let switcher = build_switcher(settings)?;
    let cancel = cancel_on_interrupt();
    let reporter = |notice: Notice| println!("{}", output::notice_line(&notice));

    match command {
        Command::Use { version } => {
            let outcome = switcher.use_version(&version, &reporter, &cancel).await?;
            println!("{}", output::use_line(&outcome));
        }
        Command::Remove { version } => {
            let outcome = switcher.remove(&version, &reporter, &cancel).await?;
            println!("{}", output::remove_line(&outcome));
        }
        Command::List(args) => {
            let filter = ListFilter {
                all: args.all,
                only: args.only,
            };
            for entry in switcher.list(&filter, &cancel).await? {
                println!("{}", output::list_line(&entry));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = AppSettings::load();
    logging::init_logging(
        cli.verbose || settings.debug_logging,
        settings.max_log_size_bytes,
    );

    match run(cli.command, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("Command failed: {err:?}");
            eprintln!("goswap: {err}");
            ExitCode::FAILURE
        }
    }
}
