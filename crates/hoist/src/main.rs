use std::io::{BufRead, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use hoist_fetch::{Fetcher, ReqwestClient};
use hoist_install::{InstallError, InstallReport, Installer, LauncherHook};
use hoist_platform::UserDirs;
use tracing::debug;

use crate::cli::App;
use crate::ui::tracker::ProgressTrackerBuilder;

mod cli;
mod logging;
mod ui;

fn main() -> ExitCode {
    let app = App::parse();
    logging::init(app.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(&app)) {
        Ok(report) => {
            println!(
                "Installed {} to {}",
                report.version,
                report.install_root.display()
            );
            if !app.no_wait {
                wait_for_enter();
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(app: &App) -> anyhow::Result<InstallReport> {
    let config = app.load_config()?;
    debug!(?config, "effective configuration");

    let tracker = ProgressTrackerBuilder::default()
        .with_prefix(&config.program)
        .with_finish("downloaded")
        .hidden(!std::io::stderr().is_terminal())
        .build();
    let options = config.fetch_options().on_progress(tracker.callback());

    let client = ReqwestClient::new(&config.user_agent)
        .map_err(InstallError::Download)
        .context("failed to set up the HTTP client")?;
    let mut installer = Installer::new(config, Fetcher::with_options(client, options));
    if !app.no_launcher {
        installer = installer.hook(LauncherHook::new(UserDirs::from_env()));
    }

    let result = installer.run().await;
    tracker.abandon();
    Ok(result?)
}

/// Exit code for `err`; 1 when it is not an install error.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<InstallError>()
        .map_or(1, InstallError::exit_code)
}

fn wait_for_enter() {
    if let Err(err) = prompt_enter(&mut std::io::stdout(), &mut std::io::stdin().lock()) {
        debug!(%err, "could not wait for Enter");
    }
}

fn prompt_enter(out: &mut impl Write, input: &mut impl BufRead) -> std::io::Result<()> {
    write!(out, "Press Enter to continue...")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
