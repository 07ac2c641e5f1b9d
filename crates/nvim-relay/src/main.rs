//! nvim-relay - external-editor entry point for IDEs.
//!
//! Point the IDE's "external editor" setting at this binary. Every file the
//! IDE opens lands in one shared headless Neovim, which Neovide or a terminal
//! Neovim can attach to.

mod session;

use clap::Parser;
use nvim_relay_core::{RelayConfig, RelayError, TimingConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = RelayConfig::APP_NAME)]
#[command(about = "Open IDE files in one shared headless Neovim")]
struct Args {
    /// Neovim executable
    #[arg(
        long,
        env = RelayConfig::EDITOR_ENV_VAR,
        default_value = RelayConfig::DEFAULT_EDITOR
    )]
    editor: PathBuf,

    /// Registry file holding the live server's address
    /// (defaults to nvim-unity-server.txt in the temp directory)
    #[arg(long, env = RelayConfig::REGISTRY_ENV_VAR)]
    registry_file: Option<PathBuf>,

    /// Capture a launched server's output in this file
    #[arg(long)]
    server_log: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Arguments passed by the IDE: files, --line/-l N, --column/-c N
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    ide_args: Vec<String>,
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match session::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            // Keep the message on screen when the IDE opened a console for us.
            let visible = e
                .downcast_ref::<RelayError>()
                .is_some_and(RelayError::wants_visible_delay);
            if visible {
                tokio::time::sleep(TimingConfig::ERROR_EXIT_DELAY).await;
            }
            ExitCode::FAILURE
        }
    }
}
