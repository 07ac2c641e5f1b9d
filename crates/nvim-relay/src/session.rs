//! One IDE invocation, from raw arguments to exit.

use crate::Args;
use anyhow::Result;
use chrono::Local;
use nvim_relay_core::{
    Coordinator, DispatchReport, FileRegistry, NvimRemote, Route, ServerAddress, TargetParser,
    TimingConfig,
};
use tracing::{debug, warn};

pub async fn run(args: Args) -> Result<()> {
    let targets = TargetParser::parse(&args.ide_args)?;
    debug!("Parsed {} target(s) from {:?}", targets.len(), args.ide_args);

    let registry = match args.registry_file {
        Some(path) => FileRegistry::open_at(path),
        None => FileRegistry::open(),
    };
    debug!("Using registry file {}", registry.path().display());

    let mut remote = NvimRemote::new(&args.editor);
    if let Some(log) = &args.server_log {
        remote = remote.with_server_log(log);
    }

    let coordinator = Coordinator::new(registry, remote);

    match coordinator.open(&targets).await? {
        Route::Attached { report, .. } | Route::Joined { report, .. } => {
            report_dispatch(report);
            println!("File sent to Neovim server.");
            tokio::time::sleep(TimingConfig::ATTACH_EXIT_DELAY).await;
        }
        Route::Launched {
            address,
            mut server,
            report,
        } => {
            report_dispatch(report);
            print_server_banner(&address);
            coordinator.wait_for_exit(&address, &mut server).await;
            println!("Server stopped at {}", Local::now().format("%H:%M:%S"));
        }
    }

    Ok(())
}

fn report_dispatch(report: DispatchReport) {
    if !report.all_sent() {
        warn!(
            "{} of {} file(s) could not be sent",
            report.failed,
            report.sent + report.failed
        );
    }
}

fn print_server_banner(address: &ServerAddress) {
    println!("Headless Neovim server started.");
    println!("Server: {}", address);
    println!();
    println!("Attach with Neovide:");
    println!("  neovide --server {}", address);
    println!("Or from a terminal:");
    println!("  nvim --server {} --remote-ui", address);
    println!();
    println!("Waiting for further file requests...");
}
