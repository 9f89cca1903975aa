//! mpv-handler entry point.
//!
//! Resolves the executable's location once, loads the configuration that
//! sits next to it, and hands the parsed command to [`Handler`].
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ parse_args()                    -- Usage / Install / Uninstall / Handle
//!  └─ Handler::new()                  -- loads <exe-stem>.ini
//!       ├─ ProtocolRegistrar          (PlatformKeyStore)
//!       ├─ HandleUrlUseCase           (ProcessLauncher, FileEventLog)
//!       └─ ConfigStore::save          (install only)
//! ```

use std::process::ExitCode;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use mpv_handler::cli::{exit_code, parse_args, Handler};
use mpv_handler::infrastructure::launcher::process::ProcessLauncher;
use mpv_handler::infrastructure::registry::PlatformKeyStore;
use mpv_handler::infrastructure::storage::config::ConfigStore;

fn main() -> ExitCode {
    // Diagnostics are opt-in through `RUST_LOG`: a browser-launched handler
    // must stay silent on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .init();

    let args = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned());
    let command = match parse_args(args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(exit_code::FAILURE);
        }
    };
    debug!(?command, "parsed command line");

    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            eprintln!("Error getting executable path: {e}");
            return ExitCode::from(exit_code::FAILURE);
        }
    };
    let config_store = match ConfigStore::for_executable(&exe) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error locating configuration: {e}");
            return ExitCode::from(exit_code::FAILURE);
        }
    };

    let mut handler = Handler::new(exe, config_store, PlatformKeyStore::new(), ProcessLauncher::new());
    let code = handler.run(command, &mut std::io::stdout(), &mut std::io::stderr());
    ExitCode::from(code)
}
