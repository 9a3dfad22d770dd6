use calsum::commands::Cli;
use calsum::libs::messages::macros::is_debug_mode;
use calsum::msg_error;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    if !is_debug_mode() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("calsum=debug"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).try_init();
}

fn main() -> ExitCode {
    init_tracing();

    match Cli::menu() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            msg_error!(e);
            ExitCode::FAILURE
        }
    }
}
