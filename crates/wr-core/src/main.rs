//! wr-core binary entry point.

use clap::Parser;
use wr_core::cli::{error_document, execute, Cli};
use wr_core::exit_codes::ExitCode;
use wr_core::logging::{init_logging, LogConfig};

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: cli.log_level.clone(),
        format: cli.log_format,
        ..LogConfig::default()
    };
    if let Err(e) = init_logging(&log_config) {
        eprintln!("wr-core: {e}");
        std::process::exit(ExitCode::ConfigError.as_i32());
    }

    let code = match execute(&cli) {
        Ok(code) => code,
        Err(err) => {
            let (code, doc) = error_document(&err);
            tracing::error!(code = err.code(), "{err}");
            eprintln!("{doc}");
            code
        }
    };
    std::process::exit(code.as_i32());
}
