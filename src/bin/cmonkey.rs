//! Invokes a single CloudStack API command from the command line.

use cmonkey::cli::{self, Options, EXIT_API_ERROR, EXIT_CONFIG_ERROR};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let (config, invocation, report) = match Options::from_args().into_parts() {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("{}", e);
            ::std::process::exit(EXIT_CONFIG_ERROR);
        }
    };

    if let Err(e) = config.init_logging() {
        eprintln!("{}", e);
        ::std::process::exit(EXIT_CONFIG_ERROR);
    }

    match cli::run(&config, invocation, &report).await {
        Ok(res) => ::std::process::exit(cli::exit_code(&res)),
        Err(e) => {
            eprintln!("{}", e);
            ::std::process::exit(EXIT_API_ERROR);
        }
    }
}
