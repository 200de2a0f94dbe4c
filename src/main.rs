#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use clap::Parser;
use fittrack::cli::{self, Cli, output};
use fittrack::error::Error;
use fittrack::telemetry;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    telemetry::init(&cli.config.telemetry);

    if let Err(err) = cli::run(cli).await {
        match err.downcast_ref::<Error>() {
            Some(err) => output::report(err),
            None => output::error(&format!("{err:#}")),
        }
        std::process::exit(1);
    }
}
