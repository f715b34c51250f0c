use app::environment::EnvironmentSnapshot;
use clap::Parser;
use dotenvy::dotenv;
use ssmenv::{cli::Args, runner};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Taken before `.env` is loaded: its entries configure the AWS session
    // but are not part of the caller's shell.
    let snapshot = EnvironmentSnapshot::capture();
    dotenv().ok();

    let args = Args::parse();

    if let Err(e) = runner::start(args, snapshot).await {
        eprintln!("ssmenv: {e:#}");
        std::process::exit(1);
    }
}
