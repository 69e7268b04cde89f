use anyhow::Result;
use clap::Parser;

mod args;
mod cmd;
mod env;
mod io;
mod output;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = args::Cli::parse();
    output::init(cli.json);
    init_tracing(cli.json);

    cmd::dispatch(cli).await
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
