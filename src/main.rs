use anyhow::Result;
use clap::Parser;
use notebook_order::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notebook_order=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
