use clap::Parser;
use railside_server::{load_config, serve};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Local dashboard gateway for the transit rally game.
#[derive(Debug, Parser)]
#[command(name = "railside-server", version)]
struct Args {
    /// Address to listen on.
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Game backend base URL.
    #[arg(long)]
    backend_url: Option<String>,

    /// Team whose dashboard this gateway serves.
    #[arg(long)]
    team: Option<String>,

    /// Poll interval for the page, in seconds.
    #[arg(long)]
    poll_secs: Option<u64>,

    /// Config file (default: ~/.railside/config.yaml).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("railside_server=info".parse()?)
                .add_directive("railside_client=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        cfg.listen = listen;
    }
    if let Some(backend_url) = args.backend_url {
        cfg.backend_url = backend_url;
    }
    if let Some(team) = args.team {
        cfg.team = team;
    }
    if let Some(poll_secs) = args.poll_secs {
        cfg.poll_secs = poll_secs;
    }

    tracing::info!(
        listen = %cfg.listen,
        backend = %cfg.backend_url,
        team = %cfg.team,
        "railside gateway starting"
    );
    serve(cfg).await
}
