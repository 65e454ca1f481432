use clap::Parser;
use partition_kv::config::{
    DEFAULT_CACHE_SIZE, DEFAULT_DB, DEFAULT_PORT, DEFAULT_SERVER, NodeConfig,
};
use partition_kv::storage::engine::SledEngine;
use partition_kv::{Node, PeerAddr};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "partition-kv")]
#[command(about = "Partitioned key-value store node (32 partitions, n=1 w=1 r=1)")]
struct Cli {
    /// Server name or ip address peers use to reach this node
    #[arg(long, default_value = DEFAULT_SERVER)]
    server: String,

    /// Port to take commands on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Database folder
    #[arg(long, default_value = DEFAULT_DB)]
    db: String,

    /// Storage cache size in bytes
    #[arg(long, default_value_t = DEFAULT_CACHE_SIZE)]
    cache_size: u64,

    /// Seconds between gossip rounds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    gossip_interval_secs: u64,

    /// Peer dial/read timeout in milliseconds, 0 waits forever
    #[arg(long, default_value_t = 5000)]
    peer_timeout_ms: u64,

    /// Peer to announce to at startup (repeatable), e.g. localhost:4001
    #[arg(long = "seed")]
    seeds: Vec<String>,

    /// Log at debug level, including every protocol line
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let peer_timeout = match cli.peer_timeout_ms {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    };

    let config = NodeConfig::new(cli.server, cli.port)
        .with_db_path(&cli.db)
        .with_cache_size(cli.cache_size)
        .with_gossip_interval(Duration::from_secs(cli.gossip_interval_secs))
        .with_peer_timeout(peer_timeout)
        .with_seeds(cli.seeds.into_iter().map(PeerAddr::from).collect());

    tracing::info!("Start server");

    let engine = SledEngine::open(&config.db_path, config.cache_size)?;
    let node = Node::bind(&config, engine).await?;

    node.run().await;

    Ok(())
}
