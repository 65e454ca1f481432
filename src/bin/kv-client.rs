//! Manual test client: sends protocol lines to one node and prints replies.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[derive(Parser)]
#[command(name = "kv-client")]
#[command(about = "Send commands to a partition-kv node")]
struct Cli {
    /// Node to connect to
    #[arg(long, default_value = "localhost:4000")]
    addr: String,

    /// Commands to send, e.g. "put thiskey thisval". Reads stdin when empty.
    commands: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    let stream = TcpStream::connect(&cli.addr).await?;
    let mut conn = BufReader::new(stream);

    if cli.commands.is_empty() {
        let mut stdin = BufReader::new(tokio::io::stdin()).lines();
        while let Some(command) = stdin.next_line().await? {
            if !send_recv(&mut conn, &command).await? {
                break;
            }
        }
    } else {
        for command in &cli.commands {
            if !send_recv(&mut conn, command).await? {
                break;
            }
        }
    }

    Ok(())
}

/// Returns `false` once the node has closed the connection.
async fn send_recv(conn: &mut BufReader<TcpStream>, command: &str) -> anyhow::Result<bool> {
    println!("send: {}", command);
    conn.get_mut()
        .write_all(format!("{}\n", command).as_bytes())
        .await?;

    let mut response = String::new();
    if conn.read_line(&mut response).await? == 0 {
        tracing::warn!("Connection closed by node");
        return Ok(false);
    }

    print!("recv: {}", response);
    Ok(true)
}
