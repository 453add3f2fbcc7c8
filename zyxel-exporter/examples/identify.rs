//! Identify a router and dump its DSL status.
//!
//! Connects, runs `sys atsh` to find the product model, then runs the
//! matching dialect's DSL command and prints both the raw text and the
//! parsed metrics.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example identify -- --host 192.168.1.1 --user admin --passwd 1234
//! ```

use clap::Parser;

use zyxel_exporter::channel::ReadConfig;
use zyxel_exporter::device;
use zyxel_exporter::metrics::render_records;
use zyxel_exporter::transport::Connector;
use zyxel_exporter::{AuthMethod, DialectRegistry, SshConfig, SshConnector};

#[derive(Parser)]
struct Args {
    #[arg(long, default_value = "192.168.1.1")]
    host: String,

    #[arg(long, default_value = "admin")]
    user: String,

    #[arg(long, env = "ZYXEL_PASSWORD")]
    passwd: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = SshConfig::new(&args.host, &args.user, AuthMethod::password(args.passwd));
    println!("Connecting to {}...", config.socket_addr());
    let session = SshConnector::new(config).connect().await?;

    let read = ReadConfig::default();
    let Some(device) = device::resolve(&session, &DialectRegistry::builtin(), &read).await? else {
        eprintln!("Router did not report a product model");
        session.close().await?;
        return Ok(());
    };
    println!("Model:   {}", device.model());
    println!("Dialect: {}", device.dialect().name());

    let capture = device.fetch_dsl(&session, &read).await?;
    println!("\n$ {}", capture.command);
    println!("{}", "-".repeat(50));
    print!("{}", capture.text);
    println!("{}", "-".repeat(50));
    println!(
        "Completed in {:?}{}",
        capture.elapsed,
        if capture.complete { "" } else { " (incomplete)" }
    );

    println!("\n{}", render_records(&device.dialect().parse_dsl(&capture.text)));

    session.close().await?;
    Ok(())
}
