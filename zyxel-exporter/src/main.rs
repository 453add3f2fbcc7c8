use anyhow::{Context, Result, bail};
use clap::Parser;

use zyxel_exporter::cli::Args;
use zyxel_exporter::server;
use zyxel_exporter::{Scraper, SshConnector};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    let Some(ssh) = args.ssh_config() else {
        bail!("no credentials: pass --passwd (or set ZYXEL_PASSWORD) or --key");
    };
    let mut scraper = Scraper::new(SshConnector::new(ssh), args.scraper_config());

    if args.serve {
        return server::bind_and_serve(args.bind, scraper)
            .await
            .with_context(|| format!("HTTP server on {} failed", args.bind));
    }

    let result = scraper.scrape().await.context("scrape failed")?;
    if args.raw {
        for text in [&result.dsl, &result.interfaces].into_iter().flatten() {
            print!("{}", text);
        }
    } else {
        println!("{}", scraper.render(&result));
    }
    scraper.disconnect().await;

    Ok(())
}
