//! Command-line arguments.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use secrecy::SecretString;

use crate::channel::ReadConfig;
use crate::scraper::{ScrapeScope, ScraperConfig};
use crate::transport::{AuthMethod, HostKeyVerification, SshConfig};

/// Export DSL and interface statistics from a Zyxel router.
#[derive(Debug, Parser)]
#[command(name = "zyxel-exporter", version, about)]
pub struct Args {
    /// Router hostname or IP address
    #[arg(long, default_value = "192.168.1.1")]
    pub host: String,

    /// SSH port
    #[arg(long, default_value_t = 22)]
    pub port: u16,

    /// SSH username
    #[arg(long, default_value = "admin")]
    pub user: String,

    /// SSH password
    #[arg(long, env = "ZYXEL_PASSWORD", hide_env_values = true)]
    pub passwd: Option<String>,

    /// SSH private key (takes precedence over --passwd)
    #[arg(long, value_name = "PATH")]
    pub key: Option<PathBuf>,

    /// Passphrase for an encrypted private key
    #[arg(long, env = "ZYXEL_KEY_PASSPHRASE", hide_env_values = true)]
    pub key_passphrase: Option<String>,

    /// Address for the HTTP server
    #[arg(long, default_value = "0.0.0.0:9100")]
    pub bind: SocketAddr,

    /// Only fetch DSL status
    #[arg(long, conflicts_with = "ifconfig_only")]
    pub xdsl_only: bool,

    /// Only fetch interface statistics
    #[arg(long)]
    pub ifconfig_only: bool,

    /// Run the HTTP server instead of printing once
    #[arg(long)]
    pub serve: bool,

    /// Print raw command output instead of metrics
    #[arg(long, conflicts_with = "serve")]
    pub raw: bool,

    /// Seconds to wait for each shell read
    #[arg(long, default_value_t = 5, value_name = "SECS")]
    pub timeout: u64,

    /// Reject routers missing from known_hosts
    #[arg(long)]
    pub strict_host_key: bool,

    /// known_hosts file (default ~/.ssh/known_hosts)
    #[arg(long, value_name = "PATH")]
    pub known_hosts: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Categories selected by the scope flags.
    pub fn scope(&self) -> ScrapeScope {
        if self.xdsl_only {
            ScrapeScope::DslOnly
        } else if self.ifconfig_only {
            ScrapeScope::InterfacesOnly
        } else {
            ScrapeScope::Both
        }
    }

    /// Credentials from the flags, if any were given.
    pub fn auth(&self) -> Option<AuthMethod> {
        if let Some(path) = &self.key {
            return Some(AuthMethod::PrivateKey {
                path: path.clone(),
                passphrase: self.key_passphrase.clone().map(SecretString::from),
            });
        }
        self.passwd.as_deref().map(AuthMethod::password)
    }

    /// SSH settings. `None` when no credentials were supplied.
    pub fn ssh_config(&self) -> Option<SshConfig> {
        let mut config = SshConfig::new(&self.host, &self.user, self.auth()?);
        config.port = self.port;
        config.known_hosts_path = self.known_hosts.clone();
        if self.strict_host_key {
            config.host_key_verification = HostKeyVerification::Strict;
        }
        Some(config)
    }

    /// Scrape policy.
    pub fn scraper_config(&self) -> ScraperConfig {
        ScraperConfig {
            scope: self.scope(),
            read: ReadConfig {
                timeout: Duration::from_secs(self.timeout),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Default log filter.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
