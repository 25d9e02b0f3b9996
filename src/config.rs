//! Server configuration from command line flags and environment variables.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// In-memory REST API for bank transactions.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The address to serve the API from.
    #[arg(long, env = "BANK_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "BANK_PORT", default_value_t = 8080)]
    pub port: u16,

    /// CSV file of transactions to load at startup.
    #[arg(long, env = "BANK_SEED")]
    pub seed: Option<PathBuf>,

    /// Page size used when a list request does not specify one.
    #[arg(long, default_value_t = 10)]
    pub default_page_size: usize,

    /// Largest page size a list request may ask for.
    #[arg(long, default_value_t = 100)]
    pub max_page_size: usize,

    /// Serve point lookups straight from the store.
    #[arg(long)]
    pub no_cache: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Log filter directives, e.g. `info` or `bank_transactions=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn pagination(&self) -> PaginationConfig {
        PaginationConfig {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }
}

/// The config for paging list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// The page size to default to when not specified in a request.
    pub default_page_size: usize,
    /// Requests asking for bigger pages are clamped to this size.
    pub max_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    /// Resolves the requested page and size, filling in defaults.
    pub fn resolve(&self, page: Option<usize>, size: Option<usize>) -> (usize, usize) {
        let size = size
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size);
        (page.unwrap_or(0), size)
    }
}
