use std::net::{IpAddr, SocketAddr};

use clap::Parser;

/// Server settings. Every flag can also come from the environment.
#[derive(Debug, Parser)]
#[command(name = "astsim-api", version, about = "AST similarity HTTP service")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "ASTSIM_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "ASTSIM_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "ASTSIM_LOG", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
