use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub const PORT_ENV: &str = "MINES_SERVER_PORT";
pub const DEFAULT_PORT: u16 = 8080;

/// Ports below this one are privileged and never used.
pub const MIN_PORT: u16 = 1024;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper games over HTTP", long_about = None)]
pub struct Args {
    /// What log level to use
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Address to listen on
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on, anything unusable falls back to 8080
    #[arg(short, long, env = PORT_ENV)]
    pub port: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            host: args.host,
            port: resolve_port(args.port.as_deref()),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Missing, unparsable or privileged ports become [`DEFAULT_PORT`].
pub fn resolve_port(value: Option<&str>) -> u16 {
    match value.map(str::trim).map(str::parse::<u16>) {
        Some(Ok(port)) if port >= MIN_PORT => port,
        Some(Ok(port)) => {
            log::warn!("Port {} is privileged, using {}", port, DEFAULT_PORT);
            DEFAULT_PORT
        }
        Some(Err(err)) => {
            log::warn!("Unusable port ({}), using {}", err, DEFAULT_PORT);
            DEFAULT_PORT
        }
        None => DEFAULT_PORT,
    }
}
