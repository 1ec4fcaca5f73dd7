use core::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Configuration for the REST service.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, clap::Args)]
#[group(id = "RestServiceConfig")]
pub struct Config {
    /// The socket address to bind to.
    #[serde(default = "config_defaults::bind_addr")]
    #[arg(
        long = "bind-address",
        value_name = "REST_SERVICE_BIND_ADDRESS",
        env = "REST_SERVICE_BIND_ADDRESS",
        default_value_t = config_defaults::bind_addr()
    )]
    pub bind_addr: SocketAddr,
    /// The maximum number of concurrent HTTP requests.
    #[serde(default = "config_defaults::max_concurrent_http_requests")]
    #[arg(
        long = "max-concurrent-http-requests",
        value_name = "REST_SERVICE_MAX_CONCURRENT_HTTP_REQUESTS",
        env = "REST_SERVICE_MAX_CONCURRENT_HTTP_REQUESTS",
        default_value_t = config_defaults::max_concurrent_http_requests()
    )]
    pub max_concurrent_http_requests: usize,
    /// Port that replaces the one in `bind_addr` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[arg(long = "server-port", value_name = "SERVER_PORT", env = "SERVER_PORT")]
    pub server_port: Option<u16>,
}

impl Config {
    /// Address the service listens on, with `server_port` applied.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        let mut addr = self.bind_addr;
        if let Some(port) = self.server_port {
            addr.set_port(port);
        }
        addr
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: config_defaults::bind_addr(),
            max_concurrent_http_requests: config_defaults::max_concurrent_http_requests(),
            server_port: None,
        }
    }
}

pub(crate) mod config_defaults {
    use core::net::{IpAddr, Ipv4Addr, SocketAddr};

    pub(crate) const fn bind_addr() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080)
    }

    pub(crate) const fn max_concurrent_http_requests() -> usize {
        1024
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, clap::Parser)]
    struct Cli {
        #[command(flatten)]
        config: Config,
    }

    fn from_env(vars: [(&str, Option<&str>); 2]) -> Config {
        temp_env::with_vars(vars, || Cli::try_parse_from(["rest-service"]).unwrap().config)
    }

    #[test]
    fn listens_on_default_port() {
        let config = from_env([
            ("REST_SERVICE_BIND_ADDRESS", None),
            ("SERVER_PORT", None),
        ]);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn server_port_overrides_bind_port() {
        let config = from_env([
            ("REST_SERVICE_BIND_ADDRESS", Some("127.0.0.1:3000")),
            ("SERVER_PORT", Some("9000")),
        ]);
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.socket_addr(), "127.0.0.1:9000".parse().unwrap());
    }

    #[test]
    fn server_port_deserializes() {
        let config: Config = serde_json::from_str(r#"{ "server_port": 8081 }"#).unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:8081".parse().unwrap());
    }
}
