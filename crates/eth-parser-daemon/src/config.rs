use std::path::PathBuf;

use eyre::WrapErr as _;
use serde::Deserialize;

/// Command line of the daemon. Every option can also be given through the environment.
#[derive(Debug, clap::Parser)]
#[command(version, about = "Tracks transactions of subscribed Ethereum addresses")]
pub(crate) struct Cli {
    /// TOML configuration file; when given it replaces all other options
    #[arg(long = "config", env = "CONFIG_PATH")]
    pub(crate) config_path: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) eth_parser: eth_parser::Config,

    #[command(flatten)]
    pub(crate) rest_service: rest_service::Config,
}

/// Resolved configuration of every component.
#[derive(Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) eth_parser: eth_parser::Config,
    #[serde(default)]
    pub(crate) rest_service: rest_service::Config,
}

impl Cli {
    pub(crate) fn into_config(self) -> eyre::Result<Config> {
        let Some(path) = self.config_path else {
            return Ok(Config {
                eth_parser: self.eth_parser,
                rest_service: self.rest_service,
            });
        };
        let raw = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("reading config file {}", path.display()))?;
        parse_toml(&raw).wrap_err_with(|| format!("parsing config file {}", path.display()))
    }
}

pub(crate) fn parse_toml(raw: &str) -> eyre::Result<Config> {
    Ok(toml::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use clap::Parser as _;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_full_toml() {
        let config = parse_toml(indoc! {r#"
            [eth_parser]
            rpc_url = "http://127.0.0.1:8545"
            rpc_timeout_in_milliseconds = 2000
            poll_interval_in_milliseconds = 500

            [rest_service]
            bind_addr = "127.0.0.1:3000"
            max_concurrent_http_requests = 16
        "#})
        .unwrap();

        assert_eq!(config.eth_parser.rpc_url.as_str(), "http://127.0.0.1:8545/");
        assert_eq!(config.eth_parser.rpc_timeout, Duration::from_secs(2));
        assert_eq!(config.eth_parser.poll_interval, Duration::from_millis(500));
        assert_eq!(config.rest_service.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.rest_service.max_concurrent_http_requests, 16);
    }

    #[test]
    fn missing_tables_use_defaults() {
        let config = parse_toml("").unwrap();
        assert_eq!(
            config,
            Config {
                eth_parser: eth_parser::Config::default(),
                rest_service: rest_service::Config::default(),
            }
        );
    }

    #[test]
    fn rejects_malformed_values() {
        let result = parse_toml(indoc! {r#"
            [rest_service]
            bind_addr = "not an address"
        "#});
        assert!(result.is_err());
    }

    #[test]
    fn cli_reads_environment() {
        temp_env::with_vars(
            [
                ("CONFIG_PATH", None),
                ("RPC_URL", Some("http://geth:8545")),
                ("REST_SERVICE_BIND_ADDRESS", Some("127.0.0.1:9090")),
                ("REST_SERVICE_MAX_CONCURRENT_HTTP_REQUESTS", None),
                ("SERVER_PORT", None),
            ],
            || {
                let config = Cli::try_parse_from(["eth-parser-daemon"])
                    .unwrap()
                    .into_config()
                    .unwrap();
                assert_eq!(config.eth_parser.rpc_url.as_str(), "http://geth:8545/");
                assert_eq!(
                    config.rest_service.bind_addr,
                    "127.0.0.1:9090".parse().unwrap()
                );
                assert_eq!(config.rest_service.max_concurrent_http_requests, 1024);
            },
        );
    }

    #[test]
    fn config_file_replaces_flags() {
        let path = std::env::temp_dir().join(format!(
            "eth-parser-daemon-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            indoc! {r#"
                [rest_service]
                bind_addr = "127.0.0.1:4000"
            "#},
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "eth-parser-daemon",
            "--config",
            path.to_str().unwrap(),
            "--bind-address",
            "127.0.0.1:5000",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            config.rest_service.bind_addr,
            "127.0.0.1:4000".parse().unwrap()
        );
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from([
            "eth-parser-daemon",
            "--config",
            "/definitely/not/here.toml",
        ])
        .unwrap();
        let report = cli.into_config().unwrap_err();
        assert!(report.to_string().contains("reading config file"));
    }
}
