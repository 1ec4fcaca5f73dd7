use core::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use url::Url;

/// Configuration for the [`crate::Parser`] and its block scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder, clap::Args)]
#[group(id = "EthParserConfig")]
pub struct Config {
    /// JSON-RPC endpoint of the chain node
    #[builder(default = config_defaults::rpc_url())]
    #[serde(default = "config_defaults::rpc_url")]
    #[arg(long, env = "RPC_URL", default_value_t = config_defaults::rpc_url())]
    pub rpc_url: Url,

    /// Timeout applied to every request sent to the node, in milliseconds
    #[builder(default = config_defaults::rpc_timeout())]
    #[serde(
        rename = "rpc_timeout_in_milliseconds",
        default = "config_defaults::rpc_timeout",
        deserialize_with = "common_serde_utils::duration_ms_decode",
        serialize_with = "common_serde_utils::duration_ms_encode"
    )]
    #[arg(
        long = "rpc-timeout-ms",
        env = "RPC_TIMEOUT_MS",
        value_parser = parse_duration_ms,
        default_value = "10000"
    )]
    pub rpc_timeout: Duration,

    /// Pause between two scan cycles, in milliseconds
    #[builder(default = config_defaults::poll_interval())]
    #[serde(
        rename = "poll_interval_in_milliseconds",
        default = "config_defaults::poll_interval",
        deserialize_with = "common_serde_utils::duration_ms_decode",
        serialize_with = "common_serde_utils::duration_ms_encode"
    )]
    #[arg(
        long = "poll-interval-ms",
        env = "BLOCK_POLL_INTERVAL_MS",
        value_parser = parse_duration_ms,
        default_value = "10000"
    )]
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn parse_duration_ms(raw: &str) -> Result<Duration, core::num::ParseIntError> {
    raw.parse::<u64>().map(Duration::from_millis)
}

pub(crate) mod config_defaults {
    use core::time::Duration;

    use url::Url;

    const RPC_URL: &str = "https://cloudflare-eth.com";

    pub(crate) fn rpc_url() -> Url {
        Url::parse(RPC_URL).expect("default rpc url is valid")
    }

    pub(crate) const fn rpc_timeout() -> Duration {
        Duration::from_secs(10)
    }

    pub(crate) const fn poll_interval() -> Duration {
        Duration::from_secs(10)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.rpc_url.as_str(), "https://cloudflare-eth.com/");
        assert_eq!(config.rpc_timeout, Duration::from_secs(10));
        assert_eq!(config.poll_interval, Duration::from_secs(10));
    }

    #[test]
    fn deserialize_fills_missing_fields_with_defaults() {
        let config: Config = serde_json::from_value(json!({
            "rpc_url": "http://localhost:8545",
            "poll_interval_in_milliseconds": 250
        }))
        .unwrap();

        assert_eq!(
            config,
            Config::builder()
                .rpc_url(Url::parse("http://localhost:8545").unwrap())
                .poll_interval(Duration::from_millis(250))
                .build()
        );
    }

    #[test]
    fn deserialize_rejects_invalid_url() {
        serde_json::from_value::<Config>(json!({ "rpc_url": "not a url" })).unwrap_err();
    }

    #[test]
    fn reads_environment() {
        temp_env::with_vars(
            [
                ("RPC_URL", Some("http://node.internal:8545")),
                ("RPC_TIMEOUT_MS", Some("1500")),
                ("BLOCK_POLL_INTERVAL_MS", None),
            ],
            || {
                let cli = Cli::try_parse_from(["eth-parser"]).unwrap();
                assert_eq!(cli.config.rpc_url.as_str(), "http://node.internal:8545/");
                assert_eq!(cli.config.rpc_timeout, Duration::from_millis(1500));
                assert_eq!(cli.config.poll_interval, Duration::from_secs(10));
            },
        );
    }
}
