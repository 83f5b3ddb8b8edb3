//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::Parser;

/// Runtime settings. Each flag falls back to an environment variable, then
/// to its default.
#[derive(Clone, Debug, Parser)]
#[command(name = "personae", version, about = "Validated person API")]
pub struct Config {
    /// Address the HTTP server binds to.
    #[arg(long, env = "PERSONAE_ADDR", default_value = "127.0.0.1:8000")]
    pub addr: SocketAddr,

    /// Tracing filter directive, e.g. `info` or `personae=debug,hyper=warn`.
    #[arg(long, env = "PERSONAE_LOG", default_value = "info")]
    pub log: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from(["personae", "--addr", "0.0.0.0:9000", "--log", "debug"]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(config.log, "debug");
    }

    #[test]
    fn malformed_address_is_rejected() {
        assert!(Config::try_parse_from(["personae", "--addr", "localhost"]).is_err());
    }
}
