use anyhow::{anyhow, Result};
use clap::ArgMatches;
use lazy_static::lazy_static;
use std::net::SocketAddr;
use std::path::PathBuf;

pub static SERVICE_NAME: &str = "gateway-yeeter";

/// Admission reviews larger than this are refused before being decoded.
pub const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024;

lazy_static! {
    pub(crate) static ref HOSTNAME: String =
        std::env::var("HOSTNAME").unwrap_or_else(|_| String::from("unknown"));
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub tls_config: TlsConfig,
    pub log_level: String,
    pub log_fmt: String,
    pub log_no_color: bool,
}

#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
}

impl Config {
    pub fn from_args(matches: &ArgMatches) -> Result<Self> {
        let addr = api_bind_address(matches)?;
        let tls_config = tls_files(matches)?;

        let log_level = matches
            .get_one::<String>("log-level")
            .expect("This should not happen, there's a default value for log-level")
            .to_owned();
        let log_fmt = matches
            .get_one::<String>("log-fmt")
            .expect("This should not happen, there's a default value for log-fmt")
            .to_owned();
        let log_no_color = matches
            .get_one::<bool>("log-no-color")
            .expect("clap should have assigned a default value")
            .to_owned();

        Ok(Self {
            addr,
            tls_config,
            log_level,
            log_fmt,
            log_no_color,
        })
    }
}

fn api_bind_address(matches: &ArgMatches) -> Result<SocketAddr> {
    format!(
        "{}:{}",
        matches
            .get_one::<String>("address")
            .expect("This should not happen, there's a default value for address"),
        matches
            .get_one::<String>("port")
            .expect("This should not happen, there's a default value for port")
    )
    .parse()
    .map_err(|e| anyhow!("error parsing arguments: {}", e))
}

fn tls_files(matches: &ArgMatches) -> Result<TlsConfig> {
    let cert_file = matches
        .get_one::<String>("cert-file")
        .expect("This should not happen, there's a default value for cert-file");
    let key_file = matches
        .get_one::<String>("key-file")
        .expect("This should not happen, there's a default value for key-file");
    if cert_file.is_empty() || key_file.is_empty() {
        return Err(anyhow!(
            "error parsing arguments: both --cert-file and --key-file must be provided"
        ));
    }

    Ok(TlsConfig {
        cert_file: PathBuf::from(cert_file),
        key_file: PathBuf::from(key_file),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli;

    #[test]
    fn default_values() {
        let matches = cli::build_cli()
            .try_get_matches_from(["gateway-yeeter"])
            .unwrap();
        let config = Config::from_args(&matches).unwrap();

        assert_eq!("0.0.0.0:8443".parse::<SocketAddr>().unwrap(), config.addr);
        assert_eq!(
            PathBuf::from("/etc/server/certs/tls.crt"),
            config.tls_config.cert_file
        );
        assert_eq!(
            PathBuf::from("/etc/server/certs/tls.key"),
            config.tls_config.key_file
        );
        assert_eq!("info", config.log_level);
        assert_eq!("text", config.log_fmt);
    }

    #[test]
    fn custom_values() {
        let matches = cli::build_cli()
            .try_get_matches_from([
                "gateway-yeeter",
                "--addr=127.0.0.1",
                "--port=9443",
                "--cert-file=/tmp/cert.pem",
                "--key-file=/tmp/key.pem",
                "--log-level=debug",
                "--log-fmt=json",
                "--log-no-color",
            ])
            .unwrap();
        let config = Config::from_args(&matches).unwrap();

        assert_eq!("127.0.0.1:9443".parse::<SocketAddr>().unwrap(), config.addr);
        assert_eq!(PathBuf::from("/tmp/cert.pem"), config.tls_config.cert_file);
        assert_eq!(PathBuf::from("/tmp/key.pem"), config.tls_config.key_file);
        assert_eq!("debug", config.log_level);
        assert_eq!("json", config.log_fmt);
        assert!(config.log_no_color);
    }

    #[test]
    fn invalid_address() {
        let matches = cli::build_cli()
            .try_get_matches_from(["gateway-yeeter", "--port=not-a-port"])
            .unwrap();

        assert!(Config::from_args(&matches).is_err());
    }

    #[test]
    fn empty_tls_files() {
        let matches = cli::build_cli()
            .try_get_matches_from(["gateway-yeeter", "--cert-file="])
            .unwrap();

        assert!(Config::from_args(&matches).is_err());
    }

    #[test]
    fn unknown_log_format() {
        assert!(cli::build_cli()
            .try_get_matches_from(["gateway-yeeter", "--log-fmt=otlp"])
            .is_err());
    }
}
