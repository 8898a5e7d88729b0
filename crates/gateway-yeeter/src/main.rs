use anyhow::Result;
use lazy_static::lazy_static;
use std::{process, sync::RwLock};
use tokio::runtime::Runtime;
use tracing::{debug, error, info};

use gateway_yeeter::{
    cli,
    config::{self, Config},
    tracing::setup_tracing,
    GatewayYeeter,
};

lazy_static! {
    static ref TRACE_SYSTEM_INITIALIZED: RwLock<bool> = RwLock::new(false);
}

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let config = match Config::from_args(&matches) {
        Ok(config) => config,
        Err(e) => fatal_error(e.to_string()),
    };

    // Both ring and aws-lc-rs end up being compiled in, rustls needs to be told which one to use
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        fatal_error("Cannot install the default crypto provider".to_owned());
    }

    let rt = Runtime::new()?;
    rt.block_on(async {
        // Setup the tracing system. This MUST be done inside of a tokio Runtime
        // because some collectors rely on it and would panic otherwise.
        match setup_tracing(&config.log_level, &config.log_fmt, config.log_no_color) {
            Err(err) => fatal_error(err.to_string()),
            Ok(_) => {
                debug!("tracing system ready");
                let mut w = TRACE_SYSTEM_INITIALIZED
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                *w = true;
            }
        };

        info!(
            service = config::SERVICE_NAME,
            version = env!("CARGO_PKG_VERSION"),
            "starting"
        );

        let server = match GatewayYeeter::new_from_config(config).await {
            Ok(server) => server,
            Err(e) => fatal_error(e.to_string()),
        };
        if let Err(e) = server.run().await {
            fatal_error(format!("Failed to start server: {e}"));
        }
    });

    Ok(())
}

fn fatal_error(msg: String) -> ! {
    let trace_system_ready = TRACE_SYSTEM_INITIALIZED
        .read()
        .map(|ready| *ready)
        .unwrap_or(false);
    if trace_system_ready {
        error!("{}", msg);
    } else {
        eprintln!("{msg}");
    }

    process::exit(1);
}
