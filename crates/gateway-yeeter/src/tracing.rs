use anyhow::{anyhow, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

// Setup the tracing system. This MUST be done inside of a tokio Runtime
// because some collectors rely on it and would panic otherwise.
pub fn setup_tracing(log_level: &str, log_fmt: &str, log_no_color: bool) -> Result<()> {
    // setup logging
    let filter_layer = EnvFilter::builder()
        .parse(log_level)?
        // some of our dependencies generate trace events too, but we don't care about them ->
        // let's filter them
        .add_directive("h2=off".parse()?)
        .add_directive("hyper=off".parse()?)
        .add_directive("rustls=off".parse()?);

    match log_fmt {
        "json" => tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().json())
            .try_init()?,
        "text" => {
            let fmt_layer = fmt::layer().with_ansi(!log_no_color);

            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt_layer)
                .try_init()?
        }
        _ => return Err(anyhow!("Unknown log message format")),
    };

    Ok(())
}
