use clap::builder::PossibleValue;
use clap::{crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    let mut args = vec![
        Arg::new("log-level")
            .long("log-level")
            .value_name("LOG_LEVEL")
            .env("GATEWAY_YEETER_LOG_LEVEL")
            .default_value("info")
            .value_parser([
                PossibleValue::new("trace"),
                PossibleValue::new("debug"),
                PossibleValue::new("info"),
                PossibleValue::new("warn"),
                PossibleValue::new("error"),
            ])
            .help("Log level"),
        Arg::new("log-fmt")
            .long("log-fmt")
            .value_name("LOG_FMT")
            .env("GATEWAY_YEETER_LOG_FMT")
            .default_value("text")
            .value_parser([PossibleValue::new("text"), PossibleValue::new("json")])
            .help("Log output format"),
        Arg::new("log-no-color")
            .long("log-no-color")
            .env("NO_COLOR")
            .action(ArgAction::SetTrue)
            .help("Disable colored output for logs"),
        Arg::new("address")
            .long("addr")
            .value_name("BIND_ADDRESS")
            .default_value("0.0.0.0")
            .env("GATEWAY_YEETER_BIND_ADDRESS")
            .help("Bind against ADDRESS"),
        Arg::new("port")
            .long("port")
            .value_name("PORT")
            .default_value("8443")
            .env("GATEWAY_YEETER_PORT")
            .help("Listen on PORT"),
        Arg::new("cert-file")
            .long("cert-file")
            .value_name("CERT_FILE")
            .default_value("/etc/server/certs/tls.crt")
            .env("GATEWAY_YEETER_CERT_FILE")
            .help("Path to an X.509 certificate file for HTTPS"),
        Arg::new("key-file")
            .long("key-file")
            .value_name("KEY_FILE")
            .default_value("/etc/server/certs/tls.key")
            .env("GATEWAY_YEETER_KEY_FILE")
            .help("Path to an X.509 private key file for HTTPS"),
    ];
    args.sort_by(|a, b| a.get_id().cmp(b.get_id()));

    Command::new(crate_name!())
        .author(crate_authors!())
        .version(crate_version!())
        .about(crate_description!())
        .args(args)
}
