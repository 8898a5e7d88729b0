use axum::Router;
use gateway_yeeter::{
    config::{Config, TlsConfig},
    GatewayYeeter,
};
use rcgen::{generate_simple_self_signed, CertifiedKey};
use std::net::SocketAddr;
use tempfile::tempdir;

pub(crate) fn default_test_config() -> Config {
    // Starting from rustls 0.22, each application must set its default crypto provider.
    // This is done by `main`, which is not called by the tests.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let CertifiedKey {
        cert,
        signing_key: key_pair,
    } = generate_simple_self_signed(vec!["gateway-yeeter.openshift-mtv.svc".to_owned()]).unwrap();

    let certs_dir = tempdir().unwrap().keep();
    let cert_file = certs_dir.join("tls.crt");
    let key_file = certs_dir.join("tls.key");
    std::fs::write(&cert_file, cert.pem()).unwrap();
    std::fs::write(&key_file, key_pair.serialize_pem()).unwrap();

    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 8443)),
        tls_config: TlsConfig {
            cert_file,
            key_file,
        },
        log_level: "info".to_owned(),
        log_fmt: "json".to_owned(),
        log_no_color: false,
    }
}

pub(crate) async fn app(config: Config) -> Router {
    let server = GatewayYeeter::new_from_config(config).await.unwrap();

    server.router()
}
