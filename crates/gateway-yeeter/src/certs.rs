use std::{path::Path, sync::Arc};

use ::tracing::{info, warn};
use anyhow::{anyhow, Result};
use axum_server::tls_rustls::RustlsConfig;
use rustls::ServerConfig;
use rustls_pki_types::{pem::SliceIter, CertificateDer, PrivateKeyDer};

// This is required by certificate hot reload when using inotify, which is available only on linux
#[cfg(target_os = "linux")]
use tokio_stream::StreamExt;

use crate::config::TlsConfig;

/// There's no watching of the certificate files on non-linux platforms
/// since we rely on inotify to watch for changes
#[cfg(not(target_os = "linux"))]
pub(crate) async fn create_tls_config_and_watch_certificate_changes(
    tls_config: TlsConfig,
) -> Result<RustlsConfig> {
    let (cert, key) = load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file).await?;
    let server_config = build_tls_server_config(cert, key)?;

    Ok(RustlsConfig::from_config(Arc::new(server_config)))
}

/// Return the RustlsConfig and watch for changes in the certificate files
/// using inotify.
/// When both the certificate and its key are changed, the RustlsConfig is reloaded,
/// causing the https server to use the new certificate.
///
/// Relying on inotify is only available on linux
#[cfg(target_os = "linux")]
pub(crate) async fn create_tls_config_and_watch_certificate_changes(
    tls_config: TlsConfig,
) -> Result<RustlsConfig> {
    use ::tracing::error;

    // Build initial TLS configuration
    let (cert, key) = load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file).await?;
    let initial_config = build_tls_server_config(cert, key)?;

    let rust_config = RustlsConfig::from_config(Arc::new(initial_config));
    let reloadable_rust_config = rust_config.clone();

    // Init inotify to watch for changes in the certificate files
    let inotify =
        inotify::Inotify::init().map_err(|e| anyhow!("Cannot initialize inotify: {e}"))?;
    let cert_watch = inotify
        .watches()
        .add(
            tls_config.cert_file.clone(),
            inotify::WatchMask::CLOSE_WRITE,
        )
        .map_err(|e| anyhow!("Cannot watch certificate file: {e}"))?;
    let key_watch = inotify
        .watches()
        .add(tls_config.key_file.clone(), inotify::WatchMask::CLOSE_WRITE)
        .map_err(|e| anyhow!("Cannot watch key file: {e}"))?;

    let buffer = [0; 1024];
    let stream = inotify
        .into_event_stream(buffer)
        .map_err(|e| anyhow!("Cannot create inotify event stream: {e}"))?;

    tokio::spawn(async move {
        tokio::pin!(stream);
        let mut cert_changed = false;
        let mut key_changed = false;

        while let Some(event) = stream.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    warn!("Cannot read inotify event: {e}");
                    continue;
                }
            };

            if event.wd == cert_watch {
                info!("TLS certificate file has been modified");
                cert_changed = true;
            }
            if event.wd == key_watch {
                info!("TLS key file has been modified");
                key_changed = true;
            }

            // The certificate and its key are rotated together, wait for both
            if !(key_changed && cert_changed) {
                continue;
            }
            info!("Reloading Server TLS certificates");
            cert_changed = false;
            key_changed = false;

            let server_config =
                match load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file)
                    .await
                    .and_then(|(cert, key)| build_tls_server_config(cert, key))
                {
                    Ok(server_config) => server_config,
                    Err(e) => {
                        error!("Failed to reload TLS certificates: {e}");
                        continue;
                    }
                };
            reloadable_rust_config.reload_from_config(Arc::new(server_config));
        }
    });

    Ok(rust_config)
}

// Build the TLS server
fn build_tls_server_config(
    cert: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
) -> Result<rustls::ServerConfig> {
    let mut server_config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert, key)?;
    server_config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(server_config)
}

// Load the server certificate and key
async fn load_server_cert_and_key(
    cert_file: &Path,
    key_file: &Path,
) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>)> {
    let cert_contents = tokio::fs::read(cert_file)
        .await
        .map_err(|e| anyhow!("Cannot read certificate file {}: {e}", cert_file.display()))?;
    let key_contents = tokio::fs::read(key_file)
        .await
        .map_err(|e| anyhow!("Cannot read key file {}: {e}", key_file.display()))?;

    let cert_iterator: SliceIter<CertificateDer> =
        rustls_pki_types::pem::SliceIter::new(&cert_contents[..]);

    let certs: Vec<_> = cert_iterator
        .filter_map(|it| {
            if let Err(ref e) = it {
                warn!("Cannot parse certificate: {e}");
            }
            it.ok()
        })
        .collect();

    if certs.is_empty() {
        return Err(anyhow!(
            "No certificate found in certificate file {}",
            cert_file.display()
        ));
    }

    let key_iterator: SliceIter<PrivateKeyDer> =
        rustls_pki_types::pem::SliceIter::new(&key_contents[..]);
    let keys: Vec<PrivateKeyDer> = key_iterator
        .filter_map(|it| {
            if let Err(ref e) = it {
                warn!("Cannot parse private key: {e}");
            }
            it.ok()
        })
        .collect();

    if keys.len() != 1 {
        return Err(anyhow!(
            "Expected exactly one key in key file, found {}",
            keys.len()
        ));
    }

    Ok((certs, keys[0].clone_key()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{generate_simple_self_signed, CertifiedKey};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn install_crypto_provider() {
        // Fails when another test already installed it
        let _ = rustls::crypto::ring::default_provider().install_default();
    }

    fn write_cert_and_key(dir: &TempDir, hostname: &str) -> TlsConfig {
        let CertifiedKey {
            cert,
            signing_key: key_pair,
        } = generate_simple_self_signed(vec![hostname.to_owned()]).unwrap();

        let cert_file = dir.path().join("tls.crt");
        let key_file = dir.path().join("tls.key");
        std::fs::write(&cert_file, cert.pem()).unwrap();
        std::fs::write(&key_file, key_pair.serialize_pem()).unwrap();

        TlsConfig {
            cert_file,
            key_file,
        }
    }

    #[tokio::test]
    async fn load_valid_cert_and_key() {
        install_crypto_provider();
        let dir = tempfile::tempdir().unwrap();
        let tls_config = write_cert_and_key(&dir, "gateway-yeeter.example.com");

        let (cert, key) = load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file)
            .await
            .unwrap();
        assert_eq!(1, cert.len());

        let server_config = build_tls_server_config(cert, key).unwrap();
        assert!(server_config
            .alpn_protocols
            .contains(&b"http/1.1".to_vec()));
    }

    #[tokio::test]
    async fn missing_files_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing: PathBuf = dir.path().join("missing.pem");

        assert!(load_server_cert_and_key(&missing, &missing).await.is_err());
    }

    #[tokio::test]
    async fn key_file_without_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let tls_config = write_cert_and_key(&dir, "gateway-yeeter.example.com");
        std::fs::write(&tls_config.key_file, "not a key").unwrap();

        assert!(
            load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn create_tls_config() {
        install_crypto_provider();
        let dir = tempfile::tempdir().unwrap();
        let tls_config = write_cert_and_key(&dir, "gateway-yeeter.example.com");

        assert!(create_tls_config_and_watch_certificate_changes(tls_config)
            .await
            .is_ok());
    }
}
