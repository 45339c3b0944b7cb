//! Kubernetes client construction
//!
//! Thin glue for callers that start from a kubeconfig file or in-cluster
//! environment rather than an existing client or config.

use std::path::Path;
use std::time::Duration;

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

use crate::{Error, Result};

/// Default connection timeout for kube clients
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default read timeout for kube clients
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Load a kube config from an optional kubeconfig path with default timeouts
///
/// With a path, the kubeconfig file is read and converted; without one, the
/// config is inferred from the environment (in-cluster service account or
/// `KUBECONFIG`). The returned config can be used directly as a reviewer
/// template or turned into a client.
pub async fn load_config(kubeconfig: Option<&Path>) -> Result<Config> {
    let mut config = match kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path)
                .map_err(|e| Error::config(format!("failed to read kubeconfig: {}", e)))?;
            Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .map_err(|e| Error::config(format!("failed to load kubeconfig: {}", e)))?
        }
        None => Config::infer().await.map_err(kube::Error::InferConfig)?,
    };

    config.connect_timeout = Some(DEFAULT_CONNECT_TIMEOUT);
    config.read_timeout = Some(DEFAULT_READ_TIMEOUT);

    Ok(config)
}

/// Create a client from an optional kubeconfig path with default timeouts
pub async fn create_client(kubeconfig: Option<&Path>) -> Result<Client> {
    let config = load_config(kubeconfig).await?;
    Client::try_from(config).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_kubeconfig_path_is_a_config_error() {
        let err = load_config(Some(Path::new("/nonexistent/kubeconfig")))
            .await
            .err()
            .expect("must fail");
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("failed to read kubeconfig"));
    }
}
