//! Metrics access CLI
//!
//! Prints which managed-cluster namespaces a user may view metrics for, as
//! JSON. Thin glue over [`AccessReviewer`]; all logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use metrics_access::{client, AccessReviewer, Result};

/// Show a user's metrics access to managed clusters
#[derive(Parser)]
#[command(name = "metrics-access", version, about)]
struct Cli {
    /// Path to a kubeconfig file (inferred from the environment when omitted)
    #[arg(long, value_name = "PATH")]
    kubeconfig: Option<PathBuf>,

    /// Bearer token of the user to evaluate access for
    ///
    /// When omitted, access is evaluated as the kubeconfig's own identity.
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Managed cluster names to query (all allowed clusters when omitted)
    #[arg(value_name = "CLUSTER")]
    clusters: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let clusters: Vec<&str> = cli.clusters.iter().map(String::as_str).collect();

    let access = match &cli.token {
        Some(token) => {
            let template = client::load_config(cli.kubeconfig.as_deref()).await?;
            let reviewer = AccessReviewer::from_template(template);
            reviewer.get_metrics_access(token, &clusters).await?
        }
        None => {
            let kube_client = client::create_client(cli.kubeconfig.as_deref()).await?;
            let reviewer = AccessReviewer::from_static(kube_client);
            reviewer.get_metrics_access("", &clusters).await?
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&access).expect("access map serializes")
    );

    Ok(())
}
