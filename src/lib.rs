//! Fine-grained metrics access review for managed clusters
//!
//! Answers "which managed clusters, and which namespaces on them, may this
//! user view metrics for?" by reducing the user's cluster-scoped RBAC rules
//! instead of requiring a permission object per cluster/namespace pair.
//!
//! Access is authored with a verb convention on `managedclusters` rules: a
//! ClusterRole rule naming clusters in `resourceNames` and carrying verbs of
//! the form `metrics/<namespace>` grants viewing of `<namespace>` metrics on
//! each named cluster; a `*` verb (or an unrestricted rule) grants all
//! namespaces. One `SelfSubjectRulesReview` round trip retrieves the caller's
//! rules; matching and decoding are pure computation on the response.
//!
//! # Modules
//!
//! - [`acl`] - Access control configuration (target group/resource + verb prefix)
//! - [`verbs`] - Order-preserving verb sets with union merge
//! - [`rules`] - Rule retrieval round trip ([`rules::RulesReview`])
//! - [`matcher`] - Rule matching and verb reduction per resource name
//! - [`decode`] - Metrics verb decoding into per-cluster namespaces
//! - [`reviewer`] - [`AccessReviewer`] facade and standalone resource access
//! - [`client`] - Kubernetes client construction glue
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```ignore
//! use metrics_access::AccessReviewer;
//!
//! // One reviewer serving many callers: derive a client per bearer token.
//! let template = metrics_access::client::load_config(None).await?;
//! let reviewer = AccessReviewer::from_template(template);
//! let access = reviewer.get_metrics_access(user_token, &[]).await?;
//! for (cluster, namespaces) in &access {
//!     println!("{cluster}: {namespaces:?}");
//! }
//! ```

#![deny(missing_docs)]

pub mod acl;
pub mod client;
pub mod decode;
pub mod error;
pub mod matcher;
pub mod reviewer;
pub mod rules;
pub mod verbs;

pub use acl::{AclConfig, GroupResource, WILDCARD};
pub use decode::{decode_metrics_access, MetricsAccessMap};
pub use error::Error;
pub use matcher::{match_resource_rules, ResourceAccessMap};
pub use reviewer::{config_with_token, get_resource_access, AccessReviewer};
pub use rules::RulesReview;
pub use verbs::VerbSet;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
