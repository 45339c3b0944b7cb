//! Access review facade
//!
//! [`AccessReviewer`] resolves which caller identity to use for an invocation
//! and runs the rule-retrieval, matching, and decoding pipeline against the
//! well-known metrics access configuration. [`get_resource_access`] exposes
//! the retrieval + matching half standalone for other resource types.

use kube::config::AuthInfo;
use secrecy::SecretString;
use tracing::{debug, instrument};

use crate::acl::{AclConfig, GroupResource};
use crate::decode::{decode_metrics_access, MetricsAccessMap};
use crate::matcher::{match_resource_rules, ResourceAccessMap};
use crate::rules::RulesReview;
use crate::{Error, Result};

/// The caller identity a reviewer uses for its round trips
///
/// Exactly one mode is configured at construction. Template mode serves many
/// callers: every invocation derives a fresh client authenticated by that
/// call's bearer token. Static mode serves a single caller: the configured
/// client connection is reused and per-call tokens are ignored.
enum Identity {
    /// Connection settings reused across calls, credentials supplied per call
    Template(kube::Config),
    /// A ready-made client for one fixed caller
    Static(kube::Client),
}

/// Retrieves a caller's access to observability metrics on managed clusters
///
/// Holds the identity source and the metrics access configuration; both are
/// immutable after construction, so a reviewer is safe to share across
/// concurrent calls.
pub struct AccessReviewer {
    identity: Identity,
    acl: AclConfig,
}

impl AccessReviewer {
    /// Create a reviewer that derives a per-call client from `template`
    ///
    /// Each [`Self::get_metrics_access`] call must supply the caller's bearer
    /// token; connection and TLS settings are copied from the template with
    /// the token substituted for all template credentials.
    pub fn from_template(template: kube::Config) -> Self {
        Self {
            identity: Identity::Template(template),
            acl: AclConfig::metrics(),
        }
    }

    /// Create a reviewer that uses `client` directly for every call
    ///
    /// Access is always evaluated as the identity the client authenticates
    /// as; per-call tokens are ignored.
    pub fn from_static(client: kube::Client) -> Self {
        Self {
            identity: Identity::Static(client),
            acl: AclConfig::metrics(),
        }
    }

    /// Create a reviewer from exactly one of a config template or a client
    ///
    /// Fails with [`Error::Config`] when neither or both are provided. Prefer
    /// [`Self::from_template`] / [`Self::from_static`] when the mode is known
    /// at the call site.
    pub fn new(template: Option<kube::Config>, client: Option<kube::Client>) -> Result<Self> {
        match (template, client) {
            (Some(template), None) => Ok(Self::from_template(template)),
            (None, Some(client)) => Ok(Self::from_static(client)),
            (None, None) => Err(Error::config(
                "one of either a config template or a client must be provided",
            )),
            (Some(_), Some(_)) => Err(Error::config(
                "only one of either a config template or a client may be provided",
            )),
        }
    }

    /// Determine which managed-cluster namespaces the caller may view metrics
    /// for
    ///
    /// Returns a map from cluster name to viewable namespaces. `clusters`
    /// restricts the result to those clusters, each of which is present in
    /// the result even when the caller has no access to it; with no clusters
    /// given, access for all allowed clusters is returned. A cluster name of
    /// `*` means all allowed clusters; a namespace of `*` means all
    /// namespaces on that cluster.
    ///
    /// `token` is the caller's bearer token; required in template mode,
    /// ignored in static mode.
    #[instrument(skip(self, token))]
    pub async fn get_metrics_access(
        &self,
        token: &str,
        clusters: &[&str],
    ) -> Result<MetricsAccessMap> {
        let client = self.client_for_token(token)?;
        self.metrics_access_with(&client, clusters).await
    }

    /// Run the metrics pipeline against an already-resolved rule source
    async fn metrics_access_with(
        &self,
        review: &(impl RulesReview + ?Sized),
        clusters: &[&str],
    ) -> Result<MetricsAccessMap> {
        let access = get_resource_access(review, &self.acl.group_resource, clusters, "").await?;
        debug!(access = ?access, "resource access results");

        let results = decode_metrics_access(&access, clusters, &self.acl.verb_prefix);
        debug!(results = ?results, "metrics access results");

        Ok(results)
    }

    /// Resolve the client to use for one invocation
    fn client_for_token(&self, token: &str) -> Result<kube::Client> {
        match &self.identity {
            Identity::Template(template) => {
                if token.is_empty() {
                    return Err(Error::config(
                        "a bearer token is required on every call when the reviewer \
                         is built from a config template",
                    ));
                }
                let config = config_with_token(template, token);
                kube::Client::try_from(config).map_err(Error::from)
            }
            Identity::Static(client) => Ok(client.clone()),
        }
    }
}

/// Derive a config authenticated by `token` from a connection template
///
/// Connection and TLS settings are kept; the template's auth info is replaced
/// wholesale so no template credential (token, token file, client certificate,
/// exec plugin) leaks into the derived config. Returns a new value, leaving
/// the template untouched, so concurrent calls never share a mutable
/// credential field.
pub fn config_with_token(template: &kube::Config, token: &str) -> kube::Config {
    let mut config = template.clone();
    config.auth_info = AuthInfo {
        token: Some(SecretString::from(token.to_string())),
        ..AuthInfo::default()
    };
    config
}

/// List all configured access for a resource type, per resource name
///
/// Composes one rules-review round trip with rule matching. Returns merged
/// verbs keyed by resource name; names in `resource_names` are always present
/// in the result, with an empty set when no rules match them, and with no
/// names given the rules' own names (or the `*` entry) are returned.
///
/// `namespace` scopes the review for namespace-scoped resources; leave it
/// empty for cluster-scoped resources.
pub async fn get_resource_access(
    review: &(impl RulesReview + ?Sized),
    group_resource: &GroupResource,
    resource_names: &[&str],
    namespace: &str,
) -> Result<ResourceAccessMap> {
    debug!(
        target = %group_resource,
        names = ?resource_names,
        namespace = %namespace,
        "retrieving resource access"
    );

    let rules = review.list_resource_rules(namespace).await?;
    Ok(match_resource_rules(&rules, group_resource, resource_names))
}
