//! Access control configuration
//!
//! Describes what kind of access is being queried: an API group/resource pair
//! plus the verb convention that encodes the grant. Rules in ClusterRoles do
//! not carry an API version, so neither does [`GroupResource`].

use std::fmt;

/// Wildcard entry in rule api-group, resource, resource-name, and verb lists.
///
/// A rule carrying `*` in one of its lists matches every value in that
/// position; a decoded namespace of `*` means "all namespaces on the cluster".
pub const WILDCARD: &str = "*";

/// An API group and resource type, without version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupResource {
    /// API group (e.g. "cluster.open-cluster-management.io")
    pub group: String,
    /// Resource type plural (e.g. "managedclusters")
    pub resource: String,
}

impl GroupResource {
    /// Create a group/resource pair
    pub fn new(group: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            resource: resource.into(),
        }
    }
}

impl fmt::Display for GroupResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

/// Configuration for one kind of access query
///
/// Pairs the resource being queried with the verb prefix that encodes the
/// grant on it. Built once at reviewer construction and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclConfig {
    /// The API group and resource the rules are matched against
    pub group_resource: GroupResource,
    /// Verb prefix that encodes a grant (e.g. "metrics/")
    pub verb_prefix: String,
}

impl AclConfig {
    /// Access configuration for viewing observability metrics gathered from
    /// managed clusters.
    ///
    /// A ClusterRole rule naming managed clusters in `resourceNames` and
    /// carrying verbs of the form `metrics/<namespace>` grants metrics-viewing
    /// access to `<namespace>` on each named cluster.
    pub fn metrics() -> Self {
        Self {
            group_resource: GroupResource::new(
                "cluster.open-cluster-management.io",
                "managedclusters",
            ),
            verb_prefix: "metrics/".to_string(),
        }
    }
}
