//! Rule retrieval from the cluster
//!
//! One round trip: create a `SelfSubjectRulesReview` and return the resource
//! rules the API server evaluated for the caller. The trait boundary allows
//! mocking the round trip in tests while using a real client in production.

use async_trait::async_trait;
use k8s_openapi::api::authorization::v1::{
    ResourceRule, SelfSubjectRulesReview, SelfSubjectRulesReviewSpec, SubjectRulesReviewStatus,
};
use kube::api::{Api, PostParams};
use tracing::{debug, warn};

use crate::Result;

/// Reserved namespace token used when no scope is given.
///
/// A SelfSubjectRulesReview evaluated in a real namespace also reports
/// RoleBindings made in that namespace, so reviewing in the default namespace
/// would misreport namespace-level grants as cluster-scoped access. The token
/// is syntactically invalid as a namespace name and can never match one, which
/// limits the response to genuinely cluster-scoped rules.
pub const INVALID_NAMESPACE: &str = "$ Invalid $";

/// Access to the caller's permission rules
///
/// Implemented by `kube::Client` for production use; mockable for tests.
/// Implementations are stateless and safe to invoke concurrently.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RulesReview: Send + Sync {
    /// List the resource rules the cluster has evaluated for this caller
    ///
    /// `namespace` scopes the evaluation of namespace-scoped rules; pass an
    /// empty string for cluster-scoped resources.
    async fn list_resource_rules(&self, namespace: &str) -> Result<Vec<ResourceRule>>;
}

#[async_trait]
impl RulesReview for kube::Client {
    async fn list_resource_rules(&self, namespace: &str) -> Result<Vec<ResourceRule>> {
        let scope = effective_scope(namespace);
        debug!(scope = %scope, "creating SelfSubjectRulesReview");

        let review = SelfSubjectRulesReview {
            spec: SelfSubjectRulesReviewSpec {
                namespace: Some(scope.to_string()),
            },
            ..Default::default()
        };

        let api: Api<SelfSubjectRulesReview> = Api::all(self.clone());
        let response = api.create(&PostParams::default(), &review).await?;

        Ok(rules_from_status(response.status.unwrap_or_default(), scope))
    }
}

/// Map an empty scope to the reserved invalid-namespace token
fn effective_scope(namespace: &str) -> &str {
    if namespace.is_empty() {
        INVALID_NAMESPACE
    } else {
        namespace
    }
}

/// Extract the resource rules from a review status, tolerating partial results
///
/// The API server may report that it could not fully evaluate the caller's
/// rules. Partial access information is more useful than none, so the rule
/// list is returned as-is and the condition is only logged.
fn rules_from_status(status: SubjectRulesReviewStatus, scope: &str) -> Vec<ResourceRule> {
    if let Some(eval_error) = &status.evaluation_error {
        warn!(
            scope = %scope,
            error = %eval_error,
            "SelfSubjectRulesReview reported an evaluation error, using partial results"
        );
    } else if status.incomplete {
        warn!(scope = %scope, "SelfSubjectRulesReview reported incomplete results");
    }

    debug!(rules = status.resource_rules.len(), "retrieved resource rules");
    status.resource_rules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(verbs: &[&str]) -> ResourceRule {
        ResourceRule {
            api_groups: Some(vec!["cluster.open-cluster-management.io".to_string()]),
            resources: Some(vec!["managedclusters".to_string()]),
            resource_names: None,
            verbs: verbs.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn empty_scope_maps_to_invalid_namespace() {
        assert_eq!(effective_scope(""), INVALID_NAMESPACE);
    }

    #[test]
    fn explicit_scope_passes_through() {
        assert_eq!(effective_scope("observability"), "observability");
    }

    #[test]
    fn evaluation_error_still_yields_rules() {
        let status = SubjectRulesReviewStatus {
            resource_rules: vec![rule(&["metrics/nsred1"])],
            evaluation_error: Some("webhook authorizer unreachable".to_string()),
            incomplete: true,
            ..Default::default()
        };

        let rules = rules_from_status(status, INVALID_NAMESPACE);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].verbs, vec!["metrics/nsred1"]);
    }

    #[test]
    fn incomplete_without_error_still_yields_rules() {
        let status = SubjectRulesReviewStatus {
            resource_rules: vec![rule(&["list"]), rule(&["metrics/kube-system"])],
            incomplete: true,
            ..Default::default()
        };

        assert_eq!(rules_from_status(status, "testns").len(), 2);
    }

    #[test]
    fn empty_status_yields_no_rules() {
        let rules = rules_from_status(SubjectRulesReviewStatus::default(), INVALID_NAMESPACE);
        assert!(rules.is_empty());
    }
}
