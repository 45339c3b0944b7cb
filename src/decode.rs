//! Metrics verb decoding
//!
//! Interprets the verb convention on managed-cluster rules: `metrics/<ns>`
//! grants viewing of `<ns>` on the cluster, a bare `*` grants all namespaces.
//! This layer only looks at verb strings; it knows nothing about rule syntax.

use std::collections::BTreeMap;

use tracing::debug;

use crate::acl::WILDCARD;
use crate::matcher::ResourceAccessMap;
use crate::verbs::VerbSet;

/// Viewable namespaces per cluster name
///
/// The key `*` means "all allowed clusters"; a namespace value of `*` means
/// "all namespaces on that cluster". A cluster is present iff it decoded at
/// least one namespace or was explicitly requested by the caller.
pub type MetricsAccessMap = BTreeMap<String, Vec<String>>;

/// Decode per-cluster verb sets into per-cluster viewable namespaces
///
/// Verbs starting with `verb_prefix` contribute the suffix as a namespace;
/// the literal `*` verb contributes the `*` namespace sentinel. Verbs that
/// match neither carry no metrics semantics and are ignored. Clusters in
/// `requested` keep their entry even when nothing decodes for them.
pub fn decode_metrics_access(
    access: &ResourceAccessMap,
    requested: &[&str],
    verb_prefix: &str,
) -> MetricsAccessMap {
    let mut results = MetricsAccessMap::new();

    for (cluster, verbs) in access {
        let mut namespaces = VerbSet::new();
        for verb in verbs.iter() {
            if let Some(namespace) = verb.strip_prefix(verb_prefix) {
                namespaces.insert(namespace);
            } else if verb == WILDCARD {
                namespaces.insert(WILDCARD);
            }
        }

        debug!(cluster = %cluster, namespaces = ?namespaces, "decoded namespaces");

        if !namespaces.is_empty() || requested.contains(&cluster.as_str()) {
            results.insert(cluster.clone(), namespaces.into_vec());
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access(entries: &[(&str, &[&str])]) -> ResourceAccessMap {
        entries
            .iter()
            .map(|(cluster, verbs)| {
                (
                    cluster.to_string(),
                    verbs.iter().copied().collect::<VerbSet>(),
                )
            })
            .collect()
    }

    #[test]
    fn prefixed_verbs_decode_to_namespaces() {
        let access = access(&[("devcluster1", &["metrics/nsred1", "metrics/nsred2"])]);

        let results = decode_metrics_access(&access, &[], "metrics/");
        assert_eq!(
            results["devcluster1"],
            vec!["nsred1".to_string(), "nsred2".to_string()]
        );
    }

    #[test]
    fn wildcard_verb_decodes_to_wildcard_namespace() {
        let access = access(&[(WILDCARD, &[WILDCARD])]);

        let results = decode_metrics_access(&access, &[], "metrics/");
        assert_eq!(results[WILDCARD], vec![WILDCARD.to_string()]);
    }

    #[test]
    fn unrelated_verbs_contribute_nothing() {
        let access = access(&[(WILDCARD, &["list", "get", "watch"])]);

        let results = decode_metrics_access(&access, &[], "metrics/");
        assert!(results.is_empty());
    }

    #[test]
    fn requested_cluster_with_no_grants_keeps_empty_entry() {
        let access = access(&[("devcluster1", &["list"]), ("blah", &[])]);

        let results = decode_metrics_access(&access, &["devcluster1", "blah"], "metrics/");
        assert_eq!(results.len(), 2);
        assert!(results["devcluster1"].is_empty());
        assert!(results["blah"].is_empty());
    }

    #[test]
    fn unrequested_cluster_with_no_grants_is_dropped() {
        let access = access(&[("devcluster1", &["list"])]);

        let results = decode_metrics_access(&access, &[], "metrics/");
        assert!(results.is_empty());
    }

    #[test]
    fn duplicate_namespaces_across_verbs_are_collapsed() {
        let access = access(&[(
            "devcluster1",
            &["metrics/nsred1", "metrics/nsred1", WILDCARD],
        )]);

        let results = decode_metrics_access(&access, &[], "metrics/");
        assert_eq!(
            results["devcluster1"],
            vec!["nsred1".to_string(), WILDCARD.to_string()]
        );
    }

    #[test]
    fn wildcard_and_named_clusters_stay_independent() {
        // A caller holding both an unrestricted rule and a cluster-specific
        // rule sees both entries; they are deliberately not merged.
        let access = access(&[
            (WILDCARD, &["metrics/kube-system"]),
            ("devcluster1", &["metrics/nsred1"]),
        ]);

        let results = decode_metrics_access(&access, &[], "metrics/");
        assert_eq!(results.len(), 2);
        assert_eq!(results[WILDCARD], vec!["kube-system".to_string()]);
        assert_eq!(results["devcluster1"], vec!["nsred1".to_string()]);
    }
}
