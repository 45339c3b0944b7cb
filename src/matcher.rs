//! Rule matching and verb reduction
//!
//! Pure computation over a retrieved rule set: filter the rules that apply to
//! a target group/resource and fold their verbs into one set per resource
//! name. Rule order never changes the outcome because verbs merge into a set.

use std::collections::BTreeMap;

use k8s_openapi::api::authorization::v1::ResourceRule;
use tracing::debug;

use crate::acl::{GroupResource, WILDCARD};
use crate::verbs::VerbSet;

/// Merged verbs per resource name
///
/// The key `*` means "all instances of the resource type". Every explicitly
/// requested name is present, possibly with an empty set, so absence of
/// matching rules stays distinguishable from "not asked about".
pub type ResourceAccessMap = BTreeMap<String, VerbSet>;

/// Reduce a rule set to merged verbs per resource name
///
/// A rule applies to `target` when its api-group list contains the target
/// group or `*`, and its resource list contains the target resource or `*`.
/// Name-restricted rules contribute to the names they list (filtered by
/// `wanted` when non-empty); unrestricted rules contribute to every wanted
/// name, or to the `*` entry when no specific names are wanted.
pub fn match_resource_rules(
    rules: &[ResourceRule],
    target: &GroupResource,
    wanted: &[&str],
) -> ResourceAccessMap {
    let mut access = ResourceAccessMap::new();

    for rule in rules {
        if !list_matches(rule.api_groups.as_deref(), &target.group)
            || !list_matches(rule.resources.as_deref(), &target.resource)
        {
            continue;
        }

        debug!(target = %target, rule = ?rule, "rule matches target");

        match rule.resource_names.as_deref() {
            Some(names) if !names.is_empty() => {
                for name in names {
                    if wanted.is_empty() || wanted.contains(&name.as_str()) {
                        merge_verbs(&mut access, name, &rule.verbs);
                    }
                }
            }
            // No name restriction: the rule covers every instance of the type.
            _ => {
                if wanted.is_empty() {
                    merge_verbs(&mut access, WILDCARD, &rule.verbs);
                } else {
                    for name in wanted {
                        merge_verbs(&mut access, name, &rule.verbs);
                    }
                }
            }
        }
    }

    // Rules only produce entries for names they grant something on. Wanted
    // names with no matching rules still get a present-but-empty entry.
    for name in wanted {
        access.entry((*name).to_string()).or_default();
    }

    access
}

fn list_matches(list: Option<&[String]>, want: &str) -> bool {
    list.is_some_and(|items| items.iter().any(|item| item == want || item == WILDCARD))
}

fn merge_verbs(access: &mut ResourceAccessMap, name: &str, verbs: &[String]) {
    access
        .entry(name.to_string())
        .or_default()
        .merge(verbs.iter().cloned());
}
