//! Property tests for reconciliation invariants.

use admin_reconcile::memory::InMemoryWorkspace;
use admin_reconcile::{classify, NoDirectory, PrincipalKind, Reconciler, WorkspaceRoleAssignment};
use proptest::prelude::*;

const NONE: &[&str] = &[];

// Strategy: lower-case GUID strings
fn arb_guid() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .unwrap()
}

// Strategy: simple UPNs
fn arb_upn() -> impl Strategy<Value = String> {
    (
        prop::string::string_regex("[a-z][a-z0-9]{0,8}").unwrap(),
        prop::string::string_regex("[a-z]{2,8}\\.(com|org|net)").unwrap(),
    )
        .prop_map(|(user, domain)| format!("{user}@{domain}"))
}

// Strategy: flip the case of random characters
fn recase(value: String) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), value.len()).prop_map(move |flips| {
        value
            .chars()
            .zip(flips)
            .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

proptest! {
    /// Property: classification is deterministic and follows the syntax rules
    #[test]
    fn proptest_classification_is_deterministic(guid in arb_guid(), upn in arb_upn()) {
        let first = classify(&guid).unwrap();
        prop_assert_eq!(first.kind(), PrincipalKind::ServicePrincipal);
        prop_assert_eq!(classify(&guid).unwrap(), first);

        let user = classify(&upn).unwrap();
        prop_assert_eq!(user.kind(), PrincipalKind::User);
        prop_assert_eq!(user.object_id(), upn.as_str());
    }

    /// Property: strings without '@' that are not GUIDs never classify
    #[test]
    fn proptest_plain_words_are_unresolvable(word in "[a-z]{1,20}") {
        prop_assert!(classify(&word).is_err());
    }

    /// Property: an existing admin is skipped whatever the identifier's case
    #[test]
    fn proptest_existing_admin_skipped_case_insensitively(
        upn in arb_upn().prop_flat_map(recase),
    ) {
        let workspace = InMemoryWorkspace::new("ws").with_assignment(
            WorkspaceRoleAssignment::admin_user("oid-1", Some(upn.to_lowercase())),
        );

        let result = Reconciler::new(&workspace, &NoDirectory).reconcile(&[upn.as_str()], NONE);

        prop_assert_eq!(result.skipped, 1);
        prop_assert!(workspace.add_calls().is_empty());
    }

    /// Property: a second identical run adds nothing and skips what the first added
    #[test]
    fn proptest_reconcile_is_idempotent(
        upns in prop::collection::vec(arb_upn(), 0..6),
        guids in prop::collection::vec(arb_guid(), 0..6),
    ) {
        let workspace = InMemoryWorkspace::new("ws");
        let via_resolution: Vec<&str> = upns.iter().map(String::as_str).collect();
        let via_object_id: Vec<&str> = guids.iter().map(String::as_str).collect();

        let first = Reconciler::new(&workspace, &NoDirectory)
            .reconcile(&via_resolution, &via_object_id);
        let second = Reconciler::new(&workspace, &NoDirectory)
            .reconcile(&via_resolution, &via_object_id);

        prop_assert_eq!(first.failed, 0);
        prop_assert_eq!(second.added, 0);
        prop_assert_eq!(second.skipped, via_resolution.len() + via_object_id.len());
        prop_assert_eq!(workspace.add_calls().len(), first.added);
    }
}
