use admin_reconcile::audit::AuditTrail;
use admin_reconcile::memory::{InMemoryWorkspace, StaticDirectory};
use admin_reconcile::{
    classify, BatchResult, BatchStatus, Error, NoDirectory, PrincipalKind, Reconciler,
    ResolvedPrincipal, WorkspaceApiError, WorkspaceRoleAssignment,
};

const NONE: &[&str] = &[];
const GUID: &str = "12345678-1234-1234-1234-123456789012";

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn directory() -> StaticDirectory {
    StaticDirectory::new()
        .with_principal(
            "alice@contoso.com",
            ResolvedPrincipal::user("oid-alice", "Alice", Some("alice@contoso.com".into())),
        )
        .with_principal(
            "app-deployer",
            ResolvedPrincipal::service_principal(
                "oid-deployer",
                "Deployer",
                Some("app-deployer".into()),
            ),
        )
        .with_principal(
            "bad@contoso.com",
            ResolvedPrincipal::user("oid-bad", "Bad", Some("bad@contoso.com".into())),
        )
}

#[test]
fn existing_admins_are_skipped_without_grant_calls() {
    let workspace = InMemoryWorkspace::new("ws")
        .with_assignment(WorkspaceRoleAssignment::admin_user(
            "oid-alice",
            Some("Alice@Contoso.com".into()),
        ))
        .with_assignment(WorkspaceRoleAssignment::admin_service_principal(GUID));

    let result = Reconciler::new(&workspace, &directory())
        .reconcile(&["ALICE@CONTOSO.COM"], &[&GUID.to_uppercase()[..]]);

    assert_eq!((result.added, result.skipped, result.failed), (0, 2, 0));
    assert!(workspace.add_calls().is_empty());
}

#[test]
fn classification_follows_documented_rules() {
    assert_eq!(
        classify(GUID).unwrap().kind(),
        PrincipalKind::ServicePrincipal
    );
    assert_eq!(
        classify("user@contoso.com").unwrap().kind(),
        PrincipalKind::User
    );
    assert!(matches!(
        classify("not-an-id"),
        Err(Error::UnresolvableIdentifier { .. })
    ));
}

#[test]
fn second_run_skips_everything_added_by_first() {
    let workspace = InMemoryWorkspace::new("ws");
    let directory = directory();
    let via_resolution = ["alice@contoso.com", "app-deployer"];
    let via_object_id = [GUID];

    let first = Reconciler::new(&workspace, &directory).reconcile(&via_resolution, &via_object_id);
    assert_eq!(first.added, 3);

    let second =
        Reconciler::new(&workspace, &directory).reconcile(&via_resolution, &via_object_id);
    assert_eq!(second.added, 0);
    assert_eq!(second.skipped, first.added);
    assert_eq!(workspace.add_calls().len(), 3);
}

#[test]
fn same_principal_in_both_phases_is_added_once() {
    let workspace = InMemoryWorkspace::new("ws");

    let result = Reconciler::new(&workspace, &directory())
        .reconcile(&["app-deployer"], &["oid-deployer"]);

    assert_eq!((result.added, result.skipped), (1, 1));
    let calls = workspace.add_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].principal_type, PrincipalKind::ServicePrincipal);
}

#[test]
fn probing_tries_user_then_service_principal() {
    init_tracing();
    let workspace = InMemoryWorkspace::new("ws").failing_add(
        GUID,
        Some(PrincipalKind::User),
        WorkspaceApiError::new(400, "principal is not a user").into(),
    );
    let trail = AuditTrail::new();

    let result = Reconciler::new(&workspace, &NoDirectory)
        .with_audit(&trail)
        .reconcile(NONE, &[GUID]);

    assert_eq!(result.added, 1);
    assert_eq!(
        trail.attempts_for(GUID),
        vec![PrincipalKind::User, PrincipalKind::ServicePrincipal]
    );
}

#[test]
fn probing_stops_after_first_success() {
    let workspace = InMemoryWorkspace::new("ws");
    let trail = AuditTrail::new();

    Reconciler::new(&workspace, &NoDirectory)
        .with_audit(&trail)
        .reconcile(NONE, &[GUID]);

    assert_eq!(trail.attempts_for(GUID), vec![PrincipalKind::User]);
    assert_eq!(workspace.add_calls().len(), 1);
}

#[test]
fn partial_failure_is_reported_per_identifier() {
    init_tracing();
    let workspace = InMemoryWorkspace::new("ws")
        .with_assignment(WorkspaceRoleAssignment::admin_service_principal(
            "oid-deployer",
        ))
        .failing_add(
            "oid-bad",
            None,
            WorkspaceApiError::new(400, "Bad Request").into(),
        );

    let result = Reconciler::new(&workspace, &directory()).reconcile(
        &["alice@contoso.com", "app-deployer", "bad@contoso.com"],
        NONE,
    );

    assert_eq!((result.added, result.skipped, result.failed), (1, 1, 1));
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("bad@contoso.com: "));
    assert!(result.errors[0].contains("400"));
    assert!(result.errors[0].contains("Verify the identifier is correct"));
    assert_eq!(result.status(), BatchStatus::Progressed);
    assert!(result.is_success());
}

#[test]
fn empty_input_contacts_no_collaborator() {
    let workspace = InMemoryWorkspace::new("ws");
    let directory = directory();

    let result = Reconciler::new(&workspace, &directory).reconcile(NONE, NONE);

    assert_eq!(
        result,
        BatchResult {
            added: 0,
            skipped: 0,
            failed: 0,
            errors: vec![],
        }
    );
    assert!(workspace.list_calls().is_empty());
    assert!(directory.lookups().is_empty());
}

#[test]
fn all_failed_is_distinct_from_nothing_requested() {
    init_tracing();
    let workspace = InMemoryWorkspace::new("ws").failing_add(
        GUID,
        None,
        WorkspaceApiError::new(404, "Not Found").into(),
    );

    let result = Reconciler::new(&workspace, &NoDirectory).reconcile(&["nobody"], &[GUID]);

    assert_eq!(result.failed, 2);
    assert_eq!(result.status(), BatchStatus::AllFailed);
    assert_ne!(result.status(), BatchResult::default().status());
}

#[test]
fn batch_result_serializes_for_callers() {
    let workspace = InMemoryWorkspace::new("ws");
    let result = Reconciler::new(&workspace, &NoDirectory).reconcile(&["nobody"], NONE);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["failed"], 1);
    assert_eq!(json["errors"].as_array().map(Vec::len), Some(1));
}
