// crates/org-authz-core/tests/decision.rs
// ============================================================================
// Module: Decision Engine Tests
// Description: Validate grant, deny, and inheritance decision outcomes.
// Purpose: Ensure decisions derive strictly from mapping existence and fail closed.
// ============================================================================

//! Decision behavior tests for org-scoped and any-org authorization checks.

use std::sync::Arc;
use std::sync::Mutex;

use org_authz_core::AccessRequest;
use org_authz_core::Action;
use org_authz_core::DecisionEngine;
use org_authz_core::DecisionEngineConfig;
use org_authz_core::DecisionError;
use org_authz_core::GatewayError;
use org_authz_core::IdentityError;
use org_authz_core::InMemoryDirectory;
use org_authz_core::InMemoryGateway;
use org_authz_core::MappingProbe;
use org_authz_core::MappingRow;
use org_authz_core::MappingType;
use org_authz_core::OrgId;
use org_authz_core::PersistenceGateway;
use org_authz_core::ResourceId;
use org_authz_core::TenantId;
use org_authz_core::User;
use org_authz_core::UserId;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const TENANT: TenantId = TenantId::new(1);

fn request(username: &str, resource_id: &str) -> AccessRequest {
    AccessRequest {
        user: User::new(username),
        resource_id: ResourceId::new(resource_id),
        action: Action::new("ui.execute"),
        tenant_id: TENANT,
    }
}

fn mapping(user_id: &str, org_id: &str, resource_id: &str) -> MappingRow {
    MappingRow {
        tenant_id: TENANT,
        user_id: UserId::new(user_id),
        org_id: OrgId::new(org_id),
        mapping_type: MappingType::new(3),
        resource_id: resource_id.to_string(),
    }
}

fn engine_for(
    gateway: InMemoryGateway,
) -> Result<DecisionEngine<InMemoryDirectory, InMemoryGateway>, Box<dyn std::error::Error>> {
    let directory = InMemoryDirectory::new();
    directory.insert_user("alice", UserId::new("u1"))?;
    Ok(DecisionEngine::new(directory, gateway, DecisionEngineConfig::default()))
}

#[test]
fn exact_grant_in_organization_allows() -> TestResult {
    let gateway = InMemoryGateway::new();
    gateway.insert_mapping(mapping("u1", "org1", "org1/view"))?;
    let engine = engine_for(gateway)?;

    let decision = engine.is_authorized_in_organization(
        &request("alice", "org1/view"),
        &OrgId::new("org1"),
    )?;
    if !decision.is_allowed() {
        return Err("expected exact grant to allow".into());
    }
    Ok(())
}

#[test]
fn absent_mapping_denies() -> TestResult {
    let engine = engine_for(InMemoryGateway::new())?;
    let check = request("alice", "org1/view");

    let scoped = engine.is_authorized_in_organization(&check, &OrgId::new("org1"))?;
    let any = engine.is_authorized_in_any_organization(&check)?;
    if scoped.is_allowed() || any.is_allowed() {
        return Err("expected empty store to deny both scopes".into());
    }
    Ok(())
}

#[test]
fn parent_scope_grant_allows_child() -> TestResult {
    let gateway = InMemoryGateway::new();
    gateway.insert_mapping(mapping("u1", "org1", "org1"))?;
    let engine = engine_for(gateway)?;

    let decision = engine.is_authorized_in_organization(
        &request("alice", "org1/view"),
        &OrgId::new("org1"),
    )?;
    if !decision.is_allowed() {
        return Err("expected parent grant to allow the child resource".into());
    }
    Ok(())
}

#[test]
fn grandparent_grant_does_not_allow() -> TestResult {
    let gateway = InMemoryGateway::new();
    gateway.insert_mapping(mapping("u1", "org1", "org1"))?;
    let engine = engine_for(gateway)?;

    let decision = engine.is_authorized_in_organization(
        &request("alice", "org1/view/details"),
        &OrgId::new("org1"),
    )?;
    if decision.is_allowed() {
        return Err("inheritance reaches exactly one level above the resource".into());
    }
    Ok(())
}

#[test]
fn sibling_grant_does_not_allow() -> TestResult {
    let gateway = InMemoryGateway::new();
    gateway.insert_mapping(mapping("u1", "org1", "org1/edit"))?;
    let engine = engine_for(gateway)?;

    let decision = engine.is_authorized_in_organization(
        &request("alice", "org1/view"),
        &OrgId::new("org1"),
    )?;
    if decision.is_allowed() {
        return Err("expected sibling grant to deny".into());
    }
    Ok(())
}

#[test]
fn duplicate_rows_do_not_change_decision() -> TestResult {
    let gateway = InMemoryGateway::new();
    gateway.insert_mapping(mapping("u1", "org1", "org1/view"))?;
    gateway.insert_mapping(mapping("u1", "org1", "org1/view"))?;
    gateway.insert_mapping(mapping("u1", "org1", "org1"))?;
    let engine = engine_for(gateway)?;

    let decision = engine.is_authorized_in_organization(
        &request("alice", "org1/view"),
        &OrgId::new("org1"),
    )?;
    if !decision.is_allowed() {
        return Err("expected duplicated grants to still allow".into());
    }
    Ok(())
}

#[test]
fn any_organization_scope_spans_memberships() -> TestResult {
    let gateway = InMemoryGateway::new();
    gateway.insert_mapping(mapping("u1", "org-east", "reports/view"))?;
    let engine = engine_for(gateway)?;
    let check = request("alice", "reports/view");

    let any = engine.is_authorized_in_any_organization(&check)?;
    if !any.is_allowed() {
        return Err("expected any-org scope to find the grant".into());
    }
    let scoped = engine.is_authorized_in_organization(&check, &OrgId::new("org-west"))?;
    if scoped.is_allowed() {
        return Err("expected org-scoped check to miss a grant in another org".into());
    }
    Ok(())
}

#[test]
fn empty_parent_scope_is_not_a_wildcard() -> TestResult {
    let gateway = InMemoryGateway::new();
    gateway.insert_mapping(mapping("u1", "org1", "reports"))?;
    let engine = engine_for(gateway)?;

    let decision = engine.is_authorized_in_organization(
        &request("alice", "dashboard"),
        &OrgId::new("org1"),
    )?;
    if decision.is_allowed() {
        return Err("an empty parent scope must not match arbitrary rows".into());
    }
    Ok(())
}

#[test]
fn empty_parent_scope_matches_literal_empty_grant() -> TestResult {
    let gateway = InMemoryGateway::new();
    gateway.insert_mapping(mapping("u1", "org1", ""))?;
    let engine = engine_for(gateway)?;

    let decision = engine.is_authorized_in_organization(
        &request("alice", "dashboard"),
        &OrgId::new("org1"),
    )?;
    if !decision.is_allowed() {
        return Err("a grant recorded at the literal empty identifier must match".into());
    }
    Ok(())
}

#[test]
fn other_mapping_types_do_not_match() -> TestResult {
    let gateway = InMemoryGateway::new();
    gateway.insert_mapping(MappingRow {
        mapping_type: MappingType::new(5),
        ..mapping("u1", "org1", "org1/view")
    })?;
    let engine = engine_for(gateway)?;

    let decision = engine.is_authorized_in_organization(
        &request("alice", "org1/view"),
        &OrgId::new("org1"),
    )?;
    if decision.is_allowed() {
        return Err("expected a different mapping type to deny".into());
    }
    Ok(())
}

#[test]
fn other_tenants_do_not_match() -> TestResult {
    let gateway = InMemoryGateway::new();
    gateway.insert_mapping(MappingRow {
        tenant_id: TenantId::new(2),
        ..mapping("u1", "org1", "org1/view")
    })?;
    let engine = engine_for(gateway)?;

    let decision = engine.is_authorized_in_organization(
        &request("alice", "org1/view"),
        &OrgId::new("org1"),
    )?;
    if decision.is_allowed() {
        return Err("expected tenant isolation to deny".into());
    }
    Ok(())
}

#[test]
fn configured_separator_drives_decomposition() -> TestResult {
    let gateway = InMemoryGateway::new();
    gateway.insert_mapping(mapping("u1", "org1", "org1"))?;
    let directory = InMemoryDirectory::new();
    directory.insert_user("alice", UserId::new("u1"))?;
    let config = DecisionEngineConfig {
        path_separator: ':',
        ..DecisionEngineConfig::default()
    };
    let engine = DecisionEngine::new(directory, gateway, config);

    let decision = engine.is_authorized_in_organization(
        &request("alice", "org1:view"),
        &OrgId::new("org1"),
    )?;
    if !decision.is_allowed() {
        return Err("expected colon-separated parent grant to allow".into());
    }
    Ok(())
}

#[test]
fn unknown_user_fails_without_store_query() -> TestResult {
    let gateway = CountingGateway::new();
    let engine = DecisionEngine::new(
        InMemoryDirectory::new(),
        gateway.clone(),
        DecisionEngineConfig::default(),
    );

    let result = engine.is_authorized_in_organization(
        &request("mallory", "org1/view"),
        &OrgId::new("org1"),
    );
    match result {
        Err(DecisionError::Identity(IdentityError::NotFound(username))) => {
            if username != "mallory" {
                return Err(format!("unexpected username in error: {username}").into());
            }
        }
        Err(other) => return Err(format!("unexpected error: {other}").into()),
        Ok(_) => return Err("expected unknown user to fail, not decide".into()),
    }
    if gateway.query_count() != 0 {
        return Err(format!("expected 0 gateway queries, got {}", gateway.query_count()).into());
    }
    Ok(())
}

#[test]
fn gateway_failure_propagates_instead_of_denying() -> TestResult {
    let directory = InMemoryDirectory::new();
    directory.insert_user("alice", UserId::new("u1"))?;
    let engine = DecisionEngine::new(directory, FailingGateway, DecisionEngineConfig::default());

    let result = engine.is_authorized_in_any_organization(&request("alice", "org1/view"));
    match result {
        Err(DecisionError::Gateway(GatewayError::Query(_))) => Ok(()),
        Err(other) => Err(format!("unexpected error: {other}").into()),
        Ok(decision) => {
            Err(format!("expected store failure to propagate, got {decision:?}").into())
        }
    }
}

/// Gateway double counting every query it receives.
#[derive(Clone, Debug)]
struct CountingGateway {
    count: Arc<Mutex<u64>>,
}

impl CountingGateway {
    fn new() -> Self {
        Self {
            count: Arc::new(Mutex::new(0)),
        }
    }

    fn query_count(&self) -> u64 {
        self.count.lock().map_or(0, |count| *count)
    }

    fn record(&self) -> Result<(), GatewayError> {
        let mut guard = self
            .count
            .lock()
            .map_err(|_| GatewayError::Io("query count lock poisoned".to_string()))?;
        *guard = guard.saturating_add(1);
        drop(guard);
        Ok(())
    }
}

impl PersistenceGateway for CountingGateway {
    fn root_organizations(
        &self,
        _name: &str,
        _tenant_id: TenantId,
    ) -> Result<Vec<OrgId>, GatewayError> {
        self.record()?;
        Ok(Vec::new())
    }

    fn count_mappings_in_organization(
        &self,
        _probe: &MappingProbe,
        _org_id: &OrgId,
    ) -> Result<u64, GatewayError> {
        self.record()?;
        Ok(0)
    }

    fn count_mappings_any_organization(&self, _probe: &MappingProbe) -> Result<u64, GatewayError> {
        self.record()?;
        Ok(0)
    }
}

/// Gateway double failing every query.
#[derive(Clone, Debug)]
struct FailingGateway;

impl PersistenceGateway for FailingGateway {
    fn root_organizations(
        &self,
        _name: &str,
        _tenant_id: TenantId,
    ) -> Result<Vec<OrgId>, GatewayError> {
        Err(GatewayError::Query("connection refused".to_string()))
    }

    fn count_mappings_in_organization(
        &self,
        _probe: &MappingProbe,
        _org_id: &OrgId,
    ) -> Result<u64, GatewayError> {
        Err(GatewayError::Query("connection refused".to_string()))
    }

    fn count_mappings_any_organization(&self, _probe: &MappingProbe) -> Result<u64, GatewayError> {
        Err(GatewayError::Query("connection refused".to_string()))
    }
}
