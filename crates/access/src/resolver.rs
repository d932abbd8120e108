//! Capability resolution.
//!
//! [`can`] is the single decision procedure; everything else in this crate
//! derives from it. It is a pure function of the snapshot and its arguments:
//! no I/O, no ambient state, and calling it twice with an unchanged session
//! yields identical results. The worst failure mode anywhere in here is an
//! overly conservative denial, never an unsafe allow past the system-only
//! override.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use opsgate_core::TenantId;

use crate::capability::Capability;
use crate::roles::SystemRole;
use crate::session::SessionContext;

/// Denial as an error, for command boundaries that want `?`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("no authenticated session")]
    NoSession,

    #[error("forbidden: missing capability '{capability}'")]
    Forbidden { capability: Capability },
}

/// Decide whether the session may exercise `capability`, optionally scoped
/// to `tenant`.
///
/// Resolution order:
/// 1. No session ⇒ deny (a not-yet-loaded session is treated identically).
/// 2. System-only capabilities are allowed only for `SYSTEM_ADMIN`,
///    regardless of any catalog content, so a catalog misconfiguration can
///    never leak one through a tenant role.
/// 3. Union the catalog entries for the system role and, when `tenant` is
///    given, the tenant's role. A capability outside the union is denied.
/// 4. For tenant-scoped capabilities, `SYSTEM_ADMIN` bypasses tenant
///    scoping entirely; otherwise a given `tenant` must be in the session's
///    allow-list, and a tenant-agnostic call (no `tenant`) requires access
///    to at least one tenant. The latter supports coarse checks for
///    navigation/menu gating.
pub fn can(
    session: Option<&SessionContext>,
    capability: Capability,
    tenant: Option<&TenantId>,
) -> bool {
    let Some(session) = session else {
        return deny(capability, tenant, "no session");
    };

    let is_system_admin = matches!(session.system_role, Some(SystemRole::SystemAdmin));

    if capability.is_system_only() {
        if is_system_admin {
            return true;
        }
        return deny(capability, tenant, "system tier required");
    }

    let sys_caps = session
        .system_role
        .as_ref()
        .map(SystemRole::capabilities)
        .unwrap_or(&[]);
    let tenant_caps = tenant
        .and_then(|t| session.tenant_role(t))
        .map(|role| role.capabilities())
        .unwrap_or(&[]);

    if !sys_caps.contains(&capability) && !tenant_caps.contains(&capability) {
        return deny(capability, tenant, "not granted by any role");
    }

    if is_system_admin {
        return true;
    }

    let in_scope = match tenant {
        Some(t) => session.allowed_tenants.contains(t),
        None => !session.allowed_tenants.is_empty(),
    };
    if !in_scope {
        return deny(capability, tenant, "tenant not in allow-list");
    }
    true
}

fn deny(capability: Capability, tenant: Option<&TenantId>, reason: &str) -> bool {
    debug!(
        capability = capability.as_str(),
        tenant = tenant.map(TenantId::as_str),
        reason,
        "capability denied"
    );
    false
}

/// `Result` form of [`can`].
pub fn authorize(
    session: Option<&SessionContext>,
    capability: Capability,
    tenant: Option<&TenantId>,
) -> Result<(), AccessError> {
    match session {
        None => Err(AccessError::NoSession),
        Some(s) if can(Some(s), capability, tenant) => Ok(()),
        Some(_) => Err(AccessError::Forbidden { capability }),
    }
}

/// Why a decision came out the way it did.
///
/// Serializable so collaborators can attach it to disabled controls or dump
/// it when debugging a surprising denial. Agrees with [`can`] on `granted`
/// for every input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub capability: Capability,
    pub tenant: Option<TenantId>,
    pub granted: bool,

    /// Static requirement label for this capability, independent of the
    /// session (see [`Capability::requirement`]).
    pub requirement: &'static str,

    pub denial: Option<DenialReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    NoSession,
    NotGranted,
    SystemTierRequired,
    TenantNotAllowed,
}

/// Explain the decision [`can`] makes for the same arguments.
pub fn explain(
    session: Option<&SessionContext>,
    capability: Capability,
    tenant: Option<&TenantId>,
) -> AccessDecision {
    let denied = |kind: DenialKind, message: String| AccessDecision {
        capability,
        tenant: tenant.cloned(),
        granted: false,
        requirement: capability.requirement(),
        denial: Some(DenialReason { kind, message }),
    };

    let Some(session) = session else {
        return denied(
            DenialKind::NoSession,
            "no authenticated session".to_string(),
        );
    };

    if !can(Some(session), capability, tenant) {
        // Same classification order as `can`: the system-only override
        // outranks the catalog union, so it is the reason reported even
        // when no role grants the capability either.
        if capability.is_system_only() {
            return denied(
                DenialKind::SystemTierRequired,
                format!("'{capability}' is grantable only through the system tier"),
            );
        }

        let sys_caps = session
            .system_role
            .as_ref()
            .map(SystemRole::capabilities)
            .unwrap_or(&[]);
        let tenant_caps = tenant
            .and_then(|t| session.tenant_role(t))
            .map(|role| role.capabilities())
            .unwrap_or(&[]);

        if !sys_caps.contains(&capability) && !tenant_caps.contains(&capability) {
            return denied(
                DenialKind::NotGranted,
                format!("no assigned role grants '{capability}'"),
            );
        }
        return denied(
            DenialKind::TenantNotAllowed,
            match tenant {
                Some(t) => format!("tenant '{t}' is outside the session's allowed tenants"),
                None => "session has no tenant access".to_string(),
            },
        );
    }

    AccessDecision {
        capability,
        tenant: tenant.cloned(),
        granted: true,
        requirement: capability.requirement(),
        denial: None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use proptest::prelude::*;

    use crate::session::{AccessMode, Identity, SessionRecord};

    use super::*;

    fn identity() -> Identity {
        Identity {
            issuer: "https://id.example.com".to_string(),
            subject: "user-1".to_string(),
            email: None,
            display_name: None,
        }
    }

    fn session(
        role: Option<&str>,
        mode: Option<AccessMode>,
        allowed: &[&str],
        tenant_roles: &[(&str, &str)],
    ) -> SessionContext {
        let record = SessionRecord {
            role: role.map(str::to_string),
            mode,
            allowed_tenant_ids: allowed.iter().map(|t| t.to_string()).collect(),
            tenant_roles: tenant_roles
                .iter()
                .map(|(t, r)| (t.to_string(), r.to_string()))
                .collect(),
            primary_tenant_id: None,
        };
        SessionContext::from_record(identity(), &record, Utc::now())
    }

    fn t(id: &str) -> TenantId {
        TenantId::from(id)
    }

    #[test]
    fn null_session_denies_everything() {
        for cap in Capability::ALL {
            assert!(!can(None, *cap, None));
            assert!(!can(None, *cap, Some(&t("t1"))));
        }
        assert_eq!(authorize(None, Capability::ManageTenantUsers, None), Err(AccessError::NoSession));
    }

    #[test]
    fn system_admin_alias_bypasses_tenant_scoping() {
        // Legacy "ADMIN" spelling, no tenant roles at all.
        let s = session(Some("ADMIN"), Some(AccessMode::MultiTenant), &["t1", "t2"], &[]);
        assert!(can(Some(&s), Capability::ManageTenantUsers, Some(&t("t1"))));
        // Even tenants outside the allow-list.
        assert!(can(Some(&s), Capability::ManageTenantUsers, Some(&t("t9"))));
        assert!(can(Some(&s), Capability::ManageTenants, None));
        assert!(can(Some(&s), Capability::DeleteTenant, Some(&t("t1"))));
    }

    #[test]
    fn tenant_admin_is_scoped_to_its_tenant() {
        let s = session(Some("VIEWER"), None, &["t1"], &[("t1", "ADMIN")]);
        assert!(can(Some(&s), Capability::EditTenantSettings, Some(&t("t1"))));
        assert!(!can(Some(&s), Capability::EditTenantSettings, Some(&t("t2"))));
    }

    #[test]
    fn tenant_admin_cannot_reach_system_only_capabilities() {
        let s = session(Some("VIEWER"), None, &["t1"], &[("t1", "ADMIN")]);
        assert!(!can(Some(&s), Capability::DeleteTenant, None));
        assert!(!can(Some(&s), Capability::DeleteTenant, Some(&t("t1"))));
        assert!(!can(Some(&s), Capability::ManageTenants, Some(&t("t1"))));
    }

    #[test]
    fn analyst_with_no_tenants_is_denied_coarse_checks() {
        let s = session(Some("SYSTEM_ANALYST"), None, &[], &[]);
        assert!(!can(Some(&s), Capability::ManageTenantUsers, None));
    }

    #[test]
    fn tenant_agnostic_check_needs_at_least_one_tenant() {
        let with_access = session(Some("VIEWER"), None, &["t1"], &[("t1", "ADMIN")]);
        // The union is computed per-tenant, so a tenant-agnostic call sees
        // no tenant-tier capabilities even when t1 holds an admin role.
        assert!(!can(Some(&with_access), Capability::ManageTenantUsers, None));

        let admin = session(Some("SYSTEM_ADMIN"), None, &[], &[]);
        assert!(can(Some(&admin), Capability::ManageTenantUsers, None));
    }

    #[test]
    fn unrecognized_roles_fail_closed() {
        let s = session(Some("SUPERUSER"), None, &["t1"], &[("t1", "OWNER")]);
        for cap in Capability::ALL {
            assert!(!can(Some(&s), *cap, Some(&t("t1"))));
        }
    }

    #[test]
    fn missing_tenant_role_entry_behaves_as_no_role() {
        let s = session(Some("VIEWER"), None, &["t1", "t2"], &[("t1", "ADMIN")]);
        assert!(!can(Some(&s), Capability::ManageTenantUsers, Some(&t("t2"))));
    }

    #[test]
    fn authorize_matches_can() {
        let s = session(Some("VIEWER"), None, &["t1"], &[("t1", "ADMIN")]);
        assert_eq!(authorize(Some(&s), Capability::EditTenantSettings, Some(&t("t1"))), Ok(()));
        assert_eq!(
            authorize(Some(&s), Capability::DeleteTenant, Some(&t("t1"))),
            Err(AccessError::Forbidden {
                capability: Capability::DeleteTenant
            })
        );
    }

    #[test]
    fn explain_classifies_denials() {
        let d = explain(None, Capability::ManageTenantUsers, None);
        assert!(!d.granted);
        assert_eq!(d.denial.unwrap().kind, DenialKind::NoSession);

        let s = session(Some("VIEWER"), None, &["t1"], &[("t1", "ADMIN")]);

        let d = explain(Some(&s), Capability::DeleteTenant, Some(&t("t1")));
        assert_eq!(d.requirement, "Requires SYSTEM_ADMIN");
        assert_eq!(d.denial.unwrap().kind, DenialKind::SystemTierRequired);

        // System-only outranks NotGranted even when no role grants anything.
        let d = explain(Some(&s), Capability::ManageTenants, None);
        assert_eq!(d.denial.unwrap().kind, DenialKind::SystemTierRequired);

        let d = explain(Some(&s), Capability::EditTenantSettings, Some(&t("t2")));
        assert_eq!(d.denial.unwrap().kind, DenialKind::NotGranted);

        let d = explain(Some(&s), Capability::EditTenantSettings, Some(&t("t1")));
        assert!(d.granted);
        assert_eq!(d.denial, None);
    }

    fn any_capability() -> impl Strategy<Value = Capability> {
        proptest::sample::select(Capability::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a SYSTEM_ADMIN session is allowed every capability for
        /// every tenant argument, spelled canonically or via the alias.
        #[test]
        fn system_admin_allows_everything(
            cap in any_capability(),
            tenant in proptest::option::of("[a-z0-9]{1,8}"),
            alias in proptest::bool::ANY,
        ) {
            let role = if alias { "ADMIN" } else { "SYSTEM_ADMIN" };
            let s = session(Some(role), Some(AccessMode::MultiTenant), &[], &[]);
            let tenant = tenant.map(TenantId::from);
            prop_assert!(can(Some(&s), cap, tenant.as_ref()));
        }

        /// Property: resolution is pure; repeated calls agree, and
        /// `explain`/`authorize` agree with `can`.
        #[test]
        fn resolution_is_pure_and_consistent(
            role in proptest::option::of("[A-Z_]{1,16}"),
            cap in any_capability(),
            allowed in proptest::collection::vec("[a-z0-9]{1,4}", 0..4),
            tenant in proptest::option::of("[a-z0-9]{1,4}"),
        ) {
            let allowed: Vec<&str> = allowed.iter().map(String::as_str).collect();
            let s = session(role.as_deref(), None, &allowed, &[]);
            let tenant = tenant.map(TenantId::from);

            let first = can(Some(&s), cap, tenant.as_ref());
            let second = can(Some(&s), cap, tenant.as_ref());
            prop_assert_eq!(first, second);

            prop_assert_eq!(explain(Some(&s), cap, tenant.as_ref()).granted, first);
            prop_assert_eq!(authorize(Some(&s), cap, tenant.as_ref()).is_ok(), first);
        }
    }
}
