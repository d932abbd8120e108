//! Session snapshot and the session-provider adapter.
//!
//! The session provider resolves an authenticated identity (post sign-in or
//! on page load) and hands over a [`SessionRecord`]; [`SessionContext`] is
//! the normalized, immutable snapshot built from it once per session.
//! Refreshing authorization state means fetching a new record and replacing
//! the whole snapshot; nothing in this crate mutates an existing one.
//! Absence of a record is modeled as "no session" at the call sites, and the
//! resolver treats a not-yet-loaded session identically (deny-all).

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opsgate_core::TenantId;

use crate::roles::{SystemRole, TenantRole};

/// Authenticated identity as resolved by the session provider.
///
/// Opaque to the resolver beyond identification; no decision ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub issuer: String,
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Whether the identity's access spans one tenant or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessMode {
    #[serde(rename = "SINGLE_TENANT")]
    SingleTenant,
    #[serde(rename = "MULTI_TENANT")]
    MultiTenant,
}

/// Wire shape of the role/access record consumed from the session provider.
///
/// Role spellings are carried raw here (canonical, legacy alias, or
/// unrecognized); normalization happens when the [`SessionContext`] is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// System-tier role spelling, possibly a legacy alias.
    #[serde(default)]
    pub role: Option<String>,

    /// Defaults to single-tenant when the provider omits it.
    #[serde(default)]
    pub mode: Option<AccessMode>,

    /// Tenants the identity may act within.
    #[serde(default)]
    pub allowed_tenant_ids: Vec<String>,

    /// Per-tenant role spellings, keyed by tenant id.
    #[serde(default)]
    pub tenant_roles: BTreeMap<String, String>,

    #[serde(default)]
    pub primary_tenant_id: Option<String>,
}

/// Immutable snapshot of an identity's roles and tenant access.
///
/// # Invariants
/// - Exactly one system-tier role slot (possibly unresolved) and
///   zero-or-more tenant-role assignments with unique tenant keys.
/// - Immutable after construction; a role change anywhere requires a fresh
///   snapshot from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub identity: Identity,

    /// Normalized system role; `None` when the provider sent no usable role.
    pub system_role: Option<SystemRole>,

    /// Normalized per-tenant roles. A tenant absent here has no tenant-tier
    /// grants, whatever its membership in `allowed_tenants`.
    pub tenant_roles: BTreeMap<TenantId, TenantRole>,

    pub allowed_tenants: BTreeSet<TenantId>,

    pub access_mode: AccessMode,

    pub primary_tenant: Option<TenantId>,

    /// When the provider resolved this snapshot. Diagnostics only; decisions
    /// never read it.
    pub resolved_at: DateTime<Utc>,
}

impl SessionContext {
    /// Build the snapshot from a provider record, normalizing both role
    /// tiers once up front. Normalization is idempotent, so re-normalizing
    /// on read would be a no-op.
    ///
    /// Tenant-role entries with an empty spelling are dropped (an absent
    /// entry and an empty one behave identically: no tenant-tier grants).
    pub fn from_record(
        identity: Identity,
        record: &SessionRecord,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        let system_role = SystemRole::normalize(record.role.as_deref());

        let tenant_roles = record
            .tenant_roles
            .iter()
            .filter_map(|(tenant, raw)| {
                let role = TenantRole::normalize(Some(raw))?;
                Some((TenantId::from(tenant.as_str()), role))
            })
            .collect();

        let allowed_tenants = record
            .allowed_tenant_ids
            .iter()
            .map(|t| TenantId::from(t.as_str()))
            .collect();

        Self {
            identity,
            system_role,
            tenant_roles,
            allowed_tenants,
            access_mode: record.mode.unwrap_or(AccessMode::SingleTenant),
            primary_tenant: record.primary_tenant_id.as_deref().map(TenantId::from),
            resolved_at,
        }
    }

    /// Normalized tenant-tier role for `tenant`, if any was assigned.
    pub fn tenant_role(&self, tenant: &TenantId) -> Option<&TenantRole> {
        self.tenant_roles.get(tenant)
    }
}
