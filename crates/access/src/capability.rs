//! Capability enumeration, the role→capability catalog, and the
//! capability→requirement label table.
//!
//! The two tables below are the single source of truth for the current
//! policy. The grant structure is deliberately binary, not graduated: only
//! the highest-privilege role of each tier maps to a non-empty set, and the
//! Analyst/Editor/Viewer identifiers grant nothing. Do not infer
//! intermediate capability sets for them.

use serde::{Deserialize, Serialize};

use opsgate_core::DomainError;

use crate::roles::{SystemRole, TenantRole};

/// An atomic permission gating one administrative action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Create, suspend, and delete tenants (deployment-wide).
    #[serde(rename = "system.tenants.manage")]
    ManageTenants,

    /// Invite, edit, and remove users within a tenant.
    #[serde(rename = "tenant.users.manage")]
    ManageTenantUsers,

    /// Edit a tenant's settings.
    #[serde(rename = "tenant.settings.edit")]
    EditTenantSettings,

    /// Create and revoke a tenant's data exports.
    #[serde(rename = "tenant.exports.manage")]
    ManageTenantExports,

    /// Irreversibly delete a tenant and its data.
    #[serde(rename = "tenant.danger.delete")]
    DeleteTenant,
}

impl Capability {
    /// Every capability, in wire-name order.
    pub const ALL: &'static [Capability] = &[
        Capability::ManageTenants,
        Capability::ManageTenantUsers,
        Capability::EditTenantSettings,
        Capability::ManageTenantExports,
        Capability::DeleteTenant,
    ];

    /// Dotted wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageTenants => "system.tenants.manage",
            Self::ManageTenantUsers => "tenant.users.manage",
            Self::EditTenantSettings => "tenant.settings.edit",
            Self::ManageTenantExports => "tenant.exports.manage",
            Self::DeleteTenant => "tenant.danger.delete",
        }
    }

    /// Whether this capability is grantable only through the system tier.
    ///
    /// Tenant-tier roles never grant these, regardless of catalog content;
    /// the resolver enforces this over and above the catalog union.
    pub fn is_system_only(&self) -> bool {
        matches!(self, Self::ManageTenants | Self::DeleteTenant)
    }

    /// Static human-readable requirement, used to annotate disabled controls.
    ///
    /// Must stay in lockstep with the catalog tables; the tests in this
    /// module assert the two stay mutually consistent.
    pub fn requirement(&self) -> &'static str {
        match self {
            Self::ManageTenants => "Requires SYSTEM_ADMIN",
            Self::ManageTenantUsers => "Requires TENANT_ADMIN or SYSTEM_ADMIN",
            Self::EditTenantSettings => "Requires TENANT_ADMIN or SYSTEM_ADMIN",
            Self::ManageTenantExports => "Requires TENANT_ADMIN or SYSTEM_ADMIN",
            Self::DeleteTenant => "Requires SYSTEM_ADMIN",
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Capability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown capability: {s}")))
    }
}

const TENANT_ADMIN_GRANTS: &[Capability] = &[
    Capability::ManageTenantUsers,
    Capability::EditTenantSettings,
    Capability::ManageTenantExports,
];

impl SystemRole {
    /// Capabilities granted by this role through the system tier.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Self::SystemAdmin => Capability::ALL,
            Self::SystemAnalyst | Self::SystemViewer | Self::Unrecognized(_) => &[],
        }
    }
}

impl TenantRole {
    /// Capabilities granted by this role within its tenant.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Self::TenantAdmin => TENANT_ADMIN_GRANTS,
            Self::TenantEditor | Self::TenantViewer | Self::Unrecognized(_) => &[],
        }
    }
}
