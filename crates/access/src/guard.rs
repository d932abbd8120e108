//! Named access predicates — the surface the rest of the application calls.
//!
//! The guard is a borrowed view over the current snapshot, injected
//! explicitly (never read from ambient global state). Each predicate is a
//! thin wrapper over [`resolver::can`](crate::resolver::can); they exist
//! because collaborators call them directly and each carries its own
//! implicit tenant argument.

use opsgate_core::TenantId;

use crate::capability::Capability;
use crate::resolver;
use crate::roles::{SystemRole, TenantRole};
use crate::session::SessionContext;

/// Cheap, copyable view over an optional session snapshot.
#[derive(Debug, Clone, Copy)]
pub struct AccessGuard<'a> {
    session: Option<&'a SessionContext>,
}

impl<'a> AccessGuard<'a> {
    /// A guard over the current snapshot; pass `None` while the session is
    /// still loading (or absent) to get deny-all behavior.
    pub fn new(session: Option<&'a SessionContext>) -> Self {
        Self { session }
    }

    pub fn can(&self, capability: Capability, tenant: Option<&TenantId>) -> bool {
        resolver::can(self.session, capability, tenant)
    }

    pub fn can_manage_users(&self, tenant: Option<&TenantId>) -> bool {
        self.can(Capability::ManageTenantUsers, tenant)
    }

    pub fn can_edit_tenant_settings(&self, tenant: Option<&TenantId>) -> bool {
        self.can(Capability::EditTenantSettings, tenant)
    }

    /// Whether the actor may change `target_role` on a user in `tenant`.
    ///
    /// Current policy ignores the target's role entirely: this degrades to
    /// "is the actor a system or tenant admin". In particular it does not
    /// stop an admin from altering a peer admin's role, their own, or the
    /// last remaining admin's. Known policy gap, kept until product decides
    /// otherwise.
    pub fn can_change_user_role(
        &self,
        _target_role: &TenantRole,
        tenant: Option<&TenantId>,
    ) -> bool {
        self.can_manage_users(tenant)
    }

    /// Whether the actor may edit or disable a user holding `target_role`.
    ///
    /// Same policy gap as [`AccessGuard::can_change_user_role`].
    pub fn can_modify_user(&self, _target_role: &TenantRole, tenant: Option<&TenantId>) -> bool {
        self.can_manage_users(tenant)
    }

    /// True only for `SYSTEM_ADMIN` exactly; a tenant-tier admin does not
    /// satisfy this. Gates the most dangerous, system-only actions such as
    /// tenant deletion.
    pub fn is_admin(&self) -> bool {
        matches!(
            self.session.and_then(|s| s.system_role.as_ref()),
            Some(SystemRole::SystemAdmin)
        )
    }
}
