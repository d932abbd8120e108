//! `opsgate-access` — pure authorization/capability-resolution boundary.
//!
//! Decides which administrative actions an acting identity may perform under
//! the two-tier role hierarchy (system-wide role + per-tenant role). This
//! crate is intentionally decoupled from HTTP, storage, and the session
//! provider: it consumes an immutable [`SessionContext`] snapshot and answers
//! allow/deny questions about [`Capability`] values. Nothing here performs
//! I/O, and refreshing authorization state means replacing the snapshot
//! wholesale, never patching it in place.

pub mod capability;
pub mod guard;
pub mod resolver;
pub mod roles;
pub mod session;

pub use capability::Capability;
pub use guard::AccessGuard;
pub use resolver::{AccessDecision, AccessError, DenialKind, DenialReason, authorize, can, explain};
pub use roles::{SystemRole, TenantRole};
pub use session::{AccessMode, Identity, SessionContext, SessionRecord};
