//! Role tiers and alias normalization.
//!
//! Roles arrive from the session provider as strings, including legacy
//! spellings from before the tiers were split (`ADMIN`, `ANALYST`, `EDITOR`,
//! `VIEWER`). Normalization is total: it never fails, it only narrows.
//! Spellings it does not recognize are carried through unchanged in the
//! `Unrecognized` sentinel so the capability catalog finds no entry for them
//! and the check fails closed.

/// Role scoped to the entire deployment, independent of any tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SystemRole {
    SystemAdmin,
    SystemAnalyst,
    SystemViewer,
    /// A spelling the normalizer does not recognize, preserved verbatim.
    Unrecognized(String),
}

impl SystemRole {
    /// Normalize a raw system-role spelling.
    ///
    /// `None` or empty input yields `None`; legacy aliases map to their
    /// canonical system-tier value; anything else passes through as
    /// [`SystemRole::Unrecognized`]. Matching is exact (case-sensitive).
    pub fn normalize(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        if raw.is_empty() {
            return None;
        }
        Some(match raw {
            "SYSTEM_ADMIN" | "ADMIN" => Self::SystemAdmin,
            "SYSTEM_ANALYST" | "ANALYST" => Self::SystemAnalyst,
            "SYSTEM_VIEWER" | "VIEWER" => Self::SystemViewer,
            other => Self::Unrecognized(other.to_string()),
        })
    }

    /// Canonical spelling, or the raw spelling for unrecognized roles.
    pub fn as_str(&self) -> &str {
        match self {
            Self::SystemAdmin => "SYSTEM_ADMIN",
            Self::SystemAnalyst => "SYSTEM_ANALYST",
            Self::SystemViewer => "SYSTEM_VIEWER",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl core::fmt::Display for SystemRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role scoped to a single tenant, held per tenant in the session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TenantRole {
    TenantAdmin,
    TenantEditor,
    TenantViewer,
    /// A spelling the normalizer does not recognize, preserved verbatim.
    Unrecognized(String),
}

impl TenantRole {
    /// Normalize a raw tenant-role spelling.
    ///
    /// Same contract as [`SystemRole::normalize`], with the tenant-tier
    /// aliases: `ADMIN`, `EDITOR`, `VIEWER`.
    pub fn normalize(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        if raw.is_empty() {
            return None;
        }
        Some(match raw {
            "TENANT_ADMIN" | "ADMIN" => Self::TenantAdmin,
            "TENANT_EDITOR" | "EDITOR" => Self::TenantEditor,
            "TENANT_VIEWER" | "VIEWER" => Self::TenantViewer,
            other => Self::Unrecognized(other.to_string()),
        })
    }

    /// Canonical spelling, or the raw spelling for unrecognized roles.
    pub fn as_str(&self) -> &str {
        match self {
            Self::TenantAdmin => "TENANT_ADMIN",
            Self::TenantEditor => "TENANT_EDITOR",
            Self::TenantViewer => "TENANT_VIEWER",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl core::fmt::Display for TenantRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
