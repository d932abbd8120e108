//! Strongly-typed identifiers used across the domain.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a tenant (multi-tenant boundary).
///
/// Tenant identifiers are opaque strings assigned by the identity/session
/// layer; this crate never parses or interprets them. The type is ordered and
/// hashable so it can key role maps and allow-lists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Cow<'static, str>);

impl TenantId {
    /// Wrap a tenant identifier.
    ///
    /// Empty identifiers are not representable; use [`TenantId::parse`] when
    /// the input is untrusted.
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    /// Parse an untrusted tenant identifier, rejecting empty strings.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::invalid_id("TenantId: empty"));
        }
        Ok(Self(Cow::Owned(raw.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TenantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TenantId {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_string()))
    }
}
