//! Active-company resolution.
//!
//! **Rule**: every company-scoped read and write goes through a
//! `RequestContext` resolved fresh for the request. No ambient user or
//! tenant state anywhere below this point.

use crate::app::db;
use crate::app::domain::{CompanyId, UserId};

/// Per-request caller context: who is calling and which company (if any) is
/// their active one. Constructed once per request and threaded explicitly
/// into every operation.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    pub user_id: UserId,
    pub active_company: Option<CompanyId>,
}

impl RequestContext {
    /// Resolve the caller's single active membership. A single indexed
    /// lookup; resolved fresh on every call, no caching.
    pub async fn resolve(
        pool: &sqlx::SqlitePool,
        user_id: UserId,
    ) -> Result<Self, sqlx::Error> {
        let active_company = db::memberships::find_active_company(pool, user_id).await?;
        Ok(Self {
            user_id,
            active_company,
        })
    }

    /// Context with no active company, for operations that do not need one.
    pub fn without_company(user_id: UserId) -> Self {
        Self {
            user_id,
            active_company: None,
        }
    }
}

/// Uniform message for mutations attempted without an active company.
/// Reads return an empty result instead so callers can tell "empty tenant"
/// from "no tenant selected".
pub const NO_ACTIVE_COMPANY: &str = "No active company selected";
