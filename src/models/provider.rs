use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CatalogError, Result};

/// Approval state of a listing provider account
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Suspended,
}

impl ProviderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::Pending => "pending",
            ProviderStatus::Approved => "approved",
            ProviderStatus::Rejected => "rejected",
            ProviderStatus::Suspended => "suspended",
        }
    }

    pub fn can_transition_to(&self, next: ProviderStatus) -> bool {
        use ProviderStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Suspended) | (Suspended, Approved)
        )
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One admin decision on a provider account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub actor_id: String,
    pub at: DateTime<Utc>,
    pub from: ProviderStatus,
    pub to: ProviderStatus,
    pub reason: Option<String>,
}

/// A listing provider (agent, landlord, developer)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: ProviderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub audit_log: Vec<AuditEntry>,
}

impl Provider {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            status: ProviderStatus::Pending,
            created_at: Utc::now(),
            audit_log: Vec::new(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == ProviderStatus::Approved
    }

    /// Move to `to` and record who did it. No concurrency control: last write wins.
    pub fn transition(
        &mut self,
        actor_id: &str,
        to: ProviderStatus,
        reason: Option<String>,
    ) -> Result<()> {
        if !self.status.can_transition_to(to) {
            return Err(CatalogError::invalid_transition(
                "provider", &self.id, self.status, to,
            ));
        }

        self.audit_log.push(AuditEntry {
            actor_id: actor_id.to_string(),
            at: Utc::now(),
            from: self.status,
            to,
            reason,
        });
        self.status = to;
        Ok(())
    }
}
