use std::collections::HashMap;
use tracing::{info, warn};

use crate::error::{CatalogError, Result};
use crate::models::{Provider, ProviderStatus, Session};

/// Provider accounts and their moderation history.
///
/// Registration leaves an account `pending`; only admins move it from there.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Provider>,
    /// Registration order, so listings are stable
    order: Vec<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Provider) -> Result<&Provider> {
        if self.providers.contains_key(&provider.id) {
            return Err(CatalogError::Validation(format!(
                "provider {} is already registered",
                provider.id
            )));
        }
        let id = provider.id.clone();
        info!(provider_id = %id, "Registered provider");
        self.order.push(id.clone());
        Ok(self.providers.entry(id).or_insert(provider))
    }

    pub fn get(&self, id: &str) -> Option<&Provider> {
        self.providers.get(id)
    }

    /// Providers in registration order, optionally only those in `status`
    pub fn list(&self, status: Option<ProviderStatus>) -> Vec<&Provider> {
        self.order
            .iter()
            .filter_map(|id| self.providers.get(id))
            .filter(|p| status.map_or(true, |s| p.status == s))
            .collect()
    }

    pub fn approve(&mut self, session: &Session, id: &str) -> Result<&Provider> {
        self.transition(session, id, ProviderStatus::Approved, None)
    }

    pub fn reject(&mut self, session: &Session, id: &str, reason: Option<String>) -> Result<&Provider> {
        self.transition(session, id, ProviderStatus::Rejected, reason)
    }

    pub fn suspend(&mut self, session: &Session, id: &str, reason: Option<String>) -> Result<&Provider> {
        self.transition(session, id, ProviderStatus::Suspended, reason)
    }

    /// Lift a suspension
    pub fn reinstate(&mut self, session: &Session, id: &str) -> Result<&Provider> {
        let current = self
            .get(id)
            .ok_or_else(|| CatalogError::not_found("provider", id))?
            .status;
        if current != ProviderStatus::Suspended {
            return Err(CatalogError::invalid_transition(
                "provider",
                id,
                current,
                ProviderStatus::Approved,
            ));
        }
        self.transition(session, id, ProviderStatus::Approved, None)
    }

    fn transition(
        &mut self,
        session: &Session,
        id: &str,
        to: ProviderStatus,
        reason: Option<String>,
    ) -> Result<&Provider> {
        if !session.is_admin() {
            warn!(user = %session.user_id, provider_id = id, "Non-admin tried to change provider status");
            return Err(CatalogError::Unauthorized(
                "only admins can moderate providers".to_string(),
            ));
        }

        let provider = self
            .providers
            .get_mut(id)
            .ok_or_else(|| CatalogError::not_found("provider", id))?;
        let from = provider.status;
        provider.transition(&session.user_id, to, reason)?;
        info!(provider_id = id, actor = %session.user_id, %from, %to, "Provider status changed");
        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn registry() -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        registry
            .register(Provider::new("prov-1", "Coast Homes", "a@coast.example"))
            .unwrap();
        registry
            .register(Provider::new("prov-2", "Lakeside Lets", "b@lake.example"))
            .unwrap();
        registry
    }

    fn admin() -> Session {
        Session::new("admin-1", Role::Admin)
    }

    #[test]
    fn duplicate_registration_is_refused() {
        let mut registry = registry();
        let err = registry
            .register(Provider::new("prov-1", "Again", "c@x.example"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(registry.list(None).len(), 2);
    }

    #[test]
    fn non_admins_cannot_moderate() {
        let mut registry = registry();
        let err = registry
            .approve(&Session::new("prov-1", Role::Provider), "prov-1")
            .unwrap_err();
        assert!(matches!(err, CatalogError::Unauthorized(_)));
        assert_eq!(registry.get("prov-1").map(|p| p.status), Some(ProviderStatus::Pending));
        assert!(registry.get("prov-1").unwrap().audit_log.is_empty());
    }

    #[test]
    fn full_moderation_cycle_is_audited() {
        let mut registry = registry();
        registry.approve(&admin(), "prov-1").unwrap();
        registry
            .suspend(&admin(), "prov-1", Some("duplicate listings".into()))
            .unwrap();
        let provider = registry.reinstate(&admin(), "prov-1").unwrap();

        assert_eq!(provider.status, ProviderStatus::Approved);
        let trail: Vec<(ProviderStatus, ProviderStatus)> =
            provider.audit_log.iter().map(|e| (e.from, e.to)).collect();
        assert_eq!(
            trail,
            vec![
                (ProviderStatus::Pending, ProviderStatus::Approved),
                (ProviderStatus::Approved, ProviderStatus::Suspended),
                (ProviderStatus::Suspended, ProviderStatus::Approved),
            ]
        );
        assert!(provider.audit_log.iter().all(|e| e.actor_id == "admin-1"));
    }

    #[test]
    fn reinstate_requires_suspension() {
        let mut registry = registry();
        let err = registry.reinstate(&admin(), "prov-2").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidTransition { .. }));
    }

    #[test]
    fn list_filters_by_status_in_registration_order() {
        let mut registry = registry();
        registry.reject(&admin(), "prov-2", None).unwrap();

        let pending: Vec<&str> = registry
            .list(Some(ProviderStatus::Pending))
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(pending, vec!["prov-1"]);

        let all: Vec<&str> = registry.list(None).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(all, vec!["prov-1", "prov-2"]);
    }

    #[test]
    fn unknown_provider_is_not_found() {
        let mut registry = registry();
        assert!(matches!(
            registry.approve(&admin(), "ghost"),
            Err(CatalogError::NotFound { .. })
        ));
    }
}
