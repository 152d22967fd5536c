//! Operator grants: which identities may write on behalf of which principals

use super::errors::{LedgerError, LedgerResult};
use super::types::Identity;
use std::collections::HashMap;

/// Grant flags keyed by `(principal, operator)`
#[derive(Debug, Clone, Default)]
pub struct AuthorizationRegistry {
    grants: HashMap<(Identity, Identity), bool>,
}

impl AuthorizationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `operator` act as `principal`. Idempotent.
    pub fn allow(&mut self, principal: &Identity, operator: &Identity) -> LedgerResult<()> {
        if principal == operator {
            return Err(LedgerError::InvalidArgument(format!(
                "{} cannot be its own operator",
                principal
            )));
        }
        self.grants
            .insert((principal.clone(), operator.clone()), true);
        Ok(())
    }

    /// Clear the grant. Never fails.
    pub fn disallow(&mut self, principal: &Identity, operator: &Identity) {
        self.grants
            .insert((principal.clone(), operator.clone()), false);
    }

    pub fn is_authorized(&self, principal: &Identity, operator: &Identity) -> bool {
        self.grants
            .get(&(principal.clone(), operator.clone()))
            .copied()
            .unwrap_or(false)
    }

    /// Gate for delegated writes
    pub fn require_authorized(&self, principal: &Identity, caller: &Identity) -> LedgerResult<()> {
        if !self.is_authorized(principal, caller) {
            return Err(LedgerError::Unauthorized {
                principal: principal.clone(),
                operator: caller.clone(),
            });
        }
        Ok(())
    }

    /// Operators currently allowed to act as `principal`, sorted
    pub fn operators_of(&self, principal: &Identity) -> Vec<Identity> {
        let mut operators: Vec<Identity> = self
            .grants
            .iter()
            .filter(|((p, _), granted)| p == principal && **granted)
            .map(|((_, op), _)| op.clone())
            .collect();
        operators.sort();
        operators
    }

    /// Every recorded flag, including cleared ones
    pub fn grants(&self) -> impl Iterator<Item = (&Identity, &Identity, bool)> {
        self.grants.iter().map(|((p, op), granted)| (p, op, *granted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unseen_pair_is_unauthorized() {
        let registry = AuthorizationRegistry::new();
        assert!(!registry.is_authorized(&"alice".into(), &"bob".into()));
    }

    #[test]
    fn test_allow_then_disallow() {
        let mut registry = AuthorizationRegistry::new();
        let (alice, bob) = (Identity::new("alice"), Identity::new("bob"));

        registry.allow(&alice, &bob).unwrap();
        registry.allow(&alice, &bob).unwrap();
        assert!(registry.is_authorized(&alice, &bob));
        assert!(!registry.is_authorized(&bob, &alice));

        registry.disallow(&alice, &bob);
        assert!(!registry.is_authorized(&alice, &bob));
        registry.disallow(&alice, &bob);
        assert!(matches!(
            registry.require_authorized(&alice, &bob),
            Err(LedgerError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_self_grant_rejected() {
        let mut registry = AuthorizationRegistry::new();
        let alice = Identity::new("alice");
        assert!(matches!(
            registry.allow(&alice, &alice),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(!registry.is_authorized(&alice, &alice));
    }

    #[test]
    fn test_operators_of() {
        let mut registry = AuthorizationRegistry::new();
        let alice = Identity::new("alice");
        registry.allow(&alice, &"carol".into()).unwrap();
        registry.allow(&alice, &"bob".into()).unwrap();
        registry.allow(&alice, &"dave".into()).unwrap();
        registry.disallow(&alice, &"dave".into());

        assert_eq!(
            registry.operators_of(&alice),
            vec![Identity::new("bob"), Identity::new("carol")]
        );
    }
}
