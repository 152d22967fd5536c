//! Request context supplied by the host for each call

use super::errors::{LedgerError, LedgerResult};
use super::types::{Identity, Timestamp};

/// Authenticated caller and clock for a single request
pub trait IdentityContext {
    fn caller(&self) -> &Identity;
    fn now(&self) -> Timestamp;
}

/// Concrete context built by a transport or the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Identity,
    pub at: Timestamp,
}

impl CallContext {
    /// Context stamped with the current wall-clock time
    pub fn new(caller: impl Into<Identity>) -> Self {
        Self {
            caller: caller.into(),
            at: Timestamp::now(),
        }
    }

    /// Context with a fixed time
    pub fn at(caller: impl Into<Identity>, at: Timestamp) -> Self {
        Self {
            caller: caller.into(),
            at,
        }
    }
}

impl IdentityContext for CallContext {
    fn caller(&self) -> &Identity {
        &self.caller
    }

    fn now(&self) -> Timestamp {
        self.at
    }
}

/// Caller of `ctx`, rejecting an absent (empty) identity
pub(crate) fn require_caller<C: IdentityContext + ?Sized>(ctx: &C) -> LedgerResult<&Identity> {
    let caller = ctx.caller();
    if caller.is_empty() {
        return Err(LedgerError::InvalidArgument(
            "caller identity must be present".to_string(),
        ));
    }
    Ok(caller)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_context() {
        let ctx = CallContext::at("alice", Timestamp::from_millis(5));
        assert_eq!(ctx.caller().as_str(), "alice");
        assert_eq!(ctx.now(), Timestamp::from_millis(5));
    }

    #[test]
    fn test_require_caller_rejects_empty() {
        let ctx = CallContext::new("");
        assert!(matches!(
            require_caller(&ctx),
            Err(LedgerError::InvalidArgument(_))
        ));

        let ctx = CallContext::new("bob");
        assert_eq!(require_caller(&ctx).unwrap(), &Identity::new("bob"));
    }
}
