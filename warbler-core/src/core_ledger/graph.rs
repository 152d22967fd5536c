//! Follow edges

use super::errors::{LedgerError, LedgerResult};
use super::types::Identity;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SocialGraph {
    following: HashMap<Identity, Vec<Identity>>,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `followed` to `follower`'s list
    ///
    /// Repeated calls append repeated edges. `followed` need not exist.
    pub fn follow(&mut self, follower: &Identity, followed: &Identity) -> LedgerResult<()> {
        if follower == followed {
            return Err(LedgerError::InvalidArgument(format!(
                "{} cannot follow itself",
                follower
            )));
        }
        self.following
            .entry(follower.clone())
            .or_default()
            .push(followed.clone());
        Ok(())
    }

    /// Followed identities in insertion order
    pub fn following(&self, of: &Identity) -> &[Identity] {
        self.following
            .get(of)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn edge_count(&self) -> usize {
        self.following.values().map(Vec::len).sum()
    }

    pub fn lists(&self) -> impl Iterator<Item = (&Identity, &[Identity])> {
        self.following.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
