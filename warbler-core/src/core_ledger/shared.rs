//! Shared async ledger
//!
//! Wraps [`Ledger`] in `Arc<RwLock<_>>`. A write holds the write lock for
//! the whole operation, so writes are applied one at a time in lock
//! acquisition order. Reads share the read lock and return owned data, so a
//! caller never observes a half-applied write.

use super::context::IdentityContext;
use super::errors::LedgerResult;
use super::ledger::Ledger;
use super::messages::Message;
use super::snapshot::LedgerSnapshot;
use super::tweets::Tweet;
use super::types::{Identity, MessageId, TweetId};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cloneable handle to one ledger
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ledger(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    pub async fn tweet<C: IdentityContext + Sync>(
        &self,
        ctx: &C,
        content: impl Into<String>,
    ) -> LedgerResult<TweetId> {
        let content = content.into();
        self.inner.write().await.tweet(ctx, content)
    }

    pub async fn tweet_as<C: IdentityContext + Sync>(
        &self,
        ctx: &C,
        principal: &Identity,
        content: impl Into<String>,
    ) -> LedgerResult<TweetId> {
        let content = content.into();
        self.inner.write().await.tweet_as(ctx, principal, content)
    }

    pub async fn send_message<C: IdentityContext + Sync>(
        &self,
        ctx: &C,
        to: &Identity,
        content: impl Into<String>,
    ) -> LedgerResult<MessageId> {
        let content = content.into();
        self.inner.write().await.send_message(ctx, to, content)
    }

    pub async fn send_message_as<C: IdentityContext + Sync>(
        &self,
        ctx: &C,
        from: &Identity,
        to: &Identity,
        content: impl Into<String>,
    ) -> LedgerResult<MessageId> {
        let content = content.into();
        self.inner
            .write()
            .await
            .send_message_as(ctx, from, to, content)
    }

    pub async fn follow<C: IdentityContext + Sync>(
        &self,
        ctx: &C,
        followed: &Identity,
    ) -> LedgerResult<()> {
        self.inner.write().await.follow(ctx, followed)
    }

    pub async fn allow<C: IdentityContext + Sync>(
        &self,
        ctx: &C,
        operator: &Identity,
    ) -> LedgerResult<()> {
        self.inner.write().await.allow(ctx, operator)
    }

    pub async fn disallow<C: IdentityContext + Sync>(
        &self,
        ctx: &C,
        operator: &Identity,
    ) -> LedgerResult<()> {
        self.inner.write().await.disallow(ctx, operator)
    }

    pub async fn is_operator(&self, principal: &Identity, operator: &Identity) -> bool {
        self.inner.read().await.is_operator(principal, operator)
    }

    pub async fn latest_tweets(&self, count: usize) -> LedgerResult<Vec<Tweet>> {
        self.inner.read().await.latest_tweets(count)
    }

    pub async fn latest_tweets_of(
        &self,
        author: &Identity,
        count: usize,
    ) -> LedgerResult<Vec<Tweet>> {
        self.inner.read().await.latest_tweets_of(author, count)
    }

    pub async fn get_tweet(&self, id: TweetId) -> Option<Tweet> {
        self.inner.read().await.get_tweet(id).cloned()
    }

    pub async fn conversation(&self, a: &Identity, b: &Identity) -> Vec<Message> {
        self.inner.read().await.conversation(a, b).to_vec()
    }

    pub async fn latest_messages(
        &self,
        a: &Identity,
        b: &Identity,
        count: usize,
    ) -> LedgerResult<Vec<Message>> {
        self.inner.read().await.latest_messages(a, b, count)
    }

    pub async fn following(&self, of: &Identity) -> Vec<Identity> {
        self.inner.read().await.following(of).to_vec()
    }

    pub async fn tweet_count(&self) -> u64 {
        self.inner.read().await.tweet_count()
    }

    pub async fn message_count(&self) -> u64 {
        self.inner.read().await.message_count()
    }

    pub async fn snapshot(&self) -> LedgerSnapshot {
        self.inner.read().await.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_ledger::context::CallContext;
    use crate::core_ledger::errors::LedgerError;

    #[tokio::test]
    async fn test_clones_share_state() {
        let ledger = SharedLedger::new();
        let other = ledger.clone();

        ledger.tweet(&CallContext::new("alice"), "shared").await.unwrap();
        assert_eq!(other.tweet_count().await, 1);
        assert_eq!(other.latest_tweets(1).await.unwrap()[0].content, "shared");
    }

    #[tokio::test]
    async fn test_delegation_through_handle() {
        let ledger = SharedLedger::new();
        let alice = Identity::new("alice");
        let bob_ctx = CallContext::new("bob");

        assert!(matches!(
            ledger.tweet_as(&bob_ctx, &alice, "nope").await,
            Err(LedgerError::Unauthorized { .. })
        ));

        ledger
            .allow(&CallContext::new("alice"), &Identity::new("bob"))
            .await
            .unwrap();
        assert!(ledger.is_operator(&alice, &Identity::new("bob")).await);

        let id = ledger.tweet_as(&bob_ctx, &alice, "yes").await.unwrap();
        assert_eq!(ledger.get_tweet(id).await.unwrap().author, alice);
    }
}
