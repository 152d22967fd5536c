//! Ledger - request-level operations over the record stores
//!
//! Every write resolves the caller from its [`IdentityContext`], runs the
//! argument and authorization checks, and only then mutates a store. A
//! rejected call therefore leaves no trace.
//!
//! ```text
//! caller ──► Ledger ──► AuthorizationRegistry (delegated writes only)
//!               │
//!               ├──► TweetStore
//!               ├──► MessageStore
//!               └──► SocialGraph
//! ```

use super::context::{require_caller, IdentityContext};
use super::errors::LedgerResult;
use super::graph::SocialGraph;
use super::messages::{Message, MessageStore};
use super::operators::AuthorizationRegistry;
use super::tweets::{Tweet, TweetStore};
use super::types::{Identity, MessageId, TweetId};
use crate::metrics::{self as ledger_metrics, record_counter, record_gauge};
use tracing::{debug, warn};

/// The social-graph ledger
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub(crate) tweets: TweetStore,
    pub(crate) messages: MessageStore,
    pub(crate) graph: SocialGraph,
    pub(crate) operators: AuthorizationRegistry,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a tweet authored by the caller
    ///
    /// # Returns
    ///
    /// The id of the new tweet
    pub fn tweet<C: IdentityContext + ?Sized>(
        &mut self,
        ctx: &C,
        content: impl Into<String>,
    ) -> LedgerResult<TweetId> {
        let author = require_caller(ctx)?.clone();
        Ok(self.post(author, content.into(), ctx))
    }

    /// Post a tweet authored by `principal`, with the caller acting as operator
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `principal` has allowed the caller. The tweet's
    /// author is `principal`.
    pub fn tweet_as<C: IdentityContext + ?Sized>(
        &mut self,
        ctx: &C,
        principal: &Identity,
        content: impl Into<String>,
    ) -> LedgerResult<TweetId> {
        let caller = require_caller(ctx)?;
        self.authorize(principal, caller)?;
        Ok(self.post(principal.clone(), content.into(), ctx))
    }

    /// Send a direct message from the caller to `to`
    pub fn send_message<C: IdentityContext + ?Sized>(
        &mut self,
        ctx: &C,
        to: &Identity,
        content: impl Into<String>,
    ) -> LedgerResult<MessageId> {
        let from = require_caller(ctx)?.clone();
        Ok(self.send(from, to.clone(), content.into(), ctx))
    }

    /// Send a direct message from `from` to `to`, with the caller acting as operator
    pub fn send_message_as<C: IdentityContext + ?Sized>(
        &mut self,
        ctx: &C,
        from: &Identity,
        to: &Identity,
        content: impl Into<String>,
    ) -> LedgerResult<MessageId> {
        let caller = require_caller(ctx)?;
        self.authorize(from, caller)?;
        Ok(self.send(from.clone(), to.clone(), content.into(), ctx))
    }

    /// Record that the caller follows `followed`
    pub fn follow<C: IdentityContext + ?Sized>(
        &mut self,
        ctx: &C,
        followed: &Identity,
    ) -> LedgerResult<()> {
        let follower = require_caller(ctx)?;
        self.graph.follow(follower, followed)?;
        record_counter(ledger_metrics::FOLLOWS_ADDED, 1);
        debug!(follower = %follower, followed = %followed, "Follow recorded");
        Ok(())
    }

    /// Let `operator` act on the caller's behalf
    pub fn allow<C: IdentityContext + ?Sized>(
        &mut self,
        ctx: &C,
        operator: &Identity,
    ) -> LedgerResult<()> {
        let principal = require_caller(ctx)?;
        self.operators.allow(principal, operator)?;
        record_counter(ledger_metrics::GRANTS_CHANGED, 1);
        debug!(principal = %principal, operator = %operator, "Operator allowed");
        Ok(())
    }

    /// Revoke `operator`'s permission to act on the caller's behalf
    pub fn disallow<C: IdentityContext + ?Sized>(
        &mut self,
        ctx: &C,
        operator: &Identity,
    ) -> LedgerResult<()> {
        let principal = require_caller(ctx)?;
        self.operators.disallow(principal, operator);
        record_counter(ledger_metrics::GRANTS_CHANGED, 1);
        debug!(principal = %principal, operator = %operator, "Operator disallowed");
        Ok(())
    }

    pub fn is_operator(&self, principal: &Identity, operator: &Identity) -> bool {
        self.operators.is_authorized(principal, operator)
    }

    pub fn operators_of(&self, principal: &Identity) -> Vec<Identity> {
        self.operators.operators_of(principal)
    }

    /// Latest `count` tweets across all authors, newest first
    pub fn latest_tweets(&self, count: usize) -> LedgerResult<Vec<Tweet>> {
        self.tweets.latest(count)
    }

    /// Latest `count` tweets by `author`, newest first
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a zero count, `NotFound` if `author` never posted.
    pub fn latest_tweets_of(&self, author: &Identity, count: usize) -> LedgerResult<Vec<Tweet>> {
        self.tweets.latest_of(author, count)
    }

    pub fn get_tweet(&self, id: TweetId) -> Option<&Tweet> {
        self.tweets.get(id)
    }

    /// Messages sent from `a` to `b`, oldest first
    pub fn conversation(&self, a: &Identity, b: &Identity) -> &[Message] {
        self.messages.conversation(a, b)
    }

    /// Latest `count` messages sent from `a` to `b`, newest first
    pub fn latest_messages(
        &self,
        a: &Identity,
        b: &Identity,
        count: usize,
    ) -> LedgerResult<Vec<Message>> {
        self.messages.latest(a, b, count)
    }

    pub fn following(&self, of: &Identity) -> &[Identity] {
        self.graph.following(of)
    }

    pub fn tweet_count(&self) -> u64 {
        self.tweets.count()
    }

    pub fn message_count(&self) -> u64 {
        self.messages.count()
    }

    fn authorize(&self, principal: &Identity, caller: &Identity) -> LedgerResult<()> {
        self.operators
            .require_authorized(principal, caller)
            .inspect_err(|_| {
                record_counter(ledger_metrics::AUTH_REJECTED, 1);
                warn!(principal = %principal, caller = %caller, "Delegated write rejected");
            })
    }

    fn post<C: IdentityContext + ?Sized>(
        &mut self,
        author: Identity,
        content: String,
        ctx: &C,
    ) -> TweetId {
        let id = self.tweets.post(author, content, ctx.now());
        record_counter(ledger_metrics::TWEETS_POSTED, 1);
        record_gauge(ledger_metrics::TWEETS_TOTAL, self.tweets.count() as f64);
        debug!(tweet_id = %id, caller = %ctx.caller(), "Tweet posted");
        id
    }

    fn send<C: IdentityContext + ?Sized>(
        &mut self,
        from: Identity,
        to: Identity,
        content: String,
        ctx: &C,
    ) -> MessageId {
        let id = self.messages.send(from, to, content, ctx.now());
        record_counter(ledger_metrics::MESSAGES_SENT, 1);
        record_gauge(ledger_metrics::MESSAGES_TOTAL, self.messages.count() as f64);
        debug!(message_id = %id, caller = %ctx.caller(), "Message sent");
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_ledger::context::CallContext;
    use crate::core_ledger::errors::LedgerError;
    use crate::core_ledger::types::Timestamp;

    fn as_user(name: &str) -> CallContext {
        CallContext::at(name, Timestamp::from_millis(1_000))
    }

    #[test]
    fn test_hi_bye_example() {
        let mut ledger = Ledger::new();
        let alice = as_user("alice");

        assert_eq!(ledger.tweet(&alice, "hi").unwrap(), TweetId(1));
        assert_eq!(ledger.tweet(&alice, "bye").unwrap(), TweetId(2));

        let one = ledger.latest_tweets(1).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!((one[0].id, one[0].content.as_str()), (TweetId(2), "bye"));

        let five = ledger.latest_tweets(5).unwrap();
        let pairs: Vec<(u64, &str)> = five.iter().map(|t| (t.id.0, t.content.as_str())).collect();
        assert_eq!(pairs, vec![(2, "bye"), (1, "hi")]);
    }

    #[test]
    fn test_tweet_uses_context_time() {
        let mut ledger = Ledger::new();
        let ctx = CallContext::at("alice", Timestamp::from_millis(42));
        let id = ledger.tweet(&ctx, "stamped").unwrap();
        assert_eq!(ledger.get_tweet(id).unwrap().created_at, Timestamp::from_millis(42));
    }

    #[test]
    fn test_tweet_as_requires_grant() {
        let mut ledger = Ledger::new();
        let alice = Identity::new("alice");

        let err = ledger.tweet_as(&as_user("bob"), &alice, "hijack").unwrap_err();
        assert_eq!(
            err,
            LedgerError::Unauthorized {
                principal: alice.clone(),
                operator: Identity::new("bob"),
            }
        );
        assert_eq!(ledger.tweet_count(), 0);

        ledger.allow(&as_user("alice"), &Identity::new("bob")).unwrap();
        let id = ledger.tweet_as(&as_user("bob"), &alice, "on behalf").unwrap();
        assert_eq!(ledger.get_tweet(id).unwrap().author, alice);
    }

    #[test]
    fn test_disallow_revokes() {
        let mut ledger = Ledger::new();
        let alice = Identity::new("alice");
        let bob = Identity::new("bob");

        ledger.allow(&as_user("alice"), &bob).unwrap();
        ledger.disallow(&as_user("alice"), &bob).unwrap();

        assert!(matches!(
            ledger.tweet_as(&as_user("bob"), &alice, "late"),
            Err(LedgerError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_acting_as_self_is_not_implicitly_authorized() {
        let mut ledger = Ledger::new();
        let alice = Identity::new("alice");
        assert!(matches!(
            ledger.tweet_as(&as_user("alice"), &alice, "me"),
            Err(LedgerError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_send_message_as() {
        let mut ledger = Ledger::new();
        let (alice, bob, carol) = (
            Identity::new("alice"),
            Identity::new("bob"),
            Identity::new("carol"),
        );

        assert_eq!(ledger.send_message(&as_user("alice"), &bob, "direct").unwrap(), MessageId(1));
        assert!(ledger
            .send_message_as(&as_user("carol"), &alice, &bob, "forged")
            .is_err());
        assert_eq!(ledger.message_count(), 1);

        ledger.allow(&as_user("alice"), &carol).unwrap();
        assert_eq!(
            ledger
                .send_message_as(&as_user("carol"), &alice, &bob, "relayed")
                .unwrap(),
            MessageId(2)
        );

        let log = ledger.conversation(&alice, &bob);
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|m| m.sender == alice));
        assert!(ledger.conversation(&bob, &alice).is_empty());
        assert!(ledger.conversation(&carol, &bob).is_empty());
    }

    #[test]
    fn test_self_targeting_rejected() {
        let mut ledger = Ledger::new();
        let alice = Identity::new("alice");

        assert!(matches!(
            ledger.follow(&as_user("alice"), &alice),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            ledger.allow(&as_user("alice"), &alice),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_follow_appends() {
        let mut ledger = Ledger::new();
        let bob = Identity::new("bob");
        ledger.follow(&as_user("alice"), &bob).unwrap();
        ledger.follow(&as_user("alice"), &bob).unwrap();
        assert_eq!(ledger.following(&Identity::new("alice")), &[bob.clone(), bob][..]);
    }

    #[test]
    fn test_missing_caller_rejected_without_mutation() {
        let mut ledger = Ledger::new();
        let anonymous = as_user("");

        assert!(matches!(
            ledger.tweet(&anonymous, "who am i"),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(ledger.send_message(&anonymous, &"bob".into(), "x").is_err());
        assert!(ledger.follow(&anonymous, &"bob".into()).is_err());
        assert!(ledger.disallow(&anonymous, &"bob".into()).is_err());
        assert_eq!(ledger.tweet_count(), 0);
        assert_eq!(ledger.message_count(), 0);
    }

    #[test]
    fn test_latest_tweets_of_errors() {
        let mut ledger = Ledger::new();
        ledger.tweet(&as_user("alice"), "x").unwrap();

        assert!(matches!(
            ledger.latest_tweets_of(&"bob".into(), 3),
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            ledger.latest_tweets_of(&"alice".into(), 0),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            ledger.latest_tweets(0),
            Err(LedgerError::InvalidArgument(_))
        ));
    }
}
