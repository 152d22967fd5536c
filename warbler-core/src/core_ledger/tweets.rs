/*
    tweets.rs - Append-only tweet log with a per-author index

    Tweet ids are dense: id n lives at slot n - 1 of the log. The per-author
    index holds ids in posting order, so both read paths are tail walks.
*/

use super::errors::{LedgerError, LedgerResult};
use super::pagination;
use super::types::{Identity, Sequence, Timestamp, TweetId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An immutable post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: TweetId,
    pub author: Identity,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct TweetStore {
    tweets: Vec<Tweet>,
    by_author: HashMap<Identity, Vec<TweetId>>,
    sequence: Sequence,
}

impl TweetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a log ordered by id
    ///
    /// The log must be exactly ids `1..=n` in order.
    pub fn from_tweets(tweets: Vec<Tweet>) -> LedgerResult<Self> {
        let mut store = Self::new();
        for tweet in tweets {
            let expected = store.sequence.peek();
            if tweet.id.0 != expected {
                return Err(LedgerError::InvalidSnapshot(format!(
                    "tweet id {} found where {} was expected",
                    tweet.id, expected
                )));
            }
            store.sequence.next();
            store
                .by_author
                .entry(tweet.author.clone())
                .or_default()
                .push(tweet.id);
            store.tweets.push(tweet);
        }
        Ok(store)
    }

    /// Append a tweet and index it under its author
    ///
    /// Content is stored as given; there is no length or emptiness check.
    pub fn post(&mut self, author: Identity, content: String, at: Timestamp) -> TweetId {
        let id = TweetId(self.sequence.next());
        self.by_author.entry(author.clone()).or_default().push(id);
        self.tweets.push(Tweet {
            id,
            author,
            content,
            created_at: at,
        });
        id
    }

    pub fn get(&self, id: TweetId) -> Option<&Tweet> {
        id.index().and_then(|i| self.tweets.get(i))
    }

    /// Value of the tweet counter
    pub fn count(&self) -> u64 {
        self.sequence.current()
    }

    pub fn count_of(&self, author: &Identity) -> usize {
        self.by_author.get(author).map_or(0, Vec::len)
    }

    /// Full log in id order
    pub fn tweets(&self) -> &[Tweet] {
        &self.tweets
    }

    /// Most recent tweets across all authors, newest first
    pub fn latest(&self, count: usize) -> LedgerResult<Vec<Tweet>> {
        Ok(pagination::latest(&self.tweets, count)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Most recent tweets of one author, newest first
    ///
    /// Fails with `NotFound` when the author has never posted.
    pub fn latest_of(&self, author: &Identity, count: usize) -> LedgerResult<Vec<Tweet>> {
        pagination::check_count(count)?;
        let index = self
            .by_author
            .get(author)
            .filter(|ids| !ids.is_empty())
            .ok_or_else(|| LedgerError::NotFound(format!("no tweets by {}", author)))?;

        Ok(pagination::latest(index, count)?
            .into_iter()
            .filter_map(|id| self.get(*id).cloned())
            .collect())
    }
}
