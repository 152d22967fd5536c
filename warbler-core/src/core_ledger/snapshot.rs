/*
    snapshot.rs - Whole-ledger snapshots

    A snapshot is the full ledger state in a flat, serializable form.
    Restoring rebuilds every index and re-checks the ledger invariants.

    Files are written atomically: encode to a temp file, fsync, rename.
*/

use super::errors::{LedgerError, LedgerResult};
use super::graph::SocialGraph;
use super::ledger::Ledger;
use super::messages::{Message, MessageStore};
use super::operators::AuthorizationRegistry;
use super::tweets::{Tweet, TweetStore};
use super::types::{Identity, Timestamp};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Snapshot metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub version: u32,
    pub created_at: Timestamp,
    pub tweet_count: u64,
    pub message_count: u64,
}

/// Flat ledger state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub metadata: SnapshotMetadata,
    pub tweets: Vec<Tweet>,
    pub messages: Vec<Message>,
    /// `(follower, followed list)` sorted by follower
    pub follows: Vec<(Identity, Vec<Identity>)>,
    /// `(principal, operator, granted)` sorted by key
    pub grants: Vec<(Identity, Identity, bool)>,
}

impl LedgerSnapshot {
    /// Snapshot of a ledger with no records
    pub fn empty() -> Self {
        Ledger::new().snapshot()
    }
}

impl Ledger {
    /// Capture the full state
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut follows: Vec<(Identity, Vec<Identity>)> = self
            .graph
            .lists()
            .map(|(follower, followed)| (follower.clone(), followed.to_vec()))
            .collect();
        follows.sort_by(|a, b| a.0.cmp(&b.0));

        let mut grants: Vec<(Identity, Identity, bool)> = self
            .operators
            .grants()
            .map(|(p, op, granted)| (p.clone(), op.clone(), granted))
            .collect();
        grants.sort();

        LedgerSnapshot {
            metadata: SnapshotMetadata {
                version: SNAPSHOT_VERSION,
                created_at: Timestamp::now(),
                tweet_count: self.tweets.count(),
                message_count: self.messages.count(),
            },
            tweets: self.tweets.tweets().to_vec(),
            messages: self.messages.messages(),
            follows,
            grants,
        }
    }

    /// Rebuild a ledger from a snapshot
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` if the version is unknown, tweet ids are not dense,
    /// message ids are not dense up to the counter, or a self-follow or
    /// self-grant is present.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> LedgerResult<Self> {
        let LedgerSnapshot {
            metadata,
            tweets,
            messages,
            follows,
            grants,
        } = snapshot;

        if metadata.version != SNAPSHOT_VERSION {
            return Err(LedgerError::InvalidSnapshot(format!(
                "unsupported snapshot version {}",
                metadata.version
            )));
        }
        if tweets.len() as u64 != metadata.tweet_count {
            return Err(LedgerError::InvalidSnapshot(format!(
                "{} tweets recorded but counter is {}",
                tweets.len(),
                metadata.tweet_count
            )));
        }

        let tweets = TweetStore::from_tweets(tweets)?;
        let messages = MessageStore::from_messages(messages, metadata.message_count)?;

        let mut graph = SocialGraph::new();
        for (follower, followed) in &follows {
            for target in followed {
                graph
                    .follow(follower, target)
                    .map_err(|e| LedgerError::InvalidSnapshot(e.to_string()))?;
            }
        }

        let mut operators = AuthorizationRegistry::new();
        for (principal, operator, granted) in &grants {
            if *granted {
                operators
                    .allow(principal, operator)
                    .map_err(|e| LedgerError::InvalidSnapshot(e.to_string()))?;
            } else {
                operators.disallow(principal, operator);
            }
        }

        Ok(Ledger {
            tweets,
            messages,
            graph,
            operators,
        })
    }
}

/// Snapshot persistence on the local filesystem
pub struct SnapshotFile;

impl SnapshotFile {
    /// Atomically write `snapshot` to `path`
    pub fn save(path: impl AsRef<Path>, snapshot: &LedgerSnapshot) -> LedgerResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }

        let data = bincode::serialize(snapshot)?;

        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&temp_path, path)?;
        debug!(
            path = %path.display(),
            tweets = snapshot.metadata.tweet_count,
            messages = snapshot.metadata.message_count,
            "Snapshot saved"
        );
        Ok(())
    }

    /// Read a snapshot; a missing file reads as an empty ledger
    pub fn load(path: impl AsRef<Path>) -> LedgerResult<LedgerSnapshot> {
        let path = path.as_ref();
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "No snapshot found, starting empty");
                return Ok(LedgerSnapshot::empty());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(bincode::deserialize(&data)?)
    }

    /// Load and restore in one step
    pub fn load_ledger(path: impl AsRef<Path>) -> LedgerResult<Ledger> {
        Ledger::from_snapshot(Self::load(path)?)
    }
}
