//! Social-graph ledger
//!
//! Records tweets, direct messages, follow edges and operator grants, and
//! serves newest-first reads over them.
//!
//! ## Layout
//!
//! - **types**: identities, timestamps, sequential ids
//! - **context**: the caller identity and clock supplied per request
//! - **pagination**: bounded reverse walks shared by every read path
//! - **tweets / messages / graph / operators**: the record stores
//! - **ledger**: request-level operations and authorization gating
//! - **shared**: async handle serializing writes behind one lock
//! - **snapshot**: whole-ledger capture, restore and file persistence
//!
//! Records are append-only. The operator grant flag is the only value that
//! ever changes after it is written.

pub mod context;
pub mod errors;
pub mod graph;
pub mod ledger;
pub mod messages;
pub mod operators;
pub mod pagination;
pub mod shared;
pub mod snapshot;
pub mod tweets;
pub mod types;

pub use context::{CallContext, IdentityContext};
pub use errors::{LedgerError, LedgerResult};
pub use graph::SocialGraph;
pub use ledger::Ledger;
pub use messages::{Message, MessageStore};
pub use operators::AuthorizationRegistry;
pub use pagination::ReverseCursor;
pub use shared::SharedLedger;
pub use snapshot::{LedgerSnapshot, SnapshotFile, SnapshotMetadata, SNAPSHOT_VERSION};
pub use tweets::{Tweet, TweetStore};
pub use types::{Identity, MessageId, Sequence, Timestamp, TweetId};
