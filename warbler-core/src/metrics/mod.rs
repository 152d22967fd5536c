//! Metrics for ledger activity
//!
//! Counters go through the `metrics` facade. Nothing is exported unless the
//! embedding process installs a recorder.

use metrics::{counter, describe_counter, describe_gauge, gauge};

pub const TWEETS_POSTED: &str = "ledger.tweets.posted";
pub const MESSAGES_SENT: &str = "ledger.messages.sent";
pub const FOLLOWS_ADDED: &str = "ledger.follows.added";
pub const GRANTS_CHANGED: &str = "ledger.grants.changed";
pub const AUTH_REJECTED: &str = "ledger.auth.rejected";
pub const TWEETS_TOTAL: &str = "ledger.tweets.total";
pub const MESSAGES_TOTAL: &str = "ledger.messages.total";

/// Initialize metrics with descriptions
pub fn init_metrics() {
    describe_counter!(TWEETS_POSTED, "Number of tweets appended");
    describe_counter!(MESSAGES_SENT, "Number of direct messages appended");
    describe_counter!(FOLLOWS_ADDED, "Number of follow edges appended");
    describe_counter!(GRANTS_CHANGED, "Number of allow/disallow operations");
    describe_counter!(AUTH_REJECTED, "Delegated writes rejected for a missing grant");
    describe_gauge!(TWEETS_TOTAL, "Current tweet counter");
    describe_gauge!(MESSAGES_TOTAL, "Current message counter");
}

/// Record a counter metric
pub fn record_counter(name: &'static str, value: u64) {
    counter!(name).increment(value);
}

/// Record a gauge metric
pub fn record_gauge(name: &'static str, value: f64) {
    gauge!(name).set(value);
}
