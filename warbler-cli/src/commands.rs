//! Command execution for the `warbler` binary

use anyhow::Result;
use clap::Subcommand;
use serde_json::{json, Value};
use warbler_core::core_ledger::{CallContext, Identity, SharedLedger};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Post a tweet as the caller
    Tweet { content: String },

    /// Post a tweet on behalf of PRINCIPAL (caller must be its operator)
    TweetAs { principal: String, content: String },

    /// Send a direct message from the caller
    Send { to: String, content: String },

    /// Send a direct message on behalf of FROM (caller must be its operator)
    SendAs {
        from: String,
        to: String,
        content: String,
    },

    /// Follow another identity
    Follow { followed: String },

    /// Let OPERATOR act on the caller's behalf
    Allow { operator: String },

    /// Revoke OPERATOR's permission to act on the caller's behalf
    Disallow { operator: String },

    /// Latest tweets across all authors
    Latest {
        #[arg(default_value_t = 10)]
        count: usize,
    },

    /// Latest tweets by AUTHOR
    LatestOf {
        author: String,
        #[arg(default_value_t = 10)]
        count: usize,
    },

    /// Messages sent from FROM to TO
    Conversation {
        from: String,
        to: String,
        /// Only the newest COUNT messages, newest first
        #[arg(long)]
        count: Option<usize>,
    },

    /// Identities followed by OF
    Following { of: String },
}

impl Command {
    /// Whether the command appends to or changes the ledger
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Command::Latest { .. }
                | Command::LatestOf { .. }
                | Command::Conversation { .. }
                | Command::Following { .. }
        )
    }
}

/// Apply one command and return its JSON result
pub async fn execute(ledger: &SharedLedger, ctx: &CallContext, command: Command) -> Result<Value> {
    let value = match command {
        Command::Tweet { content } => {
            let id = ledger.tweet(ctx, content).await?;
            json!({ "tweet_id": id.0 })
        }
        Command::TweetAs { principal, content } => {
            let id = ledger.tweet_as(ctx, &Identity::new(principal), content).await?;
            json!({ "tweet_id": id.0 })
        }
        Command::Send { to, content } => {
            let id = ledger.send_message(ctx, &Identity::new(to), content).await?;
            json!({ "message_id": id.0 })
        }
        Command::SendAs { from, to, content } => {
            let id = ledger
                .send_message_as(ctx, &Identity::new(from), &Identity::new(to), content)
                .await?;
            json!({ "message_id": id.0 })
        }
        Command::Follow { followed } => {
            ledger.follow(ctx, &Identity::new(followed)).await?;
            json!({ "ok": true })
        }
        Command::Allow { operator } => {
            ledger.allow(ctx, &Identity::new(operator)).await?;
            json!({ "ok": true })
        }
        Command::Disallow { operator } => {
            ledger.disallow(ctx, &Identity::new(operator)).await?;
            json!({ "ok": true })
        }
        Command::Latest { count } => serde_json::to_value(ledger.latest_tweets(count).await?)?,
        Command::LatestOf { author, count } => serde_json::to_value(
            ledger
                .latest_tweets_of(&Identity::new(author), count)
                .await?,
        )?,
        Command::Conversation { from, to, count } => {
            let (from, to) = (Identity::new(from), Identity::new(to));
            let messages = match count {
                Some(count) => ledger.latest_messages(&from, &to, count).await?,
                None => ledger.conversation(&from, &to).await,
            };
            serde_json::to_value(messages)?
        }
        Command::Following { of } => {
            serde_json::to_value(ledger.following(&Identity::new(of)).await)?
        }
    };
    Ok(value)
}
