/*
    messages.rs - Direct message logs

    One log per directed (sender, receiver) pair. A message is stored only
    under the pair it was sent on; (a, b) and (b, a) are separate logs.
    Message ids come from one counter shared by every pair.
*/

use super::errors::{LedgerError, LedgerResult};
use super::pagination;
use super::types::{Identity, MessageId, Sequence, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Identity,
    pub receiver: Identity,
    pub content: String,
    pub created_at: Timestamp,
}

type PairKey = (Identity, Identity);

#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    conversations: HashMap<PairKey, Vec<Message>>,
    sequence: Sequence,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored messages and the recorded counter value
    ///
    /// Messages are never deleted, so the ids must be exactly
    /// `1..=message_count`.
    pub fn from_messages(mut messages: Vec<Message>, message_count: u64) -> LedgerResult<Self> {
        if messages.len() as u64 != message_count {
            return Err(LedgerError::InvalidSnapshot(format!(
                "{} messages recorded but counter is {}",
                messages.len(),
                message_count
            )));
        }
        messages.sort_by_key(|m| m.id);

        let mut sequence = Sequence::new();
        let mut conversations: HashMap<PairKey, Vec<Message>> = HashMap::new();
        for message in messages {
            let expected = sequence.peek();
            if message.id.0 != expected {
                return Err(LedgerError::InvalidSnapshot(format!(
                    "message id {} found where {} was expected",
                    message.id, expected
                )));
            }
            sequence.next();
            conversations
                .entry((message.sender.clone(), message.receiver.clone()))
                .or_default()
                .push(message);
        }

        Ok(Self {
            conversations,
            sequence,
        })
    }

    /// Append a message to the `(from, to)` log only
    pub fn send(
        &mut self,
        from: Identity,
        to: Identity,
        content: String,
        at: Timestamp,
    ) -> MessageId {
        let id = MessageId(self.sequence.next());
        let message = Message {
            id,
            sender: from.clone(),
            receiver: to.clone(),
            content,
            created_at: at,
        };
        self.conversations.entry((from, to)).or_default().push(message);
        id
    }

    /// Exactly the `(a, b)` log, oldest first; not merged with `(b, a)`
    pub fn conversation(&self, a: &Identity, b: &Identity) -> &[Message] {
        self.conversations
            .get(&(a.clone(), b.clone()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Most recent messages of the `(a, b)` log, newest first
    pub fn latest(&self, a: &Identity, b: &Identity, count: usize) -> LedgerResult<Vec<Message>> {
        Ok(pagination::latest(self.conversation(a, b), count)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Value of the global message counter
    pub fn count(&self) -> u64 {
        self.sequence.current()
    }

    /// Every stored message, in id order
    pub fn messages(&self) -> Vec<Message> {
        let mut all: Vec<Message> = self.conversations.values().flatten().cloned().collect();
        all.sort_by_key(|m| m.id);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(messages: &[Message]) -> Vec<u64> {
        messages.iter().map(|m| m.id.0).collect()
    }

    #[test]
    fn test_counter_is_shared_across_pairs() {
        let mut store = MessageStore::new();
        let (a, b, c) = (Identity::new("a"), Identity::new("b"), Identity::new("c"));

        assert_eq!(store.send(a.clone(), b.clone(), "1".into(), Timestamp(1)), MessageId(1));
        assert_eq!(store.send(c.clone(), a.clone(), "2".into(), Timestamp(2)), MessageId(2));
        assert_eq!(store.send(a.clone(), b.clone(), "3".into(), Timestamp(3)), MessageId(3));
        assert_eq!(store.count(), 3);
        assert_eq!(ids(store.conversation(&a, &b)), vec![1, 3]);
        assert_eq!(ids(store.conversation(&c, &a)), vec![2]);
    }

    #[test]
    fn test_conversation_is_directional() {
        let mut store = MessageStore::new();
        let (a, b) = (Identity::new("a"), Identity::new("b"));
        store.send(a.clone(), b.clone(), "hello".into(), Timestamp(1));

        assert_eq!(store.conversation(&a, &b).len(), 1);
        assert!(store.conversation(&b, &a).is_empty());
    }

    #[test]
    fn test_latest_messages() {
        let mut store = MessageStore::new();
        let (a, b) = (Identity::new("a"), Identity::new("b"));
        for i in 0..4 {
            store.send(a.clone(), b.clone(), format!("m{}", i), Timestamp(i));
        }

        assert_eq!(ids(&store.latest(&a, &b, 2).unwrap()), vec![4, 3]);
        assert!(store.latest(&b, &a, 2).unwrap().is_empty());
        assert!(matches!(
            store.latest(&a, &b, 0),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_messages_restores_counter() {
        let mut original = MessageStore::new();
        let (a, b) = (Identity::new("a"), Identity::new("b"));
        original.send(a.clone(), b.clone(), "x".into(), Timestamp(1));
        original.send(b.clone(), a.clone(), "y".into(), Timestamp(2));

        let mut restored = MessageStore::from_messages(original.messages(), original.count()).unwrap();
        assert_eq!(restored.conversation(&b, &a), original.conversation(&b, &a));
        assert_eq!(restored.send(a, b, "z".into(), Timestamp(3)), MessageId(3));
    }

    #[test]
    fn test_from_messages_rejects_duplicate_id() {
        let mut original = MessageStore::new();
        original.send("a".into(), "b".into(), "x".into(), Timestamp(1));
        original.send("a".into(), "b".into(), "y".into(), Timestamp(2));

        let mut messages = original.messages();
        messages[1].id = MessageId(1);
        assert!(matches!(
            MessageStore::from_messages(messages, 2),
            Err(LedgerError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_from_messages_rejects_overflowing_id() {
        let mut original = MessageStore::new();
        original.send("a".into(), "b".into(), "x".into(), Timestamp(1));
        original.send("a".into(), "b".into(), "y".into(), Timestamp(2));

        assert!(matches!(
            MessageStore::from_messages(original.messages(), 1),
            Err(LedgerError::InvalidSnapshot(_))
        ));
    }
}
