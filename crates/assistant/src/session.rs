//! Conversation sessions.

use intexta_llm::ChatMessage;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Default number of messages kept per session.
pub const DEFAULT_HISTORY_TURNS: usize = 12;

/// Bounded conversation history of one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    history: VecDeque<ChatMessage>,
    capacity: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_TURNS)
    }
}

impl Session {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, dropping the oldest one when full.
    pub fn push(&mut self, message: ChatMessage) {
        if self.capacity == 0 {
            return;
        }
        while self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(message);
    }

    /// Messages, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ChatMessage> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Storage for sessions keyed by user.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Session>;
    fn put(&self, key: &str, session: Session);
    fn evict(&self, key: &str);
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<Session> {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, session: Session) {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), session);
    }

    fn evict(&self, key: &str) {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }
}
