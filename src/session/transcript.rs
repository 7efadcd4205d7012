use chrono::{DateTime, Utc};

use crate::models::{AnswerResponse, Message, Role};

/// Shown in place of an answer when the question could not be answered.
pub const APOLOGY: &str =
    "Sorry, I encountered an error processing your question. Please try again.";

/// Append-only chat history for the current session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
    last_id: i64,
}

impl Transcript {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn push_user(&mut self, question: &str, at: DateTime<Utc>) -> &Message {
        let message = Message {
            id: self.next_id(at),
            role: Role::User,
            content: question.to_string(),
            citations: None,
            mode: None,
            timestamp: at,
        };
        self.push(message)
    }

    pub fn push_answer(&mut self, answer: AnswerResponse, at: DateTime<Utc>) -> &Message {
        let message = Message {
            id: self.next_id(at),
            role: Role::Assistant,
            content: answer.answer,
            citations: Some(answer.citations),
            mode: Some(answer.mode),
            timestamp: at,
        };
        self.push(message)
    }

    pub fn push_apology(&mut self, at: DateTime<Utc>) -> &Message {
        let message = Message {
            id: self.next_id(at),
            role: Role::Assistant,
            content: APOLOGY.to_string(),
            citations: None,
            mode: None,
            timestamp: at,
        };
        self.push(message)
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Millisecond timestamp, bumped past the previous id so ids never repeat.
    fn next_id(&mut self, at: DateTime<Utc>) -> String {
        let id = at.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        id.to_string()
    }
}
