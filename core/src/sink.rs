//! Error sink handed to custom rules and cross-field hooks.

/// Ordered, append-only collection of failure messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSink {
    messages: Vec<String>,
}

impl ErrorSink {
    /// Create a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Check if there are any messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Get the number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Get all messages in the order they were added.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Append every message from another sink.
    pub fn extend(&mut self, other: ErrorSink) {
        self.messages.extend(other.messages);
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl From<Vec<String>> for ErrorSink {
    fn from(messages: Vec<String>) -> Self {
        Self { messages }
    }
}

impl IntoIterator for ErrorSink {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorSink {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
