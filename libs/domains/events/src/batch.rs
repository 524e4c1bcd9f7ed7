/// Size-bounded set of serialized messages submitted in one round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBatch {
    messages: Vec<String>,
    size_bytes: usize,
    max_bytes: usize,
}

impl EventBatch {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            messages: Vec::new(),
            size_bytes: 0,
            max_bytes,
        }
    }

    /// Adds `message` if it fits in the remaining capacity.
    pub fn try_add(&mut self, message: &str) -> bool {
        let size = message.len();
        if self.size_bytes + size > self.max_bytes {
            return false;
        }

        self.messages.push(message.to_string());
        self.size_bytes += size;
        true
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}
