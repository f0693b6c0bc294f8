//! Content Queue - child content in call order

use arbor_sink::Content;

/// Ordered child content of the pending node
#[derive(Debug, Clone, Default)]
pub struct ContentQueue {
    items: Vec<Content>,
}

impl ContentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, content: Content) {
        self.items.push(content);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Content> {
        self.items.iter()
    }
}

impl IntoIterator for ContentQueue {
    type Item = Content;
    type IntoIter = std::vec::IntoIter<Content>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
