use std::collections::HashSet;

/// Remembers which (layer, reason) pairs were already reported.
#[derive(Debug, Default)]
pub struct WarnOnce {
    seen: HashSet<(String, String)>,
}

impl WarnOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time a pair is seen.
    pub fn first(&mut self, layer: &str, reason: &str) -> bool {
        self.seen.insert((layer.to_string(), reason.to_string()))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
