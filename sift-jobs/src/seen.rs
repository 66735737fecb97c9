use std::collections::HashSet;

/// Result entry links already processed in the current run.
///
/// Scoped to one campaign run and shared by every search in it, so a posting
/// listed under several searches is only visited once.
#[derive(Debug, Default)]
pub struct SeenSet {
    hrefs: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `href`; returns `false` if it was already seen.
    pub fn mark(&mut self, href: &str) -> bool {
        if self.hrefs.contains(href) {
            return false;
        }
        self.hrefs.insert(href.to_string())
    }

    pub fn contains(&self, href: &str) -> bool {
        self.hrefs.contains(href)
    }

    pub fn len(&self) -> usize {
        self.hrefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hrefs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_each_href_once() {
        let mut seen = SeenSet::new();
        let fresh: Vec<bool> = ["h1", "h2", "h1", "h3"]
            .iter()
            .map(|h| seen.mark(h))
            .collect();
        assert_eq!(fresh, vec![true, true, false, true]);
        assert_eq!(seen.len(), 3);
        assert!(seen.contains("h1"));
        assert!(!seen.contains("h4"));
    }
}
