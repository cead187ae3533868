use std::collections::BTreeSet;

/// Set of style class names on a view element.
///
/// Adding a present class or removing an absent one reports `false` so callers
/// can assert a transition really happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleClasses(BTreeSet<&'static str>);

impl StyleClasses {
    #[must_use]
    pub fn with(class: &'static str) -> Self {
        let mut classes = Self::default();
        classes.add(class);
        classes
    }

    pub fn add(&mut self, class: &'static str) -> bool {
        self.0.insert(class)
    }

    pub fn remove(&mut self, class: &'static str) -> bool {
        self.0.remove(class)
    }

    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.0.contains(class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }
}
