//! Read-only view of the handles a body may use.

use indexmap::IndexMap;
use rescope_core::ResourceName;
use std::fmt;
use std::ops::Index;

/// Name→handle mapping handed to the body of a scoped run
///
/// Iteration follows acquisition order. The view borrows from the group, so
/// handles cannot outlive the run that closes them.
pub struct Resources<'a, H> {
    handles: &'a IndexMap<ResourceName, H>,
}

impl<'a, H> Resources<'a, H> {
    pub(crate) fn new(handles: &'a IndexMap<ResourceName, H>) -> Self {
        Self { handles }
    }

    pub fn get(&self, name: &str) -> Option<&'a H> {
        self.handles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handles.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Resource names in acquisition order
    pub fn names(&self) -> impl Iterator<Item = &'a str> {
        self.handles.keys().map(ResourceName::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a H)> {
        self.handles.iter().map(|(name, handle)| (name.as_str(), handle))
    }
}

impl<H> Clone for Resources<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for Resources<'_, H> {}

impl<'a, H> Index<&str> for Resources<'a, H> {
    type Output = H;

    /// Panics when no resource with that name was acquired
    fn index(&self, name: &str) -> &H {
        match self.handles.get(name) {
            Some(handle) => handle,
            None => panic!("no resource named '{name}' in this scope"),
        }
    }
}

impl<H: fmt::Debug> fmt::Debug for Resources<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles() -> IndexMap<ResourceName, u32> {
        let mut map = IndexMap::new();
        map.insert(ResourceName::new("db").unwrap(), 1);
        map.insert(ResourceName::new("cache").unwrap(), 2);
        map
    }

    #[test]
    fn test_lookup_and_order() {
        let map = handles();
        let view = Resources::new(&map);
        assert_eq!(view.get("cache"), Some(&2));
        assert_eq!(view["db"], 1);
        assert!(view.get("logger").is_none());
        assert_eq!(view.names().collect::<Vec<_>>(), vec!["db", "cache"]);
        assert_eq!(view.len(), 2);
    }

    #[test]
    #[should_panic(expected = "no resource named 'logger'")]
    fn test_index_missing_panics() {
        let map = handles();
        let view = Resources::new(&map);
        let _ = view["logger"];
    }
}
