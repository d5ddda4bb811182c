use super::IdentifierResolver;
use crate::record::{ItemId, SearchRecord};
use std::collections::{HashMap, HashSet};

/// Known items by id and by content path
///
/// Paths compare case-insensitively and ignore a trailing slash.
#[derive(Debug, Clone, Default)]
pub struct ItemTree {
    ids: HashSet<ItemId>,
    paths: HashMap<String, ItemId>,
}

impl ItemTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ItemId, path: &str) {
        self.ids.insert(id);
        self.paths.insert(normalize_path(path), id);
    }

    /// Collect every distinct item referenced by a set of records
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a SearchRecord>) -> Self {
        let mut tree = Self::new();
        for record in records {
            tree.insert(record.item_id, &record.path);
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl IdentifierResolver for ItemTree {
    fn try_resolve(&self, path_or_id: &str) -> Option<ItemId> {
        let input = path_or_id.trim();
        if input.is_empty() {
            return None;
        }

        if let Ok(id) = input.parse::<ItemId>() {
            return self.ids.contains(&id).then_some(id);
        }

        self.paths.get(&normalize_path(input)).copied()
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    let lowered = trimmed.to_lowercase();
    if lowered.starts_with('/') {
        lowered
    } else {
        format!("/{}", lowered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (ItemTree, ItemId) {
        let home: ItemId = "110d559f-dea5-42ea-9c1c-8a5df7e70ef9".parse().unwrap();
        let mut tree = ItemTree::new();
        tree.insert(home, "/sitecore/content/Home");
        (tree, home)
    }

    #[test]
    fn test_resolves_ids_in_any_form() {
        let (tree, home) = tree();
        assert_eq!(tree.try_resolve("{110D559F-DEA5-42EA-9C1C-8A5DF7E70EF9}"), Some(home));
        assert_eq!(tree.try_resolve("110D559FDEA542EA9C1C8A5DF7E70EF9"), Some(home));
    }

    #[test]
    fn test_resolves_paths_case_insensitively() {
        let (tree, home) = tree();
        assert_eq!(tree.try_resolve("/sitecore/content/home"), Some(home));
        assert_eq!(tree.try_resolve("/SITECORE/content/Home/"), Some(home));
    }

    #[test]
    fn test_unknown_items_do_not_resolve() {
        let (tree, _) = tree();
        assert_eq!(tree.try_resolve("/sitecore/content/missing"), None);
        assert_eq!(tree.try_resolve("{00000000-0000-0000-0000-000000000001}"), None);
        assert_eq!(tree.try_resolve("   "), None);
    }
}
