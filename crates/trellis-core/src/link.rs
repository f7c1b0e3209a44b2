//! Named bounds shared between components of one layout.
//!
//! Every layout instance owns a [`LayoutToken`]. The registry keys its tables
//! by a weak handle to that token, so entries for dropped layouts are pruned
//! on the next access. Each layout has a committed table and a temporary
//! table; lookups prefer the temporary one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use indexmap::IndexMap;

use crate::types::NOT_SET;

/// One field of a linked bounds record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkField {
    X,
    Y,
    Width,
    Height,
    X2,
    Y2,
}

impl LinkField {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "x" => LinkField::X,
            "y" => LinkField::Y,
            "w" | "width" => LinkField::Width,
            "h" | "height" => LinkField::Height,
            "x2" => LinkField::X2,
            "y2" => LinkField::Y2,
            _ => return None,
        })
    }

    const fn index(self) -> usize {
        match self {
            LinkField::X => 0,
            LinkField::Y => 1,
            LinkField::Width => 2,
            LinkField::Height => 3,
            LinkField::X2 => 4,
            LinkField::Y2 => 5,
        }
    }
}

#[derive(Debug)]
struct TokenInner {
    id: u64,
}

/// Identity of one layout instance in the link registry.
///
/// Clones share identity. Once every clone is dropped, the layout's entries
/// become prunable.
#[derive(Debug, Clone)]
pub struct LayoutToken(Arc<TokenInner>);

impl LayoutToken {
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(Arc::new(TokenInner {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
        }))
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }
}

impl Default for LayoutToken {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for LayoutToken {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for LayoutToken {}

/// x, y, width, height, x2, y2.
type LinkRecord = [i32; 6];

#[derive(Debug)]
struct LayoutLinks {
    owner: Weak<TokenInner>,
    id: u64,
    committed: IndexMap<String, LinkRecord>,
    temporary: IndexMap<String, LinkRecord>,
}

impl LayoutLinks {
    fn table(&mut self, temporary: bool) -> &mut IndexMap<String, LinkRecord> {
        if temporary {
            &mut self.temporary
        } else {
            &mut self.committed
        }
    }
}

/// Registry of linked bounds for any number of layouts.
#[derive(Debug, Default)]
pub struct LinkRegistry {
    layouts: Vec<LayoutLinks>,
}

impl LinkRegistry {
    pub const fn new() -> Self {
        Self {
            layouts: Vec::new(),
        }
    }

    /// Drops entries whose layout token no longer exists. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.layouts.len();
        self.layouts.retain(|l| l.owner.strong_count() > 0);
        before - self.layouts.len()
    }

    /// Number of layouts with live entries.
    pub fn len(&self) -> usize {
        self.layouts.iter().filter(|l| l.owner.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.layouts.clear();
    }

    fn find(&mut self, token: &LayoutToken) -> Option<&mut LayoutLinks> {
        self.prune();
        self.layouts.iter_mut().find(|l| l.id == token.id())
    }

    fn find_or_insert(&mut self, token: &LayoutToken) -> &mut LayoutLinks {
        self.prune();
        let pos = match self.layouts.iter().position(|l| l.id == token.id()) {
            Some(pos) => pos,
            None => {
                self.layouts.push(LayoutLinks {
                    owner: Arc::downgrade(&token.0),
                    id: token.id(),
                    committed: IndexMap::new(),
                    temporary: IndexMap::new(),
                });
                self.layouts.len() - 1
            }
        };
        &mut self.layouts[pos]
    }

    /// Looks `key` up, preferring the temporary table.
    pub fn value(&mut self, token: &LayoutToken, key: &str, field: LinkField) -> Option<i32> {
        let links = self.find(token)?;
        let ix = field.index();
        if let Some(rect) = links.temporary.get(key) {
            if rect[ix] != NOT_SET {
                return Some(rect[ix]);
            }
        }
        links
            .committed
            .get(key)
            .map(|rect| rect[ix])
            .filter(|&v| v != NOT_SET)
    }

    /// Stores bounds for `key`. With `include_current` the stored record grows
    /// to the union of its old extent and the new one instead of being replaced.
    /// Returns whether anything changed.
    #[allow(clippy::too_many_arguments)]
    pub fn set_bounds(
        &mut self,
        token: &LayoutToken,
        key: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        temporary: bool,
        include_current: bool,
    ) -> bool {
        let table = self.find_or_insert(token).table(temporary);
        let Some(old) = table.get_mut(key) else {
            table.insert(key.to_owned(), [x, y, width, height, x + width, y + height]);
            return true;
        };

        if old[0] == x && old[1] == y && old[2] == width && old[3] == height {
            return false;
        }
        if !include_current {
            *old = [x, y, width, height, x + width, y + height];
            return true;
        }

        let mut changed = false;
        for (start, size, start_ix) in [(x, width, 0), (y, height, 1)] {
            if start == NOT_SET {
                continue;
            }
            let (size_ix, end_ix) = (start_ix + 2, start_ix + 4);
            if old[start_ix] == NOT_SET || start < old[start_ix] {
                old[start_ix] = start;
                old[size_ix] = old[end_ix] - start;
                changed = true;
            }
            if size != NOT_SET {
                let end = start + size;
                if old[end_ix] == NOT_SET || end > old[end_ix] {
                    old[end_ix] = end;
                    old[size_ix] = end - old[start_ix];
                    changed = true;
                }
            }
        }
        changed
    }

    /// Removes `key` from the committed table. Returns whether it was present.
    pub fn clear_bounds(&mut self, token: &LayoutToken, key: &str) -> bool {
        self.find(token)
            .map_or(false, |links| links.committed.shift_remove(key).is_some())
    }

    pub fn clear_temporary_bounds(&mut self, token: &LayoutToken) {
        if let Some(links) = self.find(token) {
            links.temporary.clear();
        }
    }
}

static REGISTRY: Mutex<LinkRegistry> = Mutex::new(LinkRegistry::new());

/// Process-wide access to the shared [`LinkRegistry`].
pub struct LinkHandler;

impl LinkHandler {
    fn with<R>(f: impl FnOnce(&mut LinkRegistry) -> R) -> R {
        let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut registry)
    }

    pub fn value(token: &LayoutToken, key: &str, field: LinkField) -> Option<i32> {
        Self::with(|r| r.value(token, key, field))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_bounds(
        token: &LayoutToken,
        key: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        temporary: bool,
        include_current: bool,
    ) -> bool {
        Self::with(|r| r.set_bounds(token, key, x, y, width, height, temporary, include_current))
    }

    pub fn clear_bounds(token: &LayoutToken, key: &str) -> bool {
        Self::with(|r| r.clear_bounds(token, key))
    }

    pub fn clear_temporary_bounds(token: &LayoutToken) {
        Self::with(|r| r.clear_temporary_bounds(token))
    }

    pub fn prune() -> usize {
        Self::with(LinkRegistry::prune)
    }

    /// Forgets every layout's links.
    pub fn clear_all() {
        Self::with(LinkRegistry::clear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_committed_and_temporary() {
        let mut reg = LinkRegistry::new();
        let token = LayoutToken::new();

        assert!(reg.set_bounds(&token, "a", 10, 20, 30, 40, false, false));
        assert_eq!(reg.value(&token, "a", LinkField::X2), Some(40));
        assert_eq!(reg.value(&token, "a", LinkField::Y2), Some(60));

        assert!(reg.set_bounds(&token, "a", 0, 0, 5, 5, true, false));
        assert_eq!(reg.value(&token, "a", LinkField::Width), Some(5));

        reg.clear_temporary_bounds(&token);
        assert_eq!(reg.value(&token, "a", LinkField::Width), Some(30));
        assert_eq!(reg.value(&token, "missing", LinkField::X), None);
    }

    #[test]
    fn test_unchanged_bounds_report_false() {
        let mut reg = LinkRegistry::new();
        let token = LayoutToken::new();
        assert!(reg.set_bounds(&token, "a", 1, 2, 3, 4, false, false));
        assert!(!reg.set_bounds(&token, "a", 1, 2, 3, 4, false, false));
        assert!(reg.set_bounds(&token, "a", 1, 2, 3, 5, false, false));
    }

    #[test]
    fn test_union_bounds() {
        let mut reg = LinkRegistry::new();
        let token = LayoutToken::new();
        reg.set_bounds(&token, "grp", 10, 10, 20, 20, false, true);
        assert!(reg.set_bounds(&token, "grp", 40, 0, 10, 10, false, true));

        assert_eq!(reg.value(&token, "grp", LinkField::X), Some(10));
        assert_eq!(reg.value(&token, "grp", LinkField::Y), Some(0));
        assert_eq!(reg.value(&token, "grp", LinkField::X2), Some(50));
        assert_eq!(reg.value(&token, "grp", LinkField::Width), Some(40));
        assert_eq!(reg.value(&token, "grp", LinkField::Height), Some(30));
    }

    #[test]
    fn test_clear_bounds_only_committed() {
        let mut reg = LinkRegistry::new();
        let token = LayoutToken::new();
        reg.set_bounds(&token, "a", 1, 1, 1, 1, true, false);
        assert!(!reg.clear_bounds(&token, "a"));
        assert_eq!(reg.value(&token, "a", LinkField::X), Some(1));

        reg.set_bounds(&token, "b", 1, 1, 1, 1, false, false);
        assert!(reg.clear_bounds(&token, "b"));
        assert_eq!(reg.value(&token, "b", LinkField::X), None);
    }

    #[test]
    fn test_layouts_are_isolated_and_pruned() {
        let mut reg = LinkRegistry::new();
        let first = LayoutToken::new();
        let second = LayoutToken::new();
        reg.set_bounds(&first, "a", 1, 1, 1, 1, false, false);
        reg.set_bounds(&second, "a", 2, 2, 2, 2, false, false);
        assert_eq!(reg.value(&first, "a", LinkField::X), Some(1));
        assert_eq!(reg.value(&second, "a", LinkField::X), Some(2));
        assert_eq!(reg.len(), 2);

        drop(first);
        assert_eq!(reg.prune(), 1);
        assert_eq!(reg.len(), 1);

        reg.clear();
        assert!(reg.is_empty());
    }

    #[test]
    fn test_token_identity() {
        let token = LayoutToken::new();
        let clone = token.clone();
        assert_eq!(token, clone);
        assert_ne!(token, LayoutToken::new());
    }

    #[test]
    fn test_link_field_names() {
        assert_eq!(LinkField::parse("w"), Some(LinkField::Width));
        assert_eq!(LinkField::parse("height"), Some(LinkField::Height));
        assert_eq!(LinkField::parse("x2"), Some(LinkField::X2));
        assert_eq!(LinkField::parse("z"), None);
    }
}
