//! Hierarchy walks over the element tree.
//!
//! Parent lookup is a pluggable [`ParentOf`] strategy. The two backing
//! implementations, [`VisualParent`] and [`LogicalParent`], are combined with
//! [`Fallback`] so that a walk continues through the other tree whenever the
//! preferred one has no parent.
//!
//! [`locate`] is the popup hierarchy locator: it finds the nearest enclosing
//! popup root and the outermost popup item above a node.

use crate::tree::{ElementId, ElementKind, ElementTree};

/// Strategy answering "what is the parent of this element".
pub trait ParentOf {
    /// Parent of `id`, or `None` when the walk should stop.
    fn parent_of(&self, tree: &ElementTree, id: ElementId) -> Option<ElementId>;
}

/// Parent in the rendering tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisualParent;

impl ParentOf for VisualParent {
    fn parent_of(&self, tree: &ElementTree, id: ElementId) -> Option<ElementId> {
        tree.visual_parent(id)
    }
}

/// Parent in the logical (data) tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalParent;

impl ParentOf for LogicalParent {
    fn parent_of(&self, tree: &ElementTree, id: ElementId) -> Option<ElementId> {
        tree.logical_parent(id)
    }
}

/// Try `A` first, then `B`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fallback<A, B>(pub A, pub B);

impl<A: ParentOf, B: ParentOf> ParentOf for Fallback<A, B> {
    fn parent_of(&self, tree: &ElementTree, id: ElementId) -> Option<ElementId> {
        self.0
            .parent_of(tree, id)
            .or_else(|| self.1.parent_of(tree, id))
    }
}

/// Rendering tree first, logical tree as fallback.
pub const VISUAL_FIRST: Fallback<VisualParent, LogicalParent> = Fallback(VisualParent, LogicalParent);

/// Logical tree first, rendering tree as fallback.
pub const LOGICAL_FIRST: Fallback<LogicalParent, VisualParent> = Fallback(LogicalParent, VisualParent);

/// Iterator over an element and its ancestors.
#[derive(Debug, Clone)]
pub struct Ancestors<'a, P> {
    tree: &'a ElementTree,
    strategy: P,
    next: Option<ElementId>,
}

impl<P: ParentOf> Iterator for Ancestors<'_, P> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.strategy.parent_of(self.tree, current);
        Some(current)
    }
}

/// Walk from `id` (inclusive) upward using `strategy`.
pub fn hierarchy<P: ParentOf>(tree: &ElementTree, id: ElementId, strategy: P) -> Ancestors<'_, P> {
    Ancestors {
        tree,
        strategy,
        next: tree.exists(id).then_some(id),
    }
}

/// Walk the rendering tree, falling back to the logical tree.
pub fn visual_hierarchy(
    tree: &ElementTree,
    id: ElementId,
) -> Ancestors<'_, Fallback<VisualParent, LogicalParent>> {
    hierarchy(tree, id, VISUAL_FIRST)
}

/// Walk the logical tree, falling back to the rendering tree.
pub fn logical_hierarchy(
    tree: &ElementTree,
    id: ElementId,
) -> Ancestors<'_, Fallback<LogicalParent, VisualParent>> {
    hierarchy(tree, id, LOGICAL_FIRST)
}

/// Result of a hierarchy lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Nearest enclosing popup root
    pub root: Option<ElementId>,
    /// Outermost popup item ancestor, or the node itself
    pub top: ElementId,
    /// `top == node`
    pub is_top_level: bool,
}

/// Locate the root and top-level item of `node` using [`VISUAL_FIRST`].
#[must_use]
pub fn locate(tree: &ElementTree, node: ElementId) -> Location {
    locate_with(tree, node, VISUAL_FIRST)
}

/// Locate the root and top-level item of `node` with a custom parent strategy.
///
/// The walk stops at the first popup root or when no parent remains. The last
/// popup item passed on the way up becomes `top`.
pub fn locate_with<P: ParentOf>(tree: &ElementTree, node: ElementId, strategy: P) -> Location {
    let mut top = node;
    let mut root = None;

    for ancestor in hierarchy(tree, node, strategy) {
        match tree.kind(ancestor) {
            Some(ElementKind::PopupRoot) => {
                root = Some(ancestor);
                break;
            }
            Some(ElementKind::PopupItem) if ancestor != node => top = ancestor,
            _ => {}
        }
    }

    Location {
        root,
        top,
        is_top_level: top == node,
    }
}

/// First popup item strictly above `id` in the rendering hierarchy.
///
/// Popup roots have no parent item.
#[must_use]
pub fn parent_item(tree: &ElementTree, id: ElementId) -> Option<ElementId> {
    if tree.kind(id).is_some_and(ElementKind::is_popup_root) {
        return None;
    }
    visual_hierarchy(tree, id)
        .skip(1)
        .find(|a| tree.kind(*a).is_some_and(ElementKind::is_popup_item))
}

/// Nearest popup root in the logical hierarchy of `id` (inclusive).
#[must_use]
pub fn logical_root(tree: &ElementTree, id: ElementId) -> Option<ElementId> {
    logical_hierarchy(tree, id).find(|a| tree.kind(*a).is_some_and(ElementKind::is_popup_root))
}

/// Check whether `target` lies within `ancestor`'s rendering or logical subtree.
#[must_use]
pub fn contains(tree: &ElementTree, ancestor: ElementId, target: ElementId) -> bool {
    logical_hierarchy(tree, target).any(|a| a == ancestor)
        || visual_hierarchy(tree, target).any(|a| a == ancestor)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Menu {
        tree: ElementTree,
        root: ElementId,
        file: ElementId,
        panel: ElementId,
        open: ElementId,
        recent: ElementId,
    }

    // root > file > panel > open ; recent is logically under open only
    fn menu() -> Menu {
        let mut tree = ElementTree::new();
        let root = tree.create(ElementKind::PopupRoot);
        let file = tree.create(ElementKind::PopupItem);
        let panel = tree.create(ElementKind::Visual);
        let open = tree.create(ElementKind::PopupItem);
        let recent = tree.create(ElementKind::PopupItem);
        tree.set_visual_parent(file, Some(root)).unwrap();
        tree.set_visual_parent(panel, Some(file)).unwrap();
        tree.set_visual_parent(open, Some(panel)).unwrap();
        tree.set_logical_parent(recent, Some(open)).unwrap();
        Menu {
            tree,
            root,
            file,
            panel,
            open,
            recent,
        }
    }

    #[test]
    fn test_fallback_prefers_first_strategy() {
        let mut m = menu();
        let other = m.tree.create(ElementKind::Visual);
        m.tree.set_logical_parent(m.open, Some(other)).unwrap();

        assert_eq!(VISUAL_FIRST.parent_of(&m.tree, m.open), Some(m.panel));
        assert_eq!(LOGICAL_FIRST.parent_of(&m.tree, m.open), Some(other));
        assert_eq!(VISUAL_FIRST.parent_of(&m.tree, m.recent), Some(m.open));
    }

    #[test]
    fn test_visual_hierarchy_includes_self() {
        let m = menu();
        let chain: Vec<_> = visual_hierarchy(&m.tree, m.open).collect();
        assert_eq!(chain, vec![m.open, m.panel, m.file, m.root]);
    }

    #[test]
    fn test_hierarchy_of_unknown_is_empty() {
        let m = menu();
        assert_eq!(visual_hierarchy(&m.tree, ElementId::new(500)).count(), 0);
    }

    #[test]
    fn test_locate_top_level_item() {
        let m = menu();
        let loc = locate(&m.tree, m.file);
        assert_eq!(loc.root, Some(m.root));
        assert_eq!(loc.top, m.file);
        assert!(loc.is_top_level);
    }

    #[test]
    fn test_locate_nested_item() {
        let m = menu();
        let loc = locate(&m.tree, m.open);
        assert_eq!(loc.root, Some(m.root));
        assert_eq!(loc.top, m.file);
        assert!(!loc.is_top_level);
    }

    #[test]
    fn test_locate_through_logical_fallback() {
        let m = menu();
        let loc = locate(&m.tree, m.recent);
        assert_eq!(loc.root, Some(m.root));
        assert_eq!(loc.top, m.file);
    }

    #[test]
    fn test_locate_without_root() {
        let mut tree = ElementTree::new();
        let outer = tree.create(ElementKind::PopupItem);
        let inner = tree.create(ElementKind::PopupItem);
        tree.set_visual_parent(inner, Some(outer)).unwrap();

        let loc = locate(&tree, inner);
        assert_eq!(loc.root, None);
        assert_eq!(loc.top, outer);

        let loc = locate(&tree, outer);
        assert_eq!(loc.root, None);
        assert!(loc.is_top_level);
    }

    #[test]
    fn test_locate_stops_at_nearest_root() {
        let mut m = menu();
        let inner_root = m.tree.create(ElementKind::PopupRoot);
        let item = m.tree.create(ElementKind::PopupItem);
        m.tree.set_visual_parent(inner_root, Some(m.open)).unwrap();
        m.tree.set_visual_parent(item, Some(inner_root)).unwrap();

        let loc = locate(&m.tree, item);
        assert_eq!(loc.root, Some(inner_root));
        assert!(loc.is_top_level);
    }

    #[test]
    fn test_parent_item_skips_visuals() {
        let m = menu();
        assert_eq!(parent_item(&m.tree, m.open), Some(m.file));
        assert_eq!(parent_item(&m.tree, m.file), None);
        assert_eq!(parent_item(&m.tree, m.root), None);
    }

    #[test]
    fn test_logical_root() {
        let m = menu();
        assert_eq!(logical_root(&m.tree, m.recent), Some(m.root));
    }

    #[test]
    fn test_contains() {
        let m = menu();
        assert!(contains(&m.tree, m.file, m.open));
        assert!(contains(&m.tree, m.file, m.recent));
        assert!(contains(&m.tree, m.open, m.open));
        assert!(!contains(&m.tree, m.open, m.file));
    }
}
