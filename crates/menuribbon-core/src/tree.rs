//! Element tree arena.
//!
//! Every node of a menu lives in an [`ElementTree`] and is addressed by its
//! [`ElementId`]. An element carries two independent parent links:
//!
//! - the **visual** parent, reflecting on-screen composition
//! - the **logical** parent, reflecting data/command structure
//!
//! Hierarchy walks (see [`crate::hierarchy`]) combine both links, so the tree
//! rejects any edit that would let a mixed walk loop forever.
//!
//! # Examples
//!
//! ```
//! use menuribbon_core::{ElementKind, ElementTree};
//!
//! let mut tree = ElementTree::new();
//! let root = tree.create(ElementKind::PopupRoot);
//! let item = tree.create(ElementKind::PopupItem);
//! tree.set_visual_parent(item, Some(root)).expect("both ids exist");
//!
//! assert_eq!(tree.visual_parent(item), Some(root));
//! assert_eq!(tree.visual_children(root), &[item]);
//! ```

use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Unique identifier for an element in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl ElementId {
    /// Create a new element ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an element is, as far as the menu engine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ElementKind {
    /// Owns a popup coordinator and terminates hierarchy walks
    PopupRoot,
    /// Menu item: header or leaf
    PopupItem,
    /// Separator line between items
    Separator,
    /// Wrapper generated for plain data items
    GeneratedContainer,
    /// Any other visual (template parts, content, panels)
    #[default]
    Visual,
}

impl ElementKind {
    /// Check if this kind terminates hierarchy walks.
    #[must_use]
    pub const fn is_popup_root(self) -> bool {
        matches!(self, Self::PopupRoot)
    }

    /// Check if this kind is a popup item.
    #[must_use]
    pub const fn is_popup_item(self) -> bool {
        matches!(self, Self::PopupItem)
    }

    /// Check if an element of this kind can be placed in an item collection
    /// without being wrapped.
    #[must_use]
    pub const fn is_own_container(self) -> bool {
        matches!(
            self,
            Self::PopupItem | Self::Separator | Self::GeneratedContainer
        )
    }

    /// Check if an element of this kind can receive keyboard focus.
    #[must_use]
    pub const fn is_focusable(self) -> bool {
        matches!(self, Self::PopupItem)
    }
}

#[derive(Debug, Clone)]
struct ElementNode {
    kind: ElementKind,
    name: Option<String>,
    enabled: bool,
    visual_parent: Option<ElementId>,
    logical_parent: Option<ElementId>,
    visual_children: Vec<ElementId>,
    logical_children: Vec<ElementId>,
}

impl ElementNode {
    const fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            name: None,
            enabled: true,
            visual_parent: None,
            logical_parent: None,
            visual_children: Vec::new(),
            logical_children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Visual,
    Logical,
}

/// Arena holding every element of one or more menu trees.
#[derive(Debug, Default)]
pub struct ElementTree {
    nodes: HashMap<ElementId, ElementNode>,
    next_id: u64,
}

impl ElementTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element of the given kind.
    pub fn create(&mut self, kind: ElementKind) -> ElementId {
        let id = ElementId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, ElementNode::new(kind));
        tracing::trace!(element = %id, ?kind, "element created");
        id
    }

    /// Create a detached element with a name (used by selectors and diagnostics).
    pub fn create_named(&mut self, kind: ElementKind, name: impl Into<String>) -> ElementId {
        let id = self.create(kind);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = Some(name.into());
        }
        id
    }

    /// Check if an element is part of the tree.
    #[must_use]
    pub fn exists(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Kind of an element.
    #[must_use]
    pub fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.nodes.get(&id).map(|n| n.kind)
    }

    /// Name of an element, if one was given.
    #[must_use]
    pub fn name(&self, id: ElementId) -> Option<&str> {
        self.nodes.get(&id).and_then(|n| n.name.as_deref())
    }

    /// Find the first element with the given name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<ElementId> {
        let mut matches: Vec<ElementId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.name.as_deref() == Some(name))
            .map(|(id, _)| *id)
            .collect();
        matches.sort();
        matches.first().copied()
    }

    /// Visual parent of an element.
    #[must_use]
    pub fn visual_parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(&id).and_then(|n| n.visual_parent)
    }

    /// Logical parent of an element.
    #[must_use]
    pub fn logical_parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(&id).and_then(|n| n.logical_parent)
    }

    /// Visual children of an element, in attach order.
    #[must_use]
    pub fn visual_children(&self, id: ElementId) -> &[ElementId] {
        self.nodes.get(&id).map_or(&[], |n| n.visual_children.as_slice())
    }

    /// Logical children of an element, in attach order.
    #[must_use]
    pub fn logical_children(&self, id: ElementId) -> &[ElementId] {
        self.nodes.get(&id).map_or(&[], |n| n.logical_children.as_slice())
    }

    /// Check if an element is enabled. Unknown elements are reported disabled.
    #[must_use]
    pub fn is_enabled(&self, id: ElementId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.enabled)
    }

    /// Enable or disable an element.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownElement`] if `id` is not in the tree.
    pub fn set_enabled(&mut self, id: ElementId, enabled: bool) -> Result<(), TreeError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(TreeError::UnknownElement(id))?;
        node.enabled = enabled;
        Ok(())
    }

    /// Set (or clear) the visual parent of `child`. Returns the previous parent.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownElement`] if either id is unknown and
    /// [`TreeError::Cycle`] if `child` is already an ancestor of `parent`.
    pub fn set_visual_parent(
        &mut self,
        child: ElementId,
        parent: Option<ElementId>,
    ) -> Result<Option<ElementId>, TreeError> {
        self.relink(child, parent, Link::Visual)
    }

    /// Set (or clear) the logical parent of `child`. Returns the previous parent.
    ///
    /// # Errors
    ///
    /// Same as [`ElementTree::set_visual_parent`].
    pub fn set_logical_parent(
        &mut self,
        child: ElementId,
        parent: Option<ElementId>,
    ) -> Result<Option<ElementId>, TreeError> {
        self.relink(child, parent, Link::Logical)
    }

    /// Remove an element. Its children keep existing but lose their parent link.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownElement`] if `id` is not in the tree.
    pub fn remove(&mut self, id: ElementId) -> Result<ElementKind, TreeError> {
        self.relink(id, None, Link::Visual)?;
        self.relink(id, None, Link::Logical)?;
        let node = self.nodes.remove(&id).ok_or(TreeError::UnknownElement(id))?;
        for child in &node.visual_children {
            if let Some(c) = self.nodes.get_mut(child) {
                c.visual_parent = None;
            }
        }
        for child in &node.logical_children {
            if let Some(c) = self.nodes.get_mut(child) {
                c.logical_parent = None;
            }
        }
        tracing::trace!(element = %id, kind = ?node.kind, "element removed");
        Ok(node.kind)
    }

    fn relink(
        &mut self,
        child: ElementId,
        parent: Option<ElementId>,
        link: Link,
    ) -> Result<Option<ElementId>, TreeError> {
        if !self.exists(child) {
            return Err(TreeError::UnknownElement(child));
        }
        if let Some(p) = parent {
            if !self.exists(p) {
                return Err(TreeError::UnknownElement(p));
            }
            if self.reaches(p, child) {
                return Err(TreeError::Cycle { child, parent: p });
            }
        }

        let previous = match link {
            Link::Visual => self.visual_parent(child),
            Link::Logical => self.logical_parent(child),
        };
        if previous == parent {
            return Ok(previous);
        }

        if let Some(old) = previous.and_then(|p| self.nodes.get_mut(&p)) {
            let siblings = match link {
                Link::Visual => &mut old.visual_children,
                Link::Logical => &mut old.logical_children,
            };
            siblings.retain(|c| *c != child);
        }
        if let Some(new) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            match link {
                Link::Visual => new.visual_children.push(child),
                Link::Logical => new.logical_children.push(child),
            }
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            match link {
                Link::Visual => node.visual_parent = parent,
                Link::Logical => node.logical_parent = parent,
            }
        }
        Ok(previous)
    }

    /// Check whether `target` is reachable from `from` by following any mix of
    /// visual and logical parent links (including `from == target`).
    fn reaches(&self, from: ElementId, target: ElementId) -> bool {
        let mut pending = vec![from];
        let mut seen = HashSet::new();
        while let Some(id) = pending.pop() {
            if id == target {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&id) {
                pending.extend(node.visual_parent);
                pending.extend(node.logical_parent);
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_id_display() {
        assert_eq!(ElementId::new(3).to_string(), "#3");
    }

    #[test]
    fn test_element_kind_predicates() {
        assert!(ElementKind::PopupRoot.is_popup_root());
        assert!(!ElementKind::PopupItem.is_popup_root());
        assert!(ElementKind::PopupItem.is_popup_item());
        assert!(ElementKind::PopupItem.is_own_container());
        assert!(ElementKind::Separator.is_own_container());
        assert!(ElementKind::GeneratedContainer.is_own_container());
        assert!(!ElementKind::Visual.is_own_container());
        assert!(!ElementKind::PopupRoot.is_own_container());
        assert!(ElementKind::PopupItem.is_focusable());
        assert!(!ElementKind::GeneratedContainer.is_focusable());
    }

    #[test]
    fn test_create_assigns_distinct_ids() {
        let mut tree = ElementTree::new();
        let a = tree.create(ElementKind::PopupItem);
        let b = tree.create(ElementKind::PopupItem);
        assert_ne!(a, b);
        assert_eq!(tree.len(), 2);
        assert!(tree.is_enabled(a));
    }

    #[test]
    fn test_named_lookup() {
        let mut tree = ElementTree::new();
        let file = tree.create_named(ElementKind::PopupItem, "File");
        assert_eq!(tree.name(file), Some("File"));
        assert_eq!(tree.find_by_name("File"), Some(file));
        assert_eq!(tree.find_by_name("Edit"), None);
    }

    #[test]
    fn test_reparent_moves_child_between_lists() {
        let mut tree = ElementTree::new();
        let a = tree.create(ElementKind::Visual);
        let b = tree.create(ElementKind::Visual);
        let c = tree.create(ElementKind::PopupItem);

        assert_eq!(tree.set_visual_parent(c, Some(a)), Ok(None));
        assert_eq!(tree.set_visual_parent(c, Some(b)), Ok(Some(a)));
        assert!(tree.visual_children(a).is_empty());
        assert_eq!(tree.visual_children(b), &[c]);
        assert_eq!(tree.set_visual_parent(c, None), Ok(Some(b)));
        assert!(tree.visual_children(b).is_empty());
    }

    #[test]
    fn test_parents_are_independent() {
        let mut tree = ElementTree::new();
        let visual = tree.create(ElementKind::Visual);
        let logical = tree.create(ElementKind::PopupItem);
        let child = tree.create(ElementKind::PopupItem);
        tree.set_visual_parent(child, Some(visual)).unwrap();
        tree.set_logical_parent(child, Some(logical)).unwrap();
        assert_eq!(tree.visual_parent(child), Some(visual));
        assert_eq!(tree.logical_parent(child), Some(logical));
        assert_eq!(tree.logical_children(logical), &[child]);
    }

    #[test]
    fn test_unknown_element_rejected() {
        let mut tree = ElementTree::new();
        let a = tree.create(ElementKind::Visual);
        let ghost = ElementId::new(99);
        assert_eq!(
            tree.set_visual_parent(a, Some(ghost)),
            Err(TreeError::UnknownElement(ghost))
        );
        assert_eq!(
            tree.set_enabled(ghost, false),
            Err(TreeError::UnknownElement(ghost))
        );
        assert!(!tree.is_enabled(ghost));
    }

    #[test]
    fn test_self_parent_is_cycle() {
        let mut tree = ElementTree::new();
        let a = tree.create(ElementKind::Visual);
        assert_eq!(
            tree.set_visual_parent(a, Some(a)),
            Err(TreeError::Cycle { child: a, parent: a })
        );
    }

    #[test]
    fn test_mixed_link_cycle_rejected() {
        let mut tree = ElementTree::new();
        let a = tree.create(ElementKind::Visual);
        let b = tree.create(ElementKind::Visual);
        tree.set_logical_parent(a, Some(b)).unwrap();
        // b -> a visually would loop through a's logical link
        assert_eq!(
            tree.set_visual_parent(b, Some(a)),
            Err(TreeError::Cycle { child: b, parent: a })
        );
    }

    #[test]
    fn test_remove_orphans_children() {
        let mut tree = ElementTree::new();
        let parent = tree.create(ElementKind::PopupItem);
        let child = tree.create(ElementKind::PopupItem);
        let grand = tree.create(ElementKind::Visual);
        tree.set_visual_parent(child, Some(parent)).unwrap();
        tree.set_logical_parent(grand, Some(child)).unwrap();

        assert_eq!(tree.remove(child), Ok(ElementKind::PopupItem));
        assert!(!tree.exists(child));
        assert!(tree.visual_children(parent).is_empty());
        assert_eq!(tree.logical_parent(grand), None);
        assert_eq!(tree.remove(child), Err(TreeError::UnknownElement(child)));
    }

    #[test]
    fn test_disable_element() {
        let mut tree = ElementTree::new();
        let a = tree.create(ElementKind::PopupItem);
        tree.set_enabled(a, false).unwrap();
        assert!(!tree.is_enabled(a));
    }
}
