//! Keyboard navigation over item collections.
//!
//! [`next_item`] finds the element after (or before) the current one, wrapping
//! or clamping at the ends, and skipping everything the predicate rejects.
//! [`next_enabled_item`] additionally skips disabled containers.
//!
//! # Examples
//!
//! ```
//! use menuribbon_core::navigation::next_item;
//!
//! let items = ["A", "B", "C"];
//! assert_eq!(next_item(&items[..], Some(&"B"), true, false, None), Some(&"C"));
//! // Non-cyclic scans saturate at the boundary
//! assert_eq!(next_item(&items[..], Some(&"C"), true, false, None), Some(&"C"));
//! assert_eq!(next_item(&items[..], Some(&"C"), true, true, None), Some(&"A"));
//! ```

/// Predicate used to filter navigation candidates.
pub type ItemFilter<'p, T> = &'p dyn Fn(&T) -> bool;

/// Something holding an ordered item collection with per-item containers.
pub trait ItemsHost {
    /// Item type (data item or container)
    type Item;

    /// Items in display order.
    fn items(&self) -> &[Self::Item];

    /// Index of the container for an item (or of a container itself).
    fn index_from_container(&self, item_or_container: &Self::Item) -> Option<usize>;

    /// Check if the item's container currently accepts interaction.
    fn is_enabled_container(&self, _item: &Self::Item) -> bool {
        true
    }
}

impl<T: PartialEq> ItemsHost for [T] {
    type Item = T;

    fn items(&self) -> &[T] {
        self
    }

    fn index_from_container(&self, item_or_container: &T) -> Option<usize> {
        self.iter().position(|x| x == item_or_container)
    }
}

impl<T: PartialEq> ItemsHost for Vec<T> {
    type Item = T;

    fn items(&self) -> &[T] {
        self
    }

    fn index_from_container(&self, item_or_container: &T) -> Option<usize> {
        self.iter().position(|x| x == item_or_container)
    }
}

/// Find the next item in `host` after `current`.
///
/// - An empty collection yields `None`.
/// - With no current item, or a single item, the first item is returned if it
///   passes `predicate`.
/// - Otherwise offsets `1..=len` are scanned in the requested direction. Out of
///   range candidates wrap when `cycle` is set and clamp to the nearest end
///   otherwise, so a non-cyclic scan keeps re-testing the boundary item.
///
/// A `current` item that cannot be found is treated as sitting just before the
/// first item.
#[allow(clippy::cast_possible_wrap)]
pub fn next_item<'a, H>(
    host: &'a H,
    current: Option<&H::Item>,
    forward: bool,
    cycle: bool,
    predicate: Option<ItemFilter<'_, H::Item>>,
) -> Option<&'a H::Item>
where
    H: ItemsHost + ?Sized,
{
    let items = host.items();
    let accepts = |item: &H::Item| predicate.map_or(true, |p| p(item));

    let first = items.first()?;
    let Some(current) = current.filter(|_| items.len() > 1) else {
        return accepts(first).then_some(first);
    };

    let count = items.len() as isize;
    let index = host
        .index_from_container(current)
        .map_or(-1, |i| i as isize);

    (1..=count)
        .map(|offset| if forward { index + offset } else { index - offset })
        .map(|candidate| {
            if (0..count).contains(&candidate) {
                candidate
            } else if cycle {
                candidate.rem_euclid(count)
            } else if candidate < 0 {
                0
            } else {
                count - 1
            }
        })
        .filter_map(|i| items.get(i as usize))
        .find(|item| accepts(*item))
}

/// [`next_item`] restricted to items whose container is enabled.
pub fn next_enabled_item<'a, H>(
    host: &'a H,
    current: Option<&H::Item>,
    forward: bool,
    cycle: bool,
    predicate: Option<ItemFilter<'_, H::Item>>,
) -> Option<&'a H::Item>
where
    H: ItemsHost + ?Sized,
{
    let enabled =
        |item: &H::Item| host.is_enabled_container(item) && predicate.map_or(true, |p| p(item));
    next_item(host, current, forward, cycle, Some(&enabled))
}
