#![forbid(unsafe_code)]

use super::flatten::FlattenedItem;
use super::nesting::{NestingWindow, resolve_nesting};
use super::{PageTree, TreeDestinationPosition, TreeSourcePosition};

/// Tree position of the item at `index` in the flattened list: parent from
/// the path truncated by one level (the tree root at level 1), sibling index
/// from the last path component.
pub fn source_position(
    tree: &PageTree,
    flat: &[FlattenedItem],
    index: usize,
) -> Option<TreeSourcePosition> {
    let item = flat.get(index)?;
    let (last, parent_path) = item.path.split_last()?;
    let parent_id = tree.id_at_path(parent_path)?;
    Some(TreeSourcePosition {
        parent_id: parent_id.clone(),
        index: *last,
    })
}

/// Resolve the path for a drop at `dest_index`, picking the slot's vertical
/// neighbors so the dragged item's own removal is already accounted for:
/// moving down, the item currently at the destination ends up above the slot;
/// moving up, it ends up below it. `source_index` is `None` for cross-tree
/// drags, where the destination list does not contain the item at all.
pub fn destination_path(
    flat: &[FlattenedItem],
    source_index: Option<usize>,
    dest_index: usize,
    requested_level: usize,
) -> Vec<usize> {
    destination_window(flat, source_index, dest_index, requested_level).path
}

/// Same neighbor selection as [`destination_path`], returning the whole legal
/// window so a drag in progress can render its placeholder range.
pub fn destination_window(
    flat: &[FlattenedItem],
    source_index: Option<usize>,
    dest_index: usize,
    requested_level: usize,
) -> NestingWindow {
    let down = source_index.is_some_and(|source| dest_index > source);
    let in_place = source_index.is_some_and(|source| dest_index == source);

    let upper = if down {
        flat.get(dest_index)
    } else {
        dest_index.checked_sub(1).and_then(|i| flat.get(i))
    };
    let lower = if down || in_place {
        flat.get(dest_index + 1)
    } else {
        flat.get(dest_index)
    };
    let original = if in_place {
        source_index.and_then(|i| flat.get(i))
    } else {
        None
    };

    let mut window = resolve_nesting(
        upper.map(|item| item.path.as_slice()),
        lower.map(|item| item.path.as_slice()),
        original.map(|item| item.path.as_slice()),
        requested_level,
    );

    // Neighbor paths are in pre-removal coordinates, but the splice happens
    // after the dragged item has left its sibling list: a slot past the item
    // in its own parent list sits one position lower by then.
    let shift = match (
        source_index.and_then(|i| flat.get(i)),
        window.path.split_last(),
    ) {
        (Some(source), Some((last, parent))) => match source.path.split_last() {
            Some((source_last, source_parent)) => parent == source_parent && last > source_last,
            None => false,
        },
        _ => false,
    };
    if shift && let Some(last) = window.path.last_mut() {
        *last -= 1;
    }
    window
}

/// Convert a destination path into `(parent, index)`. The path may point one
/// slot past the end of the parent's child list (insert after the last
/// sibling); only the parent itself has to exist.
pub fn destination_position(
    tree: &PageTree,
    path: &[usize],
) -> Option<TreeDestinationPosition> {
    let (last, parent_path) = path.split_last()?;
    let parent_id = tree.id_at_path(parent_path)?;
    Some(TreeDestinationPosition {
        parent_id: parent_id.clone(),
        index: Some(*last),
    })
}
