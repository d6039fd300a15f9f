#![forbid(unsafe_code)]

/// Legal nesting range for a drop slot plus the path chosen inside it.
/// Levels are 1-based (`path.len()`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NestingWindow {
    pub min_level: usize,
    pub max_level: usize,
    pub path: Vec<usize>,
}

/// Resolve the legal nesting window for a drop slot from its vertical
/// neighbors and pick the position for `requested_level` (clamped into the
/// window).
///
/// `upper` / `lower` are the paths of the items directly above and below the
/// slot, with the dragged item itself already accounted for by the caller.
/// `original` is the dragged item's own path, supplied only when the item has
/// not moved vertically, so the item's current level stays selectable even
/// when its neighbors are shallower.
///
/// The same function drives both the drag-time placeholder and the final
/// position at release; the two must never disagree.
pub fn resolve_nesting(
    upper: Option<&[usize]>,
    lower: Option<&[usize]>,
    original: Option<&[usize]>,
    requested_level: usize,
) -> NestingWindow {
    let Some(upper) = upper else {
        // Very top of the list: the only slot is first top-level item.
        return NestingWindow {
            min_level: 1,
            max_level: 1,
            path: vec![0],
        };
    };

    let original_level = original.map_or(0, <[usize]>::len);

    match lower {
        None => {
            // Very bottom: anything from top level down to the upper
            // neighbor's level (or the item's own level when it stays put).
            let max_level = upper.len().max(original_level);
            let level = requested_level.clamp(1, max_level);
            NestingWindow {
                min_level: 1,
                max_level,
                path: next_sibling_at_level(upper, level),
            }
        }
        Some(lower) => {
            // Between two items the window spans from the lower neighbor's
            // level up to the upper neighbor's. When the lower neighbor is at
            // or below the upper's level the window collapses and the item
            // takes the lower neighbor's slot outright.
            let min_level = lower.len();
            let max_level = upper.len().max(original_level).max(min_level);
            let level = requested_level.clamp(min_level, max_level);
            let path = if level == lower.len() {
                lower.to_vec()
            } else {
                next_sibling_at_level(upper, level)
            };
            NestingWindow {
                min_level,
                max_level,
                path,
            }
        }
    }
}

/// Truncate `upper` to `level` entries and step past it (next sibling at that
/// level). A level one deeper than `upper` means "first child of upper".
fn next_sibling_at_level(upper: &[usize], level: usize) -> Vec<usize> {
    if level > upper.len() {
        let mut path = upper.to_vec();
        path.push(0);
        return path;
    }
    let mut path = upper[..level].to_vec();
    if let Some(last) = path.last_mut() {
        *last += 1;
    }
    path
}
