//! List reordering primitives.

use crate::drag::Edge;

/// Moves the element at `start_index` so that it ends up at `finish_index`.
///
/// Indices past the end are clamped, so `finish_index == len` appends.
pub fn reorder<T>(list: &mut Vec<T>, start_index: usize, finish_index: usize) {
    if start_index >= list.len() {
        return;
    }
    let item = list.remove(start_index);
    let finish_index = finish_index.min(list.len());
    list.insert(finish_index, item);
}

/// Final index of an item dragged from `start_index` onto the `edge` of the
/// item at `target_index` in the same list.
///
/// Removing the dragged item shifts every later index down by one, so a
/// forward move lands one slot earlier than the raw target position.
pub fn reorder_destination_index(
    start_index: usize,
    target_index: usize,
    edge: Option<Edge>,
) -> usize {
    if start_index == target_index {
        return start_index;
    }
    let Some(edge) = edge else {
        return target_index;
    };

    let going_after = edge == Edge::Bottom;
    let moving_forward = start_index < target_index;
    match (moving_forward, going_after) {
        (true, true) => target_index,
        (true, false) => target_index - 1,
        (false, true) => target_index + 1,
        (false, false) => target_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_backward_and_forward() {
        let mut list = vec!['a', 'b', 'c', 'd'];
        reorder(&mut list, 3, 1);
        assert_eq!(list, ['a', 'd', 'b', 'c']);
        reorder(&mut list, 0, 3);
        assert_eq!(list, ['d', 'b', 'c', 'a']);
    }

    #[test]
    fn test_reorder_clamps_finish() {
        let mut list = vec![1, 2, 3];
        reorder(&mut list, 0, 3);
        assert_eq!(list, [2, 3, 1]);
        reorder(&mut list, 7, 0);
        assert_eq!(list, [2, 3, 1]);
    }

    #[test]
    fn test_destination_index_by_direction_and_edge() {
        // Moving forward: 0 onto 2
        assert_eq!(reorder_destination_index(0, 2, Some(Edge::Bottom)), 2);
        assert_eq!(reorder_destination_index(0, 2, Some(Edge::Top)), 1);
        // Moving backward: 3 onto 1
        assert_eq!(reorder_destination_index(3, 1, Some(Edge::Bottom)), 2);
        assert_eq!(reorder_destination_index(3, 1, Some(Edge::Top)), 1);
        // Onto itself, or with no edge
        assert_eq!(reorder_destination_index(2, 2, Some(Edge::Top)), 2);
        assert_eq!(reorder_destination_index(0, 2, None), 2);
    }

    #[test]
    fn test_every_drop_is_a_permutation() {
        let original: Vec<u32> = (0..5).collect();
        for start in 0..original.len() {
            for target in 0..original.len() {
                for edge in [Edge::Top, Edge::Bottom] {
                    let mut list = original.clone();
                    let finish = reorder_destination_index(start, target, Some(edge));
                    reorder(&mut list, start, finish);
                    let mut sorted = list.clone();
                    sorted.sort_unstable();
                    assert_eq!(sorted, original, "start {start} target {target} {edge:?}");
                }
            }
        }
    }

    #[test]
    fn test_drop_lands_beside_target() {
        // Dropping above/below the target always leaves the dragged item
        // directly before/after it.
        let original: Vec<u32> = (0..5).collect();
        for start in 0..original.len() {
            for target in (0..original.len()).filter(|&t| t != start) {
                let target_value = original[target];
                for edge in [Edge::Top, Edge::Bottom] {
                    let mut list = original.clone();
                    let finish = reorder_destination_index(start, target, Some(edge));
                    reorder(&mut list, start, finish);
                    let moved = list.iter().position(|&v| v == original[start]).unwrap();
                    let anchor = list.iter().position(|&v| v == target_value).unwrap();
                    match edge {
                        Edge::Top => assert_eq!(moved + 1, anchor),
                        Edge::Bottom => assert_eq!(moved, anchor + 1),
                    }
                }
            }
        }
    }
}
