use std::cmp::Ordering;

use crate::{
    tree::TreeReadOperationsHelpers, Color, DataIndex, GetTreeReadOnlyData, InvariantViolation,
    TreeReadOperations, ValueOf, NIL,
};

/// One node of a structural dump, as consumed by external visualizers.
#[derive(Debug, PartialEq, Eq)]
pub struct NodeDump<'a, V> {
    pub index: DataIndex,
    pub value: &'a V,
    pub color: Color,
    pub left: Option<&'a V>,
    pub right: Option<&'a V>,
}

/// Sorted iterator starting from the min. Walks with an explicit stack, so no
/// parent links are needed.
pub struct Iter<'a, T: GetTreeReadOnlyData> {
    tree: &'a T,
    stack: Vec<DataIndex>,
    cursor: DataIndex,
}

impl<'a, T: GetTreeReadOnlyData> Iterator for Iter<'a, T> {
    type Item = &'a ValueOf<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let tree: &'a T = self.tree;
        while self.cursor != NIL {
            self.stack.push(self.cursor);
            self.cursor = tree.get_left_index(self.cursor);
        }
        let index: DataIndex = self.stack.pop()?;
        self.cursor = tree.get_right_index(index);
        Some(tree.get_value(index))
    }
}

impl<T> TreeReadOperations for T
where
    T: GetTreeReadOnlyData,
{
    fn contains(&self, value: &ValueOf<T>) -> bool {
        self.lookup_index(value) != NIL
    }

    fn len(&self) -> usize {
        self.nodes().len()
    }

    fn min(&self) -> Option<&ValueOf<T>> {
        if self.root_index() == NIL {
            return None;
        }
        Some(self.get_value(self.get_min_index(self.root_index())))
    }

    fn max(&self) -> Option<&ValueOf<T>> {
        if self.root_index() == NIL {
            return None;
        }
        Some(self.get_value(self.get_max_index(self.root_index())))
    }

    fn iter(&self) -> Iter<'_, T> {
        Iter {
            tree: self,
            stack: Vec::new(),
            cursor: self.root_index(),
        }
    }

    /// Pre-order dump of every node.
    fn dump(&self) -> Vec<NodeDump<'_, ValueOf<T>>> {
        dump_subtree(self, self.root_index())
    }

    /// Number of nodes on the longest root-to-leaf path. Zero when empty.
    fn max_depth(&self) -> usize {
        let mut max_depth: usize = 0;
        let mut stack: Vec<(DataIndex, usize)> = Vec::new();
        if self.root_index() != NIL {
            stack.push((self.root_index(), 1));
        }
        while let Some((index, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child_index in [self.get_right_index(index), self.get_left_index(index)] {
                if child_index != NIL {
                    stack.push((child_index, depth + 1));
                }
            }
        }
        max_depth
    }

    fn verify(&self) -> Result<(), InvariantViolation> {
        let root_index: DataIndex = self.root_index();
        if root_index == NIL {
            return Ok(());
        }
        if self.is_red(root_index) {
            return Err(InvariantViolation::RedRoot(root_index));
        }

        // Each entry carries the black nodes counted so far on its path and
        // the exclusive bounds its item must fall between.
        let mut expected_black_height: Option<usize> = None;
        let mut stack: Vec<(DataIndex, usize, Option<&ValueOf<T>>, Option<&ValueOf<T>>)> =
            vec![(root_index, 0, None, None)];

        while let Some((index, blacks_above, lower, upper)) = stack.pop() {
            let value: &ValueOf<T> = self.get_value(index);
            let in_order: bool = lower.map_or(true, |lower| lower.cmp(value) == Ordering::Less)
                && upper.map_or(true, |upper| value.cmp(upper) == Ordering::Less);
            if !in_order {
                return Err(InvariantViolation::OutOfOrder(index));
            }

            let left_index: DataIndex = self.get_left_index(index);
            let right_index: DataIndex = self.get_right_index(index);
            if self.is_red(index) && (self.is_red(left_index) || self.is_red(right_index)) {
                return Err(InvariantViolation::ConsecutiveRed(index));
            }
            if T::LEFT_LEANING && self.is_red(right_index) {
                return Err(InvariantViolation::RightLeaningRed(index));
            }

            let blacks: usize = blacks_above + usize::from(!self.is_red(index));
            if left_index == NIL || right_index == NIL {
                match expected_black_height {
                    Some(expected) if expected != blacks => {
                        return Err(InvariantViolation::BlackHeight {
                            index,
                            expected,
                            found: blacks,
                        });
                    }
                    Some(_) => {}
                    None => expected_black_height = Some(blacks),
                }
            }

            if right_index != NIL {
                stack.push((right_index, blacks, Some(value), upper));
            }
            if left_index != NIL {
                stack.push((left_index, blacks, lower, Some(value)));
            }
        }
        Ok(())
    }

    fn check_invariant(&self) -> bool {
        match self.verify() {
            Ok(()) => true,
            Err(violation) => {
                log::warn!(
                    "{violation}, subtree: {:?}",
                    dump_subtree(self, violation.index())
                );
                false
            }
        }
    }
}

fn dump_subtree<T: GetTreeReadOnlyData>(
    tree: &T,
    index: DataIndex,
) -> Vec<NodeDump<'_, ValueOf<T>>> {
    let mut dump: Vec<NodeDump<'_, ValueOf<T>>> = Vec::new();
    let mut stack: Vec<DataIndex> = Vec::new();
    if index != NIL {
        stack.push(index);
    }
    while let Some(current_index) = stack.pop() {
        let left_index: DataIndex = tree.get_left_index(current_index);
        let right_index: DataIndex = tree.get_right_index(current_index);
        dump.push(NodeDump {
            index: current_index,
            value: tree.get_value(current_index),
            color: tree.get_color(current_index),
            left: (left_index != NIL).then(|| tree.get_value(left_index)),
            right: (right_index != NIL).then(|| tree.get_value(right_index)),
        });
        if right_index != NIL {
            stack.push(right_index);
        }
        if left_index != NIL {
            stack.push(left_index);
        }
    }
    dump
}

#[cfg(any(test, feature = "fuzz", feature = "trace"))]
pub trait TreeTestHelpers {
    fn debug_print(&self);
    fn verify_rb_tree(&self);
}

#[cfg(any(test, feature = "fuzz", feature = "trace"))]
impl<T> TreeTestHelpers for T
where
    T: GetTreeReadOnlyData,
{
    fn debug_print(&self) {
        crate::trace!("====== Tree ======");

        // Reverse in-order so the output reads as the tree turned on its side.
        let mut stack: Vec<(DataIndex, usize, &str)> = Vec::new();
        let mut cursor: (DataIndex, usize, &str) = (self.root_index(), 0, "- ");
        while cursor.0 != NIL || !stack.is_empty() {
            while cursor.0 != NIL {
                stack.push(cursor);
                cursor = (self.get_right_index(cursor.0), cursor.1 + 1, "┌ ");
            }
            let Some((index, depth, branch)) = stack.pop() else {
                break;
            };
            let mut row_str: String = "  ".repeat(depth);
            row_str += branch;

            let color: Color = self.get_color(index);
            let node_str: String = format!("{color}:{index}:{:?}", self.get_value(index));
            if color == Color::Red {
                #[cfg(feature = "colored")]
                {
                    use colored::Colorize;
                    row_str += &format!("{}", node_str.red());
                }
                #[cfg(not(feature = "colored"))]
                {
                    row_str += &node_str;
                }
            } else {
                row_str += &node_str;
            }
            crate::trace!("{}", row_str);

            cursor = (self.get_left_index(index), depth + 1, "└ ");
        }

        crate::trace!("==================");
    }

    fn verify_rb_tree(&self) {
        if let Err(violation) = self.verify() {
            self.debug_print();
            panic!("{violation}");
        }
    }
}
