use std::cmp::Ordering;

#[cfg(test)]
use crate::TreeTestHelpers;
use crate::{
    trace,
    tree::{TreeReadOperationsHelpers, TreeWriteOperationsHelpers},
    Color, DataIndex, GetTreeData, GetTreeReadOnlyData, Node, NodeArena, Payload, TreeNode,
    TreeReadOperations, TreeRemoveOperations, TreeWriteOperations, NIL,
};

/// Left-leaning red-black tree. Red links only lean left, which makes every
/// node a 2-node or a 3-node of the equivalent 2-3 tree. Insert and the three
/// deletes share one fixup applied on the way back up the recursion.
pub struct LLRB<V: Payload> {
    nodes: NodeArena<Node<V>>,
    root_index: DataIndex,
}

impl<V: Payload> Default for LLRB<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Payload> GetTreeReadOnlyData for LLRB<V> {
    type Node = Node<V>;

    const LEFT_LEANING: bool = true;

    fn nodes(&self) -> &NodeArena<Node<V>> {
        &self.nodes
    }
    fn root_index(&self) -> DataIndex {
        self.root_index
    }
}

impl<V: Payload> GetTreeData for LLRB<V> {
    fn nodes_mut(&mut self) -> &mut NodeArena<Node<V>> {
        &mut self.nodes
    }
    fn set_root_index(&mut self, root_index: DataIndex) {
        self.root_index = root_index;
    }
}

impl<V: Payload> LLRB<V> {
    pub fn new() -> Self {
        LLRB {
            nodes: NodeArena::new(),
            root_index: NIL,
        }
    }

    fn insert_recursive(&mut self, current_index: DataIndex, value: V) -> (DataIndex, bool) {
        if current_index == NIL {
            let index: DataIndex = self.nodes.add(Node::new_leaf(value));
            trace!("TREE insert {index}");
            return (index, true);
        }

        let inserted: bool = match value.cmp(self.get_value(current_index)) {
            Ordering::Less => {
                let (new_left, inserted) =
                    self.insert_recursive(self.get_left_index(current_index), value);
                self.set_left_index(current_index, new_left);
                inserted
            }
            Ordering::Greater => {
                let (new_right, inserted) =
                    self.insert_recursive(self.get_right_index(current_index), value);
                self.set_right_index(current_index, new_right);
                inserted
            }
            Ordering::Equal => return (current_index, false),
        };

        // Fixing on the way up only, never on the way down, keeps this a 2-3
        // tree.
        (self.fix_up(current_index), inserted)
    }

    /// Returns the new subtree root and the index of the node that was
    /// unlinked, NIL if the item was not found.
    fn delete_recursive(&mut self, current_index: DataIndex, value: &V) -> (DataIndex, DataIndex) {
        let mut current_index: DataIndex = current_index;
        let removed_index: DataIndex;

        if value < self.get_value(current_index) {
            let left_index: DataIndex = self.get_left_index(current_index);
            if left_index == NIL {
                return (current_index, NIL);
            }
            if !self.is_red(left_index) && !self.is_red(self.get_left_index(left_index)) {
                current_index = self.move_red_left(current_index);
            }
            let (new_left, removed) =
                self.delete_recursive(self.get_left_index(current_index), value);
            self.set_left_index(current_index, new_left);
            removed_index = removed;
        } else {
            if self.is_red(self.get_left_index(current_index)) {
                current_index = self.rotate_right(current_index);
            }
            if self.get_right_index(current_index) == NIL {
                if value == self.get_value(current_index) {
                    // Guaranteed to be a red leaf here.
                    return (NIL, current_index);
                }
                return (self.fix_up(current_index), NIL);
            }

            let right_index: DataIndex = self.get_right_index(current_index);
            if !self.is_red(right_index) && !self.is_red(self.get_left_index(right_index)) {
                current_index = self.move_red_right(current_index);
            }

            if value == self.get_value(current_index) {
                // Take the successor's item and delete the successor instead.
                let successor_index: DataIndex =
                    self.get_min_index(self.get_right_index(current_index));
                self.swap_values(current_index, successor_index);
                let (new_right, removed) =
                    self.delete_min_recursive(self.get_right_index(current_index));
                self.set_right_index(current_index, new_right);
                removed_index = removed;
            } else {
                let (new_right, removed) =
                    self.delete_recursive(self.get_right_index(current_index), value);
                self.set_right_index(current_index, new_right);
                removed_index = removed;
            }
        }
        (self.fix_up(current_index), removed_index)
    }

    fn delete_min_recursive(&mut self, current_index: DataIndex) -> (DataIndex, DataIndex) {
        let mut current_index: DataIndex = current_index;
        if self.get_left_index(current_index) == NIL {
            return (NIL, current_index);
        }
        let left_index: DataIndex = self.get_left_index(current_index);
        if !self.is_red(left_index) && !self.is_red(self.get_left_index(left_index)) {
            current_index = self.move_red_left(current_index);
        }
        let (new_left, removed_index) =
            self.delete_min_recursive(self.get_left_index(current_index));
        self.set_left_index(current_index, new_left);

        (self.fix_up(current_index), removed_index)
    }

    fn delete_max_recursive(&mut self, current_index: DataIndex) -> (DataIndex, DataIndex) {
        let mut current_index: DataIndex = current_index;
        // Lean the red link right so it travels down the right spine.
        if self.is_red(self.get_left_index(current_index)) {
            current_index = self.rotate_right(current_index);
        }
        if self.get_right_index(current_index) == NIL {
            return (NIL, current_index);
        }
        let right_index: DataIndex = self.get_right_index(current_index);
        if !self.is_red(right_index) && !self.is_red(self.get_left_index(right_index)) {
            current_index = self.move_red_right(current_index);
        }
        let (new_right, removed_index) =
            self.delete_max_recursive(self.get_right_index(current_index));
        self.set_right_index(current_index, new_right);

        (self.fix_up(current_index), removed_index)
    }

    /// Make the left child or one of its children red, assuming the current
    /// node is red and both children are black.
    fn move_red_left(&mut self, index: DataIndex) -> DataIndex {
        let mut index: DataIndex = index;
        self.flip_colors(index);
        let right_index: DataIndex = self.get_right_index(index);
        if self.is_red(self.get_left_index(right_index)) {
            let new_right: DataIndex = self.rotate_right(right_index);
            self.set_right_index(index, new_right);
            index = self.rotate_left(index);
            self.flip_colors(index);
        }
        index
    }

    /// Make the right child or one of its children red, assuming the current
    /// node is red and both children are black.
    fn move_red_right(&mut self, index: DataIndex) -> DataIndex {
        let mut index: DataIndex = index;
        self.flip_colors(index);
        if self.is_red(self.get_left_index(self.get_left_index(index))) {
            index = self.rotate_right(index);
            self.flip_colors(index);
        }
        index
    }

    fn fix_up(&mut self, current_index: DataIndex) -> DataIndex {
        let mut current_index: DataIndex = current_index;

        if self.is_red(self.get_right_index(current_index))
            && !self.is_red(self.get_left_index(current_index))
        {
            current_index = self.rotate_left(current_index);
        }

        let left_index: DataIndex = self.get_left_index(current_index);
        if self.is_red(left_index) && self.is_red(self.get_left_index(left_index)) {
            current_index = self.rotate_right(current_index);
        }

        if self.is_red(self.get_left_index(current_index))
            && self.is_red(self.get_right_index(current_index))
        {
            self.flip_colors(current_index);
        }
        current_index
    }

    // Redden the root when both its children are black so the descent
    // starts from a node that is not a 2-node.
    fn prepare_root_for_delete(&mut self) {
        let root_index: DataIndex = self.root_index;
        if !self.is_red(self.get_left_index(root_index))
            && !self.is_red(self.get_right_index(root_index))
        {
            self.set_color(root_index, Color::Red);
        }
    }

    fn finish_delete(&mut self, new_root: DataIndex, removed_index: DataIndex) -> Option<V> {
        self.root_index = new_root;
        self.set_color(new_root, Color::Black);
        if removed_index == NIL {
            return None;
        }
        trace!("TREE remove {removed_index}");
        let value: V = self.nodes.remove(removed_index).into_value();

        #[cfg(test)]
        self.verify_rb_tree();
        Some(value)
    }
}

impl<V: Payload> TreeWriteOperations<V> for LLRB<V> {
    /// Insert and rebalance.
    fn insert(&mut self, value: V) -> bool {
        let (new_root, inserted) = self.insert_recursive(self.root_index, value);
        self.root_index = new_root;
        self.set_color(new_root, Color::Black);

        #[cfg(test)]
        self.verify_rb_tree();
        inserted
    }
}

impl<V: Payload> TreeRemoveOperations<V> for LLRB<V> {
    fn remove(&mut self, value: &V) -> Option<V> {
        if !self.contains(value) {
            return None;
        }
        self.prepare_root_for_delete();
        let (new_root, removed_index) = self.delete_recursive(self.root_index, value);
        self.finish_delete(new_root, removed_index)
    }

    fn remove_min(&mut self) -> Option<V> {
        if self.root_index == NIL {
            return None;
        }
        self.prepare_root_for_delete();
        let (new_root, removed_index) = self.delete_min_recursive(self.root_index);
        self.finish_delete(new_root, removed_index)
    }

    fn remove_max(&mut self) -> Option<V> {
        if self.root_index == NIL {
            return None;
        }
        self.prepare_root_for_delete();
        let (new_root, removed_index) = self.delete_max_recursive(self.root_index);
        self.finish_delete(new_root, removed_index)
    }
}
