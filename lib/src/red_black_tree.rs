use std::cmp::Ordering;

#[cfg(test)]
use crate::TreeTestHelpers;
use crate::{
    trace,
    tree::{TreeReadOperationsHelpers, TreeWriteOperationsHelpers},
    Color, DataIndex, GetTreeData, GetTreeReadOnlyData, NodeArena, ParentLink, Payload,
    TreeNode, TreeRemoveOperations, TreeWriteOperations, NIL,
};

/// Node of the parent-pointer engine. The parent index is a back-reference
/// only, ownership still flows from parent to child.
#[derive(Debug, Clone)]
pub struct RBNode<V> {
    left: DataIndex,
    right: DataIndex,
    parent: DataIndex,
    color: Color,
    value: V,
}

impl<V: Payload> TreeNode for RBNode<V> {
    type Value = V;

    fn new_leaf(value: V) -> Self {
        RBNode {
            left: NIL,
            right: NIL,
            parent: NIL,
            color: Color::Red,
            value,
        }
    }
    fn value(&self) -> &V {
        &self.value
    }
    fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }
    fn into_value(self) -> V {
        self.value
    }
    fn color(&self) -> Color {
        self.color
    }
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
    fn left(&self) -> DataIndex {
        self.left
    }
    fn right(&self) -> DataIndex {
        self.right
    }
    fn set_left(&mut self, index: DataIndex) {
        self.left = index;
    }
    fn set_right(&mut self, index: DataIndex) {
        self.right = index;
    }
}

impl<V> ParentLink for RBNode<V> {
    fn parent(&self) -> DataIndex {
        self.parent
    }
    fn set_parent(&mut self, index: DataIndex) {
        self.parent = index;
    }
}

/// Red-black tree whose insert and remove fixups walk upward through stored
/// parent indices.
pub struct RedBlackTree<V: Payload> {
    nodes: NodeArena<RBNode<V>>,
    root_index: DataIndex,
}

impl<V: Payload> Default for RedBlackTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Payload> GetTreeReadOnlyData for RedBlackTree<V> {
    type Node = RBNode<V>;

    fn nodes(&self) -> &NodeArena<RBNode<V>> {
        &self.nodes
    }
    fn root_index(&self) -> DataIndex {
        self.root_index
    }
}

impl<V: Payload> GetTreeData for RedBlackTree<V> {
    fn nodes_mut(&mut self) -> &mut NodeArena<RBNode<V>> {
        &mut self.nodes
    }
    fn set_root_index(&mut self, root_index: DataIndex) {
        self.root_index = root_index;
    }
}

impl<V: Payload> TreeWriteOperations<V> for RedBlackTree<V> {
    /// Insert and rebalance.
    fn insert(&mut self, value: V) -> bool {
        let mut parent_index: DataIndex = NIL;
        let mut current_index: DataIndex = self.root_index;
        let mut insert_right: bool = false;
        while current_index != NIL {
            match value.cmp(self.get_value(current_index)) {
                Ordering::Less => insert_right = false,
                Ordering::Greater => insert_right = true,
                Ordering::Equal => {
                    trace!("TREE duplicate at {current_index}");
                    return false;
                }
            }
            parent_index = current_index;
            current_index = self.get_child_index(current_index, insert_right);
        }

        let mut new_node: RBNode<V> = RBNode::new_leaf(value);
        new_node.parent = parent_index;
        let index: DataIndex = self.nodes.add(new_node);
        trace!("TREE insert {index} under {parent_index}");

        if parent_index == NIL {
            self.root_index = index;
        } else {
            self.set_child_index(parent_index, index, insert_right);
        }

        // Avoid recursion by doing a loop here.
        let mut node_to_fix: DataIndex = index;
        loop {
            node_to_fix = self.insert_fix(node_to_fix);
            if node_to_fix == NIL {
                break;
            }
        }

        #[cfg(test)]
        self.verify_rb_tree();
        true
    }
}

impl<V: Payload> TreeRemoveOperations<V> for RedBlackTree<V> {
    fn remove(&mut self, value: &V) -> Option<V> {
        let index: DataIndex = self.lookup_index(value);
        if index == NIL {
            return None;
        }
        Some(self.remove_by_index(index))
    }

    fn remove_min(&mut self) -> Option<V> {
        if self.root_index == NIL {
            return None;
        }
        let index: DataIndex = self.get_min_index(self.root_index);
        Some(self.remove_by_index(index))
    }

    fn remove_max(&mut self) -> Option<V> {
        if self.root_index == NIL {
            return None;
        }
        let index: DataIndex = self.get_max_index(self.root_index);
        Some(self.remove_by_index(index))
    }
}

impl<V: Payload> RedBlackTree<V> {
    pub fn new() -> Self {
        RedBlackTree {
            nodes: NodeArena::new(),
            root_index: NIL,
        }
    }

    fn get_parent_index(&self, index: DataIndex) -> DataIndex {
        if index == NIL {
            return NIL;
        }
        self.nodes.get(index).parent()
    }

    fn set_parent_index(&mut self, index: DataIndex, parent_index: DataIndex) {
        if index == NIL {
            return;
        }
        self.nodes.get_mut(index).set_parent(parent_index);
    }

    fn is_right_child(&self, index: DataIndex) -> bool {
        let parent_index: DataIndex = self.get_parent_index(index);
        parent_index != NIL && self.get_right_index(parent_index) == index
    }

    /// Rotate around pivot and keep the parent indices of the three moved
    /// nodes consistent.
    fn rotate(&mut self, pivot_index: DataIndex, toward_right: bool) -> DataIndex {
        let parent_index: DataIndex = self.get_parent_index(pivot_index);
        let new_top_index: DataIndex = self.dir_rotate(parent_index, pivot_index, toward_right);
        let moved_child_index: DataIndex = self.get_child_index(pivot_index, !toward_right);

        self.set_parent_index(moved_child_index, pivot_index);
        self.set_parent_index(pivot_index, new_top_index);
        self.set_parent_index(new_top_index, parent_index);
        new_top_index
    }

    /// Put child where index was. Child may be NIL.
    fn replace_in_parent(&mut self, index: DataIndex, child_index: DataIndex) {
        let parent_index: DataIndex = self.get_parent_index(index);
        if parent_index == NIL {
            self.root_index = child_index;
        } else {
            let is_right: bool = self.is_right_child(index);
            self.set_child_index(parent_index, child_index, is_right);
        }
        self.set_parent_index(child_index, parent_index);
    }

    fn insert_fix(&mut self, index_to_fix: DataIndex) -> DataIndex {
        if self.root_index == index_to_fix {
            self.set_color(index_to_fix, Color::Black);
            return NIL;
        }

        // Check the color of the parent. If it is black, then nothing left to do.
        let mut parent_index: DataIndex = self.get_parent_index(index_to_fix);
        if !self.is_red(parent_index) {
            return NIL;
        }

        let grandparent_index: DataIndex = self.get_parent_index(parent_index);
        if grandparent_index == NIL {
            self.set_color(parent_index, Color::Black);
            return NIL;
        }

        let parent_is_right: bool = self.get_right_index(grandparent_index) == parent_index;
        let uncle_index: DataIndex = self.get_child_index(grandparent_index, !parent_is_right);

        trace!("FIX G={grandparent_index} P={parent_index} U={uncle_index} N={index_to_fix}");

        // Uncle is red. Push the red up and continue from the grandparent.
        if self.is_red(uncle_index) {
            self.set_color(parent_index, Color::Black);
            self.set_color(uncle_index, Color::Black);
            self.set_color(grandparent_index, Color::Red);
            return grandparent_index;
        }

        // Inner grandchild. Straighten the zig-zag first.
        if self.get_child_index(parent_index, !parent_is_right) == index_to_fix {
            self.rotate(parent_index, parent_is_right);
            parent_index = index_to_fix;
        }

        // Outer grandchild.
        self.set_color(parent_index, Color::Black);
        self.set_color(grandparent_index, Color::Red);
        self.rotate(grandparent_index, !parent_is_right);
        NIL
    }

    /// Remove a node by index and rebalance.
    fn remove_by_index(&mut self, index: DataIndex) -> V {
        trace!("TREE remove {index}");
        let mut index: DataIndex = index;

        // If it is an internal node, move the successor item here and delete
        // the successor node instead.
        if self.get_left_index(index) != NIL && self.get_right_index(index) != NIL {
            let successor_index: DataIndex = self.get_min_index(self.get_right_index(index));
            self.swap_values(index, successor_index);
            index = successor_index;
        }

        // Now the node to delete has at most one child.
        let child_index: DataIndex = if self.get_left_index(index) != NIL {
            self.get_left_index(index)
        } else {
            self.get_right_index(index)
        };
        let parent_index: DataIndex = self.get_parent_index(index);
        let simple: bool = self.is_red(index) || self.is_red(child_index);
        self.replace_in_parent(index, child_index);

        if simple {
            self.set_color(child_index, Color::Black);
        } else {
            // Avoid recursion by doing a loop here.
            let mut nodes_to_fix: (DataIndex, DataIndex) = (child_index, parent_index);
            loop {
                nodes_to_fix = self.remove_fix(nodes_to_fix.0, nodes_to_fix.1);
                if nodes_to_fix.0 == NIL && nodes_to_fix.1 == NIL {
                    break;
                }
            }
        }

        let value: V = self.nodes.remove(index).into_value();

        #[cfg(test)]
        self.verify_rb_tree();
        value
    }

    fn remove_fix(
        &mut self,
        current_index: DataIndex,
        parent_index: DataIndex,
    ) -> (DataIndex, DataIndex) {
        // Current is double black. It could be NIL if we just deleted a leaf,
        // so we need the parent to know where in the tree we are.
        if self.root_index == current_index || parent_index == NIL {
            return (NIL, NIL);
        }

        let sibling_is_right: bool = self.get_left_index(parent_index) == current_index;
        let sibling_index: DataIndex = self.get_child_index(parent_index, sibling_is_right);
        let parent_color: Color = self.get_color(parent_index);
        debug_assert_ne!(sibling_index, NIL);

        // Sibling is red. Rotate it above the parent and retry.
        if self.is_red(sibling_index) {
            self.rotate(parent_index, !sibling_is_right);
            self.set_color(parent_index, Color::Red);
            self.set_color(sibling_index, Color::Black);
            return (current_index, parent_index);
        }

        let outer_index: DataIndex = self.get_child_index(sibling_index, sibling_is_right);
        let inner_index: DataIndex = self.get_child_index(sibling_index, !sibling_is_right);

        // Black sibling with a red outer child. LL or RR.
        if self.is_red(outer_index) {
            self.set_color(outer_index, Color::Black);
            self.set_color(sibling_index, parent_color);
            self.set_color(parent_index, Color::Black);
            self.rotate(parent_index, !sibling_is_right);
            return (NIL, NIL);
        }

        // Black sibling with a red inner child. LR or RL.
        if self.is_red(inner_index) {
            self.set_color(inner_index, parent_color);
            self.set_color(sibling_index, Color::Black);
            self.set_color(parent_index, Color::Black);
            self.rotate(sibling_index, sibling_is_right);
            self.rotate(parent_index, !sibling_is_right);
            return (NIL, NIL);
        }

        // Sibling and both its children are black.
        self.set_color(sibling_index, Color::Red);
        if parent_color == Color::Black {
            return (parent_index, self.get_parent_index(parent_index));
        }
        self.set_color(parent_index, Color::Black);
        (NIL, NIL)
    }
}
