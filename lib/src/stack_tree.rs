use std::cmp::Ordering;

#[cfg(test)]
use crate::TreeTestHelpers;
use crate::{
    trace,
    tree::{TreeReadOperationsHelpers, TreeWriteOperationsHelpers},
    Color, DataIndex, GetTreeData, GetTreeReadOnlyData, Node, NodeArena, Payload, TreeNode,
    TreeWriteOperations, NIL,
};

// StackRedBlackTree runs the same insertion fixup as RedBlackTree but nodes
// carry no parent index. The descent records its path in a scratch vector and
// the fixup pops parent and grandparent off it. The scratch vector is kept on
// the handle so repeated inserts do not reallocate.
pub struct StackRedBlackTree<V: Payload> {
    nodes: NodeArena<Node<V>>,
    root_index: DataIndex,
    ancestors: Vec<DataIndex>,
}

impl<V: Payload> Default for StackRedBlackTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Payload> GetTreeReadOnlyData for StackRedBlackTree<V> {
    type Node = Node<V>;

    fn nodes(&self) -> &NodeArena<Node<V>> {
        &self.nodes
    }
    fn root_index(&self) -> DataIndex {
        self.root_index
    }
}

impl<V: Payload> GetTreeData for StackRedBlackTree<V> {
    fn nodes_mut(&mut self) -> &mut NodeArena<Node<V>> {
        &mut self.nodes
    }
    fn set_root_index(&mut self, root_index: DataIndex) {
        self.root_index = root_index;
    }
}

impl<V: Payload> TreeWriteOperations<V> for StackRedBlackTree<V> {
    fn insert(&mut self, value: V) -> bool {
        let mut ancestors: Vec<DataIndex> = std::mem::take(&mut self.ancestors);
        ancestors.clear();

        let mut current_index: DataIndex = self.root_index;
        let mut insert_right: bool = false;
        while current_index != NIL {
            match value.cmp(self.get_value(current_index)) {
                Ordering::Less => insert_right = false,
                Ordering::Greater => insert_right = true,
                Ordering::Equal => {
                    trace!("TREE duplicate at {current_index}");
                    self.ancestors = ancestors;
                    return false;
                }
            }
            ancestors.push(current_index);
            current_index = self.get_child_index(current_index, insert_right);
        }

        let index: DataIndex = self.nodes.add(Node::new_leaf(value));
        trace!("TREE insert {index} depth {}", ancestors.len());
        match ancestors.last() {
            Some(&parent_index) => self.set_child_index(parent_index, index, insert_right),
            None => self.root_index = index,
        }

        self.insert_fix(index, &mut ancestors);
        self.ancestors = ancestors;

        #[cfg(test)]
        self.verify_rb_tree();
        true
    }
}

impl<V: Payload> StackRedBlackTree<V> {
    pub fn new() -> Self {
        StackRedBlackTree {
            nodes: NodeArena::new(),
            root_index: NIL,
            ancestors: Vec::new(),
        }
    }

    /// Rebalance after inserting a red leaf. `ancestors` holds the path from
    /// the root down to the new node's parent.
    fn insert_fix(&mut self, index_to_fix: DataIndex, ancestors: &mut Vec<DataIndex>) {
        let mut current_index: DataIndex = index_to_fix;
        loop {
            let Some(mut parent_index) = ancestors.pop() else {
                // Current is the root.
                self.set_color(current_index, Color::Black);
                return;
            };
            if !self.is_red(parent_index) {
                return;
            }
            let Some(grandparent_index) = ancestors.pop() else {
                self.set_color(parent_index, Color::Black);
                return;
            };
            let great_grandparent_index: DataIndex = ancestors.last().copied().unwrap_or(NIL);

            let parent_is_right: bool = self.get_right_index(grandparent_index) == parent_index;
            let uncle_index: DataIndex = self.get_child_index(grandparent_index, !parent_is_right);

            trace!("FIX G={grandparent_index} P={parent_index} U={uncle_index} N={current_index}");

            if self.is_red(uncle_index) {
                self.set_color(parent_index, Color::Black);
                self.set_color(uncle_index, Color::Black);
                self.set_color(grandparent_index, Color::Red);
                current_index = grandparent_index;
                continue;
            }

            if self.get_child_index(parent_index, !parent_is_right) == current_index {
                self.dir_rotate(grandparent_index, parent_index, parent_is_right);
                parent_index = current_index;
            }

            self.set_color(parent_index, Color::Black);
            self.set_color(grandparent_index, Color::Red);
            self.dir_rotate(great_grandparent_index, grandparent_index, !parent_is_right);
            return;
        }
    }
}
