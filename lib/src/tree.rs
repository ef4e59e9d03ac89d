use std::fmt::{Debug, Display};

use crate::{DataIndex, NodeArena, NIL};

pub trait Payload: Ord + Debug {}
impl<T: Ord + Debug> Payload for T {}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Black = 0,
    Red = 1,
}

impl Color {
    pub fn flip(self) -> Self {
        match self {
            Color::Black => Color::Red,
            Color::Red => Color::Black,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Black => write!(f, "B"),
            Color::Red => write!(f, "R"),
        }
    }
}

/// Links, color and item shared by every node layout. Children are indices
/// into the owning tree's arena, NIL when absent.
pub trait TreeNode {
    type Value: Payload;

    /// A fresh red node with no children.
    fn new_leaf(value: Self::Value) -> Self;
    fn value(&self) -> &Self::Value;
    fn value_mut(&mut self) -> &mut Self::Value;
    fn into_value(self) -> Self::Value;
    fn color(&self) -> Color;
    fn set_color(&mut self, color: Color);
    fn left(&self) -> DataIndex;
    fn right(&self) -> DataIndex;
    fn set_left(&mut self, index: DataIndex);
    fn set_right(&mut self, index: DataIndex);
}

/// Non-owning back-reference to the parent. Only the parent-pointer engine
/// stores one.
pub trait ParentLink {
    fn parent(&self) -> DataIndex;
    fn set_parent(&mut self, index: DataIndex);
}

/// Node without a parent field, used by the ancestor-stack and left-leaning
/// engines.
#[derive(Debug, Clone)]
pub struct Node<V> {
    pub(crate) left: DataIndex,
    pub(crate) right: DataIndex,
    pub(crate) color: Color,
    pub(crate) value: V,
}

impl<V: Payload> TreeNode for Node<V> {
    type Value = V;

    fn new_leaf(value: V) -> Self {
        Node {
            left: NIL,
            right: NIL,
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

pub type ValueOf<T> = <<T as GetTreeReadOnlyData>::Node as TreeNode>::Value;

// Specific to how a tree stores its nodes. Implementing this gets the helpers,
// rotations and query utilities for free.
pub trait GetTreeReadOnlyData {
    type Node: TreeNode;

    /// Whether red links may only lean left. Checked by `verify`.
    const LEFT_LEANING: bool = false;

    fn nodes(&self) -> &NodeArena<Self::Node>;
    fn root_index(&self) -> DataIndex;
}

pub trait GetTreeData: GetTreeReadOnlyData {
    fn nodes_mut(&mut self) -> &mut NodeArena<Self::Node>;
    fn set_root_index(&mut self, root_index: DataIndex);
}

/// Read side of the ordered-set capability shared by all engines.
pub trait TreeReadOperations: GetTreeReadOnlyData + Sized {
    fn contains(&self, value: &ValueOf<Self>) -> bool;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn min(&self) -> Option<&ValueOf<Self>>;
    fn max(&self) -> Option<&ValueOf<Self>>;
    fn iter(&self) -> crate::Iter<'_, Self>;
    fn to_list(&self) -> Vec<ValueOf<Self>>
    where
        ValueOf<Self>: Clone,
    {
        self.iter().cloned().collect()
    }
    fn dump(&self) -> Vec<crate::NodeDump<'_, ValueOf<Self>>>;
    fn max_depth(&self) -> usize;
    fn verify(&self) -> Result<(), crate::InvariantViolation>;
    fn check_invariant(&self) -> bool;
}

pub trait TreeWriteOperations<V: Payload> {
    /// Insert if absent. Returns false and drops `value` when an equal item is
    /// already stored.
    fn insert(&mut self, value: V) -> bool;
}

pub trait TreeRemoveOperations<V: Payload> {
    fn remove(&mut self, value: &V) -> Option<V>;
    fn remove_min(&mut self) -> Option<V>;
    fn remove_max(&mut self) -> Option<V>;
}

pub(crate) trait TreeReadOperationsHelpers: GetTreeReadOnlyData {
    fn get_value(&self, index: DataIndex) -> &ValueOf<Self>;
    fn get_color(&self, index: DataIndex) -> Color;
    fn is_red(&self, index: DataIndex) -> bool;
    fn get_left_index(&self, index: DataIndex) -> DataIndex;
    fn get_right_index(&self, index: DataIndex) -> DataIndex;
    fn get_child_index(&self, index: DataIndex, right: bool) -> DataIndex;
    fn get_min_index(&self, index: DataIndex) -> DataIndex;
    fn get_max_index(&self, index: DataIndex) -> DataIndex;
    fn lookup_index(&self, value: &ValueOf<Self>) -> DataIndex;
}

impl<T> TreeReadOperationsHelpers for T
where
    T: GetTreeReadOnlyData,
{
    fn get_value(&self, index: DataIndex) -> &ValueOf<T> {
        debug_assert_ne!(index, NIL);
        self.nodes().get(index).value()
    }
    fn get_color(&self, index: DataIndex) -> Color {
        if index == NIL {
            return Color::Black;
        }
        self.nodes().get(index).color()
    }
    fn is_red(&self, index: DataIndex) -> bool {
        self.get_color(index) == Color::Red
    }
    fn get_left_index(&self, index: DataIndex) -> DataIndex {
        if index == NIL {
            return NIL;
        }
        self.nodes().get(index).left()
    }
    fn get_right_index(&self, index: DataIndex) -> DataIndex {
        if index == NIL {
            return NIL;
        }
        self.nodes().get(index).right()
    }
    fn get_child_index(&self, index: DataIndex, right: bool) -> DataIndex {
        if right {
            self.get_right_index(index)
        } else {
            self.get_left_index(index)
        }
    }

    // Go left til cant go left anymore
    fn get_min_index(&self, index: DataIndex) -> DataIndex {
        let mut current_index: DataIndex = index;
        while self.get_left_index(current_index) != NIL {
            current_index = self.get_left_index(current_index);
        }
        current_index
    }

    fn get_max_index(&self, index: DataIndex) -> DataIndex {
        let mut current_index: DataIndex = index;
        while self.get_right_index(current_index) != NIL {
            current_index = self.get_right_index(current_index);
        }
        current_index
    }

    fn lookup_index(&self, value: &ValueOf<T>) -> DataIndex {
        let mut current_index: DataIndex = self.root_index();
        while current_index != NIL {
            match value.cmp(self.get_value(current_index)) {
                std::cmp::Ordering::Less => current_index = self.get_left_index(current_index),
                std::cmp::Ordering::Equal => return current_index,
                std::cmp::Ordering::Greater => {
                    current_index = self.get_right_index(current_index)
                }
            }
        }
        NIL
    }
}

pub(crate) trait TreeWriteOperationsHelpers: GetTreeData {
    fn set_color(&mut self, index: DataIndex, color: Color);
    fn set_left_index(&mut self, index: DataIndex, left_index: DataIndex);
    fn set_right_index(&mut self, index: DataIndex, right_index: DataIndex);
    fn set_child_index(&mut self, index: DataIndex, child_index: DataIndex, right: bool);
    fn swap_values(&mut self, index_0: DataIndex, index_1: DataIndex);
    fn flip_colors(&mut self, index: DataIndex);
    fn rotate_left(&mut self, index: DataIndex) -> DataIndex;
    fn rotate_right(&mut self, index: DataIndex) -> DataIndex;
    fn dir_rotate(
        &mut self,
        parent_index: DataIndex,
        pivot_index: DataIndex,
        toward_right: bool,
    ) -> DataIndex;
}

impl<T> TreeWriteOperationsHelpers for T
where
    T: GetTreeData,
{
    fn set_color(&mut self, index: DataIndex, color: Color) {
        if index == NIL {
            return;
        }
        self.nodes_mut().get_mut(index).set_color(color);
    }
    fn set_left_index(&mut self, index: DataIndex, left_index: DataIndex) {
        if index == NIL {
            return;
        }
        self.nodes_mut().get_mut(index).set_left(left_index);
    }
    fn set_right_index(&mut self, index: DataIndex, right_index: DataIndex) {
        if index == NIL {
            return;
        }
        self.nodes_mut().get_mut(index).set_right(right_index);
    }
    fn set_child_index(&mut self, index: DataIndex, child_index: DataIndex, right: bool) {
        if right {
            self.set_right_index(index, child_index);
        } else {
            self.set_left_index(index, child_index);
        }
    }

    fn swap_values(&mut self, index_0: DataIndex, index_1: DataIndex) {
        if index_0 == index_1 {
            return;
        }
        let (node_0, node_1) = self.nodes_mut().pair_mut(index_0, index_1);
        std::mem::swap(node_0.value_mut(), node_1.value_mut());
    }

    /// Flip the color of this node and both children. Never call on a node
    /// missing a child.
    fn flip_colors(&mut self, index: DataIndex) {
        let left_index: DataIndex = self.get_left_index(index);
        let right_index: DataIndex = self.get_right_index(index);
        debug_assert_ne!(left_index, NIL);
        debug_assert_ne!(right_index, NIL);

        for current_index in [index, left_index, right_index] {
            let node: &mut T::Node = self.nodes_mut().get_mut(current_index);
            node.set_color(node.color().flip());
        }
    }

    fn rotate_left(&mut self, index: DataIndex) -> DataIndex {
        // Left rotate of H. X takes H's color, H becomes red.
        //
        //      H                      X
        //    /   \                  /   \
        //   A     X     --->      H      C
        //       /   \           /   \
        //      B     C         A     B

        let h_index: DataIndex = index;
        let x_index: DataIndex = self.get_right_index(h_index);
        debug_assert_ne!(x_index, NIL);
        let b_index: DataIndex = self.get_left_index(x_index);
        let h_color: Color = self.get_color(h_index);

        {
            let h_node: &mut T::Node = self.nodes_mut().get_mut(h_index);
            h_node.set_right(b_index);
            h_node.set_color(Color::Red);
        }
        {
            let x_node: &mut T::Node = self.nodes_mut().get_mut(x_index);
            x_node.set_left(h_index);
            x_node.set_color(h_color);
        }
        x_index
    }

    fn rotate_right(&mut self, index: DataIndex) -> DataIndex {
        // Right rotate of H. X takes H's color, H becomes red.
        //
        //        H                  X
        //      /   \              /   \
        //     X     C   --->     A     H
        //   /   \                    /   \
        //  A     B                  B     C

        let h_index: DataIndex = index;
        let x_index: DataIndex = self.get_left_index(h_index);
        debug_assert_ne!(x_index, NIL);
        let b_index: DataIndex = self.get_right_index(x_index);
        let h_color: Color = self.get_color(h_index);

        {
            let h_node: &mut T::Node = self.nodes_mut().get_mut(h_index);
            h_node.set_left(b_index);
            h_node.set_color(Color::Red);
        }
        {
            let x_node: &mut T::Node = self.nodes_mut().get_mut(x_index);
            x_node.set_right(h_index);
            x_node.set_color(h_color);
        }
        x_index
    }

    fn dir_rotate(
        &mut self,
        parent_index: DataIndex,
        pivot_index: DataIndex,
        toward_right: bool,
    ) -> DataIndex {
        // Rotate P toward the right. Mirror for the left. Colors are untouched,
        // the caller recolors.
        //
        //         G                      G
        //         |                      |
        //         P                      S
        //       /   \                  /   \
        //      S     U     --->      X      P
        //    /  \                          /   \
        //  X     C                       C       U

        let s_index: DataIndex = self.get_child_index(pivot_index, !toward_right);
        debug_assert_ne!(s_index, NIL);
        let c_index: DataIndex = self.get_child_index(s_index, toward_right);

        self.set_child_index(pivot_index, c_index, !toward_right);
        self.set_child_index(s_index, pivot_index, toward_right);

        if parent_index != NIL {
            let pivot_is_right: bool = self.get_right_index(parent_index) == pivot_index;
            self.set_child_index(parent_index, s_index, pivot_is_right);
        } else {
            debug_assert_eq!(self.root_index(), pivot_index);
            self.set_root_index(s_index);
        }
        s_index
    }
}
