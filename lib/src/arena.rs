use crate::{DataIndex, NIL};

// NodeArena is the slab that every tree engine allocates its nodes from. Freed
// slots form an intrusive LIFO free list so removed nodes are reused by the
// next insertion instead of growing the slab.
pub struct NodeArena<N> {
    slots: Vec<Slot<N>>,
    /// Index of the head of the free list.
    free_head: DataIndex,
    /// Number of occupied slots.
    len: usize,
}

enum Slot<N> {
    Occupied(N),
    Free {
        /// Next in the free list.
        next_index: DataIndex,
    },
}

impl<N> Default for NodeArena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> NodeArena<N> {
    pub fn new() -> Self {
        NodeArena {
            slots: Vec::new(),
            free_head: NIL,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store a node, reusing the most recently freed slot if there is one.
    pub fn add(&mut self, node: N) -> DataIndex {
        if self.free_head != NIL {
            self.len += 1;
            let index: DataIndex = self.free_head;
            let slot: &mut Slot<N> = &mut self.slots[index as usize];
            self.free_head = match slot {
                Slot::Free { next_index } => *next_index,
                Slot::Occupied(_) => unreachable!("free list points at occupied slot {index}"),
            };
            *slot = Slot::Occupied(node);
            return index;
        }

        let index: DataIndex = next_slot_index(self.slots.len());
        self.len += 1;
        self.slots.push(Slot::Occupied(node));
        index
    }

    /// Take the node out of the slab and put its slot on the free list.
    pub fn remove(&mut self, index: DataIndex) -> N {
        let slot: Slot<N> = std::mem::replace(
            &mut self.slots[index as usize],
            Slot::Free {
                next_index: self.free_head,
            },
        );
        match slot {
            Slot::Occupied(node) => {
                self.free_head = index;
                self.len -= 1;
                node
            }
            Slot::Free { next_index } => {
                // Put the chain back before failing so the list is not lost.
                self.slots[index as usize] = Slot::Free { next_index };
                panic!("double free of arena slot {index}");
            }
        }
    }

    pub fn get(&self, index: DataIndex) -> &N {
        match &self.slots[index as usize] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => panic!("arena slot {index} is free"),
        }
    }

    pub fn get_mut(&mut self, index: DataIndex) -> &mut N {
        match &mut self.slots[index as usize] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => panic!("arena slot {index} is free"),
        }
    }

    /// Mutable access to two distinct live nodes at once.
    pub fn pair_mut(&mut self, index_0: DataIndex, index_1: DataIndex) -> (&mut N, &mut N) {
        assert_ne!(index_0, index_1);
        let (low, high, flipped) = if index_0 < index_1 {
            (index_0 as usize, index_1 as usize, false)
        } else {
            (index_1 as usize, index_0 as usize, true)
        };
        let (head, tail) = self.slots.split_at_mut(high);
        let first: &mut N = match &mut head[low] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => panic!("arena slot {low} is free"),
        };
        let second: &mut N = match &mut tail[0] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => panic!("arena slot {high} is free"),
        };
        if flipped {
            (second, first)
        } else {
            (first, second)
        }
    }
}

/// Index of a freshly appended slot. NIL is reserved, so the slab holds at
/// most `NIL` slots.
fn next_slot_index(slot_count: usize) -> DataIndex {
    match DataIndex::try_from(slot_count) {
        Ok(index) if index != NIL => index,
        _ => panic!("arena is full, cannot address slot {slot_count}"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_arena_basic() {
        let mut arena: NodeArena<u64> = NodeArena::new();
        let a: DataIndex = arena.add(64);
        let b: DataIndex = arena.add(128);
        assert_eq!(arena.len(), 2);
        assert_eq!(*arena.get(a), 64);
        assert_eq!(*arena.get(b), 128);

        assert_eq!(arena.remove(a), 64);
        assert_eq!(arena.remove(b), 128);
        assert!(arena.is_empty());

        // Free list is LIFO.
        assert_eq!(arena.add(1), b);
        assert_eq!(arena.add(2), a);
        assert_eq!(arena.add(3), 2);
    }

    #[test]
    fn test_pair_mut_order() {
        let mut arena: NodeArena<u64> = NodeArena::new();
        let a: DataIndex = arena.add(1);
        let b: DataIndex = arena.add(2);
        {
            let (x, y) = arena.pair_mut(b, a);
            assert_eq!((*x, *y), (2, 1));
            std::mem::swap(x, y);
        }
        assert_eq!(*arena.get(a), 2);
        assert_eq!(*arena.get(b), 1);
    }

    #[test]
    #[should_panic]
    fn test_get_free_slot() {
        let mut arena: NodeArena<u64> = NodeArena::new();
        let a: DataIndex = arena.add(1);
        arena.remove(a);
        arena.get(a);
    }

    #[test]
    fn test_next_slot_index() {
        assert_eq!(next_slot_index(0), 0);
        assert_eq!(next_slot_index(NIL as usize - 1), NIL - 1);
    }

    #[test]
    #[should_panic(expected = "arena is full")]
    fn test_next_slot_index_reserved_nil() {
        next_slot_index(NIL as usize);
    }

    #[test]
    #[should_panic(expected = "arena is full")]
    fn test_next_slot_index_overflow() {
        next_slot_index(NIL as usize + 1);
    }
}
