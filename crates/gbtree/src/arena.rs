use crate::error::{Error, Result};

#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Id(u32);

impl Id {
    pub(crate) const NIL: Self = Self(u32::MAX);

    /// Id of the slot at `index`; the index space ends just below `NIL`.
    fn fresh(index: usize) -> Result<Self> {
        match u32::try_from(index) {
            Ok(i) if i != u32::MAX => Ok(Self(i)),
            _ => Err(Error::OutOfMemory),
        }
    }

    #[inline(always)]
    pub(crate) fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline(always)]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

pub(crate) const LEFT: usize = 0;
pub(crate) const RIGHT: usize = 1;

/// Stable reference to a stored entry.
///
/// Survives rebalancing. Once the entry is removed (or the dictionary cleared)
/// the handle goes stale and the accessors return `None` for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    id: u32,
    generation: u32,
}

pub(crate) struct Node<K, V> {
    pub(crate) ch: [Id; 2],
    pub(crate) key: K,
    pub(crate) value: V,
}

struct Slot<K, V> {
    node: Option<Node<K, V>>,
    generation: u32,
}

/// Where a subtree hangs: the tree root or one child link of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Place {
    Root,
    Child(Id, usize),
}

/// Node storage of one tree. Owns every node reachable from `root`.
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<Id>,
    pub(crate) root: Id,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: Id::NIL,
        }
    }

    #[inline(always)]
    pub(crate) fn node(&self, x: Id) -> &Node<K, V> {
        debug_assert!(!x.is_nil());
        self.slots[x.idx()].node.as_ref().expect("live node")
    }

    #[inline(always)]
    pub(crate) fn node_mut(&mut self, x: Id) -> &mut Node<K, V> {
        debug_assert!(!x.is_nil());
        self.slots[x.idx()].node.as_mut().expect("live node")
    }

    #[inline(always)]
    pub(crate) fn child(&self, x: Id, side: usize) -> Id {
        self.node(x).ch[side]
    }

    #[inline(always)]
    pub(crate) fn get(&self, place: Place) -> Id {
        match place {
            Place::Root => self.root,
            Place::Child(p, side) => self.child(p, side),
        }
    }

    #[inline(always)]
    pub(crate) fn set(&mut self, place: Place, x: Id) {
        match place {
            Place::Root => self.root = x,
            Place::Child(p, side) => self.node_mut(p).ch[side] = x,
        }
    }

    /// Stores a detached leaf. Fails without side effects if no room can be reserved.
    pub(crate) fn alloc(&mut self, key: K, value: V) -> Result<Id> {
        let node = Node {
            ch: [Id::NIL, Id::NIL],
            key,
            value,
        };
        if let Some(x) = self.free.pop() {
            self.slots[x.idx()].node = Some(node);
            return Ok(x);
        }
        let x = Id::fresh(self.slots.len())?;
        self.slots.try_reserve(1)?;
        // Keep `free` able to take every slot back without allocating.
        self.free.try_reserve(self.slots.len() + 1 - self.free.len())?;
        self.slots.push(Slot {
            node: Some(node),
            generation: 0,
        });
        Ok(x)
    }

    /// Detaches slot `x` and hands back its node. Links pointing at `x` must already be gone.
    pub(crate) fn release(&mut self, x: Id) -> Node<K, V> {
        let slot = &mut self.slots[x.idx()];
        let node = slot.node.take().expect("live node");
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(x);
        node
    }

    /// Empties the arena, yielding each stored node to `f`.
    pub(crate) fn drain(&mut self, mut f: impl FnMut(Node<K, V>)) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(Id(i as u32));
                f(node);
            }
        }
        self.root = Id::NIL;
    }

    pub(crate) fn handle(&self, x: Id) -> NodeRef {
        NodeRef {
            id: x.0,
            generation: self.slots[x.idx()].generation,
        }
    }

    pub(crate) fn resolve(&self, r: NodeRef) -> Option<&Node<K, V>> {
        let slot = self.slots.get(r.id as usize)?;
        if slot.generation != r.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn resolve_mut(&mut self, r: NodeRef) -> Option<&mut Node<K, V>> {
        let slot = self.slots.get_mut(r.id as usize)?;
        if slot.generation != r.generation {
            return None;
        }
        slot.node.as_mut()
    }
}
