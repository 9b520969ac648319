use std::sync::Arc;

use crate::arena::{Arena, Id, LEFT, NodeRef, Place, RIGHT};
use crate::config::{Config, MinWeightTable};
use crate::error::{Error, Result};
use crate::policy::KeyPolicy;

/// Ordered dictionary kept balanced by partial rebuilding.
///
/// - Keys are unique; inserting a present key keeps the stored value.
/// - After each insertion every subtree rooted at depth `d` weighs at least
///   `minweight[d]`, which bounds the height by roughly `C * log2(n)`.
/// - Deletions never rebalance locally; the whole tree is rebuilt once they
///   outnumber `max_deletions * weight`.
pub struct Dictionary<P: KeyPolicy> {
    pub(crate) arena: Arena<P::Key, P::Value>,
    pub(crate) weight: usize,
    pub(crate) deletions: usize,
    config: Config,
    min_weight: Arc<MinWeightTable>,
    path: Vec<(Id, usize)>,
    stack: Vec<Id>,
}

impl<P: KeyPolicy> Default for Dictionary<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: KeyPolicy> Dictionary<P> {
    pub fn new() -> Self {
        Self::with_config(Config::default()).expect("default configuration is valid")
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let min_weight = MinWeightTable::shared(&config)?;
        Ok(Self {
            arena: Arena::new(),
            weight: 1,
            deletions: 0,
            config,
            min_weight,
            path: Vec::new(),
            stack: Vec::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.weight - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of levels in the tree.
    pub fn height(&self) -> usize {
        self.arena.height(self.arena.root)
    }

    pub fn key(&self, r: NodeRef) -> Option<&P::Key> {
        self.arena.resolve(r).map(|n| &n.key)
    }

    pub fn value(&self, r: NodeRef) -> Option<&P::Value> {
        self.arena.resolve(r).map(|n| &n.value)
    }

    pub fn value_mut(&mut self, r: NodeRef) -> Option<&mut P::Value> {
        self.arena.resolve_mut(r).map(|n| &mut n.value)
    }

    /// `key` is known not to be less than `candidate`; decide whether they are equal.
    #[inline]
    fn matches(candidate: &P::Key, key: &P::Key) -> bool {
        if P::HAS_EQUAL {
            P::equal(candidate, key)
        } else {
            !P::less(candidate, key)
        }
    }

    /// Stores a copy of `key` and `value` unless `key` is already present, in
    /// which case the existing entry is returned untouched.
    pub fn insert(&mut self, key: &P::Key, value: &P::Value) -> Result<NodeRef> {
        self.path.clear();
        let mut place = Place::Root;
        let mut candidate = Id::NIL;
        loop {
            let t = self.arena.get(place);
            if t.is_nil() {
                break;
            }
            let side = if P::less(key, &self.arena.node(t).key) {
                LEFT
            } else {
                candidate = t;
                RIGHT
            };
            self.path.try_reserve(1)?;
            self.path.push((t, side));
            place = Place::Child(t, side);
        }

        if !candidate.is_nil() && Self::matches(&self.arena.node(candidate).key, key) {
            return Ok(self.arena.handle(candidate));
        }

        let depth = self.path.len() + 1;
        let max_height = self.min_weight.max_height();
        if depth > max_height {
            return Err(Error::HeightExceeded { depth, max_height });
        }

        let x = self
            .arena
            .alloc(P::assign_key(key), P::assign_value(value))?;
        self.arena.set(place, x);
        self.weight += 1;

        if self.weight < self.min_weight.at(depth) {
            self.fix_balance(depth);
        }
        Ok(self.arena.handle(x))
    }

    /// Rebuilds the lowest ancestor of the node just inserted at depth `d1`
    /// whose subtree is too light for its height.
    fn fix_balance(&mut self, d1: usize) {
        debug_assert_eq!(self.path.len() + 1, d1);
        let mut w = 2;
        let mut d2 = d1;
        loop {
            d2 -= 1;
            let (t, side) = self.path[d2 - 1];
            let sibling = self.arena.child(t, 1 - side);
            w += self.arena.tree_weight(sibling, &mut self.stack);
            if d2 == 1 || w < self.min_weight.at(d1 - d2 + 1) {
                break;
            }
        }

        let place = if d2 == 1 {
            Place::Root
        } else {
            let (parent, side) = self.path[d2 - 2];
            Place::Child(parent, side)
        };
        tracing::trace!(
            insert_depth = d1,
            rebuild_depth = d2,
            weight = w,
            "rebuilding subtree"
        );
        self.arena.perfect_balance(place, w);
    }

    pub fn get(&self, key: &P::Key) -> Option<NodeRef> {
        let mut t = self.arena.root;
        if P::HAS_EQUAL {
            while !t.is_nil() {
                let node = self.arena.node(t);
                if P::less(key, &node.key) {
                    t = node.ch[LEFT];
                } else if P::equal(key, &node.key) {
                    return Some(self.arena.handle(t));
                } else {
                    t = node.ch[RIGHT];
                }
            }
            return None;
        }

        let mut candidate = Id::NIL;
        while !t.is_nil() {
            let node = self.arena.node(t);
            if P::less(key, &node.key) {
                t = node.ch[LEFT];
            } else {
                candidate = t;
                t = node.ch[RIGHT];
            }
        }
        if !candidate.is_nil() && Self::matches(&self.arena.node(candidate).key, key) {
            Some(self.arena.handle(candidate))
        } else {
            None
        }
    }

    pub fn contains_key(&self, key: &P::Key) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key` if present. Returns whether an entry was removed.
    pub fn remove(&mut self, key: &P::Key) -> bool {
        let mut place = Place::Root;
        let mut candidate: Option<Place> = None;
        let mut last = Place::Root;
        loop {
            let t = self.arena.get(place);
            if t.is_nil() {
                break;
            }
            last = place;
            if P::less(key, &self.arena.node(t).key) {
                place = Place::Child(t, LEFT);
            } else {
                candidate = Some(place);
                place = Place::Child(t, RIGHT);
            }
        }

        let removed = match candidate {
            Some(cand) if Self::matches(&self.arena.node(self.arena.get(cand)).key, key) => {
                self.unlink(cand, last);
                true
            }
            _ => false,
        };

        let allowed = self.config.max_deletions.saturating_mul(self.weight);
        if self.deletions > allowed && self.weight > 3 {
            tracing::debug!(
                deletions = self.deletions,
                weight = self.weight,
                "rebuilding whole tree after deletions"
            );
            self.arena.perfect_balance(Place::Root, self.weight);
            self.deletions = 0;
        }
        removed
    }

    /// Splices out the node at `cand`, moving the last node on the search path
    /// into its position.
    fn unlink(&mut self, cand: Place, last: Place) {
        let victim = self.arena.get(cand);
        let moved = self.arena.get(last);
        if moved == victim {
            let left = self.arena.child(moved, LEFT);
            self.arena.set(last, left);
        } else {
            // The search stepped left from `moved` into an empty link.
            debug_assert!(self.arena.child(moved, LEFT).is_nil());
            let right = self.arena.child(moved, RIGHT);
            self.arena.set(last, right);
            let ch = self.arena.node(victim).ch;
            self.arena.node_mut(moved).ch = ch;
            self.arena.set(cand, moved);
        }
        let node = self.arena.release(victim);
        P::destroy_key(node.key);
        self.weight -= 1;
        self.deletions += 1;
    }

    /// Rebuilds the whole tree into perfect balance.
    pub fn rebalance(&mut self) {
        tracing::debug!(weight = self.weight, "rebalancing whole tree");
        self.arena.perfect_balance(Place::Root, self.weight);
        self.deletions = 0;
    }

    pub fn clear(&mut self) {
        tracing::debug!(len = self.len(), "clearing dictionary");
        self.arena.drain(|node| P::destroy_key(node.key));
        self.weight = 1;
        self.deletions = 0;
    }
}

impl<P: KeyPolicy> Drop for Dictionary<P> {
    fn drop(&mut self) {
        self.clear();
    }
}
