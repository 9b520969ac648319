//! Shape-only restructuring: rotations, vine compaction and perfect rebuilding.
//!
//! None of these change the key set or the in-order sequence of the subtree
//! they are applied to.

use crate::arena::{Arena, Id, LEFT, Place, RIGHT};

impl<K, V> Arena<K, V> {
    /// Promotes the right child of the subtree at `place`.
    pub(crate) fn rotate_left(&mut self, place: Place) {
        let t = self.get(place);
        let r = self.child(t, RIGHT);
        debug_assert!(!r.is_nil());
        self.node_mut(t).ch[RIGHT] = self.child(r, LEFT);
        self.node_mut(r).ch[LEFT] = t;
        self.set(place, r);
    }

    /// Promotes the left child of the subtree at `place`.
    pub(crate) fn rotate_right(&mut self, place: Place) {
        let t = self.get(place);
        let l = self.child(t, LEFT);
        debug_assert!(!l.is_nil());
        self.node_mut(t).ch[LEFT] = self.child(l, RIGHT);
        self.node_mut(l).ch[RIGHT] = t;
        self.set(place, l);
    }

    /// Turns the subtree at `place` into a vine: a right-only chain in key order.
    pub(crate) fn skew(&mut self, mut place: Place) {
        loop {
            let mut t = self.get(place);
            if t.is_nil() {
                return;
            }
            while !self.child(t, LEFT).is_nil() {
                self.rotate_right(place);
                t = self.get(place);
            }
            place = Place::Child(t, RIGHT);
        }
    }

    /// Shortens a vine of length `p1` to one of length `p2` with `p1 - p2` left
    /// rotations, spaced evenly along the vine.
    pub(crate) fn split(&mut self, mut place: Place, p1: usize, p2: usize) {
        debug_assert!(p2 <= p1);
        let incr = p1 - p2;
        let mut count = 0;
        for _ in 0..p2 {
            count += incr;
            if count >= p2 {
                self.rotate_left(place);
                count -= p2;
            }
            place = Place::Child(self.get(place), RIGHT);
        }
    }

    /// Rebuilds the subtree at `place`, of weight `w`, into a tree of height
    /// `ceil(log2 w)` whose levels are all full except possibly the last.
    pub(crate) fn perfect_balance(&mut self, place: Place, w: usize) {
        self.skew(place);
        if w < 2 {
            return;
        }
        let mut b = 1_usize << w.ilog2();
        if b != w {
            self.split(place, w - 1, b - 1);
        }
        while b > 2 {
            self.split(place, b - 1, b / 2 - 1);
            b /= 2;
        }
    }

    /// Number of nodes below `root`, plus one.
    pub(crate) fn tree_weight(&self, root: Id, stack: &mut Vec<Id>) -> usize {
        stack.clear();
        let mut w = 1;
        let mut t = root;
        while !t.is_nil() {
            while !self.child(t, LEFT).is_nil() {
                w += 1;
                let r = self.child(t, RIGHT);
                if !r.is_nil() {
                    stack.push(r);
                }
                t = self.child(t, LEFT);
            }
            w += 1;
            let r = self.child(t, RIGHT);
            t = if r.is_nil() {
                stack.pop().unwrap_or(Id::NIL)
            } else {
                r
            };
        }
        w
    }

    /// Number of levels below `root` (0 for an empty subtree).
    pub(crate) fn height(&self, root: Id) -> usize {
        if root.is_nil() {
            return 0;
        }
        let mut best = 0;
        let mut stack = vec![(root, 1_usize)];
        while let Some((t, depth)) = stack.pop() {
            best = best.max(depth);
            for side in [LEFT, RIGHT] {
                let c = self.child(t, side);
                if !c.is_nil() {
                    stack.push((c, depth + 1));
                }
            }
        }
        best
    }
}
