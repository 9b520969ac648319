use std::fmt;
use std::marker::PhantomData;

use crate::arena::{Id, LEFT, RIGHT};
use crate::config::{DUMP_DEPTH, SCREEN_WIDTH};
use crate::dict::Dictionary;
use crate::policy::KeyPolicy;

/// Sideways picture of the top [`DUMP_DEPTH`] levels: one key per line in key
/// order, deeper keys further left.
pub struct Dump<'a, P: KeyPolicy> {
    dict: &'a Dictionary<P>,
}

struct KeyFmt<'a, P: KeyPolicy>(&'a P::Key, PhantomData<P>);

impl<P: KeyPolicy> fmt::Display for KeyFmt<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        P::fmt_key(self.0, f)
    }
}

impl<P: KeyPolicy> Dictionary<P> {
    pub fn dump(&self) -> Dump<'_, P> {
        Dump { dict: self }
    }
}

impl<P: KeyPolicy> fmt::Display for Dump<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arena = &self.dict.arena;
        let mut stack: Vec<(Id, usize)> = Vec::new();
        let mut t = arena.root;
        let mut depth = 0;
        loop {
            while !t.is_nil() && depth < DUMP_DEPTH {
                stack.push((t, depth));
                t = arena.child(t, LEFT);
                depth += 1;
            }
            let Some((x, d)) = stack.pop() else {
                return Ok(());
            };
            let text = KeyFmt::<P>(&arena.node(x).key, PhantomData).to_string();
            let width = SCREEN_WIDTH.saturating_sub(d * 4 + 4);
            writeln!(f, "{text:>width$}")?;
            t = arena.child(x, RIGHT);
            depth = d + 1;
        }
    }
}
