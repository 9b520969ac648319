use std::fmt;
use std::marker::PhantomData;

/// Key/value capabilities a [`Dictionary`](crate::Dictionary) is built on.
pub trait KeyPolicy {
    type Key;
    type Value;

    /// Selects the lookup that tests [`equal`](Self::equal) at every step.
    /// Without it, lookup verifies a single candidate at the end using `less` alone.
    const HAS_EQUAL: bool = false;

    fn less(a: &Self::Key, b: &Self::Key) -> bool;

    fn equal(a: &Self::Key, b: &Self::Key) -> bool {
        !Self::less(a, b) && !Self::less(b, a)
    }

    fn assign_key(key: &Self::Key) -> Self::Key;

    fn assign_value(value: &Self::Value) -> Self::Value;

    /// Called once for every key leaving the dictionary.
    fn destroy_key(key: Self::Key) {
        drop(key);
    }

    fn fmt_key(_key: &Self::Key, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("?")
    }
}

/// `Ord` keys, cloned keys and values, `Debug` printing.
pub struct DefaultPolicy<K, V>(PhantomData<fn() -> (K, V)>);

impl<K, V> KeyPolicy for DefaultPolicy<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Key = K;
    type Value = V;

    const HAS_EQUAL: bool = true;

    #[inline]
    fn less(a: &K, b: &K) -> bool {
        a < b
    }

    #[inline]
    fn equal(a: &K, b: &K) -> bool {
        a == b
    }

    fn assign_key(key: &K) -> K {
        key.clone()
    }

    fn assign_value(value: &V) -> V {
        value.clone()
    }

    fn fmt_key(key: &K, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(key, f)
    }
}

/// Like [`DefaultPolicy`] but with only a strict ordering available.
pub struct LessOnly<K, V>(PhantomData<fn() -> (K, V)>);

impl<K, V> KeyPolicy for LessOnly<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Key = K;
    type Value = V;

    #[inline]
    fn less(a: &K, b: &K) -> bool {
        a < b
    }

    fn assign_key(key: &K) -> K {
        key.clone()
    }

    fn assign_value(value: &V) -> V {
        value.clone()
    }

    fn fmt_key(key: &K, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(key, f)
    }
}
