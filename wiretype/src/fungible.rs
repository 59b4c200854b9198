//! Fungibility engine (§4.7): a compile-time-only check that two local
//! types produce identical byte sequences for every value they jointly
//! represent, so a handler can be bound to an RPC method (or one type
//! assigned into another's field) without risking a runtime format
//! mismatch.
//!
//! `Fungible<Other>` carries no data and no methods; its only job is to
//! exist or not exist for a given `(Self, Other)` pair. A failed bound
//! (`T: Fungible<U>`) is a compile error at the call site, matching the
//! spec's preference for a compile-time failure over a runtime one.
//!
//! There is deliberately no blanket `impl<T> Fungible<T> for T`: it would
//! overlap with the container rules below the moment a container's two
//! type parameters are instantiated equal (`Vec<u32>: Fungible<Vec<u32>>`
//! would then be reachable through both the blanket and the `Vec`/`Vec`
//! rule). Instead the "A == B" base case is spelled out per concrete type
//! — [`impl_fungible_self`] does this for a type this crate doesn't
//! itself define; the primitives below use it directly, and
//! `#[derive(Serialize, Deserialize)]` emits the same for every locally
//! derived aggregate and variant.

use std::collections::HashMap;
use std::hash::Hash;

use crate::codec::WireChar;

/// `Self` and `Other` encode identically for every value they jointly
/// represent.
pub trait Fungible<Other: ?Sized> {}

/// Declares `$t: Fungible<$t>` — the "A == B" base case for a type not
/// itself covered by a more specific rule in this module.
#[macro_export]
macro_rules! impl_fungible_self {
    ($t:ty) => {
        impl $crate::fungible::Fungible<$t> for $t {}
    };
}

impl_fungible_self!(u8);
impl_fungible_self!(u16);
impl_fungible_self!(u32);
impl_fungible_self!(u64);
impl_fungible_self!(i8);
impl_fungible_self!(i16);
impl_fungible_self!(i32);
impl_fungible_self!(i64);
impl_fungible_self!(f32);
impl_fungible_self!(f64);
impl_fungible_self!(bool);
impl_fungible_self!(String);
impl_fungible_self!(WireChar);

/// Ordered-sequence containers of fungible element type are mutually
/// fungible (vector ↔ array ↔ C-array, element-wise equal length —
/// length is a runtime property, so only the element type is checked
/// here).
impl<A, B> Fungible<Vec<B>> for Vec<A> where A: Fungible<B> {}
impl<A, B, const N: usize> Fungible<[B; N]> for Vec<A> where A: Fungible<B> {}
impl<A, B, const N: usize> Fungible<Vec<B>> for [A; N] where A: Fungible<B> {}
impl<A, B, const N: usize> Fungible<[B; N]> for [A; N] where A: Fungible<B> {}

/// Map containers with fungible K, V are fungible regardless of hashing
/// or ordering.
impl<K1, V1, K2, V2> Fungible<HashMap<K2, V2>> for HashMap<K1, V1>
where
    K1: Fungible<K2> + Eq + Hash,
    K2: Eq + Hash,
    V1: Fungible<V2>,
{
}

/// Optional(A) ↔ Optional(B) iff A ↔ B.
impl<A, B> Fungible<Option<B>> for Option<A> where A: Fungible<B> {}

/// Pair(A,B), Tuple(A,B) are mutually fungible element-wise.
macro_rules! impl_tuple_fungible {
    ($($a:ident = $b:ident),+) => {
        impl<$($a, $b),+> Fungible<($($b,)+)> for ($($a,)+)
        where
            $($a: Fungible<$b>),+
        {
        }
    };
}

impl_tuple_fungible!(A1 = B1);
impl_tuple_fungible!(A1 = B1, A2 = B2);
impl_tuple_fungible!(A1 = B1, A2 = B2, A3 = B3);
impl_tuple_fungible!(A1 = B1, A2 = B2, A3 = B3, A4 = B4);
impl_tuple_fungible!(A1 = B1, A2 = B2, A3 = B3, A4 = B4, A5 = B5);
impl_tuple_fungible!(A1 = B1, A2 = B2, A3 = B3, A4 = B4, A5 = B5, A6 = B6);

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_fungible<A: Fungible<B>, B>() {}

    #[test]
    fn identical_primitives_are_fungible() {
        assert_fungible::<u32, u32>();
        assert_fungible::<String, String>();
    }

    #[test]
    fn containers_of_fungible_elements_are_fungible() {
        assert_fungible::<Vec<u32>, Vec<u32>>();
        assert_fungible::<Vec<u32>, [u32; 4]>();
        assert_fungible::<[u32; 4], Vec<u32>>();
        assert_fungible::<Option<u32>, Option<u32>>();
        assert_fungible::<(u32, u8), (u32, u8)>();
        assert_fungible::<HashMap<u32, u8>, HashMap<u32, u8>>();
    }

    #[test]
    fn local_type_can_opt_into_self_fungibility() {
        struct Meters(f64);
        impl_fungible_self!(Meters);
        assert_fungible::<Meters, Meters>();
        assert_fungible::<Vec<Meters>, Vec<Meters>>();
    }

    // Types that are NOT fungible (e.g. `u32` and `u64`) simply have no
    // `Fungible` impl between them; there is no negative test to write
    // here beyond "this wouldn't compile," which is exercised by every
    // caller of `assert_fungible` that *does* compile.
}
