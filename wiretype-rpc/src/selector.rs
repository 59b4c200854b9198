//! Method selector hashing (§4.8): a 32- or 64-bit SipHash of the method
//! name folded with the owning interface's own namespace hash.

use siphasher::sip::SipHasher24;
use std::hash::Hasher;

/// Selector width an interface is declared with. Fixed per interface, not
/// per method — mixing widths within one interface would make the
/// receiver's dispatch table ambiguous about how many selector bytes to
/// read off the wire before the argument tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorWidth {
    Bits32,
    Bits64,
}

/// SipHash-2-4 of an interface's own name, folded into every method
/// selector it declares. Reuses the same fixed-key construction as the
/// table format's namespace guard (§4.5) — both exist to distinguish
/// unrelated wire shapes from each other, not to resist a hostile peer.
pub fn interface_hash(name: &str) -> u64 {
    wiretype::table::namespace_hash(name)
}

/// Selector for `method_name` within an interface whose hash is
/// `interface_hash`, truncated to `width`. A 32-bit selector keeps the
/// low 32 bits of the full 64-bit hash.
pub fn method_selector(width: SelectorWidth, interface_hash: u64, method_name: &str) -> u64 {
    let mut hasher = SipHasher24::new_with_keys(interface_hash, interface_hash.rotate_left(32));
    hasher.write(method_name.as_bytes());
    let full = hasher.finish();
    match width {
        SelectorWidth::Bits64 => full,
        SelectorWidth::Bits32 => full & 0xffff_ffff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_is_stable_and_width_dependent() {
        let hash = interface_hash("Calculator");
        let s64 = method_selector(SelectorWidth::Bits64, hash, "add");
        let s32 = method_selector(SelectorWidth::Bits32, hash, "add");
        assert_eq!(s64, method_selector(SelectorWidth::Bits64, hash, "add"));
        assert_eq!(s32, s64 & 0xffff_ffff);
    }

    #[test]
    fn distinct_methods_select_differently() {
        let hash = interface_hash("Calculator");
        let add = method_selector(SelectorWidth::Bits64, hash, "add");
        let reset = method_selector(SelectorWidth::Bits64, hash, "reset");
        assert_ne!(add, reset);
    }

    #[test]
    fn distinct_interfaces_select_differently_for_same_method_name() {
        let a = method_selector(SelectorWidth::Bits64, interface_hash("Calculator"), "call");
        let b = method_selector(SelectorWidth::Bits64, interface_hash("Logger"), "call");
        assert_ne!(a, b);
    }
}
