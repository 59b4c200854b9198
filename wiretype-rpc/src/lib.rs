//! Transport-agnostic RPC layer (§4.8) over the `wiretype` wire format:
//! method selector hashing, a selector-keyed dispatch table, and the
//! `interface!` macro that ties a declared interface's selectors to a
//! typed client stub.

pub mod dispatch;
pub mod interface;
pub mod selector;
pub mod transport;

pub use dispatch::Dispatcher;

/// Re-exported so the `interface!` macro can refer to `$crate::wiretype`
/// from the crate that invokes it, without that crate needing its own
/// direct `wiretype` dependency.
pub use wiretype;
