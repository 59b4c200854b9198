//! A compile-time-directed binary wire format: a single tagged prefix
//! byte per value, integer width promotion, byte-packed sequences,
//! versioned tables, sum types, handle references and an RPC layer built
//! on top. See each module for its corresponding section of the format.

pub mod aggregate;
pub mod bounded;
pub mod codec;
pub mod container;
mod error;
pub mod fungible;
pub mod handle;
pub mod io;
pub mod sum;
pub mod table;
mod traits;

pub use error::Error;
pub use io::{Input, Output};
pub use traits::{Deserialize, Serialize};

#[cfg(feature = "derive")]
pub use wiretype_derive::{Deserialize, Serialize, Table, ValueWrapper};
