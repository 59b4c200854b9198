//! Derive macros for `wiretype`: `Serialize`/`Deserialize` for structs
//! (`Structure`) and enums (`Variant`), plus `ValueWrapper` and `Table` for
//! the two specialized aggregate shapes.
//!
//! Grounded on the same `synstructure` decl-derive/attribute-parsing style
//! as `fuel-derive`'s `canonical` derives.

mod attribute;
mod deserialize;
mod serialize;
mod table;
mod value_wrapper;

use synstructure::decl_derive;

decl_derive!([Serialize, attributes(wire)] => serialize::serialize_derive);
decl_derive!([Deserialize, attributes(wire)] => deserialize::deserialize_derive);
decl_derive!([ValueWrapper] => value_wrapper::value_wrapper_derive);
decl_derive!([Table, attributes(wire)] => table::table_derive);
