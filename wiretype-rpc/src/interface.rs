//! The `interface!` declarative macro (§4.8): declares an RPC interface as
//! a zero-sized marker type carrying one selector-computing associated
//! function, and one typed call helper module, per method.
//!
//! An interface is declared by the host crate, not derived from an
//! existing data type, so this is `macro_rules!` rather than the
//! `synstructure`-based derives in `wiretype-derive`.
//!
//! ```ignore
//! wiretype_rpc::interface! {
//!     interface Calculator: Bits32 {
//!         fn add(a: f32, b: f32) -> f32;
//!         fn reset() -> ();
//!     }
//! }
//!
//! // client side
//! let result = Calculator::add::call(&mut sender, &mut receiver, 2.0, 3.0)?;
//!
//! // server side
//! let mut dispatcher = wiretype_rpc::dispatch::Dispatcher::new();
//! dispatcher.bind(Calculator::add(), |_: &(), (a, b): (f32, f32)| a + b)?;
//! ```
#[macro_export]
macro_rules! interface {
    (
        interface $name:ident : $width:ident {
            $(
                fn $method:ident ( $( $arg:ident : $arg_ty:ty ),* $(,)? ) -> $ret:ty ;
            )*
        }
    ) => {
        /// Zero-sized marker for the interface's selector namespace.
        pub struct $name;

        impl $name {
            /// SipHash of the interface's own name (§4.8), folded into
            /// every method's selector below.
            pub fn interface_hash() -> u64 {
                $crate::selector::interface_hash(stringify!($name))
            }

            $(
                #[allow(non_snake_case)]
                pub fn $method() -> u64 {
                    $crate::selector::method_selector(
                        $crate::selector::SelectorWidth::$width,
                        Self::interface_hash(),
                        stringify!($method),
                    )
                }
            )*
        }

        $(
            #[allow(non_snake_case)]
            pub mod $method {
                use super::*;

                /// Writes this method's selector and argument tuple to
                /// `sender`, then blocks reading its return value off
                /// `receiver`.
                pub fn call<Out, In>(
                    sender: &mut Out,
                    receiver: &mut In,
                    $( $arg: $arg_ty, )*
                ) -> ::core::result::Result<$ret, $crate::wiretype::Error>
                where
                    Out: $crate::wiretype::Output + ?Sized,
                    In: $crate::wiretype::Input + ?Sized,
                {
                    $crate::transport::call(
                        $crate::selector::SelectorWidth::$width,
                        super::$name::$method(),
                        ( $( $arg, )* ),
                        sender,
                        receiver,
                    )
                }
            }
        )*
    };
}
