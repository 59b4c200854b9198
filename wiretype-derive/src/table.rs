use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::attribute::{is_deprecated_entry, table_entry_id};

/// Derives `Table` plus the concrete `Serialize`/`Deserialize` pair for a
/// struct whose fields each carry a permanent `#[wire(id = N)]` (§4.5). A
/// field is emitted only when it differs from its `Default` value, so the
/// struct must also derive `Default` and its field types must be
/// `PartialEq` — the derive can't otherwise tell a populated field from an
/// absent one.
pub fn table_derive(s: synstructure::Structure) -> TokenStream2 {
    assert_eq!(s.variants().len(), 1, "tables must have one variant");
    let name = s.ast().ident.to_string();
    let fields = match &s.ast().data {
        syn::Data::Struct(data) => &data.fields,
        _ => panic!("can't derive `Table` for an enum or union"),
    };

    let mut known_ids = Vec::new();
    let mut deprecated_ids = Vec::new();
    let mut active_pushes = Vec::new();
    let mut apply_arms = Vec::new();

    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .expect("wiretype derives require named fields");
        let ty = &field.ty;
        let deprecated = is_deprecated_entry(&field.attrs);
        let id = table_entry_id(&field.attrs)
            .unwrap_or_else(|| panic!("table field `{ident}` is missing #[wire(id = N)]"));

        known_ids.push(id);
        if deprecated {
            deprecated_ids.push(id);
            continue;
        }

        active_pushes.push(quote! {
            if self.#ident != ::core::default::Default::default() {
                entries.push(::wiretype::table::TableEntry {
                    id: #id,
                    declared_size: ::wiretype::Serialize::size(&self.#ident) as u64,
                    payload: ::wiretype::Serialize::to_bytes(&self.#ident)?,
                });
            }
        });
        apply_arms.push(quote! {
            #id => { self.#ident = <#ty as ::wiretype::Deserialize>::from_bytes(payload)?; }
        });
    }

    let wrapper_impl = s.gen_impl(quote! {
        gen impl ::wiretype::table::Table for @Self {
            const NAME: &'static str = #name;

            fn active_entries(&self) -> ::core::result::Result<::std::vec::Vec<::wiretype::table::TableEntry>, ::wiretype::Error> {
                let mut entries = ::std::vec::Vec::new();
                #(#active_pushes)*
                ::core::result::Result::Ok(entries)
            }

            fn apply_entry(&mut self, id: u64, payload: &[u8]) -> ::core::result::Result<(), ::wiretype::Error> {
                match id {
                    #(#apply_arms)*
                    _ => {}
                }
                ::core::result::Result::Ok(())
            }

            fn deprecated_ids() -> &'static [u64] {
                &[#(#deprecated_ids),*]
            }

            fn known_ids() -> &'static [u64] {
                &[#(#known_ids),*]
            }
        }
    });

    let codec_impl = s.gen_impl(quote! {
        gen impl ::wiretype::Serialize for @Self {
            fn size(&self) -> usize {
                ::wiretype::table::table_size(self).unwrap_or(0)
            }

            fn prefix(&self) -> u8 {
                ::wiretype::codec::prefix::TABLE
            }

            fn write<O: ::wiretype::Output + ?Sized>(&self, out: &mut O) -> ::core::result::Result<(), ::wiretype::Error> {
                ::wiretype::table::write_table(self, out)
            }
        }
    });

    let deserialize_impl = s.gen_impl(quote! {
        gen impl ::wiretype::Deserialize for @Self {
            fn matches(prefix: u8) -> bool {
                prefix == ::wiretype::codec::prefix::TABLE
            }

            fn read<I: ::wiretype::Input + ?Sized>(input: &mut I) -> ::core::result::Result<Self, ::wiretype::Error> {
                ::wiretype::table::read_table(input)
            }
        }
    });

    quote! {
        #wrapper_impl
        #codec_impl
        #deserialize_impl
    }
}
