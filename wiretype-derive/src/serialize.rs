use std::collections::HashSet;

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::attribute::{buffer_count_field, is_empty_variant, should_skip_field};

/// Structs have exactly one variant, so their `Serialize`/`Deserialize`
/// bodies are generated by walking the named fields directly (`self.field`)
/// rather than through synstructure's match-arm binding machinery — a
/// buffer pair needs its count field in scope alongside its backing array,
/// which `Structure::filter`'s per-binding exclusion can't provide.
///
/// A buffer pair's count field is folded into its paired array field as one
/// sequence member (§4.3): it's excluded here entirely rather than also
/// written out as an independent member, matching the exclusion in
/// `deserialize_struct`.
fn serialize_struct(s: &synstructure::Structure) -> TokenStream2 {
    assert_eq!(s.variants().len(), 1, "structs must have one variant");
    let fields = match &s.ast().data {
        syn::Data::Struct(data) => &data.fields,
        _ => unreachable!(),
    };

    let count_field_names: HashSet<String> = fields
        .iter()
        .filter_map(|field| buffer_count_field(&field.attrs))
        .map(|ident| ident.to_string())
        .collect();

    let mut member_count = 0usize;
    let mut size_terms = Vec::new();
    let mut write_stmts = Vec::new();

    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .expect("wiretype derives require named fields");

        if count_field_names.contains(&ident.to_string()) {
            continue;
        }

        if should_skip_field(&field.attrs) {
            continue;
        }

        if let Some(count_field) = buffer_count_field(&field.attrs) {
            member_count += 1;
            size_terms.push(quote! {
                size += ::wiretype::Serialize::size(
                    &self.#ident[..(self.#count_field as usize)].to_vec()
                );
            });
            write_stmts.push(quote! {
                ::wiretype::aggregate::write_buffer_pair(
                    &self.#ident[..(self.#count_field as usize)],
                    out,
                )?;
            });
            continue;
        }

        member_count += 1;
        size_terms.push(quote! {
            size += ::wiretype::Serialize::size(&self.#ident);
        });
        write_stmts.push(quote! {
            ::wiretype::Serialize::write(&self.#ident, out)?;
        });
    }

    s.gen_impl(quote! {
        gen impl ::wiretype::Serialize for @Self {
            fn size(&self) -> usize {
                let mut size = ::wiretype::aggregate::structure_header_size(#member_count);
                #(#size_terms)*
                size
            }

            fn prefix(&self) -> u8 {
                ::wiretype::codec::prefix::STRUCTURE
            }

            fn write<O: ::wiretype::Output + ?Sized>(&self, out: &mut O) -> ::core::result::Result<(), ::wiretype::Error> {
                ::wiretype::aggregate::write_structure_header(out, #member_count)?;
                #(#write_stmts)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

/// Generates the `VariantEnum` impl shared by `Serialize` and
/// `Deserialize`'s derives, along with `Serialize` itself (`Deserialize`'s
/// derive generates the matching `Deserialize` impl separately, since
/// `read_variant` needs per-variant constructors `Serialize` has no use
/// for).
pub(crate) fn variant_enum_impl(s: &synstructure::Structure) -> TokenStream2 {
    assert!(!s.variants().is_empty(), "got invalid empty enum");

    let arms_index = s.variants().iter().enumerate().map(|(i, v)| {
        let pat = v.pat();
        if is_empty_variant(&v.ast().attrs) {
            quote! { #pat => -1i32 }
        } else {
            let idx = i as i32;
            quote! { #pat => #idx }
        }
    });

    let arms_size = s.variants().iter().map(|v| {
        let pat = v.pat();
        if is_empty_variant(&v.ast().attrs) {
            quote! { #pat => ::wiretype::sum::EMPTY_VARIANT_SIZE }
        } else {
            let bindings = v.bindings();
            assert_eq!(
                bindings.len(),
                1,
                "non-empty variant must hold exactly one payload"
            );
            let binding = &bindings[0];
            quote! { #pat => ::wiretype::Serialize::size(#binding) }
        }
    });

    let arms_write = s.variants().iter().map(|v| {
        let pat = v.pat();
        if is_empty_variant(&v.ast().attrs) {
            quote! { #pat => ::wiretype::sum::write_empty_variant(out) }
        } else {
            let bindings = v.bindings();
            let binding = &bindings[0];
            quote! { #pat => ::wiretype::Serialize::write(#binding, out) }
        }
    });

    // `read_variant` is generated here too, alongside the write-side arms,
    // since `VariantEnum` is one trait and can only be implemented once for
    // a given type: the `Deserialize` derive can't add a second impl block
    // supplying just this method. Its derive instead emits only the
    // concrete `Deserialize for EnumName`, delegating to `sum::read_variant`.
    let arms_read = s.variants().iter().enumerate().map(|(i, v)| {
        let construct = v.construct(|_, _| quote! { unreachable!() });
        let _ = construct;
        let path = &v.ast().ident;
        if is_empty_variant(&v.ast().attrs) {
            quote! {
                -1 => {
                    let p = input.read_byte()?;
                    if p != ::wiretype::codec::prefix::NIL {
                        return ::core::result::Result::Err(::wiretype::Error::BadFormat(p));
                    }
                    ::core::result::Result::Ok(Self::#path)
                }
            }
        } else {
            let idx = i as i32;
            let bindings = v.bindings();
            assert_eq!(
                bindings.len(),
                1,
                "non-empty variant must hold exactly one payload"
            );
            let payload_ty = &bindings[0].ast().ty;
            quote! {
                #idx => ::core::result::Result::Ok(
                    Self::#path(<#payload_ty as ::wiretype::Deserialize>::read(input)?)
                )
            }
        }
    });

    s.gen_impl(quote! {
        gen impl ::wiretype::sum::VariantEnum for @Self {
            fn variant_index(&self) -> i32 {
                match self { #(#arms_index,)* }
            }

            fn variant_payload_size(&self) -> usize {
                match self { #(#arms_size,)* }
            }

            fn write_variant_payload<O: ::wiretype::Output + ?Sized>(&self, out: &mut O) -> ::core::result::Result<(), ::wiretype::Error> {
                match self { #(#arms_write,)* }
            }

            fn read_variant<I: ::wiretype::Input + ?Sized>(index: i32, input: &mut I) -> ::core::result::Result<Self, ::wiretype::Error> {
                match index {
                    #(#arms_read,)*
                    _ => ::core::result::Result::Err(::wiretype::Error::UnexpectedVariantType),
                }
            }
        }
    })
}

fn serialize_enum(s: &synstructure::Structure) -> TokenStream2 {
    let variant_enum_impl = variant_enum_impl(s);
    let name = &s.ast().ident;
    let (impl_generics, ty_generics, where_clause) = s.ast().generics.split_for_impl();
    quote! {
        #variant_enum_impl

        impl #impl_generics ::wiretype::Serialize for #name #ty_generics #where_clause {
            fn size(&self) -> usize {
                ::wiretype::sum::variant_size(self)
            }

            fn prefix(&self) -> u8 {
                ::wiretype::codec::prefix::VARIANT
            }

            fn write<O: ::wiretype::Output + ?Sized>(&self, out: &mut O) -> ::core::result::Result<(), ::wiretype::Error> {
                ::wiretype::sum::write_variant(self, out)
            }
        }
    }
}

/// Derives `Serialize` for the given `struct` or `enum`.
pub fn serialize_derive(s: synstructure::Structure) -> TokenStream2 {
    match s.ast().data {
        syn::Data::Struct(_) => serialize_struct(&s),
        syn::Data::Enum(_) => serialize_enum(&s),
        _ => panic!("can't derive `Serialize` for unions"),
    }
}
