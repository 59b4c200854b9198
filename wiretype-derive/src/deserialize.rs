use std::collections::HashSet;

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::Ident;

use crate::attribute::{buffer_count_field, is_unbounded_buffer, should_skip_field};

/// Structs have exactly one variant, so their decode body is generated by
/// walking the named fields directly: a `let`-prologue builds each field's
/// value in declaration order, then a final `Self { .. }` assembles them.
/// A buffer pair's count field is declared (as a mutable local) ahead of
/// every other field, since its value comes from the paired array field's
/// own decode rather than an independent read — the two together are one
/// sequence member (§4.3), so the count field is excluded from both
/// `member_count` and its own `read` call.
fn deserialize_struct(s: &synstructure::Structure) -> TokenStream2 {
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
    let mut prologue = Vec::new();
    let mut field_idents = Vec::new();

    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .expect("wiretype derives require named fields");
        if count_field_names.contains(&ident.to_string()) {
            let ty = &field.ty;
            prologue.push(quote! {
                let mut #ident: #ty = ::core::default::Default::default();
            });
        }
    }

    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .expect("wiretype derives require named fields");
        let ty = &field.ty;
        field_idents.push(ident.clone());

        if count_field_names.contains(&ident.to_string()) {
            // Populated by its paired buffer field's block below.
            continue;
        }

        if should_skip_field(&field.attrs) {
            prologue.push(quote! {
                let #ident: #ty = ::core::default::Default::default();
            });
            continue;
        }

        if let Some(count_field) = buffer_count_field(&field.attrs) {
            let unbounded = is_unbounded_buffer(&field.attrs);
            member_count += 1;
            prologue.push(buffer_field_init(ident, &count_field, ty, unbounded));
            continue;
        }

        member_count += 1;
        prologue.push(quote! {
            let #ident: #ty = <#ty as ::wiretype::Deserialize>::read(input)?;
        });
    }

    s.gen_impl(quote! {
        gen impl ::wiretype::Deserialize for @Self {
            fn matches(prefix: u8) -> bool {
                prefix == ::wiretype::codec::prefix::STRUCTURE
            }

            fn read<I: ::wiretype::Input + ?Sized>(input: &mut I) -> ::core::result::Result<Self, ::wiretype::Error> {
                ::wiretype::aggregate::read_structure_header(input, #member_count)?;
                #(#prologue)*
                ::core::result::Result::Ok(Self { #(#field_idents),* })
            }
        }
    })
}

/// A logical buffer pair's count field is populated from the decoded
/// sequence's own length, not read independently; the backing field is
/// then filled from the same elements, truncated (bounded) or grown via
/// `Vec` (unbounded) to the element type's capacity. The backing array is
/// built with the `[expr; N]` repeat form rather than `Default::default()`,
/// matching the fixed-array `Deserialize` impl this delegates to — `[T; N]`
/// only has a blanket `Default` impl for `T: Copy`, while the repeat form
/// works for any `N`.
fn buffer_field_init(
    ident: &Ident,
    count_field: &Ident,
    ty: &syn::Type,
    unbounded: bool,
) -> TokenStream2 {
    let array = match ty {
        syn::Type::Array(array) => array,
        _ => panic!("#[wire(buffer(...))] field must be a fixed-size array"),
    };
    let elem_ty = &array.elem;
    let len = &array.len;
    quote! {
        let #ident: #ty = {
            let elements = ::wiretype::aggregate::read_buffer_pair::<#elem_ty, I>(
                input,
                #len,
                #unbounded,
            )?;
            #count_field = elements.len() as _;
            let mut backing: #ty = [<#elem_ty as ::core::default::Default>::default(); #len];
            for (slot, value) in backing.iter_mut().zip(elements.into_iter()) {
                *slot = value;
            }
            backing
        };
    }
}

/// The full `VariantEnum` impl, including `read_variant`, is generated
/// alongside `Serialize`'s derive (see `serialize::variant_enum_impl`) —
/// a trait can't be implemented twice for one type, so this derive only
/// needs to emit the concrete `Deserialize` impl delegating into it.
fn deserialize_enum(s: &synstructure::Structure) -> TokenStream2 {
    s.gen_impl(quote! {
        gen impl ::wiretype::Deserialize for @Self {
            fn matches(prefix: u8) -> bool {
                prefix == ::wiretype::codec::prefix::VARIANT
            }

            fn read<I: ::wiretype::Input + ?Sized>(input: &mut I) -> ::core::result::Result<Self, ::wiretype::Error> {
                ::wiretype::sum::read_variant::<Self, I>(input)
            }
        }
    })
}

/// Derives `Deserialize` for the given `struct` or `enum`.
pub fn deserialize_derive(s: synstructure::Structure) -> TokenStream2 {
    match s.ast().data {
        syn::Data::Struct(_) => deserialize_struct(&s),
        syn::Data::Enum(_) => deserialize_enum(&s),
        _ => panic!("can't derive `Deserialize` for unions"),
    }
}
