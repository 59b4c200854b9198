use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

/// Derives `ValueWrapper` plus the concrete `Serialize`/`Deserialize` pair
/// for a single-field struct that elides `Structure` framing and encodes
/// identically to its one member (§4.3, "value wrapper").
pub fn value_wrapper_derive(s: synstructure::Structure) -> TokenStream2 {
    assert_eq!(s.variants().len(), 1, "value wrappers must have one variant");
    let fields = match &s.ast().data {
        syn::Data::Struct(data) => &data.fields,
        _ => panic!("can't derive `ValueWrapper` for an enum or union"),
    };
    assert_eq!(
        fields.iter().count(),
        1,
        "a value wrapper must have exactly one field"
    );
    let field = fields.iter().next().unwrap();
    let inner_ty = &field.ty;

    let (access, construct) = match &field.ident {
        Some(ident) => (quote! { &self.#ident }, quote! { Self { #ident: inner } }),
        None => (quote! { &self.0 }, quote! { Self(inner) }),
    };

    let wrapper_impl = s.gen_impl(quote! {
        gen impl ::wiretype::aggregate::ValueWrapper for @Self {
            type Inner = #inner_ty;

            fn inner(&self) -> &Self::Inner {
                #access
            }

            fn from_inner(inner: Self::Inner) -> Self {
                #construct
            }
        }
    });

    let codec_impl = s.gen_impl(quote! {
        gen impl ::wiretype::Serialize for @Self {
            fn size(&self) -> usize {
                ::wiretype::Serialize::size(::wiretype::aggregate::ValueWrapper::inner(self))
            }

            fn prefix(&self) -> u8 {
                ::wiretype::Serialize::prefix(::wiretype::aggregate::ValueWrapper::inner(self))
            }

            fn write<O: ::wiretype::Output + ?Sized>(&self, out: &mut O) -> ::core::result::Result<(), ::wiretype::Error> {
                ::wiretype::aggregate::write_value_wrapper(self, out)
            }
        }
    });

    let deserialize_impl = s.gen_impl(quote! {
        gen impl ::wiretype::Deserialize for @Self {
            fn matches(prefix: u8) -> bool {
                <#inner_ty as ::wiretype::Deserialize>::matches(prefix)
            }

            fn read<I: ::wiretype::Input + ?Sized>(input: &mut I) -> ::core::result::Result<Self, ::wiretype::Error> {
                ::wiretype::aggregate::read_value_wrapper(input)
            }
        }
    });

    quote! {
        #wrapper_impl
        #codec_impl
        #deserialize_impl
    }
}
