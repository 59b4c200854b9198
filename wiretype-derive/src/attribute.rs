//! Parsing for the `#[wire(...)]` attribute family.

use proc_macro2::{TokenStream, TokenTree};
use syn::{AttrStyle, Attribute, Meta};

fn wire_tokens(attrs: &[Attribute]) -> Vec<TokenTree> {
    let mut tokens = Vec::new();
    for attr in attrs {
        if attr.style != AttrStyle::Outer {
            continue;
        }
        if let Meta::List(ml) = &attr.meta {
            if ml.path.segments.len() == 1 && ml.path.segments[0].ident == "wire" {
                tokens.extend(ml.tokens.clone());
            }
        }
    }
    tokens
}

/// `#[wire(skip)]` on a struct field: excluded from the wire entirely,
/// filled in from `Default` on decode.
pub fn should_skip_field(attrs: &[Attribute]) -> bool {
    has_flag(attrs, "skip")
}

/// `#[wire(empty)]` on a unit enum variant: the sum type's distinguished
/// empty state (index `-1`, `Nil` payload).
pub fn is_empty_variant(attrs: &[Attribute]) -> bool {
    has_flag(attrs, "empty")
}

fn has_flag(attrs: &[Attribute], flag: &str) -> bool {
    wire_tokens(attrs)
        .iter()
        .any(|tt| matches!(tt, TokenTree::Ident(ident) if ident == flag))
}

/// `#[wire(buffer(count = "field_name"))]` on a fixed-size array field: it
/// and `field_name` together form a logical buffer pair (§4.3). Returns
/// the paired count field's identifier.
pub fn buffer_count_field(attrs: &[Attribute]) -> Option<syn::Ident> {
    let tokens = wire_tokens(attrs);
    let mut iter = tokens.into_iter().peekable();
    while let Some(tt) = iter.next() {
        if let TokenTree::Ident(ident) = &tt {
            if ident == "buffer" {
                if let Some(TokenTree::Group(group)) = iter.peek() {
                    let inner: Vec<TokenTree> = group.stream().into_iter().collect();
                    return parse_count_ident(&inner);
                }
            }
        }
    }
    None
}

fn parse_count_ident(tokens: &[TokenTree]) -> Option<syn::Ident> {
    for window in tokens.windows(3) {
        if let [TokenTree::Ident(key), TokenTree::Punct(eq), TokenTree::Literal(lit)] = window {
            if key == "count" && eq.as_char() == '=' {
                let raw = lit.to_string();
                let name = raw.trim_matches('"');
                return Some(syn::Ident::new(name, key.span()));
            }
        }
    }
    None
}

/// `#[wire(unbounded)]` alongside `#[wire(buffer(...))]`: the decoder
/// accepts a wire count past the backing array's declared length.
pub fn is_unbounded_buffer(attrs: &[Attribute]) -> bool {
    has_flag(attrs, "unbounded")
}

/// `#[wire(id = N)]` on a table struct's field: the entry id under which
/// it's framed on the wire. Panics if missing — every table field must
/// declare a permanent id.
pub fn table_entry_id(attrs: &[Attribute]) -> Option<u64> {
    let tokens = wire_tokens(attrs);
    for window in tokens.windows(3) {
        if let [TokenTree::Ident(key), TokenTree::Punct(eq), TokenTree::Literal(lit)] = window {
            if key == "id" && eq.as_char() == '=' {
                return lit.to_string().parse().ok();
            }
        }
    }
    None
}

/// `#[wire(deprecated)]` on a table struct's field: never emitted, and
/// silently skipped rather than applied if seen on the wire.
pub fn is_deprecated_entry(attrs: &[Attribute]) -> bool {
    has_flag(attrs, "deprecated")
}
