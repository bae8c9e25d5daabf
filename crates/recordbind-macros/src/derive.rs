//! Code generation for `#[derive(Bindable)]`.

use crate::parse::{ContainerAttrs, DecodeCapabilities, FieldAttrs};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    ext::IdentExt, parse_quote, Data, DataStruct, DeriveInput, Fields, Generics, Path,
    WherePredicate,
};

/// Expands the derive for `input`.
pub fn expand_bindable(input: &DeriveInput) -> syn::Result<TokenStream> {
    let container = ContainerAttrs::from_attrs(&input.attrs)?;
    let krate: Path = container
        .crate_path
        .unwrap_or_else(|| parse_quote!(::recordbind_core));

    if let Some(caps) = container.decode {
        return Ok(expand_decodable(input, &krate, caps));
    }

    match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(_),
            ..
        }) => expand_record(input, &krate),
        _ => Err(syn::Error::new(
            input.ident.span(),
            "Bindable can only be derived for structs with named fields; \
             use #[bind(decode(...))] for other types",
        )),
    }
}

/// Adds `'static` to every type parameter and, for generic types, the
/// `predicates` to the where clause.
fn bounded_generics(generics: &Generics, predicates: Vec<WherePredicate>) -> Generics {
    let mut generics = generics.clone();
    if generics.type_params().next().is_none() {
        return generics;
    }
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!('static));
    }
    generics.make_where_clause().predicates.extend(predicates);
    generics
}

fn expand_record(input: &DeriveInput, krate: &Path) -> syn::Result<TokenStream> {
    let Data::Struct(DataStruct {
        fields: Fields::Named(named),
        ..
    }) = &input.data
    else {
        return Err(syn::Error::new(input.ident.span(), "expected named fields"));
    };

    let mut infos = Vec::new();
    let mut arms = Vec::new();
    let mut bounds: Vec<WherePredicate> = Vec::new();
    for field in &named.named {
        let attrs = FieldAttrs::from_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let name = ident.unraw().to_string();
        let ty = &field.ty;
        let index = infos.len();

        let mut info = quote! {
            #krate::FieldInfo::new(#name, <#ty as #krate::Bindable>::type_info)
        };
        if !attrs.tags.is_empty() {
            let tags = attrs.tags.iter().map(|(k, v)| quote!((#k, #v)));
            info = quote!(#info.with_tags(&[#(#tags),*]));
        }
        if attrs.flatten {
            info = quote!(#info.flattened());
        }
        infos.push(info);
        bounds.push(parse_quote!(#ty: #krate::Bindable));
        arms.push(quote! {
            #index => ::core::option::Option::Some(&mut self.#ident as &mut dyn #krate::Bindable)
        });
    }

    let name = &input.ident;
    let generics = bounded_generics(&input.generics, bounds);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::Bindable for #name #ty_generics #where_clause {
            fn type_info() -> #krate::TypeInfo {
                #krate::TypeInfo::of::<Self>(#krate::Shape::Record(::std::vec![#(#infos),*]))
            }

            fn slot(&mut self) -> #krate::Slot<'_> {
                #krate::Slot::Record(self)
            }

            fn assign_opaque(&mut self, value: &#krate::Opaque) -> bool {
                #krate::assign_from(self, value)
            }
        }

        impl #impl_generics #krate::Record for #name #ty_generics #where_clause {
            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<&mut dyn #krate::Bindable> {
                match index {
                    #(#arms,)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

fn expand_decodable(input: &DeriveInput, krate: &Path, caps: DecodeCapabilities) -> TokenStream {
    let DecodeCapabilities {
        text,
        structured,
        binary,
    } = caps;
    let capabilities = quote!(#krate::Capabilities::new(#text, #structured, #binary));

    let dispatch = |supported: bool, capability: &str, call: TokenStream| {
        if supported {
            call
        } else {
            quote! {
                let _ = input;
                ::core::result::Result::Err(#krate::unsupported_capability(#capability))
            }
        }
    };
    let text_body = dispatch(
        text,
        "text",
        quote!(<Self as #krate::TextDecode>::decode_text(self, input)),
    );
    let structured_body = dispatch(
        structured,
        "structured",
        quote!(<Self as #krate::StructuredDecode>::decode_structured(self, input)),
    );
    let binary_body = dispatch(
        binary,
        "binary",
        quote!(<Self as #krate::BinaryDecode>::decode_binary(self, input)),
    );

    let name = &input.ident;
    let (_, plain_ty_generics, _) = input.generics.split_for_impl();
    let generics = bounded_generics(
        &input.generics,
        vec![parse_quote!(#name #plain_ty_generics: ::core::default::Default)],
    );
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics #krate::Bindable for #name #ty_generics #where_clause {
            fn type_info() -> #krate::TypeInfo {
                #krate::TypeInfo::of::<Self>(#krate::Shape::Opaque).with_capabilities(#capabilities)
            }

            fn slot(&mut self) -> #krate::Slot<'_> {
                #krate::Slot::Decodable(self)
            }

            fn assign_opaque(&mut self, value: &#krate::Opaque) -> bool {
                #krate::assign_from(self, value)
            }
        }

        impl #impl_generics #krate::Decodable for #name #ty_generics #where_clause {
            fn capabilities(&self) -> #krate::Capabilities {
                #capabilities
            }

            fn decode_fresh(
                &mut self,
                decode: &mut dyn FnMut(&mut dyn #krate::Decodable) -> ::core::result::Result<(), #krate::BoxError>,
            ) -> ::core::result::Result<(), #krate::BoxError> {
                let mut fresh = <Self as ::core::default::Default>::default();
                decode(&mut fresh)?;
                *self = fresh;
                ::core::result::Result::Ok(())
            }

            fn decode_text(&mut self, input: &str) -> ::core::result::Result<(), #krate::BoxError> {
                #text_body
            }

            fn decode_structured(&mut self, input: &[u8]) -> ::core::result::Result<(), #krate::BoxError> {
                #structured_body
            }

            fn decode_binary(&mut self, input: &[u8]) -> ::core::result::Result<(), #krate::BoxError> {
                #binary_body
            }
        }
    }
}
