//! Parsing of `#[bind(...)]` attributes.

use syn::{
    punctuated::Punctuated, spanned::Spanned, Attribute, Expr, ExprLit, Ident, Lit, Meta,
    MetaNameValue, Path, Token,
};

/// Container-level options.
#[derive(Debug, Default)]
pub struct ContainerAttrs {
    /// Capabilities from `decode(text, structured, binary)`.
    pub decode: Option<DecodeCapabilities>,
    /// Path to the core crate, from `crate = "..."`.
    pub crate_path: Option<Path>,
}

/// Capabilities listed in `decode(...)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecodeCapabilities {
    pub text: bool,
    pub structured: bool,
    pub binary: bool,
}

/// Field-level options.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Every `key = "value"` pair, in order.
    pub tags: Vec<(String, String)>,
    /// `flatten`: the field is an embedded sub-record.
    pub flatten: bool,
    /// `skip`: the field is invisible to the engine.
    pub skip: bool,
}

fn bind_metas(attrs: &[Attribute]) -> syn::Result<Vec<Meta>> {
    let mut metas = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("bind")) {
        let list = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        metas.extend(list);
    }
    Ok(metas)
}

fn string_value(nv: &MetaNameValue) -> syn::Result<String> {
    match &nv.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        _ => Err(syn::Error::new(
            nv.value.span(),
            "expected string literal",
        )),
    }
}

fn meta_ident(path: &Path) -> syn::Result<String> {
    path.get_ident()
        .map(ToString::to_string)
        .ok_or_else(|| syn::Error::new(path.span(), "expected identifier"))
}

impl ContainerAttrs {
    /// Parses the container's `#[bind(...)]` attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for meta in bind_metas(attrs)? {
            match meta {
                Meta::List(list) if list.path.is_ident("decode") => {
                    let names =
                        list.parse_args_with(Punctuated::<Ident, Token![,]>::parse_terminated)?;
                    let mut caps = DecodeCapabilities::default();
                    for name in names {
                        match name.to_string().as_str() {
                            "text" => caps.text = true,
                            "structured" => caps.structured = true,
                            "binary" => caps.binary = true,
                            other => {
                                return Err(syn::Error::new(
                                    name.span(),
                                    format!("unknown capability: {other}"),
                                ))
                            }
                        }
                    }
                    if !(caps.text || caps.structured || caps.binary) {
                        return Err(syn::Error::new(
                            list.span(),
                            "decode(...) needs at least one of text, structured, binary",
                        ));
                    }
                    parsed.decode = Some(caps);
                }
                Meta::NameValue(nv) if nv.path.is_ident("crate") => {
                    let value = string_value(&nv)?;
                    parsed.crate_path = Some(syn::parse_str(&value).map_err(|e| {
                        syn::Error::new(nv.value.span(), format!("invalid crate path: {e}"))
                    })?);
                }
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        "expected decode(...) or crate = \"...\"",
                    ))
                }
            }
        }
        Ok(parsed)
    }
}

impl FieldAttrs {
    /// Parses a field's `#[bind(...)]` attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for meta in bind_metas(attrs)? {
            match meta {
                Meta::Path(path) => match meta_ident(&path)?.as_str() {
                    "flatten" => parsed.flatten = true,
                    "skip" => parsed.skip = true,
                    other => {
                        return Err(syn::Error::new(
                            path.span(),
                            format!("unknown flag: {other}"),
                        ))
                    }
                },
                Meta::NameValue(nv) => {
                    let key = meta_ident(&nv.path)?;
                    let value = string_value(&nv)?;
                    parsed.tags.push((key, value));
                }
                Meta::List(list) => {
                    return Err(syn::Error::new(
                        list.span(),
                        "expected key = \"value\", flatten or skip",
                    ))
                }
            }
        }
        Ok(parsed)
    }
}
