use quote::ToTokens;
use syn::{Attribute, Token};

/// 将 required 派生合并进已有 derive 属性（去重，required 优先）
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<syn::Path>) {
    let mut retained = Vec::new();
    let mut existing = Vec::new();

    for attr in attrs.iter() {
        if attr.path().is_ident("derive") {
            if let Ok(list) = attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Path, Token![,]>::parse_terminated,
            ) {
                existing.extend(list);
            }
        } else {
            retained.push(attr.clone());
        }
    }

    let mut seen = std::collections::HashSet::<String>::new();
    let mut merged: Vec<syn::Path> = Vec::new();
    for p in required.into_iter().chain(existing) {
        if seen.insert(derive_key(&p)) {
            merged.push(p);
        }
    }

    let derive_attr: Attribute = syn::parse_quote!(#[derive(#(#merged),*)]);
    *attrs = std::iter::once(derive_attr).chain(retained).collect();
}

// 归一化 derive 的 key，避免 Serialize/serde::Serialize 重复
fn derive_key(p: &syn::Path) -> String {
    if let Some(last) = p.segments.last() {
        let last_ident = last.ident.to_string();
        match last_ident.as_str() {
            "Serialize" | "Deserialize" => format!("serde::{last_ident}"),
            _ => last_ident,
        }
    } else {
        p.to_token_stream().to_string()
    }
}
