use crate::derive_utils::apply_derives;
use crate::field_utils::ensure_leading_fields;
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, ItemStruct, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[entity] 宏实现
/// - 若缺失则追加字段 `id: IdType` 并置于字段最前
/// - 自动实现 `::cqrs_domain::entity::Entity`（`id`）
/// - `audited` 参数追加 `creation_time` / `last_modification_time`
///   （`Option<DateTime<Utc>>`）字段并实现审计 trait
/// - 支持参数：`#[entity(id = IdType, audited, debug = true|false)]`；
///   - `id` 默认 `String`
///   - `debug` 默认 `true`（派生 Debug）。当为 `false` 时不派生 Debug，便于用户自定义实现。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity] only on struct")
                .to_compile_error()
                .into();
        }
    };

    // 仅支持具名字段结构体
    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    let id_type = cfg.id_ty.unwrap_or_else(|| syn::parse_quote! { String });

    // 重新组织字段：id（与审计字段）置于最前，避免重复
    let audit_ty: Type = syn::parse_quote! { Option<::chrono::DateTime<::chrono::Utc>> };
    let mut required: Vec<(&str, &Type)> = vec![("id", &id_type)];
    if cfg.audited {
        required.push(("creation_time", &audit_ty));
        required.push(("last_modification_time", &audit_ty));
    }
    ensure_leading_fields(fields_named, &required);

    // 合并/规范 derive：默认添加 Debug（可通过 debug=false 关闭）、Default、Serialize、Deserialize
    let mut default_derives: Vec<syn::Path> = vec![
        syn::parse_quote!(Default),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        default_derives.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, default_derives);

    let out_struct = ItemStruct { ..st };

    // 生成 Entity（及可选审计）实现
    let ident = &out_struct.ident;
    let generics = out_struct.generics.clone();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let audited_impls = cfg.audited.then(|| {
        quote! {
            impl #impl_generics ::cqrs_domain::auditing::CreationAudited for #ident #ty_generics #where_clause {
                fn creation_time(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                    self.creation_time
                }

                fn set_creation_time(&mut self, at: ::chrono::DateTime<::chrono::Utc>) {
                    self.creation_time = Some(at);
                }
            }

            impl #impl_generics ::cqrs_domain::auditing::ModificationAudited for #ident #ty_generics #where_clause {
                fn last_modification_time(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                    self.last_modification_time
                }

                fn set_last_modification_time(&mut self, at: ::chrono::DateTime<::chrono::Utc>) {
                    self.last_modification_time = Some(at);
                }
            }
        }
    });

    let expanded = quote! {
        #out_struct

        impl #impl_generics ::cqrs_domain::entity::Entity for #ident #ty_generics #where_clause {
            type Id = #id_type;

            fn id(&self) -> &Self::Id {
                &self.id
            }
        }

        #audited_impls
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

struct EntityAttrConfig {
    id_ty: Option<Type>,
    audited: bool,
    derive_debug: Option<bool>,
}

impl Parse for EntityAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut id_ty: Option<Type> = None;
        let mut audited = false;
        let mut derive_debug: Option<bool> = None;

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            match key.to_string().as_str() {
                "id" => {
                    input.parse::<Token![=]>()?;
                    id_ty = Some(input.parse()?);
                }
                "audited" => {
                    audited = true;
                }
                "debug" => {
                    input.parse::<Token![=]>()?;
                    let lit: syn::LitBool = input.parse()?;
                    derive_debug = Some(lit.value);
                }
                other => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("unknown #[entity] argument `{other}`"),
                    ));
                }
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(Self {
            id_ty,
            audited,
            derive_debug,
        })
    }
}
