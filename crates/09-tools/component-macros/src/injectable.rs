//! `#[derive(Injectable)]` 实现

use crate::utils::{arc_inner_type, has_flag};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    parenthesized, punctuated::Punctuated, Attribute, Data, DeriveInput, Field, Fields, Result,
    Token, Type,
};

/// 结构体上的 `#[injectable(...)]` 参数
#[derive(Default)]
pub struct InjectableArgs {
    /// 额外提供的服务接口
    pub provides: Vec<Type>,
}

impl InjectableArgs {
    /// 从结构体属性中解析参数
    pub fn from_attributes(attrs: &[Attribute]) -> Result<Self> {
        let mut args = Self::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("injectable")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("provides") {
                    let content;
                    parenthesized!(content in meta.input);
                    let identities = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                    args.provides.extend(identities);
                    Ok(())
                } else {
                    Err(meta.error("不支持的 injectable 参数，可用参数: provides(...)"))
                }
            })?;
        }

        Ok(args)
    }
}

/// 字段的初始化方式
enum FieldInit<'a> {
    /// 从容器注入 `Arc<X>` 中的 `X`
    Inject(&'a Type),
    /// 使用 `Default::default()`
    Default,
}

fn field_init(field: &Field) -> Result<FieldInit<'_>> {
    if has_flag(&field.attrs, "default")? {
        return Ok(FieldInit::Default);
    }
    Ok(match arc_inner_type(&field.ty) {
        Some(inner) => FieldInit::Inject(inner),
        None => FieldInit::Default,
    })
}

/// 生成 `Injectable` 与 `Provides` 实现
pub fn derive_injectable_impl(input: DeriveInput) -> Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Injectable 不支持泛型类型，请为具体类型手动实现",
        ));
    }

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Injectable 只能用于结构体",
        ));
    };

    let args = InjectableArgs::from_attributes(&input.attrs)?;
    let name = &input.ident;

    let mut dependency_types = Vec::new();
    let mut values = Vec::new();
    for field in &data.fields {
        let value = match field_init(field)? {
            FieldInit::Inject(ty) => {
                dependency_types.push(ty);
                quote! { dependencies.next::<#ty>()? }
            }
            FieldInit::Default => quote! { ::core::default::Default::default() },
        };
        values.push(value);
    }

    let construction = match &data.fields {
        Fields::Named(named) => {
            let idents = named.named.iter().map(|field| &field.ident);
            quote! { Self { #(#idents: #values),* } }
        }
        Fields::Unnamed(_) => quote! { Self(#(#values),*) },
        Fields::Unit => quote! { Self },
    };

    let provides = args.provides.iter().map(|identity| {
        quote! {
            impl ::di_abstractions::Provides<#identity> for #name {
                fn provide(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<#identity> {
                    self
                }
            }
        }
    });

    Ok(quote! {
        impl ::di_abstractions::Injectable for #name {
            fn dependencies() -> ::std::vec::Vec<::di_abstractions::ServiceIdentity> {
                ::std::vec![#(::di_abstractions::ServiceIdentity::of::<#dependency_types>()),*]
            }

            #[allow(unused_variables)]
            fn construct(
                dependencies: &mut ::di_abstractions::Dependencies,
            ) -> ::std::result::Result<Self, ::di_abstractions::DependencyError> {
                ::std::result::Result::Ok(#construction)
            }
        }

        #(#provides)*
    })
}
