//! 宏工具函数

use syn::{Attribute, GenericArgument, PathArguments, Result, Type};

/// 如果类型是 `Arc<T>`（包括 `std::sync::Arc<T>` 这类带路径的写法），返回 `T`
pub fn arc_inner_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }

    let segment = type_path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }

    match &segment.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

/// 检查 `#[injectable(...)]` 属性中是否带有指定标记，遇到未知参数时报错
pub fn has_flag(attrs: &[Attribute], flag: &str) -> Result<bool> {
    let mut found = false;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("injectable")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(flag) {
                found = true;
                Ok(())
            } else {
                Err(meta.error(format!("不支持的字段参数，可用参数: {flag}")))
            }
        })?;
    }

    Ok(found)
}
