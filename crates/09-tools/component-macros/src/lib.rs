//! # Component Macros
//!
//! 为实现类型生成构造签名的过程宏。
//!
//! ## 核心宏
//!
//! - [`Injectable`](macro@Injectable) - 派生 `di_abstractions::Injectable`
//!
//! 生成的代码引用 `::di_abstractions`，使用方需要直接依赖该 crate。
//!
//! ## 使用示例
//!
//! ```rust
//! use component_macros::Injectable;
//! use std::sync::Arc;
//!
//! pub trait Calculator: Send + Sync {
//!     fn add(&self, a: f64, b: f64) -> f64;
//! }
//!
//! #[derive(Injectable)]
//! #[injectable(provides(dyn Calculator))]
//! pub struct BasicCalculator;
//!
//! impl Calculator for BasicCalculator {
//!     fn add(&self, a: f64, b: f64) -> f64 {
//!         a + b
//!     }
//! }
//!
//! #[derive(Injectable)]
//! pub struct View {
//!     calculator: Arc<dyn Calculator>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod utils;

/// 派生构造签名
///
/// - 类型为 `Arc<X>` 的字段按声明顺序成为对服务 `X` 的依赖
/// - 其他字段以及标记 `#[injectable(default)]` 的字段使用 `Default::default()`
/// - 结构体上的 `#[injectable(provides(dyn A, dyn B))]` 生成对应的 `Provides` 实现
///
/// 泛型结构体、枚举和联合体会产生编译错误。
#[proc_macro_derive(Injectable, attributes(injectable))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    injectable::derive_injectable_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
