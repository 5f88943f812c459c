//! CQRS 过程宏（cqrs-macros）
//!
//! 提供 `#[entity]` 属性宏，减少实体定义的样板代码：
//! - 注入主键字段并实现 `::cqrs_domain::entity::Entity`；
//! - `audited` 参数额外注入审计时间戳字段并实现
//!   `CreationAudited` / `ModificationAudited`。
//!
use proc_macro::TokenStream;

mod derive_utils;
mod entity;
mod field_utils;

/// 实体宏
///
/// - 追加字段 `id: IdType`（若缺失）并置于字段最前；
/// - 自动实现 `::cqrs_domain::entity::Entity`（`id`）；
/// - 支持参数：
///   - `id = IdType`：主键类型，默认 `String`；
///   - `audited`：追加 `creation_time` / `last_modification_time` 字段
///     并实现审计 trait；
///   - `debug = true|false`：是否派生 `Debug`，默认 `true`。
///
/// # 示例
///
/// ```ignore
/// use cqrs_macros::entity;
///
/// #[entity(id = u64, audited)]
/// struct User {
///     name: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}
