//! attr-guard - 字段赋值验证
//!
//! 为记录的具名字段附加范围 / 枚举约束，每次赋值都会经过验证：
//! - [`Field`] 描述符绑定字段名，拦截读写
//! - [`Number`] / [`OneOf`] 等 [`Rule`] 负责判断值是否满足约束
//! - `#[derive(Record)]` 为结构体生成构造函数和 getter / setter
//! - [`Schema`] / [`DynamicRecord`] 提供按字段名分发的动态版本

// 让派生宏生成的 `::attr_guard::...` 路径在本 crate 内也能解析
extern crate self as attr_guard;

pub mod error;
pub mod field;
pub mod rule;
pub mod schema;
pub mod value;

pub use error::*;
pub use field::*;
pub use rule::*;
pub use schema::*;
pub use value::*;

// 重新导出宏
pub use attr_guard_macros::Record;
