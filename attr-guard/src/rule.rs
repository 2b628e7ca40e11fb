use crate::error::{ValidationError, ValidationResult};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// 验证规则 trait
///
/// 规则是无状态的谓词，只依赖构造时确定的参数。`field` 仅用于错误消息。
pub trait Rule: Send + Sync + fmt::Debug {
    fn validate(&self, field: &str, value: &Value) -> ValidationResult<()>;

    /// 约束的简短描述
    fn describe(&self) -> String;
}

impl<R: Rule + ?Sized> Rule for Box<R> {
    fn validate(&self, field: &str, value: &Value) -> ValidationResult<()> {
        (**self).validate(field, value)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<R: Rule + ?Sized> Rule for Arc<R> {
    fn validate(&self, field: &str, value: &Value) -> ValidationResult<()> {
        (**self).validate(field, value)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

fn type_mismatch(field: &str, expected: &'static str, value: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: format!("{} {}", value.type_name(), value),
    }
}

/// 整数范围规则，上下界都包含在内
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Number {
    min_value: i64,
    max_value: i64,
}

impl Number {
    /// 创建范围规则，调用方保证 `min_value <= max_value`
    pub const fn new(min_value: i64, max_value: i64) -> Self {
        debug_assert!(min_value <= max_value);
        Self {
            min_value,
            max_value,
        }
    }

    pub fn min_value(&self) -> i64 {
        self.min_value
    }

    pub fn max_value(&self) -> i64 {
        self.max_value
    }
}

impl Rule for Number {
    fn validate(&self, field: &str, value: &Value) -> ValidationResult<()> {
        let Some(v) = value.as_wide_int() else {
            return Err(type_mismatch(field, "an integer", value));
        };

        if v < i128::from(self.min_value) || v > i128::from(self.max_value) {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                value: v,
                min: self.min_value,
                max: self.max_value,
            });
        }

        Ok(())
    }

    fn describe(&self) -> String {
        format!("integer in [{}, {}]", self.min_value, self.max_value)
    }
}

/// 枚举字符串规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOf {
    options: Vec<String>,
}

impl OneOf {
    /// 创建枚举规则，保留选项顺序；调用方保证至少有一个选项
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        debug_assert!(!options.is_empty(), "OneOf needs at least one option");
        Self { options }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }
}

impl Rule for OneOf {
    fn validate(&self, field: &str, value: &Value) -> ValidationResult<()> {
        // 非字符串值同样只是“不在集合中”
        let is_member = match value {
            Value::Str(s) => self.options.iter().any(|option| option == s),
            _ => false,
        };

        if !is_member {
            return Err(ValidationError::NotAllowed {
                field: field.to_string(),
                value: value.to_string(),
                options: self.options.clone(),
            });
        }

        Ok(())
    }

    fn describe(&self) -> String {
        format!("one of [{}]", self.options.join(", "))
    }
}
