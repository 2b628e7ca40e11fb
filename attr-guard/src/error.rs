use thiserror::Error;

/// 验证错误
///
/// 每个变体都带有出错的字段名，消息中包含字段、违规值以及被违反的约束。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// 值的运行时类型与规则不兼容
    #[error("{field} must be {expected}, but was {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// 整数超出 `[min, max]`
    ///
    /// `value` 用 i128 表示，超出 i64 的无符号整数也能原样报告。
    #[error("{field} must be between {min} and {max}, but was {value}")]
    OutOfRange {
        field: String,
        value: i128,
        min: i64,
        max: i64,
    },

    /// 值不在允许的集合中，`value` 是渲染后的值（字符串带引号）
    #[error("{field} must be one of [{}], but was {value}", .options.join(", "))]
    NotAllowed {
        field: String,
        value: String,
        options: Vec<String>,
    },

    /// 读取时字段尚未被成功写入
    #[error("{field} has not been set")]
    AttributeMissing { field: String },

    /// 字段未在 schema 中声明
    #[error("{field} is not a declared field")]
    UnknownField { field: String },

    /// 构造时同一字段被提供了多次
    #[error("{field} was supplied more than once")]
    DuplicateField { field: String },
}

/// 错误类别，便于在不解构的情况下匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TypeMismatch,
    OutOfRange,
    NotAllowed,
    AttributeMissing,
    UnknownField,
    DuplicateField,
}

impl ValidationError {
    pub fn attribute_missing(field: impl Into<String>) -> Self {
        Self::AttributeMissing {
            field: field.into(),
        }
    }

    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    pub fn duplicate_field(field: impl Into<String>) -> Self {
        Self::DuplicateField {
            field: field.into(),
        }
    }

    /// 出错的字段名
    pub fn field(&self) -> &str {
        match self {
            Self::TypeMismatch { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotAllowed { field, .. }
            | Self::AttributeMissing { field }
            | Self::UnknownField { field }
            | Self::DuplicateField { field } => field,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::NotAllowed { .. } => ErrorKind::NotAllowed,
            Self::AttributeMissing { .. } => ErrorKind::AttributeMissing,
            Self::UnknownField { .. } => ErrorKind::UnknownField,
            Self::DuplicateField { .. } => ErrorKind::DuplicateField,
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = ValidationError::OutOfRange {
            field: "buns".to_string(),
            value: 5,
            min: 2,
            max: 3,
        };
        assert_eq!(err.to_string(), "buns must be between 2 and 3, but was 5");
        assert_eq!(err.field(), "buns");
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_not_allowed_message_lists_options() {
        let err = ValidationError::NotAllowed {
            field: "sauce".to_string(),
            value: "\"mustard\"".to_string(),
            options: vec!["ketchup".to_string(), "mayo".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "sauce must be one of [ketchup, mayo], but was \"mustard\""
        );
    }

    #[test]
    fn test_missing_and_unknown() {
        let missing = ValidationError::attribute_missing("eggs");
        assert_eq!(missing.to_string(), "eggs has not been set");
        assert_eq!(missing.kind(), ErrorKind::AttributeMissing);

        let unknown = ValidationError::unknown_field("pickles");
        assert_eq!(unknown.field(), "pickles");
        assert_eq!(unknown.kind(), ErrorKind::UnknownField);

        let duplicate = ValidationError::duplicate_field("buns");
        assert_eq!(duplicate.to_string(), "buns was supplied more than once");
        assert_eq!(duplicate.kind(), ErrorKind::DuplicateField);
    }
}
