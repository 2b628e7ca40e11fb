use crate::error::{ValidationError, ValidationResult};
use crate::rule::Rule;
use crate::value::Value;

/// 字段的后备存储
///
/// 第一次成功写入之前为空，归所属记录独占。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slot {
    value: Option<Value>,
}

impl Slot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// 恢复到未写入状态
    pub fn clear(&mut self) {
        self.value = None;
    }
}

/// 字段描述符
///
/// 在宿主类型定义时绑定到一个字段名，之后由该类型的所有实例共享。
/// 每次写入都先交给规则验证，通过后才存入实例自己的 [`Slot`]。
#[derive(Debug)]
pub struct Field<R> {
    field_name: &'static str,
    slot_name: String,
    rule: R,
}

impl<R: Rule> Field<R> {
    /// 绑定字段名，派生出私有的存储名（`_` + 字段名）
    pub fn bind(field_name: &'static str, rule: R) -> Self {
        tracing::debug!(field = field_name, rule = %rule.describe(), "Binding field descriptor");
        Self {
            field_name,
            slot_name: format!("_{}", field_name),
            rule,
        }
    }

    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    pub fn slot_name(&self) -> &str {
        &self.slot_name
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// 读取字段值；尚未写入时返回 `AttributeMissing`
    pub fn get<'a>(&self, slot: &'a Slot) -> ValidationResult<&'a Value> {
        slot.value
            .as_ref()
            .ok_or_else(|| ValidationError::attribute_missing(self.field_name))
    }

    /// 只验证，不写入
    pub fn check(&self, value: &Value) -> ValidationResult<()> {
        self.rule.validate(self.field_name, value)
    }

    /// 验证并写入
    ///
    /// 验证失败时 slot 保持原样；成功时原样存储，覆盖之前的值。
    pub fn set(&self, slot: &mut Slot, value: impl Into<Value>) -> ValidationResult<()> {
        let value = value.into();

        if let Err(e) = self.check(&value) {
            tracing::debug!(field = self.field_name, %value, error = %e, "Rejected field assignment");
            return Err(e);
        }

        tracing::trace!(field = self.field_name, slot = %self.slot_name, %value, "Stored field value");
        slot.value = Some(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::rule::{Number, OneOf};

    #[test]
    fn test_bind_derives_slot_name() {
        let field = Field::bind("buns", Number::new(2, 3));
        assert_eq!(field.field_name(), "buns");
        assert_eq!(field.slot_name(), "_buns");
        assert_eq!(field.rule().max_value(), 3);
    }

    #[test]
    fn test_get_before_set_is_missing() {
        let field = Field::bind("eggs", Number::new(0, 2));
        let slot = Slot::new();
        let err = field.get(&slot).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AttributeMissing);
        assert_eq!(err.field(), "eggs");
    }

    #[test]
    fn test_set_then_get_is_stable() {
        let field = Field::bind("cheese", Number::new(0, 2));
        let mut slot = Slot::new();
        field.set(&mut slot, 1).unwrap();

        assert_eq!(field.get(&slot).unwrap(), &Value::Int(1));
        assert_eq!(field.get(&slot).unwrap(), &Value::Int(1));
    }

    #[test]
    fn test_second_set_replaces_value() {
        let field = Field::bind("sauce", OneOf::new(["ketchup", "mayo"]));
        let mut slot = Slot::new();
        field.set(&mut slot, "ketchup").unwrap();
        field.set(&mut slot, "mayo").unwrap();
        assert_eq!(field.get(&slot).unwrap().as_str(), Some("mayo"));
    }

    #[test]
    fn test_failed_first_set_leaves_slot_empty() {
        let field = Field::bind("buns", Number::new(2, 3));
        let mut slot = Slot::new();
        assert!(field.set(&mut slot, 5).is_err());
        assert!(!slot.is_set());
    }

    #[test]
    fn test_failed_set_keeps_previous_value() {
        let field = Field::bind("buns", Number::new(2, 3));
        let mut slot = Slot::new();
        field.set(&mut slot, 3).unwrap();

        let err = field.set(&mut slot, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(field.get(&slot).unwrap(), &Value::Int(3));
    }

    #[test]
    fn test_slots_are_independent() {
        let field = Field::bind("tomatoes", Number::new(0, 3));
        let mut a = Slot::new();
        let mut b = Slot::new();
        field.set(&mut a, 0).unwrap();
        field.set(&mut b, 3).unwrap();
        field.set(&mut a, 2).unwrap();

        assert_eq!(field.get(&a).unwrap(), &Value::Int(2));
        assert_eq!(field.get(&b).unwrap(), &Value::Int(3));
    }

    #[test]
    fn test_clear() {
        let field = Field::bind("cutlets", Number::new(1, 3));
        let mut slot = Slot::new();
        field.set(&mut slot, 2).unwrap();
        slot.clear();
        assert!(field.get(&slot).is_err());
    }
}
