//! 按字段名分发的动态记录
//!
//! 适用于运行时才知道字段的宿主：`Schema` 持有一组有序的描述符，
//! `DynamicRecord` 为每个实例保存自己的 slot，读写都按字段名路由到对应描述符。

use crate::error::{ValidationError, ValidationResult};
use crate::field::{Field, Slot};
use crate::rule::Rule;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// 有序的字段描述符表
#[derive(Debug)]
pub struct Schema {
    name: String,
    fields: Vec<Field<Box<dyn Rule>>>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 按声明顺序遍历描述符
    pub fn fields(&self) -> impl Iterator<Item = &Field<Box<dyn Rule>>> {
        self.fields.iter()
    }

    pub fn field(&self, name: &str) -> Option<&Field<Box<dyn Rule>>> {
        self.fields.iter().find(|f| f.field_name() == name)
    }

    fn lookup(&self, name: &str) -> ValidationResult<&Field<Box<dyn Rule>>> {
        self.field(name)
            .ok_or_else(|| ValidationError::unknown_field(name))
    }

    /// 构造记录
    ///
    /// 先拒绝未声明或重复提供的字段名，再按声明顺序逐个验证，遇到第一个错误立即返回。
    /// 失败时不会产生任何记录。
    pub fn construct<I, K, V>(self: &Arc<Self>, values: I) -> ValidationResult<DynamicRecord>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut supplied: HashMap<String, Value> = HashMap::new();
        for (name, value) in values {
            let name = name.as_ref();
            self.lookup(name)?;
            if supplied.insert(name.to_string(), value.into()).is_some() {
                return Err(ValidationError::duplicate_field(name));
            }
        }

        let mut slots = HashMap::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = supplied
                .remove(field.field_name())
                .ok_or_else(|| ValidationError::attribute_missing(field.field_name()))?;

            let mut slot = Slot::new();
            field.set(&mut slot, value)?;
            slots.insert(field.slot_name().to_string(), slot);
        }

        tracing::debug!(schema = %self.name, fields = self.fields.len(), "Constructed record");

        Ok(DynamicRecord {
            schema: Arc::clone(self),
            slots,
        })
    }
}

/// Schema 构建器
pub struct SchemaBuilder {
    name: String,
    fields: Vec<Field<Box<dyn Rule>>>,
}

impl SchemaBuilder {
    /// 声明字段；重复声明会原地替换之前的规则
    pub fn field(mut self, field_name: &'static str, rule: impl Rule + 'static) -> Self {
        let field = Field::bind(field_name, Box::new(rule) as Box<dyn Rule>);
        match self.fields.iter_mut().find(|f| f.field_name() == field_name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn build(self) -> Arc<Schema> {
        Arc::new(Schema {
            name: self.name,
            fields: self.fields,
        })
    }
}

/// 由 [`Schema`] 构造出的记录实例
#[derive(Debug, Clone)]
pub struct DynamicRecord {
    schema: Arc<Schema>,
    slots: HashMap<String, Slot>,
}

impl DynamicRecord {
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn get(&self, name: &str) -> ValidationResult<&Value> {
        let field = self.schema.lookup(name)?;
        match self.slots.get(field.slot_name()) {
            Some(slot) => field.get(slot),
            None => Err(ValidationError::attribute_missing(name)),
        }
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> ValidationResult<()> {
        let field = self.schema.lookup(name)?;
        let slot = self.slots.entry(field.slot_name().to_string()).or_default();
        field.set(slot, value)
    }

    /// 按声明顺序遍历已写入的字段
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.schema.fields().filter_map(move |field| {
            self.slots
                .get(field.slot_name())
                .and_then(|slot| field.get(slot).ok())
                .map(|value| (field.field_name(), value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::rule::{Number, OneOf};

    fn burger_schema() -> Arc<Schema> {
        Schema::builder("BurgerRecipe")
            .field("buns", Number::new(2, 3))
            .field("cheese", Number::new(0, 2))
            .field("sauce", OneOf::new(["ketchup", "mayo", "burger"]))
            .build()
    }

    #[test]
    fn test_construct_and_read_back() {
        let schema = burger_schema();
        let record = schema
            .construct([
                ("buns", Value::from(2)),
                ("cheese", Value::from(1)),
                ("sauce", Value::from("ketchup")),
            ])
            .unwrap();

        assert_eq!(record.get("buns").unwrap(), &Value::Int(2));
        assert_eq!(record.get("sauce").unwrap().as_str(), Some("ketchup"));

        let names: Vec<_> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["buns", "cheese", "sauce"]);
    }

    #[test]
    fn test_construct_fails_on_first_invalid_field() {
        let schema = burger_schema();
        let err = schema
            .construct([
                ("sauce", Value::from("mustard")),
                ("buns", Value::from(5)),
                ("cheese", Value::from(1)),
            ])
            .unwrap_err();

        // 声明顺序决定验证顺序，而不是传入顺序
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(err.field(), "buns");
    }

    #[test]
    fn test_construct_reports_missing_and_unknown() {
        let schema = burger_schema();

        let err = schema
            .construct([("buns", Value::from(2)), ("cheese", Value::from(0))])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AttributeMissing);
        assert_eq!(err.field(), "sauce");

        let err = schema
            .construct([("pickles", Value::from(4))])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownField);
    }

    #[test]
    fn test_construct_rejects_duplicate_field() {
        let schema = burger_schema();
        let err = schema
            .construct([
                ("buns", Value::from(2)),
                ("cheese", Value::from(0)),
                ("buns", Value::from(3)),
                ("sauce", Value::from("mayo")),
            ])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateField);
        assert_eq!(err.field(), "buns");
    }

    #[test]
    fn test_set_routes_through_rule() {
        let schema = burger_schema();
        let mut record = schema
            .construct([
                ("buns", Value::from(3)),
                ("cheese", Value::from(0)),
                ("sauce", Value::from("mayo")),
            ])
            .unwrap();

        record.set("cheese", 2).unwrap();
        assert_eq!(record.get("cheese").unwrap(), &Value::Int(2));

        let err = record.set("cheese", 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(record.get("cheese").unwrap(), &Value::Int(2));

        assert_eq!(record.set("onion", 1).unwrap_err().kind(), ErrorKind::UnknownField);
    }

    #[test]
    fn test_records_do_not_share_slots() {
        let schema = burger_schema();
        let values = || {
            [
                ("buns", Value::from(2)),
                ("cheese", Value::from(0)),
                ("sauce", Value::from("burger")),
            ]
        };
        let mut a = schema.construct(values()).unwrap();
        let b = schema.construct(values()).unwrap();

        a.set("buns", 3).unwrap();
        assert_eq!(a.get("buns").unwrap(), &Value::Int(3));
        assert_eq!(b.get("buns").unwrap(), &Value::Int(2));
    }

    #[test]
    fn test_redeclared_field_replaces_rule() {
        let schema = Schema::builder("t")
            .field("a", Number::new(0, 1))
            .field("b", Number::new(0, 1))
            .field("a", Number::new(5, 6))
            .build();

        assert_eq!(schema.len(), 2);
        let names: Vec<_> = schema.fields().map(|f| f.field_name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(schema.field("a").unwrap().rule().describe(), "integer in [5, 6]");
    }
}
