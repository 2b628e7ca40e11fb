use attr_guard::{Record, Slot, ValidationError, ValidationResult, Value};
use serde::Deserialize;
use std::fmt;

/// 汉堡配方
///
/// 每个字段在构造和后续赋值时都会被验证，顺序为
/// buns, cheese, tomatoes, cutlets, eggs, sauce。
#[derive(Debug, Clone, Record)]
pub struct BurgerRecipe {
    #[validate(number(min = 2, max = 3))]
    buns: Slot,
    #[validate(number(min = 0, max = 2))]
    cheese: Slot,
    #[validate(number(min = 0, max = 3))]
    tomatoes: Slot,
    #[validate(number(min = 1, max = 3))]
    cutlets: Slot,
    #[validate(number(min = 0, max = 2))]
    eggs: Slot,
    #[validate(one_of("ketchup", "mayo", "burger"))]
    sauce: Slot,
}

impl fmt::Display for BurgerRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ("buns", self.buns()),
            ("cheese", self.cheese()),
            ("tomatoes", self.tomatoes()),
            ("cutlets", self.cutlets()),
            ("eggs", self.eggs()),
            ("sauce", self.sauce()),
        ];

        let mut first = true;
        for (name, value) in parts {
            if let Ok(value) = value {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{}={}", name, value)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// 以 JSON 下单的配方，字段值保持原始类型，交给 [`BurgerRecipe`] 验证
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeOrder {
    pub customer: String,
    pub buns: Value,
    pub cheese: Value,
    pub tomatoes: Value,
    pub cutlets: Value,
    pub eggs: Value,
    pub sauce: Value,
}

impl TryFrom<RecipeOrder> for BurgerRecipe {
    type Error = ValidationError;

    fn try_from(order: RecipeOrder) -> ValidationResult<Self> {
        BurgerRecipe::new(
            order.buns,
            order.cheese,
            order.tomatoes,
            order.cutlets,
            order.eggs,
            order.sauce,
        )
    }
}
