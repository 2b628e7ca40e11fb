mod logging;
mod recipe;

use anyhow::Context;
use logging::LoggingConfig;
use recipe::{BurgerRecipe, RecipeOrder};

// ==================== 示例订单 ====================

const ORDERS: &str = r#"[
    {"customer": "alice", "buns": 2, "cheese": 1, "tomatoes": 1, "cutlets": 1, "eggs": 0, "sauce": "ketchup"},
    {"customer": "bob",   "buns": 5, "cheese": 1, "tomatoes": 1, "cutlets": 1, "eggs": 0, "sauce": "ketchup"},
    {"customer": "carol", "buns": 3, "cheese": 2, "tomatoes": 3, "cutlets": 3, "eggs": 2, "sauce": "mustard"},
    {"customer": "dave",  "buns": 2, "cheese": true, "tomatoes": 0, "cutlets": 1, "eggs": 0, "sauce": "mayo"},
    {"customer": "erin",  "buns": 3, "cheese": 0, "tomatoes": 2, "cutlets": 2, "eggs": 1, "sauce": "burger"}
]"#;

fn main() -> anyhow::Result<()> {
    let mut logging = LoggingConfig::from_env().show_target(true);
    if logging.filter.is_none() {
        logging = logging.filter("attr_guard=debug,burger_demo=info");
    }
    logging.init()?;

    let orders: Vec<RecipeOrder> =
        serde_json::from_str(ORDERS).context("Failed to parse demo orders")?;

    let mut accepted = Vec::new();
    for order in orders {
        let customer = order.customer.clone();
        match BurgerRecipe::try_from(order) {
            Ok(recipe) => {
                tracing::info!(%customer, %recipe, "Recipe accepted");
                accepted.push(recipe);
            }
            Err(e) => {
                tracing::warn!(%customer, field = e.field(), error = %e, "Recipe rejected");
            }
        }
    }

    // 接受后的配方仍然经过验证才能修改
    if let Some(recipe) = accepted.first_mut() {
        if let Err(e) = recipe.set_cutlets(4) {
            tracing::warn!(error = %e, "Extra cutlet refused");
        }
        recipe.set_sauce("mayo")?;
        tracing::info!(%recipe, "Recipe updated");
    }

    tracing::info!(accepted = accepted.len(), "Done");
    Ok(())
}
