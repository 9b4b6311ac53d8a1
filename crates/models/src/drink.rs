use sea_orm::{entity::prelude::*, Set, DatabaseConnection, ActiveModelTrait};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "drink")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub title: String,
    /// JSON-encoded `Vec<Ingredient>`.
    #[sea_orm(column_type = "Text")]
    pub recipe: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// One line of a recipe. `parts` keeps the JSON number exactly as submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: Number,
}

/// Ingredient as shown on the public menu: no name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientShort {
    pub color: String,
    pub parts: Number,
}

impl From<&Ingredient> for IngredientShort {
    fn from(i: &Ingredient) -> Self {
        Self { color: i.color.clone(), parts: i.parts.clone() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkShort {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkLong {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Model {
    pub fn ingredients(&self) -> Result<Vec<Ingredient>, errors::ModelError> {
        serde_json::from_str(&self.recipe)
            .map_err(|e| errors::ModelError::Recipe(format!("drink {}: {}", self.id, e)))
    }

    /// Public projection; ingredient names stay private.
    pub fn short(&self) -> Result<DrinkShort, errors::ModelError> {
        let recipe = self.ingredients()?.iter().map(IngredientShort::from).collect();
        Ok(DrinkShort { id: self.id, title: self.title.clone(), recipe })
    }

    pub fn long(&self) -> Result<DrinkLong, errors::ModelError> {
        Ok(DrinkLong { id: self.id, title: self.title.clone(), recipe: self.ingredients()? })
    }
}

pub fn validate_title(title: &str) -> Result<String, errors::ModelError> {
    let t = title.trim();
    if t.is_empty() {
        return Err(errors::ModelError::Validation("title must not be empty".into()));
    }
    Ok(t.to_string())
}

pub fn encode_recipe(recipe: &[Ingredient]) -> Result<String, errors::ModelError> {
    serde_json::to_string(recipe).map_err(|e| errors::ModelError::Validation(e.to_string()))
}

pub async fn create(
    db: &DatabaseConnection,
    title: &str,
    recipe: &[Ingredient],
) -> Result<Model, errors::ModelError> {
    let title = validate_title(title)?;
    let am = ActiveModel {
        title: Set(title),
        recipe: Set(encode_recipe(recipe)?),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemonade() -> Model {
        Model {
            id: 7,
            title: "Lemonade".into(),
            recipe: r#"[{"name":"Lemon","color":"yellow","parts":3},{"name":"Water","color":"blue","parts":1.5}]"#.into(),
        }
    }

    #[test]
    fn short_hides_ingredient_names() {
        let short = serde_json::to_value(lemonade().short().unwrap()).unwrap();
        assert_eq!(
            short,
            serde_json::json!({
                "id": 7,
                "title": "Lemonade",
                "recipe": [{"color": "yellow", "parts": 3}, {"color": "blue", "parts": 1.5}]
            })
        );
    }

    #[test]
    fn long_keeps_full_recipe() {
        let long = lemonade().long().unwrap();
        assert_eq!(long.recipe.len(), 2);
        assert_eq!(long.recipe[0].name, "Lemon");
        // integer parts stay integers on the way back out
        assert_eq!(serde_json::to_string(&long.recipe[0].parts).unwrap(), "3");
    }

    #[test]
    fn corrupt_recipe_is_an_error() {
        let m = Model { id: 1, title: "Broken".into(), recipe: "{not json".into() };
        assert!(matches!(m.long(), Err(errors::ModelError::Recipe(_))));
        assert!(matches!(m.short(), Err(errors::ModelError::Recipe(_))));
    }

    #[test]
    fn blank_titles_are_rejected() {
        assert!(validate_title("   ").is_err());
        assert_eq!(validate_title("  Mocha ").unwrap(), "Mocha");
    }
}
