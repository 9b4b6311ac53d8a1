use sea_orm::{DatabaseConnection, EntityTrait, ActiveModelTrait, QueryOrder, Set};
use models::drink::{self, Entity as DrinkEntity, Ingredient};
use crate::errors::ServiceError;

/// List every drink ordered by id.
pub async fn list_drinks(db: &DatabaseConnection) -> Result<Vec<drink::Model>, ServiceError> {
    let rows = DrinkEntity::find().order_by_asc(drink::Column::Id).all(db).await?;
    Ok(rows)
}

/// Get a drink by id.
pub async fn get_drink(db: &DatabaseConnection, id: i32) -> Result<Option<drink::Model>, ServiceError> {
    let found = DrinkEntity::find_by_id(id).one(db).await?;
    Ok(found)
}

/// Create a drink after validation.
pub async fn create_drink(db: &DatabaseConnection, title: &str, recipe: &[Ingredient]) -> Result<drink::Model, ServiceError> {
    // validations are in models::drink
    let created = drink::create(db, title, recipe).await?;
    Ok(created)
}

/// Update title and/or recipe in place; fields left as `None` are untouched.
pub async fn update_drink(
    db: &DatabaseConnection,
    id: i32,
    title: Option<&str>,
    recipe: Option<&[Ingredient]>,
) -> Result<drink::Model, ServiceError> {
    let current = DrinkEntity::find_by_id(id).one(db).await?;
    let Some(existing) = current else { return Err(ServiceError::not_found("drink")); };
    if title.is_none() && recipe.is_none() {
        return Ok(existing);
    }
    let mut am: drink::ActiveModel = existing.into();
    if let Some(t) = title { am.title = Set(drink::validate_title(t)?); }
    if let Some(r) = recipe { am.recipe = Set(drink::encode_recipe(r)?); }
    let updated = am.update(db).await?;
    Ok(updated)
}

/// Delete a drink; returns true if a row was removed.
pub async fn delete_drink(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = DrinkEntity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
