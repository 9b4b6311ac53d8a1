use async_trait::async_trait;
use models::drink::{self, Ingredient};
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;

#[async_trait]
pub trait DrinkRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<drink::Model>, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<drink::Model>, ServiceError>;
    async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<drink::Model, ServiceError>;
    async fn update(&self, id: i32, title: Option<&str>, recipe: Option<&[Ingredient]>) -> Result<drink::Model, ServiceError>;
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmDrinkRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl DrinkRepository for SeaOrmDrinkRepository {
    async fn list(&self) -> Result<Vec<drink::Model>, ServiceError> {
        crate::db::drink_store::list_drinks(&self.db).await
    }

    async fn get(&self, id: i32) -> Result<Option<drink::Model>, ServiceError> {
        crate::db::drink_store::get_drink(&self.db, id).await
    }

    async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<drink::Model, ServiceError> {
        crate::db::drink_store::create_drink(&self.db, title, recipe).await
    }

    async fn update(&self, id: i32, title: Option<&str>, recipe: Option<&[Ingredient]>) -> Result<drink::Model, ServiceError> {
        crate::db::drink_store::update_drink(&self.db, id, title, recipe).await
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        crate::db::drink_store::delete_drink(&self.db, id).await
    }
}

/// Simple in-memory repository for tests; enforces title uniqueness like the table does.
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    use models::errors::ModelError;

    #[derive(Default)]
    pub struct InMemoryDrinkRepository {
        state: Mutex<State>,
    }

    #[derive(Default)]
    struct State {
        rows: BTreeMap<i32, drink::Model>,
        next_id: i32,
    }

    impl InMemoryDrinkRepository {
        fn state(&self) -> Result<MutexGuard<'_, State>, ServiceError> {
            self.state.lock().map_err(|_| ModelError::Db("in-memory store poisoned".into()).into())
        }
    }

    impl State {
        fn ensure_unique(&self, title: &str, except: Option<i32>) -> Result<(), ServiceError> {
            let taken = self.rows.values().any(|d| d.title == title && Some(d.id) != except);
            if taken {
                return Err(ModelError::Conflict(format!("title {title:?} already exists")).into());
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DrinkRepository for InMemoryDrinkRepository {
        async fn list(&self) -> Result<Vec<drink::Model>, ServiceError> {
            Ok(self.state()?.rows.values().cloned().collect())
        }

        async fn get(&self, id: i32) -> Result<Option<drink::Model>, ServiceError> {
            Ok(self.state()?.rows.get(&id).cloned())
        }

        async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<drink::Model, ServiceError> {
            let title = drink::validate_title(title)?;
            let recipe = drink::encode_recipe(recipe)?;
            let mut state = self.state()?;
            state.ensure_unique(&title, None)?;
            state.next_id += 1;
            let row = drink::Model { id: state.next_id, title, recipe };
            state.rows.insert(row.id, row.clone());
            Ok(row)
        }

        async fn update(&self, id: i32, title: Option<&str>, recipe: Option<&[Ingredient]>) -> Result<drink::Model, ServiceError> {
            let title = title.map(drink::validate_title).transpose()?;
            let recipe = recipe.map(drink::encode_recipe).transpose()?;
            let mut state = self.state()?;
            if let Some(t) = &title {
                state.ensure_unique(t, Some(id))?;
            }
            let row = state.rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("drink"))?;
            if let Some(t) = title { row.title = t; }
            if let Some(r) = recipe { row.recipe = r; }
            Ok(row.clone())
        }

        async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
            Ok(self.state()?.rows.remove(&id).is_some())
        }
    }
}
