use std::sync::Arc;

use models::drink::{self, DrinkLong, DrinkShort, Ingredient};
use tracing::{info, instrument};

use crate::drink::repository::DrinkRepository;
use crate::errors::ServiceError;

/// Application service for the drink catalog.
/// Owns projection choice (short vs long) and the not-found policy.
#[derive(Clone)]
pub struct DrinkService {
    repo: Arc<dyn DrinkRepository>,
}

impl DrinkService {
    pub fn new(repo: Arc<dyn DrinkRepository>) -> Self { Self { repo } }

    /// Public menu: every drink without ingredient names.
    pub async fn menu(&self) -> Result<Vec<DrinkShort>, ServiceError> {
        let rows = self.repo.list().await?;
        rows.iter().map(|d| d.short().map_err(ServiceError::from)).collect()
    }

    /// Every drink with its full recipe.
    pub async fn details(&self) -> Result<Vec<DrinkLong>, ServiceError> {
        let rows = self.repo.list().await?;
        rows.iter().map(|d| d.long().map_err(ServiceError::from)).collect()
    }

    pub async fn find(&self, id: i32) -> Result<Option<drink::Model>, ServiceError> {
        self.repo.get(id).await
    }

    #[instrument(skip(self, recipe), fields(ingredients = recipe.len()))]
    pub async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<DrinkLong, ServiceError> {
        let created = self.repo.create(title, recipe).await?;
        info!(id = created.id, title = %created.title, "drink_created");
        Ok(created.long()?)
    }

    #[instrument(skip(self, recipe), fields(recipe_changed = recipe.is_some()))]
    pub async fn update(&self, id: i32, title: Option<&str>, recipe: Option<&[Ingredient]>) -> Result<DrinkLong, ServiceError> {
        let updated = self.repo.update(id, title, recipe).await?;
        info!(id = updated.id, title = %updated.title, "drink_updated");
        Ok(updated.long()?)
    }

    /// Delete by id, returning the id; `NotFound` when nothing was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<i32, ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("drink"));
        }
        info!(id, "drink_deleted");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drink::repository::mock::InMemoryDrinkRepository;
    use serde_json::Number;

    fn svc() -> DrinkService {
        DrinkService::new(Arc::new(InMemoryDrinkRepository::default()))
    }

    fn water() -> Vec<Ingredient> {
        vec![Ingredient { name: "Water".into(), color: "blue".into(), parts: Number::from(1) }]
    }

    #[tokio::test]
    async fn menu_and_details_project_differently() -> anyhow::Result<()> {
        let svc = svc();
        let created = svc.create("Water", &water()).await?;

        let details = svc.details().await?;
        assert_eq!(details, vec![created.clone()]);

        let menu = serde_json::to_value(svc.menu().await?)?;
        assert_eq!(
            menu,
            serde_json::json!([{"id": created.id, "title": "Water", "recipe": [{"color": "blue", "parts": 1}]}])
        );
        Ok(())
    }

    #[tokio::test]
    async fn empty_catalog_lists_nothing() -> anyhow::Result<()> {
        let svc = svc();
        assert!(svc.menu().await?.is_empty());
        assert!(svc.details().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn partial_update_keeps_other_field() -> anyhow::Result<()> {
        let svc = svc();
        let created = svc.create("Tea", &water()).await?;

        let renamed = svc.update(created.id, Some("Green Tea"), None).await?;
        assert_eq!(renamed.title, "Green Tea");
        assert_eq!(renamed.recipe, water());

        let leaves = vec![Ingredient { name: "Leaves".into(), color: "green".into(), parts: Number::from(1) }];
        let rerecipe = svc.update(created.id, None, Some(&leaves)).await?;
        assert_eq!(rerecipe.title, "Green Tea");
        assert_eq!(rerecipe.recipe, leaves);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_and_blank_titles_fail() -> anyhow::Result<()> {
        let svc = svc();
        svc.create("Cocoa", &water()).await?;
        assert!(svc.create("Cocoa", &water()).await.is_err());
        assert!(svc.create("  ", &water()).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn delete_reports_missing_ids() -> anyhow::Result<()> {
        let svc = svc();
        let created = svc.create("Chai", &water()).await?;
        assert_eq!(svc.delete(created.id).await?, created.id);
        assert!(svc.delete(created.id).await.unwrap_err().is_not_found());
        assert!(svc.update(created.id, Some("x"), None).await.unwrap_err().is_not_found());
        assert!(svc.find(created.id).await?.is_none());
        Ok(())
    }
}
