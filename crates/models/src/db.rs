use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{
    sea_query::Table, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityName,
    Schema,
};
use serde_json::Number;
use tracing::info;

use crate::{drink, errors::ModelError};

pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opt).await?;
    Ok(db)
}

/// Create the `drink` table from the entity definition if it is missing.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(drink::Entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

/// Drop and recreate the `drink` table, then seed it with a single drink.
/// Destroys every stored drink.
pub async fn reset_schema(db: &DatabaseConnection) -> Result<drink::Model, ModelError> {
    let backend = db.get_database_backend();
    let drop = Table::drop().table(drink::Entity.table_ref()).if_exists().to_owned();
    db.execute(backend.build(&drop)).await?;
    ensure_schema(db).await?;

    let water = drink::Ingredient {
        name: "water".into(),
        color: "blue".into(),
        parts: Number::from(1),
    };
    let seeded = drink::create(db, "water", &[water]).await?;
    info!(event = "schema_reset", seeded_id = seeded.id, "drink table recreated");
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::EntityTrait;

    async fn memory_db() -> anyhow::Result<DatabaseConnection> {
        let db = connect(&DatabaseConfig::sqlite_memory()).await?;
        ensure_schema(&db).await?;
        Ok(db)
    }

    #[tokio::test]
    async fn create_and_read_back() -> anyhow::Result<()> {
        let db = memory_db().await?;
        let recipe = vec![drink::Ingredient { name: "Milk".into(), color: "white".into(), parts: Number::from(2) }];

        let created = drink::create(&db, "Latte", &recipe).await?;
        assert!(created.id > 0);

        let found = drink::Entity::find_by_id(created.id).one(&db).await?.expect("row exists");
        assert_eq!(found.title, "Latte");
        assert_eq!(found.ingredients()?, recipe);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_title_is_a_conflict() -> anyhow::Result<()> {
        let db = memory_db().await?;
        drink::create(&db, "Mocha", &[]).await?;
        let err = drink::create(&db, "Mocha", &[]).await.unwrap_err();
        assert!(matches!(err, ModelError::Conflict(_)), "got {err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() -> anyhow::Result<()> {
        let db = memory_db().await?;
        ensure_schema(&db).await?;
        assert!(drink::Entity::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn reset_schema_leaves_only_the_seed() -> anyhow::Result<()> {
        let db = memory_db().await?;
        drink::create(&db, "Espresso", &[]).await?;

        let seeded = reset_schema(&db).await?;
        let all = drink::Entity::find().all(&db).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, seeded.id);
        assert_eq!(seeded.short()?.recipe[0].color, "blue");
        Ok(())
    }
}
