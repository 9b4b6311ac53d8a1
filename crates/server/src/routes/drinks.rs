use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    Extension, Json,
};
use models::drink::{DrinkLong, DrinkShort, Ingredient};
use serde::{Deserialize, Deserializer, Serialize};
use service::auth::Claims;
use tracing::{info, warn};

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateDrinkInput {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Outer `None`: field absent. `Some(None)`: field sent as `null`.
#[derive(Debug, Deserialize)]
pub struct UpdateDrinkInput {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub recipe: Option<Option<Vec<Ingredient>>>,
}

fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl UpdateDrinkInput {
    /// Fields to apply; a field sent as `null` cannot be stored.
    fn into_changes(self) -> Result<(Option<String>, Option<Vec<Ingredient>>), ApiError> {
        match (self.title, self.recipe) {
            (Some(None), _) | (_, Some(None)) => {
                warn!("null field in drink update");
                Err(ApiError::Unprocessable)
            }
            (title, recipe) => Ok((title.flatten(), recipe.flatten())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksOutput<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksOutput<T> {
    fn new(drinks: Vec<T>) -> Self { Self { success: true, drinks } }
}

#[derive(Debug, Serialize)]
pub struct DeleteOutput {
    pub success: bool,
    pub delete: i32,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(v)) => Ok(v),
        Err(e) => {
            warn!(error = %e, "rejected request body");
            Err(ApiError::Unprocessable)
        }
    }
}

// `/drinks/abc` is a missing resource, not a bad request
fn drink_id(id: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    id.map(|Path(id)| id).map_err(|_| ApiError::NotFound)
}

#[utoipa::path(
    get, path = "/drinks", tag = "drinks",
    responses((status = 200, description = "Menu without ingredient names"))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<DrinksOutput<DrinkShort>>, ApiError> {
    let drinks = state.drinks.menu().await.map_err(ApiError::internal)?;
    info!(count = drinks.len(), "list drinks");
    Ok(Json(DrinksOutput::new(drinks)))
}

#[utoipa::path(
    get, path = "/drinks-detail", tag = "drinks",
    responses(
        (status = 200, description = "Drinks with full recipes"),
        (status = 401, description = "Unauthorized", body = crate::openapi::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn detail(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DrinksOutput<DrinkLong>>, ApiError> {
    let drinks = state.drinks.details().await.map_err(ApiError::internal)?;
    info!(sub = %claims.subject(), count = drinks.len(), "list drink details");
    Ok(Json(DrinksOutput::new(drinks)))
}

#[utoipa::path(
    post, path = "/drinks", tag = "drinks",
    request_body = crate::openapi::CreateDrinkRequest,
    responses(
        (status = 200, description = "Created"),
        (status = 401, description = "Unauthorized", body = crate::openapi::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::openapi::ErrorResponse),
        (status = 422, description = "Unprocessable", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateDrinkInput>, JsonRejection>,
) -> Result<Json<DrinksOutput<DrinkLong>>, ApiError> {
    let input = body(payload)?;
    let drink = state
        .drinks
        .create(&input.title, &input.recipe)
        .await
        .map_err(ApiError::unprocessable)?;
    info!(sub = %claims.subject(), id = drink.id, "created drink");
    Ok(Json(DrinksOutput::new(vec![drink])))
}

#[utoipa::path(
    patch, path = "/drinks/{id}", tag = "drinks",
    params(("id" = i32, Path, description = "Drink ID")),
    request_body = crate::openapi::UpdateDrinkRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 401, description = "Unauthorized", body = crate::openapi::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::openapi::ErrorResponse),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse),
        (status = 422, description = "Unprocessable", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateDrinkInput>, JsonRejection>,
) -> Result<Json<DrinksOutput<DrinkLong>>, ApiError> {
    let id = drink_id(id)?;
    // 先确认资源存在，再校验请求体：不存在的 id 无论 body 如何都返回 404
    if state.drinks.find(id).await.map_err(ApiError::unprocessable)?.is_none() {
        return Err(ApiError::NotFound);
    }
    let (title, recipe) = body(payload)?.into_changes()?;
    let drink = state
        .drinks
        .update(id, title.as_deref(), recipe.as_deref())
        .await
        .map_err(ApiError::unprocessable)?;
    info!(sub = %claims.subject(), id, "updated drink");
    Ok(Json(DrinksOutput::new(vec![drink])))
}

#[utoipa::path(
    delete, path = "/drinks/{id}", tag = "drinks",
    params(("id" = i32, Path, description = "Drink ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 401, description = "Unauthorized", body = crate::openapi::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::openapi::ErrorResponse),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse),
        (status = 422, description = "Unprocessable", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteOutput>, ApiError> {
    let id = drink_id(id)?;
    let deleted = state.drinks.delete(id).await.map_err(ApiError::unprocessable)?;
    info!(sub = %claims.subject(), id = deleted, "deleted drink");
    Ok(Json(DeleteOutput { success: true, delete: deleted }))
}
