use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct IngredientDoc {
    pub name: String,
    pub color: String,
    pub parts: f64,
}

#[derive(ToSchema)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: Vec<IngredientDoc>,
}

#[derive(ToSchema)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Vec<IngredientDoc>>,
}

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
    /// Present on 401/403 responses, e.g. `token_expired`.
    pub code: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::drinks::list,
        crate::routes::drinks::detail,
        crate::routes::drinks::create,
        crate::routes::drinks::update,
        crate::routes::drinks::delete,
    ),
    components(
        schemas(
            HealthResponse,
            IngredientDoc,
            CreateDrinkRequest,
            UpdateDrinkRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "drinks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_drink_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for p in ["/drinks", "/drinks-detail", "/drinks/{id}", "/health"] {
            assert!(paths.iter().any(|k| k.as_str() == p), "missing {p}");
        }
    }
}
