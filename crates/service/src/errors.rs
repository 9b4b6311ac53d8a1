use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn is_not_found(&self) -> bool { matches!(self, ServiceError::NotFound(_)) }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Model(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn db_errors_surface_as_model_errors() {
        let err = ServiceError::from(sea_orm::DbErr::Custom("connection reset".into()));
        assert!(matches!(err, ServiceError::Model(ModelError::Db(_))), "got {err:?}");
        assert!(!err.is_not_found());
        assert!(ServiceError::not_found("drink").is_not_found());
    }
}
