use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("delivery failed: {0}")]
    Delivery(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Stable machine-readable kind used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) | ServiceError::Model(models::errors::ModelError::Validation(_)) => "validation",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Conflict(_) | ServiceError::Model(models::errors::ModelError::Duplicate(_)) => "conflict",
            ServiceError::Forbidden(_) => "forbidden",
            ServiceError::Db(_) | ServiceError::Delivery(_) | ServiceError::Model(models::errors::ModelError::Db(_)) => "internal",
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        match models::errors::ModelError::from(e) {
            models::errors::ModelError::Db(msg) => ServiceError::Db(msg),
            other => ServiceError::Model(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn model_errors_keep_their_kind() {
        assert_eq!(ServiceError::from(ModelError::Validation("x".into())).kind(), "validation");
        assert_eq!(ServiceError::from(ModelError::Db("x".into())).kind(), "internal");
        assert_eq!(ServiceError::from(ModelError::Duplicate("code".into())).kind(), "conflict");
        assert_eq!(ServiceError::not_found("salon").to_string(), "not found: salon not found");
    }
}
