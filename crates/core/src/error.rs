use crate::promo::PromoRejection;
use crate::types::DbId;

/// A consumable balance that an action can run short of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Stamina,
    Money,
    StarJewels,
    Item,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stamina => "stamina",
            Self::Money => "money",
            Self::StarJewels => "star_jewels",
            Self::Item => "item",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Not enough {resource}: required {required}, available {available}")]
    InsufficientResource {
        resource: Resource,
        required: i64,
        available: i64,
    },

    #[error("No deck configured")]
    EmptyDeck,

    #[error("Promo code rejected: {0}")]
    PromoRejected(PromoRejection),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Another request changed the row between read and write.
    #[error("Conflict: {0}")]
    Raced(String),

    /// Transient condition; the client may retry the same request.
    #[error("Temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::InsufficientResource`].
    pub fn insufficient(resource: Resource, required: i64, available: i64) -> Self {
        Self::InsufficientResource {
            resource,
            required,
            available,
        }
    }
}
