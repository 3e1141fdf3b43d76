//! Client profile entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the clients table joined with the linked account's username and
/// email.
#[derive(Debug, Clone, FromRow)]
pub struct ClientEntity {
    pub id: i64,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub lastname: String,
    pub document_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub email: Option<String>,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub user_username: Option<String>,
    pub user_email: Option<String>,
}

impl From<ClientEntity> for domain::models::Client {
    fn from(entity: ClientEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            name: entity.name,
            lastname: entity.lastname,
            document_number: entity.document_number,
            street: entity.street,
            city: entity.city,
            state: entity.state,
            country: entity.country,
            email: entity.email,
            phone: entity.phone,
            created_at: entity.created_at,
            user_username: entity.user_username,
            user_email: entity.user_email,
        }
    }
}
