//! Client profile repository for database operations.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::ClientEntity;
use crate::metrics::QueryTimer;

/// Client columns plus the linked account's username and email. Expects the
/// client row aliased as `c` and a LEFT JOIN on `users u`.
const CLIENT_SELECT: &str = r#"
    SELECT c.id, c.user_id, c.name, c.lastname, c.document_number, c.street, c.city,
           c.state, c.country, c.email, c.phone, c.created_at,
           u.username AS user_username, u.email AS user_email
"#;

/// Values for a client row, used for both insert and full update.
#[derive(Debug, Clone)]
pub struct NewClient<'a> {
    pub user_id: Option<Uuid>,
    pub name: &'a str,
    pub lastname: &'a str,
    pub document_number: &'a str,
    pub street: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub country: &'a str,
    pub email: Option<&'a str>,
    pub phone: &'a str,
}

impl<'a> From<&'a domain::models::Client> for NewClient<'a> {
    fn from(c: &'a domain::models::Client) -> Self {
        Self {
            user_id: c.user_id,
            name: &c.name,
            lastname: &c.lastname,
            document_number: &c.document_number,
            street: &c.street,
            city: &c.city,
            state: &c.state,
            country: &c.country,
            email: c.email.as_deref(),
            phone: &c.phone,
        }
    }
}

/// Repository for client profile database operations.
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a client by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_client_by_id");
        let sql = format!(
            "{} FROM clients c LEFT JOIN users u ON u.id = c.user_id WHERE c.id = $1",
            CLIENT_SELECT
        );
        let result = sqlx::query_as::<_, ClientEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// All clients ordered by id.
    pub async fn list(&self) -> Result<Vec<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_clients");
        let sql = format!(
            "{} FROM clients c LEFT JOIN users u ON u.id = c.user_id ORDER BY c.id",
            CLIENT_SELECT
        );
        let result = sqlx::query_as::<_, ClientEntity>(&sql)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Deletes a client; its reservations cascade.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_client");
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Whether another client already uses this email.
    pub async fn email_taken(
        conn: &mut PgConnection,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("client_email_taken");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM clients
                WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Whether another client already uses this document number.
    pub async fn document_taken(
        conn: &mut PgConnection,
        document_number: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("client_document_taken");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM clients
                WHERE document_number = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(document_number)
        .bind(exclude_id)
        .fetch_one(&mut *conn)
        .await;
        timer.record();
        result
    }

    pub async fn user_has_profile(conn: &mut PgConnection, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("client_user_has_profile");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Inserts a client and returns it with the linked account columns.
    pub async fn insert(conn: &mut PgConnection, client: &NewClient<'_>) -> Result<ClientEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_client");
        let sql = format!(
            r#"
            WITH c AS (
                INSERT INTO clients (user_id, name, lastname, document_number, street, city,
                                     state, country, email, phone)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
            )
            {} FROM c LEFT JOIN users u ON u.id = c.user_id
            "#,
            CLIENT_SELECT
        );
        let result = sqlx::query_as::<_, ClientEntity>(&sql)
            .bind(client.user_id)
            .bind(client.name)
            .bind(client.lastname)
            .bind(client.document_number)
            .bind(client.street)
            .bind(client.city)
            .bind(client.state)
            .bind(client.country)
            .bind(client.email)
            .bind(client.phone)
            .fetch_one(&mut *conn)
            .await;
        timer.record();
        result
    }

    /// Overwrites every editable column of a client. The account link is
    /// left untouched.
    pub async fn update(
        conn: &mut PgConnection,
        id: i64,
        client: &NewClient<'_>,
    ) -> Result<Option<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_client");
        let sql = format!(
            r#"
            WITH c AS (
                UPDATE clients
                SET name = $2, lastname = $3, document_number = $4, street = $5, city = $6,
                    state = $7, country = $8, email = $9, phone = $10
                WHERE id = $1
                RETURNING *
            )
            {} FROM c LEFT JOIN users u ON u.id = c.user_id
            "#,
            CLIENT_SELECT
        );
        let result = sqlx::query_as::<_, ClientEntity>(&sql)
            .bind(id)
            .bind(client.name)
            .bind(client.lastname)
            .bind(client.document_number)
            .bind(client.street)
            .bind(client.city)
            .bind(client.state)
            .bind(client.country)
            .bind(client.email)
            .bind(client.phone)
            .fetch_optional(&mut *conn)
            .await;
        timer.record();
        result
    }
}
