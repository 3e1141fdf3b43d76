//! Client profile service.
//!
//! Staff manage every profile. A regular user may create one profile, linked
//! to their own account, and read or edit only that profile.

use domain::models::client::{
    with_uniqueness, Client, ClientResponse, CreateClientRequest, UpdateClientRequest,
    PROFILE_EXISTS,
};
use domain::FieldErrors;
use persistence::repositories::{ClientRepository, NewClient, UserRepository};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::extractors::user_auth::PERMISSION_DENIED;
use crate::middleware::UserAuth;

pub const CLIENT_NOT_FOUND: &str = "Client not found";
pub const USER_ALREADY_LINKED: &str = "client with this user already exists.";
pub const USER_DOES_NOT_EXIST: &str = "Invalid pk - object does not exist.";

/// Row values for a new profile built from a validated request.
pub fn new_client<'a>(
    req: &'a CreateClientRequest,
    user_id: Option<Uuid>,
    email: Option<&'a str>,
) -> NewClient<'a> {
    NewClient {
        user_id,
        name: &req.name,
        lastname: &req.lastname,
        document_number: &req.document_number,
        street: &req.street,
        city: &req.city,
        state: &req.state,
        country: &req.country,
        email,
        phone: &req.phone,
    }
}

/// Field rules plus email and document uniqueness, ignoring `exclude_id`.
pub async fn check_client_fields(
    conn: &mut PgConnection,
    validation: Result<(), validator::ValidationErrors>,
    email: Option<&str>,
    document_number: &str,
    exclude_id: Option<i64>,
) -> Result<(), ApiError> {
    let errors = match validation {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(e),
    };

    let email_taken = match email {
        Some(email) => ClientRepository::email_taken(conn, email, exclude_id).await?,
        None => false,
    };
    let document_taken = !document_number.is_empty()
        && ClientRepository::document_taken(conn, document_number, exclude_id).await?;

    with_uniqueness(errors, email_taken, document_taken).into_result()?;
    Ok(())
}

pub struct ClientService {
    pool: PgPool,
    clients: ClientRepository,
}

impl ClientService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            clients: ClientRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn list(&self) -> Result<Vec<ClientResponse>, ApiError> {
        let clients = self.clients.list().await?;
        Ok(clients
            .into_iter()
            .map(|c| ClientResponse::from(Client::from(c)))
            .collect())
    }

    /// Loads a profile the caller may see: staff see all, others only their own.
    async fn visible(&self, auth: &UserAuth, id: i64) -> Result<Client, ApiError> {
        let client: Client = self
            .clients
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(CLIENT_NOT_FOUND.to_string()))?
            .into();

        if !auth.is_staff && !client.is_owned_by(auth.user_id) {
            return Err(ApiError::Forbidden(PERMISSION_DENIED.to_string()));
        }
        Ok(client)
    }

    pub async fn get(&self, auth: &UserAuth, id: i64) -> Result<ClientResponse, ApiError> {
        Ok(self.visible(auth, id).await?.into())
    }

    /// Creates a profile.
    ///
    /// Staff may link any account through `user` or none at all; a regular
    /// caller is always linked to themselves and only once.
    pub async fn create(
        &self,
        auth: &UserAuth,
        req: CreateClientRequest,
    ) -> Result<ClientResponse, ApiError> {
        let mut tx = self.pool.begin().await?;

        let user_id = if auth.is_staff {
            if let Some(user_id) = req.user {
                if !UserRepository::exists(&mut tx, user_id).await? {
                    return Err(FieldErrors::single("user", USER_DOES_NOT_EXIST).into());
                }
                if ClientRepository::user_has_profile(&mut tx, user_id).await? {
                    return Err(FieldErrors::single("user", USER_ALREADY_LINKED).into());
                }
            }
            req.user
        } else {
            if ClientRepository::user_has_profile(&mut tx, auth.user_id).await? {
                return Err(FieldErrors::non_field(PROFILE_EXISTS).into());
            }
            Some(auth.user_id)
        };

        let email = req.normalized_email();
        check_client_fields(
            &mut tx,
            req.validate(),
            email.as_deref(),
            &req.document_number,
            None,
        )
        .await?;

        let created = ClientRepository::insert(&mut tx, &new_client(&req, user_id, email.as_deref())).await?;
        tx.commit().await?;

        tracing::info!(
            client_id = created.id,
            user_id = ?created.user_id,
            created_by = %auth.user_id,
            "Client profile created"
        );
        Ok(Client::from(created).into())
    }

    /// Applies a full (`PUT`) or partial (`PATCH`) update.
    pub async fn update(
        &self,
        auth: &UserAuth,
        id: i64,
        update: UpdateClientRequest,
    ) -> Result<ClientResponse, ApiError> {
        let mut client = self.visible(auth, id).await?;
        let validation = update.validate();
        client.apply(update);

        let mut tx = self.pool.begin().await?;
        check_client_fields(
            &mut tx,
            validation,
            client.email.as_deref(),
            &client.document_number,
            Some(id),
        )
        .await?;

        let updated = ClientRepository::update(&mut tx, id, &NewClient::from(&client))
            .await?
            .ok_or_else(|| ApiError::NotFound(CLIENT_NOT_FOUND.to_string()))?;
        tx.commit().await?;

        tracing::info!(client_id = id, updated_by = %auth.user_id, "Client profile updated");
        Ok(Client::from(updated).into())
    }

    pub async fn delete(&self, auth: &UserAuth, id: i64) -> Result<(), ApiError> {
        if !self.clients.delete(id).await? {
            return Err(ApiError::NotFound(CLIENT_NOT_FOUND.to_string()));
        }
        tracing::info!(client_id = id, deleted_by = %auth.user_id, "Client profile deleted");
        Ok(())
    }
}
