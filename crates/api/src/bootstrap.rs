//! Startup seeding of the admin account.

use ironquest_core::account::{validate_email, validate_username};
use ironquest_core::roles::ROLE_ADMIN;
use ironquest_db::models::user::CreateUser;
use ironquest_db::repositories::UserRepo;
use ironquest_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};

/// Create the configured admin account unless a user with that username
/// already exists. Returns `true` if an account was created.
///
/// An existing account is left untouched, even if its role or password
/// differ from the configuration.
pub async fn ensure_admin(pool: &DbPool, admin: &AdminBootstrap) -> AppResult<bool> {
    if UserRepo::find_by_username(pool, &admin.username)
        .await?
        .is_some()
    {
        tracing::debug!(username = %admin.username, "Admin account already exists");
        return Ok(false);
    }

    validate_username(&admin.username)?;
    validate_email(&admin.email)?;
    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Admin account created");
    Ok(true)
}
