//! User service: signup and admin account management.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use tallysheet_common::{AppError, AppResult, IdGenerator, PageQuery, validate_id};
use tallysheet_db::{
    entities::{user, user::Role},
    repositories::UserRepository,
};
use sea_orm::Set;
use validator::Validate;

use super::access::{Action, Actor, can_perform};
use super::approval::ApprovalService;

/// Input for registering a new admin account.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    /// Full name.
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    /// Phone number; the signup identity.
    #[validate(length(min = 4, max = 32))]
    pub phone: String,

    /// Organization name.
    #[validate(length(min = 1, max = 256))]
    pub organization: String,

    /// Password.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    approval: ApprovalService,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, approval: ApprovalService) -> Self {
        Self {
            user_repo,
            approval,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new admin account and enqueue it for super-admin
    /// review.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        input.validate()?;

        let phone = input.phone.trim().to_string();
        if !phone.chars().all(|c| c.is_ascii_digit() || c == '+') {
            return Err(AppError::Validation(
                "phone may only contain digits and a leading +".to_string(),
            ));
        }

        if self.user_repo.find_by_phone(&phone).await?.is_some() {
            return Err(AppError::Conflict(
                "an account already exists with this phone".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            phone: Set(phone),
            organization: Set(input.organization.trim().to_string()),
            password_hash: Set(password_hash),
            role: Set(Role::New),
            is_verified: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.user_repo.create(model).await?;
        self.approval.enqueue_user_signup(&created).await?;

        tracing::info!(user_id = %created.id, "admin signup queued for review");

        Ok(created)
    }

    /// Get a user by id.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        validate_id(id)?;
        self.user_repo.get_by_id(id).await
    }

    /// List admin accounts. Super-admin only.
    pub async fn list_admins(
        &self,
        actor: &Actor,
        page: PageQuery,
    ) -> AppResult<(Vec<user::Model>, u64)> {
        if !can_perform(actor.role, Action::ManageAdmins) {
            return Err(AppError::Unauthorized);
        }

        self.user_repo.list(page).await
    }

    /// Manually override an account's verification, outside the
    /// notification flow. Applies the same role transition the approval
    /// cascade uses.
    pub async fn set_verification(
        &self,
        actor: &Actor,
        user_id: &str,
        verified: bool,
    ) -> AppResult<()> {
        if !can_perform(actor.role, Action::ManageAdmins) {
            return Err(AppError::Unauthorized);
        }

        validate_id(user_id)?;
        self.user_repo.get_by_id(user_id).await?;

        let role = if verified {
            Role::VerifiedAdmin
        } else {
            Role::Canceled
        };

        self.user_repo.set_role(user_id, role, verified).await
    }
}

/// Hash a password with Argon2id.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a password against its stored hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("stored password hash invalid: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
