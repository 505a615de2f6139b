use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::settings::MAX_PAGE_SIZE;
use crate::config::{begin_transaction, commit_transaction};
use crate::errors::internal::UserError;
use crate::errors::InternalError;
use crate::stores::profile_store::ProfileFields;
use crate::stores::user_store::NewUser;
use crate::stores::{AuditStore, GroupStore, ProfileStore, UserStore};
use crate::types::db::{user, user_profile};
use crate::types::dto::user::UpdateProfileRequest;
use crate::types::internal::audit::{AuditEvent, EventType};
use crate::types::internal::auth::Claims;
use crate::types::internal::context::RequestContext;

const MAX_USERNAME_LENGTH: usize = 50;
const MAX_NAME_LENGTH: usize = 50;
const MAX_MEMBERSHIP_YEARS_LENGTH: usize = 500;
const MAX_GENDER_LENGTH: usize = 50;
const MAX_COUNTRY_LENGTH: usize = 50;
const MAX_POSTAL_CODE_LENGTH: usize = 10;
const MAX_STREET_ADDRESS_LENGTH: usize = 100;
const MAX_PHONE_NUMBER_LENGTH: usize = 20;
const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 9999;

/// A user with everything the admin view shows about it
#[derive(Debug, Clone)]
pub struct UserDetails {
    pub user: user::Model,
    pub profile: Option<user_profile::Model>,
    pub group_ids: Vec<i32>,
}

/// Reads users and edits profiles; never writes the derived access flags
pub struct UserService {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    group_store: Arc<GroupStore>,
    profile_store: Arc<ProfileStore>,
    audit_store: Arc<AuditStore>,
    pagination_size: u64,
}

impl UserService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            group_store: app_data.group_store.clone(),
            profile_store: app_data.profile_store.clone(),
            audit_store: app_data.audit_store.clone(),
            pagination_size: app_data.settings.pagination_size(),
        }
    }

    /// Find or create the local user for identity-provider claims
    ///
    /// New users start with every access flag cleared and an empty profile. Known
    /// users get their name and e-mail refreshed from the claims; nothing else changes.
    /// Names longer than the stored limit are truncated on both paths.
    pub async fn provision(&self, claims: &Claims) -> Result<user::Model, InternalError> {
        let first_name = claim_name(claims.given_name.as_deref());
        let last_name = claim_name(claims.family_name.as_deref());
        let email = normalize_email(claims.email.as_deref().unwrap_or_default());

        if let Some(existing) = self.user_store.find_by_subject(&self.db, &claims.sub).await? {
            if existing.first_name == first_name && existing.last_name == last_name && existing.email == email {
                return Ok(existing);
            }
            tracing::debug!(user_id = %existing.id, "Refreshing identity fields from token claims");
            return self
                .user_store
                .update_identity(&self.db, &existing.id, first_name, last_name, email)
                .await;
        }

        let ctx = RequestContext::for_system("provision_user");
        let username = claims.preferred_username.as_deref().unwrap_or_default();
        self.create_user(&ctx, &claims.sub, username, &email, &first_name, &last_name)
            .await
    }

    /// Create a user with no groups, no access flags and an empty profile
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        subject_id: &str,
        username: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<user::Model, InternalError> {
        let pretty_username = validate_username(username)?;
        if subject_id.trim().is_empty() {
            return Err(UserError::invalid_field("subject_id", "must not be empty").into());
        }
        let first_name = validate_name("first_name", first_name)?;
        let last_name = validate_name("last_name", last_name)?;

        let new_user = NewUser {
            subject_id: subject_id.to_string(),
            username: pretty_username.to_lowercase(),
            pretty_username,
            first_name,
            last_name,
            email: normalize_email(email),
        };

        let txn = begin_transaction(&self.db).await?;
        let user = self.user_store.insert_user(&txn, new_user).await?;
        self.profile_store
            .save(&txn, &user.id, ProfileFields::default())
            .await?;
        self.audit_store
            .write_event(
                &txn,
                ctx,
                AuditEvent::new(EventType::UserProvisioned, user_target(&user.id))
                    .with_data("username", user.username.clone())
                    .with_data("subject_id", user.subject_id.clone()),
            )
            .await?;
        commit_transaction(txn).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<user::Model, InternalError> {
        self.user_store.get_by_id(&self.db, user_id).await
    }

    pub async fn find_by_subject(&self, subject_id: &str) -> Result<Option<user::Model>, InternalError> {
        self.user_store.find_by_subject(&self.db, subject_id).await
    }

    pub async fn get_user_details(&self, user_id: &str) -> Result<UserDetails, InternalError> {
        let user = self.user_store.get_by_id(&self.db, user_id).await?;
        let profile = self.profile_store.find(&self.db, user_id).await?;
        let group_ids = self.group_store.group_ids_of_user(&self.db, user_id).await?;
        Ok(UserDetails {
            user,
            profile,
            group_ids,
        })
    }

    /// One page of users ordered by username
    ///
    /// Returns the users, the total count, and the limit and offset actually applied.
    pub async fn list_users(
        &self,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<(Vec<user::Model>, u64, u64, u64), InternalError> {
        let limit = limit.unwrap_or(self.pagination_size).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0);
        let (users, count) = self.user_store.list(&self.db, limit, offset).await?;
        Ok((users, count, limit, offset))
    }

    /// The user's profile, or an unsaved empty one when none exists yet
    pub async fn get_profile(&self, user_id: &str) -> Result<user_profile::Model, InternalError> {
        self.user_store.get_by_id(&self.db, user_id).await?;
        Ok(self
            .profile_store
            .find(&self.db, user_id)
            .await?
            .unwrap_or_else(|| empty_profile(user_id)))
    }

    /// Grant or revoke membership; not reachable through self-service profile edits
    pub async fn set_member_status(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        is_member: bool,
    ) -> Result<user_profile::Model, InternalError> {
        let txn = begin_transaction(&self.db).await?;
        self.user_store.get_by_id(&txn, user_id).await?;
        let profile = self.profile_store.set_member_status(&txn, user_id, is_member).await?;
        self.audit_store
            .write_event(
                &txn,
                ctx,
                AuditEvent::new(EventType::MemberStatusChanged, user_target(user_id))
                    .with_data("is_member", is_member),
            )
            .await?;
        commit_transaction(txn).await?;

        tracing::info!(user_id = %user_id, is_member, "Member status changed");
        Ok(profile)
    }

    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<user_profile::Model, InternalError> {
        let fields = profile_fields(request)?;

        let txn = begin_transaction(&self.db).await?;
        self.user_store.get_by_id(&txn, user_id).await?;
        let profile = self.profile_store.save(&txn, user_id, fields).await?;
        self.audit_store
            .write_event(
                &txn,
                ctx,
                AuditEvent::new(EventType::ProfileUpdated, user_target(user_id))
                    .with_data("has_address", profile.has_address()),
            )
            .await?;
        commit_transaction(txn).await?;

        tracing::info!(user_id = %user_id, "Profile updated");
        Ok(profile)
    }
}

fn user_target(user_id: &str) -> String {
    format!("user:{}", user_id)
}

fn empty_profile(user_id: &str) -> user_profile::Model {
    user_profile::Model {
        user_id: user_id.to_string(),
        birth_date: None,
        gender: None,
        country: None,
        postal_code: None,
        street_address: None,
        phone_number: None,
        membership_years: None,
        is_member: false,
    }
}

/// Lower-case the domain part of an e-mail address, leaving the local part alone
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Returns the trimmed username in its original letter case
fn validate_username(username: &str) -> Result<String, InternalError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(UserError::InvalidUsername {
            reason: "username must be set".to_string(),
        }
        .into());
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(UserError::InvalidUsername {
            reason: format!("username must be at most {} characters", MAX_USERNAME_LENGTH),
        }
        .into());
    }
    if username.chars().any(char::is_whitespace) {
        return Err(UserError::InvalidUsername {
            reason: "username must not contain whitespace".to_string(),
        }
        .into());
    }
    Ok(username.to_string())
}

/// Trimmed provider-supplied name cut to the stored length
fn claim_name(value: Option<&str>) -> String {
    value
        .unwrap_or_default()
        .trim()
        .chars()
        .take(MAX_NAME_LENGTH)
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn validate_name(field: &str, value: &str) -> Result<String, InternalError> {
    let value = value.trim();
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(UserError::invalid_field(field, format!("must be at most {} characters", MAX_NAME_LENGTH)).into());
    }
    Ok(value.to_string())
}

/// Trimmed value, `None` when blank; longer than `max_length` characters is an error
fn profile_text(field: &str, value: Option<String>, max_length: usize) -> Result<Option<String>, InternalError> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    if let Some(v) = &value {
        if v.chars().count() > max_length {
            return Err(UserError::invalid_field(field, format!("must be at most {} characters", max_length)).into());
        }
    }
    Ok(value)
}

fn profile_fields(request: UpdateProfileRequest) -> Result<ProfileFields, InternalError> {
    if let Some(year) = request
        .membership_years
        .iter()
        .find(|year| !(MIN_YEAR..=MAX_YEAR).contains(*year))
    {
        return Err(UserError::invalid_field("membership_years", format!("{} is not a valid year", year)).into());
    }

    let membership_years = if request.membership_years.is_empty() {
        None
    } else {
        let joined = request
            .membership_years
            .iter()
            .map(|year| year.to_string())
            .collect::<Vec<_>>()
            .join(",");
        if joined.len() > MAX_MEMBERSHIP_YEARS_LENGTH {
            return Err(UserError::invalid_field("membership_years", "too many years").into());
        }
        Some(joined)
    };

    Ok(ProfileFields {
        birth_date: request.birth_date,
        gender: profile_text("gender", request.gender, MAX_GENDER_LENGTH)?,
        country: profile_text("country", request.country, MAX_COUNTRY_LENGTH)?,
        postal_code: profile_text("postal_code", request.postal_code, MAX_POSTAL_CODE_LENGTH)?,
        street_address: profile_text("street_address", request.street_address, MAX_STREET_ADDRESS_LENGTH)?,
        phone_number: profile_text("phone_number", request.phone_number, MAX_PHONE_NUMBER_LENGTH)?,
        membership_years,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases_domain_only() {
        assert_eq!(normalize_email("John.Doe@Example.COM"), "John.Doe@example.com");
        assert_eq!(normalize_email("  a@B.org "), "a@b.org");
        assert_eq!(normalize_email("not-an-email"), "not-an-email");
        assert_eq!(normalize_email(""), "");
    }

    #[test]
    fn test_username_validation() {
        assert_eq!(validate_username(" Alice ").unwrap(), "Alice");
        assert!(validate_username("").is_err());
        assert!(validate_username("two words").is_err());
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_profile_fields_drop_blank_values() {
        let fields = profile_fields(UpdateProfileRequest {
            gender: Some("  ".to_string()),
            country: Some(" Finland ".to_string()),
            membership_years: vec![2019, 2020],
            ..Default::default()
        })
        .unwrap();

        assert_eq!(fields.gender, None);
        assert_eq!(fields.country.as_deref(), Some("Finland"));
        assert_eq!(fields.membership_years.as_deref(), Some("2019,2020"));
    }

    #[test]
    fn test_profile_fields_enforce_lengths_after_trimming() {
        let fields = profile_fields(UpdateProfileRequest {
            postal_code: Some(format!("  {}  ", "1".repeat(MAX_POSTAL_CODE_LENGTH))),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(fields.postal_code.map(|v| v.len()), Some(MAX_POSTAL_CODE_LENGTH));

        let result = profile_fields(UpdateProfileRequest {
            phone_number: Some("5".repeat(MAX_PHONE_NUMBER_LENGTH + 1)),
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(InternalError::User(UserError::InvalidField { ref field, .. })) if field == "phone_number"
        ));

        let result = profile_fields(UpdateProfileRequest {
            street_address: Some("a".repeat(MAX_STREET_ADDRESS_LENGTH + 1)),
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(InternalError::User(UserError::InvalidField { ref field, .. })) if field == "street_address"
        ));
    }

    #[test]
    fn test_claim_name_is_cut_to_stored_length() {
        assert_eq!(claim_name(None), "");
        assert_eq!(claim_name(Some("  Ada ")), "Ada");
        let long = "é".repeat(MAX_NAME_LENGTH + 10);
        assert_eq!(claim_name(Some(&long)).chars().count(), MAX_NAME_LENGTH);
    }

    #[test]
    fn test_profile_fields_reject_invalid_year() {
        let result = profile_fields(UpdateProfileRequest {
            membership_years: vec![2020, 99],
            ..Default::default()
        });

        assert!(matches!(
            result,
            Err(InternalError::User(UserError::InvalidField { ref field, .. })) if field == "membership_years"
        ));
    }
}
