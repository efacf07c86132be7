use crate::core::error::ValidationError;
use crate::core::routes::FormMode;
use crate::models::role::Role;
use crate::models::user::{UserPayload, UserStatus};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Upload cap for profile photos (5 MB)
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Raw user form fields, as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFormData {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Selected role id as entered; parsed on submit
    pub role_id: String,
    pub password: String,
    pub confirm_password: String,
    pub status: UserStatus,
    pub photo: Option<String>,
}

impl UserFormData {
    /// Build the submit body. A blank password is left out entirely.
    pub fn to_payload(&self) -> Result<UserPayload, ValidationError> {
        let role_id = parse_role_id(&self.role_id)?;
        Ok(UserPayload {
            name: self.name.trim().to_string(),
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            role_id,
            status: self.status,
            photo: self.photo.clone().filter(|p| !p.is_empty()),
            password: Some(self.password.clone()).filter(|p| !p.is_empty()),
        })
    }
}

fn parse_role_id(raw: &str) -> Result<i64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::RoleRequired);
    }
    raw.parse().map_err(|_| ValidationError::RoleInvalid)
}

/// Validate a user form before anything is sent.
///
/// The role check against `roles` is skipped while the role list is empty.
pub fn validate_user_form(
    form: &UserFormData,
    roles: &[Role],
    mode: FormMode,
) -> Result<(), ValidationError> {
    if mode.is_read_only() {
        return Err(ValidationError::ReadOnly);
    }

    if form.name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }

    if form.username.trim().is_empty() {
        return Err(ValidationError::UsernameRequired);
    }

    let role_id = parse_role_id(&form.role_id)?;
    if !roles.is_empty() && !roles.iter().any(|role| role.id == role_id) {
        return Err(ValidationError::RoleInvalid);
    }

    match mode {
        FormMode::Create => {
            if form.password.is_empty() {
                return Err(ValidationError::PasswordRequired);
            }
            validate_new_password(&form.password, &form.confirm_password)?;
        }
        FormMode::Edit(_) if !form.password.is_empty() => {
            validate_new_password(&form.password, &form.confirm_password)?;
        }
        _ => {}
    }

    Ok(())
}

fn validate_new_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_photo_size(size: usize) -> Result<(), ValidationError> {
    if size > MAX_PHOTO_BYTES {
        return Err(ValidationError::ImageTooLarge {
            size,
            max: MAX_PHOTO_BYTES,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFormData {
    pub name: String,
    pub description: String,
    /// Selected permission ids in selection order
    pub permissions: Vec<i64>,
}

impl RoleFormData {
    /// Select `id` if absent, deselect it otherwise
    pub fn toggle_permission(&mut self, id: i64) {
        if let Some(pos) = self.permissions.iter().position(|p| *p == id) {
            self.permissions.remove(pos);
        } else {
            self.permissions.push(id);
        }
    }
}

pub fn validate_role_form(form: &RoleFormData) -> Result<(), ValidationError> {
    if form.name.trim().is_empty() {
        return Err(ValidationError::RoleNameRequired);
    }
    if form.description.trim().is_empty() {
        return Err(ValidationError::RoleDescriptionRequired);
    }
    Ok(())
}
