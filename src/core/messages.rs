// User-visible text, rendered per locale

use serde::Deserialize;

/// Display language for every message shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Km,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Km => "km",
            Locale::En => "en",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Fallbacks used by the resource API when the server sends no message
    FetchUsersFailed,
    CreateUserFailed,
    UpdateUserFailed,
    DeleteUserFailed,
    ChangePasswordFailed,
    UpdateStatusFailed,
    FetchRolesFailed,
    FetchRoleFailed,
    SaveRoleFailed,
    FetchPermissionsFailed,
    CannotConnect,
    InternalError,

    // List view
    UsersUnavailable,
    DeleteRowFailed,
    StatusToggleFailed,
    ConfirmDeleteUser(String),
    NoViewPermission,
    AdminOnlyUsers,
    NoUsers,
    NoSearchResults,

    // User form
    NoCreatePermission,
    NoEditPermission,
    NoDeletePermission,
    AdminOnlyManageUsers,
    RolesUnavailable,
    UserUnavailable,
    ImageTooLarge,
    NameRequired,
    UsernameRequired,
    RoleRequired,
    RoleInvalid,
    PasswordRequired,
    PasswordTooShort(usize),
    PasswordMismatch,
    SaveUserFailed,
    ReadOnly,

    // Role form
    RoleNameRequired,
    RoleDescriptionRequired,
    RoleUnavailable,
    AdminOnlyManageRoles,
    SaveFailed,
}

impl Message {
    pub fn text(&self, locale: Locale) -> String {
        match locale {
            Locale::Km => self.khmer(),
            Locale::En => self.english(),
        }
    }

    fn khmer(&self) -> String {
        match self {
            Message::FetchUsersFailed => "មានបញ្ហាក្នុងការទាញយកទិន្នន័យអ្នកប្រើប្រាស់".into(),
            Message::CreateUserFailed => "មានបញ្ហាក្នុងការបង្កើតអ្នកប្រើប្រាស់ថ្មី".into(),
            Message::UpdateUserFailed => "មានបញ្ហាក្នុងការកែប្រែអ្នកប្រើប្រាស់".into(),
            Message::DeleteUserFailed => "មានបញ្ហាក្នុងការលុបអ្នកប្រើប្រាស់".into(),
            Message::ChangePasswordFailed => "មានបញ្ហាក្នុងការប្តូរពាក្យសម្ងាត់".into(),
            Message::UpdateStatusFailed => "មានបញ្ហាក្នុងការកែប្រែស្ថានភាព".into(),
            Message::FetchRolesFailed => "មានបញ្ហាក្នុងការទាញយកតួនាទី".into(),
            Message::FetchRoleFailed => "មានបញ្ហាក្នុងការទាញយកទិន្នន័យតួនាទី".into(),
            Message::SaveRoleFailed => "មានបញ្ហាក្នុងការរក្សាទុកតួនាទី".into(),
            Message::FetchPermissionsFailed => "មានបញ្ហាក្នុងការទាញយកសិទ្ធិ".into(),
            Message::CannotConnect => "មិនអាចតភ្ជាប់ទៅប្រព័ន្ធ".into(),
            Message::InternalError => "មានបញ្ហាខាងក្នុង".into(),
            Message::UsersUnavailable => "មិនអាចទាញយកទិន្នន័យអ្នកប្រើប្រាស់បានទេ".into(),
            Message::DeleteRowFailed => "មិនអាចលុបអ្នកប្រើប្រាស់បានទេ".into(),
            Message::StatusToggleFailed => "មិនអាចកែប្រែស្ថានភាពអ្នកប្រើប្រាស់បានទេ".into(),
            Message::ConfirmDeleteUser(name) => {
                format!("តើអ្នកពិតជាចង់លុបអ្នកប្រើប្រាស់ \"{}\" មែនទេ?", name)
            }
            Message::NoViewPermission => "អ្នកមិនមានសិទ្ធិមើលបញ្ជីអ្នកប្រើប្រាស់ទេ".into(),
            Message::AdminOnlyUsers => "តែ Admin ប៉ុណ្ណោះដែលអាចមើលឃើញអ្នកប្រើប្រាស់បាន".into(),
            Message::NoUsers => "គ្មានអ្នកប្រើប្រាស់ទេ".into(),
            Message::NoSearchResults => "គ្មានលទ្ធផលស្វែងរក".into(),
            Message::NoCreatePermission => "អ្នកមិនមានសិទ្ធិបង្កើតអ្នកប្រើប្រាស់ថ្មីទេ".into(),
            Message::NoEditPermission => "អ្នកមិនមានសិទ្ធិកែប្រែអ្នកប្រើប្រាស់ទេ".into(),
            Message::NoDeletePermission => "អ្នកមិនមានសិទ្ធិលុបអ្នកប្រើប្រាស់ទេ".into(),
            Message::AdminOnlyManageUsers => {
                "តែ Admin ប៉ុណ្ណោះដែលអាចគ្រប់គ្រងអ្នកប្រើប្រាស់បាន".into()
            }
            Message::RolesUnavailable => "មិនអាចទាញយកតួនាទីបានទេ".into(),
            Message::UserUnavailable => "មិនអាចទាញយកទិន្នន័យអ្នកប្រើប្រាស់បានទេ".into(),
            Message::ImageTooLarge => "រូបភាពធំពេក។ សូមជ្រើសរើសរូបភាពតូចជាង 5MB".into(),
            Message::NameRequired => "សូមបញ្ចូលឈ្មោះ".into(),
            Message::UsernameRequired => "សូមបញ្ចូលឈ្មោះអ្នកប្រើប្រាស់".into(),
            Message::RoleRequired => "សូមជ្រើសរើសតួនាទី".into(),
            Message::RoleInvalid => "តួនាទីដែលជ្រើសរើសមិនត្រឹមត្រូវទេ".into(),
            Message::PasswordRequired => "សូមបញ្ចូលពាក្យសម្ងាត់".into(),
            Message::PasswordTooShort(min) => {
                format!("ពាក្យសម្ងាត់ត្រូវតែមានយ៉ាងហោចណាស់ {} តួអក្សរ", min)
            }
            Message::PasswordMismatch => "ពាក្យសម្ងាត់មិនត្រូវគ្នាទេ".into(),
            Message::SaveUserFailed => "មិនអាចរក្សាទុកអ្នកប្រើប្រាស់បានទេ".into(),
            Message::ReadOnly => "ទម្រង់នេះសម្រាប់តែមើលប៉ុណ្ណោះ".into(),
            Message::RoleNameRequired => "សូមបញ្ចូលឈ្មោះតួនាទី".into(),
            Message::RoleDescriptionRequired => "សូមបញ្ចូលការពិពណ៌នា".into(),
            Message::RoleUnavailable => "មិនអាចទាញយកទិន្នន័យតួនាទីបានទេ".into(),
            Message::AdminOnlyManageRoles => "តែ Admin ប៉ុណ្ណោះដែលអាចគ្រប់គ្រងតួនាទីបាន".into(),
            Message::SaveFailed => "មិនអាចរក្សាទុកបានទេ".into(),
        }
    }

    fn english(&self) -> String {
        match self {
            Message::FetchUsersFailed => "Failed to fetch user data".into(),
            Message::CreateUserFailed => "Failed to create the user".into(),
            Message::UpdateUserFailed => "Failed to update the user".into(),
            Message::DeleteUserFailed => "Failed to delete the user".into(),
            Message::ChangePasswordFailed => "Failed to change the password".into(),
            Message::UpdateStatusFailed => "Failed to update the user status".into(),
            Message::FetchRolesFailed => "Failed to fetch roles".into(),
            Message::FetchRoleFailed => "Failed to fetch the role".into(),
            Message::SaveRoleFailed => "Failed to save the role".into(),
            Message::FetchPermissionsFailed => "Failed to fetch permissions".into(),
            Message::CannotConnect => "Cannot connect to the server".into(),
            Message::InternalError => "Internal error".into(),
            Message::UsersUnavailable => "Could not load users".into(),
            Message::DeleteRowFailed => "Could not delete the user".into(),
            Message::StatusToggleFailed => "Could not change the user status".into(),
            Message::ConfirmDeleteUser(name) => {
                format!("Are you sure you want to delete user \"{}\"?", name)
            }
            Message::NoViewPermission => "You are not allowed to view the user list".into(),
            Message::AdminOnlyUsers => "Only an Admin can see users".into(),
            Message::NoUsers => "No users".into(),
            Message::NoSearchResults => "No search results".into(),
            Message::NoCreatePermission => "You are not allowed to create users".into(),
            Message::NoEditPermission => "You are not allowed to edit users".into(),
            Message::NoDeletePermission => "You are not allowed to delete users".into(),
            Message::AdminOnlyManageUsers => "Only an Admin can manage users".into(),
            Message::RolesUnavailable => "Could not load roles".into(),
            Message::UserUnavailable => "Could not load the user".into(),
            Message::ImageTooLarge => "Image too large. Choose an image smaller than 5MB".into(),
            Message::NameRequired => "Please enter a name".into(),
            Message::UsernameRequired => "Please enter a username".into(),
            Message::RoleRequired => "Please select a role".into(),
            Message::RoleInvalid => "The selected role is not valid".into(),
            Message::PasswordRequired => "Please enter a password".into(),
            Message::PasswordTooShort(min) => {
                format!("Password must be at least {} characters", min)
            }
            Message::PasswordMismatch => "Passwords do not match".into(),
            Message::SaveUserFailed => "Could not save the user".into(),
            Message::ReadOnly => "This form is read-only".into(),
            Message::RoleNameRequired => "Please enter a role name".into(),
            Message::RoleDescriptionRequired => "Please enter a description".into(),
            Message::RoleUnavailable => "Could not load the role".into(),
            Message::AdminOnlyManageRoles => "Only an Admin can manage roles".into(),
            Message::SaveFailed => "Could not save".into(),
        }
    }
}
