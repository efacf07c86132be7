pub mod pagination;
pub mod role_form;
pub mod user_form;
pub mod user_list;

use crate::core::messages::Message;

/// Outcome of a view-level permission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied(Message),
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }
}
