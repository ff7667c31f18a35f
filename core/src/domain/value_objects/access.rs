//! Resolved permissions of an authenticated user.

use uuid::Uuid;

use super::actor::RequestOrigin;
use crate::domain::entities::contact::Contact;
use crate::domain::entities::user::UserRole;

/// Which contacts a user can reach
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    All,
    /// Contacts in `block_ids`, plus contacts the user is responsible for
    Restricted { user_id: Uuid, block_ids: Vec<Uuid> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Access {
    pub user_id: Uuid,
    pub role: UserRole,
    pub scope: AccessScope,
    pub origin: RequestOrigin,
}

impl Access {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn can_write(&self) -> bool {
        self.role.can_write()
    }

    pub fn has_block(&self, block_id: Uuid) -> bool {
        match &self.scope {
            AccessScope::All => true,
            AccessScope::Restricted { block_ids, .. } => block_ids.contains(&block_id),
        }
    }

    /// Soft-deleted contacts are only visible to admins
    pub fn can_see_contact(&self, contact: &Contact) -> bool {
        if !contact.is_active && !self.is_admin() {
            return false;
        }
        match &self.scope {
            AccessScope::All => true,
            AccessScope::Restricted { user_id, block_ids } => {
                block_ids.contains(&contact.block_id)
                    || contact.responsible_user_id == Some(*user_id)
            }
        }
    }

    pub fn can_edit_contact(&self, contact: &Contact) -> bool {
        self.can_write() && self.can_see_contact(contact)
    }
}
