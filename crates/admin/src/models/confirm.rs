//! Confirmable actions for the admin console.

use serde::{Deserialize, Serialize};

use plateful_core::{CategoryId, MenuItemId, UserId};

/// Actions that must pass the confirmation gate before firing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfirmAction {
    /// End the session.
    Logout,
    /// Delete a category.
    DeleteCategory(CategoryId),
    /// Delete a menu item.
    DeleteMenuItem(MenuItemId),
    /// Delete a user account.
    DeleteUser(UserId),
}

impl ConfirmAction {
    /// Where to land after the action resolves (confirm or cancel).
    #[must_use]
    pub const fn return_path(&self) -> &'static str {
        match self {
            Self::Logout => "/",
            Self::DeleteCategory(_) => "/categories",
            Self::DeleteMenuItem(_) => "/menu-items",
            Self::DeleteUser(_) => "/users",
        }
    }
}
