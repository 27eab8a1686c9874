use serde::{Deserialize, Serialize};

/// Authenticated user as resolved by the external auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub email_confirmed: bool,
}

impl User {
    /// Handle the slug allocator derives a base name from.
    pub fn handle(&self) -> String {
        format!("{}{}", self.first_name, self.last_name)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
