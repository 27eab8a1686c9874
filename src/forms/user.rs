use crate::models::user::User as UserModel;
use serde_derive::{Deserialize, Serialize};

/// Response shape of the external auth service's `me` endpoint.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct UserForm {
    pub user: AuthUser,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub email_confirmed: bool,
}

impl TryInto<UserModel> for UserForm {
    type Error = String;

    fn try_into(self) -> Result<UserModel, Self::Error> {
        if self.user.id.is_empty() {
            return Err("auth response carries no user id".to_string());
        }
        Ok(UserModel {
            id: self.user.id,
            first_name: self.user.first_name,
            last_name: self.user.last_name,
            email: self.user.email,
            email_confirmed: self.user.email_confirmed,
        })
    }
}
