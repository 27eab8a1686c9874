pub mod deployment;
pub mod user;

pub use deployment::*;
pub use user::UserForm;
