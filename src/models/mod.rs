mod activity;
mod deployment;
mod profile;
mod template;
pub mod user;

pub use activity::*;
pub use deployment::*;
pub use profile::*;
pub use template::*;
pub use user::User;
