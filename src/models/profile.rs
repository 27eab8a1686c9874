use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile data owned by the profile subsystem. The pipeline only reads it
/// to feed the template context; a missing profile is not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub user_id: String,
    pub display_name: Option<String>,
    pub profession: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub twitter_url: Option<String>,
    /// Comma separated; split into a list when building the render context.
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub certifications: Option<String>,
    pub profile_image_url: Option<String>,
    pub years_of_experience: Option<i32>,
    pub available_for_hire: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}
