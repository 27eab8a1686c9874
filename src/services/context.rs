//! Render context assembly.
//!
//! The context handed to the renderer is a plain JSON tree: profile fields
//! first, then deployment metadata merged on top. Anything absent simply
//! stays out of the tree; the renderer treats missing paths as empty.

use crate::models::{Deployment, Profile};
use serde_json::{json, Map, Value};

/// Flatten a profile into renderable fields. Comma-separated skills become
/// a proper list so templates can `{{#each skills}}` over them.
pub fn profile_context(profile: &Profile) -> Value {
    let mut map = Map::new();

    let mut put = |key: &str, value: &Option<String>| {
        if let Some(v) = value {
            if !v.trim().is_empty() {
                map.insert(key.to_string(), Value::String(v.clone()));
            }
        }
    };

    put("name", &profile.display_name);
    put("profession", &profile.profession);
    put("location", &profile.location);
    put("bio", &profile.bio);
    put("phone", &profile.phone_number);
    put("website", &profile.website);
    put("experience", &profile.experience);
    put("education", &profile.education);
    put("certifications", &profile.certifications);
    put("profileImage", &profile.profile_image_url);

    if let Some(skills) = &profile.skills {
        let list: Vec<Value> = skills
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(s.to_string()))
            .collect();
        map.insert("skills".to_string(), Value::Array(list));
    }
    if let Some(years) = profile.years_of_experience {
        map.insert("yearsOfExperience".to_string(), json!(years));
    }
    if let Some(hire) = profile.available_for_hire {
        map.insert("availableForHire".to_string(), json!(hire));
    }

    let mut social = Map::new();
    for (key, value) in [
        ("linkedin", &profile.linkedin_url),
        ("github", &profile.github_url),
        ("twitter", &profile.twitter_url),
    ] {
        if let Some(url) = value {
            if !url.trim().is_empty() {
                social.insert(key.to_string(), Value::String(url.clone()));
            }
        }
    }
    map.insert("socialLinks".to_string(), Value::Object(social));

    Value::Object(map)
}

/// Merge deployment metadata over the profile context. Deployment fields
/// win on collision; the slug and title are always present.
pub fn merge_deployment(context: &mut Value, deployment: &Deployment) {
    if !context.is_object() {
        *context = json!({});
    }
    let map = match context.as_object_mut() {
        Some(map) => map,
        None => return,
    };

    map.insert("slug".to_string(), json!(deployment.slug));
    map.insert("title".to_string(), json!(deployment.title));
    if map.get("name").is_none() {
        // A bare profile still gets a printable name from the site title.
        map.insert("name".to_string(), json!(deployment.title));
    }
    for (key, value) in [
        ("description", &deployment.description),
        ("metaTitle", &deployment.meta_title),
        ("metaDescription", &deployment.meta_description),
        ("metaKeywords", &deployment.meta_keywords),
    ] {
        if let Some(v) = value {
            map.insert(key.to_string(), Value::String(v.clone()));
        }
    }
    if let Some(url) = &deployment.public_url {
        map.insert("publicUrl".to_string(), Value::String(url.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Deployment, Profile};

    #[test]
    fn skills_split_into_list() {
        let profile = Profile {
            user_id: "u1".into(),
            skills: Some("Rust, SQL, , Actix".into()),
            ..Default::default()
        };
        let ctx = profile_context(&profile);
        let skills: Vec<&str> = ctx["skills"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(skills, vec!["Rust", "SQL", "Actix"]);
    }

    #[test]
    fn empty_profile_still_renders_name_from_title() {
        let mut ctx = profile_context(&Profile::default());
        let deployment = Deployment::new("u1".into(), 1, "Alice Smith".into());
        merge_deployment(&mut ctx, &deployment);
        assert_eq!(ctx["name"], "Alice Smith");
    }

    #[test]
    fn display_name_wins_over_title() {
        let profile = Profile {
            user_id: "u1".into(),
            display_name: Some("The Real Alice".into()),
            ..Default::default()
        };
        let mut ctx = profile_context(&profile);
        let deployment = Deployment::new("u1".into(), 1, "Some Site".into());
        merge_deployment(&mut ctx, &deployment);
        assert_eq!(ctx["name"], "The Real Alice");
    }
}
