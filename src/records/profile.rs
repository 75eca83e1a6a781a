use serde::{Serialize, Deserialize};
use super::Millis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub avatar_initials: String,
    #[serde(default = "default_institution")]
    pub institution: String,
    #[serde(default = "default_goal_hours")]
    pub study_goal_hours: u32,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default)]
    pub last_login: Option<Millis>,
}

fn default_institution() -> String {
    "Smart Study Academy".to_string()
}

fn default_goal_hours() -> u32 {
    15
}

impl UserProfile {
    pub fn new(name: &str, email: &str, password_hash: String) -> Self {
        UserProfile {
            id: super::new_id(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            avatar_initials: initials(name),
            institution: default_institution(),
            study_goal_hours: default_goal_hours(),
            streak_days: 0,
            last_login: None,
        }
    }
}

/// Uppercased first letters of the first two words
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub last_login: Option<Millis>,
}
