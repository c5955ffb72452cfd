use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Experience {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Professional,
}

/// Player profile; team rosters and scoring events refer to players by `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerModel {
    pub id: String,
    /// Account the profile belongs to, set when a player registers themselves
    pub user_id: Option<String>,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub email: String,
    pub phone: Option<String>,
    pub experience: Experience,
    pub years_playing: u32,
    pub position: Option<String>,
    pub jersey_number: Option<u32>,
    pub bio: Option<String>,
    pub registered_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerModel {
    pub fn new(name: String, age: u32, gender: Gender, email: String, registered_by: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: None,
            name,
            age,
            gender,
            email,
            phone: None,
            experience: Experience::default(),
            years_playing: 0,
            position: None,
            jersey_number: None,
            bio: None,
            registered_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks the fields every stored profile must satisfy
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Player name is required".to_string());
        }
        if self.age == 0 {
            return Err("Player age is required".to_string());
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(format!("Invalid email address: {}", email)),
        }
    }

    pub fn same_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlayerModel {
        PlayerModel::new(
            "Robin".to_string(),
            17,
            Gender::Female,
            "robin@example.org".to_string(),
            "manager".to_string(),
        )
    }

    #[test]
    fn new_player_defaults_to_beginner() {
        let player = sample();
        assert_eq!(player.experience, Experience::Beginner);
        assert_eq!(player.years_playing, 0);
        assert!(player.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_profiles() {
        let mut player = sample();
        player.email = "robin.example.org".to_string();
        assert!(player.validate().is_err());

        let mut player = sample();
        player.age = 0;
        assert!(player.validate().is_err());

        let mut player = sample();
        player.name = "  ".to_string();
        assert!(player.validate().is_err());
    }

    #[test]
    fn email_comparison_ignores_case() {
        assert!(sample().same_email(" Robin@Example.org"));
    }
}
