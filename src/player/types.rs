use serde::Deserialize;

use super::models::{Experience, Gender};

/// Request payload for registering a player profile
#[derive(Debug, Deserialize)]
pub struct PlayerRegisterRequest {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub experience: Experience,
    #[serde(default)]
    pub years_playing: u32,
    pub position: Option<String>,
    pub jersey_number: Option<u32>,
    pub bio: Option<String>,
}

/// Profile fields a player update may change
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerUpdateRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience: Option<Experience>,
    pub years_playing: Option<u32>,
    pub position: Option<String>,
    pub jersey_number: Option<u32>,
    pub bio: Option<String>,
}
