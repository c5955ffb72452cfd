use serde::Deserialize;

use super::models::{JerseyColors, RosterRole, TeamStatus};

/// Request payload for registering a team
#[derive(Debug, Deserialize)]
pub struct TeamRegisterRequest {
    pub name: String,
    pub tournament_id: String,
    pub captain_id: String,
    pub co_captain_id: Option<String>,
    pub jersey_colors: Option<JerseyColors>,
}

#[derive(Debug, Deserialize)]
pub struct TeamStatusRequest {
    pub status: TeamStatus,
}

#[derive(Debug, Deserialize)]
pub struct AddPlayerRequest {
    pub player_id: String,
    pub jersey_number: Option<u32>,
    #[serde(default)]
    pub role: RosterRole,
}

#[derive(Debug, Deserialize)]
pub struct RosterLockRequest {
    pub locked: bool,
}

#[derive(Debug, Deserialize)]
pub struct JerseyVerification {
    pub player_id: String,
    pub jersey_number: Option<u32>,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
pub struct VerifyJerseysRequest {
    pub players: Vec<JerseyVerification>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamListQuery {
    pub tournament_id: Option<String>,
}
