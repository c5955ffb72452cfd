#![allow(dead_code)]

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Create a tournament running through March 2025 and return its id
    pub async fn create_tournament(&self, name: &str) -> String {
        let (status, body) = self
            .post_as_director(
                "/tournaments",
                json!({
                    "name": name,
                    "description": "Spring league",
                    "location": "Riverside Park",
                    "start_date": "2025-03-01",
                    "end_date": "2025-03-31",
                    "max_teams": 16
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "tournament creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn add_field(&self, tournament_id: &str, name: &str, number: u32) {
        let (status, body) = self
            .post_as_director(
                &format!("/tournaments/{}/fields", tournament_id),
                json!({ "name": name, "field_number": number }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "field creation failed: {}", body);
    }

    /// Register a team and approve it, returning its id
    pub async fn register_approved_team(&self, tournament_id: &str, name: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/teams",
                Some(&self.manager_token),
                Some(json!({
                    "name": name,
                    "tournament_id": tournament_id,
                    "captain_id": format!("{}-captain", name.to_lowercase()),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "team registration failed: {}", body);
        let team_id = body["id"].as_str().unwrap().to_string();

        let (status, body) = self
            .put_as_director(
                &format!("/teams/{}/status", team_id),
                json!({ "status": "approved" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "team approval failed: {}", body);
        team_id
    }

    /// Tournament with `fields` fields and `teams` approved teams
    pub async fn tournament_with_teams(&self, fields: u32, teams: usize) -> (String, Vec<String>) {
        let tournament_id = self.create_tournament("Spring Open").await;
        for number in 1..=fields {
            self.add_field(&tournament_id, &format!("Field {}", number), number)
                .await;
        }

        let mut team_ids = Vec::with_capacity(teams);
        for index in 0..teams {
            let id = self
                .register_approved_team(&tournament_id, &format!("Team{}", index + 1))
                .await;
            team_ids.push(id);
        }
        (tournament_id, team_ids)
    }

    /// Register a player profile as the team manager and return its id
    pub async fn register_player(&self, name: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/players",
                Some(&self.manager_token),
                Some(json!({
                    "name": name,
                    "age": 19,
                    "gender": "other",
                    "email": format!("{}@example.org", name.to_lowercase()),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "player registration failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn generate_schedule(&self, tournament_id: &str, body: Value) -> (StatusCode, Value) {
        self.post_as_director(&format!("/tournaments/{}/schedule", tournament_id), body)
            .await
    }

    /// Create a single pool match between two teams on Field 1
    pub async fn create_match(&self, tournament_id: &str, team1: &str, team2: &str) -> String {
        let (status, body) = self
            .post_as_director(
                "/matches",
                json!({
                    "tournament_id": tournament_id,
                    "field": "Field 1",
                    "field_number": 1,
                    "team1_id": team1,
                    "team2_id": team2,
                    "start_time": "2025-03-01T09:00:00Z",
                    "end_time": "2025-03-01T10:00:00Z"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "match creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn update_score(&self, match_id: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Method::PUT,
            &format!("/matches/{}/score", match_id),
            Some(&self.official_token),
            Some(body),
        )
        .await
    }

    pub async fn add_scoring_event(&self, match_id: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            &format!("/matches/{}/score-event", match_id),
            Some(&self.official_token),
            Some(body),
        )
        .await
    }

    /// Statistics block of a team as currently stored
    pub async fn team_statistics(&self, team_id: &str) -> Value {
        let (status, body) = self.get(&format!("/teams/{}", team_id)).await;
        assert_eq!(status, StatusCode::OK);
        body["statistics"].clone()
    }
}
