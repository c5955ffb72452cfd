use axum::http::{Method, StatusCode};
use serde_json::json;

mod utils;

use utils::*;

#[tokio::test]
async fn test_player_profiles_can_be_registered_listed_and_updated() {
    let setup = TestSetupBuilder::new().build();
    let player_id = setup.register_player("Noor").await;

    let (status, body) = setup.get(&format!("/players/{}", player_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Noor");
    assert_eq!(body["experience"], "beginner");
    assert_eq!(body["registered_by"], "manager-1");

    let (status, body) = setup
        .send(
            Method::PUT,
            &format!("/players/{}", player_id),
            Some(&setup.manager_token),
            Some(json!({ "position": "cutter", "years_playing": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["position"], "cutter");
    assert_eq!(body["years_playing"], 4);

    // Fields outside the profile are rejected
    let (status, _) = setup
        .send(
            Method::PUT,
            &format!("/players/{}", player_id),
            Some(&setup.manager_token),
            Some(json!({ "registered_by": "someone-else" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    setup.register_player("Abe").await;
    let (status, list) = setup.get("/players").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Abe", "Noor"]);

    let (status, _) = setup.get("/players/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_player_registration_rules() {
    let setup = TestSetupBuilder::new().build();
    setup.register_player("Noor").await;

    let (status, _) = setup
        .send(
            Method::POST,
            "/players",
            Some(&setup.manager_token),
            Some(json!({ "name": "Noor Two", "age": 20, "gender": "female", "email": "NOOR@example.org" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = setup
        .send(
            Method::POST,
            "/players",
            None,
            Some(json!({ "name": "Anon", "age": 20, "gender": "male", "email": "anon@example.org" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_roster_only_accepts_registered_players() {
    let setup = TestSetupBuilder::new().build();
    let (_, teams) = setup.tournament_with_teams(1, 1).await;
    let roster_uri = format!("/teams/{}/roster", teams[0]);

    let (status, _) = setup
        .send(
            Method::POST,
            &roster_uri,
            Some(&setup.manager_token),
            Some(json!({ "player_id": "unregistered", "jersey_number": 9 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let player_id = setup.register_player("Noor").await;
    let (status, body) = setup
        .send(
            Method::POST,
            &roster_uri,
            Some(&setup.manager_token),
            Some(json!({ "player_id": player_id, "jersey_number": 9 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["roster"][0]["player_id"], player_id.as_str());
    assert_eq!(body["roster"][0]["jersey_number"], 9);
}
