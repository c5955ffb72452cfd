#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use pitchside::{router, AppState, EventBus, Repositories, Role, TokenConfig};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

const TEST_SECRET: &str = "test-secret";

pub struct TestSetup {
    pub app: Router,
    pub event_bus: EventBus,
    pub token_config: TokenConfig,
    pub director_token: String,
    pub official_token: String,
    pub manager_token: String,
}

pub struct TestSetupBuilder {
    director: String,
    channel_capacity: usize,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            director: "director-1".to_string(),
            channel_capacity: 100,
        }
    }

    pub fn build(self) -> TestSetup {
        let token_config = TokenConfig::new(TEST_SECRET.to_string(), 1);
        let event_bus = EventBus::new(self.channel_capacity);
        let state = AppState::new(
            Repositories::in_memory(),
            token_config.clone(),
            event_bus.clone(),
        );

        let director_token = token_config
            .create_token(&self.director, Role::TournamentDirector)
            .unwrap();
        let official_token = token_config
            .create_token("official-1", Role::FieldOfficial)
            .unwrap();
        let manager_token = token_config
            .create_token("manager-1", Role::TeamManager)
            .unwrap();

        TestSetup {
            app: router(state),
            event_bus,
            token_config,
            director_token,
            official_token,
            manager_token,
        }
    }
}

impl TestSetup {
    /// Run one request through the router and decode the JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Token for any other user, e.g. a team's captain
    pub fn token_for(&self, user_id: &str, role: Role) -> String {
        self.token_config.create_token(user_id, role).unwrap()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post_as_director(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(&self.director_token), Some(body))
            .await
    }

    pub async fn put_as_director(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(&self.director_token), Some(body))
            .await
    }
}
