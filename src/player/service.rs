use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::PlayerModel,
    repository::PlayerRepository,
    types::{PlayerRegisterRequest, PlayerUpdateRequest},
};
use crate::{
    auth::{Caller, Role},
    shared::AppError,
};

/// Service for player profiles
pub struct PlayerService {
    repository: Arc<dyn PlayerRepository + Send + Sync>,
}

impl PlayerService {
    pub fn new(repository: Arc<dyn PlayerRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Registers a profile. A caller with the player role registers themselves and may
    /// hold only one profile; managers and directors register profiles for others.
    #[instrument(skip(self, request))]
    pub async fn register_player(
        &self,
        request: PlayerRegisterRequest,
        caller: &Caller,
    ) -> Result<PlayerModel, AppError> {
        let mut player = PlayerModel::new(
            request.name,
            request.age,
            request.gender,
            request.email,
            caller.user_id.clone(),
        );
        player.phone = request.phone;
        player.experience = request.experience;
        player.years_playing = request.years_playing;
        player.position = request.position;
        player.jersey_number = request.jersey_number;
        player.bio = request.bio;
        player.validate().map_err(AppError::InvalidInput)?;

        if caller.role == Role::Player {
            let existing = self.repository.list_players().await?;
            if existing
                .iter()
                .any(|other| other.user_id.as_deref() == Some(caller.user_id.as_str()))
            {
                return Err(AppError::Conflict("Player already registered".to_string()));
            }
            player.user_id = Some(caller.user_id.clone());
        }

        self.repository.create_player(&player).await?;
        info!(player_id = %player.id, "Player registered");
        Ok(player)
    }

    #[instrument(skip(self))]
    pub async fn list_players(&self) -> Result<Vec<PlayerModel>, AppError> {
        self.repository.list_players().await
    }

    #[instrument(skip(self))]
    pub async fn get_player(&self, player_id: &str) -> Result<PlayerModel, AppError> {
        self.repository
            .get_player(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Player not found".to_string()))
    }

    #[instrument(skip(self, request))]
    pub async fn update_player(
        &self,
        player_id: &str,
        request: PlayerUpdateRequest,
        caller: &Caller,
    ) -> Result<PlayerModel, AppError> {
        let mut player = self.get_player(player_id).await?;
        let owns_profile = player.user_id.as_deref() == Some(caller.user_id.as_str());
        if !caller.is_director() && caller.user_id != player.registered_by && !owns_profile {
            return Err(AppError::Unauthorized(
                "Only the player or whoever registered them may edit this profile".to_string(),
            ));
        }

        if let Some(name) = request.name {
            player.name = name;
        }
        if let Some(age) = request.age {
            player.age = age;
        }
        if let Some(gender) = request.gender {
            player.gender = gender;
        }
        if let Some(email) = request.email {
            player.email = email;
        }
        if let Some(phone) = request.phone {
            player.phone = Some(phone);
        }
        if let Some(experience) = request.experience {
            player.experience = experience;
        }
        if let Some(years_playing) = request.years_playing {
            player.years_playing = years_playing;
        }
        if let Some(position) = request.position {
            player.position = Some(position);
        }
        if let Some(jersey_number) = request.jersey_number {
            player.jersey_number = Some(jersey_number);
        }
        if let Some(bio) = request.bio {
            player.bio = Some(bio);
        }
        player.validate().map_err(AppError::InvalidInput)?;
        player.updated_at = Utc::now();

        self.repository.update_player(&player).await?;
        Ok(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{models::Gender, repository::InMemoryPlayerRepository};
    use crate::shared::test_utils::{director, player};

    fn service() -> PlayerService {
        PlayerService::new(Arc::new(InMemoryPlayerRepository::new()))
    }

    fn manager() -> Caller {
        Caller {
            user_id: "manager-1".to_string(),
            role: Role::TeamManager,
        }
    }

    fn request(name: &str, email: &str) -> PlayerRegisterRequest {
        PlayerRegisterRequest {
            name: name.to_string(),
            age: 16,
            gender: Gender::Male,
            email: email.to_string(),
            phone: None,
            experience: Default::default(),
            years_playing: 2,
            position: Some("handler".to_string()),
            jersey_number: Some(7),
            bio: None,
        }
    }

    #[tokio::test]
    async fn test_self_registration_is_limited_to_one_profile() {
        let service = service();
        let me = player("user-9");

        let created = service
            .register_player(request("Kai", "kai@example.org"), &me)
            .await
            .unwrap();
        assert_eq!(created.user_id.as_deref(), Some("user-9"));

        let again = service
            .register_player(request("Kai", "kai2@example.org"), &me)
            .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_manager_registers_several_players() {
        let service = service();
        for (name, email) in [("Kai", "kai@example.org"), ("Lou", "lou@example.org")] {
            let created = service.register_player(request(name, email), &manager()).await.unwrap();
            assert_eq!(created.user_id, None);
            assert_eq!(created.registered_by, "manager-1");
        }
        assert_eq!(service.list_players().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_profile_is_rejected() {
        let result = service()
            .register_player(request("Kai", "not-an-email"), &manager())
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_permissions() {
        let service = service();
        let created = service
            .register_player(request("Kai", "kai@example.org"), &manager())
            .await
            .unwrap();

        let updated = service
            .update_player(
                &created.id,
                PlayerUpdateRequest {
                    years_playing: Some(3),
                    ..PlayerUpdateRequest::default()
                },
                &manager(),
            )
            .await
            .unwrap();
        assert_eq!(updated.years_playing, 3);
        assert_eq!(updated.name, "Kai");

        let stranger = service
            .update_player(&created.id, PlayerUpdateRequest::default(), &player("someone"))
            .await;
        assert!(matches!(stranger, Err(AppError::Unauthorized(_))));

        service
            .update_player(&created.id, PlayerUpdateRequest::default(), &director())
            .await
            .unwrap();

        let missing = service
            .update_player("missing", PlayerUpdateRequest::default(), &director())
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
