use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::shared::AppError;

/// Roles recognised by the authorization checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Admin,
    TournamentDirector,
    TeamManager,
    FieldOfficial,
    TechTeam,
    Player,
}

/// JWT claims structure identifying the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallerClaims {
    pub sub: String,
    pub role: Role,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// Authenticated caller, inserted into request extensions by `require_caller`
#[derive(Debug, Clone, PartialEq)]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
}

impl From<CallerClaims> for Caller {
    fn from(claims: CallerClaims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

impl Caller {
    pub fn is_director(&self) -> bool {
        matches!(self.role, Role::Admin | Role::TournamentDirector)
    }

    /// Fails unless the caller may run tournament-director actions
    pub fn require_director(&self) -> Result<(), AppError> {
        if self.is_director() {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "role {} cannot perform this action",
                self.role
            )))
        }
    }

    /// Fails unless the caller owns the resource or is an admin
    pub fn require_owner(&self, owner_id: &str) -> Result<(), AppError> {
        if self.role == Role::Admin || self.user_id == owner_id {
            Ok(())
        } else {
            Err(AppError::Unauthorized("Not authorized".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn roles_round_trip_through_snake_case() {
        assert_eq!(Role::TournamentDirector.to_string(), "tournament_director");
        assert_eq!(Role::from_str("field_official").unwrap(), Role::FieldOfficial);

        let json = serde_json::to_string(&Role::TechTeam).unwrap();
        assert_eq!(json, "\"tech_team\"");
    }

    #[test]
    fn only_directors_and_admins_pass_director_check() {
        let director = Caller {
            user_id: "d".to_string(),
            role: Role::TournamentDirector,
        };
        let manager = Caller {
            user_id: "m".to_string(),
            role: Role::TeamManager,
        };

        assert!(director.require_director().is_ok());
        assert!(matches!(
            manager.require_director(),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn admins_bypass_ownership() {
        let admin = Caller {
            user_id: "root".to_string(),
            role: Role::Admin,
        };
        let other = Caller {
            user_id: "someone".to_string(),
            role: Role::TournamentDirector,
        };

        assert!(admin.require_owner("organizer").is_ok());
        assert!(other.require_owner("organizer").is_err());
        assert!(other.require_owner("someone").is_ok());
    }
}
