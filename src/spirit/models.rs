use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_CATEGORY_SCORE: u32 = 4;
pub const MAX_COMMENT_CHARS: usize = 500;

/// The five rated categories of a spirit-of-the-game score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiritCategories {
    pub rules_knowledge: u32,
    pub fouls_and_body: u32,
    pub fair_mindedness: u32,
    pub positive_attitude: u32,
    pub communication: u32,
}

impl SpiritCategories {
    fn values(&self) -> [(&'static str, u32); 5] {
        [
            ("rules_knowledge", self.rules_knowledge),
            ("fouls_and_body", self.fouls_and_body),
            ("fair_mindedness", self.fair_mindedness),
            ("positive_attitude", self.positive_attitude),
            ("communication", self.communication),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        match self
            .values()
            .into_iter()
            .find(|(_, value)| *value > MAX_CATEGORY_SCORE)
        {
            Some((name, value)) => Err(format!(
                "{} must be between 0 and {}, got {}",
                name, MAX_CATEGORY_SCORE, value
            )),
            None => Ok(()),
        }
    }

    /// Sum of all categories, 0..=20
    pub fn total(&self) -> u32 {
        self.values().iter().map(|(_, value)| value).sum()
    }
}

/// A rating one team gave the other after a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpiritScoreModel {
    pub id: String,
    pub match_id: String,
    pub submitted_by: String,
    pub submitted_for: String,
    #[serde(flatten)]
    pub categories: SpiritCategories,
    pub comments: Option<String>,
    pub total_score: u32,
    pub submitted_by_user: String,
    pub created_at: DateTime<Utc>,
}

impl SpiritScoreModel {
    pub fn new(
        match_id: String,
        submitted_by: String,
        submitted_for: String,
        categories: SpiritCategories,
        comments: Option<String>,
        submitted_by_user: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            match_id,
            submitted_by,
            submitted_for,
            total_score: categories.total(),
            categories,
            comments,
            submitted_by_user,
            created_at: Utc::now(),
        }
    }
}
