use serde::{Deserialize, Serialize};

use super::models::{SpiritCategories, SpiritScoreModel};

fn default_category() -> u32 {
    2
}

#[derive(Debug, Deserialize)]
pub struct SpiritScoreRequest {
    pub match_id: String,
    pub submitted_by: String,
    pub submitted_for: String,
    #[serde(default = "default_category")]
    pub rules_knowledge: u32,
    #[serde(default = "default_category")]
    pub fouls_and_body: u32,
    #[serde(default = "default_category")]
    pub fair_mindedness: u32,
    #[serde(default = "default_category")]
    pub positive_attitude: u32,
    #[serde(default = "default_category")]
    pub communication: u32,
    pub comments: Option<String>,
}

impl SpiritScoreRequest {
    pub fn categories(&self) -> SpiritCategories {
        SpiritCategories {
            rules_knowledge: self.rules_knowledge,
            fouls_and_body: self.fouls_and_body,
            fair_mindedness: self.fair_mindedness,
            positive_attitude: self.positive_attitude,
            communication: self.communication,
        }
    }
}

/// Spirit scores a team received, with their average total
#[derive(Debug, Serialize)]
pub struct TeamSpiritScores {
    pub scores: Vec<SpiritScoreModel>,
    pub average_score: f64,
    pub count: usize,
}
