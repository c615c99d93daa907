//! Relevance scoring and filtering
//!
//! A nearby search returns everything in the radius, including noise from
//! adjacent neighborhoods. Each candidate gets a [0,1] score estimating
//! whether it actually belongs to the target area; the score is additive over
//! match bonuses, softened by a small distance penalty, and clamped at the
//! end.

use crate::constants::filter as settings;
use crate::model::{ScenicArea, Spot};
use crate::search::terms::key_terms;
use serde::{Deserialize, Serialize};

/// Preset filter thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterStrength {
    Strict,
    Moderate,
    Loose,
}

impl FilterStrength {
    /// Minimum admitted score for this strength
    pub fn min_score(&self) -> f64 {
        match self {
            FilterStrength::Strict => settings::STRICT_MIN_SCORE,
            FilterStrength::Moderate => settings::MODERATE_MIN_SCORE,
            FilterStrength::Loose => settings::LOOSE_MIN_SCORE,
        }
    }
}

impl std::str::FromStr for FilterStrength {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(FilterStrength::Strict),
            "moderate" => Ok(FilterStrength::Moderate),
            "loose" => Ok(FilterStrength::Loose),
            other => Err(crate::error::Error::Config(format!(
                "Unknown filter strength: {}",
                other
            ))),
        }
    }
}

/// Relevance filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub enable_filtering: bool,

    /// When set, overrides `min_relevance_score`
    pub strength: Option<FilterStrength>,

    pub max_results: usize,

    pub min_relevance_score: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enable_filtering: true,
            strength: Some(FilterStrength::Moderate),
            max_results: settings::DEFAULT_MAX_RESULTS,
            min_relevance_score: settings::MODERATE_MIN_SCORE,
        }
    }
}

impl FilterConfig {
    /// Effective admission threshold
    pub fn threshold(&self) -> f64 {
        self.strength
            .map(|s| s.min_score())
            .unwrap_or(self.min_relevance_score)
    }
}

/// Score one spot against the target area
///
/// `terms` are the area's key terms (full name first). Bonuses:
/// full-name match in address (+0.9) or name (+0.8), key-term hit ratios in
/// name (up to +0.4) and address (up to +0.3), and +0.05 per term the spot
/// address shares with the area's own address. The shared-locality bonus is
/// deliberately uncapped; only the final score is clamped to [0,1]. Distance
/// subtracts at most 0.1, saturating at 1500 m, so a distant name match can
/// still outrank a close stranger.
pub fn score_spot(spot: &Spot, area: &ScenicArea, terms: &[String]) -> f64 {
    let area_name = area.name.to_lowercase();
    let spot_name = spot.name.to_lowercase();
    let spot_address = spot
        .address
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    let mut score = 0.0;

    if !spot_address.is_empty() && spot_address.contains(&area_name) {
        score += 0.9;
    }
    if spot_name.contains(&area_name) {
        score += 0.8;
    }

    if !terms.is_empty() {
        let total = terms.len() as f64;
        let in_name = terms
            .iter()
            .filter(|t| spot_name.contains(&t.to_lowercase()))
            .count() as f64;
        score += 0.4 * in_name / total;

        if !spot_address.is_empty() {
            let in_address = terms
                .iter()
                .filter(|t| spot_address.contains(&t.to_lowercase()))
                .count() as f64;
            score += 0.3 * in_address / total;
        }
    }

    if let Some(area_address) = area.address.as_deref().map(str::to_lowercase) {
        if !spot_address.is_empty() {
            for term in terms {
                let term = term.to_lowercase();
                if spot_address.contains(&term) && area_address.contains(&term) {
                    score += 0.05;
                }
            }
        }
    }

    if let Some(distance) = spot.distance {
        let capped = distance.clamp(0.0, settings::PENALTY_DISTANCE_CAP_M);
        score -= settings::MAX_DISTANCE_PENALTY * capped / settings::PENALTY_DISTANCE_CAP_M;
    }

    score.clamp(0.0, 1.0)
}

/// Score, threshold, sort, and truncate a candidate set
///
/// With filtering disabled, spots pass through unscored and unordered.
pub fn filter(spots: Vec<Spot>, area: &ScenicArea, config: &FilterConfig) -> Vec<Spot> {
    if !config.enable_filtering {
        return spots;
    }

    let terms = key_terms(&area.name);
    let threshold = config.threshold();

    let mut scored: Vec<Spot> = spots
        .into_iter()
        .map(|mut spot| {
            spot.relevance_score = Some(score_spot(&spot, area, &terms));
            spot
        })
        .filter(|spot| spot.relevance_score.unwrap_or(0.0) >= threshold)
        .collect();

    scored.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(config.max_results);
    scored
}
