/// Tool for listing achievements
///
/// This module implements the wellness_achievements MCP tool.

use serde::{Deserialize, Serialize};
use crate::analytics::ProgressAggregator;
use crate::domain::{Metric, Rarity};
use crate::storage::KeyValueBackend;
use crate::tracker::WellnessTracker;

/// Parameters for listing achievements
#[derive(Debug, Default, Deserialize)]
pub struct AchievementsParams {
    pub include_locked: Option<bool>,
}

/// One achievement as shown to the client
#[derive(Debug, Serialize)]
pub struct AchievementStatus {
    pub achievement_id: String,
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    pub points: u32,
    pub metric: Metric,
    pub unlocked_at: Option<String>,
    pub current: u64,
    pub target: u64,
    pub progress: f64,
}

/// Response from listing achievements
#[derive(Debug, Serialize)]
pub struct AchievementsResponse {
    pub unlocked: Vec<AchievementStatus>,
    pub locked: Vec<AchievementStatus>,
    pub total_points: u64,
    pub completion_percentage: f64,
    pub message: String,
}

/// List unlocked achievements, and locked ones with progress if asked
pub fn list_achievements<B: KeyValueBackend>(
    tracker: &WellnessTracker<B>,
    params: AchievementsParams,
) -> AchievementsResponse {
    let include_locked = params.include_locked.unwrap_or(false);
    let evaluator = tracker.evaluator();
    let unlocked_ids = tracker.unlocked_ids();
    let progress = evaluator.progress(&tracker.stats(), &unlocked_ids);

    let mut unlocked = Vec::new();
    let mut locked = Vec::new();

    for (def, milestone) in evaluator.definitions().iter().zip(progress) {
        let unlocked_at = tracker
            .unlocked()
            .iter()
            .find(|u| u.achievement_id == def.id)
            .map(|u| u.unlocked_at.to_rfc3339());

        let status = AchievementStatus {
            achievement_id: def.id.clone(),
            name: def.name.clone(),
            description: def.description.clone(),
            rarity: def.rarity,
            points: def.points,
            metric: milestone.metric,
            unlocked_at,
            current: milestone.current,
            target: milestone.target,
            progress: milestone.fraction,
        };

        if milestone.unlocked {
            unlocked.push(status);
        } else if include_locked {
            locked.push(status);
        }
    }

    let total = evaluator.definitions().len();
    let completion_percentage = ProgressAggregator::new().completion_percentage(unlocked.len(), total);
    let total_points = evaluator.total_points(&unlocked_ids);

    let mut message = format!(
        "🏆 {} of {} achievements unlocked ({:.0}%) | {} points",
        unlocked.len(), total, completion_percentage, total_points
    );
    for a in &unlocked {
        message.push_str(&format!("\n   ✅ {} (+{} pts): {}", a.name, a.points, a.description));
    }
    for a in &locked {
        message.push_str(&format!(
            "\n   🔒 {}: {}/{} {} ({:.0}%)",
            a.name, a.current, a.target, a.metric.display_name(), a.progress * 100.0
        ));
    }

    AchievementsResponse {
        unlocked,
        locked,
        total_points,
        completion_percentage,
        message,
    }
}
