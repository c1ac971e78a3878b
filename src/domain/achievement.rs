/// Achievement definitions and the milestone evaluator
///
/// Achievements are a declarative table of (metric, threshold) rules. The
/// evaluator compares aggregated stats against every rule that is not yet
/// unlocked and returns the newly earned ones exactly once.

use std::collections::{BTreeSet, HashSet};
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::domain::{DomainError, LifetimeTotals, StreakState};

/// Which aggregated statistic a requirement is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Best streak ever reached
    Streak,
    /// Lifetime number of completion events
    TotalEvents,
    /// Sum of points of unlocked achievements
    TotalPoints,
    /// Distinct calendar days with a completion
    ActiveDays,
    /// Distinct categories ever logged
    CategoryVariety,
}

impl Metric {
    pub fn display_name(&self) -> &str {
        match self {
            Metric::Streak => "day streak",
            Metric::TotalEvents => "completions",
            Metric::TotalPoints => "points",
            Metric::ActiveDays => "active days",
            Metric::CategoryVariety => "categories",
        }
    }
}

/// How rare an achievement is, for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Threshold a metric must reach (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub metric: Metric,
    pub value: u64,
}

/// Static description of an unlockable achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Grouping label for display (e.g. "streak", "milestone")
    pub category: String,
    pub requirement: Requirement,
    pub points: u32,
    pub rarity: Rarity,
}

impl AchievementDefinition {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        category: &str,
        metric: Metric,
        value: u64,
        points: u32,
        rarity: Rarity,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            requirement: Requirement { metric, value },
            points,
            rarity,
        }
    }
}

/// Record of an achievement having been earned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub achievement_id: String,
    pub unlocked_at: DateTime<Utc>,
}

/// Collect the ids of already unlocked achievements
pub fn unlocked_ids(unlocked: &[UnlockedAchievement]) -> BTreeSet<String> {
    unlocked.iter().map(|u| u.achievement_id.clone()).collect()
}

/// Aggregated statistics achievements are measured against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_events: u64,
    pub active_days: u32,
    pub category_variety: u32,
}

impl ProgressStats {
    pub fn from_parts(streak: &StreakState, totals: &LifetimeTotals) -> Self {
        Self {
            current_streak: streak.current_streak,
            best_streak: streak.best_streak,
            total_events: totals.total_events,
            active_days: streak.total_active_days.max(totals.active_days()),
            category_variety: totals.category_variety(),
        }
    }

    /// Value of `metric`; points are not part of the stats and are passed in
    pub fn metric_value(&self, metric: Metric, total_points: u64) -> u64 {
        match metric {
            Metric::Streak => u64::from(self.best_streak),
            Metric::TotalEvents => self.total_events,
            Metric::TotalPoints => total_points,
            Metric::ActiveDays => u64::from(self.active_days),
            Metric::CategoryVariety => u64::from(self.category_variety),
        }
    }
}

/// Progress toward a single achievement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneProgress {
    pub achievement_id: String,
    pub name: String,
    pub metric: Metric,
    pub current: u64,
    pub target: u64,
    /// Completion fraction in 0.0..=1.0
    pub fraction: f64,
    pub unlocked: bool,
}

/// Evaluates the achievement table against aggregated stats
#[derive(Debug, Clone)]
pub struct AchievementEvaluator {
    definitions: Vec<AchievementDefinition>,
}

impl AchievementEvaluator {
    /// Build an evaluator, validating the definition table
    pub fn new(definitions: Vec<AchievementDefinition>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for def in &definitions {
            if def.id.trim().is_empty() {
                return Err(DomainError::InvalidDefinition(
                    "Achievement id cannot be empty".to_string()
                ));
            }
            if !seen.insert(def.id.as_str()) {
                return Err(DomainError::InvalidDefinition(format!(
                    "Duplicate achievement id '{}'", def.id
                )));
            }
            if def.requirement.value == 0 {
                return Err(DomainError::InvalidDefinition(format!(
                    "Achievement '{}' needs a threshold of at least 1", def.id
                )));
            }
        }

        Ok(Self { definitions })
    }

    pub fn definitions(&self) -> &[AchievementDefinition] {
        &self.definitions
    }

    pub fn definition(&self, id: &str) -> Option<&AchievementDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    /// Sum of points of the given unlocked ids; unknown ids count for nothing
    pub fn total_points(&self, unlocked: &BTreeSet<String>) -> u64 {
        self.definitions
            .iter()
            .filter(|d| unlocked.contains(&d.id))
            .map(|d| u64::from(d.points))
            .sum()
    }

    /// Return every achievement newly earned by `stats`
    ///
    /// Points earned during this call count toward point thresholds in the
    /// same call, so evaluating again with the returned ids added to
    /// `already_unlocked` yields nothing new. The result is in definition
    /// table order.
    pub fn evaluate(
        &self,
        stats: &ProgressStats,
        already_unlocked: &BTreeSet<String>,
        now: DateTime<Utc>,
    ) -> Vec<UnlockedAchievement> {
        let mut earned = vec![false; self.definitions.len()];
        let mut points = self.total_points(already_unlocked);

        loop {
            let mut changed = false;

            for (index, def) in self.definitions.iter().enumerate() {
                if earned[index] || already_unlocked.contains(&def.id) {
                    continue;
                }
                let value = stats.metric_value(def.requirement.metric, points);
                if value >= def.requirement.value {
                    earned[index] = true;
                    points += u64::from(def.points);
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        self.definitions
            .iter()
            .zip(earned)
            .filter(|(_, is_new)| *is_new)
            .map(|(def, _)| {
                tracing::debug!("Achievement unlocked: {}", def.id);
                UnlockedAchievement {
                    achievement_id: def.id.clone(),
                    unlocked_at: now,
                }
            })
            .collect()
    }

    /// Progress toward every achievement in table order
    pub fn progress(
        &self,
        stats: &ProgressStats,
        already_unlocked: &BTreeSet<String>,
    ) -> Vec<MilestoneProgress> {
        let points = self.total_points(already_unlocked);

        self.definitions
            .iter()
            .map(|def| {
                let unlocked = already_unlocked.contains(&def.id);
                let target = def.requirement.value;
                let current = stats.metric_value(def.requirement.metric, points);
                let fraction = if unlocked {
                    1.0
                } else {
                    (current as f64 / target as f64).min(1.0)
                };

                MilestoneProgress {
                    achievement_id: def.id.clone(),
                    name: def.name.clone(),
                    metric: def.requirement.metric,
                    current,
                    target,
                    fraction,
                    unlocked,
                }
            })
            .collect()
    }
}

/// Built-in achievement table used when no configuration file is supplied
pub fn default_catalog() -> Vec<AchievementDefinition> {
    use Metric::*;
    use Rarity::*;

    vec![
        AchievementDefinition::new("first-step", "First Step", "Complete your first activity", "milestone", TotalEvents, 1, 10, Common),
        AchievementDefinition::new("getting-started", "Getting Started", "Complete 10 activities", "milestone", TotalEvents, 10, 25, Common),
        AchievementDefinition::new("dedicated", "Dedicated", "Complete 50 activities", "milestone", TotalEvents, 50, 50, Uncommon),
        AchievementDefinition::new("centurion", "Centurion", "Complete 100 activities", "milestone", TotalEvents, 100, 100, Rare),
        AchievementDefinition::new("streak-starter", "Streak Starter", "Reach a 3 day streak", "streak", Streak, 3, 15, Common),
        AchievementDefinition::new("week-warrior", "Week Warrior", "Reach a 7 day streak", "streak", Streak, 7, 50, Uncommon),
        AchievementDefinition::new("fortnight-focus", "Fortnight Focus", "Reach a 14 day streak", "streak", Streak, 14, 100, Rare),
        AchievementDefinition::new("monthly-master", "Monthly Master", "Reach a 30 day streak", "streak", Streak, 30, 250, Epic),
        AchievementDefinition::new("century-streak", "Century Streak", "Reach a 100 day streak", "streak", Streak, 100, 1000, Legendary),
        AchievementDefinition::new("regular", "Regular", "Be active on 7 different days", "consistency", ActiveDays, 7, 20, Common),
        AchievementDefinition::new("committed", "Committed", "Be active on 30 different days", "consistency", ActiveDays, 30, 75, Uncommon),
        AchievementDefinition::new("seasoned", "Seasoned", "Be active on 90 different days", "consistency", ActiveDays, 90, 200, Rare),
        AchievementDefinition::new("explorer", "Explorer", "Try 3 different kinds of activity", "variety", CategoryVariety, 3, 30, Common),
        AchievementDefinition::new("well-rounded", "Well Rounded", "Try 5 different kinds of activity", "variety", CategoryVariety, 5, 75, Uncommon),
        AchievementDefinition::new("point-collector", "Point Collector", "Earn 100 achievement points", "points", TotalPoints, 100, 25, Uncommon),
        AchievementDefinition::new("point-hoarder", "Point Hoarder", "Earn 500 achievement points", "points", TotalPoints, 500, 100, Epic),
    ]
}
