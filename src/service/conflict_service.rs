use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike};
use rand::Rng;
use tokio::time::sleep;

use crate::config::AppConfig;
use crate::models::appointment::is_weekend;

/// Stand-in for a real calendar integration. A genuine implementation would
/// authenticate against the provider and list events around the candidate
/// slot; this one only imitates the shape of such a check.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarConflict {
    pub has_conflict: bool,
    pub message: String,
}

/// When and how often the simulator reports a conflict. Kept as data rather
/// than hardcoded logic; the defaults mirror a typical office week.
#[derive(Debug, Clone)]
pub struct ConflictPolicy {
    pub busy_start_hour: u32,
    pub busy_end_hour: u32,
    pub conflict_chance: f64,
    pub latency: std::time::Duration,
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        Self {
            busy_start_hour: 9,
            busy_end_hour: 17,
            conflict_chance: 0.3,
            latency: std::time::Duration::from_millis(1500),
        }
    }
}

impl ConflictPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        let defaults = Self::default();
        Self {
            busy_start_hour: config
                .get_parsed("CONFLICT_BUSY_START")
                .unwrap_or(defaults.busy_start_hour),
            busy_end_hour: config
                .get_parsed("CONFLICT_BUSY_END")
                .unwrap_or(defaults.busy_end_hour),
            conflict_chance: config
                .get_parsed("CONFLICT_CHANCE")
                .unwrap_or(defaults.conflict_chance),
            latency: config
                .get_parsed("CONFLICT_LATENCY_MS")
                .map(std::time::Duration::from_millis)
                .unwrap_or(defaults.latency),
        }
    }
}

pub trait ChanceSource: Send + Sync {
    fn roll(&self) -> f64;
}

pub struct ThreadRngChance;

impl ChanceSource for ThreadRngChance {
    fn roll(&self) -> f64 {
        rand::rng().random()
    }
}

#[async_trait]
pub trait ConflictOracle: Send + Sync {
    async fn check(&self, date: NaiveDateTime) -> CalendarConflict;
}

pub struct SimulatedCalendar {
    policy: ConflictPolicy,
    chance: Box<dyn ChanceSource>,
}

impl SimulatedCalendar {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self::with_chance(policy, Box::new(ThreadRngChance))
    }

    pub fn with_chance(policy: ConflictPolicy, chance: Box<dyn ChanceSource>) -> Self {
        Self { policy, chance }
    }
}

#[async_trait]
impl ConflictOracle for SimulatedCalendar {
    async fn check(&self, date: NaiveDateTime) -> CalendarConflict {
        sleep(self.policy.latency).await;

        let hour = date.hour();
        let is_busy_time = !is_weekend(&date)
            && hour >= self.policy.busy_start_hour
            && hour <= self.policy.busy_end_hour;

        if is_busy_time && self.chance.roll() > 1.0 - self.policy.conflict_chance {
            CalendarConflict {
                has_conflict: true,
                message: "Conflict detected: your calendar shows a 'Work Sync' meeting at that time."
                    .to_string(),
            }
        } else {
            CalendarConflict {
                has_conflict: false,
                message: "No overlap found in your calendar.".to_string(),
            }
        }
    }
}
