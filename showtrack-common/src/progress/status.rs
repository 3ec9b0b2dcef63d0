//! Completion status and progress summaries

use serde::{Deserialize, Serialize};

use crate::db::{ShowId, UniverseId};

/// Derived completion state of a show or universe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    NotStarted,
    Watching,
    Completed,
}

impl WatchStatus {
    /// Pure function of (watched, total)
    ///
    /// An empty scope is `NotStarted`, never `Completed`.
    pub fn derive(watched: usize, total: usize) -> Self {
        if watched == 0 {
            WatchStatus::NotStarted
        } else if watched == total {
            WatchStatus::Completed
        } else {
            WatchStatus::Watching
        }
    }
}

/// Watched/total counts for a full episode set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub watched: usize,
    pub total: usize,
    /// 0.0..=100.0
    pub percentage: f64,
    /// `percentage` rounded half-up for display
    pub rounded_percentage: u32,
    pub status: WatchStatus,
}

impl ProgressSummary {
    pub fn new(watched: usize, total: usize) -> Self {
        let watched = watched.min(total);
        let percentage = if total > 0 {
            watched as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            watched,
            total,
            percentage,
            rounded_percentage: (percentage + 0.5).floor() as u32,
            status: WatchStatus::derive(watched, total),
        }
    }

    /// Completion ratio in [0, 1]
    pub fn ratio(&self) -> f64 {
        self.percentage / 100.0
    }

    pub fn unwatched(&self) -> usize {
        self.total - self.watched
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowProgress {
    pub show_id: ShowId,
    pub show_title: String,
    #[serde(flatten)]
    pub summary: ProgressSummary,
}

/// Progress across every show linked to a universe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseProgress {
    pub universe_id: UniverseId,
    /// Per-show breakdown ordered by show title
    pub shows: Vec<ShowProgress>,
    #[serde(flatten)]
    pub summary: ProgressSummary,
}

impl UniverseProgress {
    /// Aggregate per-show rows; the universe totals are the sums of the parts
    pub fn from_shows(universe_id: UniverseId, mut shows: Vec<ShowProgress>) -> Self {
        shows.sort_by(|a, b| a.show_title.cmp(&b.show_title));
        let watched = shows.iter().map(|s| s.summary.watched).sum();
        let total = shows.iter().map(|s| s.summary.total).sum();

        Self {
            universe_id,
            shows,
            summary: ProgressSummary::new(watched, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_derivation() {
        assert_eq!(WatchStatus::derive(0, 5), WatchStatus::NotStarted);
        assert_eq!(WatchStatus::derive(5, 5), WatchStatus::Completed);
        assert_eq!(WatchStatus::derive(2, 5), WatchStatus::Watching);
        assert_eq!(WatchStatus::derive(0, 0), WatchStatus::NotStarted);
    }

    #[test]
    fn test_empty_scope_has_zero_percentage() {
        let summary = ProgressSummary::new(0, 0);
        assert_eq!(summary.percentage, 0.0);
        assert_eq!(summary.rounded_percentage, 0);
        assert_eq!(summary.status, WatchStatus::NotStarted);
    }

    #[test]
    fn test_percentage_and_rounding() {
        let summary = ProgressSummary::new(2, 5);
        assert!((summary.percentage - 40.0).abs() < f64::EPSILON);
        assert!((summary.ratio() - 0.4).abs() < 1e-12);
        assert_eq!(summary.unwatched(), 3);

        // 1/3 = 33.33.. rounds down, 2/3 = 66.66.. rounds up
        assert_eq!(ProgressSummary::new(1, 3).rounded_percentage, 33);
        assert_eq!(ProgressSummary::new(2, 3).rounded_percentage, 67);
    }

    #[test]
    fn test_watched_is_clamped_to_total() {
        let summary = ProgressSummary::new(7, 5);
        assert_eq!(summary.watched, 5);
        assert_eq!(summary.status, WatchStatus::Completed);
        assert!(summary.ratio() <= 1.0);
    }

    #[test]
    fn test_universe_progress_sums_shows() {
        let show = |title: &str, watched, total| ShowProgress {
            show_id: Uuid::new_v4(),
            show_title: title.to_string(),
            summary: ProgressSummary::new(watched, total),
        };

        let universe = UniverseProgress::from_shows(
            Uuid::new_v4(),
            vec![show("The Flash", 3, 10), show("Arrow", 10, 10)],
        );

        assert_eq!(universe.summary.watched, 13);
        assert_eq!(universe.summary.total, 20);
        assert_eq!(universe.summary.status, WatchStatus::Watching);
        assert_eq!(universe.shows[0].show_title, "Arrow");
        assert_eq!(universe.shows[0].summary.status, WatchStatus::Completed);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&WatchStatus::NotStarted).unwrap();
        assert_eq!(json, "\"not_started\"");
    }
}
