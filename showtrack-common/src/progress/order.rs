//! Dashboard ordering
//!
//! Keys, each consulted only when all previous keys are equal:
//! 1. unwatched before watched
//! 2. air date ascending, a missing date counting as the Unix epoch
//! 3. season number ascending
//! 4. episode number ascending
//!
//! A missing air date therefore sorts ahead of every post-1970 date.

use chrono::NaiveDate;
use std::cmp::Ordering;

use super::board::EpisodeRow;

/// Milliseconds since the epoch at UTC midnight; `None` maps to 0
pub fn air_date_key(air_date: Option<NaiveDate>) -> i64 {
    air_date
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

pub fn compare_rows(a: &EpisodeRow, b: &EpisodeRow) -> Ordering {
    a.is_watched
        .cmp(&b.is_watched)
        .then_with(|| air_date_key(a.episode.air_date).cmp(&air_date_key(b.episode.air_date)))
        .then_with(|| a.episode.season_number.cmp(&b.episode.season_number))
        .then_with(|| a.episode.episode_number.cmp(&b.episode.episode_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Episode;
    use uuid::Uuid;

    fn row(season: i64, number: i64, air_date: Option<NaiveDate>, is_watched: bool) -> EpisodeRow {
        EpisodeRow {
            episode: Episode {
                id: Uuid::new_v4(),
                title: format!("S{}E{}", season, number),
                season_number: season,
                episode_number: number,
                air_date,
                show_id: Uuid::nil(),
                show_title: "Show".to_string(),
            },
            is_watched,
            is_updating: false,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_air_date_key() {
        assert_eq!(air_date_key(None), 0);
        assert_eq!(air_date_key(date(1970, 1, 1)), 0);
        assert_eq!(air_date_key(date(1970, 1, 2)), 86_400_000);
        assert!(air_date_key(date(1969, 12, 31)) < 0);
    }

    #[test]
    fn test_unwatched_before_watched() {
        let watched = row(1, 1, None, true);
        let unwatched = row(9, 9, date(2030, 1, 1), false);
        assert_eq!(compare_rows(&unwatched, &watched), Ordering::Less);
    }

    #[test]
    fn test_missing_air_date_sorts_first() {
        let dated = row(1, 1, date(2020, 1, 1), false);
        let tba = row(5, 5, None, false);
        assert_eq!(compare_rows(&tba, &dated), Ordering::Less);
    }

    #[test]
    fn test_season_then_episode_break_ties() {
        let a = row(1, 2, date(2020, 1, 1), false);
        let b = row(2, 1, date(2020, 1, 1), false);
        let c = row(1, 3, date(2020, 1, 1), false);

        assert_eq!(compare_rows(&a, &b), Ordering::Less);
        assert_eq!(compare_rows(&a, &c), Ordering::Less);
        assert_eq!(compare_rows(&a, &a), Ordering::Equal);
    }
}
