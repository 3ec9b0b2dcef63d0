//! Database models
//!
//! Rows are stored with TEXT ids and dates; the `from_row` constructors parse
//! them into typed values and report malformed text as [`Error::CorruptRow`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use crate::{Error, Result};

pub type ShowId = Uuid;
pub type UniverseId = Uuid;
pub type EpisodeId = Uuid;

/// The identity a request acts on behalf of
///
/// Handlers pass `Option<&Viewer>` explicitly; `None` means the request is
/// unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewer {
    pub id: Uuid,
}

impl Viewer {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl Show {
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            id: parse_uuid("shows", row.try_get("id")?)?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            poster_url: row.try_get("poster_url")?,
            is_public: row.try_get::<i64, _>("is_public")? != 0,
            created_at: parse_timestamp("shows", row.try_get("created_at")?)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub id: UniverseId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub creator_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Universe {
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self> {
        let creator_id = row
            .try_get::<Option<String>, _>("creator_id")?
            .map(|s| parse_uuid("universes", s))
            .transpose()?;

        Ok(Self {
            id: parse_uuid("universes", row.try_get("id")?)?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            is_public: row.try_get::<i64, _>("is_public")? != 0,
            creator_id,
            created_at: parse_timestamp("universes", row.try_get("created_at")?)?,
        })
    }

    /// Whether `viewer` may change visibility or delete this universe
    pub fn is_owned_by(&self, viewer: &Viewer) -> bool {
        self.creator_id == Some(viewer.id)
    }
}

/// One episode row joined with its owning show's title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    pub title: String,
    pub season_number: i64,
    pub episode_number: i64,
    /// `None` when the air date has not been announced yet
    pub air_date: Option<NaiveDate>,
    pub show_id: ShowId,
    pub show_title: String,
}

impl Episode {
    /// Expects the columns selected by the store's episode queries
    /// (`e.*` plus `show_title`).
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self> {
        let air_date = row
            .try_get::<Option<String>, _>("air_date")?
            .map(|s| parse_date("episodes", &s))
            .transpose()?;

        Ok(Self {
            id: parse_uuid("episodes", row.try_get("id")?)?,
            title: row.try_get("title")?,
            season_number: row.try_get("season_number")?,
            episode_number: row.try_get("episode_number")?,
            air_date,
            show_id: parse_uuid("episodes", row.try_get("show_id")?)?,
            show_title: row.try_get("show_title")?,
        })
    }
}

/// A viewer's "watched" record for one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchMarker {
    pub viewer_id: Uuid,
    pub episode_id: EpisodeId,
    pub watched_at: Option<DateTime<Utc>>,
}

impl WatchMarker {
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self> {
        let watched_at = row
            .try_get::<Option<String>, _>("watched_at")?
            .map(|s| parse_timestamp("user_episode_status", s))
            .transpose()?;

        Ok(Self {
            viewer_id: parse_uuid("user_episode_status", row.try_get("user_id")?)?,
            episode_id: parse_uuid("user_episode_status", row.try_get("episode_id")?)?,
            watched_at,
        })
    }
}

fn parse_uuid(table: &'static str, text: String) -> Result<Uuid> {
    Uuid::parse_str(&text).map_err(|e| Error::CorruptRow {
        table,
        reason: format!("bad uuid {:?}: {}", text, e),
    })
}

fn parse_date(table: &'static str, text: &str) -> Result<NaiveDate> {
    // Some rows carry a full timestamp in air_date; only the date part matters.
    let date_part = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| Error::CorruptRow {
        table,
        reason: format!("bad date {:?}: {}", text, e),
    })
}

fn parse_timestamp(table: &'static str, text: String) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::CorruptRow {
            table,
            reason: format!("bad timestamp {:?}: {}", text, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_plain_and_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(parse_date("episodes", "2020-01-01").unwrap(), expected);
        assert_eq!(
            parse_date("episodes", "2020-01-01T00:00:00+00:00").unwrap(),
            expected
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        let err = parse_date("episodes", "soon").unwrap_err();
        assert!(matches!(err, Error::CorruptRow { table: "episodes", .. }));
    }

    #[test]
    fn test_universe_ownership() {
        let owner = Viewer::new(Uuid::new_v4());
        let universe = Universe {
            id: Uuid::new_v4(),
            name: "Arrowverse".to_string(),
            description: None,
            is_public: false,
            creator_id: Some(owner.id),
            created_at: Utc::now(),
        };

        assert!(universe.is_owned_by(&owner));
        assert!(!universe.is_owned_by(&Viewer::new(Uuid::new_v4())));
    }
}
