//! SQLite-backed store

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::WatchStore;
use crate::db::{Episode, EpisodeId, Show, ShowId, Universe, UniverseId, Viewer, WatchMarker};
use crate::time::{now, to_db_text};
use crate::{Error, Result};

/// Ids bound per `IN (...)` list, well under SQLite's host parameter limit
const MAX_IDS_PER_QUERY: usize = 500;

const EPISODE_COLUMNS: &str = "e.id, e.title, e.season_number, e.episode_number, e.air_date, \
                               e.show_id, s.title AS show_title";

#[derive(Debug, Clone, Deserialize)]
pub struct NewShow {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_public: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUniverse {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub creator_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEpisode {
    pub show_id: ShowId,
    pub title: String,
    #[serde(default = "default_season")]
    pub season_number: i64,
    pub episode_number: i64,
    #[serde(default)]
    pub air_date: Option<NaiveDate>,
}

fn default_true() -> bool {
    true
}

fn default_season() -> i64 {
    1
}

/// Store over a SQLite pool created by [`crate::db::init_database`]
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn insert_show(&self, new: &NewShow) -> Result<Show> {
        let id = Uuid::new_v4();
        let created = now();
        sqlx::query(
            "INSERT INTO shows (id, title, description, poster_url, is_public, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.poster_url)
        .bind(new.is_public)
        .bind(to_db_text(created))
        .bind(to_db_text(created))
        .execute(&self.pool)
        .await?;

        debug!("Inserted show {} ({})", new.title, id);
        self.show(id).await
    }

    pub async fn insert_universe(&self, new: &NewUniverse) -> Result<Universe> {
        let id = Uuid::new_v4();
        let created = now();
        sqlx::query(
            "INSERT INTO universes (id, name, description, is_public, creator_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.is_public)
        .bind(new.creator_id.map(|c| c.to_string()))
        .bind(to_db_text(created))
        .bind(to_db_text(created))
        .execute(&self.pool)
        .await?;

        debug!("Inserted universe {} ({})", new.name, id);
        self.universe(id).await
    }

    pub async fn insert_episode(&self, new: &NewEpisode) -> Result<Episode> {
        let show = self.show(new.show_id).await?;
        let id = Uuid::new_v4();
        let created = to_db_text(now());
        sqlx::query(
            "INSERT INTO episodes (id, show_id, title, season_number, episode_number, air_date, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(show.id.to_string())
        .bind(&new.title)
        .bind(new.season_number)
        .bind(new.episode_number)
        .bind(new.air_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(&created)
        .bind(&created)
        .execute(&self.pool)
        .await?;

        Ok(Episode {
            id,
            title: new.title.clone(),
            season_number: new.season_number,
            episode_number: new.episode_number,
            air_date: new.air_date,
            show_id: show.id,
            show_title: show.title,
        })
    }

    async fn owned_universe(&self, viewer: &Viewer, universe_id: UniverseId) -> Result<Universe> {
        let universe = self.universe(universe_id).await?;
        if !universe.is_owned_by(viewer) {
            return Err(Error::Forbidden(format!(
                "universe {} belongs to another user",
                universe_id
            )));
        }
        Ok(universe)
    }
}

#[async_trait]
impl WatchStore for SqliteStore {
    async fn show(&self, show_id: ShowId) -> Result<Show> {
        let row = sqlx::query("SELECT * FROM shows WHERE id = ?")
            .bind(show_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::not_found("show", show_id))?;

        Show::from_row(&row)
    }

    async fn universe(&self, universe_id: UniverseId) -> Result<Universe> {
        let row = sqlx::query("SELECT * FROM universes WHERE id = ?")
            .bind(universe_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::not_found("universe", universe_id))?;

        Universe::from_row(&row)
    }

    async fn episodes_for_show(&self, show_id: ShowId) -> Result<Vec<Episode>> {
        let sql = format!(
            "SELECT {} FROM episodes e
             JOIN shows s ON s.id = e.show_id
             WHERE e.show_id = ?
             ORDER BY e.season_number ASC, e.episode_number ASC",
            EPISODE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(show_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Episode::from_row).collect()
    }

    async fn episodes_for_universe(&self, universe_id: UniverseId) -> Result<Vec<Episode>> {
        let sql = format!(
            "SELECT {} FROM episodes e
             JOIN shows s ON s.id = e.show_id
             JOIN show_universes su ON su.show_id = e.show_id
             WHERE su.universe_id = ?
             ORDER BY e.air_date ASC, s.title ASC, e.season_number ASC, e.episode_number ASC",
            EPISODE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(universe_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Episode::from_row).collect()
    }

    async fn watched_episode_ids(
        &self,
        viewer: &Viewer,
        episode_ids: &[EpisodeId],
    ) -> Result<Vec<EpisodeId>> {
        let mut watched = Vec::new();
        for chunk in episode_ids.chunks(MAX_IDS_PER_QUERY) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT user_id, episode_id, watched_at FROM user_episode_status
                 WHERE user_id = ? AND status = 'watched' AND episode_id IN ({})",
                placeholders
            );

            let mut query = sqlx::query(&sql).bind(viewer.id.to_string());
            for id in chunk {
                query = query.bind(id.to_string());
            }

            for row in query.fetch_all(&self.pool).await? {
                watched.push(WatchMarker::from_row(&row)?.episode_id);
            }
        }

        Ok(watched)
    }

    async fn markers(&self, viewer: &Viewer) -> Result<Vec<WatchMarker>> {
        let rows = sqlx::query(
            "SELECT user_id, episode_id, watched_at FROM user_episode_status
             WHERE user_id = ? AND status = 'watched'
             ORDER BY episode_id",
        )
        .bind(viewer.id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(WatchMarker::from_row).collect()
    }

    async fn upsert_watched(
        &self,
        viewer: &Viewer,
        episode_id: EpisodeId,
        watched_at: DateTime<Utc>,
    ) -> Result<()> {
        let stamp = to_db_text(watched_at);
        sqlx::query(
            "INSERT INTO user_episode_status (user_id, episode_id, status, watched_at, created_at, updated_at)
             VALUES (?, ?, 'watched', ?, ?, ?)
             ON CONFLICT(user_id, episode_id) DO UPDATE SET
                 status = 'watched',
                 watched_at = excluded.watched_at,
                 updated_at = excluded.updated_at",
        )
        .bind(viewer.id.to_string())
        .bind(episode_id.to_string())
        .bind(&stamp)
        .bind(&stamp)
        .bind(&stamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_watched(&self, viewer: &Viewer, episode_id: EpisodeId) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM user_episode_status WHERE user_id = ? AND episode_id = ?",
        )
        .bind(viewer.id.to_string())
        .bind(episode_id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!("No watched marker for episode {} to delete", episode_id);
        }
        Ok(())
    }

    async fn public_shows(&self) -> Result<Vec<Show>> {
        let rows = sqlx::query(
            "SELECT * FROM shows WHERE is_public = 1 ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Show::from_row).collect()
    }

    async fn tracked_show_ids(&self, viewer: &Viewer) -> Result<Vec<ShowId>> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT show_id FROM user_show_tracking WHERE user_id = ?")
                .bind(viewer.id.to_string())
                .fetch_all(&self.pool)
                .await?;

        ids.iter()
            .map(|s| {
                Uuid::parse_str(s).map_err(|e| Error::CorruptRow {
                    table: "user_show_tracking",
                    reason: format!("bad uuid {:?}: {}", s, e),
                })
            })
            .collect()
    }

    async fn track_show(&self, viewer: &Viewer, show_id: ShowId) -> Result<()> {
        self.show(show_id).await?;

        sqlx::query(
            "INSERT INTO user_show_tracking (user_id, show_id, created_at)
             VALUES (?, ?, ?)
             ON CONFLICT(user_id, show_id) DO NOTHING",
        )
        .bind(viewer.id.to_string())
        .bind(show_id.to_string())
        .bind(to_db_text(now()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn universes(&self) -> Result<Vec<Universe>> {
        let rows = sqlx::query("SELECT * FROM universes ORDER BY created_at DESC, rowid DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Universe::from_row).collect()
    }

    async fn shows_in_universe(&self, universe_id: UniverseId) -> Result<Vec<Show>> {
        let rows = sqlx::query(
            "SELECT s.* FROM shows s
             JOIN show_universes su ON su.show_id = s.id
             WHERE su.universe_id = ?
             ORDER BY s.title ASC",
        )
        .bind(universe_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Show::from_row).collect()
    }

    async fn shows_not_in_universe(&self, universe_id: UniverseId) -> Result<Vec<Show>> {
        let rows = sqlx::query(
            "SELECT * FROM shows
             WHERE id NOT IN (SELECT show_id FROM show_universes WHERE universe_id = ?)
             ORDER BY created_at DESC, rowid DESC",
        )
        .bind(universe_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Show::from_row).collect()
    }

    async fn add_show_to_universe(&self, show_id: ShowId, universe_id: UniverseId) -> Result<()> {
        self.show(show_id).await?;
        self.universe(universe_id).await?;

        sqlx::query(
            "INSERT INTO show_universes (show_id, universe_id, created_at)
             VALUES (?, ?, ?)
             ON CONFLICT(show_id, universe_id) DO NOTHING",
        )
        .bind(show_id.to_string())
        .bind(universe_id.to_string())
        .bind(to_db_text(now()))
        .execute(&self.pool)
        .await?;

        info!("Linked show {} to universe {}", show_id, universe_id);
        Ok(())
    }

    async fn set_universe_public(
        &self,
        viewer: &Viewer,
        universe_id: UniverseId,
        is_public: bool,
    ) -> Result<()> {
        self.owned_universe(viewer, universe_id).await?;

        sqlx::query("UPDATE universes SET is_public = ?, updated_at = ? WHERE id = ? AND creator_id = ?")
            .bind(is_public)
            .bind(to_db_text(now()))
            .bind(universe_id.to_string())
            .bind(viewer.id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_universe(&self, viewer: &Viewer, universe_id: UniverseId) -> Result<()> {
        self.owned_universe(viewer, universe_id).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM show_universes WHERE universe_id = ?")
            .bind(universe_id.to_string())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM universes WHERE id = ? AND creator_id = ?")
            .bind(universe_id.to_string())
            .bind(viewer.id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Deleted universe {}", universe_id);
        Ok(())
    }
}
