//! Request-scoped aggregator state for one show or one universe

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::filter::{EpisodeFilter, ScopeKind};
use super::order::compare_rows;
use super::status::{ProgressSummary, ShowProgress, UniverseProgress};
use super::updating::UpdatingRows;
use crate::db::{Episode, EpisodeId, ShowId, UniverseId};

/// The episode pool a board was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Show(ShowId),
    Universe(UniverseId),
}

impl Scope {
    pub fn kind(&self) -> ScopeKind {
        match self {
            Scope::Show(_) => ScopeKind::Show,
            Scope::Universe(_) => ScopeKind::Universe,
        }
    }
}

/// One displayed episode with its joined watch state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRow {
    #[serde(flatten)]
    pub episode: Episode,
    pub is_watched: bool,
    /// A toggle for this row is in flight; the UI disables its control
    pub is_updating: bool,
}

/// Episodes of one scope joined against a viewer's watched markers
#[derive(Debug, Clone)]
pub struct ProgressBoard {
    scope: Scope,
    episodes: Vec<Episode>,
    watched: HashSet<EpisodeId>,
    /// Member shows listed in the breakdown even without episodes
    members: BTreeMap<ShowId, String>,
}

impl ProgressBoard {
    /// `watched` may contain ids outside `episodes`; they are ignored.
    /// Pass an empty iterator for an unauthenticated viewer.
    pub fn new(
        scope: Scope,
        episodes: Vec<Episode>,
        watched: impl IntoIterator<Item = EpisodeId>,
    ) -> Self {
        Self {
            scope,
            episodes,
            watched: watched.into_iter().collect(),
            members: BTreeMap::new(),
        }
    }

    /// Register member shows (id, title) so that shows with no episodes
    /// still appear in [`show_breakdown`](Self::show_breakdown) as 0/0
    pub fn with_members(mut self, members: impl IntoIterator<Item = (ShowId, String)>) -> Self {
        self.members.extend(members);
        self
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn is_watched(&self, episode_id: EpisodeId) -> bool {
        self.watched.contains(&episode_id)
    }

    /// Record a toggle the store has confirmed
    pub fn apply_toggle(&mut self, episode_id: EpisodeId, watched: bool) {
        if watched {
            self.watched.insert(episode_id);
        } else {
            self.watched.remove(&episode_id);
        }
    }

    /// Filtered and ordered rows for display
    pub fn view(&self, filter: &EpisodeFilter, updating: &UpdatingRows) -> Vec<EpisodeRow> {
        let kind = self.scope.kind();
        let mut rows: Vec<EpisodeRow> = self
            .episodes
            .iter()
            .filter_map(|episode| {
                let is_watched = self.is_watched(episode.id);
                filter.matches(episode, is_watched, kind).then(|| EpisodeRow {
                    episode: episode.clone(),
                    is_watched,
                    is_updating: updating.is_updating(episode.id),
                })
            })
            .collect();

        rows.sort_by(compare_rows);
        rows
    }

    /// Progress over the full episode set, independent of any filter
    pub fn summary(&self) -> ProgressSummary {
        let watched = self
            .episodes
            .iter()
            .filter(|e| self.watched.contains(&e.id))
            .count();
        ProgressSummary::new(watched, self.episodes.len())
    }

    /// Distinct show titles in the pool, sorted, for the show-filter options
    pub fn show_options(&self) -> Vec<String> {
        self.episodes
            .iter()
            .map(|e| e.show_title.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Per-show progress for every show present in the pool or registered
    /// as a member
    pub fn show_breakdown(&self) -> Vec<ShowProgress> {
        let mut per_show: BTreeMap<ShowId, (String, usize, usize)> = self
            .members
            .iter()
            .map(|(id, title)| (*id, (title.clone(), 0, 0)))
            .collect();
        for episode in &self.episodes {
            let entry = per_show
                .entry(episode.show_id)
                .or_insert_with(|| (episode.show_title.clone(), 0, 0));
            entry.2 += 1;
            if self.watched.contains(&episode.id) {
                entry.1 += 1;
            }
        }

        per_show
            .into_iter()
            .map(|(show_id, (show_title, watched, total))| ShowProgress {
                show_id,
                show_title,
                summary: ProgressSummary::new(watched, total),
            })
            .collect()
    }

    /// Universe aggregate; `None` for a show-scoped board
    pub fn universe_progress(&self) -> Option<UniverseProgress> {
        match self.scope {
            Scope::Universe(universe_id) => Some(UniverseProgress::from_shows(
                universe_id,
                self.show_breakdown(),
            )),
            Scope::Show(_) => None,
        }
    }
}
