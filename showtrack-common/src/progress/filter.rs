//! Episode filter predicate
//!
//! All three conditions must hold for an episode to stay in the view:
//! text match, show filter, and watched-status filter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::db::Episode;
use crate::Error;

/// Sentinel accepted from query strings for "no restriction"
pub const ALL: &str = "all";

/// Watched-status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Watched,
    Unwatched,
}

impl StatusFilter {
    pub fn accepts(self, is_watched: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Watched => is_watched,
            StatusFilter::Unwatched => !is_watched,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "" => Ok(StatusFilter::All),
            "watched" => Ok(StatusFilter::Watched),
            "unwatched" => Ok(StatusFilter::Unwatched),
            other => Err(Error::InvalidInput(format!(
                "status filter must be all, watched or unwatched (got {:?})",
                other
            ))),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusFilter::All => "all",
            StatusFilter::Watched => "watched",
            StatusFilter::Unwatched => "unwatched",
        };
        f.write_str(s)
    }
}

/// Which kind of entity the episode pool was scoped to
///
/// Universe scope also searches show titles and honours the show filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Show,
    Universe,
}

/// UI filter state for one dashboard request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeFilter {
    /// Lowercased search term; empty matches everything
    needle: String,
    /// Exact show title, `None` for "all"
    show: Option<String>,
    status: StatusFilter,
}

impl EpisodeFilter {
    pub fn new(search: &str, show: Option<&str>, status: StatusFilter) -> Self {
        let show = show
            .filter(|s| *s != ALL && !s.is_empty())
            .map(str::to_string);

        Self {
            needle: search.to_lowercase(),
            show,
            status,
        }
    }

    pub fn with_status(status: StatusFilter) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn status(&self) -> StatusFilter {
        self.status
    }

    pub fn show(&self) -> Option<&str> {
        self.show.as_deref()
    }

    pub fn matches(&self, episode: &Episode, is_watched: bool, scope: ScopeKind) -> bool {
        self.matches_text(episode, scope)
            && self.matches_show(episode, scope)
            && self.status.accepts(is_watched)
    }

    fn matches_text(&self, episode: &Episode, scope: ScopeKind) -> bool {
        if self.needle.is_empty() {
            return true;
        }

        episode.title.to_lowercase().contains(&self.needle)
            || (scope == ScopeKind::Universe
                && episode.show_title.to_lowercase().contains(&self.needle))
    }

    fn matches_show(&self, episode: &Episode, scope: ScopeKind) -> bool {
        match (&self.show, scope) {
            (Some(title), ScopeKind::Universe) => episode.show_title == *title,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn episode(title: &str, show_title: &str) -> Episode {
        Episode {
            id: Uuid::new_v4(),
            title: title.to_string(),
            season_number: 1,
            episode_number: 1,
            air_date: None,
            show_id: Uuid::new_v4(),
            show_title: show_title.to_string(),
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filter = EpisodeFilter::new("PiLoT", None, StatusFilter::All);
        assert!(filter.matches(&episode("The Pilot", "Lost"), false, ScopeKind::Show));
        assert!(!filter.matches(&episode("Finale", "Lost"), false, ScopeKind::Show));
    }

    #[test]
    fn test_show_title_searched_only_in_universe_scope() {
        let filter = EpisodeFilter::new("arrow", None, StatusFilter::All);
        let ep = episode("Pilot", "Arrow");

        assert!(filter.matches(&ep, false, ScopeKind::Universe));
        assert!(!filter.matches(&ep, false, ScopeKind::Show));
    }

    #[test]
    fn test_show_filter_requires_exact_title() {
        let filter = EpisodeFilter::new("", Some("Arrow"), StatusFilter::All);

        assert!(filter.matches(&episode("Pilot", "Arrow"), false, ScopeKind::Universe));
        assert!(!filter.matches(&episode("Pilot", "arrow"), false, ScopeKind::Universe));
        assert!(!filter.matches(&episode("Pilot", "The Flash"), false, ScopeKind::Universe));
    }

    #[test]
    fn test_show_filter_all_sentinel() {
        let filter = EpisodeFilter::new("", Some(ALL), StatusFilter::All);
        assert_eq!(filter.show(), None);
        assert!(filter.matches(&episode("Pilot", "Anything"), true, ScopeKind::Universe));
    }

    #[test]
    fn test_status_filter() {
        let ep = episode("Pilot", "Lost");

        let watched = EpisodeFilter::with_status(StatusFilter::Watched);
        assert!(watched.matches(&ep, true, ScopeKind::Show));
        assert!(!watched.matches(&ep, false, ScopeKind::Show));

        let unwatched = EpisodeFilter::with_status(StatusFilter::Unwatched);
        assert!(unwatched.matches(&ep, false, ScopeKind::Show));
        assert!(!unwatched.matches(&ep, true, ScopeKind::Show));
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("watched".parse::<StatusFilter>().unwrap(), StatusFilter::Watched);
        assert_eq!("unwatched".parse::<StatusFilter>().unwrap(), StatusFilter::Unwatched);
        assert!("seen".parse::<StatusFilter>().is_err());
    }
}
