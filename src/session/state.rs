use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{validate_seed_title, ExclusionEntry, RecommendationRecord, WatchKey},
};

/// Which kind of fetch is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// Fresh search from user input; failures are surfaced
    Initial,
    /// Follow-up search seeded by a watched title; failures are swallowed
    Chained,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Fetching {
        kind: FetchKind,
        seed: String,
    },
    Ready,
    /// Initial search failed; carries the user-facing message
    Failed {
        error: String,
    },
}

/// State of one user-facing recommendation session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    /// Replaced wholesale on every successful fetch
    pub active_recommendations: Vec<RecommendationRecord>,
    /// Survives chained fetches so exclusions accumulate
    pub watched_keys: BTreeSet<WatchKey>,
    /// Seeds used so far, append-only, first entry is the user's search
    pub seed_chain: Vec<String>,
}

impl SessionState {
    pub fn is_fetching(&self) -> bool {
        matches!(self.status, SessionStatus::Fetching { .. })
    }

    pub fn is_watched(&self, key: &WatchKey) -> bool {
        self.watched_keys.contains(key)
    }

    /// Exclusion list sent with chained fetches
    pub fn exclusions(&self) -> Vec<ExclusionEntry> {
        self.watched_keys.iter().map(ExclusionEntry::from).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Submit(String),
    ToggleWatched(WatchKey),
    FetchSucceeded(Vec<RecommendationRecord>),
    FetchFailed(String),
}

/// Side effect requested by a transition: one recommendation fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCommand {
    pub kind: FetchKind,
    pub seed: String,
    pub exclude: Vec<ExclusionEntry>,
}

/// Computes the next session state for an event
///
/// Submits and toggles are rejected with [`AppError::SessionBusy`] while a
/// fetch is in flight, leaving the state untouched.
pub fn transition(
    state: &SessionState,
    event: Event,
) -> AppResult<(SessionState, Option<FetchCommand>)> {
    match event {
        Event::Submit(title) => submit(state, &title),
        Event::ToggleWatched(key) => toggle_watched(state, key),
        Event::FetchSucceeded(records) => fetch_succeeded(state, records),
        Event::FetchFailed(error) => fetch_failed(state, error),
    }
}

fn submit(
    state: &SessionState,
    title: &str,
) -> AppResult<(SessionState, Option<FetchCommand>)> {
    if state.is_fetching() {
        return Err(AppError::SessionBusy);
    }

    let seed = validate_seed_title(title)?.to_string();

    // Full reset: nothing from the previous search survives
    let next = SessionState {
        status: SessionStatus::Fetching {
            kind: FetchKind::Initial,
            seed: seed.clone(),
        },
        ..SessionState::default()
    };

    let command = FetchCommand {
        kind: FetchKind::Initial,
        seed,
        exclude: Vec::new(),
    };

    Ok((next, Some(command)))
}

fn toggle_watched(
    state: &SessionState,
    key: WatchKey,
) -> AppResult<(SessionState, Option<FetchCommand>)> {
    if state.is_fetching() {
        return Err(AppError::SessionBusy);
    }

    let mut next = state.clone();

    if next.watched_keys.remove(&key) {
        return Ok((next, None));
    }

    next.watched_keys.insert(key.clone());

    let seed = next
        .active_recommendations
        .iter()
        .find(|record| record.key() == key)
        .map(|record| record.title.clone())
        .filter(|title| !next.seed_chain.contains(title));

    let Some(seed) = seed else {
        return Ok((next, None));
    };

    let command = FetchCommand {
        kind: FetchKind::Chained,
        seed: seed.clone(),
        exclude: next.exclusions(),
    };

    next.status = SessionStatus::Fetching {
        kind: FetchKind::Chained,
        seed,
    };

    Ok((next, Some(command)))
}

fn fetch_succeeded(
    state: &SessionState,
    records: Vec<RecommendationRecord>,
) -> AppResult<(SessionState, Option<FetchCommand>)> {
    let SessionStatus::Fetching { kind, seed } = &state.status else {
        return Err(AppError::Internal("No fetch in flight".to_string()));
    };

    let mut next = state.clone();
    next.status = SessionStatus::Ready;

    match kind {
        FetchKind::Initial => {
            next.active_recommendations = records;
            next.seed_chain = vec![seed.clone()];
        }
        FetchKind::Chained => {
            // Matches on title alone, so a different film sharing a watched
            // title is dropped too
            let watched_titles: HashSet<&str> = state
                .watched_keys
                .iter()
                .map(|key| key.title.as_str())
                .collect();

            let filtered: Vec<RecommendationRecord> = records
                .into_iter()
                .filter(|record| !watched_titles.contains(record.title.as_str()))
                .collect();

            if !filtered.is_empty() {
                next.active_recommendations = filtered;
                next.seed_chain.push(seed.clone());
            }
        }
    }

    Ok((next, None))
}

fn fetch_failed(
    state: &SessionState,
    error: String,
) -> AppResult<(SessionState, Option<FetchCommand>)> {
    let SessionStatus::Fetching { kind, .. } = &state.status else {
        return Err(AppError::Internal("No fetch in flight".to_string()));
    };

    let mut next = state.clone();

    next.status = match kind {
        FetchKind::Initial => SessionStatus::Failed { error },
        FetchKind::Chained => SessionStatus::Ready,
    };

    Ok((next, None))
}
