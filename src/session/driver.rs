use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    error::{AppError, AppResult},
    models::WatchKey,
    services::Recommender,
    session::{
        snapshot::SessionSnapshot,
        state::{transition, Event, FetchCommand, FetchKind, SessionState},
    },
};

/// Drives one recommendation session
///
/// State changes go through [`transition`]; the driver only executes the fetch
/// commands it returns. The lock is never held across the network call, and a
/// second submit or toggle during a fetch is rejected with
/// [`AppError::SessionBusy`].
#[derive(Clone)]
pub struct SessionDriver {
    state: Arc<Mutex<SessionState>>,
    recommender: Arc<dyn Recommender>,
}

impl SessionDriver {
    pub fn new(recommender: Arc<dyn Recommender>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            recommender,
        }
    }

    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(&*self.state.lock().await)
    }

    /// Starts a fresh search, discarding the whole previous session
    ///
    /// Fetch failures are recorded in the session and also returned.
    pub async fn submit(&self, title: &str) -> AppResult<SessionSnapshot> {
        let command = apply(&self.state, Event::Submit(title.to_string())).await?;
        self.execute(command).await?;
        Ok(self.snapshot().await)
    }

    /// Flips a record's watched flag, possibly chaining a new fetch
    ///
    /// The toggle is committed even when the chained fetch fails.
    pub async fn toggle_watched(&self, key: WatchKey) -> AppResult<SessionSnapshot> {
        let command = apply(&self.state, Event::ToggleWatched(key)).await?;
        self.execute(command).await?;
        Ok(self.snapshot().await)
    }

    /// Runs a fetch command to completion
    ///
    /// The fetch runs on its own task so that a dropped caller cannot leave the
    /// session stuck in the fetching state.
    async fn execute(&self, command: Option<FetchCommand>) -> AppResult<()> {
        let Some(command) = command else {
            return Ok(());
        };

        let task = tokio::spawn(run_fetch(
            self.state.clone(),
            self.recommender.clone(),
            command,
        ));

        task.await
            .map_err(|e| AppError::Internal(format!("Session fetch task failed: {}", e)))?
    }
}

async fn run_fetch(
    state: Arc<Mutex<SessionState>>,
    recommender: Arc<dyn Recommender>,
    command: FetchCommand,
) -> AppResult<()> {
    match recommender.recommend(&command.seed, &command.exclude).await {
        Ok(records) => {
            tracing::info!(
                seed = %command.seed,
                kind = ?command.kind,
                results = records.len(),
                "Session fetch completed"
            );
            apply(&state, Event::FetchSucceeded(records)).await?;
            Ok(())
        }
        Err(e) => {
            apply(&state, Event::FetchFailed(e.user_message())).await?;
            match command.kind {
                FetchKind::Initial => Err(e),
                FetchKind::Chained => {
                    tracing::warn!(
                        seed = %command.seed,
                        error = %e,
                        "Chained fetch failed, keeping current recommendations"
                    );
                    Ok(())
                }
            }
        }
    }
}

async fn apply(state: &Mutex<SessionState>, event: Event) -> AppResult<Option<FetchCommand>> {
    let mut guard = state.lock().await;
    let (next, command) = transition(&guard, event)?;
    *guard = next;
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::RecommendationRecord,
        services::{normalizer::ParseFailure, recommendations::MockRecommender},
        session::snapshot::StatusTag,
    };
    use mockall::Sequence;

    fn record(title: &str, year: &str) -> RecommendationRecord {
        RecommendationRecord {
            title: title.to_string(),
            year: year.to_string(),
            reason: "Similar tone.".to_string(),
            genre: "Sci-Fi".to_string(),
            streaming: "Netflix".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_then_chain() {
        let mut recommender = MockRecommender::new();
        let mut seq = Sequence::new();

        recommender
            .expect_recommend()
            .withf(|seed, exclude| seed == "The Matrix" && exclude.is_empty())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(vec![record("Blade Runner", "1982"), record("Dark City", "1998")]));

        recommender
            .expect_recommend()
            .withf(|seed, exclude| {
                seed == "Blade Runner" && exclude.len() == 1 && exclude[0].year == "1982"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(vec![record("Alien", "1979")]));

        let driver = SessionDriver::new(Arc::new(recommender));

        let snapshot = driver.submit("The Matrix").await.unwrap();
        assert_eq!(snapshot.status, StatusTag::Ready);
        assert_eq!(snapshot.recommendations.len(), 2);

        let snapshot = driver
            .toggle_watched(WatchKey::new("Blade Runner", "1982"))
            .await
            .unwrap();
        assert_eq!(snapshot.recommendations.len(), 1);
        assert_eq!(snapshot.seed_chain, vec!["The Matrix", "Blade Runner"]);
        assert_eq!(snapshot.watched_count, 1);
    }

    #[tokio::test]
    async fn test_initial_failure_is_surfaced() {
        let mut recommender = MockRecommender::new();
        recommender
            .expect_recommend()
            .returning(|_, _| Err(AppError::Parse(ParseFailure::NoJson)));

        let driver = SessionDriver::new(Arc::new(recommender));
        let err = driver.submit("The Matrix").await.unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));

        let snapshot = driver.snapshot().await;
        assert_eq!(snapshot.status, StatusTag::Failed);
        assert_eq!(
            snapshot.error.as_deref(),
            Some("Failed to get movie recommendations")
        );
        assert!(snapshot.recommendations.is_empty());
        assert!(snapshot.seed_chain.is_empty());
    }

    #[tokio::test]
    async fn test_chained_failure_is_swallowed() {
        let mut recommender = MockRecommender::new();
        let mut seq = Sequence::new();

        recommender
            .expect_recommend()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(vec![record("Blade Runner", "1982")]));
        recommender
            .expect_recommend()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(AppError::ExternalApi("status 500".to_string())));

        let driver = SessionDriver::new(Arc::new(recommender));
        driver.submit("The Matrix").await.unwrap();

        let key = WatchKey::new("Blade Runner", "1982");
        let snapshot = driver.toggle_watched(key.clone()).await.unwrap();

        assert_eq!(snapshot.status, StatusTag::Ready);
        assert_eq!(snapshot.recommendations.len(), 1);
        assert_eq!(snapshot.seed_chain, vec!["The Matrix"]);
        assert!(driver.state().await.is_watched(&key));
    }

    #[tokio::test]
    async fn test_unwatch_makes_no_call() {
        let mut recommender = MockRecommender::new();
        let mut seq = Sequence::new();

        recommender
            .expect_recommend()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(vec![record("Blade Runner", "1982"), record("Heat", "1995")]));
        recommender
            .expect_recommend()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(vec![record("Heat", "1995"), record("Ronin", "1998")]));

        let driver = SessionDriver::new(Arc::new(recommender));
        driver.submit("The Matrix").await.unwrap();

        let key = WatchKey::new("Blade Runner", "1982");
        driver.toggle_watched(key.clone()).await.unwrap();
        // Second toggle unwatches; a third call on the mock would panic
        let snapshot = driver.toggle_watched(key).await.unwrap();
        assert_eq!(snapshot.watched_count, 0);
    }
}
