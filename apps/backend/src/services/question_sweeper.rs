//! Background expiry of unanswered questions.
//!
//! Requests already expire overdue questions before acting, so the sweeper
//! only matters for games nobody is touching: it keeps a stalled question
//! from blocking the turn forever.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::game_flow::expire_question;
use super::game_store::GameStore;

/// Expire every overdue question. Returns how many games changed.
pub fn sweep_expired_questions(store: &GameStore, now: OffsetDateTime) -> usize {
    let mut expired = 0;
    for slot in store.all() {
        let overdue = slot.read().question_deadline().is_some_and(|d| now >= d);
        if !overdue {
            continue;
        }
        let mut game = slot.write();
        let before = game.version;
        expire_question(&mut game, now);
        if game.version != before {
            expired += 1;
        }
    }
    if expired > 0 {
        debug!(expired, "expired overdue questions");
    }
    expired
}

/// Run [`sweep_expired_questions`] every `period` until `cancel` fires.
pub fn spawn_question_sweeper(
    store: Arc<GameStore>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        info!(period_ms = period.as_millis() as u64, "question sweeper started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    sweep_expired_questions(&store, OffsetDateTime::now_utc());
                }
            }
        }
        info!("question sweeper stopped");
    })
}
