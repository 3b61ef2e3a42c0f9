use log::info;
use tokio::time::{interval, MissedTickBehavior};

use super::message_queue::TickOutcome;
use crate::state::AppState;

/// One pass of the main loop: send the next queued message if possible, then save.
pub async fn tick(state: &AppState) -> TickOutcome {
    let outcome = {
        let mut outbound = state.outbound.lock().await;
        outbound.tick(&state.delivery)
    };
    state.persist().await;
    outcome
}

/// Drives `tick` every `main_loop_interval` until the task is dropped.
pub async fn run(state: AppState) {
    info!(
        "Starting sync loop every {:?}",
        state.config.main_loop_interval
    );
    let mut ticker = interval(state.config.main_loop_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        tick(&state).await;
    }
}
