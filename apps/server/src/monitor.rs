//! Background poller that watches the presentation application and pushes
//! changes to connected remotes.

use std::sync::Arc;
use std::time::Duration;

use keymote_core::presenter::{Monitor, PresenterTrait};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::events::EventBus;
use crate::main_lib::AppState;

const MIN_POLL_PERIOD: Duration = Duration::from_millis(1);

/// Starts the presenter monitor. Runs until the runtime shuts down.
///
/// Periods below one millisecond are raised to it.
pub fn start_presenter_monitor(state: Arc<AppState>, period: Duration) -> JoinHandle<()> {
    let period = period.max(MIN_POLL_PERIOD);
    let presenter = state.presenter.clone();
    let event_bus = state.event_bus.clone();
    tokio::spawn(async move {
        info!("Presenter monitor started ({} ms interval)", period.as_millis());
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut monitor = Monitor::new();

        loop {
            ticker.tick().await;
            poll_once(presenter.as_ref(), &mut monitor, &event_bus).await;
        }
    })
}

/// Runs a single poll and publishes the resulting event, if any.
pub async fn poll_once(
    presenter: &dyn PresenterTrait,
    monitor: &mut Monitor,
    event_bus: &EventBus,
) {
    let status = match presenter.status().await {
        Ok(status) => status,
        Err(err) => {
            warn!("Presenter status poll failed: {}", err);
            return;
        }
    };
    if let Some(event) = monitor.observe(status) {
        debug!("Presenter event: {}", event.name());
        event_bus.publish(event);
    }
}
