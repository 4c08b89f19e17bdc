//! Session controller for a remote front end.
//!
//! Every user action updates the local [`Session`] first and then mirrors the
//! change to the server. A failed mirror is logged and returned to the
//! caller; nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use keymote_core::presenter::PresenterEvent;
use keymote_core::session::{Direction, NavigationTarget, Session};
use log::{debug, info, warn};
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::RemoteClient;
use crate::error::{RemoteError, Result};

const TICK_PERIOD: Duration = Duration::from_secs(1);

fn logged(action: &str) -> impl FnOnce(RemoteError) -> RemoteError + '_ {
    move |err| {
        warn!("Failed to {}: {}", action, err);
        err
    }
}

pub struct Controller {
    client: RemoteClient,
    session: Mutex<Session>,
}

impl Controller {
    pub fn new(client: RemoteClient) -> Self {
        Self {
            client,
            session: Mutex::new(Session::new()),
        }
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    /// Locks the session for rendering.
    pub async fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().await
    }

    /// Fetches the timings document and starts over from it.
    pub async fn load(&self) -> Result<()> {
        let document = self
            .client
            .timings_document()
            .await
            .map_err(logged("load timings"))?;
        self.session.lock().await.load(document);
        Ok(())
    }

    /// Re-posts the whole document.
    async fn mirror(&self) -> Result<()> {
        let document = self.session.lock().await.document_snapshot();
        self.client
            .save_timings(&document)
            .await
            .map_err(logged("save timings"))
    }

    async fn mirror_if(&self, changed: bool) -> Result<()> {
        if changed {
            self.mirror().await
        } else {
            Ok(())
        }
    }

    /// The play button: pauses in play mode, otherwise starts the slideshow
    /// and the presentation clock.
    pub async fn toggle_play(&self) -> Result<()> {
        let changed = {
            let mut session = self.session.lock().await;
            if session.is_play_mode() {
                Some(session.pause())
            } else {
                session.start();
                None
            }
        };
        if let Some(changed) = changed {
            return self.mirror_if(changed).await;
        }

        self.client
            .start_presentation()
            .await
            .map_err(logged("start presentation"))?;
        if let Some(slide_number) = self
            .client
            .current_slide_number()
            .await
            .map_err(logged("read current slide"))?
        {
            self.session.lock().await.select_slide_number(slide_number);
        }
        Ok(())
    }

    pub async fn next(&self) -> Result<()> {
        let target = self.session.lock().await.navigation_target(Direction::Next);
        self.go_to(target).await
    }

    pub async fn previous(&self) -> Result<()> {
        let target = self
            .session
            .lock()
            .await
            .navigation_target(Direction::Previous);
        self.go_to(target).await
    }

    /// Selects timeline entry `index`, as when it is tapped in the list.
    pub async fn select(&self, index: usize) -> Result<()> {
        let target = self.session.lock().await.target_for(index);
        self.go_to(target).await
    }

    /// Breaks are selected here; slides are requested from the presenter and
    /// selected when its `slide_update` arrives.
    async fn go_to(&self, target: Option<NavigationTarget>) -> Result<()> {
        match target {
            None => Ok(()),
            Some(NavigationTarget::Local(index)) => {
                let changed = {
                    let mut session = self.session.lock().await;
                    match session.select_index(index) {
                        Some(index) => session.begin_slide_timer(index),
                        None => false,
                    }
                };
                self.mirror_if(changed).await
            }
            Some(NavigationTarget::Presenter(slide_number)) => self
                .client
                .goto_slide(slide_number)
                .await
                .map(|_| ())
                .map_err(logged("move to slide")),
        }
    }

    /// Inserts a break after the selection and returns its index.
    pub async fn add_break(&self) -> Result<usize> {
        let index = {
            let mut session = self.session.lock().await;
            if !session.has_presentation() {
                return Err(RemoteError::NoPresentation);
            }
            session.add_break()?
        };
        self.mirror().await?;
        Ok(index)
    }

    pub async fn delete_break(&self, index: usize) -> Result<()> {
        self.session.lock().await.delete_break(index)?;
        self.mirror().await
    }

    /// Sets a planned time from user text. Invalid text changes nothing; a
    /// failed save puts the old value back.
    pub async fn edit_estimate(&self, index: usize, text: &str) -> Result<()> {
        let previous = self.session.lock().await.edit_estimate(index, text)?;
        if let Err(err) = self.mirror().await {
            self.session.lock().await.set_estimate(index, previous)?;
            return Err(err);
        }
        Ok(())
    }

    /// Sets the presentation clock from the edit fields and reports it.
    pub async fn set_elapsed(&self, hours: &str, minutes: &str, seconds: &str) -> Result<u64> {
        let elapsed = self
            .session
            .lock()
            .await
            .set_elapsed(hours, minutes, seconds);
        self.client
            .save_elapsed_time(elapsed)
            .await
            .map_err(logged("save elapsed time"))?;
        Ok(elapsed)
    }

    /// Opens a library file, reloads its timings with recorded slide times
    /// cleared, and selects the slide it opened on.
    pub async fn open_presentation(&self, filename: &str) -> Result<()> {
        let current_slide = self
            .client
            .open_presentation(filename)
            .await
            .map_err(logged("open presentation"))?;
        let document = self
            .client
            .timings_document()
            .await
            .map_err(logged("load timings"))?;
        {
            let mut session = self.session.lock().await;
            session.load(document);
            session.reset_actuals();
            session.select_slide_number(current_slide);
        }
        info!("Opened '{}' on slide {}", filename, current_slide);
        self.mirror().await
    }

    /// Ends the slideshow and stops both clocks.
    pub async fn stop(&self) -> Result<()> {
        self.client
            .stop_presentation()
            .await
            .map_err(logged("stop presentation"))?;
        let changed = self.session.lock().await.stop();
        self.mirror_if(changed).await
    }

    /// Closes the document and resets the presentation clock.
    ///
    /// Nothing is re-posted: the server already recorded the session when it
    /// closed the presentation.
    pub async fn close(&self) -> Result<()> {
        self.client
            .close_presentation()
            .await
            .map_err(logged("close presentation"))?;
        self.session.lock().await.close();
        Ok(())
    }

    /// Applies a pushed event, saving recorded times when they changed.
    pub async fn apply_event(&self, event: PresenterEvent) -> Result<()> {
        debug!("Presenter event: {}", event.name());
        let changed = self.session.lock().await.apply_event(&event);
        self.mirror_if(changed).await
    }

    /// Drives both clocks once per second until aborted.
    pub fn spawn_ticker(self: &Arc<Self>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                controller.session.lock().await.tick();
            }
        })
    }

    /// Follows the server's event stream and applies every event until the
    /// stream ends.
    pub fn spawn_event_listener(self: &Arc<Self>) -> JoinHandle<Result<()>> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let events = controller.client.events().await?;
            futures::pin_mut!(events);
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        // Mirror failures are already logged.
                        let _ = controller.apply_event(event).await;
                    }
                    Err(err) => {
                        warn!("Event stream failed: {}", err);
                        return Err(err);
                    }
                }
            }
            info!("Event stream closed by the server");
            Ok(())
        })
    }
}
