//! Keynote driver built on AppleScript (`osascript -e`).

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::process::Command;

use crate::errors::{PresenterError, Result};

use super::presenter_model::PresenterStatus;
use super::presenter_traits::PresenterTrait;

const STATUS_SCRIPT: &str = r#"
tell application "Keynote"
    if not (exists front document) then
        return "closed"
    end if
    tell front document
        set doc_name to its name
        set slide_num to slide number of its current slide
        set is_playing to playing of application "Keynote"
        return doc_name & "||" & slide_num & "||" & is_playing
    end tell
end tell
"#;

const SLIDE_COUNT_SCRIPT: &str =
    r#"tell application "Keynote" to get count of slides of the front document"#;

const CURRENT_SLIDE_SCRIPT: &str =
    r#"tell application "Keynote" to get slide number of the current slide of the front document"#;

const START_SCRIPT: &str =
    r#"tell application "Keynote" to start slideshow of the front document"#;

const STOP_SCRIPT: &str = r#"tell application "Keynote" to stop slideshow"#;

const CLOSE_SCRIPT: &str = r#"tell application "Keynote" to close front document"#;

const NEXT_SCRIPT: &str = r#"
tell application "Keynote"
    if playing is true then
        show next
    else
        if not (exists front document) then error "No presentation open."
        tell front document
            set current_slide_number to get slide number of current slide
            if current_slide_number < (count of slides) then
                set current slide to slide (current_slide_number + 1)
            end if
        end tell
    end if
    return get slide number of the current slide of the front document
end tell
"#;

const PREVIOUS_SCRIPT: &str = r#"
tell application "Keynote"
    if playing is true then
        show previous
    else
        if not (exists front document) then error "No presentation open."
        tell front document
            set current_slide_number to get slide number of current slide
            if current_slide_number > 1 then
                set current slide to slide (current_slide_number - 1)
            end if
        end tell
    end if
    return get slide number of the current slide of the front document
end tell
"#;

fn goto_script(slide_number: u32) -> String {
    format!(
        r#"
tell application "Keynote"
    if not (exists front document) then error "No presentation open."
    if playing is true then
        show slide {slide_number} of the front document
    else
        set current slide of front document to slide {slide_number} of front document
    end if
    return get slide number of the current slide of the front document
end tell
"#
    )
}

fn open_script(path: &Path) -> String {
    let quoted = path
        .to_string_lossy()
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    format!(
        r#"
tell application "Keynote"
    open "{quoted}"
    activate
end tell
"#
    )
}

/// Parses the `name||slide||playing` line produced by the status script.
///
/// Anything unexpected reads as "no document open".
pub fn parse_status(output: &str) -> PresenterStatus {
    let output = output.trim();
    if output == "closed" {
        return PresenterStatus::closed();
    }

    let parts: Vec<&str> = output.split("||").collect();
    if parts.len() < 3 {
        return PresenterStatus::closed();
    }
    match parts[1].trim().parse::<u32>() {
        Ok(slide_number) => PresenterStatus::open(parts[0], slide_number, parts[2].trim() == "true"),
        Err(_) => PresenterStatus::closed(),
    }
}

fn parse_number(output: &str, what: &'static str) -> Result<u32> {
    output
        .trim()
        .parse::<u32>()
        .map_err(|_| PresenterError::Parse(what).into())
}

/// Talks to Keynote through the `osascript` host.
#[derive(Debug, Clone)]
pub struct KeynotePresenter {
    program: String,
}

impl Default for KeynotePresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl KeynotePresenter {
    pub fn new() -> Self {
        Self::with_program("osascript")
    }

    /// Uses another script host binary, e.g. a wrapper on a remote Mac.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, script: &str) -> Result<String> {
        let output = match Command::new(&self.program).args(["-e", script]).output().await {
            Ok(output) => output,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(PresenterError::Unavailable.into())
            }
            Err(err) => return Err(err.into()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!("{} exited with {}: {}", self.program, output.status, stderr);
            return Err(PresenterError::ScriptFailed(stderr).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Runs `script`, mapping a non-zero exit to `Ok(None)`.
    async fn run_tolerant(&self, script: &str) -> Result<Option<String>> {
        match self.run(script).await {
            Ok(out) => Ok(Some(out)),
            Err(crate::errors::Error::Presenter(PresenterError::ScriptFailed(stderr))) => {
                debug!("Script failed, treating as no document: {}", stderr);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl PresenterTrait for KeynotePresenter {
    async fn status(&self) -> Result<PresenterStatus> {
        match self.run(STATUS_SCRIPT).await {
            Ok(out) => Ok(parse_status(&out)),
            Err(err) => {
                debug!("Status script failed, reporting closed: {}", err);
                Ok(PresenterStatus::closed())
            }
        }
    }

    async fn open(&self, path: &Path) -> Result<()> {
        self.run(&open_script(path)).await.map(|_| ())
    }

    async fn slide_count(&self) -> Result<u32> {
        match self.run_tolerant(SLIDE_COUNT_SCRIPT).await? {
            Some(out) => parse_number(&out, "slide count"),
            None => Ok(0),
        }
    }

    async fn current_slide(&self) -> Result<Option<u32>> {
        match self.run_tolerant(CURRENT_SLIDE_SCRIPT).await? {
            Some(out) => parse_number(&out, "slide number").map(Some),
            None => Ok(None),
        }
    }

    async fn start(&self) -> Result<()> {
        self.run(START_SCRIPT).await.map(|_| ())
    }

    async fn stop(&self) -> Result<()> {
        if self.run_tolerant(STOP_SCRIPT).await?.is_none() {
            warn!("Stop requested but no slideshow was running");
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.run_tolerant(CLOSE_SCRIPT).await?.is_none() {
            debug!("Close requested but no document was open");
        }
        Ok(())
    }

    async fn next_slide(&self) -> Result<u32> {
        let out = self.run(NEXT_SCRIPT).await?;
        parse_number(&out, "slide number")
    }

    async fn previous_slide(&self) -> Result<u32> {
        let out = self.run(PREVIOUS_SCRIPT).await?;
        parse_number(&out, "slide number")
    }

    async fn goto_slide(&self, slide_number: u32) -> Result<u32> {
        let out = self.run(&goto_script(slide_number)).await?;
        parse_number(&out, "slide number")
    }
}
