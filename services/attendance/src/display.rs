//! Read-only display consumer.
//!
//! A shared screen polls the live code once per tick and redraws it. The loop
//! only reads through [`CodeSource::snapshot`]; rotation happens there as a
//! side effect of observation.

use std::io::Write;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::domain::code_generator::{CodeGenerator, CodeSnapshot};

/// Refresh cadence of the shared display.
pub const DISPLAY_PERIOD: Duration = Duration::from_secs(1);

pub trait CodeSource: Send + Sync {
    fn snapshot(&self) -> CodeSnapshot;
}

impl CodeSource for CodeGenerator {
    fn snapshot(&self) -> CodeSnapshot {
        CodeGenerator::snapshot(self)
    }
}

/// What a display shows for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFrame {
    pub code: u16,
    pub time_remaining: i64,
}

impl From<CodeSnapshot> for DisplayFrame {
    fn from(snapshot: CodeSnapshot) -> Self {
        Self {
            code: snapshot.code,
            time_remaining: snapshot.time_remaining,
        }
    }
}

impl DisplayFrame {
    pub fn text(&self) -> String {
        format!("CODE {:04}  time left: {}s", self.code, self.time_remaining)
    }
}

pub trait Renderer: Send {
    fn render(&mut self, frame: &DisplayFrame) -> std::io::Result<()>;
}

/// Redraws a single terminal line in place.
pub struct TerminalRenderer<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &DisplayFrame) -> std::io::Result<()> {
        // Carriage return + clear-line so repeated frames overwrite each other.
        write!(self.out, "\r\x1b[2K{}", frame.text())?;
        self.out.flush()
    }
}

/// Render one frame from `source`.
pub fn render_once<S, R>(source: &S, renderer: &mut R) -> DisplayFrame
where
    S: CodeSource + ?Sized,
    R: Renderer + ?Sized,
{
    let frame = DisplayFrame::from(source.snapshot());
    if let Err(e) = renderer.render(&frame) {
        warn!(error = %e, "display render failed");
    }
    frame
}

/// Poll `source` every `period` and render until the hosting task is dropped.
pub async fn run_display<S, R>(source: &S, mut renderer: R, period: Duration)
where
    S: CodeSource + ?Sized,
    R: Renderer,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_code = None;
    loop {
        ticker.tick().await;
        let frame = render_once(source, &mut renderer);
        if last_code != Some(frame.code) {
            debug!(time_remaining = frame.time_remaining, "display code changed");
            last_code = Some(frame.code);
        }
    }
}
