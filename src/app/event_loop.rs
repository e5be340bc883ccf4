use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::session::{EditorSession, NvimSession};
use crate::sync::Synchronizer;

/// Holds back resize events until the terminal stops changing size.
pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// The embedded editor is started before the terminal switches to
    /// the alternate screen, so a missing `nvim` is reported on a
    /// normal terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor cannot be started, if terminal
    /// initialization fails, or if the session fails mid-run. Session
    /// failures end the program.
    pub fn run(&self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let spawn_scope = crate::perf::scope("app.nvim_start");
        let session = NvimSession::start(&self.nvim).with_context(|| {
            format!(
                "Failed to start the embedded editor ({})",
                self.nvim.program.display()
            )
        })?;
        drop(spawn_scope);
        let mut sync = Synchronizer::new(session);

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; embedit requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let result = self
            .start(&mut sync, (size.width, size.height))
            .map_err(anyhow::Error::from)
            .and_then(|mut model| self.event_loop(&mut terminal, &mut sync, &mut model));

        ratatui::restore();

        if let Err(err) = &result {
            tracing::error!(error = %err, "session ended");
        }
        result
    }

    fn event_loop<S: EditorSession>(
        &self,
        terminal: &mut DefaultTerminal,
        sync: &mut Synchronizer<S>,
        model: &mut Model,
    ) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0
                    ),
                );
                needs_render = false;
            }

            if model.should_quit {
                break;
            }

            let poll_ms = if resize_debouncer.is_pending() {
                10
            } else {
                250
            };
            if !event::poll(Duration::from_millis(poll_ms))? {
                continue;
            }

            // Drain everything already queued so a burst of keys costs
            // one render.
            let mut drained = 0_u32;
            loop {
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                match self.handle_event(&event::read()?) {
                    Some(Message::Resize(width, height)) => {
                        resize_debouncer.queue(width, height, event_ms);
                    }
                    Some(msg) => {
                        drained += 1;
                        Self::dispatch(sync, model, msg)?;
                        needs_render = true;
                    }
                    None => {}
                }
                if model.should_quit || !event::poll(Duration::from_millis(0))? {
                    break;
                }
            }
            if drained > 1 {
                crate::perf::log_event(
                    "event.drain",
                    format!("frame={frame_idx} drained={drained}"),
                );
            }
        }
        Ok(())
    }
}
