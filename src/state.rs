//! Window lifecycle and everything the loop draws, independent of the windowing system.

use crate::{
    canvas::{BlendMode, Canvas},
    config::Config,
    error::Result,
    event::{KeyboardEvent, WindowEventKind},
    input::Input,
    sprite::SpriteList,
    timing::{Scheduler, Tick},
};

/// What the loop must do after a window event has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WindowAction {
    /// Call [`crate::Game::closed`].
    Closed,
    /// Call [`crate::Game::minimized`].
    Minimized,
    /// Call [`crate::Game::restored`].
    Restored,
    /// State didn't change, nothing to notify.
    Ignore,
}

/// State owned by a single window.
#[derive(Debug)]
pub(crate) struct WindowState {
    /// Canvas stretched over the whole window.
    pub(crate) background: Canvas,
    /// Sprites composited on top of the background.
    pub(crate) sprites: SpriteList,
    /// Keyboard state.
    pub(crate) input: Input,
    /// Update and draw tick timing.
    pub(crate) scheduler: Scheduler,
    /// Loop keeps running while this is set.
    running: bool,
    /// Window has been stopped and can't be drawn anymore.
    destroyed: bool,
    /// Window is minimized, drawing is skipped.
    minimized: bool,
}

impl WindowState {
    /// Setup the state from the configuration.
    ///
    /// # Errors
    ///
    /// - When the texture size has a zero dimension.
    pub(crate) fn new(config: &Config) -> Result<Self> {
        let (texture_width, texture_height) = config.texture_size();

        // The background replaces what's drawn, like a streaming texture without blending
        let mut background = Canvas::new(texture_width, texture_height)?;
        background.set_blend_mode(BlendMode::None);
        background.set_scaling_quality(config.scaling_quality);

        Ok(Self {
            background,
            sprites: SpriteList::new(),
            input: Input::default(),
            scheduler: Scheduler::new(config.draw_rate, config.update_rate),
            running: true,
            destroyed: false,
            minimized: false,
        })
    }

    /// Determine which ticks must run and whether they are allowed to.
    pub(crate) fn poll(&mut self, now: u64) -> Tick {
        let tick = self.scheduler.poll(now);

        Tick {
            update: tick.update && self.should_update(),
            draw: tick.draw && self.should_draw(),
        }
    }

    /// Stop the loop and mark the window as destroyed.
    pub(crate) fn stop(&mut self) {
        log::debug!("Stopping window loop");

        self.running = false;
        self.destroyed = true;
    }

    /// Mark as minimized, returns whether it changed.
    pub(crate) fn minimize(&mut self) -> bool {
        !std::mem::replace(&mut self.minimized, true)
    }

    /// Mark as restored, returns whether it changed.
    pub(crate) fn restore(&mut self) -> bool {
        std::mem::replace(&mut self.minimized, false)
    }

    /// Update the state for a window event and tell which user callback to invoke.
    pub(crate) fn handle_window_event(&mut self, kind: WindowEventKind) -> WindowAction {
        match kind {
            WindowEventKind::Close => WindowAction::Closed,
            WindowEventKind::Minimized if self.minimize() => WindowAction::Minimized,
            WindowEventKind::Restored if self.restore() => {
                // Show the current state as soon as possible
                self.scheduler.request_draw();

                WindowAction::Restored
            }
            WindowEventKind::Minimized | WindowEventKind::Restored => WindowAction::Ignore,
        }
    }

    /// Register a keyboard event.
    pub(crate) fn handle_key(&mut self, event: &KeyboardEvent) {
        self.input.handle_event(event);
    }

    /// Whether the loop must continue.
    pub(crate) const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the window has been stopped.
    pub(crate) const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether the window is minimized.
    pub(crate) const fn is_minimized(&self) -> bool {
        self.minimized
    }

    /// Update ticks run until the window is destroyed.
    pub(crate) const fn should_update(&self) -> bool {
        !self.destroyed
    }

    /// Draw ticks run until the window is destroyed and not while it's minimized.
    pub(crate) const fn should_draw(&self) -> bool {
        !self.destroyed && !self.minimized
    }
}

#[cfg(test)]
mod tests {
    use super::{WindowAction, WindowState};
    use crate::{canvas::BlendMode, config::Config, event::WindowEventKind, timing::Tick};

    fn state() -> WindowState {
        WindowState::new(
            &Config::default()
                .with_window_size(512, 392)
                .with_texture_size(256, 196)
                .with_rate(10),
        )
        .unwrap()
    }

    #[test]
    fn background_uses_texture_size() {
        let state = state();
        assert_eq!(state.background.width(), 256);
        assert_eq!(state.background.height(), 196);
        assert_eq!(state.background.blend_mode(), BlendMode::None);
    }

    #[test]
    fn minimized_skips_drawing() {
        let mut state = state();
        assert_eq!(state.poll(0), Tick {
            update: true,
            draw: true
        });

        assert_eq!(
            state.handle_window_event(WindowEventKind::Minimized),
            WindowAction::Minimized
        );
        // Minimizing twice doesn't notify twice
        assert_eq!(
            state.handle_window_event(WindowEventKind::Minimized),
            WindowAction::Ignore
        );

        assert_eq!(state.poll(10), Tick {
            update: true,
            draw: false
        });

        assert_eq!(
            state.handle_window_event(WindowEventKind::Restored),
            WindowAction::Restored
        );
        assert!(!state.is_minimized());

        // Restoring forces a draw right away
        assert_eq!(state.poll(11), Tick {
            update: false,
            draw: true
        });
    }

    #[test]
    fn restore_without_minimize_is_ignored() {
        let mut state = state();
        assert_eq!(
            state.handle_window_event(WindowEventKind::Restored),
            WindowAction::Ignore
        );
    }

    #[test]
    fn stopped_does_nothing() {
        let mut state = state();
        assert_eq!(
            state.handle_window_event(WindowEventKind::Close),
            WindowAction::Closed
        );
        // Closing doesn't stop by itself, that's up to the callback
        assert!(state.is_running());

        state.stop();
        assert!(!state.is_running());
        assert!(state.is_destroyed());
        assert_eq!(state.poll(100), Tick::default());
    }
}
