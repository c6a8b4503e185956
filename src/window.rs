//! Window creation and the event loop driving the [`Game`] callbacks.

use std::sync::Arc;

use miette::{IntoDiagnostic, Report, WrapErr};
use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::{Config, WindowPosition},
    context::{Context, ContextInner},
    event::{KeyboardEvent, WindowEventKind},
    state::WindowAction,
    Game,
};

/// State of setting up a window that can still be uninitialized.
///
/// All optional fields are tied to the window creation flow of winit.
pub(crate) struct State<G: Game> {
    /// Window context.
    ///
    /// `None` if the window still needs to be initialized.
    ctx: Option<Context>,
    /// User supplied game.
    game: G,
    /// User supplied configuration.
    config: Config,
    /// Fatal error that stopped the loop, returned from [`Game::run`].
    error: Option<Report>,
}

impl<G: Game> State<G> {
    /// Prepare the state, the window is created when the event loop resumes.
    pub(crate) const fn new(game: G, config: Config) -> Self {
        Self {
            ctx: None,
            game,
            config,
            error: None,
        }
    }

    /// Error that ended the loop, if any.
    pub(crate) fn into_result(self) -> miette::Result<()> {
        self.error.map_or(Ok(()), Err)
    }

    /// Stop the loop with an error.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Report) {
        log::error!("{err:?}");

        if let Some(ctx) = &self.ctx {
            ctx.stop();
        }
        self.error = Some(err);

        event_loop.exit();
    }

    /// Create the window hidden, setup the GPU, load the game and show the window.
    fn open(&mut self, event_loop: &ActiveEventLoop) -> miette::Result<Context> {
        log::debug!("Opening window '{}'", self.config.title);

        let mut window_attributes = WindowAttributes::default()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ))
            // Only show when the game is loaded
            .with_visible(false);
        if let WindowPosition::At { x, y } = self.config.position {
            window_attributes = window_attributes.with_position(PhysicalPosition::new(x, y));
        }

        // Spawn a new window using the event loop
        let window = event_loop
            .create_window(window_attributes)
            .into_diagnostic()
            .wrap_err("Error creating window")?;
        place_window(event_loop, &window, self.config.position);
        let window = Arc::new(window);

        // Because pollster returns the value we can set it immediately
        let ctx = pollster::block_on(Context::new(&self.config, window.clone()))?;

        // Call user passed load function
        {
            profiling::scope!("Load");

            self.game.load(ctx.clone());
        }

        window.set_visible(true);

        Ok(ctx)
    }

    /// Run the update and draw ticks that are due.
    fn tick(&mut self, ctx: &Context) -> miette::Result<()> {
        let tick = ctx.write(|ctx| {
            let now = ctx.ticks_elapsed();

            ctx.state.poll(now)
        });

        if tick.update {
            {
                profiling::scope!("Update");

                self.game.update(ctx.clone());
            }

            // Update the input so pressed and released events can be handled
            ctx.write(|ctx| ctx.state.input.update());
        }

        // The update tick could have stopped the window
        if tick.draw && ctx.read(|ctx| ctx.state.should_draw()) {
            {
                profiling::scope!("Draw");

                self.game.draw(ctx.clone());
            }

            ctx.write(ContextInner::render)?;

            profiling::finish_frame!();
        }

        Ok(())
    }

    /// Call the user callback belonging to a window state change.
    fn notify(&mut self, ctx: &Context, kind: WindowEventKind) {
        match ctx.write(|ctx| ctx.state.handle_window_event(kind)) {
            WindowAction::Closed => self.game.closed(ctx.clone()),
            WindowAction::Minimized => self.game.minimized(ctx.clone()),
            WindowAction::Restored => self.game.restored(ctx.clone()),
            WindowAction::Ignore => (),
        }
    }
}

impl<G: Game> ApplicationHandler for State<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Setup the window once
        if self.ctx.is_some() || self.error.is_some() {
            return;
        }

        match self.open(event_loop) {
            Ok(ctx) => self.ctx = Some(ctx),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Do nothing if the window is not set up yet
        let Some(ctx) = self.ctx.clone() else {
            return;
        };

        // Ignore everything after the window is stopped
        if !ctx.is_running() {
            event_loop.exit();

            return;
        }

        match &event {
            // Show the latest state as soon as possible
            WindowEvent::RedrawRequested => {
                ctx.write(|ctx| ctx.state.scheduler.request_draw());
            }
            WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => {
                // Resize the GPU surface
                ctx.write(|ctx| {
                    ctx.graphics.resize(size.width, size.height);
                    ctx.state.scheduler.request_draw();
                });
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let Some(event) = KeyboardEvent::from_winit(event) else {
                    return;
                };

                ctx.write(|ctx| ctx.state.handle_key(&event));

                if event.is_pressed() {
                    self.game.key_pressed(ctx.clone(), event);
                } else {
                    self.game.key_released(ctx.clone(), event);
                }
            }
            // Ignore the rest of the events
            _ => (),
        }

        if let Some(kind) = window_event_kind(&event) {
            self.notify(&ctx, kind);
        }

        if !ctx.is_running() {
            // Tell winit that we want to exit
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ctx) = self.ctx.clone() else {
            return;
        };

        if ctx.is_running() {
            if let Err(err) = self.tick(&ctx) {
                self.fail(event_loop, err);

                return;
            }
        }

        if !ctx.is_running() {
            // Tell winit that we want to exit
            event_loop.exit();

            return;
        }

        // Sleep until the next tick is due
        let sleep = ctx.read(|ctx| ctx.state.scheduler.sleep_duration(ctx.ticks_elapsed()));
        event_loop.set_control_flow(match sleep {
            Some(duration) => ControlFlow::WaitUntil(Instant::now() + duration),
            None => ControlFlow::Poll,
        });
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::debug!("Destroying window");

        // Dropping the context releases the GPU resources and closes the window
        self.ctx = None;
    }
}

/// Move the window to the display requested by the configuration.
fn place_window(event_loop: &ActiveEventLoop, window: &Window, position: WindowPosition) {
    let monitor = match position {
        // Already handled by the window manager or the window attributes
        WindowPosition::Undefined | WindowPosition::At { .. } => return,
        WindowPosition::Centered => event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next()),
        WindowPosition::UndefinedOn(display) | WindowPosition::CenteredOn(display) => {
            event_loop.available_monitors().nth(display as usize)
        }
    };

    let Some(monitor) = monitor else {
        log::warn!("Display for window position {position:?} not found, using the default");

        return;
    };

    let monitor_position = monitor.position();
    let monitor_size = monitor.size();
    let (x, y) = match position {
        WindowPosition::Centered | WindowPosition::CenteredOn(..) => {
            let window_size = window.outer_size();

            centered(
                (monitor_position.x, monitor_position.y),
                (monitor_size.width, monitor_size.height),
                (window_size.width, window_size.height),
            )
        }
        _ => (monitor_position.x, monitor_position.y),
    };

    window.set_outer_position(PhysicalPosition::new(x, y));
}

/// Top-left position that centers a window on a display.
fn centered(
    display_position: (i32, i32),
    display_size: (u32, u32),
    window_size: (u32, u32),
) -> (i32, i32) {
    let offset = |display: u32, window: u32| (i64::from(display) - i64::from(window)) / 2;

    (
        (i64::from(display_position.0) + offset(display_size.0, window_size.0)) as i32,
        (i64::from(display_position.1) + offset(display_size.1, window_size.1)) as i32,
    )
}

/// Map the winit events that change the window lifecycle.
///
/// A zero sized window or a fully hidden one counts as minimized.
fn window_event_kind(event: &WindowEvent) -> Option<WindowEventKind> {
    match event {
        WindowEvent::Resized(size) if size.width == 0 || size.height == 0 => {
            Some(WindowEventKind::Minimized)
        }
        WindowEvent::Resized(_) | WindowEvent::Occluded(false) => Some(WindowEventKind::Restored),
        WindowEvent::Occluded(true) => Some(WindowEventKind::Minimized),
        WindowEvent::CloseRequested => Some(WindowEventKind::Close),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use winit::{dpi::PhysicalSize, event::WindowEvent};

    use super::{centered, window_event_kind};
    use crate::event::WindowEventKind;

    #[test]
    fn lifecycle_events() {
        assert_eq!(
            window_event_kind(&WindowEvent::Resized(PhysicalSize::new(0, 600))),
            Some(WindowEventKind::Minimized)
        );
        assert_eq!(
            window_event_kind(&WindowEvent::Resized(PhysicalSize::new(800, 0))),
            Some(WindowEventKind::Minimized)
        );
        assert_eq!(
            window_event_kind(&WindowEvent::Resized(PhysicalSize::new(800, 600))),
            Some(WindowEventKind::Restored)
        );
        assert_eq!(
            window_event_kind(&WindowEvent::Occluded(true)),
            Some(WindowEventKind::Minimized)
        );
        assert_eq!(
            window_event_kind(&WindowEvent::Occluded(false)),
            Some(WindowEventKind::Restored)
        );
        assert_eq!(
            window_event_kind(&WindowEvent::CloseRequested),
            Some(WindowEventKind::Close)
        );
        assert_eq!(window_event_kind(&WindowEvent::Focused(true)), None);
        assert_eq!(window_event_kind(&WindowEvent::RedrawRequested), None);
    }

    #[test]
    fn center_on_display() {
        assert_eq!(centered((0, 0), (1920, 1080), (640, 480)), (640, 300));
        assert_eq!(centered((1920, 0), (1280, 1024), (640, 480)), (2240, 272));
    }

    #[test]
    fn center_larger_than_display() {
        assert_eq!(centered((0, 0), (800, 600), (1000, 700)), (-100, -50));
    }
}
