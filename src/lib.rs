#![forbid(unsafe_code)]

//! AGPL licensed convenience layer for drawing pixel canvases and sprites in a window.
//!
//! # Features
//!
//! - Window creation with independent fixed-rate update and draw ticks.
//! - A background [`Canvas`] of pixels stretched over the whole window.
//! - [`Sprite`]s composited on top with a position, scale, rotation, flip, blend mode and scaling quality.
//! - Dirty tracking, only changed canvases are uploaded to the GPU.
//! - Window configuration from code or TOML.
//!
//! # Usage
//!
//! There is a single trait [`Game`] with three required functions, [`Game::load`], [`Game::update`] and [`Game::draw`], that need to be implemented for a state object.
//!
//! ```
//! use spritewin::{Config, Context, Game};
//!
//! struct MyGame;
//!
//! impl Game for MyGame {
//!     fn load(&mut self, ctx: Context) {
//!         // ..
//!     }
//!
//!     fn update(&mut self, ctx: Context) {
//!         // ..
//!     }
//!
//!     fn draw(&mut self, ctx: Context) {
//!         // ..
//!     }
//! }
//!
//! # fn try_main() -> miette::Result<()> {
//! // In main
//!
//! let game = MyGame;
//!
//! game.run(Config::default())
//! # }
//! ```
//!
//! # Example
//!
//! This example shows a window with a background that gets brighter every update tick.
//! A small sprite is moved with the arrow keys.
//! When the 'Escape' key is pressed the loop stops and the window closes.
//!
//! ```
//! use spritewin::{Color, Config, Context, Game, KeyCode, Point, Sprite, SpriteId};
//!
//! /// Object holding all state.
//! struct MyGame {
//!   /// Brightness of the background.
//!   brightness: u8,
//!   /// Sprite moved with the arrow keys.
//!   player: Option<SpriteId>,
//! }
//!
//! impl Game for MyGame {
//!   fn load(&mut self, ctx: Context) {
//!     let mut sprite = Sprite::new(8, 8).expect("Error creating sprite");
//!     sprite.fill(Color::WHITE);
//!
//!     self.player = Some(ctx.add_sprite(sprite));
//!   }
//!
//!   fn update(&mut self, ctx: Context) {
//!     self.brightness = self.brightness.wrapping_add(1);
//!
//!     if let Some(player) = self.player {
//!       let delta = Point::new(
//!         i32::from(ctx.key_held(KeyCode::ArrowRight)) - i32::from(ctx.key_held(KeyCode::ArrowLeft)),
//!         i32::from(ctx.key_held(KeyCode::ArrowDown)) - i32::from(ctx.key_held(KeyCode::ArrowUp)),
//!       );
//!       ctx.with_sprite(player, |sprite| sprite.move_by(delta));
//!     }
//!
//!     // Stop if 'Escape' is pressed
//!     if ctx.key_pressed(KeyCode::Escape) {
//!       ctx.stop();
//!     }
//!   }
//!
//!   fn draw(&mut self, ctx: Context) {
//!     let brightness = self.brightness;
//!     ctx.with_background(|canvas| canvas.fill(Color::rgb(brightness, brightness, brightness)));
//!   }
//! }
//!
//! # fn try_main() -> miette::Result<()> {
//! // In main
//!
//! // Initialize the state
//! let game = MyGame { brightness: 0, player: None };
//!
//! // Run until stop is requested
//! game.run(
//!   Config::default()
//!     .with_title("My Game")
//!     .with_texture_size(160, 120)
//!     .with_draw_rate(16)
//!     .with_update_rate(10),
//! )
//! # }
//! ```

pub mod canvas;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
mod graphics;
mod input;
pub mod math;
pub mod resources;
pub mod sprite;
mod state;
pub mod timing;
mod window;

pub use canvas::{BlendMode, Canvas, ScalingQuality};
pub use color::Color;
pub use config::{Config, WindowPosition};
pub use context::Context;
pub use error::{Error, Result};
pub use event::{ButtonState, KeyboardEvent};
pub use glam::Vec2;
pub use math::{Point, Rectangle};
pub use resources::ResourceManager;
pub use sprite::{Flip, Sprite, SpriteId, SpriteList};
pub use winit::keyboard::KeyCode;

use miette::{IntoDiagnostic, WrapErr};
use winit::event_loop::{ControlFlow, EventLoop};

/// Main entrypoint containing the state for running the window.
///
/// This is the main interface with the library.
///
/// See [`Context`] for all functions interfacing with the window from the callbacks.
pub trait Game: Sized
where
    Self: 'static,
{
    /// Called once after the window and the GPU are set up, before the window is shown.
    ///
    /// Must be used for creating the sprites and drawing the initial background.
    /// Sprites are placed in background pixels, see [`Context::texture_size`].
    ///
    /// # Arguments
    ///
    /// * `ctx` - Window context, used to obtain information and mutate the canvases.
    fn load(&mut self, ctx: Context);

    /// A single update tick in the loop.
    ///
    /// Runs every [`Config::update_rate`] milliseconds, independent from the draw tick.
    /// Keeps running while the window is minimized.
    ///
    /// Must be used for updating the state and handling held keys.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Window context, used to obtain information and mutate the canvases.
    ///
    /// # Example
    ///
    /// ```
    /// use spritewin::{Context, Game, KeyCode};
    ///
    /// struct MyGame;
    ///
    /// impl Game for MyGame {
    ///     fn load(&mut self, ctx: Context) {}
    ///
    ///     fn update(&mut self, ctx: Context) {
    ///         // Stop and close the window when 'Escape' is pressed
    ///         if ctx.key_pressed(KeyCode::Escape) {
    ///             ctx.stop();
    ///         }
    ///     }
    ///
    ///     fn draw(&mut self, ctx: Context) {
    ///         // ..
    ///     }
    /// }
    /// ```
    fn update(&mut self, ctx: Context);

    /// A single draw tick in the loop.
    ///
    /// Runs every [`Config::draw_rate`] milliseconds, independent from the update tick.
    /// Skipped while the window is minimized.
    ///
    /// Changes made to the background and the sprites are uploaded and shown right after this returns.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Window context, used to obtain information and mutate the canvases.
    fn draw(&mut self, ctx: Context);

    /// A key went down.
    ///
    /// Called as soon as the event arrives, OS key repeats are reported with [`KeyboardEvent::repeat`].
    #[inline(always)]
    #[allow(unused_variables)]
    fn key_pressed(&mut self, ctx: Context, event: KeyboardEvent) {}

    /// A key went up.
    #[inline(always)]
    #[allow(unused_variables)]
    fn key_released(&mut self, ctx: Context, event: KeyboardEvent) {}

    /// The close button of the window was clicked.
    ///
    /// Stops the loop by default.
    #[inline(always)]
    fn closed(&mut self, ctx: Context) {
        ctx.stop();
    }

    /// The window was minimized, draw ticks stop until it's restored.
    #[inline(always)]
    #[allow(unused_variables)]
    fn minimized(&mut self, ctx: Context) {}

    /// The window was restored after being minimized.
    #[inline(always)]
    #[allow(unused_variables)]
    fn restored(&mut self, ctx: Context) {}

    /// Open the window and run the loop until [`Context::stop`] is called.
    ///
    /// <div class="warning">
    ///
    /// Don't implement/override this method.
    ///
    /// </div>
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the window, can be used to set the size, the title and the tick rates.
    ///
    /// # Errors
    ///
    /// - When the configuration contains a zero dimension.
    /// - When a window could not be opened.
    /// - If no GPU could be found or accessed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use spritewin::{Config, Context, Game};
    ///
    /// struct MyGame;
    ///
    /// impl Game for MyGame {
    ///     fn load(&mut self, ctx: Context) {}
    ///
    ///     fn update(&mut self, ctx: Context) {}
    ///
    ///     fn draw(&mut self, ctx: Context) {}
    /// }
    ///
    /// # fn main() -> miette::Result<()> {
    /// // In main
    /// let game = MyGame;
    ///
    /// game.run(Config::default().with_title("My Game"))
    /// # }
    /// ```
    #[inline(always)]
    fn run(self, config: Config) -> miette::Result<()> {
        // Enable environment logger, ignore when the user already set up a logger
        let _ = env_logger::try_init();

        config.validate()?;

        // Create a polling event loop, the control flow is adjusted to the tick rates
        let event_loop = EventLoop::new()
            .into_diagnostic()
            .wrap_err("Error creating event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = window::State::new(self, config);

        event_loop
            .run_app(&mut state)
            .into_diagnostic()
            .wrap_err("Error running event loop")?;

        state.into_result()
    }
}
