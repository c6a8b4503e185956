//! User-facing context passed to every [`crate::Game`] callback.

use std::{cell::RefCell, rc::Rc, sync::Arc};

use miette::Result;
use web_time::Instant;
use winit::{keyboard::KeyCode, window::Window};

use crate::{
    canvas::Canvas,
    config::Config,
    graphics::Graphics,
    sprite::{Sprite, SpriteId, SpriteList},
    state::WindowState,
};

/// Context containing all functionality for interfacing with the window.
///
/// [`Context`] is cheap to clone due to being a `Rc<RefCell<..>>` under the hood.
///
/// # Panics
///
/// Every method borrows the inner state, calling a method on the context from within a closure passed to
/// [`Context::with_background`], [`Context::with_sprite`] or [`Context::with_sprites`] panics.
#[derive(Clone)]
pub struct Context {
    /// Implementation of all non-primitive parts.
    inner: Rc<RefCell<ContextInner>>,
}

impl Context {
    /// Size of the window in physical pixels.
    #[inline]
    #[must_use]
    pub fn window_size(&self) -> (u32, u32) {
        self.read(|ctx| {
            let size = ctx.window.inner_size();

            (size.width, size.height)
        })
    }

    /// Size of the background canvas in pixels, which is stretched over the window.
    ///
    /// Sprite positions and sizes are in this coordinate space, not in window pixels.
    /// Sprites therefore scale together with the background when the window is resized.
    #[inline]
    #[must_use]
    pub fn texture_size(&self) -> (u32, u32) {
        self.read(|ctx| ctx.texture_size)
    }

    /// Change the name in the title bar.
    #[inline]
    pub fn set_title(&self, title: impl Into<String>) {
        self.write(|ctx| {
            ctx.title = title.into();
            ctx.window.set_title(&ctx.title);
        });
    }

    /// Current name in the title bar.
    #[inline]
    #[must_use]
    pub fn title(&self) -> String {
        self.read(|ctx| ctx.title.clone())
    }

    /// Stop the loop, this will close the window and return from [`crate::Game::run`].
    ///
    /// The rest of the current callback will still be executed, after that no callback is called anymore.
    ///
    /// # Example
    ///
    /// ```
    /// use spritewin::{Context, KeyCode};
    ///
    /// # struct Empty; impl spritewin::Game for Empty {
    /// # fn load(&mut self, ctx: Context) {}
    /// # fn draw(&mut self, ctx: Context) {}
    /// fn update(&mut self, ctx: Context) {
    ///   // Stop when 'Escape' is pressed
    ///   if ctx.key_pressed(KeyCode::Escape) {
    ///     ctx.stop();
    ///   }
    /// }
    /// # }
    /// ```
    #[inline]
    pub fn stop(&self) {
        self.write(|ctx| ctx.state.stop());
    }

    /// Whether the loop is still running.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.read(|ctx| ctx.state.is_running())
    }

    /// Whether the window has been stopped.
    #[inline]
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.read(|ctx| ctx.state.is_destroyed())
    }

    /// Whether the window is minimized, no draw ticks happen while it is.
    #[inline]
    #[must_use]
    pub fn is_minimized(&self) -> bool {
        self.read(|ctx| ctx.state.is_minimized())
    }

    /// Milliseconds since the window was created.
    #[inline]
    #[must_use]
    pub fn ticks_elapsed(&self) -> u64 {
        self.read(ContextInner::ticks_elapsed)
    }

    /// Milliseconds between draw ticks, `0` draws continuously.
    #[inline]
    #[must_use]
    pub fn draw_rate(&self) -> u64 {
        self.read(|ctx| ctx.state.scheduler.draw_rate())
    }

    /// Set the milliseconds between draw ticks, `0` draws continuously.
    #[inline]
    pub fn set_draw_rate(&self, draw_rate: u64) {
        self.write(|ctx| ctx.state.scheduler.set_draw_rate(draw_rate));
    }

    /// Milliseconds between update ticks, `0` updates continuously.
    #[inline]
    #[must_use]
    pub fn update_rate(&self) -> u64 {
        self.read(|ctx| ctx.state.scheduler.update_rate())
    }

    /// Set the milliseconds between update ticks, `0` updates continuously.
    #[inline]
    pub fn set_update_rate(&self, update_rate: u64) {
        self.write(|ctx| ctx.state.scheduler.set_update_rate(update_rate));
    }

    /// Draw on the next poll of the loop, regardless of the draw rate.
    #[inline]
    pub fn request_draw(&self) {
        self.write(|ctx| ctx.state.scheduler.request_draw());
    }

    /// Read or change the background canvas.
    ///
    /// # Example
    ///
    /// ```
    /// use spritewin::{Color, Context};
    ///
    /// # struct Empty; impl spritewin::Game for Empty {
    /// # fn update(&mut self, ctx: Context) {}
    /// fn load(&mut self, ctx: Context) {
    ///   ctx.with_background(|canvas| canvas.fill(Color::rgb(0, 0, 64)));
    /// }
    /// # fn draw(&mut self, ctx: Context) {}
    /// # }
    /// ```
    #[inline]
    pub fn with_background<R>(&self, f: impl FnOnce(&mut Canvas) -> R) -> R {
        self.write(|ctx| f(&mut ctx.state.background))
    }

    /// Add a sprite that will be drawn on top of the background.
    #[inline]
    pub fn add_sprite(&self, sprite: Sprite) -> SpriteId {
        self.write(|ctx| ctx.state.sprites.add(sprite))
    }

    /// Remove a sprite, its GPU texture is released on the next draw.
    #[inline]
    pub fn remove_sprite(&self, id: SpriteId) -> Option<Sprite> {
        self.write(|ctx| ctx.state.sprites.remove(id))
    }

    /// Read or change a single sprite.
    ///
    /// Returns `None` when the sprite doesn't exist.
    #[inline]
    pub fn with_sprite<R>(&self, id: SpriteId, f: impl FnOnce(&mut Sprite) -> R) -> Option<R> {
        self.write(|ctx| ctx.state.sprites.get_mut(id).map(f))
    }

    /// Read or change all sprites.
    #[inline]
    pub fn with_sprites<R>(&self, f: impl FnOnce(&mut SpriteList) -> R) -> R {
        self.write(|ctx| f(&mut ctx.state.sprites))
    }

    /// Whether the key is held down.
    #[inline]
    #[must_use]
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.read(|ctx| ctx.state.input.key_held(key))
    }

    /// Whether the key went from released to pressed since the previous update tick.
    #[inline]
    #[must_use]
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.read(|ctx| ctx.state.input.key_pressed(key))
    }

    /// Whether the key went from pressed to released since the previous update tick.
    #[inline]
    #[must_use]
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.read(|ctx| ctx.state.input.key_released(key))
    }
}

/// Internal helper functions.
impl Context {
    /// Create the context with the GPU on the window.
    pub(crate) async fn new(config: &Config, window: Arc<Window>) -> Result<Self> {
        let texture_size = config.texture_size();
        let state = WindowState::new(config)?;
        let graphics = Graphics::new(window.clone(), texture_size, config.vsync).await?;

        let context_inner = ContextInner {
            state,
            window,
            graphics,
            start: Instant::now(),
            texture_size,
            title: config.title.clone(),
        };

        // Wrap in a reference counted refcell so it can be passed to the callbacks
        let inner = Rc::new(RefCell::new(context_inner));

        Ok(Self { inner })
    }

    /// Get a read-only reference to the inner struct.
    ///
    /// # Panics
    ///
    /// - When the inner struct is already mutably borrowed.
    #[inline]
    pub(crate) fn read<R>(&self, reader: impl FnOnce(&ContextInner) -> R) -> R {
        reader(&self.inner.borrow())
    }

    /// Get a mutable reference to the inner struct.
    ///
    /// # Panics
    ///
    /// - When the inner struct is already borrowed.
    #[inline]
    pub(crate) fn write<R>(&self, writer: impl FnOnce(&mut ContextInner) -> R) -> R {
        writer(&mut self.inner.borrow_mut())
    }
}

/// Internal wrapped implementation for [`Context`].
pub(crate) struct ContextInner {
    /// Lifecycle, canvases and input.
    pub(crate) state: WindowState,
    /// Window instance.
    pub(crate) window: Arc<Window>,
    /// Graphics state.
    pub(crate) graphics: Graphics,
    /// When the window was created.
    start: Instant,
    /// Logical size in pixels the background is stretched from.
    texture_size: (u32, u32),
    /// Name in the title bar.
    title: String,
}

impl ContextInner {
    /// Milliseconds since the window was created.
    pub(crate) fn ticks_elapsed(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Upload the changed canvases and present the background with all sprites.
    pub(crate) fn render(&mut self) -> Result<()> {
        let state = &mut self.state;

        self.graphics
            .render(&mut state.background, &mut state.sprites)
    }
}
