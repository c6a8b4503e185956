//! Animated background pixels with rotating and flipping sprites on top.
//!
//! 'Space' toggles the flipping, 'Tab' hides the shadow and 'Escape' quits.

use spritewin::{
    BlendMode, Color, Config, Context, Flip, Game, KeyCode, Point, ScalingQuality, Sprite, SpriteId,
    Vec2,
};

/// Size of the background canvas.
const WIDTH: u32 = 160;
const HEIGHT: u32 = 120;

/// State of the demo.
#[derive(Default)]
struct CanvasDemo {
    /// Sprite rotating clockwise.
    spinner: Option<SpriteId>,
    /// Darkening sprite drawn below the spinner.
    shadow: Option<SpriteId>,
    /// Whether the spinner is mirrored.
    flipped: bool,
}

impl Game for CanvasDemo {
    fn load(&mut self, ctx: Context) {
        let (width, height) = ctx.texture_size();
        let center = Point::new(width as i32 / 2 - 16, height as i32 / 2 - 16);

        let Ok(mut spinner) = Sprite::new(32, 32) else {
            ctx.stop();

            return;
        };
        // Arrow pointing right so the rotation and the flipping are visible
        for y in 0..32_i32 {
            for x in 0..32_i32 {
                let inside =
                    (x < 20 && (12..20).contains(&y)) || (x >= 20 && (y - 16).abs() < 32 - x);
                if inside {
                    spinner.set_pixel(x, y, Color::rgb(255, 200, 64));
                }
            }
        }
        spinner.position = center;
        spinner.z_order = 1;

        let Ok(mut shadow) = Sprite::new(4, 4) else {
            ctx.stop();

            return;
        };
        shadow.fill(Color::rgb(96, 96, 96));
        shadow.set_blend_mode(BlendMode::Modulate);
        shadow.set_scaling_quality(ScalingQuality::Linear);
        shadow.scale = Vec2::splat(10.0);
        shadow.position = center + Point::new(-2, 4);

        self.spinner = Some(ctx.add_sprite(spinner));
        self.shadow = Some(ctx.add_sprite(shadow));
    }

    fn update(&mut self, ctx: Context) {
        if ctx.key_pressed(KeyCode::Escape) {
            ctx.stop();
        }

        if ctx.key_pressed(KeyCode::Space) {
            self.flipped = !self.flipped;
        }

        if let Some(shadow) = self.shadow {
            if ctx.key_pressed(KeyCode::Tab) {
                ctx.with_sprite(shadow, |sprite| sprite.shown = !sprite.shown);
            }
        }

        if let Some(spinner) = self.spinner {
            let flip = if self.flipped { Flip::Horizontal } else { Flip::None };

            ctx.with_sprite(spinner, |sprite| {
                sprite.rotation = (sprite.rotation + 2.0) % 360.0;
                sprite.flip = flip;
            });
        }
    }

    fn draw(&mut self, ctx: Context) {
        let ticks = ctx.ticks_elapsed();
        let time = ticks as f32 / 1000.0;

        ctx.with_background(|canvas| {
            let width = canvas.width() as usize;

            for (index, pixel) in canvas.pixels_mut().iter_mut().enumerate() {
                let x = (index % width) as f32;
                let y = (index / width) as f32;

                let wave = ((x / 12.0 + time).sin() + (y / 9.0 - time * 1.3).cos()) * 0.25 + 0.5;
                *pixel = Color::rgb((wave * 64.0) as u8, (wave * 128.0) as u8, 96 + (wave * 96.0) as u8);
            }
        });

        ctx.set_title(format!("Canvas Demo ({}s)", ticks / 1000));
    }
}

fn main() -> miette::Result<()> {
    CanvasDemo::default().run(
        Config::default()
            .with_title("Canvas Demo")
            .with_window_size(WIDTH * 4, HEIGHT * 4)
            .with_texture_size(WIDTH, HEIGHT)
            .with_draw_rate(33)
            .with_update_rate(16),
    )
}
