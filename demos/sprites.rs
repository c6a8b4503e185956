//! Two players moving over a large background, the visible section of the background follows them.
//!
//! Move the red player with WASD and the blue player with the arrow keys, 'Escape' quits.
//!
//! Pass a number as the first argument to change the window scale, defaults to `3`.

use spritewin::{
    BlendMode, ButtonState, Canvas, Color, Config, Context, Game, KeyCode, KeyboardEvent, Point,
    Rectangle, ScalingQuality, Sprite, SpriteId,
};

/// Size of the texture the background is stretched over.
const TEXTURE_WIDTH: u32 = 256;
const TEXTURE_HEIGHT: u32 = 196;

/// Width and height of the square background.
const BACKGROUND_SIZE: u32 = 1024;

/// Size of a single dash of the border.
const BORDER_LINE_SIZE: u32 = 7;
/// Distance of the border from the edge.
const BORDER_MARGIN: u32 = 4;

/// A colored sprite with a movement direction.
struct Player {
    /// Sprite in the window.
    id: SpriteId,
    /// Movement per update tick.
    delta: Point,
}

impl Player {
    /// Draw a colored ball with a darker outline and add it to the window.
    fn spawn(ctx: &Context, color: Color, setup: impl FnOnce(&mut Sprite)) -> miette::Result<Self> {
        const SIZE: i32 = 16;

        let mut sprite = Sprite::new(SIZE as u32, SIZE as u32)?;
        let outline = color.scale_rgb(0.5);
        let radius = SIZE / 2;
        for y in 0..SIZE {
            for x in 0..SIZE {
                let (dx, dy) = (x - radius, y - radius);
                let distance = dx * dx + dy * dy;

                if distance < (radius - 1) * (radius - 1) {
                    sprite.set_pixel(x, y, color);
                } else if distance < radius * radius {
                    sprite.set_pixel(x, y, outline);
                }
            }
        }
        setup(&mut sprite);

        Ok(Self {
            id: ctx.add_sprite(sprite),
            delta: Point::ZERO,
        })
    }

    /// Where the player is drawn on the background.
    fn destination(&self, ctx: &Context) -> Option<Rectangle> {
        ctx.with_sprite(self.id, |sprite| sprite.destination())
    }
}

/// Whether a key moves a player horizontally or vertically, and in which direction.
enum Axis {
    /// Left or right.
    X(i32),
    /// Up or down.
    Y(i32),
}

/// State of the demo.
#[derive(Default)]
struct Sprites {
    /// Red player moved with WASD.
    player1: Option<Player>,
    /// Blue player moved with the arrow keys.
    player2: Option<Player>,
}

impl Sprites {
    /// Player and direction for a key.
    fn player_for_key(&mut self, keycode: KeyCode) -> Option<(&mut Player, Axis)> {
        let (player, axis) = match keycode {
            KeyCode::KeyW => (&mut self.player1, Axis::Y(-1)),
            KeyCode::KeyS => (&mut self.player1, Axis::Y(1)),
            KeyCode::KeyA => (&mut self.player1, Axis::X(-1)),
            KeyCode::KeyD => (&mut self.player1, Axis::X(1)),
            KeyCode::ArrowUp => (&mut self.player2, Axis::Y(-1)),
            KeyCode::ArrowDown => (&mut self.player2, Axis::Y(1)),
            KeyCode::ArrowLeft => (&mut self.player2, Axis::X(-1)),
            KeyCode::ArrowRight => (&mut self.player2, Axis::X(1)),
            _ => return None,
        };

        player.as_mut().map(|player| (player, axis))
    }

    /// Start or stop moving a player.
    fn steer(&mut self, event: KeyboardEvent) {
        let pressed = event.state == ButtonState::Pressed;
        let Some((player, axis)) = self.player_for_key(event.keycode) else {
            return;
        };

        match axis {
            Axis::X(direction) => player.delta.x = if pressed { direction } else { 0 },
            Axis::Y(direction) => player.delta.y = if pressed { direction } else { 0 },
        }
    }
}

impl Game for Sprites {
    fn load(&mut self, ctx: Context) {
        ctx.with_background(|background| {
            if let Err(err) = background.resize(BACKGROUND_SIZE, BACKGROUND_SIZE) {
                log::error!("Error resizing background: {err}");
            }

            draw_background(background);
        });

        let player1 = Player::spawn(&ctx, Color::rgb(255, 64, 64), |sprite| {
            sprite.position = Point::new(24, 24);
            sprite.scale.x = 1.5;
            sprite.set_blend_mode(BlendMode::Additive);
        });
        let player2 = Player::spawn(&ctx, Color::rgb(64, 64, 255), |sprite| {
            sprite.position = Point::new(96, 24);
            sprite.scale.y = 2.0;
            sprite.set_scaling_quality(ScalingQuality::Linear);
        });

        match (player1, player2) {
            (Ok(player1), Ok(player2)) => {
                self.player1 = Some(player1);
                self.player2 = Some(player2);
            }
            (Err(err), _) | (_, Err(err)) => {
                log::error!("Error creating players: {err:?}");

                ctx.stop();
            }
        }
    }

    fn update(&mut self, ctx: Context) {
        let (Some(player1), Some(player2)) = (&self.player1, &self.player2) else {
            return;
        };

        for player in [player1, player2] {
            ctx.with_sprite(player.id, |sprite| sprite.move_by(player.delta));
        }

        let (Some(first), Some(second)) = (player1.destination(&ctx), player2.destination(&ctx))
        else {
            return;
        };

        // Show the part of the background surrounding both players
        let clipping = ctx.with_background(|background| {
            let clipping = follow(first, second, background.width(), background.height());
            background.set_clipping(clipping);

            clipping
        });

        ctx.set_title(format!(
            "({} {}), ({}, {}) / ({BACKGROUND_SIZE}, {BACKGROUND_SIZE})",
            clipping.position.x,
            clipping.bottom(),
            clipping.size.x,
            clipping.size.y,
        ));
    }

    fn draw(&mut self, _ctx: Context) {
        // Everything is drawn by moving the sprites and the clipping rectangle
    }

    fn key_pressed(&mut self, ctx: Context, event: KeyboardEvent) {
        if event.keycode == KeyCode::Escape {
            ctx.stop();

            return;
        }

        self.steer(event);
    }

    fn key_released(&mut self, _ctx: Context, event: KeyboardEvent) {
        self.steer(event);
    }
}

/// Section of the background around both players, extended by the size of each player and clamped to the background.
fn follow(first: Rectangle, second: Rectangle, width: u32, height: u32) -> Rectangle {
    let (left, right) = if first.position.x <= second.position.x {
        (first, second)
    } else {
        (second, first)
    };
    let (top, bottom) = if first.position.y <= second.position.y {
        (first, second)
    } else {
        (second, first)
    };

    let x1 = (left.position.x - left.size.x).max(0);
    let x2 = (right.position.x + right.size.x).min(width as i32);
    let y1 = (top.position.y - top.size.y).max(0);
    let y2 = (bottom.position.y + bottom.size.y).min(height as i32);

    Rectangle::new(x1, y1, x2 - x1, y2 - y1)
}

/// Colored diagonal strips, every other line darkened, with a dashed border.
fn draw_background(background: &mut Canvas) {
    let width = background.width();
    let height = background.height();

    // Strip long enough to shift it by a pixel for every line
    let strip = (0..width * 2)
        .map(|i| {
            let r = ((i % 511) as i32 - 255).unsigned_abs() / 2;
            let g = 80 / (r + 4) / 2;
            let b = 120.0 * ((f64::from(i) * std::f64::consts::PI / 128.0 + 256.0).sin() * 0.2 + 0.8);

            Color::rgb(r as u8, g as u8, b as u8)
        })
        .collect::<Vec<_>>();

    for y in 0..height {
        let offset = (y % width) as usize;
        let darken = y >= 2 && y % 2 == 0;

        for x in 0..width {
            let color = strip[offset + x as usize];
            let color = if darken { color.scale_rgb(0.8) } else { color };

            background.set_pixel(x as i32, y as i32, color);
        }
    }

    // Border around the edges, assumes the background is square
    let yellow = Color::rgb(255, 255, 0);
    for i in BORDER_MARGIN..width - BORDER_MARGIN {
        let dash = (i - BORDER_MARGIN) / BORDER_LINE_SIZE % 2 == 1;
        let (vertical, horizontal) = if dash {
            (Color::BLACK, yellow)
        } else {
            (yellow, Color::BLACK)
        };

        let (i, margin) = (i as i32, BORDER_MARGIN as i32);
        let far = width as i32 - 1 - margin;

        background.set_pixel(margin, i, vertical);
        background.set_pixel(far, i, vertical);
        background.set_pixel(i, margin, horizontal);
        background.set_pixel(i, height as i32 - 1 - margin, horizontal);
    }
}

fn main() -> miette::Result<()> {
    let scale = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u32>().ok())
        .unwrap_or(3)
        .max(1);

    Sprites::default().run(
        Config::default()
            .with_title("Sprites Test")
            .with_window_size(TEXTURE_WIDTH * scale, TEXTURE_HEIGHT * scale)
            .with_texture_size(TEXTURE_WIDTH, TEXTURE_HEIGHT)
            .with_draw_rate(16)
            .with_update_rate(10),
    )
}
