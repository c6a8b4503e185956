//! Canvases and sprites through the public API, without opening a window.

use png::{BitDepth, ColorType, Encoder};
use spritewin::{
    BlendMode, Canvas, Color, Error, Point, Rectangle, ResourceManager, Sprite, SpriteId,
    SpriteList, Vec2,
};

/// Encode raw 8 bit pixels as a PNG.
fn encode_png(width: u32, height: u32, color_type: ColorType, data: &[u8]) -> Vec<u8> {
    encode_png_with(width, height, color_type, BitDepth::Eight, data, |_| ())
}

/// Encode raw pixels as a PNG, allowing extra chunks to be set on the encoder.
fn encode_png_with(
    width: u32,
    height: u32,
    color_type: ColorType,
    bit_depth: BitDepth,
    data: &[u8],
    setup: impl FnOnce(&mut Encoder<'_, &mut Vec<u8>>),
) -> Vec<u8> {
    let mut bytes = Vec::new();

    {
        let mut encoder = Encoder::new(&mut bytes, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        setup(&mut encoder);

        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();
    }

    bytes
}

#[test]
fn png_rgba() {
    let bytes = encode_png(
        2,
        1,
        ColorType::Rgba,
        &[255, 0, 0, 255, 0, 255, 0, 128],
    );
    let canvas = Canvas::from_png(&bytes).unwrap();

    assert_eq!((canvas.width(), canvas.height()), (2, 1));
    assert_eq!(canvas.pixel(0, 0), Some(Color::new(255, 0, 0, 255)));
    assert_eq!(canvas.pixel(1, 0), Some(Color::new(0, 255, 0, 128)));
    assert!(canvas.is_dirty());
}

#[test]
fn png_indexed_with_transparency() {
    let bytes = encode_png_with(
        2,
        1,
        ColorType::Indexed,
        BitDepth::Eight,
        &[0, 1],
        |encoder| {
            encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
            encoder.set_trns(vec![255, 10]);
        },
    );
    let canvas = Canvas::from_png(&bytes).unwrap();

    assert_eq!(canvas.pixel(0, 0), Some(Color::new(255, 0, 0, 255)));
    assert_eq!(canvas.pixel(1, 0), Some(Color::new(0, 0, 255, 10)));
}

#[test]
fn png_16_bit_is_reduced() {
    // Big endian channels, only the high byte survives
    let bytes = encode_png_with(
        1,
        1,
        ColorType::Rgba,
        BitDepth::Sixteen,
        &[0x12, 0x34, 0xAB, 0xCD, 0x00, 0xFF, 0xFF, 0xFF],
        |_| (),
    );
    let canvas = Canvas::from_png(&bytes).unwrap();

    assert_eq!(canvas.pixel(0, 0), Some(Color::new(0x12, 0xAB, 0x00, 0xFF)));
}

#[test]
fn png_rgb_gets_opaque_alpha() {
    let bytes = encode_png(1, 2, ColorType::Rgb, &[1, 2, 3, 4, 5, 6]);
    let canvas = Canvas::from_png(&bytes).unwrap();

    assert_eq!(canvas.pixel(0, 0), Some(Color::new(1, 2, 3, 255)));
    assert_eq!(canvas.pixel(0, 1), Some(Color::new(4, 5, 6, 255)));
}

#[test]
fn png_grayscale() {
    let bytes = encode_png(2, 2, ColorType::Grayscale, &[0, 64, 128, 255]);
    let canvas = Canvas::from_png(&bytes).unwrap();

    assert_eq!(canvas.pixel(1, 0), Some(Color::new(64, 64, 64, 255)));
    assert_eq!(canvas.pixel(1, 1), Some(Color::WHITE));
}

#[test]
fn png_garbage() {
    assert!(matches!(
        Canvas::from_png(b"definitely not a png"),
        Err(Error::Png(..))
    ));
}

#[test]
fn background_clipping_follows_resize() {
    // Same flow as a window background that's enlarged after creation
    let mut background = Canvas::new(256, 196).unwrap();
    background.set_blend_mode(BlendMode::None);
    background.fill(Color::WHITE);

    background.resize(1024, 1024).unwrap();
    assert_eq!(background.clipping(), Rectangle::new(0, 0, 1024, 1024));
    assert_eq!(background.pixel(0, 0), Some(Color::TRANSPARENT));
    assert_eq!(background.blend_mode(), BlendMode::None);

    background.set_clipping(Rectangle::new(10, 20, 100, 50));
    assert_eq!(background.source_rect(), Rectangle::new(10, 20, 100, 50));

    // A custom clipping survives resizing
    background.resize(512, 512).unwrap();
    assert_eq!(background.clipping(), Rectangle::new(10, 20, 100, 50));

    // An empty clipping draws everything
    background.clipping_mut().size = Point::ZERO;
    assert_eq!(background.source_rect(), Rectangle::new(0, 0, 512, 512));
}

#[test]
fn sprites_draw_in_z_order() {
    let mut sprites = SpriteList::new();

    let mut back = Sprite::new(4, 4).unwrap();
    back.z_order = -1;
    let front = Sprite::new(4, 4).unwrap();
    let mut hidden = Sprite::new(4, 4).unwrap();
    hidden.shown = false;
    hidden.z_order = -10;

    let front = sprites.add(front);
    let hidden = sprites.add(hidden);
    let back = sprites.add(back);

    let order = sprites
        .draw_order()
        .iter()
        .map(|(id, _)| *id)
        .collect::<Vec<_>>();
    assert_eq!(order, vec![back, front]);
    assert!(sprites.contains(hidden));

    sprites.remove(back);
    assert!(!sprites.contains(back));
    assert_eq!(sprites.draw_order().len(), 1);
}

#[test]
fn sprite_transform() {
    let mut sprite = Sprite::new(16, 8).unwrap();
    sprite.position = Point::new(24, 24);
    sprite.scale = Vec2::new(1.5, 2.0);

    assert_eq!(sprite.destination(), Rectangle::new(24, 24, 24, 16));
    assert_eq!(sprite.pivot(), Vec2::new(12.0, 8.0));

    sprite.move_by(Point::new(-1, 1));
    assert_eq!(sprite.destination().position, Point::new(23, 25));

    // Clipping the sprite shrinks what's drawn
    sprite.set_clipping(Rectangle::new(0, 0, 8, 8));
    assert_eq!(sprite.destination().size, Point::new(12, 16));

    // Clipping past the canvas edge only keeps the overlapping part
    sprite.set_clipping(Rectangle::new(12, 4, 20, 20));
    assert_eq!(sprite.source_rect(), Rectangle::new(12, 4, 4, 4));
    assert_eq!(sprite.destination().size, Point::new(6, 8));

    // Clipping outside of the canvas draws nothing
    sprite.set_clipping(Rectangle::new(16, 0, 4, 4));
    assert!(sprite.destination().is_empty());
}

#[test]
fn textures_follow_sprites() {
    let mut sprites = SpriteList::new();
    let mut textures = ResourceManager::<SpriteId, String>::new();

    let ids = (0..3)
        .map(|_| sprites.add(Sprite::new(1, 1).unwrap()))
        .collect::<Vec<_>>();
    for id in &ids {
        textures.register(*id, format!("{id:?}"));
    }

    sprites.remove(ids[1]);
    assert_eq!(textures.retain_live(|id| sprites.contains(*id)), 1);
    assert!(textures.contains(&ids[0]));
    assert!(!textures.contains(&ids[1]));
    assert!(textures.contains(&ids[2]));
}
