//! Window configuration.

use serde::Deserialize;

use crate::{
    canvas::ScalingQuality,
    error::{Error, Result},
};

/// Where the window is placed when it's opened.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPosition {
    /// Let the window manager decide.
    #[default]
    Undefined,
    /// Center of the primary display.
    Centered,
    /// Let the window manager decide, but on the display with this index.
    UndefinedOn(u32),
    /// Center of the display with this index.
    CenteredOn(u32),
    /// Exact position of the top-left corner in physical pixels.
    At {
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
    },
}

/// Initial window configuration passed to [`crate::Game::run`].
///
/// There's three ways to initialize the config:
///
/// # Example
///
/// ```
/// # use spritewin::Config;
/// Config {
///   title: "My Game".to_owned(),
///   ..Default::default()
/// };
/// ```
///
/// # Example
///
/// ```
/// # use spritewin::Config;
/// Config::default()
///   .with_title("My Game")
///   .with_window_size(768, 588)
///   .with_texture_size(256, 196);
/// ```
///
/// # Example
///
/// ```
/// # use spritewin::Config;
/// let config = Config::from_toml_str(r#"
///   title = "My Game"
///   window_width = 768
///   window_height = 588
///   texture_width = 256
///   texture_height = 196
///   update_rate = 10
/// "#)?;
///
/// assert_eq!(config.texture_size(), (256, 196));
/// # Ok::<(), spritewin::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name in the title bar.
    ///
    /// Defaults to `"Sprite Window"`.
    pub title: String,
    /// Where the window is opened.
    ///
    /// Defaults to [`WindowPosition::Undefined`].
    pub position: WindowPosition,
    /// Width of the window in pixels.
    ///
    /// Defaults to `640`.
    pub window_width: u32,
    /// Height of the window in pixels.
    ///
    /// Defaults to `480`.
    pub window_height: u32,
    /// Width of the background canvas texture, stretched over the window.
    ///
    /// Defaults to the window width.
    pub texture_width: Option<u32>,
    /// Height of the background canvas texture, stretched over the window.
    ///
    /// Defaults to the window height.
    pub texture_height: Option<u32>,
    /// Filtering used when stretching the background canvas over the window.
    ///
    /// Defaults to [`ScalingQuality::Nearest`].
    pub scaling_quality: ScalingQuality,
    /// Milliseconds between draw ticks, `0` draws continuously.
    ///
    /// Defaults to `0`.
    pub draw_rate: u64,
    /// Milliseconds between update ticks, `0` updates continuously.
    ///
    /// Defaults to `0`.
    pub update_rate: u64,
    /// Wait for the display refresh when presenting.
    ///
    /// Defaults to `true`.
    pub vsync: bool,
}

impl Config {
    /// Parse a configuration from TOML, missing fields get their default value.
    ///
    /// # Errors
    ///
    /// - When the TOML is invalid or contains unknown fields.
    /// - When a dimension is zero.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;

        Ok(config)
    }

    /// Check that all dimensions are greater than zero.
    ///
    /// # Errors
    ///
    /// - When a window or texture dimension is zero.
    pub fn validate(&self) -> Result<()> {
        let (texture_width, texture_height) = self.texture_size();

        Error::check_dimension("Width", i64::from(self.window_width))?;
        Error::check_dimension("Height", i64::from(self.window_height))?;
        Error::check_dimension("Width", i64::from(texture_width))?;
        Error::check_dimension("Height", i64::from(texture_height))?;

        Ok(())
    }

    /// Size of the background canvas texture, falls back to the window size.
    #[inline]
    #[must_use]
    pub fn texture_size(&self) -> (u32, u32) {
        (
            self.texture_width.unwrap_or(self.window_width),
            self.texture_height.unwrap_or(self.window_height),
        )
    }

    /// Set the name in the title bar.
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();

        self
    }

    /// Set where the window is opened.
    #[inline]
    #[must_use]
    pub fn with_position(mut self, position: WindowPosition) -> Self {
        self.position = position;

        self
    }

    /// Set the size of the window in pixels.
    #[inline]
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;

        self
    }

    /// Set the size of the background canvas texture.
    #[inline]
    #[must_use]
    pub fn with_texture_size(mut self, width: u32, height: u32) -> Self {
        self.texture_width = Some(width);
        self.texture_height = Some(height);

        self
    }

    /// Set the filtering used when stretching the background over the window.
    #[inline]
    #[must_use]
    pub fn with_scaling_quality(mut self, scaling_quality: ScalingQuality) -> Self {
        self.scaling_quality = scaling_quality;

        self
    }

    /// Set the milliseconds between draw ticks, `0` draws continuously.
    #[inline]
    #[must_use]
    pub fn with_draw_rate(mut self, draw_rate: u64) -> Self {
        self.draw_rate = draw_rate;

        self
    }

    /// Set the milliseconds between update ticks, `0` updates continuously.
    #[inline]
    #[must_use]
    pub fn with_update_rate(mut self, update_rate: u64) -> Self {
        self.update_rate = update_rate;

        self
    }

    /// Set the same milliseconds between draw and update ticks.
    #[inline]
    #[must_use]
    pub fn with_rate(self, rate: u64) -> Self {
        self.with_draw_rate(rate).with_update_rate(rate)
    }

    /// Set whether to wait for the display refresh when presenting.
    #[inline]
    #[must_use]
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;

        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Sprite Window".to_owned(),
            position: WindowPosition::default(),
            window_width: 640,
            window_height: 480,
            texture_width: None,
            texture_height: None,
            scaling_quality: ScalingQuality::default(),
            draw_rate: 0,
            update_rate: 0,
            vsync: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, WindowPosition};
    use crate::{canvas::ScalingQuality, error::Error};

    #[test]
    fn texture_size_falls_back_to_window() {
        let config = Config::default().with_window_size(300, 200);
        assert_eq!(config.texture_size(), (300, 200));

        let config = config.with_texture_size(100, 50);
        assert_eq!(config.texture_size(), (100, 50));
    }

    #[test]
    fn parse_toml() {
        let config = Config::from_toml_str(
            r#"
            title = "Sprites Test"
            position = { centered_on = 1 }
            window_width = 512
            window_height = 392
            texture_width = 256
            texture_height = 196
            scaling_quality = "linear"
            draw_rate = 16
            "#,
        )
        .unwrap();

        assert_eq!(config.title, "Sprites Test");
        assert_eq!(config.position, WindowPosition::CenteredOn(1));
        assert_eq!(config.scaling_quality, ScalingQuality::Linear);
        assert_eq!(config.draw_rate, 16);
        assert_eq!(config.update_rate, 0);
        assert!(config.vsync);
    }

    #[test]
    fn parse_exact_position() {
        let config = Config::from_toml_str("position = { at = { x = 10, y = -20 } }").unwrap();
        assert_eq!(config.position, WindowPosition::At { x: 10, y: -20 });

        let config = Config::from_toml_str(r#"position = "centered""#).unwrap();
        assert_eq!(config.position, WindowPosition::Centered);
    }

    #[test]
    fn rejects_invalid() {
        assert!(matches!(
            Config::from_toml_str("window_width = 0"),
            Err(Error::InvalidDimension { what: "Width", .. })
        ));
        assert!(matches!(
            Config::from_toml_str("texture_height = 0"),
            Err(Error::InvalidDimension { what: "Height", .. })
        ));
        assert!(matches!(
            Config::from_toml_str("unknown_field = true"),
            Err(Error::Config(..))
        ));
    }
}
