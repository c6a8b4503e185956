//! Errors returned by the library surface.

use miette::Diagnostic;
use thiserror::Error;

/// Result type defaulting to the crate [`enum@Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong when building canvases, sprites or configurations.
#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum Error {
    /// A width or height was zero or negative.
    #[error("{what} must be greater than 0, got {value}")]
    #[diagnostic(code(spritewin::invalid_dimension))]
    InvalidDimension {
        /// Which dimension was rejected, `"Width"` or `"Height"`.
        what: &'static str,
        /// Rejected value.
        value: i64,
    },
    /// PNG bytes could not be decoded.
    #[error("Error decoding PNG image")]
    #[diagnostic(code(spritewin::png))]
    Png(#[from] png::DecodingError),
    /// PNG is decoded but can't be represented as 8 bit color.
    #[error("PNG image has an unsupported color format {color_type:?} with bit depth {bit_depth:?}")]
    #[diagnostic(
        code(spritewin::png_format),
        help("Re-export the image as an 8 bit RGBA PNG")
    )]
    UnsupportedPng {
        /// Color type after normalization.
        color_type: png::ColorType,
        /// Bit depth after normalization.
        bit_depth: png::BitDepth,
    },
    /// TOML configuration could not be parsed.
    #[error("Error parsing window configuration")]
    #[diagnostic(code(spritewin::config))]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// Reject dimensions that are not strictly positive.
    pub(crate) fn check_dimension(what: &'static str, value: i64) -> Result<()> {
        if value <= 0 {
            return Err(Self::InvalidDimension { what, value });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn dimension_check() {
        assert!(Error::check_dimension("Width", 1).is_ok());
        assert!(matches!(
            Error::check_dimension("Height", 0),
            Err(Error::InvalidDimension {
                what: "Height",
                value: 0
            })
        ));
        assert_eq!(
            Error::check_dimension("Width", -3).unwrap_err().to_string(),
            "Width must be greater than 0, got -3"
        );
    }
}
