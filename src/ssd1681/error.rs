//! Errors reported by the driver
//!
//! Transport failures after initialisation are not errors: the controller
//! gives no acknowledgement, so a failed byte is logged and the sequence
//! carries on. Only configuration problems and calls that cannot touch the
//! panel come back as [`Error`].

pub use display_interface::DisplayError;

/// Driver error
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Panel geometry is zero or larger than the controller supports
    #[error("unsupported panel geometry {width}x{height}")]
    InvalidGeometry {
        /// requested width in pixels
        width: u16,
        /// requested height in pixels
        height: u16,
    },
    /// A timing value is zero
    #[error("timing value `{0}` must be non-zero")]
    InvalidTiming(&'static str),
    /// The transport could not bring the controller out of reset
    #[error("transport not ready: {0:?}")]
    Transport(DisplayError),
    /// Bitmap byte slice is shorter than its declared geometry
    #[error("bitmap holds {actual} bytes, {expected} required")]
    SourceTooSmall {
        /// bytes needed for the declared width and height
        expected: usize,
        /// bytes supplied
        actual: usize,
    },
    /// Region lies outside the frame buffer
    #[error("region is outside the frame buffer")]
    OutOfBounds,
    /// The last initialisation attempt failed
    #[error("display is not initialized")]
    NotInitialized,
    /// The panel is in deep sleep; call `reinit` first
    #[error("display is hibernating")]
    Hibernating,
}

// `DisplayError` derives only `Clone, Debug`; its variants carry no data, so
// comparing discriminants matches what a derived `PartialEq` would do.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Error::InvalidGeometry { width: w1, height: h1 },
                Error::InvalidGeometry { width: w2, height: h2 },
            ) => w1 == w2 && h1 == h2,
            (Error::InvalidTiming(a), Error::InvalidTiming(b)) => a == b,
            (Error::Transport(a), Error::Transport(b)) => {
                core::mem::discriminant(a) == core::mem::discriminant(b)
            }
            (
                Error::SourceTooSmall { expected: e1, actual: a1 },
                Error::SourceTooSmall { expected: e2, actual: a2 },
            ) => e1 == e2 && a1 == a2,
            (Error::OutOfBounds, Error::OutOfBounds)
            | (Error::NotInitialized, Error::NotInitialized)
            | (Error::Hibernating, Error::Hibernating) => true,
            _ => false,
        }
    }
}

impl Eq for Error {}
