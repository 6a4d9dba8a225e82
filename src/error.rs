/// Misuse reported by the strict (`try_*`) driver operations
///
/// The default operations never return these; they silently ignore the
/// request instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The driver was initialized without a pixel buffer
    NotBuffered,
    /// Index is past the end of the pixel buffer
    IndexOutOfRange { index: usize, count: usize },
    /// Requested pixel count does not fit the buffer capacity
    CapacityExceeded { requested: usize, capacity: usize },
    /// Pin does not exist on the output port
    InvalidPin(u8),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::NotBuffered => write!(f, "Pixel buffer is not allocated"),
            Error::IndexOutOfRange { index, count } => {
                write!(f, "Pixel index {index} out of range (count {count})")
            }
            Error::CapacityExceeded {
                requested,
                capacity,
            } => write!(f, "{requested} pixels exceed buffer capacity {capacity}"),
            Error::InvalidPin(pin) => write!(f, "Pin {pin} is not on the output port"),
        }
    }
}

impl core::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
