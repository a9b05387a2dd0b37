/// Errors the transform functions can throw.
#[derive(Copy, Clone, Hash, PartialEq, Eq)]
pub enum TransformError {
    /// A grid axis is shorter than the minimum of 2.
    InvalidDimension {
        /// Name of the offending axis.
        axis: &'static str,
        /// The rejected length.
        len: usize,
    },
    /// A packed real transform was requested on a grid with a
    /// non-power-of-two axis.
    UnsupportedAxisLength {
        /// The offending axis length.
        len: usize,
    },
    /// The supplied buffer is smaller than the layout requires.
    BufferSize {
        /// Minimum number of values the layout needs.
        required: usize,
        /// Number of values actually supplied.
        actual: usize,
    },
    /// A worker thread panicked during a transform pass.
    WorkerFailure,
    /// The worker thread pool could not be built.
    ThreadPoolBuild,
}

impl core::fmt::Display for TransformError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidDimension { axis, len } => {
                write!(f, "Axis '{axis}' has length {len}, but must be at least 2")
            }
            Self::UnsupportedAxisLength { len } => {
                write!(
                    f,
                    "Axis length {len} is not a power of two, which packed real transforms require"
                )
            }
            Self::BufferSize { required, actual } => {
                write!(
                    f,
                    "Buffer holds {actual} values, but the transform requires {required}"
                )
            }
            Self::WorkerFailure => "A worker thread panicked during a transform pass".fmt(f),
            Self::ThreadPoolBuild => "The worker thread pool could not be built".fmt(f),
        }
    }
}

impl core::fmt::Debug for TransformError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self, f)
    }
}

impl std::error::Error for TransformError {}
