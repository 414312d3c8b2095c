use std::{error::Error, fmt, sync::Arc};

#[derive(Debug, Clone)]
pub enum StreamError {
    Aborted(Option<String>),
    Closing,
    Closed,
    /// The stream already has an active reader or writer.
    Locked,
    /// A pipe found its destination closing or closed before the source finished.
    DestinationClosed,
    TaskDropped,
    Other(Arc<dyn Error + Send + Sync>),
}

impl StreamError {
    /// Wrap any error type into `StreamError`
    pub fn other<E>(e: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        StreamError::Other(Arc::new(e))
    }

    /// Wrap a boxed error
    pub fn other_boxed(e: Box<dyn Error + Send + Sync>) -> Self {
        StreamError::Other(e.into())
    }
}

impl From<&str> for StreamError {
    fn from(s: &str) -> Self {
        #[derive(Debug)]
        struct SimpleError(String);
        impl fmt::Display for SimpleError {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
        impl Error for SimpleError {}
        StreamError::Other(Arc::new(SimpleError(s.to_string())))
    }
}

impl From<String> for StreamError {
    fn from(s: String) -> Self {
        StreamError::from(s.as_str())
    }
}

impl From<std::io::Error> for StreamError {
    fn from(e: std::io::Error) -> Self {
        StreamError::Other(Arc::new(e))
    }
}

impl From<Box<dyn Error + Send + Sync>> for StreamError {
    fn from(e: Box<dyn Error + Send + Sync>) -> Self {
        StreamError::Other(e.into())
    }
}

/// Adds direct `From` implementations for user error types so sources and sinks
/// can use `?` without `.map_err(StreamError::other)`.
///
/// # Example
/// ```rust
/// use streams_pipe::{impl_stream_error_from, StreamError};
///
/// #[derive(Debug)]
/// struct DecodeError;
/// impl std::fmt::Display for DecodeError {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "decode failed")
///     }
/// }
/// impl std::error::Error for DecodeError {}
///
/// impl_stream_error_from!(DecodeError);
///
/// fn parse() -> Result<u32, DecodeError> {
///     Err(DecodeError)
/// }
///
/// fn decode() -> Result<u32, StreamError> {
///     let value = parse()?;
///     Ok(value)
/// }
/// assert!(decode().is_err());
/// ```
#[macro_export]
macro_rules! impl_stream_error_from {
    ($($error_type:ty),* $(,)?) => {
        $(
            impl From<$error_type> for $crate::StreamError {
                fn from(e: $error_type) -> Self {
                    $crate::StreamError::Other(std::sync::Arc::new(e))
                }
            }
        )*
    };
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Aborted(Some(reason)) => write!(f, "Stream was aborted: {}", reason),
            StreamError::Aborted(None) => write!(f, "Stream was aborted"),
            StreamError::Closing => write!(f, "Stream is closing"),
            StreamError::Closed => write!(f, "Stream is closed"),
            StreamError::Locked => write!(f, "Stream is already locked"),
            StreamError::DestinationClosed => write!(
                f,
                "the destination writable stream closed before all data could be piped to it"
            ),
            StreamError::TaskDropped => write!(f, "Stream task was dropped"),
            StreamError::Other(err) => write!(f, "{}", err),
        }
    }
}

impl Error for StreamError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StreamError::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
