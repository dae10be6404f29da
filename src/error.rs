/// [Result] alias for return types of the crate API
pub type Result<T> = std::result::Result<T, Error>;

/// Error enum type
#[derive(Debug)]
pub enum Error {
    /// A mission is already running. Only one mission can execute at a time, the running one
    /// must complete or be aborted before a new one can be started.
    AlreadyInProgress,
    /// No aircraft/gimbal or camera handle is installed on the [Drone](crate::Drone) object.
    NotConnected,
    /// A rotation command failed twice in a row at the same pose, the mission was aborted.
    ActuatorFailure(String),
    /// A photo capture command failed twice in a row at the same pose, the mission was aborted.
    CaptureFailure(String),
    /// Invalid argument. The String contains the reason.
    InvalidArgument(String),
    /// Error with the async runtime or internal channels. The String contains the reason.
    SystemError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::AlreadyInProgress => write!(f, "A mission is already in progress"),
            Error::NotConnected => write!(f, "No aircraft, gimbal or camera connected"),
            Error::ActuatorFailure(reason) => write!(f, "Rotation failed: {}", reason),
            Error::CaptureFailure(reason) => write!(f, "Photo capture failed: {}", reason),
            Error::InvalidArgument(reason) => write!(f, "Invalid argument: {}", reason),
            Error::SystemError(reason) => write!(f, "System error: {}", reason),
        }
    }
}

impl std::error::Error for Error {}

impl<T> From<flume::SendError<T>> for Error {
    fn from(_: flume::SendError<T>) -> Self {
        Error::SystemError("internal channel closed".to_owned())
    }
}
