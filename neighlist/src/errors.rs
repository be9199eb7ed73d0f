#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Got an invalid argument value in a function: mismatched array lengths,
    /// out of range indexes, invalid cutoffs, ...
    InvalidArgument(String),
    /// The unit cell matrix is singular and can not be used to create
    /// periodic images
    DegenerateGeometry(String),
    /// Two distinct particles are on top of one another
    Collision {
        /// index of the first particle
        first: usize,
        /// index of the second particle
        second: usize,
        /// distance between the particles
        distance: f64,
    },
    /// The bin grid or the set of periodic images would be too large
    SizingOverflow(String),
    /// Error while serializing/deserializing options
    Json(serde_json::Error),
    /// Error while writing configurations to a file
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(e) => write!(f, "invalid argument: {}", e),
            Error::DegenerateGeometry(e) => write!(f, "degenerate geometry: {}", e),
            Error::Collision { first, second, distance } => write!(f,
                "collision of particles {} and {}: their distance is {}",
                first, second, distance
            ),
            Error::SizingOverflow(e) => write!(f, "sizing overflow: {}", e),
            Error::Json(e) => write!(f, "json error: {}", e),
            Error::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidArgument(_) |
            Error::DegenerateGeometry(_) |
            Error::Collision { .. } |
            Error::SizingOverflow(_) => None,
            Error::Json(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::Json(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Error {
        Error::Io(error)
    }
}
