use thiserror::Error;

/// Errors surfaced while validating or processing a feed request.
///
/// Everything except `FeedUnavailable` and `Other` is a request rejection:
/// the request never starts processing and nothing is fetched or cached.
#[derive(Error, Debug)]
pub enum Error {
    /// A window specification does not match the active mode's grammar.
    #[error("malformed schedule specification '{0}'")]
    MalformedScheduleSpec(String),

    /// The timezone identifier is not a known IANA id.
    #[error("invalid timezone '{0}'")]
    InvalidTimezone(String),

    /// A negative item limit was supplied.
    #[error("invalid limit {0}: must be 0 or higher")]
    InvalidLimit(i64),

    /// The mode name is not one of Delay, Include or Exclude.
    #[error("invalid mode '{0}': must be 'Delay', 'Include' or 'Exclude'")]
    InvalidMode(String),

    /// A query field failed to parse as its expected type.
    #[error("invalid value '{value}' for parameter '{field}'")]
    InvalidParameter { field: &'static str, value: String },

    /// The upstream feed could not be fetched or parsed. Fatal for the
    /// current request; never retried at this layer.
    #[error("feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
