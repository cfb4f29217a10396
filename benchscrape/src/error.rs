use thiserror::Error;

/// Everything that can go wrong between reading the laptop list and writing
/// the benchmark dataset.
#[derive(Debug, Error)]
pub enum Error {
    /// A model string did not carry the tokens a search query is built from.
    #[error("cannot derive a query from {model:?}: {reason}")]
    QueryDerivation { model: String, reason: &'static str },

    /// The request never got a response, even after retrying.
    #[error("fetching {url} failed after {attempts} attempt(s)")]
    Fetch {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered, but not with a success status.
    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// A page did not look the way the scraper expects it to.
    #[error("unexpected page structure in {context}: {reason}")]
    Parse { context: String, reason: String },

    /// One listing entry carried field counts that do not line up.
    #[error(
        "misaligned listing entry #{entry} in {quarry}: \
         {names} name(s), {platforms} platform label(s), {scores} score(s)"
    )]
    Alignment {
        quarry: String,
        entry: usize,
        names: usize,
        platforms: usize,
        scores: usize,
    },

    #[error("input is missing the {0:?} column")]
    MissingColumn(&'static str),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("could not build the HTTP client")]
    Client(#[source] reqwest::Error),
}

impl Error {
    pub(crate) fn parse<C: Into<String>, R: Into<String>>(context: C, reason: R) -> Self {
        Self::Parse {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Whether another attempt at the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Fetch { .. } => true,
            Self::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
