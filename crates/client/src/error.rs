/// Failures the console can see when talking to the backend. Validation
/// failures are not represented here; they are caught before any request
/// is built (see `editor`).
#[derive(Debug)]
pub enum ApiError {
    /// No bearer token available; no request was attempted.
    NotAuthenticated,
    /// The server refused the credential (401/403): expired or invalid.
    Unauthorized,
    /// The server answered with a non-success status and, where it supplied
    /// one, a structured message worth showing the operator verbatim.
    Rejected { status: u16, message: String },
    /// No usable response at all: DNS, refused connection, timeout.
    Transport(String),
    /// A success response whose body did not parse as expected.
    Decode(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => {
                write!(f, "not logged in: set HIVEMON_TOKEN or auth.token in console.yml")
            }
            Self::Unauthorized => write!(f, "credential rejected: log in again"),
            Self::Rejected { message, .. } => write!(f, "{message}"),
            Self::Transport(e) => write!(f, "cannot connect: {e}"),
            Self::Decode(e) => write!(f, "unexpected response: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// True for failures the background refresh swallows as "no data".
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::Unauthorized)
    }
}
