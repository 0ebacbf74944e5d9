use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThinqError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx response from the vendor; message is surfaced to the caller
    /// verbatim.
    #[error("thinq api error {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}
