use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A check was attempted before the dictionary reported ready. Never
    /// returned: the pass is skipped and retried on the next trigger.
    #[error("dictionary is not ready")]
    DictionaryUnavailable,

    /// The host document could not be read, e.g. the editor was disposed.
    #[error("host document unavailable: {0}")]
    HostUnavailable(String),

    #[error("invalid ignore pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
