use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {source}. Input head: {head}")]
    Parse {
        head: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Process error: {0}")]
    Process(String),

    #[error("Backend configuration error: {0}")]
    Config(String),

    #[error("{backend} JSON completion failed after {attempts} attempt(s): {last_error}")]
    Exhausted {
        backend: &'static str,
        attempts: u32,
        last_error: String,
    },
}
