use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}
