use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistanceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from distance matrix API")]
    UnexpectedStatus { status: u16 },

    #[error("distance matrix response did not parse: {source}")]
    Deserialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
