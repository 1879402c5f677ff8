use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum HousingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("could not parse value {value:?} of column {column} as a number")]
    NumberParse { column: String, value: String },

    #[error("cannot fit the trend line of {column}: {source}")]
    TrendFit {
        column: String,
        #[source]
        source: LenErr,
    },
}

// An Error type for handling length requirements,
// needed before fitting a time series.
#[derive(Debug, Clone, PartialEq, ThisError)]
#[error("not enough data, got {got_len} usable points, required is >= {min_len}")]
pub struct LenErr {
    pub min_len: usize,
    pub got_len: usize,
}
