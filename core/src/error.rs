use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Client '{client_id}' not found")]
    ClientNotFound { client_id: String },

    #[error("Client id must not be empty")]
    EmptyClientId,

    #[error("Unknown column '{column}' in query filter")]
    UnknownColumn { column: String },

    #[error("Backing table '{table}' is missing")]
    TableMissing { table: String },

    #[error("Table '{table}' is missing expected column '{column}'")]
    ColumnMissing { table: String, column: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
