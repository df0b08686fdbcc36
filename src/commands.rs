//! Client-facing wrappers around [`RecordStore`].

use crate::errors::AppError;
use crate::models::{AckStatus, DeleteResponse, Evaluation, EvaluationSummary, SaveResponse};
use crate::store::RecordStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientError {
    pub status: u16,
    pub detail: String,
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.detail)
    }
}

impl std::error::Error for ClientError {}

impl From<AppError> for ClientError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation(detail) => Self { status: 400, detail },
            AppError::NotFound(_) => Self {
                status: 404,
                detail: "Evaluation not found".to_string(),
            },
            other => {
                tracing::error!(error = %other, "storage operation failed");
                Self {
                    status: 500,
                    detail: other.to_string(),
                }
            }
        }
    }
}

pub fn list_evaluations(store: &RecordStore) -> Result<Vec<EvaluationSummary>, ClientError> {
    store.list().map_err(ClientError::from)
}

pub fn get_evaluation(store: &RecordStore, filename: &str) -> Result<Value, ClientError> {
    store.get(filename).map_err(ClientError::from)
}

pub fn save_evaluation(store: &RecordStore, evaluation: Evaluation) -> Result<SaveResponse, ClientError> {
    let filename = store.save(evaluation)?;
    Ok(SaveResponse {
        status: AckStatus::Saved,
        filename,
    })
}

pub fn delete_evaluation(store: &RecordStore, filename: &str) -> Result<DeleteResponse, ClientError> {
    store.delete(filename)?;
    Ok(DeleteResponse {
        status: AckStatus::Deleted,
    })
}
