use thiserror::Error;

use crate::primitives::{DocumentId, DocumentKind};

#[derive(Error, Debug)]
pub enum IntegrityError {
    #[error("IntegrityError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("IntegrityError - Orphan: {kind} '{id}' is committed but has no journal entry")]
    Orphan { kind: DocumentKind, id: DocumentId },
}
