//! Error types for santa groups, grouped by how a caller is expected to react.
use crate::ids::GroupId;
use crate::model::GroupState;
use std::fmt;

/// Operations whose legality depends on the group's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddParticipant,
    RemoveParticipant,
    Draw,
    GetMatch,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Operation::AddParticipant => "addParticipant",
            Operation::RemoveParticipant => "removeParticipant",
            Operation::Draw => "Draw",
            Operation::GetMatch => "getMatch",
        };
        f.write_str(tag)
    }
}

/// Expected, recoverable outcomes of the group operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SantaError {
    #[error("santa {id} was not found")]
    GroupNotFound { id: GroupId },
    #[error("cannot {operation} santa {id} while it is {state}")]
    InvalidGroupState {
        id: GroupId,
        operation: Operation,
        state: GroupState,
    },
    #[error("no participant named {participant_name:?}")]
    ParticipantNotFound { participant_name: String },
    #[error("a participant named {participant_name:?} already exists")]
    DuplicateParticipant { participant_name: String },
}

/// Stored data that breaks the model's invariants. Never a normal outcome.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("santa {group_id} is drawn but {participant_name:?} has no receiver")]
    MissingReceiver {
        group_id: GroupId,
        participant_name: String,
    },
    #[error("stored record {key:?} could not be decoded: {reason}")]
    UndecodableRecord { key: String, reason: String },
}

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("santa {id} was not found")]
    NotFound { id: GroupId },
    #[error("storage backend failure: {0}")]
    Storage(String),
    #[error("stored record {key:?} is corrupted: {reason}")]
    Corrupted { key: String, reason: String },
}

impl From<sled::Error> for RepositoryError {
    fn from(value: sled::Error) -> Self {
        RepositoryError::Storage(value.to_string())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CredentialError {
    #[error("failed to hash secret: {0}")]
    Hash(String),
    #[error("stored credential hash is malformed: {0}")]
    MalformedHash(String),
    #[error("invalid argon2 parameters: {0}")]
    Params(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("identifier {0:?} is not valid bech32: {1}")]
    Encoding(String, String),
    #[error("identifier {value:?} has prefix {found:?}, expected {expected:?}")]
    WrongPrefix {
        value: String,
        expected: &'static str,
        found: String,
    },
    #[error("identifier {0:?} does not carry a uuid7 payload")]
    InvalidPayload(String),
}

/// Everything a service operation can return.
///
/// `Santa` carries the ordinary taxonomy. `Integrity` is fatal: it means a
/// stored group no longer satisfies its invariants and must not be retried or
/// papered over.
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Santa(#[from] SantaError),
    #[error("integrity violation: {0}")]
    Integrity(#[from] IntegrityError),
    #[error("storage failure: {0}")]
    Storage(String),
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl ServiceError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ServiceError::Integrity(_))
    }

    pub fn as_santa(&self) -> Option<&SantaError> {
        match self {
            ServiceError::Santa(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound { id } => SantaError::GroupNotFound { id }.into(),
            RepositoryError::Storage(reason) => ServiceError::Storage(reason),
            RepositoryError::Corrupted { key, reason } => {
                IntegrityError::UndecodableRecord { key, reason }.into()
            }
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
