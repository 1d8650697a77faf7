//! Secret Santa groups: lifecycle, random draws and persistence.
pub mod config;
pub mod credential;
pub mod draw;
pub mod error;
pub mod group;
pub mod ids;
pub mod model;
pub mod repository;
pub mod service;
pub mod telemetry;

pub use error::{IntegrityError, Operation, SantaError, ServiceError, ServiceResult};
pub use group::{Group, GroupInfo, Match, Participant};
pub use ids::{GroupId, ParticipantId};
pub use model::GroupState;
pub use service::SantaService;
