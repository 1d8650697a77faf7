//! Service layer API for santa group operations
use crate::config::SantaConfig;
use crate::credential::{Argon2Credentials, CredentialService, IssuedSecret};
use crate::draw::draw_pairs;
use crate::error::{IntegrityError, Operation, SantaError, ServiceError, ServiceResult};
use crate::group::{Group, Match};
use crate::ids::GroupId;
use crate::model::{GroupPatch, GroupRecord, GroupState, ParticipantRecord, TimeStamp};
use crate::repository::GroupRepository;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Orchestrates the santa lifecycle. Holds no group state of its own: every
/// call reads the repository's current record and writes its change back
/// under that group's lock.
pub struct SantaService<R: GroupRepository> {
    repo: Arc<R>,
    credentials: Arc<dyn CredentialService>,
    issued_secret_bytes: usize,
}

impl<R: GroupRepository> SantaService<R> {
    pub fn new(repo: Arc<R>, credentials: Arc<dyn CredentialService>) -> Self {
        Self {
            repo,
            credentials,
            issued_secret_bytes: 16,
        }
    }

    /// Service using Argon2 credentials built from `config`.
    pub fn from_config(repo: Arc<R>, config: &SantaConfig) -> ServiceResult<Self> {
        let credentials = Argon2Credentials::new(&config.credentials)?;
        Ok(Self {
            repo,
            credentials: Arc::new(credentials),
            issued_secret_bytes: config.credentials.issued_secret_bytes,
        })
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    #[instrument(skip(self))]
    pub fn get_group(&self, id: &GroupId) -> ServiceResult<Group> {
        let record = self.repo.get(id)?;
        project(&record)
    }

    /// Create an undrawn santa whose only participant is the organiser.
    #[instrument(skip(self, organiser_secret))]
    pub fn create_group(
        &self,
        name: &str,
        organiser_name: &str,
        organiser_secret: &str,
    ) -> ServiceResult<Group> {
        let credential_hash = self.credentials.hash_secret(organiser_secret)?;
        let organiser = ParticipantRecord::new(organiser_name.to_string(), credential_hash);

        let created = self
            .repo
            .create(GroupRecord::new(name.to_string(), organiser))?;
        info!(group_id = %created.id, "santa created");

        project(&created)
    }

    /// Like [`Self::create_group`] but the organiser's secret is generated
    /// here. The returned secret is the only copy in plaintext.
    pub fn create_group_with_issued_secret(
        &self,
        name: &str,
        organiser_name: &str,
    ) -> ServiceResult<(Group, IssuedSecret)> {
        let secret = IssuedSecret::generate(self.issued_secret_bytes);
        let group = self.create_group(name, organiser_name, secret.expose())?;
        Ok((group, secret))
    }

    #[instrument(skip(self, secret))]
    pub fn add_participant(&self, id: &GroupId, name: &str, secret: &str) -> ServiceResult<Group> {
        // Fail fast before paying for the hash; the checks are repeated under
        // the lock against the snapshot that is actually modified.
        check_can_add(&self.repo.get(id)?, name)?;
        let credential_hash = self.credentials.hash_secret(secret)?;

        let _guard = self.repo.lock_group(id);
        let record = self.repo.get(id)?;
        check_can_add(&record, name)?;

        let mut participants = record.participants;
        participants.push(ParticipantRecord::new(name.to_string(), credential_hash));

        let updated = self.repo.update(id, GroupPatch::participants(participants))?;
        info!(group_id = %id, participant = name, "participant added");

        project(&updated)
    }

    pub fn add_participant_with_issued_secret(
        &self,
        id: &GroupId,
        name: &str,
    ) -> ServiceResult<(Group, IssuedSecret)> {
        let secret = IssuedSecret::generate(self.issued_secret_bytes);
        let group = self.add_participant(id, name, secret.expose())?;
        Ok((group, secret))
    }

    /// Remove a participant by name. The organiser is not protected.
    #[instrument(skip(self))]
    pub fn remove_participant(&self, id: &GroupId, name: &str) -> ServiceResult<Group> {
        let _guard = self.repo.lock_group(id);
        let record = self.repo.get(id)?;
        require_state(&record, Operation::RemoveParticipant, GroupState::Undrawn)?;

        let Some(removed) = record.find_participant(name) else {
            return Err(SantaError::ParticipantNotFound {
                participant_name: name.to_string(),
            }
            .into());
        };
        if removed.id == record.organiser_id {
            debug!(group_id = %id, participant = name, "organiser removed from santa");
        }

        let participants: Vec<_> = record
            .participants
            .into_iter()
            .filter(|p| p.name != name)
            .collect();

        let updated = self.repo.update(id, GroupPatch::participants(participants))?;
        info!(group_id = %id, participant = name, "participant removed");

        project(&updated)
    }

    /// Assign every participant a receiver and freeze the santa.
    pub fn draw(&self, id: &GroupId) -> ServiceResult<Group> {
        self.draw_with_rng(id, &mut rand::thread_rng())
    }

    #[instrument(skip(self, rng))]
    pub fn draw_with_rng<G: Rng + ?Sized>(&self, id: &GroupId, rng: &mut G) -> ServiceResult<Group> {
        let _guard = self.repo.lock_group(id);
        let record = self.repo.get(id)?;
        require_state(&record, Operation::Draw, GroupState::Undrawn)?;

        // one participant would have to give to themselves
        if record.participants.len() < 2 {
            return Err(invalid_state(&record, Operation::Draw));
        }

        let participants: Vec<ParticipantRecord> = draw_pairs(&record.participants, rng)
            .into_iter()
            .map(|(giver, receiver)| ParticipantRecord {
                receiver_name: Some(receiver.name.clone()),
                ..giver.clone()
            })
            .collect();

        let updated = self.repo.update(
            id,
            GroupPatch {
                participants: Some(participants),
                state: Some(GroupState::Drawn),
                drawn_at: Some(TimeStamp::now()),
                ..GroupPatch::default()
            },
        )?;
        info!(group_id = %id, participants = updated.participants.len(), "santa drawn");

        project(&updated)
    }

    #[instrument(skip(self))]
    pub fn get_match(&self, id: &GroupId, participant_name: &str) -> ServiceResult<Match> {
        let record = self.repo.get(id)?;
        require_state(&record, Operation::GetMatch, GroupState::Drawn)?;

        let participant =
            record
                .find_participant(participant_name)
                .ok_or_else(|| SantaError::ParticipantNotFound {
                    participant_name: participant_name.to_string(),
                })?;

        match &participant.receiver_name {
            Some(receiver) => Ok(Match {
                giver_name: participant.name.clone(),
                receiver_name: receiver.clone(),
            }),
            None => Err(integrity_fault(IntegrityError::MissingReceiver {
                group_id: id.clone(),
                participant_name: participant.name.clone(),
            })),
        }
    }

    /// Change the display name. Allowed in every state.
    #[instrument(skip(self))]
    pub fn rename_group(&self, id: &GroupId, name: &str) -> ServiceResult<Group> {
        let _guard = self.repo.lock_group(id);
        let updated = self.repo.update(id, GroupPatch::rename(name.to_string()))?;
        project(&updated)
    }

    /// Check a participant's secret against their stored hash.
    #[instrument(skip(self, secret))]
    pub fn verify_participant(
        &self,
        id: &GroupId,
        participant_name: &str,
        secret: &str,
    ) -> ServiceResult<bool> {
        let record = self.repo.get(id)?;
        let participant =
            record
                .find_participant(participant_name)
                .ok_or_else(|| SantaError::ParticipantNotFound {
                    participant_name: participant_name.to_string(),
                })?;

        Ok(self
            .credentials
            .verify_secret(secret, &participant.credential_hash)?)
    }
}

fn project(record: &GroupRecord) -> ServiceResult<Group> {
    Group::try_from(record).map_err(integrity_fault)
}

fn integrity_fault(err: IntegrityError) -> ServiceError {
    error!(error = %err, "santa failed its integrity check");
    err.into()
}

fn invalid_state(record: &GroupRecord, operation: Operation) -> ServiceError {
    SantaError::InvalidGroupState {
        id: record.id.clone(),
        operation,
        state: record.state,
    }
    .into()
}

fn require_state(
    record: &GroupRecord,
    operation: Operation,
    expected: GroupState,
) -> ServiceResult<()> {
    if record.state != expected {
        return Err(invalid_state(record, operation));
    }
    Ok(())
}

fn check_can_add(record: &GroupRecord, name: &str) -> ServiceResult<()> {
    require_state(record, Operation::AddParticipant, GroupState::Undrawn)?;
    if record.find_participant(name).is_some() {
        return Err(SantaError::DuplicateParticipant {
            participant_name: name.to_string(),
        }
        .into());
    }
    Ok(())
}
