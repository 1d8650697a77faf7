//! Public view of a santa group, projected from its stored record on every read.
use crate::error::IntegrityError;
use crate::ids::{GroupId, ParticipantId};
use crate::model::{GroupRecord, GroupState, TimeStamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

/// Who gives a gift to whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub giver_name: String,
    pub receiver_name: String,
}

/// Fields shared by every state of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    pub id: GroupId,
    pub name: String,
    pub organiser_id: ParticipantId,
    pub participants: Vec<Participant>,
    pub created_at: TimeStamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Group {
    Undrawn(GroupInfo),
    Drawn {
        info: GroupInfo,
        drawn_at: Option<TimeStamp>,
        matches: Vec<Match>,
    },
}

impl Group {
    pub fn info(&self) -> &GroupInfo {
        match self {
            Group::Undrawn(info) => info,
            Group::Drawn { info, .. } => info,
        }
    }
    pub fn id(&self) -> &GroupId {
        &self.info().id
    }
    pub fn state(&self) -> GroupState {
        match self {
            Group::Undrawn(_) => GroupState::Undrawn,
            Group::Drawn { .. } => GroupState::Drawn,
        }
    }
    pub fn participant_names(&self) -> Vec<&str> {
        self.info()
            .participants
            .iter()
            .map(|p| p.name.as_str())
            .collect()
    }
    /// Only a drawn group has matches.
    pub fn matches(&self) -> Option<&[Match]> {
        match self {
            Group::Undrawn(_) => None,
            Group::Drawn { matches, .. } => Some(matches),
        }
    }
}

impl TryFrom<&GroupRecord> for Group {
    type Error = IntegrityError;

    fn try_from(record: &GroupRecord) -> Result<Self, Self::Error> {
        let info = GroupInfo {
            id: record.id.clone(),
            name: record.name.clone(),
            organiser_id: record.organiser_id.clone(),
            participants: record
                .participants
                .iter()
                .map(|p| Participant {
                    id: p.id.clone(),
                    name: p.name.clone(),
                })
                .collect(),
            created_at: record.created_at,
        };

        match record.state {
            GroupState::Undrawn => Ok(Group::Undrawn(info)),
            GroupState::Drawn => {
                let matches = record
                    .participants
                    .iter()
                    .map(|p| match &p.receiver_name {
                        Some(receiver) => Ok(Match {
                            giver_name: p.name.clone(),
                            receiver_name: receiver.clone(),
                        }),
                        None => Err(IntegrityError::MissingReceiver {
                            group_id: record.id.clone(),
                            participant_name: p.name.clone(),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Group::Drawn {
                    info,
                    drawn_at: record.drawn_at,
                    matches,
                })
            }
        }
    }
}
