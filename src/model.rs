//! Stored representation of a santa group and the patch used to update it.
use crate::ids::{GroupId, ParticipantId};
use chrono::{DateTime, Utc};
use std::fmt;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    #[n(0)]
    Undrawn,
    #[n(1)]
    Drawn,
}

impl fmt::Display for GroupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupState::Undrawn => f.write_str("undrawn"),
            GroupState::Drawn => f.write_str("drawn"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct TimeStamp(DateTime<Utc>);

impl TimeStamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for TimeStamp {
    fn from(value: DateTime<Utc>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRecord {
    #[n(0)]
    pub id: ParticipantId,
    #[n(1)]
    pub name: String, // unique within the group, exact match
    #[n(2)]
    pub credential_hash: String,
    #[n(3)]
    pub receiver_name: Option<String>, // set only by the draw
}

impl ParticipantRecord {
    pub fn new(name: String, credential_hash: String) -> Self {
        Self {
            id: ParticipantId::generate(),
            name,
            credential_hash,
            receiver_name: None,
        }
    }
}

// key is the group id, value is this struct encoded into cbor
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    #[n(0)]
    pub id: GroupId,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub organiser_id: ParticipantId,
    #[n(3)]
    pub participants: Vec<ParticipantRecord>,
    #[n(4)]
    pub state: GroupState,
    #[n(5)]
    pub created_at: TimeStamp,
    #[n(6)]
    pub drawn_at: Option<TimeStamp>,
}

/// Fields an update may replace. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub participants: Option<Vec<ParticipantRecord>>,
    pub state: Option<GroupState>,
    pub drawn_at: Option<TimeStamp>,
}

impl GroupRecord {
    /// A fresh undrawn group whose only member is its organiser.
    pub fn new(name: String, organiser: ParticipantRecord) -> Self {
        Self {
            id: GroupId::generate(),
            name,
            organiser_id: organiser.id.clone(),
            participants: vec![organiser],
            state: GroupState::Undrawn,
            created_at: TimeStamp::now(),
            drawn_at: None,
        }
    }

    pub fn find_participant(&self, name: &str) -> Option<&ParticipantRecord> {
        self.participants.iter().find(|p| p.name == name)
    }

    /// Merge a patch into this record, producing the full record to store.
    /// Identity fields are never taken from the patch.
    pub fn apply(self, patch: GroupPatch) -> GroupRecord {
        GroupRecord {
            id: self.id,
            name: patch.name.unwrap_or(self.name),
            organiser_id: self.organiser_id,
            participants: patch.participants.unwrap_or(self.participants),
            state: patch.state.unwrap_or(self.state),
            created_at: self.created_at,
            drawn_at: patch.drawn_at.or(self.drawn_at),
        }
    }
}

impl GroupPatch {
    pub fn participants(participants: Vec<ParticipantRecord>) -> Self {
        Self {
            participants: Some(participants),
            ..Self::default()
        }
    }
    pub fn rename(name: String) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(names: &[&str]) -> GroupRecord {
        let mut names = names.iter();
        let organiser = ParticipantRecord::new(names.next().unwrap().to_string(), "h".into());
        let mut record = GroupRecord::new("Office".into(), organiser);
        for name in names {
            record
                .participants
                .push(ParticipantRecord::new(name.to_string(), "h".into()));
        }
        record
    }

    #[test]
    fn new_record_is_undrawn_with_organiser() {
        let record = record_with(&["Alice"]);

        assert_eq!(record.state, GroupState::Undrawn);
        assert_eq!(record.participants.len(), 1);
        assert_eq!(record.organiser_id, record.participants[0].id);
        assert!(record.drawn_at.is_none());
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let record = record_with(&["Alice", "Bob"]);
        let merged = record.clone().apply(GroupPatch::default());

        assert_eq!(merged, record);
    }

    #[test]
    fn patch_replaces_only_set_fields() {
        let record = record_with(&["Alice", "Bob"]);
        let merged = record.clone().apply(GroupPatch {
            state: Some(GroupState::Drawn),
            ..GroupPatch::default()
        });

        assert_eq!(merged.state, GroupState::Drawn);
        assert_eq!(merged.name, record.name);
        assert_eq!(merged.participants, record.participants);
        assert_eq!(merged.id, record.id);

        let renamed = merged.apply(GroupPatch::rename("Home".into()));
        assert_eq!(renamed.name, "Home");
        assert_eq!(renamed.state, GroupState::Drawn);
    }

    #[test]
    fn record_cbor_encoding_is_lossless() {
        let mut record = record_with(&["Alice", "Bob"]);
        record.participants[0].receiver_name = Some("Bob".into());
        record.participants[1].receiver_name = Some("Alice".into());
        record.state = GroupState::Drawn;
        record.drawn_at = Some(TimeStamp::now());

        let encoding = minicbor::to_vec(&record).unwrap();
        let decoded: GroupRecord = minicbor::decode(&encoding).unwrap();

        assert_eq!(record, decoded);
    }

    #[test]
    fn find_participant_is_case_sensitive() {
        let record = record_with(&["Alice", "Bob"]);

        assert!(record.find_participant("Bob").is_some());
        assert!(record.find_participant("bob").is_none());
    }
}
