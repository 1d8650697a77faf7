//! Identifiers for groups and participants.
//!
//! Both are uuid7 values encoded with bech32m under a type-specific human
//! readable prefix, e.g. `santa_1...` and `participant_1...`.
use crate::error::IdError;
use bech32::{Bech32m, Hrp};
use std::fmt;
use uuid7::uuid7;

pub const GROUP_PREFIX: &str = "santa_";
pub const PARTICIPANT_PREFIX: &str = "participant_";

// construct a fresh uuid7 then encode it using bech32m
fn new_uuid_to_bech32(prefix: &str) -> String {
    let hrp = Hrp::parse_unchecked(prefix);
    let bytes = *uuid7().as_bytes();
    // 16 payload bytes under a short constant prefix always fit the length limit
    bech32::encode::<Bech32m>(hrp, &bytes).unwrap_or_else(|_| unreachable!())
}

fn parse_bech32_uuid(value: &str, prefix: &'static str) -> Result<String, IdError> {
    let (hrp, payload) = bech32::decode(value)
        .map_err(|e| IdError::Encoding(value.to_string(), e.to_string()))?;

    if !hrp.as_str().eq_ignore_ascii_case(prefix) {
        return Err(IdError::WrongPrefix {
            value: value.to_string(),
            expected: prefix,
            found: hrp.as_str().to_string(),
        });
    }
    // uuid version lives in the high nibble of byte 6
    if payload.len() != 16 || payload[6] >> 4 != 7 {
        return Err(IdError::InvalidPayload(value.to_string()));
    }

    Ok(value.to_ascii_lowercase())
}

macro_rules! bech32_id {
    ($(#[$meta:meta])* $name:ident, $prefix:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn generate() -> Self {
                Self(new_uuid_to_bech32($prefix))
            }

            /// Validate an identifier received from outside the crate.
            pub fn parse(value: &str) -> Result<Self, IdError> {
                parse_bech32_uuid(value, $prefix).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl<C> minicbor::Encode<C> for $name {
            fn encode<W: minicbor::encode::Write>(
                &self,
                e: &mut minicbor::Encoder<W>,
                _: &mut C,
            ) -> Result<(), minicbor::encode::Error<W::Error>> {
                e.str(&self.0)?.ok()
            }
        }

        impl<'b, C> minicbor::Decode<'b, C> for $name {
            fn decode(
                d: &mut minicbor::Decoder<'b>,
                _: &mut C,
            ) -> Result<Self, minicbor::decode::Error> {
                let raw = d.str()?;
                Self::parse(raw).map_err(|_| {
                    minicbor::decode::Error::message(concat!(
                        "stored ",
                        stringify!($name),
                        " is not a valid identifier"
                    ))
                })
            }
        }
    };
}

bech32_id!(
    /// Identifies one santa group.
    GroupId,
    GROUP_PREFIX
);
bech32_id!(
    /// Identifies one participant within a group.
    ParticipantId,
    PARTICIPANT_PREFIX
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_their_prefix() {
        let group = GroupId::generate();
        let participant = ParticipantId::generate();

        assert!(group.as_str().starts_with("santa_1"));
        assert!(participant.as_str().starts_with("participant_1"));
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = GroupId::generate();
        let b = GroupId::generate();
        let c = GroupId::generate();

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn parse_accepts_generated_ids() {
        let id = GroupId::generate();
        assert_eq!(GroupId::parse(id.as_str()), Ok(id));
    }

    #[test]
    fn parse_rejects_other_prefixes() {
        let participant = ParticipantId::generate();
        let err = GroupId::parse(participant.as_str()).unwrap_err();

        assert!(matches!(err, IdError::WrongPrefix { expected: "santa_", .. }));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            GroupId::parse("not-an-id"),
            Err(IdError::Encoding(..))
        ));
        assert!(GroupId::parse("").is_err());
    }

    #[test]
    fn parse_rejects_non_uuid7_payloads() {
        let hrp = Hrp::parse_unchecked(GROUP_PREFIX);
        let short = bech32::encode::<Bech32m>(hrp, &[1, 2, 3]).unwrap();
        let v4 = bech32::encode::<Bech32m>(hrp, &[0x40; 16]).unwrap();

        assert!(matches!(GroupId::parse(&short), Err(IdError::InvalidPayload(_))));
        assert!(matches!(GroupId::parse(&v4), Err(IdError::InvalidPayload(_))));
    }

    #[test]
    fn cbor_encoding_keeps_the_id() {
        let original = ParticipantId::generate();

        let encoding = minicbor::to_vec(&original).unwrap();
        let decoded: ParticipantId = minicbor::decode(&encoding).unwrap();

        assert_eq!(original, decoded);
    }
}
