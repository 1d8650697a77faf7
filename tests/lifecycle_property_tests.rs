//! Property-based tests for the santa lifecycle.
//!
//! Random sequences of add, remove, draw and match lookups are replayed
//! against the service and a plain model of the expected roster. After every
//! step the stored santa must agree with the model and keep its invariants.
mod common;

use proptest::prelude::*;
use secret_santa::{Group, GroupState, SantaError};

#[derive(Debug, Clone)]
enum Step {
    Add(String),
    Remove(String),
    Draw,
    Match(String),
}

fn name_strategy() -> impl Strategy<Value = String> {
    // a small pool so duplicates and misses are common
    prop::sample::select(vec!["Alice", "Bob", "Carol", "Dave", "Erin", "Frank"])
        .prop_map(str::to_string)
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => name_strategy().prop_map(Step::Add),
        2 => name_strategy().prop_map(Step::Remove),
        1 => Just(Step::Draw),
        1 => name_strategy().prop_map(Step::Match),
    ]
}

fn assert_invariants(group: &Group) -> Result<(), TestCaseError> {
    let names = group.participant_names();
    let mut unique = names.clone();
    unique.sort_unstable();
    unique.dedup();
    prop_assert_eq!(unique.len(), names.len(), "participant names must be unique");

    if let Some(matches) = group.matches() {
        prop_assert_eq!(matches.len(), names.len());
        let mut receivers: Vec<_> = matches.iter().map(|m| m.receiver_name.as_str()).collect();
        receivers.sort_unstable();
        prop_assert_eq!(receivers, unique);
        prop_assert!(matches.iter().all(|m| m.giver_name != m.receiver_name));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_lifecycle_matches_model(steps in prop::collection::vec(step_strategy(), 1..12)) {
        let service = common::memory_service();
        let id = service.create_group("Prop", "Organiser", "s").unwrap().id().clone();
        let mut roster = vec!["Organiser".to_string()];
        let mut drawn = false;

        for step in steps {
            match step {
                Step::Add(name) => {
                    let result = service.add_participant(&id, &name, "s");
                    if drawn {
                        let is_invalid_state = matches!(
                            result.unwrap_err().as_santa(),
                            Some(SantaError::InvalidGroupState { .. })
                        );
                        prop_assert!(is_invalid_state);
                    } else if roster.contains(&name) {
                        let is_duplicate = matches!(
                            result.unwrap_err().as_santa(),
                            Some(SantaError::DuplicateParticipant { .. })
                        );
                        prop_assert!(is_duplicate);
                    } else {
                        prop_assert!(result.is_ok());
                        roster.push(name);
                    }
                }
                Step::Remove(name) => {
                    let result = service.remove_participant(&id, &name);
                    if drawn {
                        prop_assert!(result.is_err());
                    } else if let Some(pos) = roster.iter().position(|n| *n == name) {
                        prop_assert!(result.is_ok());
                        roster.remove(pos);
                    } else {
                        let is_not_found = matches!(
                            result.unwrap_err().as_santa(),
                            Some(SantaError::ParticipantNotFound { .. })
                        );
                        prop_assert!(is_not_found);
                    }
                }
                Step::Draw => {
                    let result = service.draw(&id);
                    if drawn || roster.len() < 2 {
                        let is_invalid_state = matches!(
                            result.unwrap_err().as_santa(),
                            Some(SantaError::InvalidGroupState { .. })
                        );
                        prop_assert!(is_invalid_state);
                    } else {
                        prop_assert!(result.is_ok());
                        drawn = true;
                    }
                }
                Step::Match(name) => {
                    let result = service.get_match(&id, &name);
                    if !drawn {
                        let is_invalid_state = matches!(
                            result.unwrap_err().as_santa(),
                            Some(SantaError::InvalidGroupState { .. })
                        );
                        prop_assert!(is_invalid_state);
                    } else if roster.contains(&name) {
                        let found = result.unwrap();
                        prop_assert_eq!(found.giver_name, name);
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
            }

            let group = service.get_group(&id).unwrap();
            prop_assert_eq!(group.participant_names(), roster.iter().map(String::as_str).collect::<Vec<_>>());
            prop_assert_eq!(group.state() == GroupState::Drawn, drawn);
            assert_invariants(&group)?;
        }
    }
}
