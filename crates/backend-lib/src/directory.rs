// ============================
// backend-lib/src/directory.rs
// ============================
//! The activity directory: every activity keyed by name, with its roster.
//!
//! Activities are fixed once the directory is built. Only rosters change, and
//! each change runs under the write lock of the activity's map shard, so the
//! membership check and the mutation are a single critical section.
use std::fmt;

use dashmap::DashMap;
use mergington_common::Activity;
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;
use tracing::{debug, instrument};

pub type ActivityName = String;

/// Failures of directory operations. The `Duplicate*` variants only come
/// from seeding; the rest are expected client conditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Activity not found")]
    NotFound(ActivityName),

    #[error("Student is already signed up for this activity")]
    AlreadyRegistered { activity: ActivityName, email: String },

    #[error("Student is not signed up for this activity")]
    NotRegistered { activity: ActivityName, email: String },

    #[error("Activity is full")]
    ActivityFull {
        activity: ActivityName,
        max_participants: u32,
    },

    #[error("Duplicate activity in seed list: {0}")]
    DuplicateActivity(ActivityName),

    #[error("Duplicate participant {email} in seed roster of {activity}")]
    DuplicateParticipant { activity: ActivityName, email: String },
}

impl DirectoryError {
    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            DirectoryError::NotFound(_) => "not_found",
            DirectoryError::AlreadyRegistered { .. } => "already_registered",
            DirectoryError::NotRegistered { .. } => "not_registered",
            DirectoryError::ActivityFull { .. } => "activity_full",
            DirectoryError::DuplicateActivity(_) => "duplicate_activity",
            DirectoryError::DuplicateParticipant { .. } => "duplicate_participant",
        }
    }
}

/// Outcome of a successful roster change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    SignedUp { activity: ActivityName, email: String },
    Unregistered { activity: ActivityName, email: String },
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confirmation::SignedUp { activity, email } => {
                write!(f, "Signed up {email} for {activity}")
            },
            Confirmation::Unregistered { activity, email } => {
                write!(f, "Unregistered {email} from {activity}")
            },
        }
    }
}

/// Point-in-time copy of the directory, in seed order.
///
/// Serializes as a JSON object keyed by activity name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySnapshot {
    entries: Vec<(ActivityName, Activity)>,
}

impl DirectorySnapshot {
    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, activity)| activity)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for DirectorySnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, activity) in &self.entries {
            map.serialize_entry(name, activity)?;
        }
        map.end()
    }
}

/// In-memory activity directory
pub struct Directory {
    activities: DashMap<ActivityName, Activity>,
    /// Seed order, used for listing
    order: Vec<ActivityName>,
    enforce_capacity: bool,
}

impl Directory {
    /// Build a directory from an ordered seed list.
    ///
    /// Activity names must be unique, and so must the emails within each
    /// seeded roster. With `enforce_capacity` off, `max_participants` is
    /// informational only and sign-ups are unlimited.
    pub fn new<I>(seed: I, enforce_capacity: bool) -> Result<Self, DirectoryError>
    where
        I: IntoIterator<Item = (ActivityName, Activity)>,
    {
        let activities = DashMap::new();
        let mut order = Vec::new();

        for (name, activity) in seed {
            if activities.contains_key(&name) {
                return Err(DirectoryError::DuplicateActivity(name));
            }
            for (i, email) in activity.participants.iter().enumerate() {
                if activity.participants[..i].contains(email) {
                    return Err(DirectoryError::DuplicateParticipant {
                        activity: name,
                        email: email.clone(),
                    });
                }
            }
            order.push(name.clone());
            activities.insert(name, activity);
        }

        Ok(Self {
            activities,
            order,
            enforce_capacity,
        })
    }

    /// Snapshot of every activity and its current roster
    pub fn list(&self) -> DirectorySnapshot {
        let entries = self
            .order
            .iter()
            .filter_map(|name| {
                self.activities
                    .get(name)
                    .map(|entry| (name.clone(), entry.value().clone()))
            })
            .collect();

        DirectorySnapshot { entries }
    }

    /// Snapshot of a single activity
    pub fn get(&self, activity_name: &str) -> Result<Activity, DirectoryError> {
        self.activities
            .get(activity_name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DirectoryError::NotFound(activity_name.to_string()))
    }

    /// Add `email` to the roster of `activity_name`
    #[instrument(skip(self))]
    pub fn signup(
        &self,
        activity_name: &str,
        email: &str,
    ) -> Result<Confirmation, DirectoryError> {
        let mut entry = self
            .activities
            .get_mut(activity_name)
            .ok_or_else(|| DirectoryError::NotFound(activity_name.to_string()))?;

        if entry.has_participant(email) {
            return Err(DirectoryError::AlreadyRegistered {
                activity: activity_name.to_string(),
                email: email.to_string(),
            });
        }

        if self.enforce_capacity && entry.is_full() {
            return Err(DirectoryError::ActivityFull {
                activity: activity_name.to_string(),
                max_participants: entry.max_participants,
            });
        }

        entry.participants.push(email.to_string());
        debug!(participants = entry.participants.len(), "participant added");

        Ok(Confirmation::SignedUp {
            activity: activity_name.to_string(),
            email: email.to_string(),
        })
    }

    /// Remove `email` from the roster of `activity_name`
    #[instrument(skip(self))]
    pub fn unregister(
        &self,
        activity_name: &str,
        email: &str,
    ) -> Result<Confirmation, DirectoryError> {
        let mut entry = self
            .activities
            .get_mut(activity_name)
            .ok_or_else(|| DirectoryError::NotFound(activity_name.to_string()))?;

        let Some(position) = entry.participants.iter().position(|p| p == email) else {
            return Err(DirectoryError::NotRegistered {
                activity: activity_name.to_string(),
                email: email.to_string(),
            });
        };

        entry.participants.remove(position);
        debug!(participants = entry.participants.len(), "participant removed");

        Ok(Confirmation::Unregistered {
            activity: activity_name.to_string(),
            email: email.to_string(),
        })
    }

    pub fn contains(&self, activity_name: &str) -> bool {
        self.activities.contains_key(activity_name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn enforces_capacity(&self) -> bool {
        self.enforce_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_activities;

    const CHESS: &str = "Chess Club";

    fn directory() -> Directory {
        Directory::new(default_activities(), false).unwrap()
    }

    fn activity(max_participants: u32, participants: &[&str]) -> Activity {
        Activity {
            description: "Test activity".to_string(),
            schedule: "Never".to_string(),
            max_participants,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_chess_club_scenario() {
        let directory = directory();
        assert!(directory
            .get(CHESS)
            .unwrap()
            .has_participant("michael@mergington.edu"));

        let confirmation = directory
            .signup(CHESS, "newstudent@mergington.edu")
            .unwrap();
        assert_eq!(
            confirmation.to_string(),
            "Signed up newstudent@mergington.edu for Chess Club"
        );
        let chess = directory.get(CHESS).unwrap();
        assert!(chess.has_participant("newstudent@mergington.edu"));
        assert!(chess.has_participant("michael@mergington.edu"));

        assert!(matches!(
            directory.signup(CHESS, "michael@mergington.edu"),
            Err(DirectoryError::AlreadyRegistered { .. })
        ));

        let confirmation = directory
            .unregister(CHESS, "michael@mergington.edu")
            .unwrap();
        assert_eq!(
            confirmation.to_string(),
            "Unregistered michael@mergington.edu from Chess Club"
        );
        let chess = directory.get(CHESS).unwrap();
        assert!(!chess.has_participant("michael@mergington.edu"));
        assert!(chess.has_participant("newstudent@mergington.edu"));

        assert!(matches!(
            directory.unregister(CHESS, "notsignedup@mergington.edu"),
            Err(DirectoryError::NotRegistered { .. })
        ));

        assert_eq!(
            directory.signup("Nonexistent Club", "anyone@mergington.edu"),
            Err(DirectoryError::NotFound("Nonexistent Club".to_string()))
        );
    }

    #[test]
    fn test_unknown_activity_is_not_found_for_both_operations() {
        let directory = directory();
        for email in ["", "michael@mergington.edu", "x"] {
            assert!(matches!(
                directory.signup("Underwater Basket Weaving", email),
                Err(DirectoryError::NotFound(_))
            ));
            assert!(matches!(
                directory.unregister("Underwater Basket Weaving", email),
                Err(DirectoryError::NotFound(_))
            ));
        }
        // lookups are exact
        assert!(matches!(
            directory.signup("chess club", "a@mergington.edu"),
            Err(DirectoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_signup_then_unregister_restores_roster() {
        let directory = directory();
        for name in directory.list().names().map(str::to_string).collect::<Vec<_>>() {
            let before = directory.get(&name).unwrap().participants;
            directory.signup(&name, "roundtrip@mergington.edu").unwrap();
            directory.unregister(&name, "roundtrip@mergington.edu").unwrap();
            assert_eq!(directory.get(&name).unwrap().participants, before);
        }
    }

    #[test]
    fn test_same_email_may_join_many_activities() {
        let directory = directory();
        directory.signup(CHESS, "busy@mergington.edu").unwrap();
        directory.signup("Gym Class", "busy@mergington.edu").unwrap();

        let snapshot = directory.list();
        assert!(snapshot.get(CHESS).unwrap().has_participant("busy@mergington.edu"));
        assert!(snapshot
            .get("Gym Class")
            .unwrap()
            .has_participant("busy@mergington.edu"));
    }

    #[test]
    fn test_list_is_a_pure_read() {
        let directory = directory();
        let first = directory.list();
        let second = directory.list();
        assert_eq!(first, second);

        // mutating a snapshot does not reach the directory
        let mut detached = first.clone();
        detached.entries[0].1.participants.clear();
        assert_eq!(directory.list(), second);
    }

    #[test]
    fn test_list_keeps_seed_order() {
        let directory = Directory::new(
            vec![
                ("Zither".to_string(), activity(3, &[])),
                ("Archery".to_string(), activity(3, &[])),
                ("Mime".to_string(), activity(3, &[])),
            ],
            false,
        )
        .unwrap();

        let names: Vec<_> = directory.list().names().map(str::to_string).collect();
        assert_eq!(names, ["Zither", "Archery", "Mime"]);

        let json = serde_json::to_string(&directory.list()).unwrap();
        let zither = json.find("Zither").unwrap();
        let archery = json.find("Archery").unwrap();
        assert!(zither < archery);
    }

    #[test]
    fn test_duplicate_seed_names_rejected() {
        let result = Directory::new(
            vec![
                ("Chess Club".to_string(), activity(2, &[])),
                ("Chess Club".to_string(), activity(4, &[])),
            ],
            false,
        );
        assert!(matches!(
            result,
            Err(DirectoryError::DuplicateActivity(name)) if name == "Chess Club"
        ));
    }

    #[test]
    fn test_duplicate_seed_participants_rejected() {
        let result = Directory::new(
            vec![(
                "Chess Club".to_string(),
                activity(4, &["a@x.edu", "b@x.edu", "a@x.edu"]),
            )],
            false,
        );
        assert_eq!(
            result.err(),
            Some(DirectoryError::DuplicateParticipant {
                activity: "Chess Club".to_string(),
                email: "a@x.edu".to_string(),
            })
        );

        // the same email across activities is fine
        let directory = Directory::new(
            vec![
                ("Chess Club".to_string(), activity(4, &["a@x.edu"])),
                ("Gym Class".to_string(), activity(4, &["a@x.edu"])),
            ],
            false,
        )
        .unwrap();
        directory.unregister("Chess Club", "a@x.edu").unwrap();
        assert!(!directory.get("Chess Club").unwrap().has_participant("a@x.edu"));
        assert!(directory.get("Gym Class").unwrap().has_participant("a@x.edu"));
    }

    #[test]
    fn test_capacity_not_enforced_by_default() {
        let directory =
            Directory::new(vec![("Tiny".to_string(), activity(1, &["a@x.edu"]))], false)
                .unwrap();
        assert!(!directory.enforces_capacity());

        directory.signup("Tiny", "b@x.edu").unwrap();
        assert_eq!(directory.get("Tiny").unwrap().participants.len(), 2);
    }

    #[test]
    fn test_capacity_enforced_when_enabled() {
        let directory =
            Directory::new(vec![("Tiny".to_string(), activity(2, &["a@x.edu"]))], true)
                .unwrap();

        directory.signup("Tiny", "b@x.edu").unwrap();
        assert_eq!(
            directory.signup("Tiny", "c@x.edu"),
            Err(DirectoryError::ActivityFull {
                activity: "Tiny".to_string(),
                max_participants: 2,
            })
        );
        // duplicate check wins over the capacity check
        assert!(matches!(
            directory.signup("Tiny", "a@x.edu"),
            Err(DirectoryError::AlreadyRegistered { .. })
        ));

        directory.unregister("Tiny", "a@x.edu").unwrap();
        directory.signup("Tiny", "c@x.edu").unwrap();
    }

    #[test]
    fn test_concurrent_duplicate_signups_admit_one() {
        let directory = directory();
        let successes = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| directory.signup(CHESS, "racer@mergington.edu")))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(Result::is_ok)
                .count()
        });

        assert_eq!(successes, 1);
        let roster = directory.get(CHESS).unwrap().participants;
        assert_eq!(
            roster.iter().filter(|p| *p == "racer@mergington.edu").count(),
            1
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(DirectoryError::NotFound("x".into()).kind(), "not_found");
        assert_eq!(
            DirectoryError::NotRegistered {
                activity: "x".into(),
                email: "y".into()
            }
            .kind(),
            "not_registered"
        );
        assert_eq!(
            DirectoryError::AlreadyRegistered {
                activity: "x".into(),
                email: "y".into()
            }
            .to_string(),
            "Student is already signed up for this activity"
        );
    }
}
