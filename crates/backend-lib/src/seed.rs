// ============================
// backend-lib/src/seed.rs
// ============================
//! Activities the directory starts with.
use std::fmt;
use std::fs;
use std::path::Path;

use mergington_common::Activity;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use tracing::info;

use crate::directory::ActivityName;
use crate::error::AppError;

fn activity(
    description: &str,
    schedule: &str,
    max_participants: u32,
    participants: &[&str],
) -> Activity {
    Activity {
        description: description.to_string(),
        schedule: schedule.to_string(),
        max_participants,
        participants: participants.iter().map(|p| (*p).to_string()).collect(),
    }
}

/// Built-in activity list
pub fn default_activities() -> Vec<(ActivityName, Activity)> {
    vec![
        (
            "Chess Club".to_string(),
            activity(
                "Learn strategies and compete in chess tournaments",
                "Fridays, 3:30 PM - 5:00 PM",
                12,
                &["michael@mergington.edu", "daniel@mergington.edu"],
            ),
        ),
        (
            "Programming Class".to_string(),
            activity(
                "Learn programming fundamentals and build software projects",
                "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                20,
                &["emma@mergington.edu", "sophia@mergington.edu"],
            ),
        ),
        (
            "Gym Class".to_string(),
            activity(
                "Physical education and sports activities",
                "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                30,
                &["john@mergington.edu", "olivia@mergington.edu"],
            ),
        ),
        (
            "Soccer Team".to_string(),
            activity(
                "Join the school soccer team and compete in matches",
                "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
                22,
                &["liam@mergington.edu", "noah@mergington.edu"],
            ),
        ),
        (
            "Basketball Team".to_string(),
            activity(
                "Practice and play basketball with the school team",
                "Wednesdays and Fridays, 3:30 PM - 5:00 PM",
                15,
                &["ava@mergington.edu", "mia@mergington.edu"],
            ),
        ),
        (
            "Art Club".to_string(),
            activity(
                "Explore your creativity through painting and drawing",
                "Thursdays, 3:30 PM - 5:00 PM",
                15,
                &["amelia@mergington.edu", "harper@mergington.edu"],
            ),
        ),
        (
            "Drama Club".to_string(),
            activity(
                "Act, direct, and produce plays and performances",
                "Mondays and Wednesdays, 4:00 PM - 5:30 PM",
                20,
                &["ella@mergington.edu", "scarlett@mergington.edu"],
            ),
        ),
        (
            "Math Club".to_string(),
            activity(
                "Solve challenging problems and participate in math competitions",
                "Tuesdays, 3:30 PM - 4:30 PM",
                10,
                &["james@mergington.edu", "benjamin@mergington.edu"],
            ),
        ),
        (
            "Debate Team".to_string(),
            activity(
                "Develop public speaking and argumentation skills",
                "Fridays, 4:00 PM - 5:30 PM",
                12,
                &["charlotte@mergington.edu", "henry@mergington.edu"],
            ),
        ),
    ]
}

/// JSON object of `name -> Activity`, kept in file order
struct OrderedActivities(Vec<(ActivityName, Activity)>);

impl<'de> Deserialize<'de> for OrderedActivities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = OrderedActivities;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of activity names to activities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<ActivityName, Activity>()? {
                    entries.push(entry);
                }
                Ok(OrderedActivities(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Parse a seed document; entries keep their document order.
///
/// Repeated names are passed through so the directory can reject them.
pub fn parse_activities(json: &str) -> Result<Vec<(ActivityName, Activity)>, AppError> {
    let OrderedActivities(entries) = serde_json::from_str(json)?;
    Ok(entries)
}

/// Read a seed file in the `GET /activities` format
pub fn load_activities<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<(ActivityName, Activity)>, AppError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let entries = parse_activities(&content)?;
    info!(path = %path.display(), activities = entries.len(), "loaded seed file");
    Ok(entries)
}
