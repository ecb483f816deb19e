//! Notification dispatch: translate a completed lifecycle transition into
//! the concrete `(recipient, event, payload)` tuples the notification
//! channel delivers.
//!
//! This is a deterministic mapping with no failure mode of its own. A
//! transition fans out to zero, one, or two recipients. Each payload
//! carries the job id and a human-readable message; assignment-related
//! payloads also carry the walker's id and display name. Dispatches
//! aimed at the non-initiating party additionally name a notification
//! kind so the router persists an inbox record for them.

use serde_json::json;

use crate::cancellation::CancelCaller;
use crate::geo::Position;
use crate::types::DbId;

/// Event names pushed over the per-user channel.
///
/// These are part of the client protocol and must not change casing.
pub const EVENT_JOB_ASSIGNED: &str = "jobAssigned";
pub const EVENT_ASSIGNMENT_CONFIRMED: &str = "assignmentConfirmed";
pub const EVENT_WALKER_ON_MY_WAY: &str = "walkerOnMyWay";
pub const EVENT_WALKER_POSITION_UPDATE: &str = "walkerPositionUpdate";
pub const EVENT_JOB_COMPLETED: &str = "jobCompleted";
pub const EVENT_ASSIGNMENT_CANCELED: &str = "assignmentCanceled";

/// Persisted notification kinds (the `notifications.kind` column).
pub const KIND_ASSIGNMENT: &str = "assignment";
pub const KIND_CANCELLATION: &str = "cancellation";
pub const KIND_ON_MY_WAY: &str = "on_my_way";
pub const KIND_COMPLETED: &str = "completed";

/// A successful state transition, with everything needed to notify.
#[derive(Debug, Clone)]
pub enum JobTransition {
    Assigned {
        job_id: DbId,
        title: String,
        owner_id: DbId,
        walker_id: DbId,
        walker_name: String,
    },
    OnMyWay {
        job_id: DbId,
        title: String,
        owner_id: DbId,
        walker_id: DbId,
        walker_name: String,
    },
    PositionUpdated {
        job_id: DbId,
        owner_id: DbId,
        position: Position,
    },
    Completed {
        job_id: DbId,
        title: String,
        owner_id: DbId,
        walker_id: DbId,
        walker_name: String,
    },
    Canceled {
        job_id: DbId,
        title: String,
        owner_id: DbId,
        walker_id: DbId,
        walker_name: String,
        canceled_by: CancelCaller,
        reason: Option<String>,
    },
}

/// One outbound delivery: push `event`/`payload` to `recipient`, and
/// persist an inbox record of `notification` kind when set.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub recipient: DbId,
    pub event: &'static str,
    pub notification: Option<&'static str>,
    pub payload: serde_json::Value,
}

/// Map a transition to its outbound dispatches.
pub fn dispatch(transition: &JobTransition) -> Vec<Dispatch> {
    match transition {
        JobTransition::Assigned {
            job_id,
            title,
            owner_id,
            walker_id,
            walker_name,
        } => vec![
            Dispatch {
                recipient: *owner_id,
                event: EVENT_JOB_ASSIGNED,
                notification: Some(KIND_ASSIGNMENT),
                payload: json!({
                    "jobId": job_id,
                    "walkerId": walker_id,
                    "walkerName": walker_name,
                    "message": format!("{walker_name} accepted your job \"{title}\""),
                }),
            },
            Dispatch {
                recipient: *walker_id,
                event: EVENT_ASSIGNMENT_CONFIRMED,
                notification: None,
                payload: json!({
                    "jobId": job_id,
                    "walkerId": walker_id,
                    "walkerName": walker_name,
                    "message": format!("You are assigned to \"{title}\""),
                }),
            },
        ],

        JobTransition::OnMyWay {
            job_id,
            title,
            owner_id,
            walker_id,
            walker_name,
        } => vec![Dispatch {
            recipient: *owner_id,
            event: EVENT_WALKER_ON_MY_WAY,
            notification: Some(KIND_ON_MY_WAY),
            payload: json!({
                "jobId": job_id,
                "walkerId": walker_id,
                "walkerName": walker_name,
                "message": format!("{walker_name} is on the way for \"{title}\""),
            }),
        }],

        JobTransition::PositionUpdated {
            job_id,
            owner_id,
            position,
        } => vec![Dispatch {
            recipient: *owner_id,
            event: EVENT_WALKER_POSITION_UPDATE,
            // Position pings are push-only; no inbox record.
            notification: None,
            payload: json!({
                "jobId": job_id,
                "position": position.to_pair(),
                "message": "Walker position updated",
            }),
        }],

        JobTransition::Completed {
            job_id,
            title,
            owner_id,
            walker_id,
            walker_name,
        } => vec![
            Dispatch {
                recipient: *owner_id,
                event: EVENT_JOB_COMPLETED,
                notification: Some(KIND_COMPLETED),
                payload: json!({
                    "jobId": job_id,
                    "walkerId": walker_id,
                    "walkerName": walker_name,
                    "message": format!("{walker_name} completed \"{title}\""),
                }),
            },
            Dispatch {
                recipient: *walker_id,
                event: EVENT_JOB_COMPLETED,
                notification: None,
                payload: json!({
                    "jobId": job_id,
                    "walkerId": walker_id,
                    "walkerName": walker_name,
                    "message": format!("You completed \"{title}\""),
                }),
            },
        ],

        JobTransition::Canceled {
            job_id,
            title,
            owner_id,
            walker_id,
            walker_name,
            canceled_by,
            reason,
        } => {
            let suffix = reason
                .as_deref()
                .map(|r| format!(" Reason: {r}"))
                .unwrap_or_default();

            let (owner_note, walker_note, owner_msg, walker_msg) = match canceled_by {
                CancelCaller::Owner => (
                    None,
                    Some(KIND_CANCELLATION),
                    format!("You canceled the assignment for \"{title}\""),
                    format!("The owner canceled your assignment for \"{title}\".{suffix}"),
                ),
                CancelCaller::AssignedWalker => (
                    Some(KIND_CANCELLATION),
                    None,
                    format!("{walker_name} canceled the assignment for \"{title}\".{suffix}"),
                    format!("You canceled your assignment for \"{title}\""),
                ),
            };

            vec![
                Dispatch {
                    recipient: *owner_id,
                    event: EVENT_ASSIGNMENT_CANCELED,
                    notification: owner_note,
                    payload: json!({
                        "jobId": job_id,
                        "walkerId": walker_id,
                        "walkerName": walker_name,
                        "message": owner_msg,
                    }),
                },
                Dispatch {
                    recipient: *walker_id,
                    event: EVENT_ASSIGNMENT_CANCELED,
                    notification: walker_note,
                    payload: json!({
                        "jobId": job_id,
                        "walkerId": walker_id,
                        "walkerName": walker_name,
                        "message": walker_msg,
                    }),
                },
            ]
        }
    }
}
