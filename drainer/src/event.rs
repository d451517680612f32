//! Decoding of autoscaling lifecycle notifications.
//!
//! The lifecycle hook publishes to an SNS topic and the service consumes the
//! subscribed SQS queue, so a message body is an SNS envelope whose `Message`
//! field is itself a serialized lifecycle event record. With raw message
//! delivery enabled the body is the record directly; both shapes are accepted.

use serde::Deserialize;

use crate::error::{DrainError, DrainResult, ErrorKind};

/// Marker value the autoscaling control plane sends when a topic subscription
/// is confirmed, carrying no instance to drain.
const TEST_NOTIFICATION_EVENT: &str = "autoscaling:TEST_NOTIFICATION";

/// A termination lifecycle event, decoded and validated.
///
/// Immutable once decoded; consumed by exactly one coordinator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationEvent {
    /// Raw EC2 identifier of the instance being terminated.
    pub ec2_instance_id: String,
    /// Name of the lifecycle hook that paused the termination.
    pub lifecycle_hook_name: String,
    /// One-time token identifying this specific lifecycle action.
    pub lifecycle_action_token: String,
    /// Name of the autoscaling group the instance belongs to.
    pub auto_scaling_group_name: String,
}

/// A successfully decoded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A termination lifecycle event that requires draining.
    Termination(TerminationEvent),
    /// An autoscaling test notification; nothing to drain.
    Test,
}

#[derive(Debug, Deserialize)]
struct SnsEnvelope {
    #[serde(rename = "Message")]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LifecycleRecord {
    #[serde(rename = "EC2InstanceId")]
    ec2_instance_id: Option<String>,
    #[serde(rename = "LifecycleHookName")]
    lifecycle_hook_name: Option<String>,
    #[serde(rename = "LifecycleActionToken")]
    lifecycle_action_token: Option<String>,
    #[serde(rename = "AutoScalingGroupName")]
    auto_scaling_group_name: Option<String>,
    #[serde(rename = "Event")]
    event: Option<String>,
}

/// Decodes an inbound notification body into a [`Notification`].
///
/// Returns [`ErrorKind::MalformedEvent`] when the body is not valid JSON or
/// the lifecycle record is missing a required field. The caller is expected
/// to log and drop malformed notifications without side effects.
pub fn decode_notification(body: &str) -> DrainResult<Notification> {
    let record = decode_record(body)?;

    if record.event.as_deref() == Some(TEST_NOTIFICATION_EVENT) {
        return Ok(Notification::Test);
    }

    let event = TerminationEvent {
        ec2_instance_id: require(record.ec2_instance_id, "EC2InstanceId")?,
        lifecycle_hook_name: require(record.lifecycle_hook_name, "LifecycleHookName")?,
        lifecycle_action_token: require(record.lifecycle_action_token, "LifecycleActionToken")?,
        auto_scaling_group_name: require(record.auto_scaling_group_name, "AutoScalingGroupName")?,
    };

    Ok(Notification::Termination(event))
}

fn decode_record(body: &str) -> DrainResult<LifecycleRecord> {
    // Prefer the enveloped shape; fall back to treating the body as the
    // record itself for raw message delivery.
    if let Ok(envelope) = serde_json::from_str::<SnsEnvelope>(body)
        && let Some(message) = envelope.message
    {
        return serde_json::from_str(&message).map_err(|err| {
            DrainError::from((
                ErrorKind::MalformedEvent,
                "lifecycle record inside the notification envelope is not valid JSON",
                err.to_string(),
            ))
        });
    }

    serde_json::from_str(body).map_err(|err| {
        DrainError::from((
            ErrorKind::MalformedEvent,
            "notification body is not a lifecycle notification",
            err.to_string(),
        ))
    })
}

fn require(field: Option<String>, name: &'static str) -> DrainResult<String> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(DrainError::from((
            ErrorKind::MalformedEvent,
            "lifecycle record is missing a required field",
            name.to_string(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enveloped(message: &str) -> String {
        serde_json::json!({
            "Type": "Notification",
            "TopicArn": "arn:aws:sns:us-east-1:123456789012:drain-hook",
            "Message": message,
        })
        .to_string()
    }

    #[test]
    fn decodes_termination_event_from_envelope() {
        let message = serde_json::json!({
            "LifecycleHookName": "drain-hook",
            "LifecycleActionToken": "token-1",
            "AutoScalingGroupName": "workers",
            "LifecycleTransition": "autoscaling:EC2_INSTANCE_TERMINATING",
            "EC2InstanceId": "i-0abc",
        })
        .to_string();

        let notification = decode_notification(&enveloped(&message)).unwrap();
        let Notification::Termination(event) = notification else {
            panic!("expected a termination event");
        };

        assert_eq!(event.ec2_instance_id, "i-0abc");
        assert_eq!(event.lifecycle_hook_name, "drain-hook");
        assert_eq!(event.lifecycle_action_token, "token-1");
        assert_eq!(event.auto_scaling_group_name, "workers");
    }

    #[test]
    fn decodes_raw_record_without_envelope() {
        let body = serde_json::json!({
            "LifecycleHookName": "drain-hook",
            "LifecycleActionToken": "token-2",
            "AutoScalingGroupName": "workers",
            "EC2InstanceId": "i-0def",
        })
        .to_string();

        let notification = decode_notification(&body).unwrap();
        assert!(matches!(notification, Notification::Termination(_)));
    }

    #[test]
    fn missing_instance_id_is_malformed() {
        let message = serde_json::json!({
            "LifecycleHookName": "drain-hook",
            "LifecycleActionToken": "token-3",
            "AutoScalingGroupName": "workers",
        })
        .to_string();

        let err = decode_notification(&enveloped(&message)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEvent);
        assert_eq!(err.detail(), Some("EC2InstanceId"));
    }

    #[test]
    fn empty_required_field_is_malformed() {
        let message = serde_json::json!({
            "LifecycleHookName": "",
            "LifecycleActionToken": "token-4",
            "AutoScalingGroupName": "workers",
            "EC2InstanceId": "i-0abc",
        })
        .to_string();

        let err = decode_notification(&enveloped(&message)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEvent);
    }

    #[test]
    fn test_notification_is_recognized() {
        let message = serde_json::json!({
            "Event": "autoscaling:TEST_NOTIFICATION",
            "AutoScalingGroupName": "workers",
        })
        .to_string();

        let notification = decode_notification(&enveloped(&message)).unwrap();
        assert_eq!(notification, Notification::Test);
    }

    #[test]
    fn garbage_body_is_malformed() {
        let err = decode_notification("not json at all").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEvent);
    }

    #[test]
    fn envelope_with_garbage_message_is_malformed() {
        let err = decode_notification(&enveloped("{broken")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEvent);
    }
}
