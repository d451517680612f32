use std::error;
use std::fmt;

/// Convenient result type for drain operations using [`DrainError`] as the error type.
pub type DrainResult<T> = Result<T, DrainError>;

/// Main error type for drain operations.
///
/// Carries an [`ErrorKind`] for classification, a static description of the
/// failed operation, and optionally a dynamic detail string with the
/// underlying cause.
#[derive(Debug, Clone)]
pub struct DrainError {
    repr: ErrorRepr,
}

#[derive(Debug, Clone)]
enum ErrorRepr {
    /// Error with kind and static description.
    WithDescription(ErrorKind, &'static str),
    /// Error with kind, static description, and dynamic detail.
    WithDescriptionAndDetail(ErrorKind, &'static str, String),
}

/// Categories of failure the drain coordinator distinguishes.
///
/// The classification drives control flow: transient kinds are retried with
/// backoff, [`ErrorKind::LifecycleActionNotPending`] is a benign race on
/// completion, and everything else propagates.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The inbound notification is missing required lifecycle fields.
    MalformedEvent,

    /// A control plane call was rejected due to request rate limits.
    ControlPlaneThrottled,
    /// A control plane call failed to reach the service or timed out.
    ControlPlaneUnavailable,
    /// A control plane call was rejected by the service.
    ControlPlaneRequestFailed,

    /// The lifecycle action has already been completed or has expired.
    LifecycleActionNotPending,

    /// Unknown / uncategorized.
    Unknown,
}

impl DrainError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::WithDescription(kind, _)
            | ErrorRepr::WithDescriptionAndDetail(kind, _, _) => kind,
        }
    }

    /// Returns whether this error is expected to resolve on its own and is
    /// therefore safe to retry with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::ControlPlaneThrottled | ErrorKind::ControlPlaneUnavailable
        )
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        match self.repr {
            ErrorRepr::WithDescriptionAndDetail(_, _, ref detail) => Some(detail.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for DrainError {
    fn eq(&self, other: &DrainError) -> bool {
        self.kind() == other.kind()
    }
}

impl fmt::Display for DrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.repr {
            ErrorRepr::WithDescription(kind, desc) => {
                fmt::Debug::fmt(&kind, f)?;
                f.write_str(": ")?;
                desc.fmt(f)
            }
            ErrorRepr::WithDescriptionAndDetail(kind, desc, ref detail) => {
                fmt::Debug::fmt(&kind, f)?;
                f.write_str(": ")?;
                desc.fmt(f)?;
                f.write_str(" -> ")?;
                detail.fmt(f)
            }
        }
    }
}

impl error::Error for DrainError {}

/// Creates a [`DrainError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for DrainError {
    fn from((kind, desc): (ErrorKind, &'static str)) -> DrainError {
        DrainError {
            repr: ErrorRepr::WithDescription(kind, desc),
        }
    }
}

/// Creates a [`DrainError`] from an error kind, static description, and dynamic detail.
impl From<(ErrorKind, &'static str, String)> for DrainError {
    fn from((kind, desc, detail): (ErrorKind, &'static str, String)) -> DrainError {
        DrainError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, desc, detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_kinds_are_retryable() {
        let throttled: DrainError =
            (ErrorKind::ControlPlaneThrottled, "rate limited").into();
        let unavailable: DrainError =
            (ErrorKind::ControlPlaneUnavailable, "connect failed").into();
        let rejected: DrainError =
            (ErrorKind::ControlPlaneRequestFailed, "access denied").into();

        assert!(throttled.is_transient());
        assert!(unavailable.is_transient());
        assert!(!rejected.is_transient());
    }

    #[test]
    fn display_includes_detail_when_present() {
        let err: DrainError = (
            ErrorKind::MalformedEvent,
            "missing field",
            "EC2InstanceId".to_string(),
        )
            .into();

        let rendered = err.to_string();
        assert!(rendered.contains("missing field"));
        assert!(rendered.contains("EC2InstanceId"));
        assert_eq!(err.detail(), Some("EC2InstanceId"));
    }
}
