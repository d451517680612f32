//! Macros for drain error handling.
//!
//! Convenience macros for creating and returning [`crate::error::DrainError`]
//! instances with reduced boilerplate.

/// Creates a [`crate::error::DrainError`] from error kind and description.
#[macro_export]
macro_rules! drain_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::DrainError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::error::DrainError::from(($kind, $desc, $detail.to_string()))
    };
}

/// Creates and returns a [`crate::error::DrainError`] from the current function.
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return Err($crate::drain_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        return Err($crate::drain_error!($kind, $desc, $detail))
    };
}
