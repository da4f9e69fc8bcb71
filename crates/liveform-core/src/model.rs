//! Data model for the form validation system
//!
//! Raw field state, the derived password status, and the event/output
//! types the engine publishes.

use tokio::sync::watch;

/// A form field identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The username field
    Username,
    /// The password field
    Password,
    /// The repeated password field
    PasswordAgain,
}

impl Field {
    /// Stable name used in logs and the stdin protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Password => "password",
            Field::PasswordAgain => "password_again",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents one raw field edit
///
/// Raw capture is never debounced; every edit produces one event carrying
/// the full new value of the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// Which field changed
    pub field: Field,
    /// The full new value of the field
    pub value: String,
}

impl FieldChange {
    /// Create a new field change event
    pub fn new(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Current raw values of all three fields
///
/// Lifetime is one engine run; nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub username: String,
    pub password: String,
    pub password_again: String,
}

impl FormSnapshot {
    /// Get the current value of a field
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Password => &self.password,
            Field::PasswordAgain => &self.password_again,
        }
    }

    /// Replace the value of a field
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Username => self.username = value,
            Field::Password => self.password = value,
            Field::PasswordAgain => self.password_again = value,
        }
    }
}

/// Validation outcome of the password fields
///
/// Derived by the engine, never set directly. The variant order is the
/// derivation priority: emptiness wins over strength, strength over the
/// repeat mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStatus {
    /// The password field is empty
    Empty,
    /// The password fails the strength rule
    NotStrongEnough,
    /// The two password fields differ
    RepeatedPasswordWrong,
    /// The password passes every check
    Valid,
}

impl PasswordStatus {
    /// The inline error message shown for this status
    ///
    /// Empty exactly when the status is `Valid`.
    pub fn message(&self) -> &'static str {
        match self {
            PasswordStatus::Empty => "Password cannot be empty!",
            PasswordStatus::NotStrongEnough => "Password is too weak!",
            PasswordStatus::RepeatedPasswordWrong => "Passwords do not match",
            PasswordStatus::Valid => "",
        }
    }
}

/// One of the four debounced checks the engine runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// Username length check
    Username,
    /// Password strength check
    Strength,
    /// Password emptiness check
    Empty,
    /// Passwords-equal check
    Equal,
}

/// Events emitted by the FormEngine for external monitoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// Engine started and armed its initial evaluation timers
    Started,

    /// A debounced check fired and produced a result
    CheckEvaluated {
        check: CheckKind,
        passed: bool,
    },

    /// A new password status was derived
    StatusChanged {
        status: PasswordStatus,
    },

    /// Overall form validity was recomputed
    ValidityChanged {
        is_valid: bool,
    },

    /// Engine stopped
    Stopped {
        reason: String,
    },
}

/// Read side of the engine's two observable outputs
///
/// Front-ends bind the inline error label to `inline_error` and the
/// submit control's enabled state to `is_valid`.
#[derive(Debug, Clone)]
pub struct FormOutputs {
    /// Inline error for the password section; `""` when there is nothing to show
    pub inline_error: watch::Receiver<String>,
    /// Whether the form may be submitted
    pub is_valid: watch::Receiver<bool>,
}
