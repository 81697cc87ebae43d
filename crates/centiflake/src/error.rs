use core::fmt;
use std::sync::{MutexGuard, PoisonError};

/// Boxed error returned by machine/service ID providers.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Errors that ID issuance can emit.
///
/// Sequence exhaustion and clock regression are absorbed by the issuance
/// algorithm and never surface here; the only expected runtime failure is
/// running out of the 41-bit tick budget.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The elapsed tick count no longer fits in the 41-bit timestamp field
    /// (roughly 697 years past the configured epoch).
    ///
    /// Permanent for this generator: every subsequent call fails the same
    /// way until it is reconfigured with a later epoch.
    EpochExhausted,
    /// A thread panicked while holding the generator lock.
    LockPoisoned,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EpochExhausted => write!(f, "over the time limit"),
            Self::LockPoisoned => write!(f, "generator lock poisoned"),
        }
    }
}

impl core::error::Error for Error {}

impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

/// Reasons construction can refuse to produce a generator.
///
/// Any of these means no generator exists for the given [`Settings`]; the
/// configuration must be corrected before IDs can be issued.
///
/// [`Settings`]: crate::Settings
#[derive(Debug)]
#[non_exhaustive]
pub enum SettingsError {
    /// The epoch start is ahead of the current wall-clock time.
    EpochInFuture,
    /// The machine-ID provider reported a failure.
    MachineIdProvider(BoxError),
    /// The service-ID provider reported a failure.
    ServiceIdProvider(BoxError),
    /// The machine-ID validator rejected the obtained ID.
    MachineIdRejected {
        /// The ID the provider produced.
        machine_id: u8,
    },
    /// The service-ID validator rejected the obtained ID.
    ServiceIdRejected {
        /// The ID the provider produced.
        service_id: u8,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EpochInFuture => write!(f, "epoch start is ahead of the current time"),
            Self::MachineIdProvider(e) => write!(f, "machine-ID provider failed: {e}"),
            Self::ServiceIdProvider(e) => write!(f, "service-ID provider failed: {e}"),
            Self::MachineIdRejected { machine_id } => {
                write!(f, "machine ID {machine_id} rejected by validator")
            }
            Self::ServiceIdRejected { service_id } => {
                write!(f, "service ID {service_id} rejected by validator")
            }
        }
    }
}

impl core::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::MachineIdProvider(e) | Self::ServiceIdProvider(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
