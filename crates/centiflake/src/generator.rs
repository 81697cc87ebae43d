use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{BoxError, CENTIFLAKE_EPOCH, Error, FlakeId, SettingsError, SystemClock, TICK, TickSource};

type IdProvider = Box<dyn FnOnce() -> Result<u8, BoxError>>;
type IdValidator = Box<dyn Fn(u8) -> bool>;

/// Construction-time configuration for a [`LockFlakeGenerator`].
///
/// All knobs are optional:
///
/// - `epoch`: tick zero. Defaults to [`CENTIFLAKE_EPOCH`]. Must not be ahead
///   of the current time.
/// - machine/service ID providers: nullary closures evaluated exactly once
///   during [`build`]. Absent providers default the ID to 0.
/// - machine/service ID validators: predicates over the obtained IDs. Absent
///   validators accept anything.
///
/// Providers and validators are how deployments plug in their own identity
/// assignment (hostname hash, env var, allocation service lookup); this
/// crate never coordinates IDs itself.
///
/// # Example
///
/// ```
/// use centiflake::Settings;
///
/// let generator = Settings::new()
///     .machine_id(|| Ok(7))
///     .check_machine_id(|id| id < 32)
///     .build()
///     .expect("valid settings");
/// assert_eq!(generator.machine_id(), 7);
/// ```
///
/// [`build`]: Settings::build
#[derive(Default)]
pub struct Settings {
    epoch: Option<SystemTime>,
    machine_id: Option<IdProvider>,
    service_id: Option<IdProvider>,
    check_machine_id: Option<IdValidator>,
    check_service_id: Option<IdValidator>,
}

impl Settings {
    /// Creates an empty configuration: default epoch, both IDs 0, no
    /// validation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the epoch start instant (tick zero).
    #[must_use]
    pub fn epoch(mut self, start: SystemTime) -> Self {
        self.epoch = Some(start);
        self
    }

    /// Sets the machine-ID provider.
    #[must_use]
    pub fn machine_id(mut self, provide: impl FnOnce() -> Result<u8, BoxError> + 'static) -> Self {
        self.machine_id = Some(Box::new(provide));
        self
    }

    /// Sets the service-ID provider.
    #[must_use]
    pub fn service_id(mut self, provide: impl FnOnce() -> Result<u8, BoxError> + 'static) -> Self {
        self.service_id = Some(Box::new(provide));
        self
    }

    /// Sets both IDs to fixed values. Shorthand for constant providers.
    #[must_use]
    pub fn with_ids(self, machine_id: u8, service_id: u8) -> Self {
        self.machine_id(move || Ok(machine_id))
            .service_id(move || Ok(service_id))
    }

    /// Sets the machine-ID validator.
    #[must_use]
    pub fn check_machine_id(mut self, check: impl Fn(u8) -> bool + 'static) -> Self {
        self.check_machine_id = Some(Box::new(check));
        self
    }

    /// Sets the service-ID validator.
    #[must_use]
    pub fn check_service_id(mut self, check: impl Fn(u8) -> bool + 'static) -> Self {
        self.check_service_id = Some(Box::new(check));
        self
    }

    /// Consumes the settings and constructs a generator on the wall clock.
    ///
    /// Providers run exactly once, here. Every rejection cause yields an
    /// error instead of a generator, so a successfully built instance is
    /// fully validated.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::EpochInFuture`] if the epoch is ahead of the
    ///   current time
    /// - [`SettingsError::MachineIdProvider`] /
    ///   [`SettingsError::ServiceIdProvider`] if a provider fails
    /// - [`SettingsError::MachineIdRejected`] /
    ///   [`SettingsError::ServiceIdRejected`] if a validator refuses the
    ///   obtained ID
    pub fn build(self) -> Result<LockFlakeGenerator<SystemClock>, SettingsError> {
        let start = self.epoch.unwrap_or(UNIX_EPOCH + CENTIFLAKE_EPOCH);
        if start > SystemTime::now() {
            return Err(SettingsError::EpochInFuture);
        }

        let machine_id = match self.machine_id {
            Some(provide) => provide().map_err(SettingsError::MachineIdProvider)?,
            None => 0,
        };
        let service_id = match self.service_id {
            Some(provide) => provide().map_err(SettingsError::ServiceIdProvider)?,
            None => 0,
        };

        if let Some(check) = &self.check_machine_id {
            if !check(machine_id) {
                return Err(SettingsError::MachineIdRejected { machine_id });
            }
        }
        if let Some(check) = &self.check_service_id {
            if !check(service_id) {
                return Err(SettingsError::ServiceIdRejected { service_id });
            }
        }

        // Pre-1970 epochs clamp to the Unix origin; the tick space is
        // unsigned.
        let epoch = start
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        Ok(LockFlakeGenerator::with_clock(
            machine_id,
            service_id,
            SystemClock::with_epoch(epoch),
        ))
    }
}

/// Mutable issuance state: the last tick an ID was issued at and the
/// sequence within it.
struct State {
    elapsed: u64,
    sequence: u16,
}

/// A lock-based ID generator for multi-threaded use.
///
/// State lives in an [`Arc<Mutex<_>>`], so clones share one tick/sequence
/// stream and issuance is serialized end to end: concurrent callers each
/// observe a consistent read-modify-write of the state, which yields a total
/// order of distinct IDs.
///
/// When 4096 IDs have been issued within one tick, the next call advances
/// the tick early and sleeps (holding the lock) until the wall clock catches
/// up, so no ID is ever issued ahead of real time. This bounds throughput to
/// 409,600 IDs/sec per (machine, service) pair.
pub struct LockFlakeGenerator<T>
where
    T: TickSource,
{
    state: Arc<Mutex<State>>,
    machine_id: u64,
    service_id: u64,
    clock: T,
}

impl<T> Clone for LockFlakeGenerator<T>
where
    T: TickSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            machine_id: self.machine_id,
            service_id: self.service_id,
            clock: self.clock.clone(),
        }
    }
}

impl<T> LockFlakeGenerator<T>
where
    T: TickSource,
{
    /// Creates a generator from pre-resolved IDs and an explicit tick
    /// source.
    ///
    /// [`Settings::build`] is the validated front door for production use;
    /// this constructor exists for callers that manage identity themselves
    /// and for tests that substitute a mock clock. IDs are masked to their
    /// 5-bit field width.
    ///
    /// The sequence starts at its maximum so the very first issuance is
    /// forced through the fresh-tick reset rather than reusing a stale
    /// counter.
    #[must_use]
    pub fn with_clock(machine_id: u8, service_id: u8, clock: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                elapsed: 0,
                sequence: FlakeId::SEQUENCE_MASK as u16,
            })),
            machine_id: u64::from(machine_id) & FlakeId::MACHINE_ID_MASK,
            service_id: u64::from(service_id) & FlakeId::SERVICE_ID_MASK,
            clock,
        }
    }

    /// The machine ID encoded into every issued ID.
    #[must_use]
    pub fn machine_id(&self) -> u64 {
        self.machine_id
    }

    /// The service ID encoded into every issued ID.
    #[must_use]
    pub fn service_id(&self) -> u64 {
        self.service_id
    }

    /// Issues the next unique ID.
    ///
    /// Blocks the calling thread in two cases: while another caller holds
    /// the generator lock, and for at most slightly over one tick when the
    /// current tick's sequence space is exhausted.
    ///
    /// # Errors
    ///
    /// - [`Error::EpochExhausted`] once the elapsed tick count exceeds the
    ///   41-bit budget. State keeps advancing, so the failure is permanent
    ///   for this instance.
    /// - [`Error::LockPoisoned`] if a previous holder of the lock panicked.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<FlakeId, Error> {
        let mut state = self.state.lock()?;

        let current = self.clock.current_ticks();
        if current > state.elapsed {
            state.elapsed = current;
            state.sequence = 0;
        } else {
            // Same tick, or the clock ran backwards: keep issuing against
            // the last recorded tick.
            state.sequence = (state.sequence + 1) & FlakeId::SEQUENCE_MASK as u16;
            if state.sequence == 0 {
                // Sequence space exhausted: claim the next tick and wait for
                // the wall clock to reach it before handing the ID out.
                state.elapsed += 1;
                let overtime = state.elapsed - current;
                thread::sleep(Self::catch_up(overtime, self.clock.until_next_tick()));
            }
        }

        if state.elapsed > FlakeId::max_timestamp() {
            return Err(Error::EpochExhausted);
        }
        Ok(FlakeId::from_parts(
            state.elapsed,
            self.machine_id,
            self.service_id,
            u64::from(state.sequence),
        ))
    }

    /// Time to sleep so that `overtime` claimed ticks are behind the wall
    /// clock: the whole ticks beyond the next boundary, plus the remainder
    /// of the current one.
    fn catch_up(overtime: u64, until_next_tick: Duration) -> Duration {
        let whole = u32::try_from(overtime.saturating_sub(1)).unwrap_or(u32::MAX);
        TICK.saturating_mul(whole).saturating_add(until_next_tick)
    }
}
