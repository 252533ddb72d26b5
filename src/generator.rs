//! Monotonic generators for both identifier kinds.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex, MutexGuard,
};

use crate::timestamp::{StdSystemTime, TimeSource};
use crate::{ulid, ulid64, Ulid, Ulid64};

#[cfg(feature = "global_gen")]
pub use thread_rand::ThreadRandSource;

/// A trait that defines the minimum random number generator interface for the generators.
///
/// Implementations are shared between threads through `&self` and must produce
/// cryptographically strong bytes.
pub trait RandSource {
    /// Fills `dest` with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);
}

impl<R: RandSource + ?Sized> RandSource for &R {
    fn fill_bytes(&self, dest: &mut [u8]) {
        (**self).fill_bytes(dest)
    }
}

/// Represents a [`Ulid`] generator that guarantees the monotonic order of identifiers generated
/// within the same millisecond.
///
/// The last timestamp and random field live behind a mutex, so calls from any number of threads
/// are serialized: a call that observes the same millisecond as the preceding one returns the
/// preceding random field plus one (wrapping at 80 bits), and any other call draws a fresh 80-bit
/// random field. Ordering across milliseconds relies on the timestamp alone; if the clock moves
/// backwards, the generator simply starts over from a fresh random field.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "global_gen")]
/// # {
/// use monoulid::UlidGenerator;
/// use std::{sync::Arc, thread};
///
/// let g = Arc::new(UlidGenerator::new());
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.generate(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// # }
/// ```
#[derive(Debug)]
pub struct UlidGenerator<R, T = StdSystemTime> {
    state: Mutex<UlidState>,

    /// The random number generator used by the generator.
    rand_source: R,

    /// The system clock used by the generator.
    time_source: T,
}

#[derive(Clone, Copy, Debug)]
struct UlidState {
    timestamp: u64,
    random: u128,
}

impl<R: RandSource, T: TimeSource> UlidGenerator<R, T> {
    /// Creates a generator object with specified random number generator and system clock.
    pub const fn with_rand_and_time_sources(rand_source: R, time_source: T) -> Self {
        Self {
            state: Mutex::new(UlidState {
                timestamp: 0,
                random: 0,
            }),
            rand_source,
            time_source,
        }
    }

    /// Generates a new [`Ulid`] from the current timestamp.
    pub fn generate(&self) -> Ulid {
        self.generate_core(self.time_source.unix_ts_ms())
    }

    /// Generates a new [`Ulid`] from the `unix_ts_ms` passed.
    ///
    /// Bits of `unix_ts_ms` above the 48-bit range are ignored.
    pub fn generate_core(&self, unix_ts_ms: u64) -> Ulid {
        let timestamp = unix_ts_ms & ulid::MAX_TIMESTAMP;
        let mut state = self.lock_state();
        if timestamp == state.timestamp {
            state.random = (state.random + 1) & ulid::MAX_RANDOM;
            if state.random == 0 {
                crate::debug_event!(
                    timestamp,
                    "80-bit random field wrapped around within one millisecond"
                );
            }
        } else {
            // the draw may panic; leave the state untouched until it succeeds
            let random = self.next_random();
            *state = UlidState { timestamp, random };
        }
        Ulid::from_fields(timestamp, state.random)
    }

    /// Draws an 80-bit random field.
    fn next_random(&self) -> u128 {
        let mut bytes = [0u8; 16];
        self.rand_source.fill_bytes(&mut bytes[..10]);
        u128::from_le_bytes(bytes)
    }

    /// Acquires the state lock, recovering the plain-data state if a previous holder panicked.
    fn lock_state(&self) -> MutexGuard<'_, UlidState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            crate::warn_event!("recovering generator state from a poisoned lock");
            poisoned.into_inner()
        })
    }
}

/// Represents a [`Ulid64`] generator that guarantees the monotonic order of identifiers
/// generated within the same millisecond, up to 65,536 identifiers per millisecond.
///
/// The last identifier is kept in a single atomic word and updated with a compare-and-swap loop,
/// so the generator never blocks and concurrent callers never observe the same state twice. The
/// 16-bit random field has no carry target: past `0xffff` it wraps to zero without notice, and
/// identifiers minted after the wrap sort before earlier ones of the same millisecond.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "global_gen")]
/// # {
/// use monoulid::Ulid64Generator;
///
/// let g = Ulid64Generator::new();
/// let (a, b) = (g.generate(), g.generate());
/// assert!(a.timestamp() <= b.timestamp());
/// # }
/// ```
#[derive(Debug)]
pub struct Ulid64Generator<R, T = StdSystemTime> {
    state: AtomicU64,

    /// The random number generator used by the generator.
    rand_source: R,

    /// The system clock used by the generator.
    time_source: T,
}

impl<R: RandSource, T: TimeSource> Ulid64Generator<R, T> {
    /// Creates a generator object with specified random number generator and system clock.
    pub const fn with_rand_and_time_sources(rand_source: R, time_source: T) -> Self {
        Self {
            state: AtomicU64::new(0),
            rand_source,
            time_source,
        }
    }

    /// Generates a new [`Ulid64`] from the current timestamp.
    pub fn generate(&self) -> Ulid64 {
        self.generate_core(self.time_source.unix_ts_ms())
    }

    /// Generates a new [`Ulid64`] from the `unix_ts_ms` passed.
    ///
    /// Bits of `unix_ts_ms` above the 48-bit range are ignored.
    pub fn generate_core(&self, unix_ts_ms: u64) -> Ulid64 {
        let timebits = (unix_ts_ms & ulid64::MAX_TIMESTAMP) << 16;
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let same_ms = current & !0xffff == timebits;
            let next = if same_ms {
                timebits | (current.wrapping_add(1) & 0xffff)
            } else {
                timebits | self.next_random() as u64
            };
            match self.state.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    if same_ms && next & 0xffff == 0 {
                        crate::debug_event!(
                            timestamp = timebits >> 16,
                            "16-bit random field wrapped around within one millisecond"
                        );
                    }
                    return Ulid64::from_u64(next);
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Draws a 16-bit random field.
    fn next_random(&self) -> u16 {
        let mut bytes = [0u8; 2];
        self.rand_source.fill_bytes(&mut bytes);
        u16::from_le_bytes(bytes)
    }
}

#[cfg(feature = "global_gen")]
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
mod default_sources {
    use super::{StdSystemTime, ThreadRandSource, Ulid64Generator, UlidGenerator};

    impl UlidGenerator<ThreadRandSource> {
        /// Creates a generator object with the per-thread random number generator and the system
        /// clock.
        pub const fn new() -> Self {
            Self::with_rand_and_time_sources(ThreadRandSource, StdSystemTime)
        }
    }

    impl Default for UlidGenerator<ThreadRandSource> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Ulid64Generator<ThreadRandSource> {
        /// Creates a generator object with the per-thread random number generator and the system
        /// clock.
        pub const fn new() -> Self {
            Self::with_rand_and_time_sources(ThreadRandSource, StdSystemTime)
        }
    }

    impl Default for Ulid64Generator<ThreadRandSource> {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(feature = "global_gen")]
mod thread_rand {
    use std::cell::RefCell;

    use rand::rngs::{adapter::ReseedingRng, OsRng};
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha12Core;

    use super::RandSource;

    thread_local! {
        static RNG: RefCell<ReseedingRng<ChaCha12Core, OsRng>> = RefCell::new(
            ReseedingRng::new(ChaCha12Core::from_entropy(), 1024 * 64, OsRng),
        );
    }

    /// The default [`RandSource`] that draws from a lazily initialized, per-thread ChaCha12
    /// generator periodically reseeded from the operating system.
    ///
    /// No random state is shared between threads.
    #[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
    pub struct ThreadRandSource;

    impl RandSource for ThreadRandSource {
        fn fill_bytes(&self, dest: &mut [u8]) {
            RNG.with(|rng| rng.borrow_mut().fill_bytes(dest))
        }
    }
}

/// Supports operations as an infinite iterator that produces a new [`Ulid`] for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "global_gen")]
/// # {
/// use monoulid::UlidGenerator;
///
/// UlidGenerator::new()
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{i}] {e}"));
/// # }
/// ```
impl<R: RandSource, T: TimeSource> Iterator for UlidGenerator<R, T> {
    type Item = Ulid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource, T: TimeSource> std::iter::FusedIterator for UlidGenerator<R, T> {}

/// Supports operations as an infinite iterator that produces a new [`Ulid64`] for each call of
/// `next()`.
impl<R: RandSource, T: TimeSource> Iterator for Ulid64Generator<R, T> {
    type Item = Ulid64;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource, T: TimeSource> std::iter::FusedIterator for Ulid64Generator<R, T> {}
