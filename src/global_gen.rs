//! Default generators and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use crate::generator::{ThreadRandSource, Ulid64Generator, UlidGenerator};
use crate::{Ulid, Ulid64};

static ULID_GEN: UlidGenerator<ThreadRandSource> = UlidGenerator::new();
static ULID64_GEN: Ulid64Generator<ThreadRandSource> = Ulid64Generator::new();

/// Generates a new [`Ulid`] object.
///
/// This function employs a process-wide generator and guarantees the monotonic order of
/// identifiers generated within the same millisecond across all threads.
///
/// # Examples
///
/// ```rust
/// let id = monoulid::ulid();
/// println!("{}", id); // e.g., "01HF7YBV2C5K8Q0RWS3T9MZJXA"
/// println!("{:?}", id.to_bytes()); // as 16-byte low-word-first array
///
/// let id_string: String = monoulid::ulid().to_string();
/// ```
pub fn ulid() -> Ulid {
    ULID_GEN.generate()
}

/// Generates a new [`Ulid64`] object.
///
/// This function employs a process-wide generator. Identifiers generated within the same
/// millisecond are ordered until the 16-bit random field wraps around, which happens silently
/// after 65,536 identifiers at most.
///
/// # Examples
///
/// ```rust
/// let id = monoulid::ulid64();
/// println!("{}", id); // e.g., "01HF7YBV2C0KQ"
/// println!("{}", id.lexic()); // e.g., "7YBV2C0KQ01HF"
/// ```
pub fn ulid64() -> Ulid64 {
    ULID64_GEN.generate()
}

#[cfg(test)]
mod tests_ulid {
    use super::ulid;

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| ulid().into()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let re = regex::Regex::new(r"^[0-7][0-9A-HJKMNP-TV-Z]{25}$").unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e), "{e}");
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Generates sortable string representation by creation time
    #[test]
    fn generates_sortable_string_representation_by_creation_time() {
        SAMPLES.with(|samples| {
            for i in 1..N_SAMPLES {
                assert!(samples[i - 1] < samples[i]);
            }
        });
    }

    /// Decodes what it generates
    #[test]
    fn decodes_what_it_generates() {
        SAMPLES.with(|samples| {
            for e in samples.iter().step_by(97) {
                let id: crate::Ulid = e.parse().unwrap();
                assert_eq!(&id.encode() as &str, e.as_str());
                assert_eq!(crate::Ulid::parse_prettified(&id.prettify()), Ok(id));
            }
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use std::time;
        for _ in 0..10_000 {
            let ts_now = (time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis()) as i64;
            let timestamp = ulid().timestamp() as i64;
            assert!((ts_now - timestamp).abs() < 16);
        }
    }

    /// Generates no duplicates under multithreading
    #[test]
    fn generates_no_duplicates_under_multithreading() -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        tx.send(ulid()).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert(e);
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }
}

#[cfg(test)]
mod tests_ulid64 {
    use super::ulid64;

    const N_SAMPLES: usize = 10_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| ulid64().into()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let re = regex::Regex::new(r"^[0-9A-F][0-9A-HJKMNP-TV-Z]{12}$").unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e), "{e}");
            }
        });
    }

    /// Encodes non-decreasing timestamps in creation order
    #[test]
    fn encodes_non_decreasing_timestamps_in_creation_order() {
        SAMPLES.with(|samples| {
            let timestamps: Vec<u64> = samples
                .iter()
                .map(|e| e.parse::<crate::Ulid64>().unwrap().timestamp())
                .collect();
            for i in 1..N_SAMPLES {
                assert!(timestamps[i - 1] <= timestamps[i]);
            }
        });
    }

    /// Decodes what it generates in both forms
    #[test]
    fn decodes_what_it_generates_in_both_forms() {
        SAMPLES.with(|samples| {
            for e in samples {
                let id: crate::Ulid64 = e.parse().unwrap();
                assert_eq!(&id.encode() as &str, e.as_str());
                assert_eq!(crate::Ulid64::parse_lexic(&id.lexic()), Ok(id));
            }
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use std::time;
        for _ in 0..10_000 {
            let ts_now = (time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis()) as i64;
            let timestamp = ulid64().timestamp() as i64;
            assert!((ts_now - timestamp).abs() < 16);
        }
    }
}
