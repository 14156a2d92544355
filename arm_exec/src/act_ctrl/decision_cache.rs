//! Decision cache
//!
//! Time-bounded memo of policy oracle responses, keyed on a quantized
//! projection of the perception snapshot. Quantization maps near-identical
//! sensor noise onto the same key so that repeated consultations in a stable
//! situation are served locally instead of going back to the oracle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

// Internal
use arm_if::ctrl::{ActionLabel, ArmState};
use arm_if::sense::{PerceptionSnapshot, SensId};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A quantized projection of a perception snapshot.
///
/// Two snapshots with the same state and readings equal after rounding to the
/// configured precision produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    state: ArmState,
    readings: BTreeMap<SensId, Option<i64>>,
}

/// A cached decision and the time it was obtained.
#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    action: ActionLabel,
    created_at: Instant,
}

/// Maps quantized perception onto previously obtained decisions, with
/// per-entry expiry.
///
/// Growth is bounded in practice by the quantized key space; no eviction
/// beyond expiry is performed.
#[derive(Debug)]
pub struct DecisionCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CacheKey {
    /// Build a key from a snapshot, rounding each reading to `dp` decimal
    /// places. Absent readings stay absent rather than collapsing to zero.
    pub fn from_snapshot(snapshot: &PerceptionSnapshot, dp: u32) -> Self {
        let readings = snapshot
            .readings
            .iter()
            .map(|(id, value)| (*id, value.map(|v| quantize(v, dp))))
            .collect();

        Self {
            state: snapshot.state,
            readings,
        }
    }
}

impl DecisionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Look up an unexpired decision for the given key.
    ///
    /// An expired entry behaves as a miss and is removed.
    pub fn get(&mut self, key: &CacheKey, now: Instant) -> Option<ActionLabel> {
        match self.entries.get(key) {
            Some(entry) if now.saturating_duration_since(entry.created_at) <= self.ttl => {
                Some(entry.action)
            }
            Some(_) => {
                trace!("Decision cache entry expired for {:?}", key);
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store or overwrite the decision for the given key, stamped at `now`.
    pub fn put(&mut self, key: CacheKey, action: ActionLabel, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                action,
                created_at: now,
            },
        );
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Round a reading to `dp` decimal places, as a scaled integer so the result
/// can be hashed.
fn quantize(value: f64, dp: u32) -> i64 {
    (value * 10f64.powi(dp as i32)).round() as i64
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn snapshot(state: ArmState, distance: Option<f64>, position: Option<f64>) -> PerceptionSnapshot {
        let mut readings = BTreeMap::new();
        readings.insert(SensId::Distance, distance);
        readings.insert(SensId::WristPosition, position);
        PerceptionSnapshot::new(state, readings)
    }

    #[test]
    fn test_quantized_keys_merge_noise() {
        let a = CacheKey::from_snapshot(
            &snapshot(ArmState::Waiting, Some(899.996), Some(0.1204)),
            2,
        );
        let b = CacheKey::from_snapshot(
            &snapshot(ArmState::Waiting, Some(900.001), Some(0.1199)),
            2,
        );
        assert_eq!(a, b);

        // A different state must never share a key
        let c = CacheKey::from_snapshot(
            &snapshot(ArmState::Rotating, Some(900.001), Some(0.1199)),
            2,
        );
        assert_ne!(a, c);

        // Nor may a change above the quantization step
        let d = CacheKey::from_snapshot(
            &snapshot(ArmState::Waiting, Some(900.02), Some(0.1199)),
            2,
        );
        assert_ne!(a, d);
    }

    #[test]
    fn test_absent_reading_distinct_from_zero() {
        let absent = CacheKey::from_snapshot(&snapshot(ArmState::Waiting, None, Some(0.0)), 2);
        let zero = CacheKey::from_snapshot(&snapshot(ArmState::Waiting, Some(0.0), Some(0.0)), 2);
        assert_ne!(absent, zero);
    }

    #[test]
    fn test_get_put() {
        let mut cache = DecisionCache::new(Duration::from_secs(300));
        let now = Instant::now();
        let key = CacheKey::from_snapshot(&snapshot(ArmState::Waiting, Some(900.0), None), 2);

        assert_eq!(cache.get(&key, now), None);

        cache.put(key.clone(), ActionLabel::Rotate, now);
        assert_eq!(cache.get(&key, now), Some(ActionLabel::Rotate));

        // Overwrite wins
        cache.put(key.clone(), ActionLabel::Wait, now);
        assert_eq!(cache.get(&key, now), Some(ActionLabel::Wait));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expiry() {
        let ttl = Duration::from_secs(300);
        let mut cache = DecisionCache::new(ttl);
        let created = Instant::now();
        let key = CacheKey::from_snapshot(&snapshot(ArmState::Waiting, Some(450.0), None), 2);

        cache.put(key.clone(), ActionLabel::Grasp, created);

        // Valid up to and including the TTL boundary
        assert_eq!(
            cache.get(&key, created + ttl),
            Some(ActionLabel::Grasp)
        );

        // One tick past the boundary it behaves as a miss and is dropped
        assert_eq!(
            cache.get(&key, created + ttl + Duration::from_millis(1)),
            None
        );
        assert!(cache.is_empty());
    }
}
