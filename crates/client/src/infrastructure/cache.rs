//! Single-slot cache with time-based expiry.
//!
//! Holds at most one value together with the wall-clock time it was captured.
//! Time is passed in by the caller so expiry follows whatever `ClockPort` the
//! owner was built with.
//!
//! Every `clear()` starts a new generation. A writer that read the generation
//! before doing slow work can only store its result if no clear happened in
//! between.

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

/// A thread-safe single value with time-to-live expiration.
///
/// An expired value is never returned, but stays in the slot until it is
/// replaced or cleared.
pub struct ExpiringSlot<V> {
    state: RwLock<SlotState<V>>,
    ttl: Duration,
}

struct SlotState<V> {
    entry: Option<SlotEntry<V>>,
    generation: u64,
}

struct SlotEntry<V> {
    value: V,
    captured_at: DateTime<Utc>,
}

impl<V> ExpiringSlot<V>
where
    V: Clone + Send + Sync,
{
    /// Create an empty slot with the specified TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: RwLock::new(SlotState {
                entry: None,
                generation: 0,
            }),
            ttl,
        }
    }

    /// Current generation, to be handed back to `insert_if_current`.
    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    /// Store a value only if the slot was not cleared since `generation` was read.
    ///
    /// Returns whether the value was stored.
    pub async fn insert_if_current(&self, value: V, now: DateTime<Utc>, generation: u64) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return false;
        }
        state.entry = Some(SlotEntry {
            value,
            captured_at: now,
        });
        true
    }

    /// Get the value if the slot is populated and younger than the TTL at `now`.
    ///
    /// A capture time in the future (clock moved backwards) counts as expired.
    pub async fn get(&self, now: DateTime<Utc>) -> Option<V> {
        let state = self.state.read().await;
        state.entry.as_ref().and_then(|entry| {
            let age = now - entry.captured_at;
            if age >= Duration::zero() && age < self.ttl {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    /// Empty the slot and start a new generation.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.entry = None;
        state.generation = state.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
    }

    async fn put<V: Clone + Send + Sync>(slot: &ExpiringSlot<V>, value: V, at: DateTime<Utc>) {
        let generation = slot.generation().await;
        assert!(slot.insert_if_current(value, at, generation).await);
    }

    #[tokio::test]
    async fn empty_slot_returns_none() {
        let slot: ExpiringSlot<i32> = ExpiringSlot::new(Duration::minutes(5));
        assert_eq!(slot.get(t0()).await, None);
    }

    #[tokio::test]
    async fn returns_value_within_ttl() {
        let slot = ExpiringSlot::new(Duration::minutes(5));
        put(&slot, vec![1, 2], t0()).await;

        assert_eq!(slot.get(t0()).await, Some(vec![1, 2]));
        assert_eq!(
            slot.get(t0() + Duration::minutes(4) + Duration::seconds(59)).await,
            Some(vec![1, 2])
        );
    }

    #[tokio::test]
    async fn expires_exactly_at_ttl() {
        let slot = ExpiringSlot::new(Duration::minutes(5));
        put(&slot, 42, t0()).await;

        assert_eq!(slot.get(t0() + Duration::minutes(5)).await, None);
    }

    #[tokio::test]
    async fn clock_moving_backwards_expires_entry() {
        let slot = ExpiringSlot::new(Duration::minutes(5));
        put(&slot, 42, t0()).await;

        assert_eq!(slot.get(t0() - Duration::seconds(1)).await, None);
        assert_eq!(slot.get(t0() + Duration::seconds(1)).await, Some(42));
    }

    #[tokio::test]
    async fn insert_resets_capture_time() {
        let slot = ExpiringSlot::new(Duration::minutes(5));
        put(&slot, 1, t0()).await;
        put(&slot, 2, t0() + Duration::minutes(4)).await;

        assert_eq!(slot.get(t0() + Duration::minutes(8)).await, Some(2));
    }

    #[tokio::test]
    async fn clear_empties_slot() {
        let slot = ExpiringSlot::new(Duration::minutes(5));
        put(&slot, 7, t0()).await;
        slot.clear().await;

        assert_eq!(slot.get(t0()).await, None);
    }

    #[tokio::test]
    async fn insert_after_clear_with_stale_generation_is_dropped() {
        let slot = ExpiringSlot::new(Duration::minutes(5));
        let before = slot.generation().await;

        slot.clear().await;
        assert!(!slot.insert_if_current("stale", t0(), before).await);
        assert_eq!(slot.get(t0()).await, None);

        let current = slot.generation().await;
        assert!(slot.insert_if_current("fresh", t0(), current).await);
        assert_eq!(slot.get(t0()).await, Some("fresh"));
    }
}
