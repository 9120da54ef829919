use super::alerts::BedObserver;
use super::domain::Ward;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Failure raised by [`BedManager::allocate`]. Allocation is the only
/// capacity operation that can reject.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    #[error("no beds available in {ward} ward: all {total} beds are occupied")]
    Exhausted { ward: Ward, total: u32 },
    #[error("{ward} ward is not tracked by the bed manager")]
    Untracked { ward: Ward },
}

#[derive(Debug, Clone, Copy)]
struct BedCount {
    total: u32,
    occupied: u32,
}

/// Per-ward bed capacity tracker.
///
/// Totals are fixed at construction and occupancy only moves through
/// [`allocate`](Self::allocate) and [`release`](Self::release), which keeps
/// `0 <= occupied <= total` for every ward. Every successful mutation
/// notifies the registered observers synchronously, in registration order,
/// with the post-mutation free/total pair. Notification is non-reentrant:
/// observers must not call back into the manager.
pub struct BedManager {
    beds: BTreeMap<Ward, BedCount>,
    observers: Vec<Arc<dyn BedObserver>>,
}

impl BedManager {
    pub fn new(capacities: BTreeMap<Ward, u32>) -> Self {
        let beds = capacities
            .into_iter()
            .map(|(ward, total)| (ward, BedCount { total, occupied: 0 }))
            .collect();
        Self {
            beds,
            observers: Vec::new(),
        }
    }

    pub fn register_observer(&mut self, observer: Arc<dyn BedObserver>) {
        self.observers.push(observer);
    }

    /// Removes a previously registered observer by pointer identity.
    /// Removing an observer that was never registered is a no-op.
    pub fn remove_observer(&mut self, observer: &Arc<dyn BedObserver>) {
        self.observers
            .retain(|registered| !Arc::ptr_eq(registered, observer));
    }

    /// Occupies one bed in `ward`, or fails with [`CapacityError::Exhausted`]
    /// without changing any state when the ward is full.
    pub fn allocate(&mut self, ward: Ward) -> Result<(), CapacityError> {
        let count = self
            .beds
            .get_mut(&ward)
            .ok_or(CapacityError::Untracked { ward })?;

        if count.occupied >= count.total {
            return Err(CapacityError::Exhausted {
                ward,
                total: count.total,
            });
        }

        count.occupied += 1;
        self.notify(ward);
        Ok(())
    }

    /// Frees one bed in `ward`. Releasing a ward with no occupied beds is a
    /// deliberate silent no-op and triggers no notification.
    pub fn release(&mut self, ward: Ward) {
        let Some(count) = self.beds.get_mut(&ward) else {
            return;
        };
        if count.occupied == 0 {
            return;
        }
        count.occupied -= 1;
        self.notify(ward);
    }

    pub fn total_beds(&self, ward: Ward) -> u32 {
        self.beds.get(&ward).map(|count| count.total).unwrap_or(0)
    }

    pub fn occupied_beds(&self, ward: Ward) -> u32 {
        self.beds
            .get(&ward)
            .map(|count| count.occupied)
            .unwrap_or(0)
    }

    pub fn free_beds(&self, ward: Ward) -> u32 {
        self.beds
            .get(&ward)
            .map(|count| count.total - count.occupied)
            .unwrap_or(0)
    }

    /// Occupancy as a percentage. A zero-capacity (or untracked) ward reads
    /// as 0%.
    pub fn occupancy_percent(&self, ward: Ward) -> f64 {
        match self.beds.get(&ward) {
            Some(count) if count.total > 0 => {
                (count.occupied as f64 / count.total as f64) * 100.0
            }
            _ => 0.0,
        }
    }

    fn notify(&self, ward: Ward) {
        let Some(count) = self.beds.get(&ward) else {
            return;
        };
        let free = count.total - count.occupied;
        for observer in &self.observers {
            observer.on_status_changed(ward, free, count.total);
        }
    }
}
