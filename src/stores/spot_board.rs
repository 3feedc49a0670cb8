use crate::core::error::SpotError;
use crate::device::client::DeviceClient;
use crate::models::spot::{SpotId, SpotReport, SpotStatus, SpotView};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// In-memory state of the parking spots.
///
/// Reserve and release hold the lock across the device call, so two
/// requests for the same spot can never both pass the precondition.
/// Nothing is persisted: a restart brings every spot back to free.
pub struct SpotBoard {
    spots: Mutex<[SpotStatus; 2]>,
}

impl SpotBoard {
    pub fn new() -> Self {
        Self {
            spots: Mutex::new([SpotStatus::Free; 2]),
        }
    }

    pub async fn status(&self, id: SpotId) -> SpotStatus {
        self.spots.lock().await[id.index()]
    }

    pub async fn snapshot(&self) -> Vec<SpotView> {
        let spots = self.spots.lock().await;
        SpotId::ALL
            .iter()
            .map(|id| SpotView::new(*id, spots[id.index()]))
            .collect()
    }

    /// Apply a device reading. Reserved spots keep their status, and
    /// spots whose phrase was not understood are left as they were.
    pub async fn refresh(&self, report: &SpotReport) {
        let mut spots = self.spots.lock().await;

        for id in SpotId::ALL {
            let current = &mut spots[id.index()];
            if *current == SpotStatus::Reserved {
                continue;
            }

            match report.get(id) {
                Some(reading) => *current = reading.status(),
                None => debug!(spot = %id, "Unrecognized occupancy phrase, keeping status"),
            }
        }
    }

    /// free → reserved, only after the controller accepted the command
    pub async fn reserve(&self, id: SpotId, device: &DeviceClient) -> Result<(), SpotError> {
        let mut spots = self.spots.lock().await;

        if spots[id.index()] != SpotStatus::Free {
            return Err(SpotError::NotReservable(id));
        }

        device.send_reserve(id).await?;
        spots[id.index()] = SpotStatus::Reserved;

        info!(spot = %id, "Spot reserved");
        Ok(())
    }

    /// reserved → free, only after the controller accepted the command
    pub async fn release(&self, id: SpotId, device: &DeviceClient) -> Result<(), SpotError> {
        let mut spots = self.spots.lock().await;

        if spots[id.index()] != SpotStatus::Reserved {
            return Err(SpotError::NotReserved(id));
        }

        device.send_release(id).await?;
        spots[id.index()] = SpotStatus::Free;

        info!(spot = %id, "Spot released");
        Ok(())
    }
}

impl Default for SpotBoard {
    fn default() -> Self {
        Self::new()
    }
}
