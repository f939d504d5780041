use crate::error::Result;
use crate::storage::LocalStorage;

use super::DraftState;

const DRAFT_KEY: &str = "workoutProgress";
const ACTIVE_WORKOUT_KEY: &str = "workoutId";

/// The single local draft slot and the id of the template it belongs to.
///
/// Each save overwrites the whole record, so the last write wins.
#[derive(Clone)]
pub struct DraftStore {
    storage: LocalStorage,
}

impl DraftStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Load the saved draft. A missing or unreadable record yields an empty draft.
    pub async fn load(&self) -> Result<DraftState> {
        let Some(raw) = self.storage.get_item(DRAFT_KEY).await? else {
            return Ok(DraftState::default());
        };

        match serde_json::from_str::<DraftState>(&raw) {
            Ok(mut draft) => {
                draft.sync_exercise_list();
                Ok(draft)
            }
            Err(e) => {
                tracing::error!("Error parsing saved draft: {}", e);
                Ok(DraftState::default())
            }
        }
    }

    pub async fn save(&self, draft: &DraftState) -> Result<()> {
        let raw = serde_json::to_string(draft)?;
        self.storage.set_item(DRAFT_KEY, &raw).await
    }

    pub async fn active_workout_id(&self) -> Result<Option<String>> {
        let Some(raw) = self.storage.get_item(ACTIVE_WORKOUT_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<String>(&raw) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                tracing::error!("Error parsing active workout id: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn set_active_workout_id(&self, workout_id: &str) -> Result<()> {
        let raw = serde_json::to_string(workout_id)?;
        self.storage.set_item(ACTIVE_WORKOUT_KEY, &raw).await
    }

    /// Remove both the draft and the active workout id.
    pub async fn clear(&self) -> Result<()> {
        self.storage.remove_item(ACTIVE_WORKOUT_KEY).await?;
        self.storage.remove_item(DRAFT_KEY).await
    }
}
