//! Nutrition Auto-fill MCP Tools
//!
//! The lookup itself runs outside the tracker lock (see the MCP server);
//! these functions shape its outcome and manage the resulting draft.

use serde::Serialize;

use super::error_message;
use crate::models::{FoodItem, FoodItemDraft};
use crate::store::KeyValueStore;
use crate::tracker::{Tracker, TrackerResult};

/// Response for lookup_nutrition and get_nutrition_draft
#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft: Option<FoodItemDraft>,
    /// Whether a lookup is still outstanding
    pub pending: bool,
    pub message: String,
}

/// Response for submit_nutrition_draft
#[derive(Debug, Serialize)]
pub struct SubmitDraftResponse {
    pub item: FoodItem,
    pub logged: bool,
    pub date: String,
}

/// Shape a finished lookup into a tool response
pub fn lookup_response<S: KeyValueStore>(
    tracker: &Tracker<S>,
    result: TrackerResult<FoodItemDraft>,
) -> Result<DraftResponse, String> {
    let draft = result.map_err(error_message)?;
    Ok(DraftResponse {
        message: format!(
            "Nutrition for '{}' is ready for review. Submit it to add it to the catalog.",
            draft.name
        ),
        draft: Some(draft),
        pending: tracker.draft().is_busy(),
    })
}

/// The current draft, if any
pub fn get_draft<S: KeyValueStore>(tracker: &Tracker<S>) -> DraftResponse {
    let slot = tracker.draft();
    let message = match (slot.draft(), slot.is_busy()) {
        (_, true) => "A nutrition lookup is in progress.",
        (Some(_), false) => "Draft ready for review.",
        (None, false) => "No nutrition draft. Run a lookup first.",
    };
    DraftResponse {
        draft: slot.draft().cloned(),
        pending: slot.is_busy(),
        message: message.to_string(),
    }
}

/// Add the reviewed draft to the catalog, optionally logging it
pub fn submit_draft<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    log: bool,
) -> Result<SubmitDraftResponse, String> {
    let item = tracker.submit_draft(log).map_err(error_message)?;
    Ok(SubmitDraftResponse {
        item,
        logged: log,
        date: tracker.selected_date().to_string(),
    })
}
