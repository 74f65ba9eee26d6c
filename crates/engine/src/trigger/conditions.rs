//! Conditions scripts poll to decide their next state.

use fieldhost_domain::InteractState;

use super::TriggerContext;

impl TriggerContext {
    /// True once the timer ran out. A timer that was never set counts as
    /// expired.
    pub fn time_expired(&self, timer_id: &str) -> bool {
        tracing::debug!(map_id = %self.field.map_id(), timer_id, "TimeExpired");
        self.field.timer_expired(timer_id).unwrap_or(true)
    }

    /// True when every listed interactable present in the field is in
    /// `state`. Unknown ids do not count against the condition.
    pub fn object_interacted(&self, interact_ids: &[i32], state: u8) -> bool {
        let state = match InteractState::try_from(state) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(map_id = %self.field.map_id(), error = %e, "ObjectInteracted");
                return false;
            }
        };
        tracing::debug!(map_id = %self.field.map_id(), ?interact_ids, ?state, "ObjectInteracted");
        self.field.interacts_match(interact_ids, state)
    }

    pub fn detect_liftable_object(&self, box_ids: &[i32], item_id: i32) -> bool {
        tracing::error!(
            map_id = %self.field.map_id(),
            ?box_ids,
            item_id,
            "DetectLiftableObject not implemented"
        );
        false
    }

    pub fn pvp_zone_ended(&self, box_id: i32) -> bool {
        tracing::error!(map_id = %self.field.map_id(), box_id, "PvpZoneEnded not implemented");
        false
    }
}
