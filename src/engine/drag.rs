use serde_json::{Value, json};

use crate::domain::{FieldId, FieldType};

/// What a drag session carries: a palette descriptor or an existing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPayload {
    NewField { field_type: FieldType },
    Reorder { field_id: FieldId },
}

/// Transfer-payload failures; reported, never fatal, and the list is left
/// untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransferError {
    #[error("transfer payload is not valid JSON")]
    NotJson,
    #[error("transfer payload is missing '{0}'")]
    MissingKey(&'static str),
    #[error("transfer payload names unknown field type '{0}'")]
    UnknownType(String),
}

impl DragPayload {
    /// Serialize to the wire shape used by the drop target.
    pub fn to_transfer(&self) -> String {
        let value = match self {
            DragPayload::NewField { field_type } => json!({ "fieldType": field_type.as_str() }),
            DragPayload::Reorder { field_id } => {
                json!({ "isReorder": true, "fieldId": field_id.0 })
            }
        };
        value.to_string()
    }

    /// Parse a transfer payload, rejecting anything malformed.
    pub fn from_transfer(raw: &str) -> Result<Self, TransferError> {
        let value: Value = serde_json::from_str(raw).map_err(|_| TransferError::NotJson)?;
        let Some(object) = value.as_object() else {
            return Err(TransferError::NotJson);
        };
        if object
            .get("isReorder")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            let field_id = object
                .get("fieldId")
                .and_then(Value::as_u64)
                .ok_or(TransferError::MissingKey("fieldId"))?;
            return Ok(DragPayload::Reorder {
                field_id: FieldId(field_id),
            });
        }
        let tag = object
            .get("fieldType")
            .and_then(Value::as_str)
            .ok_or(TransferError::MissingKey("fieldType"))?;
        let field_type = tag
            .parse::<FieldType>()
            .map_err(|err| TransferError::UnknownType(err.tag))?;
        Ok(DragPayload::NewField { field_type })
    }
}

/// Vertical extent of one rendered card, in abstract pointer units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardBounds {
    pub top: f32,
    pub height: f32,
}

impl CardBounds {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn midpoint(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// Insertion index for a pointer at `pointer_y`: the first card whose vertical
/// midpoint lies below the pointer; past every midpoint means insert at end.
pub fn insertion_index(pointer_y: f32, cards: &[CardBounds]) -> usize {
    cards
        .iter()
        .position(|card| card.midpoint() > pointer_y)
        .unwrap_or(cards.len())
}

/// One pointer-drag gesture: idle → dragging → dropped/cancelled → idle.
///
/// The controller only tracks the session; applying a drop to the field list
/// is the editor session's job.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    active: Option<ActiveDrag>,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    payload: DragPayload,
    over_index: usize,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        self.active.as_ref().map(|drag| &drag.payload)
    }

    pub fn over_index(&self) -> Option<usize> {
        self.active.as_ref().map(|drag| drag.over_index)
    }

    /// Open a session. A session already in flight is replaced; drags are
    /// scoped to a single gesture and never persist.
    pub fn begin(&mut self, payload: DragPayload) {
        self.active = Some(ActiveDrag {
            payload,
            over_index: 0,
        });
    }

    /// Recompute the insertion point from the pointer position.
    pub fn update_pointer(&mut self, pointer_y: f32, cards: &[CardBounds]) {
        if let Some(drag) = self.active.as_mut() {
            drag.over_index = insertion_index(pointer_y, cards);
        }
    }

    /// Tear the session down with no mutation and no history commit.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Close the session, yielding the payload and final insertion index.
    pub fn complete(&mut self) -> Option<(DragPayload, usize)> {
        self.active
            .take()
            .map(|drag| (drag.payload, drag.over_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(rows: &[(f32, f32)]) -> Vec<CardBounds> {
        rows.iter()
            .map(|(top, height)| CardBounds::new(*top, *height))
            .collect()
    }

    #[test]
    fn pointer_above_first_midpoint_inserts_at_zero() {
        let cards = cards(&[(0.0, 4.0), (4.0, 4.0), (8.0, 4.0)]);
        assert_eq!(insertion_index(1.0, &cards), 0);
    }

    #[test]
    fn pointer_between_midpoints_picks_the_following_card() {
        let cards = cards(&[(0.0, 4.0), (4.0, 4.0), (8.0, 4.0)]);
        // midpoints at 2, 6, 10
        assert_eq!(insertion_index(3.0, &cards), 1);
        assert_eq!(insertion_index(7.5, &cards), 2);
    }

    #[test]
    fn pointer_past_every_midpoint_inserts_at_end() {
        let cards = cards(&[(0.0, 4.0), (4.0, 4.0)]);
        assert_eq!(insertion_index(99.0, &cards), 2);
        assert_eq!(insertion_index(0.0, &[]), 0);
    }

    #[test]
    fn session_walks_idle_dragging_dropped() {
        let mut controller = DragController::new();
        assert!(!controller.is_dragging());

        controller.begin(DragPayload::NewField {
            field_type: FieldType::Text,
        });
        controller.update_pointer(5.0, &cards(&[(0.0, 4.0), (4.0, 4.0)]));
        assert_eq!(controller.over_index(), Some(1));

        let (payload, index) = controller.complete().unwrap();
        assert_eq!(index, 1);
        assert!(matches!(payload, DragPayload::NewField { .. }));
        assert!(!controller.is_dragging());
    }

    #[test]
    fn cancel_discards_the_session() {
        let mut controller = DragController::new();
        controller.begin(DragPayload::Reorder {
            field_id: FieldId(3),
        });
        controller.cancel();
        assert!(controller.complete().is_none());
    }

    #[test]
    fn transfer_round_trips_both_shapes() {
        let palette = DragPayload::NewField {
            field_type: FieldType::Rating,
        };
        assert_eq!(
            DragPayload::from_transfer(&palette.to_transfer()).unwrap(),
            palette
        );

        let reorder = DragPayload::Reorder {
            field_id: FieldId(12),
        };
        let raw = reorder.to_transfer();
        assert!(raw.contains("\"isReorder\":true"));
        assert_eq!(DragPayload::from_transfer(&raw).unwrap(), reorder);
    }

    #[test]
    fn malformed_transfers_are_rejected() {
        assert_eq!(
            DragPayload::from_transfer("not json"),
            Err(TransferError::NotJson)
        );
        assert_eq!(
            DragPayload::from_transfer("{\"isReorder\":true}"),
            Err(TransferError::MissingKey("fieldId"))
        );
        assert_eq!(
            DragPayload::from_transfer("{\"fieldType\":\"hologram\"}"),
            Err(TransferError::UnknownType("hologram".to_string()))
        );
    }
}
