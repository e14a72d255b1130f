use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use crate::core::{ItemKind, Offering, PlacedItem, Stage};
use crate::story::StoryPanel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: Uuid,
    pub event_type: GameEventType,
    pub timestamp: DateTime<Utc>,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEventType {
    StageChanged,
    PanelShown,
    StoryFinished,
    KindSelected,
    ItemPlaced,
    ItemMoved,
    ItemSelected,
    ItemDeleted,
    VillageRefreshed,
    OfferingMade,
    BeatPlayed,
    FinaleReached,
    FinaleAcknowledged,
    Custom(String),
}

impl GameEvent {
    pub fn new(event_type: GameEventType, data: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            timestamp: Utc::now(),
            data,
        }
    }

    pub fn stage_changed(from: Stage, to: Stage) -> Self {
        let data = serde_json::json!({
            "from": from,
            "to": to
        });
        Self::new(GameEventType::StageChanged, data)
    }

    pub fn panel_shown(index: usize, panel: &StoryPanel) -> Self {
        let data = serde_json::json!({
            "index": index,
            "panel_id": panel.id,
            "title": panel.title
        });
        Self::new(GameEventType::PanelShown, data)
    }

    pub fn story_finished(panels: usize) -> Self {
        let data = serde_json::json!({
            "panels": panels
        });
        Self::new(GameEventType::StoryFinished, data)
    }

    pub fn kind_selected(kind: Option<ItemKind>) -> Self {
        let data = serde_json::json!({
            "kind": kind
        });
        Self::new(GameEventType::KindSelected, data)
    }

    pub fn item_placed(item: &PlacedItem, happiness: f64) -> Self {
        let data = serde_json::json!({
            "item_id": item.id,
            "kind": item.kind,
            "x": item.x,
            "y": item.y,
            "scale": item.scale,
            "happiness": happiness
        });
        Self::new(GameEventType::ItemPlaced, data)
    }

    pub fn item_moved(item: &PlacedItem) -> Self {
        let data = serde_json::json!({
            "item_id": item.id,
            "x": item.x,
            "y": item.y,
            "scale": item.scale
        });
        Self::new(GameEventType::ItemMoved, data)
    }

    pub fn item_selected(item_id: Option<Uuid>) -> Self {
        let data = serde_json::json!({
            "item_id": item_id
        });
        Self::new(GameEventType::ItemSelected, data)
    }

    pub fn item_deleted(item: &PlacedItem, happiness: f64) -> Self {
        let data = serde_json::json!({
            "item_id": item.id,
            "kind": item.kind,
            "happiness": happiness
        });
        Self::new(GameEventType::ItemDeleted, data)
    }

    pub fn village_refreshed(happiness: f64) -> Self {
        let data = serde_json::json!({
            "happiness": happiness
        });
        Self::new(GameEventType::VillageRefreshed, data)
    }

    pub fn offering_made(offering: Offering, gained: f64, happiness: f64) -> Self {
        let data = serde_json::json!({
            "offering": offering,
            "gained": gained,
            "happiness": happiness
        });
        Self::new(GameEventType::OfferingMade, data)
    }

    pub fn beat_played(multiplier: f64, happiness: f64) -> Self {
        let data = serde_json::json!({
            "multiplier": multiplier,
            "happiness": happiness
        });
        Self::new(GameEventType::BeatPlayed, data)
    }

    pub fn finale_reached() -> Self {
        Self::new(GameEventType::FinaleReached, serde_json::json!({ "happiness": 100 }))
    }

    pub fn finale_acknowledged(happiness: f64) -> Self {
        let data = serde_json::json!({
            "happiness": happiness
        });
        Self::new(GameEventType::FinaleAcknowledged, data)
    }

    pub fn custom<S: Into<String>>(event_name: S, data: serde_json::Value) -> Self {
        Self::new(GameEventType::Custom(event_name.into()), data)
    }

    /// One-line human summary for the on-screen log strip.
    pub fn summary(&self) -> String {
        let text = |key: &str| self.data.get(key).and_then(|v| v.as_str()).unwrap_or("?").to_string();
        let number = |key: &str| self.data.get(key).and_then(|v| v.as_f64()).unwrap_or(0.0);

        match &self.event_type {
            GameEventType::StageChanged => format!("Stage: {} → {}", text("from"), text("to")),
            GameEventType::PanelShown => format!("Chapter {}: {}", number("index") as usize + 1, text("title")),
            GameEventType::StoryFinished => "The tale is told".to_string(),
            GameEventType::KindSelected => match self.data.get("kind").and_then(|v| v.as_str()) {
                Some(kind) => format!("Holding {}", kind),
                None => "Hands free".to_string(),
            },
            GameEventType::ItemPlaced => format!("Placed {} (glow {:.0}%)", text("kind"), number("happiness").floor()),
            GameEventType::ItemMoved => format!("Moved item to ({:.0}, {:.0})", number("x"), number("y")),
            GameEventType::ItemSelected => {
                if self.data["item_id"].is_null() {
                    "Selection cleared".to_string()
                } else {
                    "Item selected".to_string()
                }
            }
            GameEventType::ItemDeleted => format!("Removed {} (glow {:.0}%)", text("kind"), number("happiness").floor()),
            GameEventType::VillageRefreshed => "Village cleared".to_string(),
            GameEventType::OfferingMade => format!("Offered {} (+{:.1})", text("offering"), number("gained")),
            GameEventType::BeatPlayed => format!("Dhol! combo x{:.1}", number("multiplier")),
            GameEventType::FinaleReached => "A pure festival!".to_string(),
            GameEventType::FinaleAcknowledged => "Staying in the village".to_string(),
            GameEventType::Custom(name) => name.clone(),
        }
    }
}

pub trait GameEventHandler {
    fn handle_event(&mut self, event: &GameEvent);
}

pub struct EventLogger {
    events: Vec<GameEvent>,
    max_events: usize,
}

impl EventLogger {
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    pub fn get_events_by_type(&self, event_type: &GameEventType) -> Vec<&GameEvent> {
        self.events
            .iter()
            .filter(|event| std::mem::discriminant(&event.event_type) == std::mem::discriminant(event_type))
            .collect()
    }

    pub fn get_recent_events(&self, count: usize) -> Vec<&GameEvent> {
        self.events
            .iter()
            .rev()
            .take(count)
            .collect()
    }

    pub fn export_events(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.events)
    }

    pub fn get_event_count(&self) -> usize {
        self.events.len()
    }

    pub fn get_event_count_by_type(&self, event_type: &GameEventType) -> usize {
        self.get_events_by_type(event_type).len()
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl GameEventHandler for EventLogger {
    fn handle_event(&mut self, event: &GameEvent) {
        self.events.push(event.clone());

        if self.events.len() > self.max_events {
            self.events.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Position;

    #[test]
    fn test_stage_changed_event() {
        let event = GameEvent::stage_changed(Stage::Intro, Stage::Story);

        assert!(matches!(event.event_type, GameEventType::StageChanged));
        assert_eq!(event.data["from"], "intro");
        assert_eq!(event.data["to"], "story");
        assert_eq!(event.summary(), "Stage: intro → story");
    }

    #[test]
    fn test_item_placed_event() {
        let item = PlacedItem::new(ItemKind::House, Position { x: 50.0, y: 80.0 });
        let event = GameEvent::item_placed(&item, 40.0);

        assert!(matches!(event.event_type, GameEventType::ItemPlaced));
        assert_eq!(event.data["kind"], "house");
        assert_eq!(event.data["x"], 50.0);
        assert_eq!(event.data["happiness"], 40.0);
        assert_eq!(event.summary(), "Placed house (glow 40%)");
    }

    #[test]
    fn test_selection_summary() {
        assert_eq!(GameEvent::item_selected(None).summary(), "Selection cleared");
        assert_eq!(GameEvent::item_selected(Some(Uuid::new_v4())).summary(), "Item selected");
        assert_eq!(GameEvent::kind_selected(Some(ItemKind::Rangoli)).summary(), "Holding rangoli");
    }

    #[test]
    fn test_offering_summary() {
        let event = GameEvent::offering_made(Offering::Rewari, 8.0, 100.0);
        assert_eq!(event.data["offering"], "rewari");
        assert_eq!(event.summary(), "Offered rewari (+8.0)");
    }

    #[test]
    fn test_event_logger() {
        let mut logger = EventLogger::new(3);

        logger.handle_event(&GameEvent::beat_played(1.6, 26.2));
        logger.handle_event(&GameEvent::beat_played(2.2, 27.4));
        logger.handle_event(&GameEvent::beat_played(2.8, 28.6));

        assert_eq!(logger.get_event_count(), 3);

        logger.handle_event(&GameEvent::beat_played(3.4, 29.8));

        assert_eq!(logger.get_event_count(), 3);
        let oldest = logger.get_recent_events(3);
        assert_eq!(oldest[2].data["multiplier"], 2.2);
    }

    #[test]
    fn test_event_filtering() {
        let mut logger = EventLogger::default();

        logger.handle_event(&GameEvent::finale_reached());
        logger.handle_event(&GameEvent::village_refreshed(25.0));
        logger.handle_event(&GameEvent::village_refreshed(25.0));

        let refreshes = logger.get_events_by_type(&GameEventType::VillageRefreshed);
        assert_eq!(refreshes.len(), 2);
        assert_eq!(logger.get_event_count_by_type(&GameEventType::FinaleReached), 1);

        let recent = logger.get_recent_events(1);
        assert!(matches!(recent[0].event_type, GameEventType::VillageRefreshed));
    }

    #[test]
    fn test_export_events() {
        let mut logger = EventLogger::default();
        logger.handle_event(&GameEvent::custom("kite_released", serde_json::json!({ "x": 3 })));

        let json = logger.export_events().unwrap();
        assert!(json.contains("kite_released"));

        let parsed: Vec<GameEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
    }
}
