use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use crate::core::effects::{Sparkle, Transients};
use crate::core::schedule::Deadline;
use crate::core::Point;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storyboard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub version: String,
    pub panels: Vec<StoryPanel>,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryPanel {
    pub id: String,
    pub title: String,
    pub text: String,
    pub emblem: String,
    #[serde(default)]
    pub art: Vec<String>,
}

impl Storyboard {
    pub fn new<S: Into<String>>(id: S, title: S) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            author: String::new(),
            version: "1.0.0".to_string(),
            panels: Vec::new(),
            metadata: None,
        }
    }

    /// The six chapters of the Lohri tale shown before the village opens.
    pub fn lohri() -> Self {
        let mut board = Self::new("lohri", "The Story of Lohri");
        board.description = "Why the fire burns on the longest night of winter".to_string();
        board.author = "Village elders".to_string();

        board.add_panel(
            StoryPanel::new(
                "harvest",
                "Harvest Gratitude",
                "Lohri marks the harvest of winter crops like wheat and sugarcane. Farmers offer their first harvest to the fire, praying for abundance.",
                "🌾",
            )
            .with_art(&["  \\|/ \\|/ \\|/", "   |   |   |", " ~~~~~~~~~~~~~"]),
        );
        board.add_panel(
            StoryPanel::new(
                "bonfire",
                "The Sacred Fire",
                "The bonfire represents Agni, the God of Fire. We offer popcorn and rewari to the flames, asking for warmth and strength.",
                "🔥",
            )
            .with_art(&["     (  )", "    ( )( )", "   /\\/\\/\\/\\", "  =========="]),
        );
        board.add_panel(StoryPanel::new(
            "legend",
            "The Hero Dulla Bhatti",
            "Lohri is incomplete without folk tales of Dulla Bhatti. He rescued the oppressed and provided for the poor.",
            "🗡",
        ));
        board.add_panel(
            StoryPanel::new(
                "culture",
                "Unity in Dance",
                "The village vibrates with the rhythm of the Dhol. Bhangra and Gidda celebrate the spirit of life and community.",
                "🥁",
            )
            .with_art(&["  \\o/   _o_   \\o/", "   |     |     |", "  / \\   / \\   / \\"]),
        );
        board.add_panel(StoryPanel::new(
            "delicacies",
            "Traditional Flavors",
            "Sharing Lohri specialties like Rewri, Gajak and Popcorn is a ritual that spreads sweetness and bonds the community.",
            "🍬",
        ));
        board.add_panel(StoryPanel::new(
            "solar",
            "Return of the Sun",
            "Lohri celebrates the end of the winter solstice, welcoming the return of longer days and the sun's journey North.",
            "☀",
        ));

        board
    }

    pub fn add_panel(&mut self, panel: StoryPanel) {
        self.panels.push(panel);
    }

    pub fn get_panel(&self, panel_id: &str) -> Option<&StoryPanel> {
        self.panels.iter().find(|p| p.id == panel_id)
    }

    pub fn get_panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.panels.is_empty() {
            errors.push(format!("Storyboard '{}' has no panels", self.id));
        }

        let mut panel_ids = std::collections::HashSet::new();
        for panel in &self.panels {
            if !panel_ids.insert(&panel.id) {
                errors.push(format!("Duplicate panel ID: '{}'", panel.id));
            }
            if panel.title.trim().is_empty() {
                errors.push(format!("Panel '{}' has no title", panel.id));
            }
            if panel.text.trim().is_empty() {
                errors.push(format!("Panel '{}' has no text", panel.id));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl StoryPanel {
    pub fn new<S: Into<String>>(id: S, title: S, text: S, emblem: S) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            text: text.into(),
            emblem: emblem.into(),
            art: Vec::new(),
        }
    }

    pub fn with_art(mut self, lines: &[&str]) -> Self {
        self.art = lines.iter().map(|line| line.to_string()).collect();
        self
    }
}

/// What a story operation changed, so the engine can report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryStep {
    Unchanged,
    Panel(usize),
    Finished,
}

/// Pages through a storyboard, on a timer or by hand.
///
/// Each panel stays up for `panel_duration` counted from the moment it
/// appeared (or playback resumed). The last panel turning over marks the
/// story finished; the player then waits for the host to move on.
#[derive(Debug, Clone)]
pub struct StoryPlayer {
    board: Storyboard,
    current: usize,
    paused: bool,
    finished: bool,
    panel_duration: Duration,
    turn: Deadline,
    sparkles: Transients<Sparkle>,
    now: Duration,
}

impl StoryPlayer {
    pub fn new(board: Storyboard, panel_duration: Duration, sparkle_ttl: Duration, now: Duration) -> Self {
        let finished = board.panels.is_empty();
        Self {
            board,
            current: 0,
            paused: false,
            finished,
            panel_duration,
            turn: Deadline::after(now, panel_duration),
            sparkles: Transients::new(sparkle_ttl),
            now,
        }
    }

    /// Runs autoplay up to `now`. Several panels may turn if the host
    /// fell behind.
    pub fn advance(&mut self, now: Duration) -> Vec<StoryStep> {
        if now < self.now {
            return Vec::new();
        }
        self.now = now;
        self.sparkles.expire(now);

        let mut steps = Vec::new();
        while !self.paused && !self.finished && self.turn.is_due(now) {
            let due = self.turn.due();
            let step = self.turn_page();
            self.turn = Deadline::after(due, self.panel_duration);
            steps.push(step);
        }
        steps
    }

    pub fn next(&mut self) -> StoryStep {
        if self.finished {
            return StoryStep::Unchanged;
        }
        let step = self.turn_page();
        self.restart_timer();
        step
    }

    pub fn prev(&mut self) -> StoryStep {
        if self.finished || self.current == 0 {
            return StoryStep::Unchanged;
        }
        self.current -= 1;
        self.restart_timer();
        StoryStep::Panel(self.current)
    }

    /// Returns whether playback is now paused.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        if !self.paused {
            self.restart_timer();
        }
        self.paused
    }

    pub fn release_kite(&mut self, at: Point) -> u64 {
        self.sparkles.spawn(self.now, Sparkle { at })
    }

    fn turn_page(&mut self) -> StoryStep {
        if self.current + 1 < self.board.panels.len() {
            self.current += 1;
            StoryStep::Panel(self.current)
        } else {
            self.finished = true;
            StoryStep::Finished
        }
    }

    fn restart_timer(&mut self) {
        self.turn = Deadline::after(self.now, self.panel_duration);
    }

    pub fn board(&self) -> &Storyboard {
        &self.board
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_panel(&self) -> Option<&StoryPanel> {
        self.board.panels.get(self.current)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn sparkles(&self) -> &Transients<Sparkle> {
        &self.sparkles
    }

    pub fn time_to_next(&self) -> Duration {
        self.turn.remaining(self.now)
    }
}
