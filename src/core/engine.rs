use std::time::Duration;
use uuid::Uuid;
use crate::config::Config;
use crate::core::{
    Canvas, EventLogger, GameEvent, GameEventHandler, GameState, IntroCinematic, ItemKind, Offering,
    PlacedItem, Placement, Point, Silence, Stage, TerminalBell, Tone, ToneSink,
};
use crate::story::{StoryPlayer, StoryStep, Storyboard};
use crate::utils::{GameError, GameResult};
use tracing::{debug, info};

/// Owns the three stages and switches between them.
///
/// The host calls [`CelebrationEngine::advance`] with the time elapsed since
/// the session started, and forwards input as method calls. Input meant for
/// a stage that is not showing is ignored.
pub struct CelebrationEngine {
    config: Config,
    storyboard: Storyboard,
    stage: Stage,
    intro: IntroCinematic,
    story: StoryPlayer,
    game: GameState,
    tone_sink: Box<dyn ToneSink>,
    events: EventLogger,
    now: Duration,
}

impl CelebrationEngine {
    pub fn new(config: Config, storyboard: Storyboard) -> GameResult<Self> {
        if let Err(errors) = storyboard.validate() {
            let error_msg = errors.join("; ");
            return Err(GameError::story(format!("Storyboard validation failed: {}", error_msg)));
        }

        let tone_sink: Box<dyn ToneSink> = if config.audio.enabled {
            Box::new(TerminalBell)
        } else {
            Box::new(Silence)
        };

        let now = Duration::ZERO;
        info!("Starting celebration with storyboard '{}'", storyboard.id);

        Ok(Self {
            intro: IntroCinematic::new(&config.timings, now),
            story: Self::story_player(&config, &storyboard, now),
            game: GameState::new(&config, now),
            config,
            storyboard,
            stage: Stage::Intro,
            tone_sink,
            events: EventLogger::default(),
            now,
        })
    }

    pub fn with_tone_sink(mut self, tone_sink: Box<dyn ToneSink>) -> Self {
        self.tone_sink = tone_sink;
        self
    }

    fn story_player(config: &Config, storyboard: &Storyboard, now: Duration) -> StoryPlayer {
        StoryPlayer::new(
            storyboard.clone(),
            config.timings.story_panel(),
            Duration::from_millis(config.effects.sparkle_ms),
            now,
        )
    }

    /// Moves every timer of the active stage up to `now`.
    pub fn advance(&mut self, now: Duration) {
        if now < self.now {
            return;
        }
        self.now = now;

        match self.stage {
            Stage::Intro => {
                self.intro.advance(now);
                if self.intro.is_finished() {
                    self.switch_stage(Stage::Story);
                }
            }
            Stage::Story => {
                let steps = self.story.advance(now);
                for step in steps {
                    self.report_story_step(step);
                }
            }
            Stage::Village => self.game.advance(now),
        }
    }

    pub fn skip_intro(&mut self) {
        if self.stage == Stage::Intro {
            self.switch_stage(Stage::Story);
        }
    }

    pub fn enter_village(&mut self) {
        if self.stage != Stage::Village {
            self.switch_stage(Stage::Village);
        }
    }

    fn switch_stage(&mut self, to: Stage) {
        let from = self.stage;
        info!("Stage change: {} -> {}", from, to);
        self.stage = to;

        match to {
            Stage::Intro => self.intro = IntroCinematic::new(&self.config.timings, self.now),
            Stage::Story => self.story = Self::story_player(&self.config, &self.storyboard, self.now),
            Stage::Village => {
                let canvas = self.game.canvas();
                self.game = GameState::new(&self.config, self.now);
                self.game.set_canvas(canvas);
            }
        }

        self.emit(GameEvent::stage_changed(from, to));
        if to == Stage::Story {
            self.report_story_step(StoryStep::Panel(0));
        }
    }

    fn in_stage(&self, stage: Stage, action: &str) -> bool {
        if self.stage == stage {
            true
        } else {
            debug!("Ignoring '{}' during the {} stage", action, self.stage);
            false
        }
    }

    // ---- story ----

    pub fn next_panel(&mut self) {
        if self.in_stage(Stage::Story, "next panel") {
            let step = self.story.next();
            self.report_story_step(step);
        }
    }

    pub fn previous_panel(&mut self) {
        if self.in_stage(Stage::Story, "previous panel") {
            let step = self.story.prev();
            self.report_story_step(step);
        }
    }

    pub fn toggle_story_pause(&mut self) -> bool {
        if !self.in_stage(Stage::Story, "pause") {
            return false;
        }
        let paused = self.story.toggle_pause();
        debug!("Story autoplay {}", if paused { "paused" } else { "resumed" });
        paused
    }

    pub fn release_kite(&mut self, at: Point) {
        if self.in_stage(Stage::Story, "release kite") {
            self.story.release_kite(at);
        }
    }

    /// Completion callback of the story: opens the village once every panel
    /// has been shown.
    pub fn finish_story(&mut self) -> bool {
        if !self.in_stage(Stage::Story, "finish story") {
            return false;
        }
        if !self.story.is_finished() {
            debug!("Story is still on panel {}", self.story.current_index() + 1);
            return false;
        }
        self.switch_stage(Stage::Village);
        true
    }

    fn report_story_step(&mut self, step: StoryStep) {
        match step {
            StoryStep::Unchanged => {}
            StoryStep::Panel(index) => {
                if let Some(panel) = self.story.board().panels.get(index) {
                    let event = GameEvent::panel_shown(index, panel);
                    self.emit(event);
                }
            }
            StoryStep::Finished => {
                info!("Story finished after {} panels", self.story.board().panels.len());
                self.emit(GameEvent::story_finished(self.story.board().panels.len()));
            }
        }
    }

    // ---- village ----

    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.game.set_canvas(canvas);
    }

    pub fn select_kind(&mut self, kind: ItemKind) {
        if self.in_stage(Stage::Village, "select kind") {
            let selected = self.game.select_kind(kind);
            self.emit(GameEvent::kind_selected(selected));
        }
    }

    pub fn click_canvas(&mut self, point: Point) -> Placement {
        if !self.in_stage(Stage::Village, "canvas click") {
            return Placement::NoKindSelected;
        }

        let placement = self.game.click_canvas(point);
        match placement {
            Placement::Placed(id) => {
                if let Some(item) = self.game.item(id).cloned() {
                    info!("Placed {} at ({:.1}, {:.1})", item.kind, item.x, item.y);
                    self.emit(GameEvent::item_placed(&item, self.game.happiness().value()));
                }
                self.check_finale();
            }
            Placement::SelectionCleared => self.emit(GameEvent::item_selected(None)),
            Placement::NoKindSelected | Placement::OutsideBand => {
                debug!("Canvas click at ({:.1}, {:.1}) ignored: {:?}", point.x, point.y, placement);
            }
        }
        placement
    }

    pub fn click_item(&mut self, id: Uuid) -> bool {
        if !self.in_stage(Stage::Village, "item click") || self.game.item(id).is_none() {
            return false;
        }
        let selected = self.game.click_item(id);
        self.emit(GameEvent::item_selected(self.game.selected_item()));
        selected
    }

    pub fn start_drag(&mut self, id: Uuid) -> bool {
        if !self.in_stage(Stage::Village, "drag start") {
            return false;
        }
        let started = self.game.start_drag(id);
        if started {
            self.emit(GameEvent::item_selected(Some(id)));
        }
        started
    }

    pub fn end_drag(&mut self, id: Uuid, point: Point) -> bool {
        if !self.in_stage(Stage::Village, "drag end") || !self.game.end_drag(id, point) {
            return false;
        }
        if let Some(item) = self.game.item(id).cloned() {
            debug!("Moved {} to ({:.1}, {:.1})", item.kind, item.x, item.y);
            self.emit(GameEvent::item_moved(&item));
        }
        true
    }

    pub fn delete_item(&mut self, id: Uuid) -> Option<PlacedItem> {
        if !self.in_stage(Stage::Village, "delete") {
            return None;
        }
        let removed = self.game.delete_item(id)?;
        info!("Removed {} from the village", removed.kind);
        self.emit(GameEvent::item_deleted(&removed, self.game.happiness().value()));
        Some(removed)
    }

    pub fn delete_selected(&mut self) -> Option<PlacedItem> {
        let id = self.game.selected_item()?;
        self.delete_item(id)
    }

    pub fn refresh_village(&mut self) {
        if self.in_stage(Stage::Village, "refresh") {
            self.game.refresh_village();
            info!("Village cleared");
            self.emit(GameEvent::village_refreshed(self.game.happiness().value()));
        }
    }

    pub fn make_offering(&mut self, offering: Offering) -> f64 {
        if !self.in_stage(Stage::Village, "offering") {
            return 0.0;
        }
        let gained = self.game.make_offering(offering);
        self.emit(GameEvent::offering_made(offering, gained, self.game.happiness().value()));
        self.check_finale();
        gained
    }

    pub fn play_beat(&mut self) {
        if !self.in_stage(Stage::Village, "beat") {
            return;
        }
        self.game.play_beat();
        self.tone_sink.play(&Tone::dhol());
        let multiplier = self.game.multiplier().value();
        self.emit(GameEvent::beat_played(multiplier, self.game.happiness().value()));
        self.check_finale();
    }

    pub fn acknowledge_finale(&mut self) -> bool {
        if !self.in_stage(Stage::Village, "acknowledge finale") || !self.game.acknowledge_finale() {
            return false;
        }
        self.emit(GameEvent::finale_acknowledged(self.game.happiness().value()));
        true
    }

    pub fn pointer_move(&mut self, point: Point) {
        if self.stage == Stage::Village {
            self.game.pointer_move(point);
        }
    }

    fn check_finale(&mut self) {
        if self.game.take_finale_trigger() {
            info!("The village is fully adorned");
            self.emit(GameEvent::finale_reached());
        }
    }

    fn emit(&mut self, event: GameEvent) {
        debug!(event = ?event.event_type, "{}", event.summary());
        self.events.handle_event(&event);
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn intro(&self) -> &IntroCinematic {
        &self.intro
    }

    pub fn story(&self) -> &StoryPlayer {
        &self.story
    }

    pub fn village(&self) -> &GameState {
        &self.game
    }

    pub fn events(&self) -> &EventLogger {
        &self.events
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
