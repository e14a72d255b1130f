use console::{Key, Term};
use dialoguer::Select;
use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};
use uuid::Uuid;

use crate::config::Config;
use crate::core::{CelebrationEngine, Canvas, Finale, Point, Stage};
use crate::story::Storyboard;
use crate::ui::components::{self, Cell, Line, VillageView};
use crate::ui::input::{self, InputEvent};
use crate::ui::{Display, ThemeManager};
use crate::utils::{GameError, GameResult};
use tracing::{debug, info, warn};

/// Where the live session begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    Intro,
    Story,
    Village,
}

pub struct GameInterface {
    engine: CelebrationEngine,
    display: Display,
    config: Config,
    view: VillageView,
    kites: usize,
}

impl GameInterface {
    pub fn new(config: Config, storyboard: Storyboard) -> GameResult<Self> {
        info!("Initializing game interface");

        let mut display = Display::new(ThemeManager::new(), config.ui.text_width);
        if !display.set_theme(&config.ui.theme) {
            warn!("Unknown theme '{}', using default", config.ui.theme);
        }

        let cols = config.ui.canvas_cols;
        let rows = config.ui.canvas_rows;
        let mut engine = CelebrationEngine::new(config.clone(), storyboard)?;
        engine.set_canvas(Canvas::new(0.0, 0.0, f64::from(cols), f64::from(rows)));

        let view = VillageView {
            cols,
            rows,
            cursor: Cell::new(cols / 2, rows.saturating_sub(2)),
            dragging: None,
            toss_ttl: Duration::from_millis(config.effects.toss_ms),
        };

        Ok(Self {
            engine,
            display,
            config,
            view,
            kites: 0,
        })
    }

    /// Shows the launcher when `launch` is `None`, then runs the live session.
    pub async fn run(&mut self, launch: Option<Launch>) -> GameResult<()> {
        let launch = match launch {
            Some(launch) => launch,
            None => match self.show_main_menu()? {
                Some(launch) => launch,
                None => {
                    self.display.show_message("The fire will be waiting. Happy Lohri!", "success").ok();
                    return Ok(());
                }
            },
        };

        self.live_loop(launch).await?;
        self.show_farewell()?;
        Ok(())
    }

    fn show_main_menu(&mut self) -> GameResult<Option<Launch>> {
        loop {
            self.display.clear_screen().ok();
            self.show_title()?;

            let choices = vec![
                "🔥 Light the bonfire",
                "📖 Hear the story of Lohri",
                "🏡 Go straight to the village",
                "🎨 Change theme",
                "🚪 Exit",
            ];

            let selection = Select::new()
                .with_prompt("What would you like to do?")
                .items(&choices)
                .default(0)
                .interact()
                .map_err(|e| GameError::terminal(format!("Menu selection error: {}", e)))?;

            match selection {
                0 => return Ok(Some(Launch::Intro)),
                1 => return Ok(Some(Launch::Story)),
                2 => return Ok(Some(Launch::Village)),
                3 => self.change_theme()?,
                _ => return Ok(None),
            }
        }
    }

    fn show_title(&self) -> GameResult<()> {
        let width = self.display.text_width();
        let title = components::center("~ L O H R I ~", width);
        self.display.show_message(&title, "title")?;
        self.display.show_message(&components::center("A bonfire, a story and a village to adorn", width), "info")?;
        self.display.show_message(&components::center(&format!("Version {}", crate::VERSION), width), "hint")?;
        self.display.show_message(&"═".repeat(width), "separator")?;
        Ok(())
    }

    fn change_theme(&mut self) -> GameResult<()> {
        let themes = self.display.get_available_themes();
        let current = themes.iter().position(|t| t == self.display.current_theme()).unwrap_or(0);

        let selection = Select::new()
            .with_prompt("Choose theme")
            .items(&themes)
            .default(current)
            .interact()
            .map_err(|e| GameError::terminal(format!("Theme selection error: {}", e)))?;

        if let Some(theme) = themes.get(selection) {
            if self.display.set_theme(theme) {
                info!("Theme changed to '{}'", theme);
                self.config.ui.theme = theme.clone();
            }
        }
        Ok(())
    }

    async fn live_loop(&mut self, launch: Launch) -> GameResult<()> {
        match launch {
            Launch::Intro => {}
            Launch::Story => self.engine.skip_intro(),
            Launch::Village => self.engine.enter_village(),
        }
        info!("Live session starting at the {} stage", self.engine.stage());

        let term = Term::stdout();
        let mut keys = input::spawn_key_reader(term.clone());
        let mut frames = interval(self.config.timings.frame());
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.display.clear_screen()?;
        self.display.hide_cursor()?;
        let started = Instant::now();

        let result = loop {
            tokio::select! {
                _ = frames.tick() => {}
                key = keys.recv() => match key {
                    Some(key) => {
                        if !self.handle_key(key) {
                            break Ok(());
                        }
                    }
                    None => {
                        warn!("Key reader closed");
                        break Ok(());
                    }
                },
                _ = tokio::signal::ctrl_c() => break Ok(()),
            }

            self.engine.advance(started.elapsed());
            if let Err(e) = self.render() {
                break Err(e);
            }
        };

        self.display.show_cursor().ok();
        self.display.clear_screen().ok();
        result
    }

    /// Returns false when the player asked to leave.
    fn handle_key(&mut self, key: Key) -> bool {
        let stage = self.engine.stage();
        let Some(event) = input::map_key(stage, &key) else {
            debug!("Unmapped key {:?} during the {} stage", key, stage);
            return true;
        };
        if event == InputEvent::Quit {
            info!("Player left during the {} stage", stage);
            return false;
        }

        match stage {
            Stage::Intro => {
                if event == InputEvent::Confirm {
                    self.engine.skip_intro();
                }
            }
            Stage::Story => self.handle_story(event),
            Stage::Village => self.handle_village(event),
        }
        true
    }

    fn handle_story(&mut self, event: InputEvent) {
        match event {
            InputEvent::Left => self.engine.previous_panel(),
            InputEvent::Right => self.engine.next_panel(),
            InputEvent::TogglePause => {
                self.engine.toggle_story_pause();
            }
            InputEvent::ReleaseKite => {
                // kites drift across the sky line one after another
                let width = self.display.text_width().max(1);
                let col = (self.kites * 7 + 3) % width;
                self.kites += 1;
                self.engine.release_kite(Point::new(col as f64, 0.0));
            }
            InputEvent::Confirm => {
                if self.engine.story().is_finished() {
                    self.engine.finish_story();
                } else {
                    self.engine.next_panel();
                }
            }
            _ => {}
        }
    }

    fn handle_village(&mut self, event: InputEvent) {
        if self.engine.village().finale() == Finale::Shown {
            if event == InputEvent::Confirm {
                self.engine.acknowledge_finale();
            }
            return;
        }

        match event {
            InputEvent::Up => self.move_cursor(0, -1),
            InputEvent::Down => self.move_cursor(0, 1),
            InputEvent::Left => self.move_cursor(-1, 0),
            InputEvent::Right => self.move_cursor(1, 0),
            InputEvent::Confirm => {
                if self.view.dragging.is_some() {
                    self.drop_dragged();
                } else if let Some(id) = self.item_under_cursor() {
                    self.engine.click_item(id);
                } else {
                    self.engine.click_canvas(self.view.cursor.center());
                }
            }
            InputEvent::Grab => {
                if self.view.dragging.is_some() {
                    self.drop_dragged();
                } else if let Some(id) = self.item_under_cursor() {
                    if self.engine.start_drag(id) {
                        self.view.dragging = Some(id);
                    }
                }
            }
            InputEvent::Delete => {
                self.engine.delete_selected();
                self.view.dragging = None;
            }
            InputEvent::Refresh => {
                self.engine.refresh_village();
                self.view.dragging = None;
            }
            InputEvent::SelectKind(kind) => self.engine.select_kind(kind),
            InputEvent::Offer(offering) => {
                self.engine.make_offering(offering);
            }
            InputEvent::Beat => self.engine.play_beat(),
            _ => {}
        }
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let clamp = |value: u16, delta: i32, limit: u16| {
            let moved = i32::from(value) + delta;
            moved.clamp(0, i32::from(limit.saturating_sub(1))) as u16
        };
        self.view.cursor = Cell::new(
            clamp(self.view.cursor.col, dx, self.view.cols),
            clamp(self.view.cursor.row, dy, self.view.rows),
        );
        self.engine.pointer_move(self.view.cursor.center());
    }

    fn item_under_cursor(&self) -> Option<Uuid> {
        components::item_at_cell(self.engine.village(), &self.view, self.view.cursor)
    }

    fn drop_dragged(&mut self) {
        if let Some(id) = self.view.dragging.take() {
            self.engine.end_drag(id, self.view.cursor.center());
        }
    }

    fn render(&self) -> GameResult<()> {
        let width = self.display.text_width();
        let lines: Vec<Line> = match self.engine.stage() {
            Stage::Intro => components::intro_frame(self.engine.intro(), width),
            Stage::Story => components::story_frame(self.engine.story(), width),
            Stage::Village => {
                let log: Vec<String> = if self.config.ui.show_event_log {
                    let mut recent: Vec<String> = self
                        .engine
                        .events()
                        .get_recent_events(self.config.ui.event_log_lines)
                        .into_iter()
                        .map(|event| event.summary())
                        .collect();
                    recent.reverse();
                    recent
                } else {
                    Vec::new()
                };
                components::village_frame(self.engine.village(), &self.view, &log)
            }
        };
        self.display.draw(&lines)?;
        Ok(())
    }

    fn show_farewell(&self) -> GameResult<()> {
        let stats = self.engine.village().statistics();
        self.display.show_message("🔥 Thank you for celebrating Lohri!", "success")?;
        if self.engine.stage() == Stage::Village {
            self.display.show_message(
                &format!(
                    "Placed {} decorations, offered {} treats, played the dhol {} times (best combo x{:.1})",
                    stats.items_placed, stats.offerings_made, stats.beats_played, stats.peak_multiplier
                ),
                "info",
            )?;
            if stats.finales_reached > 0 {
                self.display.show_message(
                    &format!("The village reached a pure festival {} time(s)", stats.finales_reached),
                    "info",
                )?;
            }
        }
        let events = self.engine.events();
        info!("Session ended after {} events", events.get_event_count());
        match events.export_events() {
            Ok(json) => debug!("Session events:\n{}", json),
            Err(e) => warn!("Could not export session events: {}", e),
        }
        Ok(())
    }

    pub fn engine(&self) -> &CelebrationEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interface() -> GameInterface {
        let mut config = Config::default();
        config.audio.enabled = false;
        config.ui.canvas_cols = 40;
        config.ui.canvas_rows = 10;
        GameInterface::new(config, Storyboard::lohri()).unwrap()
    }

    fn press(interface: &mut GameInterface, keys: &[Key]) {
        for key in keys {
            assert!(interface.handle_key(key.clone()));
        }
    }

    #[test]
    fn test_quit_key() {
        let mut interface = interface();
        assert!(!interface.handle_key(Key::Char('q')));
    }

    #[test]
    fn test_enter_skips_intro_then_pages_story() {
        let mut interface = interface();
        press(&mut interface, &[Key::Enter]);
        assert_eq!(interface.engine().stage(), Stage::Story);

        press(&mut interface, &[Key::Enter, Key::ArrowRight]);
        assert_eq!(interface.engine().story().current_index(), 2);

        press(&mut interface, &vec![Key::Enter; 4]);
        assert!(interface.engine().story().is_finished());
        press(&mut interface, &[Key::Enter]);
        assert_eq!(interface.engine().stage(), Stage::Village);
    }

    #[test]
    fn test_place_select_and_delete_with_keys() {
        let mut interface = interface();
        interface.engine.enter_village();

        // cursor starts near the bottom of the canvas
        press(&mut interface, &[Key::Char('1'), Key::Enter]);
        assert_eq!(interface.engine().village().items().len(), 1);
        assert_eq!(interface.engine().village().happiness().value(), 40.0);

        press(&mut interface, &[Key::Enter]);
        assert!(interface.engine().village().selected_item().is_some());

        press(&mut interface, &[Key::Char('d')]);
        assert!(interface.engine().village().items().is_empty());
        assert_eq!(interface.engine().village().happiness().value(), 35.0);
    }

    #[test]
    fn test_grab_moves_item() {
        let mut interface = interface();
        interface.engine.enter_village();
        press(&mut interface, &[Key::Char('2'), Key::Enter]);
        let id = interface.engine().village().items()[0].id;

        press(&mut interface, &[Key::Char('g'), Key::ArrowUp, Key::ArrowUp, Key::Char('g')]);
        assert!(interface.view.dragging.is_none());

        let item = interface.engine().village().item(id).unwrap();
        assert!((item.y - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_finale_blocks_input_until_acknowledged() {
        let mut interface = interface();
        interface.engine.enter_village();

        press(&mut interface, &[Key::Char('1')]);
        for _ in 0..5 {
            press(&mut interface, &[Key::Enter, Key::ArrowLeft, Key::ArrowLeft]);
        }
        assert_eq!(interface.engine().village().finale(), Finale::Shown);
        assert_eq!(interface.engine().village().items().len(), 5);

        press(&mut interface, &[Key::Char('c'), Key::Char('b')]);
        assert_eq!(interface.engine().village().statistics().offerings_made, 0);
        assert_eq!(interface.engine().village().multiplier().value(), 1.0);

        press(&mut interface, &[Key::Enter]);
        assert_eq!(interface.engine().village().finale(), Finale::Hidden);
        assert_eq!(interface.engine().village().happiness().value(), 99.0);
    }
}
