use console::Term;
use std::io;
use std::time::Duration;
use uuid::Uuid;
use crate::core::{Finale, GameState, IntroCinematic, IntroPhase, ItemKind, Offering, PlacedItem, Point};
use crate::story::StoryPlayer;
use crate::ui::ThemeManager;

const BAR_WIDTH: usize = 20;
// the fire sits a little below the middle of the canvas
const FIRE_HEIGHT: f64 = 0.56;

/// A run of text rendered with one theme style.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: &'static str,
}

/// One rendered row of the screen, kept unstyled so it can be tested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    spans: Vec<Span>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styled<S: Into<String>>(text: S, style: &'static str) -> Self {
        Self::new().with(text, style)
    }

    pub fn with<S: Into<String>>(mut self, text: S, style: &'static str) -> Self {
        let text = text.into();
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(&text),
            _ => self.spans.push(Span { text, style }),
        }
        self
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn plain(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Terminal cell the cursor or an item occupies on the village grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub col: u16,
    pub row: u16,
}

impl Cell {
    pub fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }

    /// Host point at the centre of the cell.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.col) + 0.5, f64::from(self.row) + 0.5)
    }

    fn from_point(point: Point, cols: u16, rows: u16) -> Option<Self> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let (col, row) = (point.x.floor(), point.y.floor());
        if col >= f64::from(cols) || row >= f64::from(rows) {
            return None;
        }
        Some(Self::new(col as u16, row as u16))
    }
}

/// Interaction state the host keeps on top of the game state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VillageView {
    pub cols: u16,
    pub rows: u16,
    pub cursor: Cell,
    pub dragging: Option<Uuid>,
    pub toss_ttl: Duration,
}

pub struct Display {
    term: Term,
    theme_manager: ThemeManager,
    text_width: usize,
}

impl Display {
    pub fn new(theme_manager: ThemeManager, text_width: usize) -> Self {
        Self {
            term: Term::stdout(),
            theme_manager,
            text_width,
        }
    }

    pub fn text_width(&self) -> usize {
        self.text_width
    }

    pub fn clear_screen(&self) -> io::Result<()> {
        self.term.clear_screen()
    }

    pub fn hide_cursor(&self) -> io::Result<()> {
        self.term.hide_cursor()
    }

    pub fn show_cursor(&self) -> io::Result<()> {
        self.term.show_cursor()
    }

    /// Repaints the whole frame from the top-left corner.
    pub fn draw(&self, lines: &[Line]) -> io::Result<()> {
        self.term.move_cursor_to(0, 0)?;
        for line in lines {
            self.term.clear_line()?;
            self.term.write_line(&self.style_line(line))?;
        }
        self.term.clear_to_end_of_screen()
    }

    pub fn style_line(&self, line: &Line) -> String {
        line.spans()
            .iter()
            .map(|span| self.theme_manager.apply_style(&span.text, span.style))
            .collect()
    }

    pub fn show_message(&self, message: &str, style: &str) -> io::Result<()> {
        self.term.write_line(&self.theme_manager.apply_style(message, style))
    }

    pub fn show_error(&self, error: &str) -> io::Result<()> {
        self.show_message(&format!("❌ {}", error), "error")
    }

    pub fn show_success(&self, message: &str) -> io::Result<()> {
        self.show_message(&format!("✅ {}", message), "success")
    }

    pub fn set_theme(&mut self, theme_name: &str) -> bool {
        self.theme_manager.set_theme(theme_name)
    }

    pub fn current_theme(&self) -> &str {
        self.theme_manager.current_theme_name()
    }

    pub fn get_available_themes(&self) -> Vec<String> {
        self.theme_manager.list_themes()
    }
}

pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let needed = current_line.chars().count() + word.chars().count() + 1;
        if needed > width && !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
        }
        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }
    lines
}

pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

fn separator(width: usize) -> Line {
    Line::styled("─".repeat(width), "separator")
}

pub fn intro_frame(intro: &IntroCinematic, width: usize) -> Vec<Line> {
    let flicker = (intro.elapsed().as_millis() / 250) % 2 == 0;
    let flames: [&str; 4] = if flicker {
        ["   (  )   ", "  ( )( )  ", " ((  ) )) ", "  )(  )(  "]
    } else {
        ["   )  (   ", "  ( )(  ) ", " (( ( ))) ", "  (  )( ) "]
    };

    let mut lines = vec![Line::new(), Line::new()];
    for flame in flames {
        lines.push(Line::styled(center(flame, width), "fire"));
    }
    lines.push(Line::styled(center("\\\\||||||//", width), "fire"));
    lines.push(Line::styled(center("==========", width), "ground"));
    lines.push(Line::new());

    if intro.phase() >= IntroPhase::Dancers {
        lines.push(Line::styled(center("\\o/  \\o/   ~   \\o/  \\o/", width), "dancers"));
        lines.push(Line::styled(center(" |    |         |    | ", width), "dancers"));
        lines.push(Line::styled(center("/ \\  / \\       / \\  / \\", width), "dancers"));
    } else {
        lines.extend([Line::new(), Line::new(), Line::new()]);
    }
    lines.push(Line::new());

    if intro.phase() >= IntroPhase::Greeting {
        lines.push(Line::styled(center("Happy Lohri", width), "greeting"));
        lines.push(Line::styled(
            center("MAY THE RADIANCE OF BONFIRE BRING JOY & WARMTH", width),
            "panel_text",
        ));
    } else {
        lines.extend([Line::new(), Line::new()]);
    }

    lines.push(Line::new());
    lines.push(Line::styled(
        center(&format!("[Enter] skip   story begins in {}s", intro.remaining().as_secs() + 1), width),
        "hint",
    ));
    lines
}

pub fn story_frame(player: &StoryPlayer, width: usize) -> Vec<Line> {
    let board = player.board();
    let total = board.panels.len();
    let mut lines = Vec::new();

    let mut sky: Vec<char> = vec![' '; width];
    for sparkle in player.sparkles().iter() {
        let col = sparkle.payload.at.x.max(0.0) as usize;
        if let Some(slot) = sky.get_mut(col) {
            *slot = '✦';
        }
    }
    lines.push(Line::styled(sky.into_iter().collect::<String>(), "sparkle"));

    lines.push(Line::styled(center(&board.title, width), "title"));
    lines.push(separator(width));

    if player.is_finished() {
        lines.push(Line::new());
        lines.push(Line::styled(
            center("Lohri celebrates harvest, warmth, and new beginnings.", width),
            "greeting",
        ));
        lines.push(Line::new());
    } else if let Some(panel) = player.current_panel() {
        lines.push(Line::styled(
            format!("{}  Chapter {}/{}: {}", panel.emblem, player.current_index() + 1, total, panel.title),
            "panel_title",
        ));
        lines.push(Line::new());
        for art in &panel.art {
            lines.push(Line::styled(center(art, width), "panel_art"));
        }
        if !panel.art.is_empty() {
            lines.push(Line::new());
        }
        for text in wrap_text(&panel.text, width) {
            lines.push(Line::styled(text, "panel_text"));
        }
    }

    lines.push(Line::new());
    let dots: Vec<&str> = (0..total)
        .map(|index| if index <= player.current_index() { "●" } else { "○" })
        .collect();
    lines.push(Line::styled(center(&dots.join(" "), width), "info"));

    let status = if player.is_finished() {
        "The tale is told. [Enter] walk into the village".to_string()
    } else if player.is_paused() {
        "Paused".to_string()
    } else {
        format!("Next chapter in {:.1}s", player.time_to_next().as_secs_f64())
    };
    lines.push(Line::styled(center(&status, width), "hint"));
    lines.push(separator(width));
    lines.push(Line::styled(
        "[←/→] turn page  [space] pause  [k] fly a kite  [Enter] village  [q] quit",
        "hint",
    ));
    lines
}

/// Topmost item drawn on `cell`, if any.
pub fn item_at_cell(state: &GameState, view: &VillageView, cell: Cell) -> Option<Uuid> {
    state
        .items()
        .iter()
        .rev()
        .find(|item| item_cells(state, view, item).contains(&cell))
        .map(|item| item.id)
}

fn item_cells(state: &GameState, view: &VillageView, item: &PlacedItem) -> Vec<Cell> {
    let point = state.canvas().to_host(item.position());
    let Some(anchor) = Cell::from_point(point, view.cols, view.rows) else {
        return Vec::new();
    };
    let mut cells = vec![anchor];
    // near items are drawn two cells wide
    if item.scale >= 2.0 && anchor.col + 1 < view.cols {
        cells.push(Cell::new(anchor.col + 1, anchor.row));
    }
    cells
}

pub fn is_ground_row(state: &GameState, view: &VillageView, row: u16) -> bool {
    let position = state.canvas().normalize(Cell::new(0, row).center());
    position.y >= state.placement_band_min()
}

fn fire_cell(view: &VillageView) -> Cell {
    let row = (f64::from(view.rows) * FIRE_HEIGHT) as u16;
    Cell::new(view.cols / 2, row.min(view.rows.saturating_sub(1)))
}

fn canvas_grid(state: &GameState, view: &VillageView) -> Vec<Vec<(char, &'static str)>> {
    let cols = usize::from(view.cols);
    let sky = if state.is_sky_flashing() { ('·', "sky_flash") } else { (' ', "sky") };

    let mut grid: Vec<Vec<(char, &'static str)>> = (0..view.rows)
        .map(|row| {
            let fill = if is_ground_row(state, view, row) { ('.', "ground") } else { sky };
            vec![fill; cols]
        })
        .collect();

    let mut put = |cell: Cell, glyph: char, style: &'static str| {
        if let Some(slot) = grid
            .get_mut(usize::from(cell.row))
            .and_then(|row| row.get_mut(usize::from(cell.col)))
        {
            *slot = (glyph, style);
        }
    };

    let fire = fire_cell(view);
    put(fire, 'Ψ', "fire");

    for particle in state.trail().iter() {
        if let Some(cell) = Cell::from_point(particle.payload.at, view.cols, view.rows) {
            put(cell, '·', "trail");
        }
    }

    // back to front: the village keeps items sorted by depth
    for item in state.items() {
        let style = if state.selected_item() == Some(item.id) { "item_selected" } else { "item" };
        for cell in item_cells(state, view, item) {
            put(cell, item.kind.glyph(), style);
        }
    }

    let target = fire.center();
    let ttl = view.toss_ttl.as_secs_f64().max(f64::EPSILON);
    for toss in state.tosses().iter() {
        let progress = 1.0 - toss.expires.remaining(state.now()).as_secs_f64() / ttl;
        let from = toss.payload.from;
        let at = Point::new(
            from.x + (target.x - from.x) * progress,
            from.y + (target.y - from.y) * progress,
        );
        if let Some(cell) = Cell::from_point(at, view.cols, view.rows) {
            put(cell, 'o', "toss");
        }
    }

    let dragged = view.dragging.and_then(|id| state.item(id)).map(|item| item.kind.glyph());
    put(view.cursor, dragged.unwrap_or('+'), "cursor");

    grid
}

fn happiness_bar(value: u32) -> (String, &'static str) {
    let filled = (value as usize * BAR_WIDTH / 100).min(BAR_WIDTH);
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
    let style = if value > 60 {
        "happiness_high"
    } else if value > 30 {
        "happiness_medium"
    } else {
        "happiness_low"
    };
    (bar, style)
}

fn finale_overlay(cols: usize) -> Vec<String> {
    let inner = cols.saturating_sub(4);
    let texts = [
        String::new(),
        "A PURE FESTIVAL!".to_string(),
        String::new(),
        "You have reached 100% Celebration!".to_string(),
        "The village is perfectly adorned".to_string(),
        "for a joyous Lohri night.".to_string(),
        String::new(),
        "[Enter] Stay in the Village".to_string(),
        String::new(),
    ];
    let mut rows = vec![format!("╔{}╗", "═".repeat(inner + 2))];
    for text in texts {
        let centered = center(&text, inner);
        let pad = inner.saturating_sub(centered.chars().count());
        rows.push(format!("║ {}{} ║", centered, " ".repeat(pad)));
    }
    rows.push(format!("╚{}╝", "═".repeat(inner + 2)));
    rows
}

pub fn village_frame(state: &GameState, view: &VillageView, log: &[String]) -> Vec<Line> {
    let cols = usize::from(view.cols);
    let mut lines = Vec::new();

    let happiness = state.happiness().display();
    let (bar, bar_style) = happiness_bar(happiness);
    lines.push(
        Line::styled("Celebration ", "title")
            .with(bar, bar_style)
            .with(format!(" {:>3}%", happiness), bar_style)
            .with("   Combo ", "toolbar")
            .with(format!("x{:.1}", state.multiplier().value()), "multiplier"),
    );

    let mut canvas: Vec<Line> = canvas_grid(state, view)
        .into_iter()
        .map(|row| {
            row.into_iter()
                .fold(Line::styled("│", "separator"), |line, (glyph, style)| {
                    line.with(glyph.to_string(), style)
                })
                .with("│", "separator")
        })
        .collect();

    if state.finale() == Finale::Shown {
        let overlay = finale_overlay(cols);
        let top = canvas.len().saturating_sub(overlay.len()) / 2;
        for (offset, text) in overlay.into_iter().enumerate() {
            if let Some(line) = canvas.get_mut(top + offset) {
                *line = Line::styled("│", "separator").with(text, "finale").with("│", "separator");
            }
        }
    }

    lines.push(Line::styled(format!("┌{}┐", "─".repeat(cols)), "separator"));
    lines.extend(canvas);
    lines.push(Line::styled(format!("└{}┘", "─".repeat(cols)), "separator"));

    let mut decorations = Line::new();
    for (index, kind) in ItemKind::ALL.iter().enumerate() {
        let style = if state.selected_kind() == Some(*kind) { "toolbar_active" } else { "toolbar" };
        decorations = decorations
            .with(format!("[{}] {} {} +{}", index + 1, kind.glyph(), kind.label(), kind.points()), style)
            .with("  ", "toolbar");
    }
    lines.push(decorations);

    let keys = ['z', 'x', 'c'];
    let mut offerings = Line::new();
    for (key, offering) in keys.iter().zip(Offering::ALL.iter()) {
        offerings = offerings
            .with(format!("[{}] {} +{}", key, offering.label(), offering.points()), "toolbar")
            .with("  ", "toolbar");
    }
    lines.push(offerings.with("[b] Dhol  [r] Refresh  [q] Quit", "toolbar"));

    lines.push(Line::styled(hint(state, view), "hint"));
    for entry in log {
        lines.push(Line::styled(format!("  {}", entry), "log"));
    }
    lines
}

fn hint(state: &GameState, view: &VillageView) -> &'static str {
    if state.finale() == Finale::Shown {
        "Press Enter to stay in the village"
    } else if view.dragging.is_some() {
        "Move with the arrows, [g] to set it down"
    } else if state.selected_item().is_some() {
        "[d] remove the selected item  [g] move it  [Enter] elsewhere to deselect"
    } else if !state.items().is_empty() {
        "Press Enter on an item to select and delete it"
    } else if state.selected_kind().is_some() {
        "Press Enter on the ground to place it"
    } else {
        "Pick a decoration with 1-4, then press Enter on the ground"
    }
}
