use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;
use crate::config::{Config, EffectConfig, GameTuning};
use crate::core::effects::{Toss, TrailParticle, Transients};
use crate::core::schedule::{Deadline, RepeatingTimer};
use crate::core::{Canvas, ComboMultiplier, Happiness, ItemKind, Offering, PlacedItem, Point, Village};

/// What a click on empty canvas did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Placed(Uuid),
    SelectionCleared,
    NoKindSelected,
    OutsideBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finale {
    Hidden,
    Shown,
}

/// State of the village-building scene.
///
/// Every operation is a synchronous, total function: input that makes no
/// sense (unknown id, click outside the ground band) leaves the state
/// untouched. Time only moves through [`GameState::advance`].
#[derive(Debug, Clone)]
pub struct GameState {
    tuning: GameTuning,
    canvas: Canvas,
    village: Village,
    selected_item: Option<Uuid>,
    selected_kind: Option<ItemKind>,
    happiness: Happiness,
    multiplier: ComboMultiplier,
    finale: Finale,
    finale_trigger: bool,
    decay: RepeatingTimer,
    tosses: Transients<Toss>,
    trail: Transients<TrailParticle>,
    sky_flash: Option<Deadline>,
    sky_flash_duration: Duration,
    pointer: Point,
    now: Duration,
    statistics: VillageStatistics,
}

impl GameState {
    pub fn new(config: &Config, now: Duration) -> Self {
        Self::with_tuning(
            config.game.clone(),
            &config.effects,
            config.timings.decay_interval(),
            now,
        )
    }

    pub fn with_tuning(tuning: GameTuning, effects: &EffectConfig, decay_interval: Duration, now: Duration) -> Self {
        let happiness = Happiness::new(tuning.initial_happiness);
        Self {
            tuning,
            canvas: Canvas::default(),
            village: Village::new(),
            selected_item: None,
            selected_kind: None,
            happiness,
            multiplier: ComboMultiplier::new(),
            finale: Finale::Hidden,
            finale_trigger: false,
            decay: RepeatingTimer::new(decay_interval, now),
            tosses: Transients::new(Duration::from_millis(effects.toss_ms)),
            trail: Transients::new(Duration::from_millis(effects.trail_ms))
                .with_capacity_limit(effects.trail_length),
            sky_flash: None,
            sky_flash_duration: Duration::from_millis(effects.sky_flash_ms),
            pointer: Point::default(),
            now,
            statistics: VillageStatistics::default(),
        }
    }

    pub fn advance(&mut self, now: Duration) {
        if now < self.now {
            return;
        }
        self.now = now;

        let ticks = self.decay.due_ticks(now);
        if ticks > 0 {
            self.multiplier.decay(self.tuning.decay_step, ticks);
        }

        self.tosses.expire(now);
        self.trail.expire(now);
        if self.sky_flash.is_some_and(|flash| flash.is_due(now)) {
            self.sky_flash = None;
        }
    }

    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    /// Picks a kind to place; picking the active kind again puts it down.
    pub fn select_kind(&mut self, kind: ItemKind) -> Option<ItemKind> {
        self.selected_kind = if self.selected_kind == Some(kind) { None } else { Some(kind) };
        self.selected_item = None;
        self.selected_kind
    }

    pub fn click_canvas(&mut self, point: Point) -> Placement {
        if self.selected_item.take().is_some() {
            return Placement::SelectionCleared;
        }
        let Some(kind) = self.selected_kind else {
            return Placement::NoKindSelected;
        };

        let position = self.canvas.normalize(point);
        if position.y < self.tuning.placement_band_min {
            return Placement::OutsideBand;
        }

        let id = self.village.insert(PlacedItem::new(kind, position));
        self.statistics.items_placed += 1;
        self.add_happiness(kind.points());
        Placement::Placed(id)
    }

    /// Toggles selection of an item. Returns whether it is now selected.
    pub fn click_item(&mut self, id: Uuid) -> bool {
        if !self.village.contains(id) {
            return false;
        }
        if self.selected_item == Some(id) {
            self.selected_item = None;
            false
        } else {
            self.selected_item = Some(id);
            true
        }
    }

    pub fn start_drag(&mut self, id: Uuid) -> bool {
        if !self.village.contains(id) {
            return false;
        }
        self.selected_item = Some(id);
        true
    }

    pub fn end_drag(&mut self, id: Uuid, point: Point) -> bool {
        let position = self.canvas.normalize(point);
        self.village.reposition(id, position)
    }

    pub fn delete_item(&mut self, id: Uuid) -> Option<PlacedItem> {
        let removed = self.village.remove(id)?;
        self.happiness.subtract(self.tuning.delete_penalty);
        self.hide_finale_below_full();
        self.selected_item = None;
        self.statistics.items_deleted += 1;
        Some(removed)
    }

    pub fn delete_selected(&mut self) -> Option<PlacedItem> {
        let id = self.selected_item?;
        self.delete_item(id)
    }

    pub fn refresh_village(&mut self) {
        self.village.clear();
        self.selected_item = None;
        self.happiness.set(self.tuning.refresh_happiness);
        self.hide_finale_below_full();
    }

    /// Adds `points * multiplier` and sends the offering towards the fire.
    pub fn make_offering(&mut self, offering: Offering) -> f64 {
        let gained = offering.points() * self.multiplier.value();
        self.add_happiness(gained);
        self.tosses.spawn(self.now, Toss { offering, from: self.pointer });
        self.statistics.offerings_made += 1;
        gained
    }

    pub fn play_beat(&mut self) {
        self.multiplier.raise(self.tuning.beat_step);
        self.add_happiness(self.tuning.beat_happiness);
        self.sky_flash = Some(Deadline::after(self.now, self.sky_flash_duration));
        self.statistics.beats_played += 1;
        self.statistics.peak_multiplier = self.statistics.peak_multiplier.max(self.multiplier.value());
    }

    pub fn acknowledge_finale(&mut self) -> bool {
        if self.finale != Finale::Shown {
            return false;
        }
        self.happiness.set(self.tuning.finale_reset);
        self.finale = Finale::Hidden;
        true
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.pointer = point;
        self.trail.spawn(self.now, TrailParticle { at: point });
    }

    /// True once after the happiness bar fills.
    pub fn take_finale_trigger(&mut self) -> bool {
        std::mem::take(&mut self.finale_trigger)
    }

    fn add_happiness(&mut self, amount: f64) {
        self.happiness.add(amount);
        if self.finale == Finale::Hidden && self.happiness.is_full() {
            self.finale = Finale::Shown;
            self.finale_trigger = true;
            self.statistics.finales_reached += 1;
        }
    }

    // the overlay only exists while the bar is full
    fn hide_finale_below_full(&mut self) {
        if self.finale == Finale::Shown && !self.happiness.is_full() {
            self.finale = Finale::Hidden;
        }
    }

    pub fn items(&self) -> &[PlacedItem] {
        self.village.items()
    }

    pub fn item(&self, id: Uuid) -> Option<&PlacedItem> {
        self.village.get(id)
    }

    pub fn selected_item(&self) -> Option<Uuid> {
        self.selected_item
    }

    pub fn selected_kind(&self) -> Option<ItemKind> {
        self.selected_kind
    }

    pub fn happiness(&self) -> Happiness {
        self.happiness
    }

    pub fn multiplier(&self) -> ComboMultiplier {
        self.multiplier
    }

    pub fn finale(&self) -> Finale {
        self.finale
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn placement_band_min(&self) -> f64 {
        self.tuning.placement_band_min
    }

    pub fn is_sky_flashing(&self) -> bool {
        self.sky_flash.is_some()
    }

    pub fn tosses(&self) -> &Transients<Toss> {
        &self.tosses
    }

    pub fn trail(&self) -> &Transients<TrailParticle> {
        &self.trail
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn statistics(&self) -> &VillageStatistics {
        &self.statistics
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VillageStatistics {
    pub items_placed: u32,
    pub items_deleted: u32,
    pub offerings_made: u32,
    pub beats_played: u32,
    pub finales_reached: u32,
    pub peak_multiplier: f64,
}

impl Default for VillageStatistics {
    fn default() -> Self {
        Self {
            items_placed: 0,
            items_deleted: 0,
            offerings_made: 0,
            beats_played: 0,
            finales_reached: 0,
            peak_multiplier: 1.0,
        }
    }
}
