//! Hover-driven animation state for the four pyramid blocks.
//!
//! Everything the per-frame systems render from lives here as plain owned
//! data, updated in place once per frame by [`PyramidState::step`].

use std::f32::consts::{FRAC_PI_4, TAU};
use std::time::Duration;

use bevy::color::Mix;
use bevy::prelude::*;

use crate::anim::{ease_toward, rate_for_factor, ChangeNotifier};
use crate::data::SECTION_COUNT;
use crate::render::{BLOCK_BASE_COLOR, BLOCK_HIGHLIGHT_COLOR};

pub const BLOCK_COUNT: usize = SECTION_COUNT;
/// Vertical offset of a fully lifted block: one block height.
pub const LIFT_AMOUNT: f32 = 0.5;
/// Rotation about the vertical axis of a fully tilted block.
pub const FIXED_TILT: f32 = FRAC_PI_4;

pub const ICON_BASE_SCALE: f32 = 0.2;
pub const ICON_HOVER_SCALE: f32 = 0.28;
const ICON_HOVER_TINT: Color = Color::srgb(0.55, 0.9, 1.0);

/// Rates are decay constants in 1/s; see [`crate::anim::rate_for_factor`].
#[derive(Clone, Debug)]
pub struct PyramidTuning {
    /// Idle spin of the whole assembly, radians per second.
    pub rotation_speed: f32,
    pub lift_rate: f32,
    pub accent_rise_rate: f32,
    pub accent_decay_rate: f32,
    pub icon_rate: f32,
    pub hover_debounce: Duration,
}

impl Default for PyramidTuning {
    fn default() -> Self {
        Self {
            rotation_speed: 0.005 * 60.0,
            lift_rate: rate_for_factor(0.1, 60.0),
            accent_rise_rate: rate_for_factor(0.15, 60.0),
            accent_decay_rate: rate_for_factor(0.02, 60.0),
            icon_rate: rate_for_factor(0.15, 60.0),
            hover_debounce: Duration::from_millis(100),
        }
    }
}

/// Eased state of one block, both components in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlockAnim {
    pub lift: f32,
    pub tilt: f32,
}

impl BlockAnim {
    pub fn offset(&self) -> f32 {
        self.lift * LIFT_AMOUNT
    }

    pub fn angle(&self) -> f32 {
        self.tilt * FIXED_TILT
    }
}

/// Blocks up to and including the hovered one open together.
pub fn block_is_lifted(hovered: Option<usize>, block: usize) -> bool {
    hovered.is_some_and(|h| block <= h)
}

pub fn lift_target(hovered: Option<usize>, block: usize) -> f32 {
    if block_is_lifted(hovered, block) {
        1.0
    } else {
        0.0
    }
}

/// Pointer input with an optional entry debounce.
///
/// A pending entry is replaced by any later entry and dropped on leave.
/// Moving straight from one block to another leaves the old block at once;
/// only the new entry waits for the debounce.
#[derive(Clone, Debug, Default)]
pub struct HoverInput {
    current: Option<usize>,
    pending: Option<(usize, Duration)>,
}

impl HoverInput {
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn pending(&self) -> Option<usize> {
        self.pending.map(|(block, _)| block)
    }

    pub fn enter(&mut self, block: usize, now: Duration, debounce: Duration) {
        if self.current == Some(block) {
            self.pending = None;
            return;
        }
        if self.pending() == Some(block) {
            return;
        }
        if debounce.is_zero() {
            self.current = Some(block);
            self.pending = None;
        } else {
            self.current = None;
            self.pending = Some((block, now + debounce));
        }
    }

    pub fn leave(&mut self) {
        self.current = None;
        self.pending = None;
    }

    /// Promotes a matured pending entry and returns the hover value.
    pub fn settle(&mut self, now: Duration) -> Option<usize> {
        if let Some((block, due)) = self.pending {
            if now >= due {
                self.current = Some(block);
                self.pending = None;
            }
        }
        self.current
    }
}

#[derive(Resource, Clone, Debug)]
pub struct PyramidState {
    pub tuning: PyramidTuning,
    hover: HoverInput,
    hovered: Option<usize>,
    blocks: [BlockAnim; BLOCK_COUNT],
    rotation: f32,
    accent: f32,
    icon_emphasis: f32,
    elapsed: f32,
    notifier: ChangeNotifier<Option<usize>>,
}

impl Default for PyramidState {
    fn default() -> Self {
        Self::new(PyramidTuning::default())
    }
}

impl PyramidState {
    pub fn new(tuning: PyramidTuning) -> Self {
        Self {
            tuning,
            hover: HoverInput::default(),
            hovered: None,
            blocks: [BlockAnim::default(); BLOCK_COUNT],
            rotation: 0.0,
            accent: 0.0,
            icon_emphasis: 0.0,
            elapsed: 0.0,
            notifier: ChangeNotifier::new(None),
        }
    }

    /// Records which hit volume the pointer is over this frame, if any.
    pub fn pointer_at(&mut self, target: Option<usize>, now: Duration) {
        match target {
            Some(block) if block < BLOCK_COUNT => {
                self.hover.enter(block, now, self.tuning.hover_debounce)
            }
            _ => self.hover.leave(),
        }
    }

    /// Advances one frame. Returns the new hover value when it differs from
    /// the last one reported.
    pub fn step(&mut self, dt: f32, now: Duration) -> Option<Option<usize>> {
        let dt = dt.max(0.0);
        self.rotation = (self.rotation + self.tuning.rotation_speed * dt).rem_euclid(TAU);

        let hovered = self.hover.settle(now);
        self.hovered = hovered;
        let rate = self.tuning.lift_rate;
        for (index, block) in self.blocks.iter_mut().enumerate() {
            let lift = lift_target(hovered, index);
            let tilt = if lift > 0.0 { 1.0 } else { 0.0 };
            block.lift = ease_toward(block.lift, lift, rate, dt);
            block.tilt = ease_toward(block.tilt, tilt, rate, dt);
        }

        // Quick to light up, slow to cool down.
        let (accent_target, accent_rate) = if hovered.is_some() {
            (1.0, self.tuning.accent_rise_rate)
        } else {
            (0.0, self.tuning.accent_decay_rate)
        };
        self.accent = ease_toward(self.accent, accent_target, accent_rate, dt);

        self.elapsed = now.as_secs_f32();

        let icon_target = if hovered.is_some() { 1.0 } else { 0.0 };
        self.icon_emphasis = ease_toward(self.icon_emphasis, icon_target, self.tuning.icon_rate, dt);

        self.notifier.observe(hovered)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn hover_input(&self) -> &HoverInput {
        &self.hover
    }

    pub fn last_notified(&self) -> Option<usize> {
        self.notifier.last()
    }

    pub fn block(&self, index: usize) -> BlockAnim {
        self.blocks.get(index).copied().unwrap_or_default()
    }

    pub fn blocks(&self) -> &[BlockAnim; BLOCK_COUNT] {
        &self.blocks
    }

    pub fn is_highlighted(&self, block: usize) -> bool {
        block_is_lifted(self.hovered, block)
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn accent(&self) -> f32 {
        self.accent
    }

    pub fn accent_color(&self) -> Color {
        BLOCK_BASE_COLOR
            .to_linear()
            .mix(&BLOCK_HIGHLIGHT_COLOR.to_linear(), self.accent)
            .into()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn icon_scale(&self) -> f32 {
        ICON_BASE_SCALE + (ICON_HOVER_SCALE - ICON_BASE_SCALE) * self.icon_emphasis
    }

    pub fn icon_tint(&self) -> Color {
        LinearRgba::WHITE
            .mix(&ICON_HOVER_TINT.to_linear(), self.icon_emphasis)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn immediate() -> PyramidState {
        PyramidState::new(PyramidTuning {
            hover_debounce: Duration::ZERO,
            ..default()
        })
    }

    /// Runs `frames` frames with the pointer held at `target`, collecting notifications.
    fn run(
        state: &mut PyramidState,
        clock: &mut Duration,
        target: Option<usize>,
        frames: usize,
    ) -> Vec<Option<usize>> {
        let mut events = Vec::new();
        for _ in 0..frames {
            *clock += Duration::from_secs_f32(FRAME);
            state.pointer_at(target, *clock);
            if let Some(change) = state.step(FRAME, *clock) {
                events.push(change);
            }
        }
        events
    }

    #[test]
    fn hovering_lifts_every_block_up_to_the_hovered_one() {
        for hovered in 0..BLOCK_COUNT {
            for block in 0..BLOCK_COUNT {
                let expected = if block <= hovered { 1.0 } else { 0.0 };
                assert_eq!(lift_target(Some(hovered), block), expected);
            }
        }
        assert!((0..BLOCK_COUNT).all(|b| lift_target(None, b) == 0.0));
    }

    #[test]
    fn enter_and_leave_notify_exactly_twice() {
        let mut state = immediate();
        let mut clock = Duration::ZERO;
        let mut events = run(&mut state, &mut clock, None, 30);
        events.extend(run(&mut state, &mut clock, Some(1), 120));
        events.extend(run(&mut state, &mut clock, None, 120));
        assert_eq!(events, vec![Some(1), None]);
    }

    #[test]
    fn no_notification_at_mount() {
        let mut state = PyramidState::default();
        let mut clock = Duration::ZERO;
        assert!(run(&mut state, &mut clock, None, 10).is_empty());
    }

    #[test]
    fn hovered_stack_settles_lifted_and_tilted() {
        let mut state = immediate();
        let mut clock = Duration::ZERO;
        run(&mut state, &mut clock, Some(2), 600);

        for block in 0..3 {
            let anim = state.block(block);
            assert!((anim.offset() - LIFT_AMOUNT).abs() < 1e-3, "block {block}: {anim:?}");
            assert!((anim.angle() - FIXED_TILT).abs() < 1e-3, "block {block}: {anim:?}");
            assert!(state.is_highlighted(block));
        }
        assert_eq!(state.block(3), BlockAnim::default());
        assert!(!state.is_highlighted(3));
    }

    #[test]
    fn eased_values_never_overshoot() {
        let mut state = immediate();
        let mut clock = Duration::ZERO;
        let mut previous = state.block(0);
        for _ in 0..300 {
            run(&mut state, &mut clock, Some(0), 1);
            let anim = state.block(0);
            assert!(anim.lift >= previous.lift && anim.lift <= 1.0);
            assert!(anim.tilt >= previous.tilt && anim.tilt <= 1.0);
            previous = anim;
        }
        for _ in 0..300 {
            run(&mut state, &mut clock, None, 1);
            let anim = state.block(0);
            assert!(anim.lift <= previous.lift && anim.lift >= 0.0);
            previous = anim;
        }
    }

    #[test]
    fn accent_lights_up_faster_than_it_cools_down() {
        let mut state = immediate();
        let mut clock = Duration::ZERO;
        run(&mut state, &mut clock, Some(3), 20);
        let risen = state.accent();

        run(&mut state, &mut clock, Some(3), 600);
        assert!(state.accent() > 0.99);
        run(&mut state, &mut clock, None, 20);
        let fallen = 1.0 - state.accent();

        assert!(risen > fallen, "rise {risen} vs decay {fallen}");
    }

    #[test]
    fn icons_grow_while_hovered() {
        let mut state = immediate();
        let mut clock = Duration::ZERO;
        assert_eq!(state.icon_scale(), ICON_BASE_SCALE);
        run(&mut state, &mut clock, Some(0), 600);
        assert!((state.icon_scale() - ICON_HOVER_SCALE).abs() < 1e-3);
        run(&mut state, &mut clock, None, 600);
        assert!((state.icon_scale() - ICON_BASE_SCALE).abs() < 1e-3);
    }

    #[test]
    fn rotation_advances_regardless_of_hover() {
        let mut state = immediate();
        let mut clock = Duration::ZERO;
        run(&mut state, &mut clock, None, 60);
        let idle = state.rotation();
        run(&mut state, &mut clock, Some(2), 60);
        let hovered = state.rotation() - idle;
        assert!(idle > 0.0);
        assert!((idle - hovered).abs() < 1e-4);
    }

    #[test]
    fn debounce_delays_entry() {
        let mut state = PyramidState::default();
        let mut clock = Duration::ZERO;
        // 100 ms at 60 Hz: still pending after five frames.
        let early = run(&mut state, &mut clock, Some(1), 5);
        assert!(early.is_empty());
        assert_eq!(state.hover_input().pending(), Some(1));
        let later = run(&mut state, &mut clock, Some(1), 5);
        assert_eq!(later, vec![Some(1)]);
    }

    #[test]
    fn leaving_cancels_a_pending_entry() {
        let mut state = PyramidState::default();
        let mut clock = Duration::ZERO;
        let mut events = run(&mut state, &mut clock, Some(2), 3);
        events.extend(run(&mut state, &mut clock, None, 60));
        assert!(events.is_empty());
        assert_eq!(state.hover_input().pending(), None);
    }

    #[test]
    fn switching_blocks_leaves_the_old_one_before_entering_the_new_one() {
        let mut input = HoverInput::default();
        let debounce = Duration::from_millis(100);
        input.enter(0, Duration::ZERO, Duration::ZERO);
        assert_eq!(input.settle(Duration::ZERO), Some(0));

        input.enter(2, Duration::from_millis(10), debounce);
        assert_eq!(input.settle(Duration::from_millis(50)), None);
        // Re-entering the pending block does not restart its timer.
        input.enter(2, Duration::from_millis(60), debounce);
        assert_eq!(input.settle(Duration::from_millis(110)), Some(2));
    }

    #[test]
    fn moving_between_blocks_reports_none_in_between() {
        let mut state = PyramidState::default();
        let mut clock = Duration::ZERO;
        let mut events = run(&mut state, &mut clock, Some(0), 20);
        assert_eq!(state.last_notified(), Some(0));

        events.extend(run(&mut state, &mut clock, Some(1), 2));
        assert_eq!(state.hovered(), None);
        assert_eq!(state.hover_input().pending(), Some(1));

        events.extend(run(&mut state, &mut clock, Some(1), 20));
        assert_eq!(events, vec![Some(0), None, Some(1)]);
        assert_eq!(state.last_notified(), Some(1));
    }

    #[test]
    fn a_later_entry_supersedes_a_pending_one() {
        let mut input = HoverInput::default();
        let debounce = Duration::from_millis(100);
        input.enter(1, Duration::ZERO, debounce);
        input.enter(3, Duration::from_millis(50), debounce);
        assert_eq!(input.settle(Duration::from_millis(120)), None);
        assert_eq!(input.settle(Duration::from_millis(150)), Some(3));
    }

    #[test]
    fn out_of_range_targets_count_as_leaving() {
        let mut state = immediate();
        let mut clock = Duration::ZERO;
        run(&mut state, &mut clock, Some(1), 2);
        let events = run(&mut state, &mut clock, Some(BLOCK_COUNT), 2);
        assert_eq!(events, vec![None]);
    }
}
