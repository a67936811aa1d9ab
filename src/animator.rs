//! Scramble / pause / solve / pause state machine.
//!
//! [`Animator::update`] is called once per frame with the elapsed time.
//! Layer membership is decided by the integer logical grid, never by the
//! rendered float positions, so repeated moves cannot pick up the wrong
//! cells as rounding error builds up.

use crate::geometry::{build_cells, initial_coords, Cell, CELL_COUNT, SPACING};
use crate::math::{smoothstep, snap_to_lattice};
use crate::moves::{rotate_coord, solve_sequence, Move, SCRAMBLE, SCRAMBLE_LEN};
use glam::{EulerRot, IVec3, Quat, Vec2};

/// Seconds taken by one quarter turn
pub const MOVE_DURATION: f32 = 0.3;
/// Seconds spent resting between sequences
pub const PAUSE_DURATION: f32 = 1.5;
/// Idle spin of the whole assembly in radians per second, (x, y)
pub const SPIN_RATE: Vec2 = Vec2::new(0.1, 0.3);

/// Current stage of the animation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scrambling,
    PausedScrambled,
    Solving,
    PausedSolved,
}

impl Phase {
    /// The phase entered once this one is over
    pub fn next(self) -> Phase {
        match self {
            Phase::PausedSolved => Phase::Scrambling,
            Phase::Scrambling => Phase::PausedScrambled,
            Phase::PausedScrambled => Phase::Solving,
            Phase::Solving => Phase::PausedSolved,
        }
    }

    pub fn is_paused(self) -> bool {
        matches!(self, Phase::PausedScrambled | Phase::PausedSolved)
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Scrambling => "scrambling",
            Phase::PausedScrambled => "paused_scrambled",
            Phase::Solving => "solving",
            Phase::PausedSolved => "paused_solved",
        }
    }
}

/// Mutable animation record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub phase: Phase,
    pub move_index: usize,
    /// Linear progress through the current move, 0..=1
    pub progress: f32,
    /// `smoothstep(progress)`
    pub eased_progress: f32,
    pub pause_timer: f32,
}

impl Default for AnimationState {
    fn default() -> Self {
        AnimationState {
            phase: Phase::PausedSolved,
            move_index: 0,
            progress: 0.0,
            eased_progress: 0.0,
            pause_timer: 0.0,
        }
    }
}

impl AnimationState {
    fn start_move(&mut self) {
        self.progress = 0.0;
        self.eased_progress = 0.0;
    }
}

/// Owns the cube cells and drives them through the move cycle
#[derive(Debug, Clone)]
pub struct Animator {
    cells: Vec<Cell>,
    logical: [IVec3; CELL_COUNT],
    state: AnimationState,
    scramble: [Move; SCRAMBLE_LEN],
    solve: [Move; SCRAMBLE_LEN],
    /// Accumulated idle spin angles of the assembly, (x, y)
    spin: Vec2,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    pub fn new() -> Self {
        Animator {
            cells: build_cells(),
            logical: initial_coords(),
            state: AnimationState::default(),
            scramble: SCRAMBLE,
            solve: solve_sequence(),
            spin: Vec2::ZERO,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn logical_coords(&self) -> &[IVec3; CELL_COUNT] {
        &self.logical
    }

    /// Number of cells whose logical coordinate is back at their home
    pub fn cells_home(&self) -> usize {
        self.cells
            .iter()
            .zip(self.logical_coords())
            .filter(|(cell, coord)| cell.home == **coord)
            .count()
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Orientation of the whole assembly from the idle spin.
    ///
    /// Cell transforms are nested inside it.
    pub fn assembly_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.spin.x, self.spin.y, 0.0)
    }

    /// Move list of the active phase, if any
    fn active_moves(&self) -> Option<&[Move; SCRAMBLE_LEN]> {
        match self.state.phase {
            Phase::Scrambling => Some(&self.scramble),
            Phase::Solving => Some(&self.solve),
            Phase::PausedScrambled | Phase::PausedSolved => None,
        }
    }

    /// The move currently being animated
    pub fn current_move(&self) -> Option<Move> {
        self.active_moves()
            .and_then(|moves| moves.get(self.state.move_index))
            .copied()
    }

    /// Advances the animation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.spin += SPIN_RATE * dt;

        if self.state.phase.is_paused() {
            self.state.pause_timer += dt;
            if self.state.pause_timer >= PAUSE_DURATION {
                self.state.pause_timer = 0.0;
                self.state.move_index = 0;
                self.state.start_move();
                self.enter(self.state.phase.next());
            }
            return;
        }

        let Some(current) = self.current_move() else {
            self.finish_sequence();
            return;
        };

        let prev_eased = self.state.eased_progress;
        self.state.progress = (self.state.progress + dt / MOVE_DURATION).min(1.0);
        self.state.eased_progress = smoothstep(self.state.progress);
        let delta_angle = current.angle * (self.state.eased_progress - prev_eased);

        let step = Quat::from_axis_angle(current.axis.unit(), delta_angle);
        for (cell, coord) in self.cells.iter_mut().zip(&self.logical) {
            if current.affects(*coord) {
                cell.transform.rotate_about_origin(step);
            }
        }

        if self.state.progress >= 1.0 {
            self.complete_move(current);
            if self.state.move_index >= SCRAMBLE_LEN {
                self.finish_sequence();
            }
        }
    }

    fn complete_move(&mut self, current: Move) {
        for (cell, coord) in self.cells.iter_mut().zip(self.logical.iter_mut()) {
            if !current.affects(*coord) {
                continue;
            }
            cell.transform.position = snap_to_lattice(cell.transform.position, SPACING);
            *coord = rotate_coord(*coord, current.axis, current.angle);
        }
        log::trace!(
            "{} move {} done: {:?} layer {}",
            self.state.phase.name(),
            self.state.move_index,
            current.axis,
            current.layer
        );
        self.state.move_index += 1;
        self.state.start_move();
    }

    fn finish_sequence(&mut self) {
        if self.state.phase == Phase::Solving {
            self.reset_to_solved();
        }
        self.state.pause_timer = 0.0;
        self.enter(self.state.phase.next());
    }

    /// Snaps every cell to its exact solved transform
    fn reset_to_solved(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
        self.logical = initial_coords();
        log::debug!("cube reset to exact solved state");
    }

    fn enter(&mut self, phase: Phase) {
        log::debug!("phase {} -> {}", self.state.phase.name(), phase.name());
        self.state.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use pretty_assertions::assert_eq;

    fn assert_on_lattice(animator: &Animator) {
        for coord in animator.logical_coords() {
            for c in coord.to_array() {
                assert!((-1..=1).contains(&c), "logical coordinate {coord} off grid");
            }
        }
    }

    /// Runs one frame per move so each move finishes in a single step.
    fn run_moves(animator: &mut Animator, count: usize) {
        for _ in 0..count {
            animator.update(MOVE_DURATION);
            assert_on_lattice(animator);
        }
    }

    #[test]
    fn starts_paused_solved() {
        let animator = Animator::new();
        assert_eq!(*animator.state(), AnimationState::default());
        assert_eq!(animator.state().phase, Phase::PausedSolved);
        assert_eq!(animator.cells().len(), CELL_COUNT);
    }

    #[test]
    fn pause_then_scramble() {
        let mut animator = Animator::new();
        animator.update(PAUSE_DURATION / 2.0);
        assert_eq!(animator.state().phase, Phase::PausedSolved);
        animator.update(PAUSE_DURATION / 2.0);
        assert_eq!(animator.state().phase, Phase::Scrambling);
        assert_eq!(animator.state().move_index, 0);
        assert_eq!(animator.current_move(), Some(SCRAMBLE[0]));
    }

    #[test]
    fn full_cycle() {
        let mut animator = Animator::new();
        animator.update(PAUSE_DURATION);
        assert_eq!(animator.state().phase, Phase::Scrambling);

        run_moves(&mut animator, SCRAMBLE_LEN - 1);
        assert_eq!(animator.state().phase, Phase::Scrambling);
        run_moves(&mut animator, 1);
        assert_eq!(animator.state().phase, Phase::PausedScrambled);
        assert_ne!(*animator.logical_coords(), initial_coords());
        assert!(animator.cells_home() < CELL_COUNT);

        animator.update(PAUSE_DURATION);
        assert_eq!(animator.state().phase, Phase::Solving);
        assert_eq!(animator.current_move(), Some(solve_sequence()[0]));

        run_moves(&mut animator, SCRAMBLE_LEN);
        assert_eq!(animator.state().phase, Phase::PausedSolved);
        assert_eq!(*animator.logical_coords(), initial_coords());
        assert_eq!(animator.cells_home(), CELL_COUNT);
        for cell in animator.cells() {
            assert_eq!(cell.transform.position, cell.home.as_vec3() * SPACING);
            assert_eq!(cell.transform.rotation, Quat::IDENTITY);
        }

        animator.update(PAUSE_DURATION);
        assert_eq!(animator.state().phase, Phase::Scrambling);
    }

    #[test]
    fn eased_progress_within_a_move() {
        let mut animator = Animator::new();
        animator.update(PAUSE_DURATION);
        let mut prev = animator.state().eased_progress;
        assert_eq!(prev, 0.0);
        for _ in 0..29 {
            animator.update(MOVE_DURATION / 30.0);
            let eased = animator.state().eased_progress;
            assert!(eased >= prev);
            assert!(eased < 1.0);
            prev = eased;
        }
        assert_eq!(animator.state().move_index, 0);
        // The remainder finishes the move and progress is clamped
        animator.update(MOVE_DURATION);
        assert_eq!(animator.state().move_index, 1);
        assert_eq!(animator.state().progress, 0.0);
    }

    #[test]
    fn small_steps_stay_on_lattice() {
        let mut animator = Animator::new();
        let dt = 1.0 / 60.0;
        let mut completed = 0;
        let mut last_index = 0;
        while animator.state().phase != Phase::PausedScrambled {
            animator.update(dt);
            assert_on_lattice(&animator);
            let index = animator.state().move_index;
            if index != last_index {
                completed += 1;
                last_index = index;
                // Cells of a finished layer sit exactly on lattice points
                for cell in animator.cells() {
                    let p = cell.transform.position;
                    assert_eq!(p, p.round());
                }
            }
        }
        assert_eq!(completed, SCRAMBLE_LEN);
    }

    #[test]
    fn only_current_layer_moves() {
        let mut animator = Animator::new();
        animator.update(PAUSE_DURATION);
        let before: Vec<_> = animator.cells().iter().map(|c| c.transform).collect();
        animator.update(MOVE_DURATION / 2.0);
        let current = SCRAMBLE[0];
        for ((cell, old), coord) in animator
            .cells()
            .iter()
            .zip(&before)
            .zip(animator.logical_coords())
        {
            if current.affects(*coord) {
                assert_ne!(cell.transform.rotation, old.rotation);
            } else {
                assert_eq!(cell.transform, *old);
            }
        }
    }

    #[test]
    fn half_turn_of_smoothstep_is_half_angle() {
        let mut animator = Animator::new();
        animator.update(PAUSE_DURATION);
        animator.update(MOVE_DURATION / 2.0);
        // U layer corner (1, 1, 1) turned -45 degrees about y
        let corner = animator
            .cells()
            .iter()
            .find(|c| c.home == IVec3::new(1, 1, 1))
            .unwrap();
        let expected = Quat::from_rotation_y(SCRAMBLE[0].angle / 2.0) * Vec3::ONE;
        assert!(corner.transform.position.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn idle_spin_never_resets() {
        let mut animator = Animator::new();
        let first = animator.assembly_rotation();
        animator.update(PAUSE_DURATION);
        run_moves(&mut animator, SCRAMBLE_LEN);
        animator.update(PAUSE_DURATION);
        run_moves(&mut animator, SCRAMBLE_LEN);
        assert_eq!(animator.state().phase, Phase::PausedSolved);
        let elapsed = 2.0 * PAUSE_DURATION + 2.0 * SCRAMBLE_LEN as f32 * MOVE_DURATION;
        let expected = Quat::from_euler(EulerRot::XYZ, 0.1 * elapsed, 0.3 * elapsed, 0.0);
        assert!(animator.assembly_rotation().abs_diff_eq(expected, 1e-4));
        assert!(!animator.assembly_rotation().abs_diff_eq(first, 1e-4));
    }
}
