use glam::{IVec3, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Rotation axis of a layer move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index of this axis in a 3-vector
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along this axis
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// A quarter turn of one layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub axis: Axis,
    /// Layer coordinate along `axis`, one of -1, 0 or 1
    pub layer: i32,
    /// Signed quarter turn in radians
    pub angle: f32,
}

impl Move {
    pub const fn new(axis: Axis, layer: i32, angle: f32) -> Self {
        Move { axis, layer, angle }
    }

    /// The move that undoes this one
    pub fn inverse(self) -> Self {
        Move {
            angle: -self.angle,
            ..self
        }
    }

    /// Whether a cell at logical coordinate `coord` belongs to this move's layer
    pub fn affects(&self, coord: IVec3) -> bool {
        coord[self.axis.index()] == self.layer
    }
}

/// Number of moves in the scramble (and the solve)
pub const SCRAMBLE_LEN: usize = 10;

/// Fixed scramble that touches all six faces
pub const SCRAMBLE: [Move; SCRAMBLE_LEN] = [
    Move::new(Axis::Y, 1, -FRAC_PI_2),
    Move::new(Axis::X, 1, -FRAC_PI_2),
    Move::new(Axis::Z, 1, -FRAC_PI_2),
    Move::new(Axis::Y, -1, FRAC_PI_2),
    Move::new(Axis::X, -1, FRAC_PI_2),
    Move::new(Axis::Z, -1, FRAC_PI_2),
    Move::new(Axis::Y, 1, -FRAC_PI_2),
    Move::new(Axis::X, 1, -FRAC_PI_2),
    Move::new(Axis::Z, 1, -FRAC_PI_2),
    Move::new(Axis::Y, -1, FRAC_PI_2),
];

/// Builds the inverse of a move sequence: reversed order, negated angles
pub fn invert_sequence(moves: &[Move; SCRAMBLE_LEN]) -> [Move; SCRAMBLE_LEN] {
    let mut solve = *moves;
    solve.reverse();
    for m in solve.iter_mut() {
        *m = m.inverse();
    }
    solve
}

/// Solve sequence derived from [`SCRAMBLE`]
pub fn solve_sequence() -> [Move; SCRAMBLE_LEN] {
    invert_sequence(&SCRAMBLE)
}

/// Rotates a lattice coordinate a quarter turn about `axis`.
///
/// Only the sign of `angle` matters. The result matches a right-handed
/// rotation by the same angle, so layer membership stays in step with the
/// rendered transform.
pub fn rotate_coord(coord: IVec3, axis: Axis, angle: f32) -> IVec3 {
    let IVec3 { x, y, z } = coord;
    let dir = if angle > 0.0 { 1 } else { -1 };
    match axis {
        Axis::X => IVec3::new(x, -dir * z, dir * y),
        Axis::Y => IVec3::new(dir * z, y, -dir * x),
        Axis::Z => IVec3::new(-dir * y, dir * x, z),
    }
}
