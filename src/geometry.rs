//! Static model of the 3x3x3 cube: the 27 cells, their stickers and their
//! solved transforms.
//!
//! Sticker membership is fixed when a cell is built. Only the cell
//! transform moves afterwards.

use glam::{EulerRot, IVec3, Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};

/// Distance between neighbouring cell centres
pub const SPACING: f32 = 1.0;
/// Edge length of a cell body
pub const CELL_SIZE: f32 = 0.95;
/// Edge length of a sticker quad
pub const STICKER_SIZE: f32 = 0.85;
/// Distance from a cell centre to its sticker plane
pub const STICKER_OFFSET: f32 = 0.481;
/// Number of cells in the cube
pub const CELL_COUNT: usize = 27;

/// sRGB colour, 8 bits per channel
pub type Rgb = [u8; 3];

/// Colour of the plastic body between stickers
pub const BODY_COLOR: Rgb = rgb_hex(0x262626);

const fn rgb_hex(hex: u32) -> Rgb {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

/// Outward direction of a cube face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Top,
    Bottom,
    Front,
    Back,
    Right,
    Left,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Bottom,
        Face::Front,
        Face::Back,
        Face::Right,
        Face::Left,
    ];

    /// Palette entry for this face
    pub fn color(self) -> Rgb {
        match self {
            Face::Top => rgb_hex(0xffffff),
            Face::Bottom => rgb_hex(0xffd500),
            Face::Front => rgb_hex(0x009b48),
            Face::Back => rgb_hex(0x0045ad),
            Face::Right => rgb_hex(0xb90000),
            Face::Left => rgb_hex(0xff5900),
        }
    }

    /// Unit outward normal in cell space
    pub fn normal(self) -> Vec3 {
        match self {
            Face::Top => Vec3::Y,
            Face::Bottom => Vec3::NEG_Y,
            Face::Front => Vec3::Z,
            Face::Back => Vec3::NEG_Z,
            Face::Right => Vec3::X,
            Face::Left => Vec3::NEG_X,
        }
    }

    /// Orientation that turns a +Z facing quad to face outward
    pub fn rotation(self) -> Quat {
        let (x, y) = match self {
            Face::Top => (-FRAC_PI_2, 0.0),
            Face::Bottom => (FRAC_PI_2, 0.0),
            Face::Front => (0.0, 0.0),
            Face::Back => (0.0, PI),
            Face::Right => (0.0, FRAC_PI_2),
            Face::Left => (0.0, -FRAC_PI_2),
        };
        Quat::from_euler(EulerRot::XYZ, x, y, 0.0)
    }

    /// The face whose outward direction is `sign` along axis component `axis`
    fn from_axis_sign(axis: usize, sign: i32) -> Option<Face> {
        match (axis, sign) {
            (0, 1) => Some(Face::Right),
            (0, -1) => Some(Face::Left),
            (1, 1) => Some(Face::Top),
            (1, -1) => Some(Face::Bottom),
            (2, 1) => Some(Face::Front),
            (2, -1) => Some(Face::Back),
            _ => None,
        }
    }
}

/// A coloured marker on an outward side of a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sticker {
    pub face: Face,
    /// Offset from the cell centre, in cell space
    pub offset: Vec3,
    pub rotation: Quat,
    pub color: Rgb,
}

impl Sticker {
    fn on(face: Face) -> Self {
        Sticker {
            face,
            offset: face.normal() * STICKER_OFFSET,
            rotation: face.rotation(),
            color: face.color(),
        }
    }
}

/// Derives the stickers of the cell starting at `coord`.
///
/// Every component equal to +1 or -1 adds the sticker of that face.
pub fn stickers_for(coord: IVec3) -> Vec<Sticker> {
    let order = [(1, 1), (1, -1), (2, 1), (2, -1), (0, 1), (0, -1)];
    order
        .iter()
        .filter(|&&(axis, sign)| coord[axis] == sign)
        .filter_map(|&(axis, sign)| Face::from_axis_sign(axis, sign))
        .map(Sticker::on)
        .collect()
}

/// The 27 initial lattice coordinates, x-major then y then z
pub fn initial_coords() -> [IVec3; CELL_COUNT] {
    let mut coords = [IVec3::ZERO; CELL_COUNT];
    let mut i = 0;
    for x in -1..=1 {
        for y in -1..=1 {
            for z in -1..=1 {
                coords[i] = IVec3::new(x, y, z);
                i += 1;
            }
        }
    }
    coords
}

/// Position and orientation of a cell inside the cube assembly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl CellTransform {
    /// Exact solved transform of the cell that starts at `coord`
    pub fn solved(coord: IVec3) -> Self {
        CellTransform {
            position: coord.as_vec3() * SPACING,
            rotation: Quat::IDENTITY,
        }
    }

    /// Rotates about the world origin of the assembly
    pub fn rotate_about_origin(&mut self, rotation: Quat) {
        self.position = rotation * self.position;
        self.rotation = rotation * self.rotation;
    }

    /// Maps a point from cell space into assembly space
    pub fn apply(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }
}

/// One of the 27 rigid pieces of the cube
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Coordinate at construction; identifies the cell
    pub home: IVec3,
    pub stickers: Vec<Sticker>,
    pub transform: CellTransform,
}

impl Cell {
    pub fn new(home: IVec3) -> Self {
        Cell {
            home,
            stickers: stickers_for(home),
            transform: CellTransform::solved(home),
        }
    }

    /// Puts the cell back at its exact solved transform
    pub fn reset(&mut self) {
        self.transform = CellTransform::solved(self.home);
    }
}

/// Builds the 27 cells in their solved state
pub fn build_cells() -> Vec<Cell> {
    initial_coords().into_iter().map(Cell::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sticker_count_matches_nonzero_components() {
        for coord in initial_coords() {
            let nonzero = coord.to_array().iter().filter(|c| **c != 0).count();
            assert_eq!(stickers_for(coord).len(), nonzero, "cell {coord}");
        }
    }

    #[test]
    fn sticker_colours_follow_outward_direction() {
        for coord in initial_coords() {
            for sticker in stickers_for(coord) {
                let n = sticker.face.normal().as_ivec3();
                let axis = n.abs().to_array().iter().position(|c| *c == 1).unwrap();
                assert_eq!(coord[axis], n[axis], "{:?} on cell {coord}", sticker.face);
                assert_eq!(sticker.color, sticker.face.color());
            }
        }
    }

    #[test]
    fn cell_kinds() {
        let counts = initial_coords().map(|c| stickers_for(c).len());
        let of = |n| counts.iter().filter(|&&c| c == n).count();
        assert_eq!((of(0), of(1), of(2), of(3)), (1, 6, 12, 8));
    }

    #[test]
    fn sticker_rotation_faces_outward() {
        for face in Face::ALL {
            let facing = face.rotation() * Vec3::Z;
            assert!(
                facing.abs_diff_eq(face.normal(), 1e-6),
                "{face:?} faces {facing}"
            );
        }
    }

    #[test]
    fn palette() {
        assert_eq!(Face::Top.color(), [255, 255, 255]);
        assert_eq!(Face::Bottom.color(), [255, 213, 0]);
        assert_eq!(Face::Right.color(), [185, 0, 0]);
        assert_eq!(BODY_COLOR, [38, 38, 38]);
    }

    #[test]
    fn initial_grid_is_unique_and_solved() {
        let cells = build_cells();
        assert_eq!(cells.len(), CELL_COUNT);
        for (i, a) in cells.iter().enumerate() {
            assert_eq!(a.transform.position, a.home.as_vec3());
            for b in &cells[i + 1..] {
                assert_ne!(a.home, b.home);
            }
        }
    }
}
