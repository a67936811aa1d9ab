use glam::{Vec2, Vec3};

/// Vertex after projection, with its view-space depth
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub screen_position: Vec2,
    /// Normalized device depth, smaller is closer
    pub depth: f32,
}
