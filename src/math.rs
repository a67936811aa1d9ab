use crate::geometry::Rgb;
use glam::{Vec2, Vec3};

/// Smoothstep easing, `3t² - 2t³`
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Rounds each component to the nearest multiple of `spacing`
pub fn snap_to_lattice(v: Vec3, spacing: f32) -> Vec3 {
    (v / spacing).round() * spacing
}

/// Edge function used in rasterization
pub fn edge_function(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// A light shining along a fixed direction
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Unit vector pointing from the scene towards the light
    pub direction: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Light placed at `position` and aimed at the origin
    pub fn from_position(position: Vec3, intensity: f32) -> Self {
        DirectionalLight {
            direction: position.normalize(),
            intensity,
        }
    }
}

/// Calculates the Lambert light intensity for a surface normal
pub fn calculate_light_intensity(normal: Vec3, ambient: f32, lights: &[DirectionalLight]) -> f32 {
    let direct: f32 = lights
        .iter()
        .map(|light| normal.dot(light.direction).max(0.0) * light.intensity)
        .sum();
    // Lambert BRDF divides irradiance by pi
    (ambient + direct) / std::f32::consts::PI
}

/// Applies lighting to a color
pub fn apply_lighting(color: Rgb, intensity: f32) -> Rgb {
    color.map(|c| (c as f32 * intensity).min(255.0) as u8)
}
