//! Camera, light rig and mesh emission for the cube.
//!
//! The assembly spin from the animator wraps every cell transform, so a
//! point in cell space reaches the world as `assembly * (cell * point)`.

use crate::animator::Animator;
use crate::geometry::{Face, Rgb, Sticker, BODY_COLOR, CELL_SIZE, STICKER_SIZE};
use crate::graphics::Framebuffer;
use crate::math::{apply_lighting, calculate_light_intensity, DirectionalLight};
use crate::vertex::Vertex;
use glam::{Mat4, Quat, Vec2, Vec3};

/// Eye position the camera starts from
pub const CAMERA_EYE: Vec3 = Vec3::new(5.0, 4.0, 5.0);
/// Vertical field of view in degrees
pub const CAMERA_FOV_DEGREES: f32 = 40.0;
pub const AMBIENT_INTENSITY: f32 = 1.8;

/// Keeps the orbit camera away from the poles where `look_at` degenerates
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.05;

/// Camera orbit around the target, as azimuth and elevation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Azimuth about +Y, measured from +Z towards +X
    pub yaw: f32,
    /// Elevation above the XZ plane
    pub pitch: f32,
    pub distance: f32,
}

impl Default for Orbit {
    fn default() -> Self {
        Orbit::from_eye(CAMERA_EYE)
    }
}

impl Orbit {
    /// Orbit that puts the camera at `eye`, looking at the origin
    pub fn from_eye(eye: Vec3) -> Self {
        let distance = eye.length();
        Orbit {
            yaw: eye.x.atan2(eye.z),
            pitch: (eye.y / distance).asin(),
            distance,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * self.distance
    }

    /// Rotates by a drag of `delta` pixels on a viewport `height` pixels tall.
    ///
    /// A drag across the full height turns the camera once around.
    pub fn drag(&mut self, delta: Vec2, height: f32) {
        if height <= 0.0 {
            return;
        }
        let scale = std::f32::consts::TAU / height;
        self.yaw -= delta.x * scale;
        self.pitch = (self.pitch + delta.y * scale).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

/// Perspective camera looking at the cube
#[derive(Debug, Clone)]
pub struct Camera {
    pub target: Vec3,
    pub up: Vec3,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: CAMERA_FOV_DEGREES.to_radians(),
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl Camera {
    /// Build the combined view-projection matrix
    pub fn view_projection(&self, orbit: &Orbit, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(orbit.eye(), self.target, self.up);
        let proj = Mat4::perspective_rh(self.fovy, aspect, self.znear, self.zfar);
        proj * view
    }
}

/// Fixed lights of the scene
pub fn light_rig() -> [DirectionalLight; 2] {
    [
        DirectionalLight::from_position(Vec3::new(5.0, 8.0, 5.0), 2.0),
        DirectionalLight::from_position(Vec3::new(-5.0, -3.0, -5.0), 0.8),
    ]
}

/// A square facing +Z in its own frame, placed on one side of a cell
struct Quad {
    center: Vec3,
    rotation: Quat,
    half_size: f32,
    color: Rgb,
}

impl Quad {
    fn corners(&self) -> [Vec3; 4] {
        let h = self.half_size;
        [
            Vec3::new(-h, -h, 0.0),
            Vec3::new(h, -h, 0.0),
            Vec3::new(h, h, 0.0),
            Vec3::new(-h, h, 0.0),
        ]
        .map(|c| self.center + self.rotation * c)
    }

    fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// Body faces and stickers of one cell, in cell space
fn cell_quads(stickers: &[Sticker]) -> impl Iterator<Item = Quad> + '_ {
    let body = Face::ALL.into_iter().map(|face| Quad {
        center: face.normal() * (CELL_SIZE / 2.0),
        rotation: face.rotation(),
        half_size: CELL_SIZE / 2.0,
        color: BODY_COLOR,
    });
    let stickers = stickers.iter().map(|s| Quad {
        center: s.offset,
        rotation: s.rotation,
        half_size: STICKER_SIZE / 2.0,
        color: s.color,
    });
    body.chain(stickers)
}

/// Scene state owned by the render host
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub camera: Camera,
    pub orbit: Orbit,
}

impl Scene {
    fn project(view_proj: &Mat4, point: Vec3, size: Vec2) -> Option<Vertex> {
        let clip = *view_proj * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vertex {
            screen_position: Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y),
            depth: ndc.z,
        })
    }

    fn view_projection(&self, fb: &Framebuffer) -> Mat4 {
        let aspect = fb.width() as f32 / fb.height().max(1) as f32;
        self.camera.view_projection(&self.orbit, aspect)
    }

    /// Renders the cube into `fb`
    pub fn render(&self, animator: &Animator, fb: &mut Framebuffer) {
        fb.clear();
        let size = Vec2::new(fb.width() as f32, fb.height() as f32);
        let view_proj = self.view_projection(fb);
        let assembly = animator.assembly_rotation();
        let lights = light_rig();

        for cell in animator.cells() {
            for quad in cell_quads(&cell.stickers) {
                let normal = assembly * (cell.transform.rotation * quad.normal());
                let intensity = calculate_light_intensity(normal, AMBIENT_INTENSITY, &lights);
                let color = apply_lighting(quad.color, intensity);

                let projected = quad
                    .corners()
                    .map(|c| Self::project(&view_proj, assembly * cell.transform.apply(c), size));
                let [Some(a), Some(b), Some(c), Some(d)] = projected else {
                    continue;
                };
                fb.draw_triangle(&a, &b, &c, color);
                fb.draw_triangle(&a, &c, &d, color);
            }
        }
    }

    /// Draws the spinning assembly axes on top of the image
    pub fn render_axes(&self, animator: &Animator, fb: &mut Framebuffer) {
        let size = Vec2::new(fb.width() as f32, fb.height() as f32);
        let view_proj = self.view_projection(fb);
        let assembly = animator.assembly_rotation();
        let Some(origin) = Self::project(&view_proj, Vec3::ZERO, size) else {
            return;
        };
        let axes = [
            (Vec3::X, [255, 64, 64]),
            (Vec3::Y, [64, 255, 64]),
            (Vec3::Z, [64, 64, 255]),
        ];
        for (axis, color) in axes {
            if let Some(tip) = Self::project(&view_proj, assembly * axis * 2.2, size) {
                fb.draw_line(origin.screen_position, tip.screen_position, color);
            }
        }
    }
}
