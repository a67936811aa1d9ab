use crate::geometry::Rgb;
use crate::math::edge_function;
use crate::vertex::Vertex;
use glam::Vec2;

/// Pixel buffer with a z-buffer. Unset pixels are transparent.
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Option<Rgb>>,
    z_buffer: Vec<f32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            pixels: vec![None; width * height],
            z_buffer: vec![f32::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Clears colour and depth
    pub fn clear(&mut self) {
        self.pixels.fill(None);
        self.z_buffer.fill(f32::INFINITY);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            None
        }
    }

    /// Draws a flat-shaded triangle with depth testing
    pub fn draw_triangle(&mut self, v0: &Vertex, v1: &Vertex, v2: &Vertex, color: Rgb) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (p0, p1, p2) = (v0.screen_position, v1.screen_position, v2.screen_position);

        // Compute bounding box of the triangle
        let min = p0.min(p1).min(p2).floor().max(Vec2::ZERO);
        let max = p0
            .max(p1)
            .max(p2)
            .ceil()
            .min(Vec2::new(self.width as f32 - 1.0, self.height as f32 - 1.0));
        if min.x > max.x || min.y > max.y {
            return;
        }

        // Precompute area of the triangle; its sign gives the winding
        let area = edge_function(p0, p1, p2);
        if area.abs() < f32::EPSILON {
            return;
        }

        for y in min.y as usize..=max.y as usize {
            for x in min.x as usize..=max.x as usize {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

                // Normalized barycentric coordinates, positive inside for either winding
                let w0 = edge_function(p1, p2, p) / area;
                let w1 = edge_function(p2, p0, p) / area;
                let w2 = edge_function(p0, p1, p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = v0.depth * w0 + v1.depth * w1 + v2.depth * w2;
                let offset = y * self.width + x;
                if depth < self.z_buffer[offset] {
                    self.z_buffer[offset] = depth;
                    self.pixels[offset] = Some(color);
                }
            }
        }
    }

    /// Draws a line between two points using Bresenham's algorithm, ignoring depth
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgb) {
        let (mut x0, mut y0) = (from.x.round() as isize, from.y.round() as isize);
        let (x1, y1) = (to.x.round() as isize, to.y.round() as isize);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy

        loop {
            if x0 >= 0 && x0 < self.width as isize && y0 >= 0 && y0 < self.height as isize {
                self.pixels[y0 as usize * self.width + x0 as usize] = Some(color);
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vertex(x: f32, y: f32, depth: f32) -> Vertex {
        Vertex {
            screen_position: Vec2::new(x, y),
            depth,
        }
    }

    #[test]
    fn triangle_fills_both_windings() {
        let mut fb = Framebuffer::new(8, 8);
        let (a, b, c) = (vertex(0.0, 0.0, 0.5), vertex(8.0, 0.0, 0.5), vertex(0.0, 8.0, 0.5));
        fb.draw_triangle(&a, &b, &c, [255, 0, 0]);
        assert_eq!(fb.pixel(1, 1), Some([255, 0, 0]));
        assert_eq!(fb.pixel(7, 7), None);

        fb.clear();
        fb.draw_triangle(&a, &c, &b, [0, 255, 0]);
        assert_eq!(fb.pixel(1, 1), Some([0, 255, 0]));
    }

    #[test]
    fn nearer_triangle_wins() {
        let mut fb = Framebuffer::new(4, 4);
        let near = [vertex(0.0, 0.0, 0.1), vertex(4.0, 0.0, 0.1), vertex(0.0, 4.0, 0.1)];
        let far = [vertex(0.0, 0.0, 0.9), vertex(4.0, 0.0, 0.9), vertex(0.0, 4.0, 0.9)];
        fb.draw_triangle(&near[0], &near[1], &near[2], [1, 1, 1]);
        fb.draw_triangle(&far[0], &far[1], &far[2], [2, 2, 2]);
        assert_eq!(fb.pixel(0, 0), Some([1, 1, 1]));
    }

    #[test]
    fn off_screen_is_clipped() {
        let mut fb = Framebuffer::new(4, 4);
        let (a, b, c) = (vertex(-10.0, -10.0, 0.0), vertex(-5.0, -10.0, 0.0), vertex(-10.0, -5.0, 0.0));
        fb.draw_triangle(&a, &b, &c, [9, 9, 9]);
        fb.draw_line(Vec2::new(-3.0, 1.0), Vec2::new(6.0, 1.0), [7, 7, 7]);
        assert_eq!(fb.pixel(0, 0), None);
        assert_eq!(fb.pixel(3, 1), Some([7, 7, 7]));
    }
}
