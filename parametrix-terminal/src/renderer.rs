/// ASCII rasterizer for terminal rendering of both views
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use parametrix_core::{Camera, DrawCommand, Frame, Mesh, StrokeColor, Triangle};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Stroke character for the flat view
const STROKE_CHAR: char = '*';
const AXIS_CHAR: char = '.';

/// Terminal color for a stroke color
pub fn terminal_color(color: StrokeColor) -> Color {
    match color {
        StrokeColor::Blue => Color::Blue,
        StrokeColor::Green => Color::Green,
        StrokeColor::Red => Color::Red,
        StrokeColor::Purple => Color::Magenta,
        StrokeColor::Orange => Color::DarkYellow,
        StrokeColor::Gray => Color::DarkGrey,
    }
}

/// ASCII renderer that turns draw commands and meshes into terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    /// Character at a cell, for inspection.
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Replay a flat-view frame. Canvas pixels map one to one onto columns
    /// and two to one onto rows, since terminal cells are about twice as
    /// tall as they are wide.
    pub fn draw_frame(&mut self, frame: &Frame) {
        for command in &frame.commands {
            match command {
                DrawCommand::Clear { .. } => self.clear(),
                DrawCommand::Polyline { points, color, .. } => {
                    let ch = if *color == StrokeColor::Gray {
                        AXIS_CHAR
                    } else {
                        STROKE_CHAR
                    };
                    let color = terminal_color(*color);
                    for pair in points.windows(2) {
                        self.draw_line(
                            (pair[0].x as f32, pair[0].y as f32 / 2.0),
                            (pair[1].x as f32, pair[1].y as f32 / 2.0),
                            ch,
                            color,
                        );
                    }
                }
            }
        }
    }

    /// Rasterize a line between two screen positions, clipped to the buffer.
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), ch: char, color: Color) {
        let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil().max(1.0);
        // Lines far outside the view are not worth walking.
        if !steps.is_finite() || steps > 100_000.0 {
            return;
        }
        let steps = steps as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            self.plot(x, y, ch, color);
        }
    }

    fn plot(&mut self, x: f32, y: f32, ch: char, color: Color) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        self.char_buffer[idx] = ch;
        self.color_buffer[idx] = color;
    }

    /// Draw a world-space line through the camera, used for the axes.
    pub fn draw_line_3d(
        &mut self,
        from: &Point3<f32>,
        to: &Point3<f32>,
        camera: &Camera,
        model_matrix: &Matrix4<f32>,
        color: Color,
    ) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (w, h) = (self.width as u32, self.height as u32);
        // Endpoints may lie outside the view volume, so sample the segment.
        const SAMPLES: usize = 200;
        for i in 0..=SAMPLES {
            let t = i as f32 / SAMPLES as f32;
            let p = from + (to - from) * t;
            if let Some((x, y, _)) = camera.project_to_screen(&p, model_matrix, w, h) {
                let idx = (y as usize).min(self.height - 1) * self.width
                    + (x as usize).min(self.width - 1);
                if self.depth_buffer[idx].is_infinite() {
                    self.char_buffer[idx] = AXIS_CHAR;
                    self.color_buffer[idx] = color;
                }
            }
        }
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        color: Color,
    ) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_matrix, camera, color);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        color: Color,
    ) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        // Project vertices to screen space
        let mut screen_coords = Vec::with_capacity(3);
        for vertex in &triangle.vertices {
            if let Some((x, y, z)) = camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                screen_coords.push((x, y, z));
            } else {
                return; // Triangle is clipped
            }
        }

        // Shade by how directly the face looks at the camera
        let normal = model_matrix.transform_vector(&triangle.calculate_normal());
        let light_dir: Vector3<f32> = (camera.position - camera.target).normalize();
        let brightness = normal.dot(&light_dir).abs();

        // Map brightness to character, never fully blank for a visible face
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        self.rasterize_triangle(&screen_coords, character, color);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32)], character: char, color: Color) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                            self.color_buffer[idx] = color;
                        }
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
