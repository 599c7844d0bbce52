//! Software-rendered visualizer using `minifb`.
//!
//! Point clouds are splatted as round, soft-edged sprites into an RGB
//! accumulation buffer (additive, no depth test), then clamped into the
//! window's `0xRRGGBB` framebuffer. Text is drawn on top afterwards so it
//! never blends with the scene.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ status                                                    │
//! │                                                           │
//! │                  · ·  ∙∙●●●∙∙  · ·                         │
//! │              ·  ·   ∙●●●●●●●●∙   ·  ·                      │
//! │                  · ·  ∙∙●●●∙∙  · ·                         │
//! │                                                           │
//! │ legend                                                    │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;

use glam::{Mat4, Vec3};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use gesture_orbit::HandPose;
use particle_field::{falloff_alpha, point_size_px, Rgb};

use crate::font::{self, ADVANCE, GLYPH_H};
use crate::scene::{PointLayer, Scene};
use crate::tracking::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Constants
// ════════════════════════════════════════════════════════════════════════════

pub const DEFAULT_W: usize = 1024;
pub const DEFAULT_H: usize = 640;

const FOV_Y_DEG:  f32 = 75.0;
const Z_NEAR:     f32 = 0.1;
const Z_FAR:      f32 = 1000.0;

/// Sprite pixels per world unit at unit depth, at `REFERENCE_H` window height.
const POINT_SCALE: f32 = 300.0;
const REFERENCE_H: f32 = 640.0;
/// Per-sprite brightness before accumulation.
const POINT_INTENSITY: f32 = 0.6;
/// Sprites are never drawn smaller than this, so distant points don't vanish.
const MIN_SPRITE_PX: f32 = 1.5;

const BACKGROUND:   Rgb = [0.01, 0.01, 0.03];
const TEXT_SCALE:   usize = 2;
const STATUS_COLOR: u32 = 0xFFEEEEEE;
const ERROR_COLOR:  u32 = 0xFFFF6B6B;
const LEGEND_COLOR: u32 = 0xFF8890A0;
const TEXT_BG:      u32 = 0xFF0B0E1A;

#[cfg(not(feature = "leap"))]
const LEGEND: &str = "MOUSE X=ROLL  MOUSE Y=NEAR/FAR  O=OPEN  F=FIST  R=RELAXED  H=HIDE HAND  Q=QUIT";
#[cfg(feature = "leap")]
const LEGEND: &str = "ROLL HAND=ORBIT  OPEN HAND OR FIST=ZOOM  HALF CURL=HOLD ZOOM  Q=QUIT";

// ════════════════════════════════════════════════════════════════════════════
// ViewProjection
// ════════════════════════════════════════════════════════════════════════════

/// Perspective camera looking at the origin with +Y up.
#[derive(Clone, Debug)]
pub struct ViewProjection {
    view: Mat4,
    proj: Mat4,
    w:    f32,
    h:    f32,
}

impl ViewProjection {
    pub fn looking_at_origin(eye: [f32; 3], w: usize, h: usize) -> Self {
        let aspect = w as f32 / h.max(1) as f32;
        ViewProjection {
            view: Mat4::look_at_rh(Vec3::from(eye), Vec3::ZERO, Vec3::Y),
            proj: Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect, Z_NEAR, Z_FAR),
            w:    w as f32,
            h:    h as f32,
        }
    }

    /// Screen position (pixels, origin top-left) and view-space depth of a
    /// world point, or `None` when it lies behind the near plane.
    pub fn project(&self, p: Vec3) -> Option<(f32, f32, f32)> {
        let v = self.view * p.extend(1.0);
        let depth = -v.z;
        if depth <= Z_NEAR {
            return None;
        }
        let clip = self.proj * v;
        let ndc  = clip.truncate() / clip.w;
        Some((
            (ndc.x * 0.5 + 0.5) * self.w,
            (0.5 - ndc.y * 0.5) * self.h,
            depth,
        ))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas — window-independent framebuffer
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    w:      usize,
    h:      usize,
    accum:  Vec<Rgb>,
    pixels: Vec<u32>,
}

impl Canvas {
    pub fn new(w: usize, h: usize) -> Self {
        Canvas {
            w,
            h,
            accum:  vec![BACKGROUND; w * h],
            pixels: vec![0; w * h],
        }
    }

    pub fn width(&self)  -> usize { self.w }
    pub fn height(&self) -> usize { self.h }
    pub fn pixels(&self) -> &[u32] { &self.pixels }

    pub fn accum_at(&self, x: usize, y: usize) -> Rgb {
        self.accum[y * self.w + x]
    }

    pub fn clear(&mut self) {
        self.accum.fill(BACKGROUND);
    }

    /// Additively blend one round sprite centred at (`cx`, `cy`).
    pub fn splat(&mut self, cx: f32, cy: f32, diameter: f32, color: Rgb, intensity: f32) {
        let d = diameter.max(MIN_SPRITE_PX);
        let r = d * 0.5;

        let x0 = (cx - r).floor().max(0.0) as isize;
        let y0 = (cy - r).floor().max(0.0) as isize;
        let x1 = ((cx + r).ceil() as isize).min(self.w as isize - 1);
        let y1 = ((cy + r).ceil() as isize).min(self.h as isize - 1);

        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let Some(a) = falloff_alpha((dx * dx + dy * dy).sqrt() / d) else { continue };
                let a = a * intensity;
                let acc = &mut self.accum[py as usize * self.w + px as usize];
                acc[0] += color[0] * a;
                acc[1] += color[1] * a;
                acc[2] += color[2] * a;
            }
        }
    }

    /// Splat every particle of `layer` as seen through `vp`.
    pub fn draw_layer(&mut self, layer: &PointLayer, vp: &ViewProjection) {
        let scale = POINT_SCALE * self.h as f32 / REFERENCE_H;
        let particles = &layer.particles;

        for (i, p) in layer.world_positions().enumerate() {
            let Some((sx, sy, depth)) = vp.project(p) else { continue };
            let size = point_size_px(particles.sizes[i], depth, scale);
            let c = &particles.colors[i * 3..i * 3 + 3];
            self.splat(sx, sy, size, [c[0], c[1], c[2]], POINT_INTENSITY);
        }
    }

    /// Clamp the accumulation buffer into displayable pixels.
    pub fn resolve(&mut self) {
        for (out, c) in self.pixels.iter_mut().zip(&self.accum) {
            let to8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
            *out = 0xFF000000 | (to8(c[0]) << 16) | (to8(c[1]) << 8) | to8(c[2]);
        }
    }

    // ── Overlay primitives (operate on resolved pixels) ───────────────────

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.h) {
            for col in x..(x + w).min(self.w) {
                self.pixels[row * self.w + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.w && y < self.h {
            self.pixels[y * self.w + x] = color;
        }
    }

    pub fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            if cx + ADVANCE * scale > self.w { break; }
            for (row, &bits) in font::glyph(ch).iter().enumerate() {
                for col in 0..font::GLYPH_W {
                    if bits & (1 << (font::GLYPH_W - 1 - col)) == 0 { continue; }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            self.set_pixel(cx + col * scale + sx, y + row * scale + sy, color);
                        }
                    }
                }
            }
            cx += ADVANCE * scale;
        }
    }

    /// Text on a dark backing strip, padded by `scale` pixels.
    pub fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let pad = scale * 2;
        self.fill_rect(
            x.saturating_sub(pad),
            y.saturating_sub(pad),
            font::text_width(text, scale) + pad * 2,
            GLYPH_H * scale + pad * 2,
            TEXT_BG,
        );
        self.draw_text(text, x, y, scale, color);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:       Window,
    canvas:       Canvas,
    sim_tx:       Sender<SimInput>,
    last_pointer: Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(w: usize, h: usize, sim_tx: Sender<SimInput>) -> Result<Self, String> {
        let mut window = Window::new(
            "Planet Hands — gesture-orbited particle planet",
            w, h,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            canvas: Canvas::new(w, h),
            sim_tx,
            last_pointer: None,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse, forwarding hand-simulation input.
    /// Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if pressed(Key::Escape) || pressed(Key::Q) {
            return false;
        }

        let mut inputs = Vec::new();
        if pressed(Key::O) { inputs.push(SimInput::Pose(HandPose::Open)); }
        if pressed(Key::F) { inputs.push(SimInput::Pose(HandPose::Fist)); }
        if pressed(Key::R) { inputs.push(SimInput::Pose(HandPose::Relaxed)); }
        if pressed(Key::H) { inputs.push(SimInput::ToggleHand); }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let p = (mx / self.canvas.width() as f32, my / self.canvas.height() as f32);
            if self.last_pointer != Some(p) {
                self.last_pointer = Some(p);
                inputs.push(SimInput::Pointer { x: p.0, y: p.1 });
            }
        }

        // In hardware mode nobody listens; that's fine.
        for input in inputs {
            let _ = self.sim_tx.send(input);
        }
        true
    }

    /// Render one frame from `eye` and present it.
    pub fn render(&mut self, scene: &Scene, eye: [f32; 3], status: &str, is_error: bool) {
        let vp = ViewProjection::looking_at_origin(eye, self.canvas.width(), self.canvas.height());

        self.canvas.clear();
        for layer in scene.layers() {
            self.canvas.draw_layer(layer, &vp);
        }
        self.canvas.resolve();

        let status_color = if is_error { ERROR_COLOR } else { STATUS_COLOR };
        self.canvas.draw_label(status, 12, 12, TEXT_SCALE, status_color);

        let legend_y = self.canvas.height().saturating_sub(GLYPH_H * TEXT_SCALE + 12);
        self.canvas.draw_label(LEGEND, 12, legend_y, TEXT_SCALE, LEGEND_COLOR);

        let (w, h) = (self.canvas.width(), self.canvas.height());
        self.window.update_with_buffer(self.canvas.pixels(), w, h).ok();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use particle_field::WHITE;

    #[test]
    fn origin_projects_to_screen_centre() {
        let vp = ViewProjection::looking_at_origin([0.0, 0.0, 30.0], 800, 600);
        let (x, y, depth) = vp.project(Vec3::ZERO).unwrap();
        assert_relative_eq!(x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(y, 300.0, epsilon = 1e-3);
        assert_relative_eq!(depth, 30.0, epsilon = 1e-4);
    }

    #[test]
    fn up_is_up_on_screen() {
        let vp = ViewProjection::looking_at_origin([0.0, 0.0, 30.0], 800, 600);
        let (_, y, _) = vp.project(Vec3::new(0.0, 5.0, 0.0)).unwrap();
        assert!(y < 300.0);
    }

    #[test]
    fn behind_camera_is_culled() {
        let vp = ViewProjection::looking_at_origin([0.0, 0.0, 10.0], 800, 600);
        assert!(vp.project(Vec3::new(0.0, 0.0, 20.0)).is_none());
    }

    #[test]
    fn splat_is_brightest_at_centre_and_additive() {
        let mut c = Canvas::new(32, 32);
        c.splat(16.0, 16.0, 10.0, WHITE, 1.0);
        let centre = c.accum_at(16, 16)[0];
        let edge   = c.accum_at(20, 16)[0];
        assert!(centre > edge);
        assert!(edge >= BACKGROUND[0]);

        c.splat(16.0, 16.0, 10.0, WHITE, 1.0);
        assert!(c.accum_at(16, 16)[0] > centre);
    }

    #[test]
    fn splat_leaves_corners_alone() {
        let mut c = Canvas::new(32, 32);
        c.splat(16.0, 16.0, 10.0, WHITE, 1.0);
        // (11, 11) is within the bounding box but outside the circle.
        assert_eq!(c.accum_at(11, 11), BACKGROUND);
    }

    #[test]
    fn splat_off_canvas_does_not_panic() {
        let mut c = Canvas::new(16, 16);
        c.splat(-40.0, -40.0, 8.0, WHITE, 1.0);
        c.splat(100.0, 3.0, 8.0, WHITE, 1.0);
        c.splat(0.0, 0.0, 8.0, WHITE, 1.0);
        c.splat(15.9, 15.9, 8.0, WHITE, 1.0);
    }

    #[test]
    fn resolve_clamps_to_white() {
        let mut c = Canvas::new(4, 4);
        for _ in 0..20 { c.splat(2.0, 2.0, 4.0, WHITE, 1.0); }
        c.resolve();
        assert_eq!(c.pixels()[2 * 4 + 2], 0xFFFFFFFF);
    }

    #[test]
    fn text_draws_pixels_and_clips() {
        let mut c = Canvas::new(40, 12);
        c.resolve();
        let blank = c.pixels().to_vec();
        c.draw_text("TRACKING ACTIVE", 0, 0, 1, 0xFF00FF00);
        assert_ne!(c.pixels(), &blank[..]);
        assert!(c.pixels().iter().any(|&p| p == 0xFF00FF00));
    }
}
