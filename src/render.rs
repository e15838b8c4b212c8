//! Half-block terminal renderer.
//!
//! Each terminal cell shows two vertical pixels: the upper one as the
//! foreground of `▀`, the lower one as the background. The 360×640 world is
//! scaled uniformly into that pixel grid and centered.

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use crate::config::Config;
use crate::sim::{Rect, Role, Snapshot};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    fn to_crossterm(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const LETTERBOX: Rgb = Rgb(16, 16, 24);
const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const PANEL: Rgb = Rgb(210, 185, 110);
const PANEL_IN: Rgb = Rgb(220, 195, 120);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

/// Pipe cap height in world pixels, at the end facing the gap.
const CAP_HEIGHT: i32 = 24;
/// How far the cap sticks out on each side, world pixels.
const CAP_OVERHANG: i32 = 4;

// ── Pixel buffer ────────────────────────────────────────────────────────────

pub struct PixelBuf {
    w: usize,
    /// Terminal rows * 2
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
        }
    }

    /// Buffer covering a terminal of `cols` × `rows` cells.
    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        Self::new(cols as usize, rows as usize * 2)
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, LETTERBOX);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Out-of-range writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    /// Fills the half-open screen box `[x0, x1) × [y0, y1)`.
    fn fill_box(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, c: Rgb) {
        for y in y0.max(0)..y1.min(self.h as i32) {
            for x in x0.max(0)..x1.min(self.w as i32) {
                self.set(x, y, c);
            }
        }
    }

    /// Writes the whole buffer to `out`, emitting color changes only when the
    /// color actually differs from the previous cell.
    pub fn flush(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;

        for row in 0..rows {
            let mut fg: Option<Rgb> = None;
            let mut bg: Option<Rgb> = None;
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.to_crossterm()))?;
                    bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                    continue;
                }
                if fg != Some(top) {
                    queue!(out, style::SetForegroundColor(top.to_crossterm()))?;
                    fg = Some(top);
                }
                queue!(out, style::Print('\u{2580}'))?; // ▀
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── World → screen mapping ──────────────────────────────────────────────────

/// Uniform scale plus centering offset from world pixels to buffer pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    ox: i32,
    oy: i32,
    w: i32,
    h: i32,
}

impl Viewport {
    pub fn fit(buf_w: usize, buf_h: usize, config: &Config) -> Self {
        let scale = (buf_w as f64 / config.width as f64).min(buf_h as f64 / config.height as f64);
        let w = (config.width as f64 * scale) as i32;
        let h = (config.height as f64 * scale) as i32;
        Self {
            scale,
            ox: (buf_w as i32 - w) / 2,
            oy: (buf_h as i32 - h) / 2,
            w,
            h,
        }
    }

    pub fn x(&self, wx: i32) -> i32 {
        self.ox + (wx as f64 * self.scale).floor() as i32
    }

    pub fn y(&self, wy: i32) -> i32 {
        self.oy + (wy as f64 * self.scale).floor() as i32
    }

    /// Screen box for a world rect, at least one pixel in each direction.
    fn map(&self, r: Rect) -> (i32, i32, i32, i32) {
        let (x0, y0) = (self.x(r.x), self.y(r.y));
        let x1 = self.x(r.right()).max(x0 + 1);
        let y1 = self.y(r.bottom()).max(y0 + 1);
        (x0, y0, x1, y1)
    }

    /// Clamps a screen box to the playfield so nothing spills into the
    /// letterbox.
    fn clip(&self, (x0, y0, x1, y1): (i32, i32, i32, i32)) -> (i32, i32, i32, i32) {
        (
            x0.max(self.ox),
            y0.max(self.oy),
            x1.min(self.ox + self.w),
            y1.min(self.oy + self.h),
        )
    }
}

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

/// Draws `n` centered on `cx` with a one-pixel drop shadow.
fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    let s = n.to_string();
    let total_w = s.len() as i32 * 4 - 1;
    let start_x = cx - total_w / 2;
    for (i, d) in s.bytes().map(|b| b - b'0').enumerate() {
        let glyph = &DIGITS[d as usize];
        let x = start_x + i as i32 * 4;
        for (k, _) in glyph.iter().enumerate().filter(|(_, on)| **on == 1) {
            let px = x + (k % 3) as i32;
            let py = y + (k / 3) as i32;
            buf.set(px + 1, py + 1, SHADOW);
            buf.set(px, py, fg);
        }
    }
}

// ── Scene ───────────────────────────────────────────────────────────────────

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x.clamp(0, total_w - 1) as f64 / (total_w - 1) as f64 * 256.0) as u16;
    match t {
        0..64 => Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256)),
        64..100 => Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256)),
        100..160 => Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256)),
        _ => Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256)),
    }
}

/// Draws one frame of `snap` into `buf`.
pub fn draw(buf: &mut PixelBuf, snap: &Snapshot<'_>, config: &Config) {
    let view = Viewport::fit(buf.width(), buf.height(), config);
    buf.fill(LETTERBOX);
    draw_sky(buf, &view);
    for pipe in snap.pipes {
        draw_pipe(buf, &view, pipe.bounds(config), pipe.role);
    }
    let (bx, by) = snap.bird;
    draw_bird(buf, &view, Rect::new(bx, by, config.bird_width, config.bird_height));

    let cx = view.ox + view.w / 2;
    if snap.over {
        draw_game_over(buf, &view, snap.score);
    } else {
        draw_number(buf, cx, view.oy + 2, snap.score, WHITE);
    }
}

fn draw_sky(buf: &mut PixelBuf, view: &Viewport) {
    let h = view.h.max(1);
    for y in 0..view.h {
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, (y * 256 / h) as u16);
        buf.fill_box(view.ox, view.oy + y, view.ox + view.w, view.oy + y + 1, c);
    }
}

fn draw_pipe(buf: &mut PixelBuf, view: &Viewport, bounds: Rect, role: Role) {
    let (x0, y0, x1, y1) = view.clip(view.map(bounds));
    let body_w = view.x(bounds.right()) - view.x(bounds.x);
    let left = view.x(bounds.x);
    for x in x0..x1 {
        let c = pipe_shade(x - left, body_w);
        buf.fill_box(x, y0, x + 1, y1, c);
    }

    // The cap sits on the end that faces the gap
    let cap = match role {
        Role::Top => Rect::new(
            bounds.x - CAP_OVERHANG,
            bounds.bottom() - CAP_HEIGHT,
            bounds.w + CAP_OVERHANG * 2,
            CAP_HEIGHT,
        ),
        Role::Bottom => Rect::new(
            bounds.x - CAP_OVERHANG,
            bounds.y,
            bounds.w + CAP_OVERHANG * 2,
            CAP_HEIGHT,
        ),
    };
    let (cx0, cy0, cx1, cy1) = view.clip(view.map(cap));
    let cap_left = view.x(cap.x);
    let cap_w = view.x(cap.right()) - cap_left;
    for x in cx0..cx1 {
        let c = pipe_shade(x - cap_left, cap_w);
        buf.fill_box(x, cy0, x + 1, cy1, c);
    }
    buf.fill_box(cx0, cy0, cx1, cy0 + 1, CAP_DARK);
    buf.fill_box(cx0, cy1 - 1, cx1, cy1, CAP_DARK);
}

fn draw_bird(buf: &mut PixelBuf, view: &Viewport, bounds: Rect) {
    let (x0, y0, x1, y1) = view.clip(view.map(bounds));
    buf.fill_box(x0, y0, x1, y1, BIRD_Y);
    if x1 - x0 >= 3 && y1 - y0 >= 2 {
        buf.set(x1 - 2, y0, BIRD_EYE);
        buf.set(x1 - 1, (y0 + y1) / 2, BIRD_BEAK);
    }
}

fn draw_game_over(buf: &mut PixelBuf, view: &Viewport, score: u32) {
    for y in view.oy.max(0)..(view.oy + view.h) {
        for x in view.ox.max(0)..(view.ox + view.w) {
            if (x as usize) < buf.width() && (y as usize) < buf.height() {
                let c = buf.get(x as usize, y as usize);
                buf.set(x, y, c.dim());
            }
        }
    }

    let cx = view.ox + view.w / 2;
    let cy = view.oy + view.h / 2;
    let panel_w = (view.w * 2 / 3).max(15);
    let panel_h = 11;
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;
    buf.fill_box(px - 1, py - 1, px + panel_w + 1, py + panel_h + 1, SHADOW);
    buf.fill_box(px, py, px + panel_w, py + panel_h, PANEL);
    buf.fill_box(px + 1, py + 1, px + panel_w - 1, py + panel_h - 1, PANEL_IN);
    draw_number(buf, cx, py + 3, score, WHITE);
}
