//! Rendering collaborator: rasterizes the scene and blits it to the terminal.

use crate::camera::PerspectiveCamera;
use crate::color::Rgb;
use crate::error::Result;
use crate::graphics::{draw_line, draw_point, Framebuffer};
use crate::math::{add, euler_rotation, multiply_matrix_vector};
use crate::scene::{Node, Scene};
use crate::vertex::Vertex;
use crate::viewport::Viewport;
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{Stdout, Write};

/// Depth at which attenuated points draw at full intensity
const REFERENCE_DEPTH: f32 = 30.0;

/// Consumes a scene and a camera and draws a frame
pub trait Renderer {
    fn set_viewport(&mut self, viewport: &Viewport);
    fn render(&mut self, scene: &mut Scene, camera: &PerspectiveCamera, hud: &Hud) -> Result<()>;
}

/// Text drawn over the frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hud {
    /// Lines stacked from the top-left corner
    pub lines: Vec<String>,
    /// Centered message, e.g. the pause banner
    pub banner: Option<String>,
    /// Outline label quads
    pub outline_labels: bool,
}

/// Where a label's text lands on screen
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSprite {
    pub text: String,
    /// Pixel-space left and right edges of the text run
    pub run: [f32; 2],
    /// Pixel-space baseline
    pub baseline: f32,
    pub depth: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    fn blank() -> Self {
        Cell {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Black,
        }
    }
}

fn to_screen(ndc: [f32; 2], framebuffer: &Framebuffer) -> [f32; 2] {
    [
        (ndc[0] + 1.0) / 2.0 * framebuffer.width as f32,
        (1.0 - ndc[1]) / 2.0 * framebuffer.height as f32,
    ]
}

/// Draws every node into `framebuffer`
///
/// Point clouds are blended per their material; labels are only projected and
/// returned, since text is laid over the cells after tone mapping. Geometry
/// and label textures are marked as consumed.
pub fn rasterize(
    scene: &mut Scene,
    camera: &PerspectiveCamera,
    framebuffer: &mut Framebuffer,
    exposure: f32,
    outline_labels: bool,
) -> Vec<LabelSprite> {
    framebuffer.clear();
    let mut sprites = Vec::new();

    for node in scene.nodes_mut() {
        match node {
            Node::Points(points) => {
                let rotation = euler_rotation(&points.transform.rotation);
                let material = &points.material;
                let cloud = &points.geometry.cloud;
                for i in 0..cloud.len() {
                    let local = cloud.position(i);
                    let world = add(
                        &multiply_matrix_vector(&rotation, &local),
                        &points.transform.position,
                    );
                    let Some(projected) = camera.project(&world) else {
                        continue;
                    };
                    let (radius, intensity) = if material.size_attenuation {
                        (
                            material.size * camera.pixel_scale(projected.depth, framebuffer.height as f32),
                            exposure * (REFERENCE_DEPTH / projected.depth).min(4.0),
                        )
                    } else {
                        (material.size, exposure)
                    };
                    let vertex = Vertex {
                        screen_position: to_screen(projected.ndc, framebuffer),
                        color: if material.vertex_colors {
                            cloud.color(i)
                        } else {
                            Rgb::WHITE
                        },
                    };
                    draw_point(&vertex, radius, intensity, material.blending, framebuffer);
                }
                points.geometry.needs_update = false;
            }
            Node::Label(label) => {
                let Some(projected) = camera.project(&label.position) else {
                    continue;
                };
                let center = to_screen(projected.ndc, framebuffer);
                let scale = camera.pixel_scale(projected.depth, framebuffer.height as f32);
                // Pixels are not square when a cell holds fewer than two of them
                let squash = framebuffer.width as f32 / framebuffer.height as f32 / camera.aspect;
                let quad_w = label.plane[0] * scale * squash;
                let quad_h = label.plane[1] * scale;
                let left = center[0] - quad_w / 2.0;
                let top = center[1] - quad_h / 2.0;
                if outline_labels {
                    let corners = [
                        [left, top],
                        [left + quad_w, top],
                        [left + quad_w, top + quad_h],
                        [left, top + quad_h],
                    ];
                    for k in 0..4 {
                        let a = corners[k];
                        let b = corners[(k + 1) % 4];
                        draw_line(a[0], a[1], b[0], b[1], framebuffer, Rgb::new(0.3, 0.3, 0.3));
                    }
                }
                let texture = &label.texture;
                if texture.width > 0 && texture.height > 0 {
                    // Map the baked text run from canvas pixels onto the quad
                    let to_quad_x = |x: f32| left + x / texture.width as f32 * quad_w;
                    sprites.push(LabelSprite {
                        text: texture.text.clone(),
                        run: [
                            to_quad_x(texture.text_x),
                            to_quad_x(texture.width as f32 - texture.text_x),
                        ],
                        baseline: top + texture.baseline_y / texture.height as f32 * quad_h,
                        depth: projected.depth,
                    });
                }
                label.texture.needs_update = false;
            }
        }
    }

    sprites
}

fn to_color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.as_rgb8();
    Color::Rgb { r, g, b }
}

/// Packs `pixel_ratio` vertical pixels into each cell
pub fn compose_cells(framebuffer: &Framebuffer, columns: usize, rows: usize, pixel_ratio: usize) -> Vec<Cell> {
    let mut cells = vec![Cell::blank(); columns * rows];
    for row in 0..rows {
        for column in 0..columns {
            let y = row * pixel_ratio;
            if column >= framebuffer.width || y >= framebuffer.height {
                continue;
            }
            let top = to_color(framebuffer.resolved(column, y));
            cells[row * columns + column] = if pixel_ratio >= 2 && y + 1 < framebuffer.height {
                Cell {
                    ch: '▀',
                    fg: top,
                    bg: to_color(framebuffer.resolved(column, y + 1)),
                }
            } else {
                Cell {
                    ch: ' ',
                    fg: Color::Reset,
                    bg: top,
                }
            };
        }
    }
    cells
}

/// Writes `text` into the cell grid starting at (`x`, `y`), clipping at the edges
pub fn write_text(cells: &mut [Cell], columns: usize, rows: usize, x: isize, y: isize, text: &str) {
    if y < 0 || y as usize >= rows {
        return;
    }
    for (offset, ch) in text.chars().enumerate() {
        let column = x + offset as isize;
        if column < 0 {
            continue;
        }
        if column as usize >= columns {
            break;
        }
        let cell = &mut cells[y as usize * columns + column as usize];
        *cell = Cell {
            ch,
            fg: Color::White,
            bg: if cell.ch == '▀' { cell.fg } else { cell.bg },
        };
    }
}

/// Lays label text and the HUD over the composed cells
pub fn overlay(cells: &mut [Cell], columns: usize, rows: usize, pixel_ratio: usize, sprites: &[LabelSprite], hud: &Hud) {
    for sprite in sprites {
        let width = sprite.text.chars().count() as isize;
        let middle = (sprite.run[0] + sprite.run[1]) / 2.0;
        let x = middle.floor() as isize - width / 2;
        let y = (sprite.baseline / pixel_ratio as f32).floor() as isize;
        write_text(cells, columns, rows, x, y, &sprite.text);
    }

    for (row, line) in hud.lines.iter().enumerate() {
        write_text(cells, columns, rows, 1, row as isize, line);
    }

    if let Some(banner) = &hud.banner {
        // Dim the frame so the banner reads
        for cell in cells.iter_mut() {
            cell.fg = dim(cell.fg);
            cell.bg = dim(cell.bg);
        }
        let width = banner.chars().count() as isize;
        write_text(
            cells,
            columns,
            rows,
            (columns as isize - width) / 2,
            rows as isize / 2,
            banner,
        );
    }
}

fn dim(color: Color) -> Color {
    match color {
        Color::Rgb { r, g, b } => Color::Rgb {
            r: r / 3,
            g: g / 3,
            b: b / 3,
        },
        other => other,
    }
}

/// Renders to the terminal through crossterm
pub struct TerminalRenderer {
    out: Stdout,
    viewport: Viewport,
    framebuffer: Framebuffer,
    exposure: f32,
    prev: Vec<Cell>,
    force_redraw: bool,
}

impl TerminalRenderer {
    pub fn new(out: Stdout, viewport: Viewport, exposure: f32) -> Self {
        let (width, height) = viewport.framebuffer_size();
        TerminalRenderer {
            out,
            viewport,
            framebuffer: Framebuffer::new(width, height),
            exposure,
            prev: Vec::new(),
            force_redraw: true,
        }
    }

    /// Writes only the cells that changed since the last frame
    fn render_diff(&mut self, cur: &[Cell]) -> Result<()> {
        let columns = self.viewport.columns as usize;
        let mut cur_fg = Color::Reset;
        let mut cur_bg = Color::Reset;

        if self.force_redraw || self.prev.len() != cur.len() {
            queue!(self.out, terminal::Clear(terminal::ClearType::All))?;
            self.prev = vec![
                Cell {
                    ch: '\0',
                    ..Cell::blank()
                };
                cur.len()
            ];
            self.force_redraw = false;
        }

        for (i, cell) in cur.iter().enumerate() {
            if self.prev[i] == *cell {
                continue;
            }
            self.prev[i] = *cell;

            queue!(self.out, cursor::MoveTo((i % columns) as u16, (i / columns) as u16))?;
            if cell.bg != cur_bg {
                cur_bg = cell.bg;
                queue!(self.out, SetBackgroundColor(cur_bg))?;
            }
            if cell.fg != cur_fg {
                cur_fg = cell.fg;
                queue!(self.out, SetForegroundColor(cur_fg))?;
            }
            queue!(self.out, Print(cell.ch))?;
        }
        Ok(())
    }
}

impl Renderer for TerminalRenderer {
    fn set_viewport(&mut self, viewport: &Viewport) {
        self.viewport = *viewport;
        let (width, height) = viewport.framebuffer_size();
        self.framebuffer.resize(width, height);
        self.force_redraw = true;
        tracing::debug!(target: "render", width, height, "framebuffer resized");
    }

    fn render(&mut self, scene: &mut Scene, camera: &PerspectiveCamera, hud: &Hud) -> Result<()> {
        let sprites = rasterize(scene, camera, &mut self.framebuffer, self.exposure, hud.outline_labels);

        let columns = self.viewport.columns as usize;
        let rows = self.viewport.rows as usize;
        let ratio = self.viewport.pixel_ratio as usize;
        let mut cells = compose_cells(&self.framebuffer, columns, rows, ratio);
        overlay(&mut cells, columns, rows, ratio, &sprites, hud);

        queue!(self.out, BeginSynchronizedUpdate)?;
        self.render_diff(&cells)?;
        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Alternate screen and raw mode held for the life of the program
///
/// Dropping the session restores the terminal, including on early returns
/// and panics.
pub struct TerminalSession<W: Write> {
    out: W,
    raw_mode: bool,
}

impl<W: Write> TerminalSession<W> {
    pub fn enter(out: W) -> Result<Self> {
        let mut session = TerminalSession {
            out,
            raw_mode: false,
        };
        execute!(
            session.out,
            EnterAlternateScreen,
            DisableLineWrap,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )?;
        Ok(session)
    }

    pub fn enable_raw_mode(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.raw_mode = true;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        if self.raw_mode {
            let _ = terminal::disable_raw_mode();
        }
        let _ = execute!(
            self.out,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
    }
}
