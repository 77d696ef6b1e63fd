use crate::color::Rgb;

/// Immediate-mode 2D drawing target the render loop paints into.
///
/// Coordinates are surface units; anything outside the surface is clipped.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn resize(&mut self, width: f32, height: f32);
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb);
    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb);

    fn clear(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.clear_rect(0.0, 0.0, w, h);
    }
}

/// Source of display-frame callbacks. The loop asks for its next frame
/// at the end of every frame; the host decides when that happens.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// Dots per terminal cell horizontally / vertically
pub const DOTS_PER_CELL_X: u16 = 2;
pub const DOTS_PER_CELL_Y: u16 = 4;

/// Half-width of a stroked outline, in dots
const STROKE_HALF_WIDTH: f32 = 0.5;

/// A single rendered Braille cell with position and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Rgb,
}

/// A lit dot: its color and when it was drawn
#[derive(Debug, Clone, Copy, PartialEq)]
struct Dot {
    color: Rgb,
    order: u32,
}

/// Raster of Braille dots. One surface unit is one dot.
#[derive(Debug, Clone)]
pub struct DotSurface {
    width: usize,
    height: usize,
    dots: Vec<Option<Dot>>,
    /// Incremented per primitive so later draws win inside a shared cell
    draw_order: u32,
}

impl DotSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![None; width * height],
            draw_order: 0,
        }
    }

    /// Surface size in dots for a terminal area of `cols` x `rows` cells
    pub fn size_for_cells(cols: u16, rows: u16) -> (usize, usize) {
        (
            cols as usize * DOTS_PER_CELL_X as usize,
            rows as usize * DOTS_PER_CELL_Y as usize,
        )
    }

    /// Whether the dot at (x, y) is lit
    #[cfg(test)]
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.dot(x, y).is_some()
    }

    /// Color of the dot at (x, y), if lit
    #[cfg(test)]
    pub fn color_at(&self, x: usize, y: usize) -> Option<Rgb> {
        self.dot(x, y).map(|d| d.color)
    }

    fn dot(&self, x: usize, y: usize) -> Option<Dot> {
        if x < self.width && y < self.height {
            self.dots[y * self.width + x]
        } else {
            None
        }
    }

    fn next_order(&mut self) -> u32 {
        self.draw_order = self.draw_order.wrapping_add(1);
        self.draw_order
    }

    /// Light every dot whose center satisfies `inside(distance from (cx, cy))`
    /// within the bounding box of radius `reach`.
    fn plot_where(&mut self, cx: f32, cy: f32, reach: f32, color: Rgb, inside: impl Fn(f32) -> bool) {
        if self.width == 0 || self.height == 0 || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        let order = self.next_order();

        let x_min = (cx - reach).floor().max(0.0);
        let y_min = (cy - reach).floor().max(0.0);
        let x_max = (cx + reach).ceil().min(self.width as f32 - 1.0);
        let y_max = (cy + reach).ceil().min(self.height as f32 - 1.0);
        if x_min > x_max || y_min > y_max {
            return;
        }

        for y in y_min as usize..=y_max as usize {
            for x in x_min as usize..=x_max as usize {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if inside((dx * dx + dy * dy).sqrt()) {
                    self.dots[y * self.width + x] = Some(Dot { color, order });
                }
            }
        }
    }

    /// Render the dot raster to Braille cells, skipping empty cells.
    /// A cell takes the color of its most recently drawn dot.
    pub fn to_braille(&self) -> Vec<BrailleCell> {
        let cols = self.width.div_ceil(DOTS_PER_CELL_X as usize);
        let rows = self.height.div_ceil(DOTS_PER_CELL_Y as usize);
        let mut cells = Vec::new();

        for cy in 0..rows {
            for cx in 0..cols {
                let mut pattern: u8 = 0;
                let mut latest: Option<Dot> = None;

                let base_x = cx * DOTS_PER_CELL_X as usize;
                let base_y = cy * DOTS_PER_CELL_Y as usize;

                for dx in 0..DOTS_PER_CELL_X as usize {
                    for dy in 0..DOTS_PER_CELL_Y as usize {
                        if let Some(dot) = self.dot(base_x + dx, base_y + dy) {
                            pattern |= BRAILLE_DOTS[dx][dy];
                            if latest.map_or(true, |l| dot.order >= l.order) {
                                latest = Some(dot);
                            }
                        }
                    }
                }

                if let Some(dot) = latest {
                    let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                    cells.push(BrailleCell {
                        x: cx as u16,
                        y: cy as u16,
                        char: braille_char,
                        color: dot.color,
                    });
                }
            }
        }

        cells
    }
}

impl Surface for DotSurface {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0) as usize;
        self.height = height.max(0.0) as usize;
        self.dots = vec![None; self.width * self.height];
        self.draw_order = 0;
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let x0 = x.max(0.0) as usize;
        let y0 = y.max(0.0) as usize;
        let x1 = ((x + width).max(0.0) as usize).min(self.width);
        let y1 = ((y + height).max(0.0) as usize).min(self.height);

        for row in y0..y1 {
            for col in x0..x1 {
                self.dots[row * self.width + col] = None;
            }
        }
        if x0 == 0 && y0 == 0 && x1 == self.width && y1 == self.height {
            self.draw_order = 0;
        }
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb) {
        // Small circles still light the dot under their center
        if radius < 1.0 {
            self.plot_where(x, y, 1.0, color, |d| d <= std::f32::consts::FRAC_1_SQRT_2);
        } else {
            self.plot_where(x, y, radius, color, |d| d <= radius);
        }
    }

    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb) {
        self.plot_where(x, y, radius + 1.0, color, |d| (d - radius).abs() <= STROKE_HALF_WIDTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    #[test]
    fn test_braille_pattern() {
        // Test that single dot patterns work correctly
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        // All dots should give 0xFF
        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn test_size_for_cells() {
        assert_eq!(DotSurface::size_for_cells(10, 5), (20, 20));
    }

    #[test]
    fn test_fill_circle_lights_disc() {
        let mut surface = DotSurface::new(20, 20);
        surface.fill_circle(10.0, 10.0, 3.0, RED);
        assert_eq!(surface.color_at(10, 10), Some(RED));
        assert!(surface.is_lit(8, 10));
        assert!(!surface.is_lit(15, 10));
    }

    #[test]
    fn test_tiny_circle_lights_center_dot() {
        let mut surface = DotSurface::new(4, 4);
        surface.fill_circle(1.5, 2.5, 0.2, BLUE);
        assert!(surface.is_lit(1, 2));
        assert_eq!(surface.to_braille().len(), 1);
    }

    #[test]
    fn test_stroke_circle_is_hollow() {
        let mut surface = DotSurface::new(40, 40);
        surface.stroke_circle(20.0, 20.0, 8.0, RED);
        assert!(!surface.is_lit(20, 20));
        assert!(surface.is_lit(27, 19) || surface.is_lit(27, 20));
    }

    #[test]
    fn test_drawing_is_clipped() {
        let mut surface = DotSurface::new(10, 10);
        surface.fill_circle(-50.0, -50.0, 5.0, RED);
        surface.fill_circle(f32::NAN, 3.0, 5.0, RED);
        surface.fill_circle(0.0, 0.0, 3.0, RED);
        assert!(surface.is_lit(0, 0));
        assert!(!surface.is_lit(9, 9));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut surface = DotSurface::new(10, 8);
        surface.fill_circle(5.0, 4.0, 4.0, RED);
        surface.clear();
        assert!(surface.to_braille().is_empty());
    }

    #[test]
    fn test_clear_rect_is_partial() {
        let mut surface = DotSurface::new(10, 4);
        surface.fill_circle(1.0, 2.0, 1.0, RED);
        surface.fill_circle(8.0, 2.0, 1.0, BLUE);
        surface.clear_rect(0.0, 0.0, 5.0, 4.0);
        let cells = surface.to_braille();
        assert!(cells.iter().all(|c| c.color == BLUE));
        assert!(!cells.is_empty());
    }

    #[test]
    fn test_later_draw_wins_cell_color() {
        let mut surface = DotSurface::new(2, 4);
        surface.fill_circle(0.5, 0.5, 0.3, RED);
        surface.fill_circle(1.5, 3.5, 0.3, BLUE);
        let cells = surface.to_braille();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].color, BLUE);
        assert_eq!(cells[0].char, char::from_u32(BRAILLE_BASE + 0x01 + 0x80).unwrap());
    }

    #[test]
    fn test_resize_empties_raster() {
        let mut surface = DotSurface::new(4, 4);
        surface.fill_circle(2.0, 2.0, 2.0, RED);
        surface.resize(6.0, 8.0);
        assert_eq!((surface.width(), surface.height()), (6.0, 8.0));
        assert!(surface.to_braille().is_empty());
    }
}
