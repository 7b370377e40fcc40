use crate::braille::BrailleCanvas;
use crate::map::RegionStyle;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, (x0, y0): (i32, i32), (x1, y1): (i32, i32), style: RegionStyle) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let (mut x, mut y) = (x0, y0);

    loop {
        canvas.set_pixel_signed(x, y, style);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Outline a projected ring. Segments entirely off-canvas are skipped, as are
/// segments longer than the canvas is wide (antimeridian wrap artefacts).
pub fn draw_ring(canvas: &mut BrailleCanvas, ring: &[(i32, i32)], style: RegionStyle) {
    let width = canvas.width() as i32 * 2;
    let height = canvas.height() as i32 * 4;

    for pair in ring.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let on_canvas = a.0.max(b.0) >= 0
            && a.0.min(b.0) < width
            && a.1.max(b.1) >= 0
            && a.1.min(b.1) < height;
        if on_canvas && (a.0 - b.0).abs() + (a.1 - b.1).abs() < width {
            draw_line(canvas, a, b, style);
        }
    }
}
