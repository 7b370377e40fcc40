use crate::map::RegionStyle;

/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell is a 2x4 dot grid; alongside the dots every cell
/// remembers the highest-priority province style drawn into it.
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    dots: Vec<u8>,
    styles: Vec<RegionStyle>,
}

impl BrailleCanvas {
    /// Effective pixel resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![0; width * height],
            styles: vec![RegionStyle::Default; width * height],
        }
    }

    /// Dot bit for a pixel inside its cell.
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    #[inline(always)]
    fn dot_bit(x: usize, y: usize) -> u8 {
        const BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];
        BITS[y % 4][x % 2]
    }

    /// Set a pixel; out-of-range pixels are dropped
    pub fn set_pixel(&mut self, x: usize, y: usize, style: RegionStyle) {
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return;
        }
        let idx = cy * self.width + cx;
        self.dots[idx] |= Self::dot_bit(x, y);
        self.styles[idx] = self.styles[idx].max(style);
    }

    /// Signed variant; negative coordinates are dropped
    #[inline(always)]
    pub fn set_pixel_signed(&mut self, x: i32, y: i32, style: RegionStyle) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, style);
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Glyph and style of a cell, `None` when no dot is set
    pub fn cell(&self, col: usize, row: usize) -> Option<(char, RegionStyle)> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let idx = row * self.width + col;
        match self.dots[idx] {
            0 => None,
            bits => char::from_u32(0x2800 + bits as u32).map(|ch| (ch, self.styles[idx])),
        }
    }

    #[cfg(test)]
    pub fn to_string(&self) -> String {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| self.cell(col, row).map_or('\u{2800}', |(ch, _)| ch))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
