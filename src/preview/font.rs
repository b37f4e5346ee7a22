//! Spleen bitmap text.

use image::GrayImage;
use spleen_font::{FONT_6X12, FONT_12X24, PSF2Font};

use super::{BLACK, PixelBox, PreviewError};

/// Bitmap font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    /// Spleen 6×12
    Small,
    /// Spleen 12×24
    Large,
}

impl FontSize {
    fn data(self) -> &'static [u8] {
        match self {
            FontSize::Small => FONT_6X12,
            FontSize::Large => FONT_12X24,
        }
    }

    /// Glyph cell as `(width, height)` in pixels.
    pub fn cell(self) -> (u32, u32) {
        match self {
            FontSize::Small => (6, 12),
            FontSize::Large => (12, 24),
        }
    }

    /// Largest size that fits `lines` rows into `height` pixels, or `Small`
    /// when none does.
    pub fn fitting(lines: usize, height: u32) -> Self {
        let lines = lines.max(1) as u32;
        if lines * FontSize::Large.cell().1 <= height {
            FontSize::Large
        } else {
            FontSize::Small
        }
    }
}

/// Draw one line of text from the top-left of `area`, clipped to it.
/// Characters the font lacks are skipped.
pub(super) fn draw_line(
    img: &mut GrayImage,
    text: &str,
    area: PixelBox,
    size: FontSize,
) -> Result<(), PreviewError> {
    let mut font = PSF2Font::new(size.data())
        .map_err(|_| PreviewError::Font(format!("cannot load {:?} font", size)))?;
    let (char_w, _) = size.cell();
    let right = area.right().min(img.width());
    let bottom = area.bottom().min(img.height());
    let mut utf8 = [0u8; 4];

    for (i, ch) in text.chars().enumerate() {
        let gx = area.x + i as u32 * char_w;
        if gx + char_w > right {
            break;
        }
        let Some(glyph) = font.glyph_for_utf8(ch.encode_utf8(&mut utf8).as_bytes()) else {
            continue;
        };
        for (row_y, row) in glyph.enumerate() {
            for (col_x, on) in row.enumerate() {
                let px = gx + col_x as u32;
                let py = area.y + row_y as u32;
                if on && px < right && py < bottom {
                    img.put_pixel(px, py, BLACK);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::WHITE;

    #[test]
    fn test_fitting() {
        assert_eq!(FontSize::fitting(1, 30), FontSize::Large);
        assert_eq!(FontSize::fitting(2, 30), FontSize::Small);
        assert_eq!(FontSize::fitting(0, 24), FontSize::Large);
        assert_eq!(FontSize::fitting(1, 5), FontSize::Small);
    }

    #[test]
    fn test_draw_line_is_clipped() {
        let mut img = GrayImage::from_pixel(40, 20, WHITE);
        let area = PixelBox { x: 0, y: 0, w: 13, h: 12 };
        draw_line(&mut img, "HHHH", area, FontSize::Small).unwrap();
        let dark: Vec<_> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == BLACK)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!dark.is_empty());
        // Two whole glyphs fit
        assert!(dark.iter().all(|&(x, y)| x < 12 && y < 12));
    }
}
