//! # Label Preview
//!
//! Renders a template payload to a grayscale PNG at its canvas pixel size.
//!
//! ```text
//! TemplatePayload → LabelRenderer → PNG bytes
//!                        ↓
//!              for each component:
//!              - outline its box
//!              - QR / Code 128 symbol scaled into the box
//!              - text lines in a Spleen bitmap font
//! ```
//!
//! ## Example
//!
//! ```
//! use labelkit::preview::render_png;
//! use labelkit::template::sample::{Shipment, shipping_label};
//!
//! let payload = shipping_label(&Shipment::example(), "T-1");
//! let png = render_png(&payload).unwrap();
//! assert_eq!(&png[1..4], b"PNG");
//! ```

mod barcode;
mod font;

pub use font::FontSize;

use image::{GrayImage, Luma};
use thiserror::Error;

use crate::error::LabelError;
use crate::layout::{LayoutSettings, Rect, Viewport, Widget, geometry::CANVAS_EXTENT, geometry::clamp};
use crate::template::{ComponentData, TemplatePayload, from_payload};

/// Errors that can occur while rendering a preview.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Image encoding error: {0}")]
    ImageEncode(String),

    #[error("Cannot encode symbol: {0}")]
    Symbol(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Canvas size {width}x{height} is outside 1..={max} pixels per side")]
    Size { width: u32, height: u32, max: u32 },
}

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

/// Space between a component's outline and its content, in pixels.
const PADDING: u32 = 3;

/// Largest preview canvas side, in pixels.
pub const MAX_SIDE: u32 = 4096;

/// Integer pixel box, right and bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelBox {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl PixelBox {
    /// Pixel box of `rect` on `viewport`, cut to the canvas.
    fn from_rect(rect: &Rect, viewport: &Viewport) -> Self {
        let left = viewport.x_to_px(clamp(rect.x, 0.0, CANVAS_EXTENT)).round() as u32;
        let top = viewport.y_to_px(clamp(rect.y, 0.0, CANVAS_EXTENT)).round() as u32;
        let right = viewport.x_to_px(clamp(rect.right(), 0.0, CANVAS_EXTENT)).round() as u32;
        let bottom = viewport.y_to_px(clamp(rect.bottom(), 0.0, CANVAS_EXTENT)).round() as u32;
        Self {
            x: left,
            y: top,
            w: right.saturating_sub(left),
            h: bottom.saturating_sub(top),
        }
    }

    fn right(&self) -> u32 {
        self.x + self.w
    }

    fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// The box shrunk by `pad` on every side, if anything is left.
    fn inset(&self, pad: u32) -> Option<PixelBox> {
        if self.w <= 2 * pad || self.h <= 2 * pad {
            return None;
        }
        Some(PixelBox {
            x: self.x + pad,
            y: self.y + pad,
            w: self.w - 2 * pad,
            h: self.h - 2 * pad,
        })
    }
}

/// Draws components onto a white canvas.
struct LabelRenderer {
    viewport: Viewport,
    img: GrayImage,
}

impl LabelRenderer {
    fn new(viewport: Viewport) -> Result<Self, PreviewError> {
        let side = 1..=MAX_SIDE;
        if !side.contains(&viewport.width) || !side.contains(&viewport.height) {
            return Err(PreviewError::Size {
                width: viewport.width,
                height: viewport.height,
                max: MAX_SIDE,
            });
        }
        Ok(Self {
            viewport,
            img: GrayImage::from_pixel(viewport.width, viewport.height, WHITE),
        })
    }

    fn set(&mut self, x: u32, y: u32) {
        if x < self.img.width() && y < self.img.height() {
            self.img.put_pixel(x, y, BLACK);
        }
    }

    fn draw_component(&mut self, widget: &Widget, data: &ComponentData) -> Result<(), PreviewError> {
        let area = PixelBox::from_rect(&widget.rect, &self.viewport);
        self.outline(area);
        let Some(inner) = area.inset(PADDING) else {
            return Ok(());
        };

        match data {
            ComponentData::Qr(d) => self.qr(inner, &d.value),
            ComponentData::BarcodeSmall(d) | ComponentData::BarcodeLarge(d) => {
                self.barcode(inner, &d.value)
            }
            ComponentData::Custom(_) => self.text(inner, &[widget.name.clone()]),
            other => self.text(inner, &other.text_lines()),
        }
    }

    fn outline(&mut self, area: PixelBox) {
        if area.w == 0 || area.h == 0 {
            return;
        }
        for x in area.x..area.right() {
            self.set(x, area.y);
            self.set(x, area.bottom() - 1);
        }
        for y in area.y..area.bottom() {
            self.set(area.x, y);
            self.set(area.right() - 1, y);
        }
    }

    /// Square QR symbol centred in `area`, modules scaled nearest-neighbour.
    fn qr(&mut self, area: PixelBox, value: &str) -> Result<(), PreviewError> {
        let symbol = barcode::qr_modules(value)?;
        let side = area.w.min(area.h);
        let left = area.x + (area.w - side) / 2;
        let top = area.y + (area.h - side) / 2;
        for py in 0..side {
            for px in 0..side {
                let mx = (px as usize * symbol.width) / side as usize;
                let my = (py as usize * symbol.width) / side as usize;
                if symbol.is_dark(mx, my) {
                    self.set(left + px, top + py);
                }
            }
        }
        Ok(())
    }

    /// Code 128 bars stretched across `area`, with the value underneath when
    /// there is room for it.
    fn barcode(&mut self, area: PixelBox, value: &str) -> Result<(), PreviewError> {
        let modules = barcode::code128_modules(value)?;
        if modules.is_empty() {
            return Ok(());
        }

        let (_, caption_h) = FontSize::Small.cell();
        let with_caption = area.h >= caption_h * 3;
        let bar_h = if with_caption {
            area.h - caption_h - 1
        } else {
            area.h
        };

        for px in 0..area.w {
            let m = (px as usize * modules.len()) / area.w as usize;
            if modules[m] {
                for py in 0..bar_h {
                    self.set(area.x + px, area.y + py);
                }
            }
        }

        if with_caption {
            let caption = PixelBox {
                x: area.x,
                y: area.y + bar_h + 1,
                w: area.w,
                h: caption_h,
            };
            font::draw_line(&mut self.img, value, caption, FontSize::Small)?;
        }
        Ok(())
    }

    fn text(&mut self, area: PixelBox, lines: &[String]) -> Result<(), PreviewError> {
        let size = FontSize::fitting(lines.len(), area.h);
        let (_, line_h) = size.cell();
        for (i, line) in lines.iter().enumerate() {
            let y = area.y + i as u32 * line_h;
            if y + line_h > area.bottom() {
                break;
            }
            let row = PixelBox {
                x: area.x,
                y,
                w: area.w,
                h: line_h,
            };
            font::draw_line(&mut self.img, line, row, size)?;
        }
        Ok(())
    }

    fn to_png(&self) -> Result<Vec<u8>, PreviewError> {
        use image::ImageEncoder;

        let mut png_bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                self.img.as_raw(),
                self.img.width(),
                self.img.height(),
                image::ExtendedColorType::L8,
            )
            .map_err(|e: image::ImageError| PreviewError::ImageEncode(e.to_string()))?;
        Ok(png_bytes)
    }
}

/// Render `payload` to PNG bytes.
///
/// The image is `width × height` pixels from the payload (500×800 when
/// absent). Component data is checked the same way as on import, so a
/// payload that cannot be opened cannot be previewed either.
pub fn render_png(payload: &TemplatePayload) -> Result<Vec<u8>, LabelError> {
    let loaded = from_payload(payload, LayoutSettings::default())?;
    let mut renderer = LabelRenderer::new(loaded.viewport)?;
    for widget in loaded.canvas.widgets() {
        let data = loaded
            .data
            .get(&widget.id)
            .cloned()
            .unwrap_or_else(|| ComponentData::default_for(&widget.name));
        renderer.draw_component(widget, &data)?;
    }
    Ok(renderer.to_png()?)
}
