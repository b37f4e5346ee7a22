//! Symbol encoding for preview rendering.
//!
//! QR codes come from the qrcode crate, Code 128 from barcoders.

use barcoders::sym::code128::Code128;
use qrcode::QrCode;

use super::PreviewError;

/// Square grid of QR modules.
pub struct QrModules {
    pub width: usize,
    dark: Vec<bool>,
}

impl QrModules {
    /// Whether the module at (x, y) is dark; outside the symbol is light.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.width {
            return false;
        }
        self.dark[y * self.width + x]
    }
}

/// Encode `data` as a QR code.
pub fn qr_modules(data: &str) -> Result<QrModules, PreviewError> {
    let code = QrCode::new(data.as_bytes())
        .map_err(|e| PreviewError::Symbol(format!("QR code generation failed: {}", e)))?;
    let width = code.width();
    let mut dark = Vec::with_capacity(width * width);
    for y in 0..width {
        for x in 0..width {
            dark.push(code[(x, y)] == qrcode::Color::Dark);
        }
    }
    Ok(QrModules { width, dark })
}

/// Encode `data` as Code 128 modules; `true` is a bar.
pub fn code128_modules(data: &str) -> Result<Vec<bool>, PreviewError> {
    // Character set B covers printable ASCII
    let prefixed = format!("\u{0181}{}", data);
    let barcode = Code128::new(&prefixed)
        .map_err(|e| PreviewError::Symbol(format!("Code 128 encoding failed for {:?}: {}", data, e)))?;
    Ok(barcode.encode().into_iter().map(|m| m == 1).collect())
}
