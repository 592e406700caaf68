use barcoders::sym::code39::Code39;
use printpdf::{Line, Mm, PdfLayerReference, Point};

use super::RenderError;

/// Width of a single barcode module. Code39 at this density fits a record id
/// of up to 10 digits on the 90mm label.
const MODULE_WIDTH_MM: f32 = 0.33;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Draws a Code39 symbol of `payload` with its lower-left corner at (x, y).
/// Each set module becomes one stroked vertical bar.
pub(super) fn draw(layer: &PdfLayerReference, payload: &str, x: Mm, y: Mm, height: Mm) -> Result<(), RenderError> {
    let code = Code39::new(payload).map_err(|err| RenderError::Barcode(err.to_string()))?;
    let modules = code.encode();

    layer.set_outline_thickness(MODULE_WIDTH_MM / MM_PER_PT);

    for (i, module) in modules.iter().enumerate() {
        if *module == 0 {
            continue;
        }

        let bar_x = Mm(x.0 + i as f32 * MODULE_WIDTH_MM);
        layer.add_line(Line {
            points: vec![
                (Point::new(bar_x, y), false),
                (Point::new(bar_x, Mm(y.0 + height.0)), false),
            ],
            is_closed: false,
        });
    }

    Ok(())
}
