use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::{barcode, RenderError};
use crate::config::LabelConfig;
use crate::database::Protocolo;

// 9cm x 5cm, the same label stock the original system printed on.
const PAGE_WIDTH: Mm = Mm(90.0);
const PAGE_HEIGHT: Mm = Mm(50.0);

const MARGIN_LEFT: Mm = Mm(3.5);

pub(super) fn write_label(config: &LabelConfig, protocolo: &Protocolo, path: &Path) -> Result<(), RenderError> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Protocolo {}", protocolo.id),
        PAGE_WIDTH,
        PAGE_HEIGHT,
        "etiqueta",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| RenderError::Pdf(err.to_string()))?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| RenderError::Pdf(err.to_string()))?;

    layer.use_text(&config.title, 10.0, MARGIN_LEFT, Mm(44.0), &bold);
    layer.use_text(format!("Protocolo Nº {}", protocolo.id), 8.0, MARGIN_LEFT, Mm(38.0), &regular);
    layer.use_text(
        format!("Data e Hora: {}", protocolo.formatted_timestamp()),
        8.0,
        MARGIN_LEFT,
        Mm(33.0),
        &regular,
    );
    layer.use_text(format!("Nome: {}", protocolo.nome), 8.0, MARGIN_LEFT, Mm(28.0), &regular);
    layer.use_text(format!("Assunto: {}", protocolo.assunto), 8.0, MARGIN_LEFT, Mm(23.0), &regular);
    layer.use_text(&config.contact, 8.0, MARGIN_LEFT, Mm(18.0), &regular);

    barcode::draw(&layer, &protocolo.id.to_string(), MARGIN_LEFT, Mm(6.0), Mm(8.0))?;

    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|err| RenderError::Pdf(err.to_string()))?;

    Ok(())
}
