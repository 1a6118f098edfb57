use std::io::Cursor;

use crate::{
    compose::raster::Surface,
    foundation::error::{WeaveError, WeaveResult},
};

/// Encode a composited surface as lossless PNG bytes.
///
/// The surface is premultiplied internally; PNG carries straight alpha, so
/// pixels are unpremultiplied first. Encoding failure is fatal to the
/// export.
pub fn encode_png(surface: &Surface) -> WeaveResult<Vec<u8>> {
    let mut straight = surface.data().to_vec();
    unpremultiply_rgba8_in_place(&mut straight);

    let img = image::RgbaImage::from_raw(surface.width(), surface.height(), straight)
        .ok_or_else(|| WeaveError::encoding("surface buffer does not match its dimensions"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| WeaveError::encoding(e.to_string()))?;
    Ok(buf)
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            let v = (u16::from(*c) * 255 + a / 2) / a;
            *c = v.min(255) as u8;
        }
    }
}
