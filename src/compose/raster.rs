use crate::{
    assets::decode::PreparedImage,
    foundation::{
        error::{WeaveError, WeaveResult},
        geom::Rect,
        math::mul_div255,
    },
};

/// How an image is fit into its destination box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fit {
    /// Uniform scale-to-fill: the image covers the whole box, overflow on
    /// the longer axis is center-cropped.
    Cover,
    /// Uniform scale-to-fit: the whole image is visible, centered, with
    /// padding on the dominant axis.
    Contain,
}

/// Uniform placement of a `w × h` image into a destination box.
///
/// `dest` is the sub-rectangle actually painted (the full box for cover, a
/// centered inset for contain); `src_x0`/`src_y0` is the source-space
/// position that `dest`'s origin maps to (the centered crop offset for
/// cover, zero for contain). One inverse mapping serves both fits:
/// `src = src0 + (dest_px - dest_origin) / scale`.
#[derive(Clone, Copy, Debug)]
pub struct Placement {
    pub dest: Rect,
    pub scale: f64,
    pub src_x0: f64,
    pub src_y0: f64,
}

pub fn place(img_w: u32, img_h: u32, dest_box: Rect, fit: Fit) -> Placement {
    let (iw, ih) = (f64::from(img_w), f64::from(img_h));
    let (bw, bh) = (dest_box.width(), dest_box.height());

    match fit {
        Fit::Cover => {
            let scale = (bw / iw).max(bh / ih);
            Placement {
                dest: dest_box,
                scale,
                src_x0: (iw - bw / scale) / 2.0,
                src_y0: (ih - bh / scale) / 2.0,
            }
        }
        Fit::Contain => {
            let scale = (bw / iw).min(bh / ih);
            let (dw, dh) = (iw * scale, ih * scale);
            let x0 = dest_box.x0 + (bw - dw) / 2.0;
            let y0 = dest_box.y0 + (bh - dh) / 2.0;
            Placement {
                dest: Rect::new(x0, y0, x0 + dw, y0 + dh),
                scale,
                src_x0: 0.0,
                src_y0: 0.0,
            }
        }
    }
}

/// Source-over blend of one premultiplied RGBA8 pixel onto another.
pub fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Owned premultiplied RGBA8 canvas. The single mutable resource of one
/// compositing run; exclusively owned until its bytes are handed back.
#[derive(Clone, Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> WeaveResult<Self> {
        if width == 0 || height == 0 {
            return Err(WeaveError::validation("surface dimensions must be > 0"));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| WeaveError::validation("surface size overflow"))?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Fill `rect ∩ clip` with a premultiplied color, source-over.
    pub fn fill_rect(&mut self, rect: Rect, clip: Rect, premul: [u8; 4]) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(rect.intersect(clip)) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
                let dst = [
                    self.data[idx],
                    self.data[idx + 1],
                    self.data[idx + 2],
                    self.data[idx + 3],
                ];
                self.data[idx..idx + 4].copy_from_slice(&over(dst, premul));
            }
        }
    }

    /// Draw a prepared image into `dest_box` under `clip` with the given
    /// fit. Bilinear-sampled in f64, so identical inputs always produce
    /// identical bytes.
    pub fn draw_image(&mut self, img: &PreparedImage, dest_box: Rect, clip: Rect, fit: Fit) {
        if img.width == 0 || img.height == 0 || dest_box.width() <= 0.0 || dest_box.height() <= 0.0
        {
            return;
        }

        let p = place(img.width, img.height, dest_box, fit);
        let Some((x0, y0, x1, y1)) = self.pixel_span(p.dest.intersect(clip)) else {
            return;
        };

        for y in y0..y1 {
            let sy = p.src_y0 + ((f64::from(y) + 0.5) - p.dest.y0) / p.scale;
            for x in x0..x1 {
                let sx = p.src_x0 + ((f64::from(x) + 0.5) - p.dest.x0) / p.scale;
                let src = sample_bilinear(img, sx, sy);

                let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
                let dst = [
                    self.data[idx],
                    self.data[idx + 1],
                    self.data[idx + 2],
                    self.data[idx + 3],
                ];
                self.data[idx..idx + 4].copy_from_slice(&over(dst, src));
            }
        }
    }

    /// Integer pixel range whose centers fall inside `rect`, clamped to the
    /// surface. `None` when nothing is covered.
    fn pixel_span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return None;
        }
        let x0 = (rect.x0 - 0.5).ceil().max(0.0) as u32;
        let y0 = (rect.y0 - 0.5).ceil().max(0.0) as u32;
        let x1 = ((rect.x1 - 0.5).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((rect.y1 - 0.5).ceil().max(0.0) as u32).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }
}

/// Bilinear sample at source texel coordinates, edges clamped.
fn sample_bilinear(img: &PreparedImage, sx: f64, sy: f64) -> [u8; 4] {
    let max_x = (img.width - 1) as i64;
    let max_y = (img.height - 1) as i64;

    let fx = sx - 0.5;
    let fy = sy - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;

    let xi = |v: f64| (v as i64).clamp(0, max_x) as usize;
    let yi = |v: f64| (v as i64).clamp(0, max_y) as usize;
    let texel = |x: usize, y: usize| -> [f64; 4] {
        let idx = (y * (img.width as usize) + x) * 4;
        let px = &img.rgba8_premul[idx..idx + 4];
        [
            f64::from(px[0]),
            f64::from(px[1]),
            f64::from(px[2]),
            f64::from(px[3]),
        ]
    };

    let (xa, xb) = (xi(x0), xi(x0 + 1.0));
    let (ya, yb) = (yi(y0), yi(y0 + 1.0));
    let (p00, p10, p01, p11) = (texel(xa, ya), texel(xb, ya), texel(xa, yb), texel(xb, yb));

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = p00[i] * (1.0 - tx) + p10[i] * tx;
        let bot = p01[i] * (1.0 - tx) + p11[i] * tx;
        out[i] = (top * (1.0 - ty) + bot * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}
