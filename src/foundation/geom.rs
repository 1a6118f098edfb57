use crate::foundation::error::{WeaveError, WeaveResult};

pub use kurbo::{Point, Rect, Vec2};

/// Straight-alpha RGBA8 color, parsed from a CSS color string.
///
/// Serializes back to its canonical hex form (`#rrggbb`, or `#rrggbbaa` when
/// the alpha channel is not opaque).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Premultiplied RGBA8 form used by the raster path.
    pub fn to_premul_rgba8(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            (((u16::from(c) * u16::from(a)) + 127) / 255) as u8
        }
        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl std::str::FromStr for Color {
    type Err = WeaveError;

    fn from_str(s: &str) -> WeaveResult<Self> {
        let s = s.trim().to_ascii_lowercase();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex)
                .ok_or_else(|| WeaveError::validation(format!("invalid hex color '{s}'")));
        }

        if let Some(body) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|b| b.strip_suffix(')'))
        {
            return parse_rgb_func(body)
                .ok_or_else(|| WeaveError::validation(format!("invalid rgb() color '{s}'")));
        }

        named_color(&s).ok_or_else(|| WeaveError::validation(format!("unknown color '{s}'")))
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let nib = |c: u8| (c as char).to_digit(16).map(|d| d as u8);
    let bytes = hex.as_bytes();
    match bytes.len() {
        // #rgb / #rgba: each nibble doubles.
        3 | 4 => {
            let mut ch = [255u8; 4];
            for (i, &c) in bytes.iter().enumerate() {
                let n = nib(c)?;
                ch[i] = n << 4 | n;
            }
            Some(Color {
                r: ch[0],
                g: ch[1],
                b: ch[2],
                a: ch[3],
            })
        }
        6 | 8 => {
            let mut ch = [255u8; 4];
            for (i, pair) in bytes.chunks_exact(2).enumerate() {
                ch[i] = nib(pair[0])? << 4 | nib(pair[1])?;
            }
            Some(Color {
                r: ch[0],
                g: ch[1],
                b: ch[2],
                a: ch[3],
            })
        }
        _ => None,
    }
}

fn parse_rgb_func(body: &str) -> Option<Color> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let r = parts[0].parse::<u8>().ok()?;
    let g = parts[1].parse::<u8>().ok()?;
    let b = parts[2].parse::<u8>().ok()?;
    let a = if parts.len() == 4 {
        let f = parts[3].parse::<f64>().ok()?;
        if !f.is_finite() || !(0.0..=1.0).contains(&f) {
            return None;
        }
        (f * 255.0).round() as u8
    } else {
        255
    };
    Some(Color { r, g, b, a })
}

fn named_color(name: &str) -> Option<Color> {
    let c = match name {
        "white" => Color::rgb(255, 255, 255),
        "black" => Color::rgb(0, 0, 0),
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "cyan" => Color::rgb(0, 255, 255),
        "magenta" => Color::rgb(255, 0, 255),
        "orange" => Color::rgb(255, 165, 0),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "transparent" => Color {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        },
        _ => return None,
    };
    Some(c)
}

/// Target bounding box for an image layer, in the owning panel's template
/// pixel space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayerBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> WeaveResult<Self> {
        let b = Self {
            x,
            y,
            width,
            height,
        };
        if !b.is_well_formed() {
            return Err(WeaveError::validation(
                "layer box must have finite non-negative origin and positive size",
            ));
        }
        Ok(b)
    }

    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.x >= 0.0
            && self.y >= 0.0
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Substitute box used when a layer's geometry is malformed: centered in
    /// the panel, half the panel's template dimensions on each axis.
    pub fn repaired_for(panel_width: u32, panel_height: u32) -> Self {
        let w = f64::from(panel_width) / 2.0;
        let h = f64::from(panel_height) / 2.0;
        Self {
            x: (f64::from(panel_width) - w) / 2.0,
            y: (f64::from(panel_height) - h) / 2.0,
            width: w,
            height: h,
        }
    }

    /// Scale origin and size by independent axis factors. This is the
    /// non-uniform panel-normalization scaling; the image drawn *inside* the
    /// box still uses a uniform cover/contain fit.
    pub fn scaled(self, sx: f64, sy: f64) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#ffffff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!(
            "#80ff00".parse::<Color>().unwrap(),
            Color::rgb(0x80, 0xff, 0x00)
        );
        let c = "#00ff0080".parse::<Color>().unwrap();
        assert_eq!((c.g, c.a), (255, 0x80));
    }

    #[test]
    fn parses_rgb_functions_and_names() {
        assert_eq!(
            "rgb(1, 2, 3)".parse::<Color>().unwrap(),
            Color::rgb(1, 2, 3)
        );
        let c = "rgba(10, 20, 30, 0.5)".parse::<Color>().unwrap();
        assert_eq!(c.a, 128);
        assert_eq!("White".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("transparent".parse::<Color>().unwrap().a, 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("rgb(300, 0, 0)".parse::<Color>().is_err());
        assert!("rgba(0, 0, 0, 1.5)".parse::<Color>().is_err());
        assert!("blurple".parse::<Color>().is_err());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for s in ["#12ab34", "#12ab3480"] {
            let c = s.parse::<Color>().unwrap();
            assert_eq!(c.to_string(), s);
            assert_eq!(c.to_string().parse::<Color>().unwrap(), c);
        }
    }

    #[test]
    fn premul_matches_rounding_rule() {
        let c = Color {
            r: 100,
            g: 50,
            b: 200,
            a: 128,
        };
        assert_eq!(
            c.to_premul_rgba8(),
            [
                ((100u16 * 128 + 127) / 255) as u8,
                ((50u16 * 128 + 127) / 255) as u8,
                ((200u16 * 128 + 127) / 255) as u8,
                128
            ]
        );
    }

    #[test]
    fn well_formedness_rejects_nan_and_nonpositive_sizes() {
        assert!(LayerBox::new(0.0, 0.0, 10.0, 10.0).is_ok());
        assert!(LayerBox::new(f64::NAN, 0.0, 10.0, 10.0).is_err());
        assert!(LayerBox::new(-1.0, 0.0, 10.0, 10.0).is_err());
        assert!(LayerBox::new(0.0, 0.0, 0.0, 10.0).is_err());
        assert!(LayerBox::new(0.0, 0.0, 10.0, f64::INFINITY).is_err());
    }

    #[test]
    fn repaired_box_is_centered_and_proportional() {
        let b = LayerBox::repaired_for(2000, 1000);
        assert_eq!((b.width, b.height), (1000.0, 500.0));
        assert_eq!((b.x, b.y), (500.0, 250.0));
        assert!(b.is_well_formed());
    }

    #[test]
    fn scaled_applies_independent_axis_factors() {
        let b = LayerBox::new(100.0, 100.0, 50.0, 50.0).unwrap();
        let s = b.scaled(2.0, 2.0);
        assert_eq!((s.x, s.y, s.width, s.height), (200.0, 200.0, 100.0, 100.0));

        let ns = b.scaled(2.0, 0.5);
        assert_eq!((ns.y, ns.height), (50.0, 25.0));
    }
}
