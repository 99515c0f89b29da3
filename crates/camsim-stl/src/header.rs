//! The 80-byte binary header and its embedded color and material.
//!
//! Some exporters store an overall part color in the header as the ASCII
//! text `COLOR=` followed by four RGBA bytes. A material may follow as
//! `,MATERIAL=` and three RGBA quadruples (diffuse, specular, ambient).

use serde::{Deserialize, Serialize};

/// Length of the binary header.
pub const HEADER_LEN: usize = 80;

const COLOR_PREFIX: &[u8] = b"COLOR=";
const MATERIAL_PREFIX: &[u8] = b",MATERIAL=";
const DEFAULT_TEXT: &[u8] = b"STL File";

/// RGBA color, one byte per channel.
pub type Rgba = [u8; 4];

/// Surface material colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Material {
    /// Diffuse reflection.
    pub diffuse: Rgba,
    /// Specular highlight.
    pub specular: Rgba,
    /// Ambient light.
    pub ambient: Rgba,
}

/// Color information carried by a binary header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeaderData {
    /// Overall part color.
    pub color: Option<Rgba>,
    /// Material, only meaningful together with a color.
    pub material: Option<Material>,
}

impl HeaderData {
    /// Header data with only a color.
    pub fn with_color(color: Rgba) -> Self {
        Self {
            color: Some(color),
            material: None,
        }
    }

    /// Extract color and material from a raw header.
    ///
    /// The first `COLOR=` wins. A material is recognized only directly after
    /// the color bytes.
    pub fn parse(header: &[u8; HEADER_LEN]) -> Self {
        let last_start = HEADER_LEN - COLOR_PREFIX.len() - 4;
        let Some(start) = (0..=last_start).find(|&i| header[i..].starts_with(COLOR_PREFIX)) else {
            return Self::default();
        };
        let at = start + COLOR_PREFIX.len();
        let color = rgba(&header[at..]);
        let rest = &header[at + 4..];
        let material = rest
            .strip_prefix(MATERIAL_PREFIX)
            .filter(|m| m.len() >= 12)
            .map(|m| Material {
                diffuse: rgba(m),
                specular: rgba(&m[4..]),
                ambient: rgba(&m[8..]),
            });
        Self {
            color: Some(color),
            material,
        }
    }

    /// Encode as a header, padding with spaces.
    ///
    /// Without a color this is the default `STL File` header.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [b' '; HEADER_LEN];
        let Some(color) = self.color else {
            out[..DEFAULT_TEXT.len()].copy_from_slice(DEFAULT_TEXT);
            return out;
        };
        let mut body = Vec::with_capacity(HEADER_LEN);
        body.extend_from_slice(COLOR_PREFIX);
        body.extend_from_slice(&color);
        if let Some(m) = self.material {
            body.extend_from_slice(MATERIAL_PREFIX);
            body.extend_from_slice(&m.diffuse);
            body.extend_from_slice(&m.specular);
            body.extend_from_slice(&m.ambient);
        }
        out[..body.len()].copy_from_slice(&body);
        out
    }
}

fn rgba(bytes: &[u8]) -> Rgba {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header() {
        let bytes = HeaderData::default().to_bytes();
        assert!(bytes.starts_with(b"STL File "));
        assert!(bytes[8..].iter().all(|&b| b == b' '));
        assert_eq!(HeaderData::parse(&bytes), HeaderData::default());
    }

    #[test]
    fn test_color_and_material_round_trip() {
        let data = HeaderData {
            color: Some([255, 128, 0, 255]),
            material: Some(Material {
                diffuse: [1, 2, 3, 4],
                specular: [5, 6, 7, 8],
                ambient: [9, 10, 11, 12],
            }),
        };
        let bytes = data.to_bytes();
        assert!(bytes.starts_with(b"COLOR="));
        assert_eq!(&bytes[10..20], b",MATERIAL=");
        assert_eq!(bytes[32], b' ');
        assert_eq!(HeaderData::parse(&bytes), data);
    }

    #[test]
    fn test_color_found_mid_header() {
        let mut bytes = [b' '; HEADER_LEN];
        bytes[..9].copy_from_slice(b"exported ");
        bytes[9..15].copy_from_slice(b"COLOR=");
        bytes[15..19].copy_from_slice(&[10, 20, 30, 40]);
        let data = HeaderData::parse(&bytes);
        assert_eq!(data.color, Some([10, 20, 30, 40]));
        assert_eq!(data.material, None);
    }

    #[test]
    fn test_color_at_tail_without_room_for_material() {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[70..76].copy_from_slice(b"COLOR=");
        bytes[76..80].copy_from_slice(&[1, 1, 1, 1]);
        assert_eq!(HeaderData::parse(&bytes), HeaderData::with_color([1, 1, 1, 1]));
    }
}
