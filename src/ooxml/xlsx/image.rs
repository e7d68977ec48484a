//! Images for worksheets and headers.
//!
//! Only the header of the image is decoded: the type, pixel size and
//! resolution are needed to size the drawing, the bytes themselves are copied
//! into the package unchanged.

use crate::common::fatal;
use crate::common::unit::DEFAULT_DPI;
use crate::ooxml::error::{Result, XlsxError};
use crate::ooxml::opc::constants::content_type as ct;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageType {
    pub(crate) fn extension(&self) -> &'static str {
        match self {
            ImageType::Png => "png",
            ImageType::Jpeg => "jpeg",
            ImageType::Gif => "gif",
            ImageType::Bmp => "bmp",
        }
    }

    pub(crate) fn content_type(&self) -> &'static str {
        match self {
            ImageType::Png => ct::PNG,
            ImageType::Jpeg => ct::JPEG,
            ImageType::Gif => ct::GIF,
            ImageType::Bmp => ct::BMP,
        }
    }
}

/// How a drawing object follows the cells beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectMovement {
    #[default]
    MoveAndSizeWithCells,
    MoveButDontSizeWithCells,
    DontMoveOrSizeWithCells,
    /// Move and size, written as an absolute anchor by older Excel versions.
    MoveAndSizeWithCellsAfter,
}

impl ObjectMovement {
    /// Value of `xdr:twoCellAnchor/@editAs`, if any.
    pub(crate) fn edit_as(&self) -> Option<&'static str> {
        match self {
            ObjectMovement::MoveAndSizeWithCells | ObjectMovement::MoveAndSizeWithCellsAfter => None,
            ObjectMovement::MoveButDontSizeWithCells => Some("oneCell"),
            ObjectMovement::DontMoveOrSizeWithCells => Some("absolute"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ImageHeader {
    image_type: ImageType,
    width: u32,
    height: u32,
    width_dpi: f64,
    height_dpi: f64,
}

/// An image read from a byte buffer.
///
/// ```
/// use longan::Image;
///
/// assert!(Image::new_from_buffer(&[]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub(crate) data: Vec<u8>,
    pub(crate) image_type: ImageType,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) width_dpi: f64,
    pub(crate) height_dpi: f64,
    pub(crate) scale_width: f64,
    pub(crate) scale_height: f64,
    pub(crate) alt_text: String,
    pub(crate) decorative: bool,
    pub(crate) object_movement: ObjectMovement,
}

impl Image {
    /// Decode the image header and copy the bytes.
    ///
    /// Empty, truncated or unrecognized data fails with
    /// [`XlsxError::Decoding`].
    pub fn new_from_buffer(buffer: &[u8]) -> Result<Image> {
        let header = fatal::catch("Image decoding failed", || decode_header(buffer))?;
        log::debug!(
            "decoded {:?} image {}x{} px at {}x{} dpi",
            header.image_type,
            header.width,
            header.height,
            header.width_dpi,
            header.height_dpi
        );

        Ok(Image {
            data: buffer.to_vec(),
            image_type: header.image_type,
            width: header.width as f64,
            height: header.height as f64,
            width_dpi: header.width_dpi,
            height_dpi: header.height_dpi,
            scale_width: 1.0,
            scale_height: 1.0,
            alt_text: String::new(),
            decorative: false,
            object_movement: ObjectMovement::default(),
        })
    }

    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    /// Width in pixels as stored in the file.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height in pixels as stored in the file.
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn width_dpi(&self) -> f64 {
        self.width_dpi
    }

    pub fn height_dpi(&self) -> f64 {
        self.height_dpi
    }

    pub fn set_scale_width(&mut self, scale: f64) -> Result<&mut Self> {
        self.scale_width = check_scale(scale)?;
        Ok(self)
    }

    pub fn set_scale_height(&mut self, scale: f64) -> Result<&mut Self> {
        self.scale_height = check_scale(scale)?;
        Ok(self)
    }

    /// Scale the image to a box of `width` x `height` pixels.
    ///
    /// With `keep_aspect_ratio` the smaller of the two scales is used for both
    /// directions.
    pub fn set_scale_to_size(
        &mut self,
        width: f64,
        height: f64,
        keep_aspect_ratio: bool,
    ) -> Result<&mut Self> {
        let mut scale_width = check_scale(width / self.base_width())?;
        let mut scale_height = check_scale(height / self.base_height())?;
        if keep_aspect_ratio {
            let scale = scale_width.min(scale_height);
            scale_width = scale;
            scale_height = scale;
        }
        self.scale_width = scale_width;
        self.scale_height = scale_height;
        Ok(self)
    }

    /// Alternative text for screen readers.
    pub fn set_alt_text(&mut self, alt_text: &str) -> &mut Self {
        self.alt_text = alt_text.to_string();
        self
    }

    /// Mark the image as decorative; accessibility tools skip it.
    pub fn set_decorative(&mut self, decorative: bool) -> &mut Self {
        self.decorative = decorative;
        self
    }

    pub fn set_object_movement(&mut self, movement: ObjectMovement) -> &mut Self {
        self.object_movement = movement;
        self
    }

    /// Width at 100% scale, corrected for the image resolution.
    pub(crate) fn base_width(&self) -> f64 {
        self.width * DEFAULT_DPI / self.width_dpi
    }

    pub(crate) fn base_height(&self) -> f64 {
        self.height * DEFAULT_DPI / self.height_dpi
    }

    /// Displayed width in pixels.
    pub(crate) fn display_width(&self) -> f64 {
        self.base_width() * self.scale_width
    }

    /// Displayed height in pixels.
    pub(crate) fn display_height(&self) -> f64 {
        self.base_height() * self.scale_height
    }
}

fn check_scale(scale: f64) -> Result<f64> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(XlsxError::range(format!(
            "Image scale {} must be a positive number",
            scale
        )));
    }
    Ok(scale)
}

fn decode_header(data: &[u8]) -> Result<ImageHeader> {
    let header = match &data[0..4] {
        [0x89, b'P', b'N', b'G'] => decode_png(data),
        [0xFF, 0xD8, 0xFF, _] => decode_jpeg(data)?,
        [b'G', b'I', b'F', b'8'] => decode_gif(data),
        [b'B', b'M', _, _] => decode_bmp(data),
        magic => {
            return Err(XlsxError::Decoding(format!(
                "Unsupported image format: leading bytes {:02X?}",
                magic
            )));
        },
    };

    if header.width == 0 || header.height == 0 {
        return Err(XlsxError::Decoding(format!(
            "{:?} image has zero size {}x{}",
            header.image_type, header.width, header.height
        )));
    }

    Ok(ImageHeader {
        width_dpi: normalize_dpi(header.width_dpi),
        height_dpi: normalize_dpi(header.height_dpi),
        ..header
    })
}

fn normalize_dpi(dpi: f64) -> f64 {
    if dpi.is_finite() && dpi > 0.0 {
        dpi
    } else {
        log::warn!("image resolution {} is not usable, assuming {} dpi", dpi, DEFAULT_DPI);
        DEFAULT_DPI
    }
}

fn be_u16(data: &[u8], offset: usize) -> u16 {
    let bytes = &data[offset..offset + 2];
    u16::from_be_bytes([bytes[0], bytes[1]])
}

fn be_u32(data: &[u8], offset: usize) -> u32 {
    let bytes = &data[offset..offset + 4];
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn le_u16(data: &[u8], offset: usize) -> u16 {
    let bytes = &data[offset..offset + 2];
    u16::from_le_bytes([bytes[0], bytes[1]])
}

fn le_u32(data: &[u8], offset: usize) -> u32 {
    let bytes = &data[offset..offset + 4];
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn decode_png(data: &[u8]) -> ImageHeader {
    // IHDR is always the first chunk.
    let width = be_u32(data, 16);
    let height = be_u32(data, 20);
    let mut width_dpi = DEFAULT_DPI;
    let mut height_dpi = DEFAULT_DPI;

    let mut offset = 8;
    while offset + 8 <= data.len() {
        let length = be_u32(data, offset) as usize;
        let chunk_type = &data[offset + 4..offset + 8];

        match chunk_type {
            b"pHYs" => {
                let x_ppu = be_u32(data, offset + 8) as f64;
                let y_ppu = be_u32(data, offset + 12) as f64;
                // Unit 1 is pixels per metre.
                if data[offset + 16] == 1 {
                    width_dpi = x_ppu * 0.0254;
                    height_dpi = y_ppu * 0.0254;
                }
            },
            b"IEND" => break,
            _ => {},
        }

        offset += length + 12;
    }

    ImageHeader {
        image_type: ImageType::Png,
        width,
        height,
        width_dpi,
        height_dpi,
    }
}

fn decode_jpeg(data: &[u8]) -> Result<ImageHeader> {
    let mut size = None;
    let mut width_dpi = DEFAULT_DPI;
    let mut height_dpi = DEFAULT_DPI;

    let mut offset = 2;
    while offset + 4 <= data.len() {
        let marker = be_u16(data, offset);
        let length = be_u16(data, offset + 2) as usize;

        match marker {
            // SOFn, excluding DHT, JPG and DAC.
            0xFFC0..=0xFFCF if !matches!(marker, 0xFFC4 | 0xFFC8 | 0xFFCC) => {
                let height = be_u16(data, offset + 5) as u32;
                let width = be_u16(data, offset + 7) as u32;
                size = Some((width, height));
            },
            0xFFE0 if &data[offset + 4..offset + 9] == b"JFIF\0" => {
                let units = data[offset + 11];
                let x_density = be_u16(data, offset + 12) as f64;
                let y_density = be_u16(data, offset + 14) as f64;
                match units {
                    1 => {
                        width_dpi = x_density;
                        height_dpi = y_density;
                    },
                    2 => {
                        width_dpi = x_density * 2.54;
                        height_dpi = y_density * 2.54;
                    },
                    _ => {},
                }
            },
            // Start of scan: no more headers.
            0xFFDA => break,
            _ => {},
        }

        offset += length + 2;
    }

    let (width, height) = size.ok_or_else(|| {
        XlsxError::Decoding("JPEG data has no frame header (SOFn marker)".to_string())
    })?;

    Ok(ImageHeader {
        image_type: ImageType::Jpeg,
        width,
        height,
        width_dpi,
        height_dpi,
    })
}

fn decode_gif(data: &[u8]) -> ImageHeader {
    ImageHeader {
        image_type: ImageType::Gif,
        width: le_u16(data, 6) as u32,
        height: le_u16(data, 8) as u32,
        width_dpi: DEFAULT_DPI,
        height_dpi: DEFAULT_DPI,
    }
}

fn decode_bmp(data: &[u8]) -> ImageHeader {
    let width = le_u32(data, 18);
    // Negative heights mark top-down bitmaps.
    let height = (le_u32(data, 22) as i32).unsigned_abs();

    let mut width_dpi = DEFAULT_DPI;
    let mut height_dpi = DEFAULT_DPI;
    if data.len() >= 46 {
        let x_ppm = le_u32(data, 38);
        let y_ppm = le_u32(data, 42);
        if x_ppm > 0 && y_ppm > 0 {
            width_dpi = (x_ppm as f64 * 0.0254).round();
            height_dpi = (y_ppm as f64 * 0.0254).round();
        }
    }

    ImageHeader {
        image_type: ImageType::Bmp,
        width,
        height,
        width_dpi,
        height_dpi,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal PNG header: signature, IHDR, optional pHYs, IEND.
    pub(crate) fn png_bytes(width: u32, height: u32, dpi: Option<u32>) -> Vec<u8> {
        let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[8, 6, 0, 0, 0]);
        data.extend_from_slice(&[0, 0, 0, 0]);
        if let Some(dpi) = dpi {
            let ppm = (dpi as f64 / 0.0254).round() as u32;
            data.extend_from_slice(&9u32.to_be_bytes());
            data.extend_from_slice(b"pHYs");
            data.extend_from_slice(&ppm.to_be_bytes());
            data.extend_from_slice(&ppm.to_be_bytes());
            data.push(1);
            data.extend_from_slice(&[0, 0, 0, 0]);
        }
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(b"IEND");
        data.extend_from_slice(&[0xAE, 0x42, 0x60, 0x82]);
        data
    }

    fn jpeg_bytes(width: u16, height: u16, dpi: u16) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        // APP0 JFIF
        data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        data.extend_from_slice(b"JFIF\0");
        data.extend_from_slice(&[1, 1, 1]);
        data.extend_from_slice(&dpi.to_be_bytes());
        data.extend_from_slice(&dpi.to_be_bytes());
        data.extend_from_slice(&[0, 0]);
        // SOF0
        data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 8]);
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&[3, 1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
        data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]);
        data
    }

    #[test]
    fn test_png_header() {
        let image = Image::new_from_buffer(&png_bytes(200, 100, None)).unwrap();
        assert_eq!(image.image_type(), ImageType::Png);
        assert_eq!((image.width(), image.height()), (200.0, 100.0));
        assert_eq!(image.width_dpi(), 96.0);

        let hi_dpi = Image::new_from_buffer(&png_bytes(200, 100, Some(192))).unwrap();
        assert!((hi_dpi.width_dpi() - 192.0).abs() < 0.1);
        assert!((hi_dpi.display_width() - 100.0).abs() < 0.1);
    }

    #[test]
    fn test_jpeg_header() {
        let image = Image::new_from_buffer(&jpeg_bytes(640, 480, 72)).unwrap();
        assert_eq!(image.image_type(), ImageType::Jpeg);
        assert_eq!((image.width(), image.height()), (640.0, 480.0));
        assert_eq!(image.width_dpi(), 72.0);
    }

    #[test]
    fn test_gif_and_bmp_headers() {
        let mut gif = b"GIF89a".to_vec();
        gif.extend_from_slice(&32u16.to_le_bytes());
        gif.extend_from_slice(&16u16.to_le_bytes());
        gif.extend_from_slice(&[0, 0, 0]);
        let image = Image::new_from_buffer(&gif).unwrap();
        assert_eq!(image.image_type(), ImageType::Gif);
        assert_eq!((image.width(), image.height()), (32.0, 16.0));

        let mut bmp = vec![0u8; 54];
        bmp[0] = b'B';
        bmp[1] = b'M';
        bmp[18..22].copy_from_slice(&10u32.to_le_bytes());
        bmp[22..26].copy_from_slice(&(-20i32).to_le_bytes());
        let image = Image::new_from_buffer(&bmp).unwrap();
        assert_eq!(image.image_type(), ImageType::Bmp);
        assert_eq!((image.width(), image.height()), (10.0, 20.0));
        assert_eq!(image.height_dpi(), 96.0);
    }

    #[test]
    fn test_empty_buffer_is_decoding_error() {
        let err = Image::new_from_buffer(&[]).unwrap_err();
        match err {
            XlsxError::Decoding(message) => {
                assert!(message.contains("out of range for slice of length 0"), "{}", message);
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncated_and_unknown_buffers() {
        let truncated = &png_bytes(10, 10, None)[..12];
        assert!(matches!(
            Image::new_from_buffer(truncated),
            Err(XlsxError::Decoding(_))
        ));
        assert!(matches!(
            Image::new_from_buffer(b"%PDF-1.7"),
            Err(XlsxError::Decoding(_))
        ));
    }

    #[test]
    fn test_scaling() {
        let mut image = Image::new_from_buffer(&png_bytes(200, 100, None)).unwrap();
        image.set_scale_width(0.5).unwrap();
        assert_eq!(image.display_width(), 100.0);
        assert!(image.set_scale_height(0.0).is_err());
        assert_eq!(image.scale_height, 1.0);

        image.set_scale_to_size(50.0, 50.0, true).unwrap();
        assert_eq!((image.display_width(), image.display_height()), (50.0, 25.0));

        image.set_scale_to_size(50.0, 50.0, false).unwrap();
        assert_eq!((image.display_width(), image.display_height()), (50.0, 50.0));
    }
}
