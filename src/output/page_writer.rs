use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, GrayImage, RgbImage};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::config::ColorMode;

const JPEG_QUALITY_REDUCED: u8 = 75;
const JPEG_QUALITY_FULL: u8 = 95;

// US-Letter text page geometry, matching the statistics page layout.
const LETTER_WIDTH_PTS: i64 = 612;
const LETTER_HEIGHT_PTS: i64 = 792;
const TEXT_MARGIN_PTS: f32 = 72.0;
const TEXT_FONT_SIZE: f32 = 11.0;
const TEXT_LEADING: f32 = 12.0;
const TEXT_LINES_PER_PAGE: usize = 54;

/// Serialize one artifact image as a single-page PDF at the given DPI
/// and color mode.
pub fn single_page_pdf(
    image: &RgbImage,
    dpi: u32,
    color_mode: ColorMode,
    reduce_filesize: bool,
) -> crate::error::Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");

    let (width_px, height_px) = image.dimensions();
    let xobject = build_image_xobject(image, color_mode, reduce_filesize)?;
    let image_id = doc.add_object(Object::Stream(xobject));

    // 1 point = 1/72 inch; pixels map back to points at the render DPI.
    let width_pts = width_px as f32 * 72.0 / dpi as f32;
    let height_pts = height_px as f32 * 72.0 / dpi as f32;

    let pages_id = doc.new_object_id();

    let mut xobject_dict = lopdf::Dictionary::new();
    xobject_dict.set("Im0", Object::Reference(image_id));
    let resources_id = doc.add_object(dictionary! {
        "XObject" => Object::Dictionary(xobject_dict),
    });

    let content_bytes =
        format!("q {width_pts:.2} 0 0 {height_pts:.2} 0 0 cm /Im0 Do Q").into_bytes();
    let content_stream = Stream::new(dictionary! {}, content_bytes);
    let content_id = doc.add_object(Object::Stream(content_stream));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(width_pts),
            Object::Real(height_pts),
        ],
        "Resources" => resources_id,
        "Contents" => content_id,
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    save_to_bytes(doc)
}

/// Build the image XObject stream for the configured color mode.
///
/// Full color and grayscale pages are DCT (JPEG) encoded; monochrome
/// pages are 1-bit flate-compressed, which wins when both monochrome
/// and grayscale are requested.
fn build_image_xobject(
    image: &RgbImage,
    color_mode: ColorMode,
    reduce_filesize: bool,
) -> crate::error::Result<Stream> {
    let (width, height) = image.dimensions();
    let quality = if reduce_filesize {
        JPEG_QUALITY_REDUCED
    } else {
        JPEG_QUALITY_FULL
    };

    let stream = match color_mode {
        ColorMode::Color => {
            let mut jpeg = Vec::new();
            let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
            encoder.encode(image.as_raw(), width, height, ExtendedColorType::Rgb8)?;
            Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                jpeg,
            )
        }
        ColorMode::Grayscale => {
            let gray: GrayImage = image::imageops::grayscale(image);
            let mut jpeg = Vec::new();
            let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
            encoder.encode(gray.as_raw(), width, height, ExtendedColorType::L8)?;
            Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                jpeg,
            )
        }
        ColorMode::Monochrome => {
            let gray: GrayImage = image::imageops::grayscale(image);
            let packed = pack_monochrome(&gray);
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&packed)?;
            let data = encoder.finish()?;
            Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 1,
                    "Filter" => "FlateDecode",
                },
                data,
            )
        }
    };

    Ok(stream)
}

/// Pack a grayscale image into 1 bit per pixel, rows padded to whole
/// bytes, thresholding at mid-gray. 1 is white in DeviceGray.
fn pack_monochrome(gray: &GrayImage) -> Vec<u8> {
    let (width, height) = gray.dimensions();
    let row_bytes = width.div_ceil(8) as usize;
    let mut packed = vec![0u8; row_bytes * height as usize];

    for y in 0..height {
        for x in 0..width {
            if gray.get_pixel(x, y).0[0] >= 128 {
                let index = y as usize * row_bytes + (x / 8) as usize;
                packed[index] |= 0x80 >> (x % 8);
            }
        }
    }
    packed
}

/// Append plain-text pages (Helvetica 11 pt, 1-inch margins, US-Letter)
/// to the document, breaking to a new page on overflow. Returns the
/// page object ids in order.
pub fn append_text_pages(
    doc: &mut Document,
    pages_id: ObjectId,
    text: &str,
) -> crate::error::Result<Vec<ObjectId>> {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let mut font_dict = lopdf::Dictionary::new();
    font_dict.set("F1", Object::Reference(font_id));
    let resources_id = doc.add_object(dictionary! {
        "Font" => Object::Dictionary(font_dict),
    });

    let lines: Vec<&str> = text.lines().collect();
    let mut page_ids = Vec::new();

    for chunk in lines.chunks(TEXT_LINES_PER_PAGE.max(1)) {
        let mut content = String::new();
        content.push_str("BT\n");
        content.push_str(&format!("/F1 {TEXT_FONT_SIZE} Tf\n"));
        content.push_str(&format!("{TEXT_LEADING} TL\n"));
        content.push_str(&format!(
            "{TEXT_MARGIN_PTS} {} Td\n",
            LETTER_HEIGHT_PTS as f32 - TEXT_MARGIN_PTS
        ));
        for (i, line) in chunk.iter().enumerate() {
            if i > 0 {
                content.push_str("T*\n");
            }
            content.push_str(&format!("({}) Tj\n", escape_pdf_string(line)));
        }
        content.push_str("ET\n");

        let content_stream = Stream::new(dictionary! {}, content.into_bytes());
        let content_id = doc.add_object(Object::Stream(content_stream));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(LETTER_WIDTH_PTS),
                Object::Integer(LETTER_HEIGHT_PTS),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    Ok(page_ids)
}

fn escape_pdf_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Serialize a document to bytes.
pub fn save_to_bytes(mut doc: Document) -> crate::error::Result<Vec<u8>> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| crate::error::CompareError::pdf_write(e.to_string()))?;
    Ok(buf)
}
