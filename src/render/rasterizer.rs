use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage, imageops};
use pdfium_render::prelude::*;

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 2. `vendor/pdfium/lib/` relative to the project root (for development)
fn resolve_pdfium_lib_path() -> crate::error::Result<PathBuf> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        }
        return Err(crate::error::CompareError::render(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{}' but the path does not exist",
            path
        )));
    }

    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(vendor_path);
        }
    }

    Err(crate::error::CompareError::render(
        "pdfium library not found: set PDFIUM_DYNAMIC_LIB_PATH or place libpdfium.so in vendor/pdfium/lib/",
    ))
}

fn create_pdfium() -> crate::error::Result<Pdfium> {
    let lib_path = resolve_pdfium_lib_path()?;
    let lib_path_str = lib_path.to_str().ok_or_else(|| {
        crate::error::CompareError::render("pdfium library path contains non-UTF-8 characters")
    })?;
    let bindings =
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(lib_path_str))
            .map_err(|e| crate::error::CompareError::render(e.to_string()))?;
    Ok(Pdfium::new(bindings))
}

/// Owns the dynamically bound pdfium instance for the lifetime of a job.
pub struct Rasterizer {
    pdfium: Pdfium,
}

impl Rasterizer {
    pub fn new() -> crate::error::Result<Self> {
        Ok(Rasterizer {
            pdfium: create_pdfium()?,
        })
    }

    /// Open a source document read-only for the duration of the job.
    ///
    /// Fails with a `DocumentError` if the file cannot be opened or
    /// decoded; this is fatal for the whole job.
    pub fn open<'a>(&'a self, path: &Path) -> crate::error::Result<SourceDocument<'a>> {
        let doc = self.pdfium.load_pdf_from_file(path, None).map_err(|e| {
            crate::error::CompareError::document(format!(
                "Error opening file {}: {e}",
                path.display()
            ))
        })?;
        Ok(SourceDocument { doc })
    }
}

/// One open source document plus its rasterization entry points.
pub struct SourceDocument<'a> {
    doc: PdfDocument<'a>,
}

impl SourceDocument<'_> {
    pub fn page_count(&self) -> u32 {
        self.doc.pages().len() as u32
    }

    /// First-page size in inches at the PDF-native 72 points per inch.
    pub fn page_size_inches(&self) -> crate::error::Result<(f32, f32)> {
        let page = self
            .doc
            .pages()
            .get(0)
            .map_err(|e| crate::error::CompareError::render(e.to_string()))?;
        Ok((page.width().value / 72.0, page.height().value / 72.0))
    }

    /// Render one page as an RGB bitmap at the given DPI.
    ///
    /// A page index past the end of the document yields a blank white
    /// page sized like the document's first page, so both sides of a
    /// comparison produce same-sized bitmaps for missing trailing
    /// pages. If `target_size` (inches) is given, the bitmap is resized
    /// to `target_size * dpi` after rasterization.
    pub fn rasterize(
        &self,
        page_index: u32,
        dpi: u32,
        target_size: Option<(f32, f32)>,
    ) -> crate::error::Result<RgbImage> {
        let image = if page_index < self.page_count() {
            let index = u16::try_from(page_index).map_err(|_| {
                crate::error::CompareError::render("page index exceeds u16 range")
            })?;
            let page = self
                .doc
                .pages()
                .get(index)
                .map_err(|e| crate::error::CompareError::render(e.to_string()))?;
            let (width_px, height_px) = pixel_size(&page, dpi);

            let config = PdfRenderConfig::new()
                .set_target_width(width_px)
                .set_target_height(height_px);
            let bitmap = page
                .render_with_config(&config)
                .map_err(|e| crate::error::CompareError::render(e.to_string()))?;
            bitmap.as_image().to_rgb8()
        } else {
            // Missing trailing page: blank white page sized like page 0.
            let first = self
                .doc
                .pages()
                .get(0)
                .map_err(|e| crate::error::CompareError::render(e.to_string()))?;
            let (width_px, height_px) = pixel_size(&first, dpi);
            RgbImage::from_pixel(width_px as u32, height_px as u32, Rgb([255, 255, 255]))
        };

        Ok(match target_size {
            Some((width_in, height_in)) => {
                let target_w = (width_in * dpi as f32) as u32;
                let target_h = (height_in * dpi as f32) as u32;
                if target_w > 0 && target_h > 0 && image.dimensions() != (target_w, target_h) {
                    imageops::resize(&image, target_w, target_h, imageops::FilterType::Triangle)
                } else {
                    image
                }
            }
            None => image,
        })
    }
}

/// PDF default user unit: 1 point = 1/72 inch; each point maps to
/// (dpi / 72) pixels.
fn pixel_size(page: &PdfPage<'_>, dpi: u32) -> (i32, i32) {
    let width_pts = page.width().value;
    let height_pts = page.height().value;
    let width_px = (width_pts * dpi as f32 / 72.0).round() as i32;
    let height_px = (height_pts * dpi as f32 / 72.0).round() as i32;
    (width_px, height_px)
}
