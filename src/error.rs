use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Document error: {0}")]
    DocumentError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Image encode error: {0}")]
    ImageEncodeError(String),

    #[error("PDF write error: {0}")]
    PdfWriteError(String),

    #[error("Job cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`CompareError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl CompareError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a configuration error.
    config => ConfigError,
    /// Create a source document error.
    document => DocumentError,
    /// Create a render error.
    render => RenderError,
    /// Create an image encode error.
    image_encode => ImageEncodeError,
    /// Create a PDF write error.
    pdf_write => PdfWriteError,
}

impl From<lopdf::Error> for CompareError {
    fn from(e: lopdf::Error) -> Self {
        Self::DocumentError(e.to_string())
    }
}

impl From<serde_yml::Error> for CompareError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

impl From<pdfium_render::prelude::PdfiumError> for CompareError {
    fn from(e: pdfium_render::prelude::PdfiumError) -> Self {
        Self::RenderError(e.to_string())
    }
}

impl From<image::ImageError> for CompareError {
    fn from(e: image::ImageError) -> Self {
        Self::ImageEncodeError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CompareError>;
