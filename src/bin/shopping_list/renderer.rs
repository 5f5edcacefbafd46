use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
    sync::{Arc, Mutex, PoisonError},
};

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, Pt};
use thiserror::Error;
use tracing::{info, trace, trace_span};

use super::ingredient_list::IngredientList;

pub const HEADER: &str = "Shopping list:";
const TITLE: &str = "Shopping list";
const LAYER_NAME: &str = "Layer 1";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("font {} could not be read: {source}", path.display())]
    ResourceUnavailable { path: PathBuf, source: io::Error },

    #[error("failed to build document: {0}")]
    Document(String),
}

/// Standard PDF faces that need no font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFace {
    Helvetica,
    Courier,
    TimesRoman,
}

impl BuiltinFace {
    fn to_printpdf(self) -> BuiltinFont {
        match self {
            BuiltinFace::Helvetica => BuiltinFont::Helvetica,
            BuiltinFace::Courier => BuiltinFont::Courier,
            BuiltinFace::TimesRoman => BuiltinFont::TimesRoman,
        }
    }
}

/// Where the shopping list font comes from.
///
/// Parsed from `builtin:<face>` or a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Builtin(BuiltinFace),
    File(PathBuf),
}

impl FromStr for FontSource {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err("font source is empty".to_owned());
        }

        match value.strip_prefix("builtin:") {
            Some("Helvetica") => Ok(FontSource::Builtin(BuiltinFace::Helvetica)),
            Some("Courier") => Ok(FontSource::Builtin(BuiltinFace::Courier)),
            Some("Times-Roman") => Ok(FontSource::Builtin(BuiltinFace::TimesRoman)),
            Some(other) => Err(format!("unknown builtin font {other:?}")),
            None => Ok(FontSource::File(PathBuf::from(value))),
        }
    }
}

/// Page geometry in points, origin at the bottom left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub left: f32,
    pub top: f32,
    pub bottom: f32,
    pub line_step: f32,
    pub font_size: f32,
}

impl Default for PageLayout {
    // US letter
    fn default() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            left: 100.0,
            top: 750.0,
            bottom: 50.0,
            line_step: 20.0,
            font_size: 14.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine<'a> {
    pub text: &'a str,
    pub x: f32,
    pub y: f32,
}

impl PageLayout {
    /// Lines whose baseline stays at or above `bottom`. Never less than one.
    pub fn lines_per_page(&self) -> usize {
        let usable = (self.top - self.bottom).max(0.0);
        (usable / self.line_step).floor() as usize + 1
    }

    /// Splits `lines` into pages. Always yields at least one page.
    pub fn paginate<'a>(&self, lines: &'a [String]) -> Vec<Vec<PlacedLine<'a>>> {
        let mut pages = lines
            .chunks(self.lines_per_page())
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .map(|(index, text)| PlacedLine {
                        text,
                        x: self.left,
                        y: self.top - self.line_step * index as f32,
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        if pages.is_empty() {
            pages.push(Vec::new());
        }

        pages
    }
}

#[derive(Debug)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub page_count: usize,
}

impl RenderedDocument {
    pub const CONTENT_TYPE: &'static str = "application/pdf";

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Turns an aggregated shopping list into a PDF.
///
/// Font bytes are read once and kept for the lifetime of the renderer.
pub struct ShoppingListRenderer {
    font: FontSource,
    layout: PageLayout,
    filename: String,
    font_cache: Mutex<Option<Arc<Vec<u8>>>>,
}

impl ShoppingListRenderer {
    pub fn new(font: FontSource, filename: String) -> Self {
        Self::with_layout(font, filename, PageLayout::default())
    }

    pub fn with_layout(font: FontSource, filename: String, layout: PageLayout) -> Self {
        Self {
            font,
            layout,
            filename,
            font_cache: Mutex::new(None),
        }
    }

    /// Loads the font file ahead of the first request.
    pub fn preload_font(&self) -> Result<(), RenderError> {
        if let FontSource::File(path) = &self.font {
            self.font_bytes(path)?;
            info!("Loaded shopping list font from {}", path.display());
        }

        Ok(())
    }

    fn font_bytes(&self, path: &Path) -> Result<Arc<Vec<u8>>, RenderError> {
        let mut cache = self.font_cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(bytes) = cache.as_ref() {
            return Ok(bytes.clone());
        }

        trace!("Reading font file {}", path.display());
        let bytes = fs::read(path).map_err(|source| RenderError::ResourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let bytes = Arc::new(bytes);
        *cache = Some(bytes.clone());

        Ok(bytes)
    }

    fn add_font(&self, doc: &PdfDocumentReference) -> Result<IndirectFontRef, RenderError> {
        match &self.font {
            FontSource::Builtin(face) => doc
                .add_builtin_font(face.to_printpdf())
                .map_err(|e| RenderError::Document(format!("{e:?}"))),
            FontSource::File(path) => {
                let bytes = self.font_bytes(path)?;
                doc.add_external_font(bytes.as_slice())
                    .map_err(|e| RenderError::Document(format!("{e:?}")))
            }
        }
    }

    /// The header line followed by one line per ingredient.
    pub fn lines(list: &IngredientList) -> Vec<String> {
        let mut lines = Vec::with_capacity(list.len() + 1);
        lines.push(HEADER.to_owned());
        lines.extend(list.lines());
        lines
    }

    pub fn render(&self, list: &IngredientList) -> Result<RenderedDocument, RenderError> {
        let span = trace_span!("render shopping list");
        let _guard = span.enter();

        let lines = Self::lines(list);
        let pages = self.layout.paginate(&lines);

        let width = Mm::from(Pt(self.layout.width));
        let height = Mm::from(Pt(self.layout.height));

        let (doc, first_page, first_layer) = PdfDocument::new(TITLE, width, height, LAYER_NAME);
        let font = self.add_font(&doc)?;

        for (index, placed_lines) in pages.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page, layer) = doc.add_page(width, height, LAYER_NAME);
                doc.get_page(page).get_layer(layer)
            };

            for line in placed_lines {
                layer.use_text(
                    line.text,
                    self.layout.font_size,
                    Mm::from(Pt(line.x)),
                    Mm::from(Pt(line.y)),
                    &font,
                );
            }
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| RenderError::Document(format!("{e:?}")))?;

        trace!("Rendered {} lines on {} pages", lines.len(), pages.len());

        Ok(RenderedDocument {
            bytes,
            filename: self.filename.clone(),
            page_count: pages.len(),
        })
    }
}
