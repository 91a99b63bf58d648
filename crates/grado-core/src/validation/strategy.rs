//! Ordered validation strategies.
//!
//! Each strategy either settles the slot (`Valid` / `Reject`) or passes it
//! on to the next one. Errors raised by a strategy are treated as a pass.

use tracing::debug;

use super::{is_valid, ValidationEngine, ValidationMethod};
use crate::error::DocumentError;
use crate::extraction::{extract_fields, extract_from_filename, ExtractedFields};
use crate::models::slot::DocumentSlot;
use crate::models::submission::DownloadedFile;
use crate::ocr::TextDetector;

/// What the engine knows about a file before any strategy runs.
pub struct SlotContext<'f> {
    pub slot: DocumentSlot,
    pub file: &'f DownloadedFile,
    /// Size on disk at validation time.
    pub size: u64,
    /// Leading bytes carry an HTML signature.
    pub html: bool,
}

/// Result of a single strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Valid {
        method: ValidationMethod,
        fields: ExtractedFields,
    },
    Reject(String),
    Pass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Anything under the absolute minimum size is rejected.
    MinimumSize,
    /// HTML payloads are judged by size alone.
    HtmlSize,
    /// OCR text checked against the slot dictionary.
    ContentMatch,
    /// Last resort: size against the slot threshold.
    SizeFallback,
}

/// Evaluation order.
pub const STRATEGIES: [Strategy; 4] = [
    Strategy::MinimumSize,
    Strategy::HtmlSize,
    Strategy::ContentMatch,
    Strategy::SizeFallback,
];

impl Strategy {
    pub fn evaluate<D: TextDetector>(
        self,
        engine: &ValidationEngine<'_, D>,
        ctx: &SlotContext<'_>,
    ) -> Result<Verdict, DocumentError> {
        let config = engine.config();

        match self {
            Strategy::MinimumSize => {
                if ctx.size < config.min_file_size {
                    let error = DocumentError::FileTooSmall {
                        size: ctx.size,
                        minimum: config.min_file_size,
                    };
                    return Ok(Verdict::Reject(error.to_string()));
                }
                Ok(Verdict::Pass)
            }

            Strategy::HtmlSize => {
                if !ctx.html {
                    return Ok(Verdict::Pass);
                }
                Ok(size_verdict(engine, ctx, ValidationMethod::SizeHtml))
            }

            Strategy::ContentMatch => {
                if ctx.html {
                    return Err(DocumentError::HtmlPayloadDetected);
                }

                let text = engine.extractor().extract_text(&ctx.file.path)?;
                let dictionary = engine.store().get_dictionary(ctx.slot);

                if is_valid(&text, dictionary.as_slice(), config.min_keyword_matches) {
                    Ok(Verdict::Valid {
                        method: ValidationMethod::Textract,
                        fields: extract_fields(&text, ctx.slot),
                    })
                } else {
                    debug!("{}: content did not match dictionary", ctx.slot);
                    Ok(Verdict::Pass)
                }
            }

            Strategy::SizeFallback => Ok(size_verdict(engine, ctx, ValidationMethod::SizeFallback)),
        }
    }
}

fn size_verdict<D: TextDetector>(
    engine: &ValidationEngine<'_, D>,
    ctx: &SlotContext<'_>,
    method: ValidationMethod,
) -> Verdict {
    let threshold = engine.config().min_size_for(ctx.slot);
    debug!(
        "{}: size {} bytes, threshold {} bytes",
        ctx.slot, ctx.size, threshold
    );

    if ctx.size >= threshold {
        Verdict::Valid {
            method,
            fields: extract_from_filename(&ctx.file.file_name, ctx.slot),
        }
    } else {
        Verdict::Reject(format!(
            "{} bytes is below the {} byte threshold",
            ctx.size, threshold
        ))
    }
}
