//! Render capabilities for extracted records.
//!
//! Extraction only cuts diagrams and math out of a document. Turning them
//! into images is left to renderers registered per language, so a host
//! application decides which languages it can draw. Records are independent
//! of each other and are rendered in parallel on the global rayon pool.

use std::collections::HashMap;

use mdprep_core::{DiagramLanguage, MathMode};
use rayon::prelude::*;

use crate::diagram::DiagramRecord;
use crate::math::MathRecord;

/// A rendered diagram or formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedOutput {
    /// MIME type of `data` (e.g. `image/svg+xml`).
    pub mime: String,
    pub data: String,
    pub width: u32,
    pub height: u32,
}

/// Single record rendering error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{id}: {kind}")]
pub struct RenderError {
    /// Id of the record that failed.
    pub id: String,
    pub kind: RenderErrorKind,
}

/// Kind of record rendering error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderErrorKind {
    #[error("no renderer registered for {0}")]
    Unsupported(String),
    #[error("render failed: {0}")]
    Failed(String),
}

/// Renders diagram source for one language.
pub trait DiagramRenderer: Send + Sync {
    /// Render `source`; `hint` is the second fence info token, if any.
    fn render(&self, source: &str, hint: Option<&str>) -> Result<RenderedOutput, RenderErrorKind>;
}

impl<F> DiagramRenderer for F
where
    F: Fn(&str, Option<&str>) -> Result<RenderedOutput, RenderErrorKind> + Send + Sync,
{
    fn render(&self, source: &str, hint: Option<&str>) -> Result<RenderedOutput, RenderErrorKind> {
        self(source, hint)
    }
}

/// Renders TeX.
pub trait MathRenderer: Send + Sync {
    fn render(&self, tex: &str, mode: MathMode) -> Result<RenderedOutput, RenderErrorKind>;
}

impl<F> MathRenderer for F
where
    F: Fn(&str, MathMode) -> Result<RenderedOutput, RenderErrorKind> + Send + Sync,
{
    fn render(&self, tex: &str, mode: MathMode) -> Result<RenderedOutput, RenderErrorKind> {
        self(tex, mode)
    }
}

/// Outcome for one record, keyed by its placeholder id.
#[derive(Debug)]
pub struct RenderedRecord {
    pub id: String,
    pub result: Result<RenderedOutput, RenderError>,
}

/// Registered diagram and math renderers.
#[derive(Default)]
pub struct RendererRegistry {
    diagrams: HashMap<DiagramLanguage, Box<dyn DiagramRenderer>>,
    math: Option<Box<dyn MathRenderer>>,
}

impl RendererRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the renderer for `language`, replacing any previous one.
    #[must_use]
    pub fn with_diagram_renderer(
        mut self,
        language: DiagramLanguage,
        renderer: impl DiagramRenderer + 'static,
    ) -> Self {
        self.diagrams.insert(language, Box::new(renderer));
        self
    }

    /// Register the math renderer, replacing any previous one.
    #[must_use]
    pub fn with_math_renderer(mut self, renderer: impl MathRenderer + 'static) -> Self {
        self.math = Some(Box::new(renderer));
        self
    }

    /// Check if diagrams in `language` can be rendered.
    #[must_use]
    pub fn supports(&self, language: DiagramLanguage) -> bool {
        self.diagrams.contains_key(&language)
    }

    /// Check if a math renderer is registered.
    #[must_use]
    pub fn supports_math(&self) -> bool {
        self.math.is_some()
    }

    /// Render every diagram, in record order.
    ///
    /// A failure affects only its own record.
    #[must_use]
    pub fn render_diagrams(&self, records: &[DiagramRecord]) -> Vec<RenderedRecord> {
        records
            .par_iter()
            .map(|record| {
                let result = match self.diagrams.get(&record.language) {
                    Some(renderer) => renderer.render(&record.content, record.hint.as_deref()),
                    None => Err(RenderErrorKind::Unsupported(record.language.to_string())),
                };
                finish(&record.id, "diagram", result)
            })
            .collect()
    }

    /// Render every math record, in record order.
    #[must_use]
    pub fn render_math(&self, records: &[MathRecord]) -> Vec<RenderedRecord> {
        records
            .par_iter()
            .map(|record| {
                let result = match &self.math {
                    Some(renderer) => renderer.render(&record.tex, record.mode),
                    None => Err(RenderErrorKind::Unsupported("math".to_owned())),
                };
                finish(&record.id, "math", result)
            })
            .collect()
    }
}

fn finish(
    id: &str,
    what: &str,
    result: Result<RenderedOutput, RenderErrorKind>,
) -> RenderedRecord {
    let result = result.map_err(|kind| {
        tracing::warn!(id, record = what, error = %kind, "Render failed");
        RenderError {
            id: id.to_owned(),
            kind,
        }
    });
    RenderedRecord {
        id: id.to_owned(),
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::preprocess;
    use pretty_assertions::assert_eq;

    fn svg(data: &str) -> RenderedOutput {
        RenderedOutput {
            mime: "image/svg+xml".to_owned(),
            data: data.to_owned(),
            width: 10,
            height: 20,
        }
    }

    fn echo(source: &str, _: Option<&str>) -> Result<RenderedOutput, RenderErrorKind> {
        Ok(svg(source))
    }

    fn shout(source: &str, _: Option<&str>) -> Result<RenderedOutput, RenderErrorKind> {
        Ok(svg(&source.to_uppercase()))
    }

    fn echo_hint(_: &str, hint: Option<&str>) -> Result<RenderedOutput, RenderErrorKind> {
        Ok(svg(hint.unwrap_or("none")))
    }

    fn reject_a(tex: &str, _: MathMode) -> Result<RenderedOutput, RenderErrorKind> {
        if tex == "a" {
            Err(RenderErrorKind::Failed("bad tex".to_owned()))
        } else {
            Ok(svg(tex))
        }
    }

    #[test]
    fn test_renders_in_record_order() {
        let doc = "```mermaid\na\n```\n```dot\nb\n```\n```mermaid\nc\n```\n";
        let records = preprocess(doc).diagrams;
        let registry = RendererRegistry::new()
            .with_diagram_renderer(DiagramLanguage::Mermaid, echo)
            .with_diagram_renderer(DiagramLanguage::Dot, shout);

        let rendered = registry.render_diagrams(&records);
        let data: Vec<_> = rendered
            .iter()
            .map(|r| (r.id.as_str(), r.result.as_ref().unwrap().data.as_str()))
            .collect();
        assert_eq!(data, [("0", "a"), ("1", "B"), ("2", "c")]);
    }

    #[test]
    fn test_missing_renderer_is_per_record_error() {
        let records = preprocess("```vl\n{}\n```\n```mermaid\nx\n```\n").diagrams;
        let registry = RendererRegistry::new().with_diagram_renderer(DiagramLanguage::Mermaid, echo);

        assert!(registry.supports(DiagramLanguage::Mermaid));
        assert!(!registry.supports(DiagramLanguage::VegaLite));

        let rendered = registry.render_diagrams(&records);
        assert_eq!(
            rendered[0].result,
            Err(RenderError {
                id: "0".to_owned(),
                kind: RenderErrorKind::Unsupported("vega-lite".to_owned()),
            })
        );
        assert!(rendered[1].result.is_ok());
    }

    #[test]
    fn test_renderer_failure_isolated() {
        let records = preprocess("$a$ $b$").math;
        let registry = RendererRegistry::new().with_math_renderer(reject_a);

        let rendered = registry.render_math(&records);
        let err = rendered[0].result.as_ref().unwrap_err();
        assert_eq!(err.to_string(), "0: render failed: bad tex");
        assert_eq!(rendered[1].result.as_ref().unwrap().data, "b");
    }

    #[test]
    fn test_math_without_renderer() {
        let records = preprocess("$$x$$").math;
        let registry = RendererRegistry::new();
        assert!(!registry.supports_math());

        let rendered = registry.render_math(&records);
        assert_eq!(
            rendered[0].result.as_ref().unwrap_err().kind,
            RenderErrorKind::Unsupported("math".to_owned())
        );
    }

    #[test]
    fn test_hint_passed_through() {
        let records = preprocess("```dot neato\ndigraph {}\n```\n").diagrams;
        let registry = RendererRegistry::new().with_diagram_renderer(DiagramLanguage::Dot, echo_hint);

        let rendered = registry.render_diagrams(&records);
        assert_eq!(rendered[0].result.as_ref().unwrap().data, "neato");
    }
}
