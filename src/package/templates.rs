//! OPF, NCX and HTML toc rendering.
//!
//! Each of the three documents comes from a [`TemplateSource`]: either
//! the bundled generator for the book's version, or a caller-supplied
//! template file. Template files use `{{ name }}` placeholders filled from
//! the book context.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{nav, ncx, opf};
use crate::context::BookContext;
use crate::error::{Error, Result};
use crate::util::escape_xml;

/// The three rendered package documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Opf,
    NcxToc,
    HtmlToc,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [TemplateKind::Opf, TemplateKind::NcxToc, TemplateKind::HtmlToc];

    /// File name of the rendered document inside `OEBPS`.
    pub fn output_name(self) -> &'static str {
        match self {
            TemplateKind::Opf => "content.opf",
            TemplateKind::NcxToc => "toc.ncx",
            TemplateKind::HtmlToc => "toc.xhtml",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TemplateKind::Opf => "OPF",
            TemplateKind::NcxToc => "NCX toc",
            TemplateKind::HtmlToc => "HTML toc",
        })
    }
}

/// Caller-supplied template files, one optional path per document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateOverrides {
    pub opf: Option<PathBuf>,
    pub ncx_toc: Option<PathBuf>,
    pub html_toc: Option<PathBuf>,
}

impl TemplateOverrides {
    pub fn get(&self, kind: TemplateKind) -> Option<&Path> {
        match kind {
            TemplateKind::Opf => self.opf.as_deref(),
            TemplateKind::NcxToc => self.ncx_toc.as_deref(),
            TemplateKind::HtmlToc => self.html_toc.as_deref(),
        }
    }
}

/// Where a document's template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The built-in generator for the book's version.
    Bundled,
    File(PathBuf),
}

/// Resolve the template for `kind`, checking that a custom file exists.
pub async fn resolve_template(
    kind: TemplateKind,
    overrides: &TemplateOverrides,
) -> Result<TemplateSource> {
    let Some(path) = overrides.get(kind) else {
        return Ok(TemplateSource::Bundled);
    };
    if tokio::fs::try_exists(path).await? {
        Ok(TemplateSource::File(path.to_path_buf()))
    } else {
        Err(Error::TemplateNotFound {
            kind,
            path: path.to_path_buf(),
        })
    }
}

/// Renders a package document from a template and the book context.
#[async_trait]
pub trait TemplateRenderer: Send + Sync {
    async fn render(
        &self,
        kind: TemplateKind,
        source: &TemplateSource,
        book: &BookContext,
    ) -> Result<String>;
}

/// Built-in generators plus `{{ name }}` substitution for template files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRenderer;

#[async_trait]
impl TemplateRenderer for DefaultRenderer {
    async fn render(
        &self,
        kind: TemplateKind,
        source: &TemplateSource,
        book: &BookContext,
    ) -> Result<String> {
        match source {
            TemplateSource::Bundled => Ok(match kind {
                TemplateKind::Opf => opf::render(book),
                TemplateKind::NcxToc => ncx::render(book),
                TemplateKind::HtmlToc => nav::render(book),
            }),
            TemplateSource::File(path) => {
                let template = tokio::fs::read_to_string(path).await?;
                render_placeholders(&template, |name| lookup(book, name))
                    .map_err(|name| {
                        Error::Template(format!(
                            "unknown placeholder `{name}` in {kind} template {}",
                            path.display()
                        ))
                    })
            }
        }
    }
}

/// Value of a template variable. Text values are XML-escaped; fragments
/// are already markup.
fn lookup(book: &BookContext, name: &str) -> Option<String> {
    let meta = &book.metadata;
    let text = |s: &str| escape_xml(s).into_owned();
    Some(match name {
        "id" => book.id.to_string(),
        "title" => text(&meta.title),
        "author" => text(&meta.authors.join(", ")),
        "publisher" => text(&meta.publisher),
        "description" => text(&meta.description),
        "lang" => text(&meta.lang),
        "date" => text(&meta.date),
        "toc_title" => text(&meta.toc_title),
        "version" => book.version.number().to_string(),
        "source" => meta.source.as_deref().map(text).unwrap_or_default(),
        "metadata" => opf::metadata(book),
        "manifest" => opf::manifest(book),
        "spine" => opf::spine(book),
        "nav_points" => ncx::nav_points(book),
        "toc_list" => nav::toc_list(book),
        _ => return None,
    })
}

/// Replace every `{{ name }}` in `template` with `lookup(name)`.
///
/// Returns the first name `lookup` does not know. An opening `{{` without
/// a closing `}}` is kept as literal text.
pub fn render_placeholders<F>(template: &str, lookup: F) -> std::result::Result<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = rest[start + 2..start + 2 + len].trim();
        match lookup(name) {
            Some(value) => out.push_str(&value),
            None => return Err(name.to_string()),
        }
        rest = &rest[start + 2 + len + 2..];
    }

    out.push_str(rest);
    Ok(out)
}
