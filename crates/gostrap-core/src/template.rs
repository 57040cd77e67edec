use std::collections::BTreeSet;
use std::io::BufRead;

use anyhow::{Context as _, Result};
use regex::Regex;
use tera::{Context, Tera};

use crate::config::Resolver;
use crate::gofmt;
use crate::source::ContentSource;

/// Matches `{{ Name }}` substitutions and the subjects of
/// `{% if Name %}` / `{% elif not Name %}` conditions.
const PLACEHOLDER_PATTERN: &str =
    r"\{\{-?\s*([A-Za-z][A-Za-z0-9_]*)|\{%-?\s*(?:if|elif)\s+(?:not\s+)?([A-Za-z][A-Za-z0-9_]*)";

/// Renders named resources against the live configuration.
///
/// Stateless pipeline: fetch raw text, find which placeholders the
/// template actually references, resolve exactly those through the
/// registry (so unused lazy fields never prompt), render with tera.
pub struct TemplateEngine {
    source: ContentSource,
}

impl TemplateEngine {
    pub fn new(source: ContentSource) -> Self {
        Self { source }
    }

    pub fn apply<R: BufRead>(&self, name: &str, resolver: &mut Resolver<R>) -> Result<String> {
        let raw = self.source.fetch(name)?;
        let text = String::from_utf8(raw)
            .with_context(|| format!("cannot decode template {name} as UTF-8"))?;

        let mut ctx = Context::new();
        for placeholder in placeholder_refs(&text) {
            let value = resolver
                .resolve_placeholder(&placeholder)
                .with_context(|| format!("cannot apply template {name}"))?;
            ctx.insert(placeholder, &value);
        }

        let mut tera = Tera::default();
        tera.add_raw_template(name, &text)
            .with_context(|| format!("cannot parse template {name}"))?;
        tera.render(name, &ctx)
            .with_context(|| format!("cannot execute template from {name}"))
    }

    /// `apply`, then the Go source normalizer.
    pub fn apply_go<R: BufRead>(&self, name: &str, resolver: &mut Resolver<R>) -> Result<String> {
        let text = self.apply(name, resolver)?;
        gofmt::format_source(&text).with_context(|| format!("cannot gofmt {name}"))
    }
}

/// Placeholder names referenced by a template, deduplicated and in a
/// stable order so prompting order is reproducible.
fn placeholder_refs(template: &str) -> BTreeSet<String> {
    let pattern = Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is statically valid");
    let mut refs = BTreeSet::new();
    for captures in pattern.captures_iter(template) {
        if let Some(name) = captures.get(1).or_else(|| captures.get(2)) {
            refs.insert(name.as_str().to_string());
        }
    }
    refs
}
