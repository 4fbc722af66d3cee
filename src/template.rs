//! Template rendering for skeleton filenames and `.skel` files.
//!
//! Templates are rendered with `tera`. Expressions may also be written with
//! a leading dot (`{{ .Project.Name }}`, `{{- .Values.port -}}`); the dot is
//! dropped before the source reaches tera, so both spellings resolve against
//! the same context.
//!
//! Every `.skel` body goes through tera, so its delimiters are reserved:
//! `{{`, `{%` and `{#` (comment). Shell scripts trip over the last one in
//! `${#var}` and `${#array[@]}`, which fail with [`Error::Template`]. Wrap
//! such passages in `{% raw %}` ... `{% endraw %}` to emit them verbatim.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::{Error, Result};

fn leading_dot_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\{\{-?\s*)\.([A-Za-z_])").expect("leading dot pattern is valid")
    })
}

/// Drop the leading dot of field references in expression openers.
pub fn normalize_syntax(source: &str) -> Cow<'_, str> {
    leading_dot_pattern().replace_all(source, "$1$2")
}

/// Returns true if `source` contains template syntax.
pub fn is_template(source: &str) -> bool {
    source.contains("{{") || source.contains("{%") || source.contains("{#")
}

/// Renders named templates against one fixed context.
pub struct TemplateEngine {
    tera: Tera,
    context: Context,
}

impl TemplateEngine {
    /// Create an engine whose context is the serialized form of `values`,
    /// which must serialize to a map.
    pub fn new<T: Serialize>(values: &T) -> Result<Self> {
        let context = Context::from_serialize(values).map_err(|e| Error::Template {
            message: error_chain(&e),
            template: None,
        })?;

        let mut tera = Tera::default();
        // Output is source code and config files, never HTML.
        tera.autoescape_on(vec![]);

        Ok(Self { tera, context })
    }

    /// Render `source`; `name` identifies the template in error messages.
    ///
    /// Sources without template syntax are returned unchanged.
    pub fn render(&mut self, name: &str, source: &str) -> Result<String> {
        if !is_template(source) {
            return Ok(source.to_string());
        }

        let source = normalize_syntax(source);
        self.tera
            .add_raw_template(name, &source)
            .map_err(|e| template_error(name, &e))?;

        self.tera
            .render(name, &self.context)
            .map_err(|e| template_error(name, &e))
    }
}

fn template_error(name: &str, err: &tera::Error) -> Error {
    Error::Template {
        message: error_chain(err),
        template: Some(name.to_string()),
    }
}

/// tera keeps the useful part of its errors in the source chain.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
