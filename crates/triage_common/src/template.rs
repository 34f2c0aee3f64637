//! Template expansion collaborator.
//!
//! The engine contract is deliberately small: expand a template string
//! against a set of named fields. A missing field is an error — documents
//! must never render with silent blanks where a field name was expected.

use std::collections::BTreeMap;

use crate::error::TriageError;

/// Named fields supplied to a template expansion.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    fields: BTreeMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// External templating collaborator: expands `{field}` placeholders.
pub trait TemplateEngine {
    fn expand(&self, template: &str, ctx: &TemplateContext) -> Result<String, TriageError>;
}

/// Built-in engine: straight `{field}` substitution, no conditionals, no
/// loops. Table rows and other repeated content are pre-rendered by the
/// caller and passed in as a single field.
#[derive(Debug, Default)]
pub struct SimpleTemplates;

impl TemplateEngine for SimpleTemplates {
    fn expand(&self, template: &str, ctx: &TemplateContext) -> Result<String, TriageError> {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.char_indices();
        while let Some((start, c)) = chars.next() {
            if c != '{' {
                out.push(c);
                continue;
            }
            let mut end = None;
            for (i, c2) in chars.by_ref() {
                if c2 == '}' {
                    end = Some(i);
                    break;
                }
            }
            let end = end.ok_or_else(|| {
                TriageError::Template(format!("unterminated placeholder at byte {}", start))
            })?;
            let name = &template[start + 1..end];
            let value = ctx.get(name).ok_or_else(|| {
                TriageError::Template(format!("no value for field '{}'", name))
            })?;
            out.push_str(value);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_fields() {
        let ctx = TemplateContext::new().set("name", "QU39").set("count", "7");
        let out = SimpleTemplates
            .expand("station {name} has {count} errors", &ctx)
            .unwrap();
        assert_eq!(out, "station QU39 has 7 errors");
    }

    #[test]
    fn test_missing_field_is_error() {
        let ctx = TemplateContext::new();
        let err = SimpleTemplates.expand("hello {nobody}", &ctx).unwrap_err();
        assert!(err.to_string().contains("nobody"));
    }

    #[test]
    fn test_unterminated_placeholder_is_error() {
        let ctx = TemplateContext::new();
        assert!(SimpleTemplates.expand("broken {tail", &ctx).is_err());
    }

    #[test]
    fn test_plain_text_passes_through() {
        let ctx = TemplateContext::new();
        let out = SimpleTemplates.expand("no placeholders here", &ctx).unwrap();
        assert_eq!(out, "no placeholders here");
    }
}
