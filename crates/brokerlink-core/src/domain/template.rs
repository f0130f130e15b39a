use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateName(String);

impl TemplateName {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let normalized = normalize_template_name(raw)?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub name: TemplateName,
    pub text: String,
}

/// Named message texts, keyed by normalized template name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCatalog {
    templates: BTreeMap<TemplateName, String>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a template, returning the text it replaced.
    pub fn insert(&mut self, name: TemplateName, text: impl Into<String>) -> Option<String> {
        self.templates.insert(name, text.into())
    }

    pub fn get(&self, name: &str) -> Result<MessageTemplate, CoreError> {
        let key = TemplateName::new(name)
            .map_err(|_| CoreError::UnknownTemplate(name.trim().to_string()))?;
        match self.templates.get(&key) {
            Some(text) => Ok(MessageTemplate {
                name: key,
                text: text.clone(),
            }),
            None => Err(CoreError::UnknownTemplate(key.0)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    pub fn names(&self) -> impl Iterator<Item = &TemplateName> {
        self.templates.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TemplateName, &str)> {
        self.templates
            .iter()
            .map(|(name, text)| (name, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

pub fn normalize_template_name(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidTemplateName);
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut prev_dash = false;
    for ch in trimmed.chars() {
        let mapped = if ch.is_whitespace() { '-' } else { ch };
        if mapped == '-' {
            if prev_dash {
                continue;
            }
            prev_dash = true;
        } else {
            prev_dash = false;
        }
        out.extend(mapped.to_lowercase());
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{normalize_template_name, TemplateCatalog, TemplateName};
    use crate::error::CoreError;

    #[test]
    fn normalize_template_name_lowercases_and_dashes() {
        assert_eq!(normalize_template_name(" Cine ").unwrap(), "cine");
        assert_eq!(
            normalize_template_name("Open   House").unwrap(),
            "open-house"
        );
    }

    #[test]
    fn normalize_template_name_rejects_empty() {
        assert_eq!(
            normalize_template_name("   "),
            Err(CoreError::InvalidTemplateName)
        );
    }

    #[test]
    fn catalog_lookup_ignores_case() {
        let mut catalog = TemplateCatalog::new();
        catalog.insert(TemplateName::new("vero").unwrap(), "Hey");
        let template = catalog.get("VERO").unwrap();
        assert_eq!(template.name.as_str(), "vero");
        assert_eq!(template.text, "Hey");
    }

    #[test]
    fn catalog_lookup_reports_unknown() {
        let catalog = TemplateCatalog::new();
        assert_eq!(
            catalog.get("Nope"),
            Err(CoreError::UnknownTemplate("nope".to_string()))
        );
        assert_eq!(
            catalog.get(" "),
            Err(CoreError::UnknownTemplate(String::new()))
        );
    }

    #[test]
    fn catalog_insert_replaces_existing_text() {
        let mut catalog = TemplateCatalog::new();
        let name = TemplateName::new("cine").unwrap();
        assert_eq!(catalog.insert(name.clone(), "one"), None);
        assert_eq!(catalog.insert(name, "two"), Some("one".to_string()));
        assert_eq!(catalog.len(), 1);
    }
}
