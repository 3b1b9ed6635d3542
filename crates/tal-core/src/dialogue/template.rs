//! `{placeholder}` rendering for scripted lines.

use crate::config::BrandConfig;
use crate::field::{FieldCollector, FieldName};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::str::FromStr;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

/// Values available to scripted line templates.
///
/// Collected field names (`{name}`, `{workplace}`) resolve to collected
/// values; `{brand}`, `{brand_name}`, `{market}` and `{whatsapp_link}`
/// resolve to branding. Unknown or not yet collected placeholders are left
/// untouched.
pub struct TemplateContext<'a> {
    fields: &'a FieldCollector,
    brand: &'a BrandConfig,
}

impl<'a> TemplateContext<'a> {
    pub fn new(fields: &'a FieldCollector, brand: &'a BrandConfig) -> Self {
        Self { fields, brand }
    }

    /// Resolves a single placeholder key.
    pub fn lookup(&self, key: &str) -> Option<&'a str> {
        match key {
            "brand" => Some(self.brand.short_name.as_str()),
            "brand_name" => Some(self.brand.name.as_str()),
            "market" => Some(self.brand.market_label.as_str()),
            "whatsapp_link" => Some(self.brand.whatsapp_link.as_str()),
            _ => FieldName::from_str(key)
                .ok()
                .and_then(|field| self.fields.get(field)),
        }
    }

    pub fn render(&self, template: &str) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match self.lookup(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_fields_and_brand() {
        let mut fields = FieldCollector::new();
        fields.update(FieldName::Name, "Asha");
        let brand = BrandConfig::default();
        let ctx = TemplateContext::new(&fields, &brand);

        assert_eq!(
            ctx.render("nice to meet you, {name}! which team at {brand}?"),
            "nice to meet you, Asha! which team at Acme?"
        );
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        let fields = FieldCollector::new();
        let brand = BrandConfig::default();
        let ctx = TemplateContext::new(&fields, &brand);

        assert_eq!(ctx.render("hi {name}, {salary}"), "hi {name}, {salary}");
        assert_eq!(ctx.render("no placeholders"), "no placeholders");
    }
}
