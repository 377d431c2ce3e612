//! Template rendering with Tera

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Template renderer with the embedded templates
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Names ending in .html are autoescaped, results.txt is not
        tera.add_raw_templates(vec![
            ("results.txt", include_str!("../templates/results.txt")),
            ("results.html", include_str!("../templates/results.html")),
            ("index.html", include_str!("../templates/index.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with a serializable context
    pub fn render(&self, template: &str, context: &impl Serialize) -> Result<String> {
        let ctx = Context::from_serialize(context)?;
        Ok(self.tera.render(template, &ctx)?)
    }

    /// Render a template with a Tera Context
    pub fn render_with_context(&self, template: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template, context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        assert!(Templates::new().is_ok());
    }
}
