//! Search page rendering.
//!
//! The page is a static HTML template with two placeholders, filled with
//! the brand and model lists as JSON. The JSON lands inside
//! `<script type="application/json">` blocks, so every `<` is written as
//! `\u003c` to keep names like `</script>` from closing the block.

use carfinder_types::{Brand, Model};
use serde::Serialize;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Renders the search page.
///
/// # Errors
///
/// Returns a `serde_json::Error` if a list cannot be serialised.
pub fn render_index(brands: &[Brand], models: &[Model]) -> Result<String, serde_json::Error> {
    let brands_json = script_json(brands)?;
    let models_json = script_json(models)?;

    Ok(fill(
        INDEX_TEMPLATE,
        &[("brands_json", &brands_json), ("models_json", &models_json)],
    ))
}

fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

/// Replaces `{{key}}` placeholders in a single pass. Inserted values are
/// never rescanned; unknown placeholders are kept as-is.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = after[..end].trim();
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}
