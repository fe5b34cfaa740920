//! CSS processing for styles inlined in shadow roots.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

use crate::generator::GenerateError;

/// Parse the CSS and print it back, minified when asked.
///
/// Parsing always happens so that broken CSS is reported at generation time.
pub fn process_css(css: &str, minify: bool) -> Result<String, GenerateError> {
    let stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| GenerateError::CssError(format!("CSS parse error: {}", e)))?;

    let printed = stylesheet
        .to_css(PrinterOptions {
            minify,
            ..Default::default()
        })
        .map_err(|e| GenerateError::CssError(format!("CSS print error: {}", e)))?;

    Ok(printed.code)
}
