use scraper::ElementRef;

use crate::record::PLACEHOLDER;

pub fn extract_text(node: ElementRef) -> String {
    node.text().collect::<String>()
}

/// Trimmed cell text, or the placeholder when the cell is missing.
pub fn text_or_placeholder(text: Option<String>) -> String {
    match text {
        Some(text) => text.trim().to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_joins_nested_nodes() {
        let html = scraper::Html::parse_fragment("<div> CPI <span>m/m</span> </div>");
        let selector = scraper::Selector::parse("div").unwrap();
        let div = html.select(&selector).next().unwrap();
        assert_eq!(extract_text(div), " CPI m/m ");
    }

    #[test]
    fn missing_text_becomes_placeholder() {
        assert_eq!(text_or_placeholder(None), "N/A");
        assert_eq!(text_or_placeholder(Some("  0.3%\n".into())), "0.3%");
        assert_eq!(text_or_placeholder(Some("   ".into())), "");
    }
}
