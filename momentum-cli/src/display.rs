use serde::Serialize;
use std::fmt::Debug;

/// Serialized name of a tag enum, e.g. "droplet" or "slate".
pub fn tag_label<T: Serialize + Debug>(tag: T) -> String {
    match serde_json::to_value(&tag) {
        Ok(serde_json::Value::String(s)) => s,
        _ => format!("{tag:?}"),
    }
}

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// "62%" style progress.
pub fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use momentum_core::{ColorTag, IconTag};

    #[test]
    fn labels_use_serde_names() {
        assert_eq!(tag_label(IconTag::Droplet), "droplet");
        assert_eq!(tag_label(ColorTag::Slate), "slate");
    }

    #[test]
    fn short_ids() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn percents() {
        assert_eq!(percent(0.5), "50%");
        assert_eq!(percent(0.0), "0%");
    }
}
