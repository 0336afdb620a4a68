//! Deep merge of TOML values with per-field layer tracking.
//!
//! The merge operates on raw [`toml::Value`] trees rather than
//! deserialized structs. This correctly handles "absent vs default" —
//! a missing key in a TOML table will not override the base layer.

mod deep;
mod types;

pub use deep::{deep_merge, deep_merge_tracking};
pub use types::{ConfigLayer, FieldSources};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_table_merges_recursively() {
        let mut base: toml::Value = toml::from_str("a = 1\n[b]\nc = 2\nd = 3\n").unwrap();
        let overlay: toml::Value = toml::from_str("[b]\nc = 20\n").unwrap();
        deep_merge(&mut base, &overlay);
        assert_eq!(base["a"].as_integer(), Some(1));
        assert_eq!(base["b"]["c"].as_integer(), Some(20));
        assert_eq!(base["b"]["d"].as_integer(), Some(3));
    }

    #[test]
    fn tracking_merge_records_the_layer_per_leaf() {
        let mut base: toml::Value = toml::from_str("[budget]\nsession_max_usd = 1.0\n").unwrap();
        let overlay: toml::Value = toml::from_str("[budget]\nsession_max_usd = 5.0\n").unwrap();
        let mut sources = FieldSources::new();
        deep_merge_tracking(&mut base, &overlay, "", &ConfigLayer::Project, &mut sources);
        assert_eq!(sources.get("budget.session_max_usd"), Some(&ConfigLayer::Project));
    }
}
