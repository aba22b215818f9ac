use serde_json::{Map, Value};
use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};

/// Splits a cursor token on `.` and returns the field prefix when the token
/// has exactly two segments rooted at `input`.
///
/// Everything else resolves to nothing: one level of field access on the
/// single reserved root is the documented limit of this prototype, so
/// deeper paths and other roots are unsupported rather than wrong.
pub fn input_field_prefix(token: &str) -> Option<&str> {
    let segments: Vec<&str> = token.split('.').collect();
    match segments.as_slice() {
        ["input", prefix] => Some(prefix),
        _ => None,
    }
}

/// Completion candidates: every top-level snapshot key starting with
/// `prefix`, offered as a field with the key as both label and insert text.
pub fn candidates(prefix: &str, snapshot: &Map<String, Value>) -> Vec<CompletionItem> {
    snapshot
        .keys()
        .filter(|key| key.starts_with(prefix))
        .map(|key| CompletionItem {
            label: key.clone(),
            kind: Some(CompletionItemKind::FIELD),
            insert_text: Some(key.clone()),
            ..Default::default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{candidates, input_field_prefix};
    use serde_json::{json, Map, Value};
    use tower_lsp::lsp_types::CompletionItemKind;

    fn snapshot() -> Map<String, Value> {
        match json!({"region": 1, "result": 2, "other": 3}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn labels(token: &str) -> Vec<String> {
        let items = match input_field_prefix(token) {
            Some(prefix) => candidates(prefix, &snapshot()),
            None => Vec::new(),
        };
        let mut labels: Vec<String> = items.into_iter().map(|item| item.label).collect();
        labels.sort();
        labels
    }

    #[test]
    fn prefix_matches_snapshot_keys() {
        assert_eq!(labels("input.re"), ["region", "result"]);
    }

    #[test]
    fn longer_prefix_narrows_to_one_key() {
        assert_eq!(labels("input.reg"), ["region"]);
    }

    #[test]
    fn empty_prefix_matches_every_key() {
        assert_eq!(labels("input."), ["other", "region", "result"]);
    }

    #[test]
    fn items_carry_field_kind_and_matching_insert_text() {
        let items = candidates("reg", &snapshot());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, Some(CompletionItemKind::FIELD));
        assert_eq!(items[0].insert_text.as_deref(), Some("region"));
    }

    #[test]
    fn three_segments_resolve_to_nothing() {
        assert_eq!(input_field_prefix("input.a.b"), None);
    }

    #[test]
    fn bare_root_resolves_to_nothing() {
        assert_eq!(input_field_prefix("input"), None);
    }

    #[test]
    fn other_roots_resolve_to_nothing() {
        assert_eq!(input_field_prefix("data.re"), None);
        assert_eq!(input_field_prefix(".re"), None);
        assert_eq!(input_field_prefix(""), None);
    }

    #[test]
    fn no_matching_keys_yields_empty_list() {
        assert!(labels("input.zzz").is_empty());
    }

    #[test]
    fn empty_snapshot_yields_empty_list() {
        assert!(candidates("re", &Map::new()).is_empty());
    }
}
