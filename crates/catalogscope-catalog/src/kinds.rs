use catalogscope_types::{KindMap, kind_key};

/// Build the kind options offered to the user.
///
/// Kinds outside `allowed_kinds` (when given) are dropped. The selected kind
/// is always offered, even when the catalog does not know it yet, so a kind
/// typed into the location still shows up; a catalog label takes precedence
/// over the selection's own spelling.
pub fn filter_kinds(
    all_kinds: &KindMap,
    allowed_kinds: Option<&[String]>,
    selected_kind: Option<&str>,
) -> KindMap {
    let mut options: KindMap = match allowed_kinds {
        Some(allowed) => {
            let allowed: Vec<String> = allowed.iter().map(|k| kind_key(k)).collect();
            all_kinds
                .iter()
                .filter(|(key, _)| allowed.contains(&kind_key(key)))
                .map(|(key, label)| (key.clone(), label.clone()))
                .collect()
        }
        None => all_kinds.clone(),
    };

    if let Some(selected) = selected_kind.filter(|s| !s.is_empty()) {
        let key = kind_key(selected);
        let label = all_kinds
            .get(&key)
            .cloned()
            .unwrap_or_else(|| selected.to_string());
        options.entry(key).or_insert(label);
    }

    options
}
