//! City name normalization for identity matching.

/// Normalize a city name to its ASCII lowercase letters-only form.
///
/// The fold table covers the accented characters of Portuguese city
/// names; anything left that is not `a-z` after folding is removed.
/// Idempotent: a name already in normalized form passes through
/// unchanged.
pub fn normalize_city(name: &str) -> String {
    name.chars()
        .filter_map(|c| match c {
            'á' | 'à' | 'ã' | 'â' | 'Á' | 'À' | 'Ã' | 'Â' => Some('a'),
            'é' | 'ê' | 'É' | 'Ê' => Some('e'),
            'í' | 'Í' => Some('i'),
            'ó' | 'ô' | 'õ' | 'Ó' | 'Ô' | 'Õ' => Some('o'),
            'ú' | 'Ú' => Some('u'),
            'ç' | 'Ç' => Some('c'),
            c => {
                let lower = c.to_ascii_lowercase();
                lower.is_ascii_lowercase().then_some(lower)
            }
        })
        .collect()
}
