/// Fold a free-text label into a comparable key: invisible characters stripped,
/// whitespace collapsed, lowercase, German and common Latin diacritics removed.
pub(crate) fn fold_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{00ad}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut folded = String::with_capacity(collapsed.len());
    for ch in collapsed.chars().flat_map(char::to_lowercase) {
        match ch {
            'ä' | 'á' | 'à' | 'â' | 'ã' | 'å' => folded.push('a'),
            'ö' | 'ó' | 'ò' | 'ô' | 'õ' | 'ø' => folded.push('o'),
            'ü' | 'ú' | 'ù' | 'û' => folded.push('u'),
            'é' | 'è' | 'ê' | 'ë' => folded.push('e'),
            'í' | 'ì' | 'î' | 'ï' => folded.push('i'),
            'ç' | 'č' => folded.push('c'),
            'š' => folded.push('s'),
            'ž' => folded.push('z'),
            'ß' => folded.push_str("ss"),
            other => folded.push(other),
        }
    }
    folded
}
