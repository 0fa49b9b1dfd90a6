//! Identifier casing shared by the resolver (table names) and the mapper
//! (column names).

/// Convert a type or field identifier to `snake_case`.
///
/// Word boundaries are a lower-case letter or digit followed by an upper-case
/// letter (`TestProperty` → `test_property`), and the last capital of an
/// acronym when a lower-case letter follows it (`HTTPServer` → `http_server`).
/// Spaces, dashes, dots and runs of underscores collapse to one `_`; leading
/// and trailing separators are dropped. Lower-casing uses Unicode case tables,
/// never the process locale. The transform is idempotent.
pub fn snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if is_separator(c) {
            push_break(&mut out);
            continue;
        }
        if !c.is_uppercase() {
            out.push(c);
            continue;
        }

        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();
        let boundary = match prev {
            Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
            Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
            _ => false,
        };
        if boundary {
            push_break(&mut out);
        }
        out.extend(c.to_lowercase());
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}

fn is_separator(c: char) -> bool {
    matches!(c, '_' | ' ' | '-' | '.')
}

// never at the start, never doubled
fn push_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('_') {
        out.push('_');
    }
}

// ------------------------------- Tests ------------------------------------ //
