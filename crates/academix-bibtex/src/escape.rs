//! LaTeX escaping for BibTeX field values.
//!
//! Covers a fixed substitution table for common Latin-1
//! accented letters, the German `ß`, the `æ`/`œ` ligatures, Nordic `å`/`ø`,
//! and the LaTeX-reserved ASCII punctuation. Everything else passes through
//! unchanged.

/// Escapes a single field value for inclusion in a BibTeX entry.
pub fn escape_latex(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match accent_replacement(ch) {
            Some(replacement) => out.push_str(replacement),
            None => match ch {
                '&' => out.push_str("\\&"),
                '%' => out.push_str("\\%"),
                '$' => out.push_str("\\$"),
                '#' => out.push_str("\\#"),
                '_' => out.push_str("\\_"),
                '{' => out.push_str("\\{"),
                '}' => out.push_str("\\}"),
                '~' => out.push_str("\\~{}"),
                '^' => out.push_str("\\^{}"),
                other => out.push(other),
            },
        }
    }
    out
}

fn accent_replacement(ch: char) -> Option<&'static str> {
    Some(match ch {
        'ä' => "{\\\"a}",
        'ë' => "{\\\"e}",
        'ï' => "{\\\"i}",
        'ö' => "{\\\"o}",
        'ü' => "{\\\"u}",
        'Ä' => "{\\\"A}",
        'Ë' => "{\\\"E}",
        'Ï' => "{\\\"I}",
        'Ö' => "{\\\"O}",
        'Ü' => "{\\\"U}",
        'á' => "{\\'a}",
        'é' => "{\\'e}",
        'í' => "{\\'i}",
        'ó' => "{\\'o}",
        'ú' => "{\\'u}",
        'ý' => "{\\'y}",
        'Á' => "{\\'A}",
        'É' => "{\\'E}",
        'Í' => "{\\'I}",
        'Ó' => "{\\'O}",
        'Ú' => "{\\'U}",
        'à' => "{\\`a}",
        'è' => "{\\`e}",
        'ì' => "{\\`i}",
        'ò' => "{\\`o}",
        'ù' => "{\\`u}",
        'À' => "{\\`A}",
        'È' => "{\\`E}",
        'Ì' => "{\\`I}",
        'Ò' => "{\\`O}",
        'Ù' => "{\\`U}",
        'â' => "{\\^a}",
        'ê' => "{\\^e}",
        'î' => "{\\^i}",
        'ô' => "{\\^o}",
        'û' => "{\\^u}",
        'Â' => "{\\^A}",
        'Ê' => "{\\^E}",
        'Î' => "{\\^I}",
        'Ô' => "{\\^O}",
        'Û' => "{\\^U}",
        'ñ' => "{\\~n}",
        'Ñ' => "{\\~N}",
        'ç' => "{\\c{c}}",
        'Ç' => "{\\c{C}}",
        'ß' => "{\\ss}",
        'æ' => "{\\ae}",
        'Æ' => "{\\AE}",
        'œ' => "{\\oe}",
        'Œ' => "{\\OE}",
        'å' => "{\\aa}",
        'Å' => "{\\AA}",
        'ø' => "{\\o}",
        'Ø' => "{\\O}",
        _ => return None,
    })
}

/// Normalizes page ranges to BibTeX's `--` convention: a single hyphen or
/// em-dash becomes `--`, and runs of three or more hyphens collapse back to
/// `--`.
pub fn normalize_pages(pages: &str) -> String {
    let mut collapsed = String::with_capacity(pages.len());
    let mut run = 0usize;
    for ch in pages.chars() {
        if ch == '-' {
            run += 1;
        } else {
            flush_dash_run(&mut collapsed, run);
            run = 0;
            collapsed.push(ch);
        }
    }
    flush_dash_run(&mut collapsed, run);
    collapsed.replace('\u{2014}', "--").replace('\u{2013}', "--")
}

fn flush_dash_run(out: &mut String, run: usize) {
    match run {
        0 => {}
        1 | 2 => out.push_str("--"),
        _ => out.push_str("--"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_accented_letters() {
        assert_eq!(escape_latex("Müller"), "M{\\\"u}ller");
        assert_eq!(escape_latex("François"), "Fran{\\c{c}}ois");
        assert_eq!(escape_latex("Straße"), "Stra{\\ss}e");
        assert_eq!(escape_latex("Åse Øde"), "{\\aa}se {\\o}de");
    }

    #[test]
    fn escapes_reserved_characters() {
        assert_eq!(escape_latex("A & B"), "A \\& B");
        assert_eq!(escape_latex("100%"), "100\\%");
        assert_eq!(escape_latex("$x$"), "\\$x\\$");
        assert_eq!(escape_latex("a_b"), "a\\_b");
    }

    #[test]
    fn passes_through_plain_ascii() {
        assert_eq!(escape_latex("Hello World"), "Hello World");
    }

    #[test]
    fn normalizes_page_dashes() {
        assert_eq!(normalize_pages("12-34"), "12--34");
        assert_eq!(normalize_pages("12\u{2013}34"), "12--34");
        assert_eq!(normalize_pages("12---34"), "12--34");
        assert_eq!(normalize_pages("12----34"), "12--34");
    }
}
