use crate::engine::config::Normalization;

pub fn tokenize(text: &str, normalization: &Normalization) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());

    for c in text.chars() {
        if normalization.fold_case {
            for lower in c.to_lowercase() {
                keep(lower, normalization, &mut out);
            }
        } else {
            keep(c, normalization, &mut out);
        }
    }

    out
}

fn keep(c: char, normalization: &Normalization, out: &mut Vec<char>) {
    if normalization.letters_only && !c.is_ascii_alphabetic() {
        return;
    }
    out.push(c);
}
