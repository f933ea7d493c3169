//! Locale-aware ordering of merchant names.

use std::cmp::Ordering;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Ordering rules for text keys, picked from a BCP 47 locale tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Collation {
    /// Accents only break ties between otherwise equal names.
    #[default]
    Root,
    /// Polish letters with diacritics sort right after their base letter (`c < ć < d`).
    Polish,
}

/// One collation element: a base letter plus whatever marks were folded off it.
#[derive(Debug, PartialEq, Eq)]
struct Element {
    base: char,
    rank: u8,
    marks: Vec<char>,
}

impl Collation {
    pub fn for_locale(tag: &str) -> Self {
        let language = tag.split(['-', '_']).next().unwrap_or_default();
        if language.eq_ignore_ascii_case("pl") {
            Collation::Polish
        } else {
            Collation::Root
        }
    }

    /// Compares on letters first, then diacritics, then case (lowercase first).
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        let left = self.elements(a);
        let right = self.elements(b);
        left.iter()
            .map(|e| (e.base, e.rank))
            .cmp(right.iter().map(|e| (e.base, e.rank)))
            .then_with(|| left.iter().map(|e| &e.marks).cmp(right.iter().map(|e| &e.marks)))
            .then_with(|| case_order(a, b))
    }

    fn elements(self, text: &str) -> Vec<Element> {
        text.chars()
            .flat_map(char::to_lowercase)
            .map(|c| self.element(c))
            .collect()
    }

    fn element(self, c: char) -> Element {
        let rank = match self {
            Collation::Polish => polish_rank(c),
            Collation::Root => 0,
        };
        // Stroked letters have no canonical decomposition.
        let (base, marks) = match c {
            'ł' => ('l', vec!['\u{0335}']),
            'ø' => ('o', vec!['\u{0338}']),
            'đ' => ('d', vec!['\u{0335}']),
            _ => {
                let mut decomposed = std::iter::once(c).nfd();
                let base = decomposed.next().unwrap_or(c);
                (base, decomposed.filter(|m| is_combining_mark(*m)).collect())
            }
        };
        Element { base, rank, marks }
    }
}

fn polish_rank(c: char) -> u8 {
    match c {
        'ą' | 'ć' | 'ę' | 'ł' | 'ń' | 'ó' | 'ś' | 'ź' => 1,
        'ż' => 2,
        _ => 0,
    }
}

fn case_order(a: &str, b: &str) -> Ordering {
    a.chars()
        .zip(b.chars())
        .find(|(x, y)| x != y)
        .map(|(x, y)| y.is_lowercase().cmp(&x.is_lowercase()))
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(collation: Collation, names: &[&'static str]) -> Vec<&'static str> {
        let mut names = names.to_vec();
        names.sort_by(|a, b| collation.compare(a, b));
        names
    }

    #[test]
    fn accented_initials_sort_next_to_their_base_letter() {
        let names = ["Zoo", "Ćma", "Dom", "Éclair", "Fig"];
        let expected = vec!["Ćma", "Dom", "Éclair", "Fig", "Zoo"];
        assert_eq!(sorted(Collation::Root, &names), expected);
        assert_eq!(sorted(Collation::Polish, &names), expected);
    }

    #[test]
    fn polish_letters_are_distinct_after_their_base() {
        let names = ["Ćwiek", "Czapka", "Łódź", "Lody", "Mleko", "Żabka", "Źródło", "Zoo"];
        assert_eq!(
            sorted(Collation::Polish, &names),
            vec!["Czapka", "Ćwiek", "Lody", "Łódź", "Mleko", "Zoo", "Źródło", "Żabka"]
        );
    }

    #[test]
    fn root_treats_accents_as_a_tie_break() {
        assert_eq!(Collation::Root.compare("Ćwiek", "Czapka"), Ordering::Less);
        assert_eq!(Collation::Root.compare("cafe", "café"), Ordering::Less);
        assert_eq!(Collation::Root.compare("café", "cafes"), Ordering::Less);
    }

    #[test]
    fn case_breaks_remaining_ties_lowercase_first() {
        assert_eq!(Collation::Root.compare("a", "A"), Ordering::Less);
        assert_eq!(Collation::Polish.compare("Apteka", "apteka"), Ordering::Greater);
        assert_eq!(Collation::Root.compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn locale_tags_select_the_rules() {
        assert_eq!(Collation::for_locale("pl-PL"), Collation::Polish);
        assert_eq!(Collation::for_locale("PL"), Collation::Polish);
        assert_eq!(Collation::for_locale("en_US"), Collation::Root);
        assert_eq!(Collation::for_locale(""), Collation::Root);
    }
}
