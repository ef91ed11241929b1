//! Ordre "naturel" pour les noms de listings.
//!
//! Les chaînes sont découpées en séquences maximales de chiffres ASCII et de
//! non-chiffres, puis comparées séquence par séquence :
//!
//! - deux séquences de chiffres se comparent par valeur numérique, sans jamais
//!   convertir en entier (nombre de chiffres significatifs, puis ordre des chiffres) ;
//! - deux séquences de texte se comparent sans tenir compte de la casse ;
//! - une séquence de chiffres passe avant une séquence de texte ;
//! - une chaîne qui en prolonge une autre passe après elle.
//!
//! Quand tout est égal à ces critères près, le premier départage rencontré
//! s'applique : casse (majuscules d'abord), puis nombre de zéros de tête.
//! Pour une valeur non nulle, le nombre avec le plus de zéros passe en premier
//! (`"001" < "01" < "1"`); pour une valeur nulle c'est l'inverse (`"0" < "00"`).
//! L'ordre obtenu est total et ne dépend pas de la locale.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run<'a> {
    Digits(&'a str),
    Text(&'a str),
}

/// Itérateur sur les séquences successives d'une chaîne.
struct Runs<'a> {
    rest: &'a str,
}

impl<'a> Runs<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Run<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits { Run::Digits(run) } else { Run::Text(run) })
    }
}

/// Compare deux séquences : (critère principal, départage).
fn compare_runs(a: Run<'_>, b: Run<'_>) -> (Ordering, Ordering) {
    match (a, b) {
        (Run::Digits(x), Run::Digits(y)) => {
            let sx = x.trim_start_matches('0');
            let sy = y.trim_start_matches('0');
            let primary = sx.len().cmp(&sy.len()).then_with(|| sx.cmp(sy));
            let zx = x.len() - sx.len();
            let zy = y.len() - sy.len();
            let tie = if sx.is_empty() { zx.cmp(&zy) } else { zy.cmp(&zx) };
            (primary, tie)
        }
        (Run::Text(x), Run::Text(y)) => {
            let primary = x
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(y.chars().flat_map(char::to_lowercase));
            (primary, x.cmp(y))
        }
        (Run::Digits(_), Run::Text(_)) => (Ordering::Less, Ordering::Equal),
        (Run::Text(_), Run::Digits(_)) => (Ordering::Greater, Ordering::Equal),
    }
}

/// Compare deux noms selon l'ordre naturel.
///
/// # Exemple
///
/// ```
/// use pmoutils::natural_cmp;
/// use std::cmp::Ordering;
///
/// assert_eq!(natural_cmp("file2", "file10"), Ordering::Less);
/// assert_eq!(natural_cmp("ABCD", "abcd"), Ordering::Less);
/// assert_eq!(natural_cmp("001", "1"), Ordering::Less);
/// ```
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Runs::new(a);
    let mut right = Runs::new(b);
    let mut tie = Ordering::Equal;
    loop {
        match (left.next(), right.next()) {
            (None, None) => return tie,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let (primary, secondary) = compare_runs(x, y);
                if primary != Ordering::Equal {
                    return primary;
                }
                if tie == Ordering::Equal {
                    tie = secondary;
                }
            }
        }
    }
}

/// Clé de tri utilisant l'ordre naturel (utilisable avec `sort_by_key`, `BTreeMap`...).
#[derive(Debug, Clone, Copy)]
pub struct NaturalKey<S>(pub S);

impl<S: AsRef<str>> PartialEq for NaturalKey<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S: AsRef<str>> Eq for NaturalKey<S> {}

impl<S: AsRef<str>> PartialOrd for NaturalKey<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: AsRef<str>> Ord for NaturalKey<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_cmp(self.0.as_ref(), other.0.as_ref())
    }
}

/// Trie une liste de noms selon l'ordre naturel (tri stable).
pub fn sort_natural<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_split() {
        let runs: Vec<_> = Runs::new("ab12cd003").collect();
        assert_eq!(
            runs,
            vec![
                Run::Text("ab"),
                Run::Digits("12"),
                Run::Text("cd"),
                Run::Digits("003"),
            ]
        );
    }

    #[test]
    fn test_runs_non_ascii_text() {
        let runs: Vec<_> = Runs::new("été2").collect();
        assert_eq!(runs, vec![Run::Text("été"), Run::Digits("2")]);
    }

    #[test]
    fn test_digits_before_text() {
        assert_eq!(natural_cmp("1", "a"), Ordering::Less);
        assert_eq!(natural_cmp("a", "1"), Ordering::Greater);
        assert_eq!(natural_cmp("x1", "xa"), Ordering::Less);
    }

    #[test]
    fn test_case_tie_is_deferred() {
        // la casse ne départage que si tout le reste est égal
        assert_eq!(natural_cmp("ab1", "AB2"), Ordering::Less);
        assert_eq!(natural_cmp("AB1", "ab1"), Ordering::Less);
    }

    #[test]
    fn test_reflexive() {
        for s in ["", "a", "007", "Track 10.sap"] {
            assert_eq!(natural_cmp(s, s), Ordering::Equal);
        }
    }
}
