//! Ordering of directory listings

use crate::ArchivePath;
use pmoutils::natural_cmp;

/// Builds the children of `parent` named `names`, in natural order of their names.
///
/// Empty names are skipped.
pub fn sorted_children<I, S>(parent: &ArchivePath, names: I) -> Vec<ArchivePath>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut children: Vec<ArchivePath> = names
        .into_iter()
        .filter(|name| !name.as_ref().is_empty())
        .map(|name| parent.child(name.as_ref()))
        .collect();
    children.sort_by(|a, b| natural_cmp(a.name(), b.name()));
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Archive;

    #[test]
    fn test_sorted_children() {
        let parent = ArchivePath::create(Archive::Asma).child("Games");
        let children = sorted_children(&parent, ["Tune10.sap", "tune2.sap", "", "Tune1.sap"]);
        let names: Vec<&str> = children.iter().map(ArchivePath::name).collect();
        assert_eq!(names, ["Tune1.sap", "tune2.sap", "Tune10.sap"]);
        assert!(children.iter().all(|c| c.parent().as_ref() == Some(&parent)));
    }
}
