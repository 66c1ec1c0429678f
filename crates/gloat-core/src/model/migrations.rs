use std::collections::HashSet;

use super::Migration;

/// An ordered sequence of migrations
///
/// The ordering key is the version, ascending. The collection is not
/// deduplicated; callers that need unique versions must ensure it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Migrations(Vec<Migration>);

impl Migrations {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Migration> {
        self.0.iter()
    }

    pub fn push(&mut self, migration: Migration) {
        self.0.push(migration);
    }

    /// Versions in collection order
    pub fn versions(&self) -> Vec<i64> {
        self.0.iter().map(|m| m.version).collect()
    }

    /// First migration carrying `version`
    pub fn find(&self, version: i64) -> Option<&Migration> {
        self.0.iter().find(|m| m.version == version)
    }

    /// Stable ascending sort by version
    pub fn sort(&mut self) {
        self.0.sort_by_key(|m| m.version);
    }

    /// The highest-version migration, or `None` when empty
    ///
    /// Version order is the only notion of "current"; when several entries
    /// share the top version the last one in collection order wins, exactly
    /// as a stable sort followed by taking the tail would.
    pub fn current(&self) -> Option<&Migration> {
        self.0.iter().max_by_key(|m| m.version)
    }

    /// Symmetric difference by version, in two passes
    ///
    /// First every migration of `self` whose version is absent from
    /// `other`, in `self`'s order; then every migration of `other` whose
    /// version is absent from `self`, in `other`'s order. The result is not
    /// re-sorted.
    pub fn except(&self, other: &Migrations) -> Migrations {
        let ours: HashSet<i64> = self.0.iter().map(|m| m.version).collect();
        let theirs: HashSet<i64> = other.0.iter().map(|m| m.version).collect();

        let left = self.0.iter().filter(|m| !theirs.contains(&m.version));
        let right = other.0.iter().filter(|m| !ours.contains(&m.version));

        left.chain(right).cloned().collect()
    }

    pub fn into_vec(self) -> Vec<Migration> {
        self.0
    }
}

impl From<Vec<Migration>> for Migrations {
    fn from(migrations: Vec<Migration>) -> Self {
        Self(migrations)
    }
}

impl FromIterator<Migration> for Migrations {
    fn from_iter<I: IntoIterator<Item = Migration>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Migrations {
    type Item = Migration;
    type IntoIter = std::vec::IntoIter<Migration>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Migrations {
    type Item = &'a Migration;
    type IntoIter = std::slice::Iter<'a, Migration>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(vs: &[i64]) -> Migrations {
        vs.iter().copied().map(Migration::with_version).collect()
    }

    #[test]
    fn test_sort_ascending() {
        let mut m = versions(&[300, 100, 200]);
        m.sort();
        assert_eq!(m.versions(), vec![100, 200, 300]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut m: Migrations = vec![
            Migration::new(2, "", "", "b"),
            Migration::new(1, "", "", "a"),
            Migration::new(2, "", "", "c"),
        ]
        .into();
        m.sort();
        let paths: Vec<_> = m.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_current_is_highest_version_regardless_of_order() {
        let m = versions(&[20170329154959, 20180101000000, 20170101000000]);
        assert_eq!(m.current().map(|m| m.version), Some(20180101000000));
    }

    #[test]
    fn test_current_of_empty_is_none() {
        assert!(Migrations::new().current().is_none());
    }

    #[test]
    fn test_current_ties_take_last() {
        let m: Migrations = vec![
            Migration::new(5, "", "", "first"),
            Migration::new(5, "", "", "second"),
        ]
        .into();
        assert_eq!(m.current().map(|m| m.path.as_str()), Some("second"));
    }

    #[test]
    fn test_except_disjoint_concatenates() {
        let a = versions(&[3, 1]);
        let b = versions(&[4, 2]);
        assert_eq!(a.except(&b).versions(), vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_except_drops_shared_versions_from_both_halves() {
        let a = versions(&[1, 2, 3]);
        let b = versions(&[2, 3, 4]);
        assert_eq!(a.except(&b).versions(), vec![1, 4]);
    }

    #[test]
    fn test_except_identical_is_empty() {
        let a = versions(&[1, 2]);
        let b = versions(&[2, 1]);
        assert!(a.except(&b).is_empty());
    }

    #[test]
    fn test_except_keeps_content_from_owning_side() {
        let a: Migrations = vec![Migration::new(1, "CREATE TABLE a", "", "1_a")].into();
        let b = versions(&[2]);
        let diff = a.except(&b);
        assert_eq!(
            diff.find(1).map(|m| m.up_sql.clone()),
            Some(b"CREATE TABLE a".to_vec())
        );
        assert_eq!(diff.find(2).map(|m| m.persistable()), Some(false));
    }
}
