use std::collections::HashSet;

/// The local organization's handles.
///
/// Membership is case-insensitive: handles are stored lowercased and
/// lookups lowercase the candidate. The configured order is kept so the
/// upstream can be asked for exactly these handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl Roster {
    pub fn new<I, S>(handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut members = HashSet::new();
        for handle in handles {
            let normalized = handle.as_ref().trim().to_lowercase();
            if normalized.is_empty() {
                continue;
            }
            if members.insert(normalized.clone()) {
                ordered.push(normalized);
            }
        }
        Self { ordered, members }
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.members.contains(&handle.to_lowercase())
    }

    pub fn handles(&self) -> &[String] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
