//! Name-substring filter for list views.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

/// Anything with a display name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Items whose name contains `term`, ignoring case, in input order.
///
/// An empty term keeps every item. Case folding is Unicode lowercasing and
/// does not depend on the browser locale.
pub fn search_by_name<'a, T: Named>(items: &'a [T], term: &str) -> Vec<&'a T> {
    if term.is_empty() {
        return items.iter().collect();
    }
    let needle = term.to_lowercase();
    items.iter().filter(|item| item.name().to_lowercase().contains(&needle)).collect()
}
