//! Restaurant search filters.

use super::restaurant::Restaurant;

/// Case-insensitive partial-match filter over restaurant records.
///
/// Each supplied term must appear somewhere in its field, ignoring case.
/// Terms are literal text; `%`, `_`, `.` and similar characters only match
/// themselves. Blank terms are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    name: Option<String>,
    cuisine: Option<String>,
    user: Option<String>,
}

impl SearchFilter {
    /// Build a filter, discarding blank terms.
    #[must_use]
    pub fn new(name: Option<&str>, cuisine: Option<&str>, user: Option<&str>) -> Self {
        Self {
            name: normalize(name),
            cuisine: normalize(cuisine),
            user: normalize(user),
        }
    }

    /// Term matched against the restaurant name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Term matched against the cuisine.
    #[must_use]
    pub fn cuisine(&self) -> Option<&str> {
        self.cuisine.as_deref()
    }

    /// Term matched against the owning username.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Whether no term was supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.cuisine.is_none() && self.user.is_none()
    }

    /// Whether a record satisfies every supplied term.
    #[must_use]
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        contains_ignore_case(&restaurant.restaurant_name, self.name())
            && contains_ignore_case(&restaurant.cuisine, self.cuisine())
            && contains_ignore_case(&restaurant.username, self.user())
    }
}

fn normalize(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::id::RecordId;
    use crate::types::restaurant::RestaurantEntry;

    fn restaurant(name: &str, cuisine: &str, user: &str) -> Restaurant {
        Restaurant::from_entry(
            RecordId::generate(),
            RestaurantEntry {
                username: user.to_string(),
                restaurant_name: name.to_string(),
                cuisine: cuisine.to_string(),
                location: String::new(),
                review: String::new(),
            },
        )
    }

    #[test]
    fn test_blank_terms_are_absent() {
        let filter = SearchFilter::new(Some(""), Some("   "), None);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_name_is_case_insensitive_substring() {
        let filter = SearchFilter::new(Some("Taco"), None, None);
        assert!(filter.matches(&restaurant("Super TACO Shack", "Mexican", "alice")));
        assert!(filter.matches(&restaurant("tacoria", "Mexican", "alice")));
        assert!(!filter.matches(&restaurant("Burrito Barn", "Mexican", "alice")));
    }

    #[test]
    fn test_fields_are_combined_with_and() {
        let filter = SearchFilter::new(Some("pho"), Some("viet"), Some("bob"));
        assert!(filter.matches(&restaurant("Pho 99", "Vietnamese", "bobby")));
        assert!(!filter.matches(&restaurant("Pho 99", "Vietnamese", "alice")));
        assert!(!filter.matches(&restaurant("Pho 99", "Thai", "bob")));
    }

    #[test]
    fn test_terms_are_literal() {
        let filter = SearchFilter::new(Some("a.c"), None, None);
        assert!(!filter.matches(&restaurant("abc", "", "")));
        assert!(filter.matches(&restaurant("Ristorante a.c", "", "")));
    }

    #[test]
    fn test_terms_are_trimmed() {
        let filter = SearchFilter::new(None, Some("  thai "), None);
        assert_eq!(filter.cuisine(), Some("thai"));
    }
}
