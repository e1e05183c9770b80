//! Catalog queries over a menu snapshot
//!
//! Pure helpers for the menu screen: category tabs, per-category listing and
//! name search. They work on whatever snapshot the menu feed last delivered.

use shared::models::MenuItem;

/// Distinct categories in first-appearance order
pub fn menu_categories(menu: &[MenuItem]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for item in menu {
        if !categories.iter().any(|c| c == &item.category) {
            categories.push(item.category.clone());
        }
    }
    categories
}

pub fn items_in_category<'a>(menu: &'a [MenuItem], category: &str) -> Vec<&'a MenuItem> {
    menu.iter().filter(|item| item.category == category).collect()
}

/// Case-insensitive name search; a blank query matches nothing
pub fn search_menu<'a>(menu: &'a [MenuItem], query: &str) -> Vec<&'a MenuItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    menu.iter()
        .filter(|item| item.name.to_lowercase().contains(&query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Vec<MenuItem> {
        vec![
            MenuItem::new("1", "Ensalada César", "Ensaladas", 5000.0),
            MenuItem::new("2", "Casado de Pollo", "Platos Principales", 4500.0),
            MenuItem::new("3", "Ensalada Verde", "Ensaladas", 3500.0),
            MenuItem::new("4", "Imperial", "Cervezas", 1500.0),
        ]
    }

    #[test]
    fn test_categories_first_appearance() {
        assert_eq!(
            menu_categories(&menu()),
            vec!["Ensaladas", "Platos Principales", "Cervezas"]
        );
        assert!(menu_categories(&[]).is_empty());
    }

    #[test]
    fn test_items_in_category() {
        let menu = menu();
        let ids: Vec<_> = items_in_category(&menu, "Ensaladas")
            .into_iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(items_in_category(&menu, "Postres").is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let menu = menu();
        let ids: Vec<_> = search_menu(&menu, "ENSALADA")
            .into_iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(search_menu(&menu, "pollo").len(), 1);
    }

    #[test]
    fn test_blank_search_matches_nothing() {
        assert!(search_menu(&menu(), "   ").is_empty());
    }
}
