use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A menu item as stored in the catalog. The price here is the current
/// menu price; orders snapshot their own unit prices, so editing or
/// deleting an item never changes a placed order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MenuItem {
    #[schema(example = 1)]
    pub id: i32,
    pub restaurant_id: i32,
    #[schema(example = "Margherita")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "12.50")]
    pub price: Decimal,
    #[schema(example = "Pizza")]
    pub category: String,
    pub image_url: Option<String>,
    pub available: bool,
    pub featured: bool,
}

/// Request DTO for creating a menu item
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMenuItem {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "crate::validation::validate_positive_price")]
    pub price: Decimal,
    #[validate(length(min = 1, message = "Category must not be empty"))]
    pub category: String,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub featured: bool,
}

fn default_true() -> bool {
    true
}

/// Request DTO for partial menu-item updates. Only supplied fields
/// change; each field is applied explicitly.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMenuItem {
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "crate::validation::validate_optional_positive_price")]
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub available: Option<bool>,
    pub featured: Option<bool>,
}

impl UpdateMenuItem {
    /// Apply this patch to an existing item, field by field.
    pub fn apply_to(self, mut item: MenuItem) -> MenuItem {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(description) = self.description {
            item.description = Some(description);
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(image_url) = self.image_url {
            item.image_url = Some(image_url);
        }
        if let Some(available) = self.available {
            item.available = available;
        }
        if let Some(featured) = self.featured {
            item.featured = featured;
        }
        item
    }
}

/// One category of the public menu
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryGroup {
    pub name: String,
    pub items: Vec<MenuItem>,
}

/// Public menu response, grouped by category
#[derive(Debug, Serialize, ToSchema)]
pub struct MenuResponse {
    pub categories: Vec<CategoryGroup>,
}

/// Featured-items response
#[derive(Debug, Serialize, ToSchema)]
pub struct FeaturedResponse {
    pub featured_items: Vec<MenuItem>,
}

/// Group items into categories, preserving the incoming order
/// (items arrive sorted by category then name).
pub fn group_by_category(items: Vec<MenuItem>) -> Vec<CategoryGroup> {
    let mut categories: Vec<CategoryGroup> = Vec::new();
    for item in items {
        match categories.last_mut() {
            Some(group) if group.name == item.category => group.items.push(item),
            _ => categories.push(CategoryGroup {
                name: item.category.clone(),
                items: vec![item],
            }),
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(id: i32, name: &str, category: &str) -> MenuItem {
        MenuItem {
            id,
            restaurant_id: 1,
            name: name.to_string(),
            description: None,
            price: dec!(5.00),
            category: category.to_string(),
            image_url: None,
            available: true,
            featured: false,
        }
    }

    #[test]
    fn test_group_by_category_preserves_order() {
        let items = vec![
            item(1, "Espresso", "Drinks"),
            item(2, "Latte", "Drinks"),
            item(3, "Margherita", "Pizza"),
        ];
        let groups = group_by_category(items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Drinks");
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[1].name, "Pizza");
        assert_eq!(groups[1].items.len(), 1);
    }

    #[test]
    fn test_group_by_category_empty() {
        assert!(group_by_category(vec![]).is_empty());
    }

    #[test]
    fn test_update_applies_only_supplied_fields() {
        let original = item(1, "Espresso", "Drinks");
        let patch = UpdateMenuItem {
            price: Some(dec!(3.75)),
            available: Some(false),
            ..Default::default()
        };
        let updated = patch.apply_to(original);
        assert_eq!(updated.name, "Espresso");
        assert_eq!(updated.category, "Drinks");
        assert_eq!(updated.price, dec!(3.75));
        assert!(!updated.available);
    }

    #[test]
    fn test_empty_update_is_identity() {
        let original = item(1, "Espresso", "Drinks");
        let updated = UpdateMenuItem::default().apply_to(original.clone());
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.price, original.price);
        assert_eq!(updated.available, original.available);
    }

    #[test]
    fn test_create_menu_item_validation() {
        let valid = CreateMenuItem {
            name: "Tiramisu".to_string(),
            description: None,
            price: dec!(6.00),
            category: "Dessert".to_string(),
            image_url: None,
            available: true,
            featured: false,
        };
        assert!(valid.validate().is_ok());

        let bad_price = CreateMenuItem {
            price: dec!(0.00),
            ..valid.clone()
        };
        assert!(bad_price.validate().is_err());

        let empty_name = CreateMenuItem {
            name: String::new(),
            ..valid
        };
        assert!(empty_name.validate().is_err());
    }
}
