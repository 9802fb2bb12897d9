//! Menu Item Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound on a menu item's unit price
pub const MAX_MENU_PRICE: f64 = 1_000_000.0;

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItemCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub category_id: String,
    #[validate(range(min = 0.0, max = 1_000_000.0, message = "price must be between 0 and 1000000"))]
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_visible: Option<bool>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1_000_000.0, message = "price must be between 0 and 1000000"))]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl MenuItemUpdate {
    /// True when only the visibility flag is set
    pub fn is_visibility_only(&self) -> bool {
        self.name.is_none()
            && self.category_id.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(price: f64) -> MenuItemCreate {
        MenuItemCreate {
            name: "Pad Thai".into(),
            category_id: "category:mains".into(),
            price,
            description: None,
            image: None,
            is_visible: None,
        }
    }

    #[test]
    fn price_is_bounded() {
        assert!(create(0.0).validate().is_ok());
        assert!(create(MAX_MENU_PRICE).validate().is_ok());
        assert!(create(-0.5).validate().is_err());
        assert!(create(1e25).validate().is_err());

        let update = MenuItemUpdate {
            price: Some(MAX_MENU_PRICE + 1.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
