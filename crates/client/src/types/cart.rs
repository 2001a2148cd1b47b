//! Cart types.

use emarket_core::{CartItemId, Price, ProductId};
use serde::{Deserialize, Serialize};

use super::product::Product;

/// Image the cart service substitutes when none is given.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.png";

/// One row of the server-held cart.
///
/// `id` is the row identity used for update/remove; `product_id` is the
/// catalog reference, sent back by the cart service as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: String,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
}

impl CartItem {
    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }

    /// The catalog id, if the string reference is numeric.
    #[must_use]
    pub fn catalog_id(&self) -> Option<ProductId> {
        self.product_id.parse().ok()
    }
}

/// Product details copied into a new cart row.
///
/// The cart service doesn't look products up; it stores whatever the client
/// sends.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartProduct {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub image: Option<String>,
}

impl From<&Product> for CartProduct {
    fn from(product: &Product) -> Self {
        Self {
            name: Some(product.name.clone()),
            price: Some(product.price),
            image: product.primary_image().map(str::to_owned),
        }
    }
}

/// Body of `POST /cart`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddToCart {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Price,
    pub name: String,
    pub image: String,
}

impl AddToCart {
    /// Build the request body, filling the same defaults the storefront used.
    #[must_use]
    pub fn new(product_id: ProductId, quantity: u32, product: &CartProduct) -> Self {
        Self {
            product_id,
            quantity,
            price: product.price.unwrap_or(Price::ZERO),
            name: product
                .name
                .clone()
                .unwrap_or_else(|| "Product".to_string()),
            image: product
                .image
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_to_cart_defaults() {
        let body = AddToCart::new(ProductId::new(9), 2, &CartProduct::default());
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["product_id"], 9);
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["name"], "Product");
        assert_eq!(json["image"], PLACEHOLDER_IMAGE);
        assert_eq!(json["price"].as_f64(), Some(0.0));
    }

    #[test]
    fn test_cart_item_from_backend_json() {
        let item: CartItem = serde_json::from_value(serde_json::json!({
            "id": "cart-1f2e",
            "product_id": "12",
            "quantity": 3,
            "price": 45000.0,
            "name": "Socks",
            "image": "/placeholder.png"
        }))
        .unwrap();

        assert_eq!(item.catalog_id(), Some(ProductId::new(12)));
        assert_eq!(item.line_total(), Price::from_units(135_000));
    }
}
