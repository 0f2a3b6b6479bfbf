//! The shop's product catalog.
//!
//! A catalog is loaded once at start-up and never mutated afterwards. Order
//! is significant: it is the order bouquets are listed in.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, ProductId};

/// A bouquet offered by the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Localized display price, e.g. `"3 500 ₽"`.
    pub price: Price,
    pub description: String,
    /// Image URI.
    pub image: String,
}

/// Errors that can occur while building a [`Catalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Product IDs must be positive.
    #[error("product id {0} must be greater than zero")]
    InvalidId(ProductId),

    /// Two products share an ID.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),

    /// The payload is not an array of product records.
    #[error("invalid catalog payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A read-only, ordered set of products keyed uniquely by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, checking that IDs are positive and unique.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidId`] or [`CatalogError::DuplicateId`].
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());

        for product in &products {
            if !product.id.is_positive() {
                return Err(CatalogError::InvalidId(product.id));
            }
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }

        Ok(Self { products })
    }

    /// Load a catalog from a JSON array of product records.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON or unparseable
    /// prices, and the [`Catalog::new`] errors for bad IDs.
    pub fn from_json(payload: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(payload)?;
        Self::new(products)
    }

    /// The bouquets the shop sells out of the box.
    #[must_use]
    pub fn builtin() -> Self {
        let products = BUILTIN
            .iter()
            .map(|&(id, name, rubles, description, image)| Product {
                id: ProductId::new(id),
                name: name.to_owned(),
                price: Price::rubles(rubles),
                description: description.to_owned(),
                image: image.to_owned(),
            })
            .collect();

        Self { products }
    }

    /// Products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterate over products in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

macro_rules! image {
    ($file:literal) => {
        concat!(
            "https://cdn.poehali.dev/projects/f7049b18-27af-4ead-aa20-e9872e615524/files/",
            $file
        )
    };
}

/// `(id, name, price in roubles, description, image)`
const BUILTIN: [(i32, &str, u64, &str, &str); 6] = [
    (
        1,
        "Spring Garden",
        3500,
        "A delicate arrangement of roses, peonies and eucalyptus",
        image!("f277be47-af36-4de4-ad4b-0ec43600df35.jpg"),
    ),
    (
        2,
        "Romance",
        4200,
        "A classic bouquet of white and pink roses",
        image!("5c47d999-c009-470c-8e5c-7f51e94c2aff.jpg"),
    ),
    (
        3,
        "Sunny Day",
        2800,
        "A bright mix of sunflowers and chrysanthemums",
        image!("24db027f-e620-42fd-a5ce-43ff143b9302.jpg"),
    ),
    (
        4,
        "Lavender Dream",
        3900,
        "A refined composition of lavender and roses",
        image!("f277be47-af36-4de4-ad4b-0ec43600df35.jpg"),
    ),
    (
        5,
        "Tropics",
        5500,
        "An exotic bouquet of orchids and anthuriums",
        image!("5c47d999-c009-470c-8e5c-7f51e94c2aff.jpg"),
    ),
    (
        6,
        "Tenderness",
        3200,
        "A pastel composition of eustoma and freesia",
        image!("f277be47-af36-4de4-ad4b-0ec43600df35.jpg"),
    ),
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i32, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Bouquet {id}"),
            price: Price::parse(price).unwrap(),
            description: String::new(),
            image: String::new(),
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 6);

        let amounts: Vec<u64> = catalog.iter().map(|p| p.price.amount()).collect();
        assert_eq!(amounts, [3500, 4200, 2800, 3900, 5500, 3200]);

        let ids: Vec<i32> = catalog.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5, 6]);

        let shown: Vec<&str> = catalog.iter().map(|p| p.price.display()).collect();
        assert_eq!(
            shown,
            ["3 500 ₽", "4 200 ₽", "2 800 ₽", "3 900 ₽", "5 500 ₽", "3 200 ₽"]
        );
    }

    #[test]
    fn test_builtin_passes_validation() {
        let catalog = Catalog::builtin();
        assert!(Catalog::new(catalog.products().to_vec()).is_ok());
    }

    #[test]
    fn test_get() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.get(ProductId::new(3)).unwrap().name, "Sunny Day");
        assert!(catalog.get(ProductId::new(42)).is_none());
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let result = Catalog::new(vec![product(1, "100 ₽"), product(1, "200 ₽")]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id.as_i32() == 1));
    }

    #[test]
    fn test_new_rejects_non_positive_ids() {
        let result = Catalog::new(vec![product(0, "100 ₽")]);
        assert!(matches!(result, Err(CatalogError::InvalidId(_))));
    }

    #[test]
    fn test_from_json() {
        let payload = r#"[
            {"id": 7, "name": "Peonies", "price": "6 100 ₽", "description": "Pink peonies", "image": "https://example.com/p.jpg"},
            {"id": 8, "name": "Tulips", "price": "1 900 ₽", "description": "Spring tulips", "image": "https://example.com/t.jpg"}
        ]"#;

        let catalog = Catalog::from_json(payload).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(ProductId::new(7)).unwrap().price.amount(), 6100);
        assert_eq!(catalog.products().get(1).unwrap().name, "Tulips");
    }

    #[test]
    fn test_from_json_rejects_price_without_digits() {
        let payload = r#"[{"id": 1, "name": "Mystery", "price": "ask us", "description": "", "image": ""}]"#;
        assert!(matches!(Catalog::from_json(payload), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_serializes_as_array() {
        let catalog = Catalog::new(vec![product(1, "100 ₽")]).unwrap();
        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["price"], "100 ₽");
    }
}
