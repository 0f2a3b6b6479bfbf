//! Shopping cart manager.
//!
//! A [`Cart`] belongs to a single shopper session. It keeps one line per
//! product in the order products were first added, and every line holds at
//! least one unit: quantities are clamped, never zeroed. Taking a product
//! out of the cart is [`Cart::remove`], not a zero quantity.

use crate::catalog::Product;
use crate::types::ProductId;

pub use crate::types::price::format_rubles;

/// One product in the cart together with its quantity.
///
/// The product is a snapshot taken when it was first added; later catalog
/// reloads do not change lines already in a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product: Product,
    quantity: u32,
}

impl CartLine {
    fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// The product ID this line is keyed by.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Units of the product in the cart, always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity, in whole roubles.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.product
            .price
            .amount()
            .saturating_mul(u64::from(self.quantity))
    }
}

/// An ordered shopping cart keyed by product ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// Bumps the quantity of an existing line, otherwise appends a new line
    /// with quantity 1. Returns the line's quantity after the add.
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(line) = self.lines.iter_mut().find(|line| line.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }

        self.lines.push(CartLine::new(product.clone()));
        1
    }

    /// Remove the line for `id`. Absent IDs are ignored.
    pub fn remove(&mut self, id: ProductId) {
        self.lines.retain(|line| line.product.id != id);
    }

    /// Set the quantity of the line for `id`, clamped to `1..=u32::MAX`.
    ///
    /// Does nothing when the cart has no line for `id`; it never creates one.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.product.id == id) {
            line.quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        }
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Total price in whole roubles.
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.lines
            .iter()
            .fold(0_u64, |sum, line| sum.saturating_add(line.line_total()))
    }

    /// Lines in the order they were added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `id`, if any.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Take the units of a placed order out of the cart.
    ///
    /// `ordered` is the snapshot the order was placed from. Each of its lines
    /// lowers the matching line here by the ordered quantity, and lines that
    /// run out are dropped. Anything added after the snapshot was taken stays
    /// in the cart. With no edits in between this empties the cart.
    pub fn settle(&mut self, ordered: &Self) {
        self.lines.retain_mut(|line| {
            let Some(placed) = ordered.get(line.product.id) else {
                return true;
            };
            line.quantity = line.quantity.saturating_sub(placed.quantity);
            line.quantity > 0
        });
    }
}
