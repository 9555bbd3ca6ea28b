//! Client-orchestrated checkout: turns a cart plus shipping details into an
//! order draft ready for the payment step. Pure transformation, no I/O; the
//! cart and session are explicit values, never ambient state.

pub mod payment;

use thiserror::Error;
use uuid::Uuid;

use crate::dto::orders::ShippingInfo;

/// Catalog fields the cart needs to carry for checkout. `seller_id` is
/// optional because a stale cart entry may predate seller resolution.
#[derive(Debug, Clone)]
pub struct CartProduct {
    pub product_id: Uuid,
    pub name: String,
    /// Price in minor currency units (paise).
    pub price: i64,
    pub seller_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CartLine {
    pub product: CartProduct,
    pub quantity: i32,
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: CartProduct, quantity: i32) {
        self.lines.push(CartLine { product, quantity });
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total(&self) -> i64 {
        self.lines
            .iter()
            .map(|l| l.product.price * l.quantity as i64)
            .sum()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Please fill in all shipping details")]
    MissingShippingDetails,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Seller information missing for the products")]
    SellerMissing,
}

#[derive(Debug, Clone)]
pub struct DraftLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub subtotal: i64,
}

/// Pending order intent handed to the payment step.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub lines: Vec<DraftLine>,
    pub total: i64,
    pub seller_id: Uuid,
    pub shipping: ShippingInfo,
}

/// Validates shipping details and the cart, then computes line subtotals and
/// the order total. The seller is taken from the first cart line; the
/// remaining lines are assumed to share it and are not cross-checked.
pub fn build_order_draft(cart: &Cart, shipping: &ShippingInfo) -> Result<OrderDraft, CheckoutError> {
    if shipping.name.trim().is_empty()
        || shipping.address.trim().is_empty()
        || shipping.phone.trim().is_empty()
    {
        return Err(CheckoutError::MissingShippingDetails);
    }

    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let seller_id = cart.lines()[0]
        .product
        .seller_id
        .ok_or(CheckoutError::SellerMissing)?;

    let lines: Vec<DraftLine> = cart
        .lines()
        .iter()
        .map(|l| DraftLine {
            product_id: l.product.product_id,
            quantity: l.quantity,
            unit_price: l.product.price,
            subtotal: l.product.price * l.quantity as i64,
        })
        .collect();

    let total = lines.iter().map(|l| l.subtotal).sum();

    Ok(OrderDraft {
        lines,
        total,
        seller_id,
        shipping: shipping.clone(),
    })
}
