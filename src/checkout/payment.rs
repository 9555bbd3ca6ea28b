//! Payment step: a thin model of the external gateway round trip. The
//! gateway itself is opaque; only its terminal outcomes are represented.
//! Payment is confirmed before order submission, so a submission failure
//! leaves a captured payment with no order and no compensation is attempted.

use crate::{
    db::DbPool,
    dto::orders::{CreateOrderRequest, OrderLineInput, OrderWithLines},
    error::AppResult,
    middleware::auth::AuthUser,
    services::order_service,
};

use super::{Cart, OrderDraft};

/// Billing fields prefilled into the gateway dialog.
#[derive(Debug, Clone)]
pub struct BillingPrefill {
    pub name: String,
    pub contact: String,
}

/// Terminal result reported by the gateway.
#[derive(Debug, Clone)]
pub enum GatewayOutcome {
    Captured { payment_id: String },
    Dismissed,
}

#[derive(Debug)]
pub enum Settlement {
    Placed(OrderWithLines),
    Abandoned,
}

/// Seam between the payment step and the order service, so the settle path
/// can be exercised without a database.
pub trait OrderSubmitter {
    async fn submit(&self, request: CreateOrderRequest) -> AppResult<OrderWithLines>;
}

/// Submits captured payments straight to the order service.
pub struct PgOrderSubmitter<'a> {
    pub pool: &'a DbPool,
    pub user: &'a AuthUser,
}

impl OrderSubmitter for PgOrderSubmitter<'_> {
    async fn submit(&self, request: CreateOrderRequest) -> AppResult<OrderWithLines> {
        order_service::create(self.pool, self.user, request).await
    }
}

#[derive(Debug, Clone)]
pub struct PaymentSession {
    /// Amount in minor currency units, as the gateway expects.
    pub amount: i64,
    pub currency: &'static str,
    pub prefill: BillingPrefill,
    pub note_address: String,
    draft: OrderDraft,
}

impl PaymentSession {
    pub fn open(draft: OrderDraft) -> Self {
        Self {
            amount: draft.total,
            currency: "INR",
            prefill: BillingPrefill {
                name: draft.shipping.name.clone(),
                contact: draft.shipping.phone.clone(),
            },
            note_address: draft.shipping.address.clone(),
            draft,
        }
    }

    /// Resolves the session once the gateway reports back. A captured
    /// payment submits the order and clears the cart on success; any
    /// submission error propagates with the cart left intact so the buyer
    /// can retry. A dismissed dialog creates nothing.
    pub async fn settle<S: OrderSubmitter>(
        self,
        outcome: GatewayOutcome,
        cart: &mut Cart,
        submitter: &S,
    ) -> AppResult<Settlement> {
        match outcome {
            GatewayOutcome::Captured { payment_id } => {
                let request = self.into_request(payment_id);
                let placed = submitter.submit(request).await?;
                cart.clear();
                Ok(Settlement::Placed(placed))
            }
            GatewayOutcome::Dismissed => Ok(Settlement::Abandoned),
        }
    }

    fn into_request(self, payment_id: String) -> CreateOrderRequest {
        CreateOrderRequest {
            lines: self
                .draft
                .lines
                .iter()
                .map(|l| OrderLineInput {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect(),
            total: self.draft.total,
            seller: self.draft.seller_id,
            shipping: self.draft.shipping,
            payment_reference: Some(payment_id),
        }
    }
}
