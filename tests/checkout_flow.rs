//! Cart-to-order scenario driven entirely in memory: the gateway is
//! simulated through `GatewayOutcome` and order submission through a stub,
//! so this runs without a database.

use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use artisan_market_api::{
    checkout::{
        Cart, CartProduct, build_order_draft,
        payment::{GatewayOutcome, OrderSubmitter, PaymentSession, Settlement},
    },
    dto::orders::{CreateOrderRequest, OrderWithLines, ShippingInfo},
    error::AppResult,
    models::{Order, OrderLine, order_status},
};

/// Records the submitted request and fabricates the order the way the order
/// service would persist it.
struct RecordingSubmitter {
    seen: Mutex<Vec<CreateOrderRequest>>,
}

impl RecordingSubmitter {
    fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl OrderSubmitter for RecordingSubmitter {
    async fn submit(&self, request: CreateOrderRequest) -> AppResult<OrderWithLines> {
        self.seen.lock().unwrap().push(request.clone());

        let order_id = Uuid::new_v4();
        let now = Utc::now();
        let lines = request
            .lines
            .iter()
            .map(|l| OrderLine {
                id: Uuid::new_v4(),
                order_id,
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
                created_at: now,
            })
            .collect();

        Ok(OrderWithLines {
            order: Order {
                id: order_id,
                buyer_id: Uuid::new_v4(),
                seller_id: request.seller,
                total_amount: request.total,
                status: order_status::PENDING.into(),
                is_delivered: false,
                delivered_at: None,
                shipping_name: request.shipping.name,
                shipping_address: request.shipping.address,
                shipping_phone: request.shipping.phone,
                payment_reference: request.payment_reference,
                created_at: now,
            },
            lines,
        })
    }
}

fn shipping() -> ShippingInfo {
    ShippingInfo {
        name: "Asha Rao".into(),
        address: "12 Potter Lane, Jaipur".into(),
        phone: "9876543210".into(),
    }
}

fn two_item_cart(seller: Uuid) -> Cart {
    let mut cart = Cart::new();
    cart.add(
        CartProduct {
            product_id: Uuid::new_v4(),
            name: "Clay Vase".into(),
            price: 10_000,
            seller_id: Some(seller),
        },
        2,
    );
    cart.add(
        CartProduct {
            product_id: Uuid::new_v4(),
            name: "Block-print Scarf".into(),
            price: 5_000,
            seller_id: Some(seller),
        },
        1,
    );
    cart
}

#[tokio::test]
async fn gateway_success_places_pending_order_for_cart_total() {
    let seller = Uuid::new_v4();
    let mut cart = two_item_cart(seller);

    let draft = build_order_draft(&cart, &shipping()).expect("draft");
    assert_eq!(draft.total, 25_000);

    let session = PaymentSession::open(draft);
    assert_eq!(session.amount, 25_000);

    let submitter = RecordingSubmitter::new();
    let settlement = session
        .settle(
            GatewayOutcome::Captured {
                payment_id: "pay_test_1".into(),
            },
            &mut cart,
            &submitter,
        )
        .await
        .expect("settlement");

    let placed = match settlement {
        Settlement::Placed(placed) => placed,
        Settlement::Abandoned => panic!("expected a placed order"),
    };

    assert_eq!(placed.order.total_amount, 25_000);
    assert_eq!(placed.order.status, "pending");
    assert!(!placed.order.is_delivered);
    assert_eq!(placed.lines.len(), 2);
    assert!(cart.is_empty(), "cart should be cleared after placement");

    let seen = submitter.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].seller, seller);
    assert_eq!(seen[0].total, 25_000);
    assert_eq!(seen[0].payment_reference.as_deref(), Some("pay_test_1"));
}

#[tokio::test]
async fn gateway_dismissal_leaves_cart_for_retry() {
    let mut cart = two_item_cart(Uuid::new_v4());
    let draft = build_order_draft(&cart, &shipping()).expect("draft");
    let submitter = RecordingSubmitter::new();

    let settlement = PaymentSession::open(draft)
        .settle(GatewayOutcome::Dismissed, &mut cart, &submitter)
        .await
        .expect("settlement");

    assert!(matches!(settlement, Settlement::Abandoned));
    assert_eq!(cart.lines().len(), 2);
    assert!(submitter.seen.lock().unwrap().is_empty());
}
