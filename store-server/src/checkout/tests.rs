//! Checkout workflow tests over an in-memory database

use super::*;
use crate::db::DbService;
use crate::db::models::{PaymentStatus, ProductCreate, ProductPrice};
use crate::db::repository::ProductRepository;
use crate::payment::sign_payment;

const GATEWAY_SECRET: &str = "test_gateway_secret";
const USER: &str = "user:alice";

async fn create_test_service() -> CheckoutService {
    let db_service = DbService::new_in_memory().await.unwrap();
    let gateway = PaymentGateway::new(
        "http://localhost:1".to_string(),
        "test_key".to_string(),
        GATEWAY_SECRET.to_string(),
    );
    CheckoutService::new(db_service.db, gateway, 100.0, "INR".to_string())
}

async fn seed_product(service: &CheckoutService, sku: &str, name: &str, price: f64) -> String {
    let repo = ProductRepository::new(service.db.clone());
    let product = repo
        .create(ProductCreate {
            sku: sku.to_string(),
            name: name.to_string(),
            description: None,
            categories: None,
            price: ProductPrice {
                amount: price,
                currency: "INR".to_string(),
            },
            inventory: None,
            images: None,
            tags: None,
        })
        .await
        .unwrap();
    product.id.unwrap().to_string()
}

/// Build a cart for USER with the given (product_id, name, price, quantity) lines
async fn build_cart(service: &CheckoutService, lines: &[(&str, &str, f64, i32)]) -> Cart {
    let repo = CartRepository::new(service.db.clone());
    let mut cart = repo.get_or_create(USER).await.unwrap();
    for (product_id, name, price, quantity) in lines {
        cart.add_item(
            crate::db::repository::make_record_id("product", product_id),
            name,
            *price,
            *quantity,
        );
    }
    repo.save(&cart).await.unwrap()
}

fn checkout_request(mobile: &str, delivery_option: Option<&str>) -> CheckoutRequest {
    CheckoutRequest {
        shipping_address: "12 MG Road, Bengaluru".to_string(),
        billing_address: None,
        delivery_option: delivery_option.map(String::from),
        mobile_number: mobile.to_string(),
    }
}

#[tokio::test]
async fn test_direct_order_snapshots_cart_and_clears_it() {
    let service = create_test_service().await;
    let a = seed_product(&service, "W001", "Wardrobe", 100.0).await;
    let b = seed_product(&service, "S001", "Shelf", 50.0).await;

    let mut cart = build_cart(
        &service,
        &[(&a, "Wardrobe", 100.0, 2), (&b, "Shelf", 50.0, 1)],
    )
    .await;
    cart.apply_discount(30.0);
    CartRepository::new(service.db.clone())
        .save(&cart)
        .await
        .unwrap();

    let order = service
        .place_direct_order(USER, checkout_request("9123456789", None))
        .await
        .unwrap();

    assert_eq!(order.items.len(), 2);
    assert_eq!(order.subtotal, 250.0);
    assert_eq!(order.discount, 30.0);
    assert_eq!(order.total, 220.0);
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    // Cart emptied and zeroed
    let cart = CartRepository::new(service.db.clone())
        .find_by_user(USER)
        .await
        .unwrap()
        .unwrap();
    assert!(cart.items.is_empty());
    assert_eq!(cart.subtotal, 0.0);
    assert_eq!(cart.total, 0.0);
}

#[tokio::test]
async fn test_checkout_rejects_invalid_mobile_number() {
    let service = create_test_service().await;
    let a = seed_product(&service, "W001", "Wardrobe", 100.0).await;
    build_cart(&service, &[(&a, "Wardrobe", 100.0, 1)]).await;

    // Leading digit 5 fails validation
    let err = service
        .place_direct_order(USER, checkout_request("5123456789", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Cart untouched
    let cart = CartRepository::new(service.db.clone())
        .find_by_user(USER)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cart.items.len(), 1);
}

#[tokio::test]
async fn test_checkout_rejects_empty_cart() {
    let service = create_test_service().await;
    CartRepository::new(service.db.clone())
        .get_or_create(USER)
        .await
        .unwrap();

    let err = service
        .place_direct_order(USER, checkout_request("9123456789", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    // No order was created
    let orders = OrderRepository::new(service.db.clone())
        .find_by_user(USER)
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_delivery_fee_only_for_express() {
    let service = create_test_service().await;
    assert_eq!(service.delivery_fee(Some(DELIVERY_EXPRESS)), 100.0);
    assert_eq!(service.delivery_fee(Some("standard")), 0.0);
    assert_eq!(service.delivery_fee(None), 0.0);

    // Spec scenario: cart total 220 + express fee = 320 -> 32000 paise
    let total = money::add(220.0, service.delivery_fee(Some(DELIVERY_EXPRESS)));
    assert_eq!(total, 320.0);
    assert_eq!(money::to_minor_units(total), 32000);
}

/// Insert an order that looks like an initiated gateway checkout
async fn seed_gateway_order(service: &CheckoutService, gateway_order_id: &str) -> Order {
    let a = seed_product(service, "W001", "Wardrobe", 100.0).await;
    let cart = build_cart(service, &[(&a, "Wardrobe", 100.0, 2)]).await;

    let req = checkout_request("9123456789", Some(DELIVERY_EXPRESS));
    let total = money::add(cart.total, 100.0);
    let order = CheckoutService::snapshot_order(
        USER,
        &cart,
        &req,
        100.0,
        total,
        Some(gateway_order_id.to_string()),
    );
    OrderRepository::new(service.db.clone())
        .create(order)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_verify_payment_happy_path() {
    let service = create_test_service().await;
    let order = seed_gateway_order(&service, "order_G1").await;
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    let signature = sign_payment("order_G1", "pay_P1", GATEWAY_SECRET);
    let outcome = service
        .verify_payment("order_G1", "pay_P1", &signature)
        .await
        .unwrap();

    let VerifyOutcome::Verified(updated) = outcome else {
        panic!("expected verified outcome");
    };
    assert_eq!(updated.payment_status, PaymentStatus::Paid);
    assert_eq!(updated.status, crate::db::models::OrderStatus::Processing);
    assert_eq!(updated.gateway_payment_id.as_deref(), Some("pay_P1"));

    // The owner's cart was emptied
    let cart = CartRepository::new(service.db.clone())
        .find_by_user(USER)
        .await
        .unwrap()
        .unwrap();
    assert!(cart.items.is_empty());
    assert_eq!(cart.total, 0.0);
}

#[tokio::test]
async fn test_verify_payment_signature_mismatch_mutates_nothing() {
    let service = create_test_service().await;
    let order = seed_gateway_order(&service, "order_G2").await;
    let order_id = order.id.unwrap().to_string();

    let outcome = service
        .verify_payment("order_G2", "pay_P2", "deadbeef")
        .await
        .unwrap();
    assert!(matches!(outcome, VerifyOutcome::SignatureMismatch));

    // Order untouched, cart untouched
    let order = OrderRepository::new(service.db.clone())
        .find_by_id(&order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    let cart = CartRepository::new(service.db.clone())
        .find_by_user(USER)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cart.items.len(), 1);
}

#[tokio::test]
async fn test_verify_payment_unknown_gateway_order() {
    let service = create_test_service().await;

    let signature = sign_payment("order_unknown", "pay_P3", GATEWAY_SECRET);
    let err = service
        .verify_payment("order_unknown", "pay_P3", &signature)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_verify_payment_replay_is_idempotent() {
    let service = create_test_service().await;
    seed_gateway_order(&service, "order_G3").await;

    let signature = sign_payment("order_G3", "pay_P4", GATEWAY_SECRET);
    let first = service
        .verify_payment("order_G3", "pay_P4", &signature)
        .await
        .unwrap();
    assert!(matches!(first, VerifyOutcome::Verified(_)));

    // Replaying the same payload re-runs the same one-directional update
    let second = service
        .verify_payment("order_G3", "pay_P4", &signature)
        .await
        .unwrap();
    let VerifyOutcome::Verified(order) = second else {
        panic!("expected verified outcome");
    };
    assert_eq!(order.payment_status, PaymentStatus::Paid);
}
