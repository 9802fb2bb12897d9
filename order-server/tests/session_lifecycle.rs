//! PIN 会话 → 下单 → 出餐 → 结账 全流程

mod common;

use common::{employee, line, request, rid_string, setup};
use order_server::checkout::CheckoutError;
use order_server::db::repository::PinRepository;
use order_server::orders::OrderError;
use order_server::pins::PinError;
use shared::models::{
    CheckoutHistoryQuery, CheckoutRequest, CheckoutStatus, OrderStatus, PaymentMethod, PinStatus,
};

#[tokio::test]
async fn dinner_from_open_to_paid() {
    let env = setup().await;
    let staff = employee();
    let mains = env.category("Mains").await;
    let pad_thai = env.menu_item(&mains, "Pad Thai", 50.0).await;

    let pin = env.open("T1").await;
    assert_eq!(pin.status, PinStatus::Active);
    assert_eq!(pin.table_number, "T1");
    assert_eq!(pin.code.len(), 6);
    let pin_id = rid_string(&pin.id);

    let placed = env
        .state
        .orders
        .place_order(request(&pin, vec![line(&pad_thai, 2)]))
        .await
        .unwrap();
    assert_eq!(placed.orders.len(), 1);
    let order = &placed.orders[0];
    assert_eq!(order.total_price, 100.0);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.item_name.as_deref(), Some("Pad Thai"));

    let order_id = rid_string(&order.id);
    let updated = env
        .state
        .orders
        .advance_status(&staff, &order_id, "completed")
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Completed);

    let preview = env.state.checkout.preview(&staff, &pin_id).await.unwrap();
    assert_eq!(preview.menu_summary.len(), 1);
    assert_eq!(preview.menu_summary[0].name, "Pad Thai");
    assert_eq!(preview.menu_summary[0].price, 50.0);
    assert_eq!(preview.menu_summary[0].count, 2);
    assert_eq!(preview.menu_summary[0].total, 100.0);
    assert_eq!(preview.total_amount, 100.0);

    let checkout = env
        .state
        .checkout
        .finalize(
            &staff,
            CheckoutRequest {
                pin_id: pin_id.clone(),
                payment_method: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(checkout.total_amount, 100.0);
    assert_eq!(checkout.status, CheckoutStatus::Paid);
    assert_eq!(checkout.payment_method, PaymentMethod::Cash);
    assert_eq!(checkout.pin_code, pin.code);
    assert_eq!(checkout.paid_by_name.as_deref(), Some("mai"));
    assert_eq!(checkout.items.len(), 1);
    assert_eq!(checkout.items[0].total, 100.0);

    assert!(matches!(
        env.state.pins.lookup_by_code(&pin.code).await,
        Err(PinError::NotActive)
    ));

    let fetched = env
        .state
        .checkout
        .get_by_id(&staff, &rid_string(&checkout.id))
        .await
        .unwrap();
    assert_eq!(fetched.total_amount, 100.0);
}

#[tokio::test]
async fn reopening_a_table_retires_the_old_session() {
    let env = setup().await;
    let staff = employee();
    let table = env.table("T2").await;
    let table_id = rid_string(&table.id);

    let first = env.state.pins.open_table(&staff, &table_id).await.unwrap();
    let second = env.state.pins.open_table(&staff, &table_id).await.unwrap();
    assert_ne!(first.code, second.code);

    let repo = PinRepository::new(env.state.get_db());
    let old = repo.find_by_id(first.id.as_ref().unwrap()).await.unwrap().unwrap();
    assert_eq!(old.status, PinStatus::Inactive);
    assert!(old.closed_at.is_some());

    let active = repo.find_active_for_table(table.id.as_ref().unwrap()).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].code, second.code);

    assert!(env.state.pins.lookup_by_code(&first.code).await.is_err());
    assert!(env.state.pins.lookup_by_code(&second.code).await.is_ok());
}

#[tokio::test]
async fn opening_a_deleted_table_is_not_found() {
    let env = setup().await;
    let table = env.table("T3").await;
    let table_id = rid_string(&table.id);
    order_server::db::repository::DiningTableRepository::new(env.state.get_db())
        .soft_delete(table.id.as_ref().unwrap())
        .await
        .unwrap();

    assert!(matches!(
        env.state.pins.open_table(&employee(), &table_id).await,
        Err(PinError::TableNotFound(_))
    ));
}

#[tokio::test]
async fn close_and_mark_paid_are_idempotent() {
    let env = setup().await;
    let staff = employee();
    let pin = env.open("T4").await;
    let pin_id = rid_string(&pin.id);

    let closed = env.state.pins.close_session(&staff, &pin_id).await.unwrap();
    assert_eq!(closed.status, PinStatus::Inactive);
    let again = env.state.pins.mark_paid(&staff, &pin_id).await.unwrap();
    assert_eq!(again.status, PinStatus::Inactive);
    assert_eq!(again.closed_at, closed.closed_at);

    assert!(matches!(
        env.state.pins.close_session(&staff, "pin:missing").await,
        Err(PinError::SessionNotFound(_))
    ));
}

#[tokio::test]
async fn active_list_only_has_open_sessions() {
    let env = setup().await;
    let staff = employee();
    let open = env.open("T5").await;
    let closed = env.open("T6").await;
    env.state
        .pins
        .close_session(&staff, &rid_string(&closed.id))
        .await
        .unwrap();

    let active = env.state.pins.list_active(&staff).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].code, open.code);

    let all = env.state.pins.list_sessions(&staff, None).await.unwrap();
    assert_eq!(all.len(), 2);
    let inactive = env
        .state
        .pins
        .list_sessions(&staff, Some("inactive"))
        .await
        .unwrap();
    assert_eq!(inactive.len(), 1);
    assert!(matches!(
        env.state.pins.list_sessions(&staff, Some("open")).await,
        Err(PinError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn finalize_without_completed_orders_creates_nothing() {
    let env = setup().await;
    let staff = employee();
    let mains = env.category("Mains").await;
    let curry = env.menu_item(&mains, "Green Curry", 70.0).await;
    let pin = env.open("T7").await;
    let pin_id = rid_string(&pin.id);

    // pending 订单不参与结账
    env.state
        .orders
        .place_order(request(&pin, vec![line(&curry, 1)]))
        .await
        .unwrap();

    assert!(matches!(
        env.state.checkout.preview(&staff, &pin_id).await,
        Err(CheckoutError::NoCompletedOrders)
    ));
    let result = env
        .state
        .checkout
        .finalize(
            &staff,
            CheckoutRequest {
                pin_id: pin_id.clone(),
                payment_method: Some("qr".into()),
            },
        )
        .await;
    assert!(matches!(result, Err(CheckoutError::NoCompletedOrders)));

    let history = env
        .state
        .checkout
        .history(&staff, CheckoutHistoryQuery::default())
        .await
        .unwrap();
    assert_eq!(history.pagination.total_items, 0);
    assert!(env.state.pins.lookup_by_code(&pin.code).await.is_ok());
}

#[tokio::test]
async fn finalize_on_closed_session_is_not_found() {
    let env = setup().await;
    let staff = employee();
    let pin = env.open("T8").await;
    let pin_id = rid_string(&pin.id);
    env.state.pins.close_session(&staff, &pin_id).await.unwrap();

    let result = env
        .state
        .checkout
        .finalize(
            &staff,
            CheckoutRequest {
                pin_id,
                payment_method: None,
            },
        )
        .await;
    assert!(matches!(result, Err(CheckoutError::SessionNotActive)));
}

#[tokio::test]
async fn unknown_payment_method_is_rejected() {
    let env = setup().await;
    let pin = env.open("T9").await;

    let result = env
        .state
        .checkout
        .finalize(
            &employee(),
            CheckoutRequest {
                pin_id: rid_string(&pin.id),
                payment_method: Some("bitcoin".into()),
            },
        )
        .await;
    assert!(matches!(result, Err(CheckoutError::InvalidInput(_))));
}

#[tokio::test]
async fn receipt_survives_later_menu_edits() {
    let env = setup().await;
    let staff = employee();
    let mains = env.category("Mains").await;
    let soup = env.menu_item(&mains, "Tom Yum", 80.0).await;
    let pin = env.open("T10").await;

    let placed = env
        .state
        .orders
        .place_order(request(&pin, vec![line(&soup, 1)]))
        .await
        .unwrap();
    let order_id = rid_string(&placed.orders[0].id);
    env.state
        .orders
        .advance_status(&staff, &order_id, "completed")
        .await
        .unwrap();
    let checkout = env
        .state
        .checkout
        .finalize(
            &staff,
            CheckoutRequest {
                pin_id: rid_string(&pin.id),
                payment_method: Some("card".into()),
            },
        )
        .await
        .unwrap();

    let repo = order_server::db::repository::MenuItemRepository::new(env.state.get_db());
    let mut fields = order_server::db::repository::menu_item::MenuItemFields::from(soup.clone());
    fields.name = "Tom Yum Goong".into();
    fields.price = 95.0;
    repo.update(soup.id.as_ref().unwrap(), fields).await.unwrap();

    let stored = env
        .state
        .checkout
        .get_by_id(&staff, &rid_string(&checkout.id))
        .await
        .unwrap();
    assert_eq!(stored.items[0].name, "Tom Yum");
    assert_eq!(stored.items[0].price, 80.0);
    assert_eq!(stored.total_amount, 80.0);
    assert_eq!(stored.payment_method, PaymentMethod::Card);
}

#[tokio::test]
async fn history_is_paginated_newest_first() {
    let env = setup().await;
    let staff = employee();
    let mains = env.category("Mains").await;
    let rice = env.menu_item(&mains, "Fried Rice", 40.0).await;

    for number in ["H1", "H2", "H3"] {
        let pin = env.open(number).await;
        let placed = env
            .state
            .orders
            .place_order(request(&pin, vec![line(&rice, 1)]))
            .await
            .unwrap();
        env.state
            .orders
            .advance_status(&staff, &rid_string(&placed.orders[0].id), "completed")
            .await
            .unwrap();
        env.state
            .checkout
            .finalize(
                &staff,
                CheckoutRequest {
                    pin_id: rid_string(&pin.id),
                    payment_method: None,
                },
            )
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let first = env
        .state
        .checkout
        .history(
            &staff,
            CheckoutHistoryQuery {
                limit: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(first.checkouts.len(), 2);
    assert_eq!(first.checkouts[0].table_number, "H3");
    assert_eq!(first.pagination.total_items, 3);
    assert_eq!(first.pagination.total_pages, 2);
    assert!(first.pagination.has_next_page);

    let second = env
        .state
        .checkout
        .history(
            &staff,
            CheckoutHistoryQuery {
                page: Some(2),
                limit: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(second.checkouts.len(), 1);
    assert_eq!(second.checkouts[0].table_number, "H1");
    assert!(second.pagination.has_prev_page);

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let ranged = env
        .state
        .checkout
        .history(
            &staff,
            CheckoutHistoryQuery {
                start_date: Some(today.clone()),
                end_date: Some(today),
                status: Some("paid".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ranged.pagination.total_items, 3);

    let past = env
        .state
        .checkout
        .history(
            &staff,
            CheckoutHistoryQuery {
                end_date: Some("2000-01-01".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(past.pagination.total_items, 0);

    assert!(matches!(
        env.state
            .checkout
            .history(
                &staff,
                CheckoutHistoryQuery {
                    start_date: Some("yesterday".into()),
                    ..Default::default()
                },
            )
            .await,
        Err(CheckoutError::InvalidQuery(_))
    ));
}

#[tokio::test]
async fn orders_against_a_closed_session_are_refused() {
    let env = setup().await;
    let mains = env.category("Mains").await;
    let curry = env.menu_item(&mains, "Massaman", 90.0).await;
    let pin = env.open("T11").await;
    env.state
        .pins
        .close_session(&employee(), &rid_string(&pin.id))
        .await
        .unwrap();

    assert!(matches!(
        env.state
            .orders
            .place_order(request(&pin, vec![line(&curry, 1)]))
            .await,
        Err(OrderError::PinNotActive)
    ));
    assert!(matches!(
        env.state.orders.query_by_pin(&pin.code).await,
        Err(OrderError::PinNotActive)
    ));
}
