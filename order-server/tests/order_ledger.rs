//! 订单账本: 下单、状态流转、权限、通知

mod common;

use std::sync::{Arc, Mutex};

use common::{admin, employee, line, request, rid_string, setup};
use order_server::auth::CurrentUser;
use order_server::db::repository::MenuItemRepository;
use order_server::message::{Notification, NotificationEvent, NotificationSink};
use order_server::orders::OrderError;
use order_server::OrderLedger;
use shared::models::{OrderItemInput, OrderListQuery, OrderStatus, OrderWorkflow, PlaceOrderRequest};

/// 记录所有通知, 便于断言
#[derive(Default)]
struct Recorder(Mutex<Vec<Notification>>);

impl NotificationSink for Recorder {
    fn notify(&self, notification: Notification) {
        self.0.lock().unwrap().push(notification);
    }
}

impl Recorder {
    fn events(&self) -> Vec<NotificationEvent> {
        self.0.lock().unwrap().iter().map(|n| n.event).collect()
    }
}

#[tokio::test]
async fn unavailable_items_are_skipped() {
    let env = setup().await;
    let mains = env.category("Mains").await;
    let noodles = env.menu_item(&mains, "Boat Noodles", 45.0).await;
    let gone = env.menu_item(&mains, "Seasonal Special", 120.0).await;
    let hidden = env.menu_item(&mains, "Secret Menu", 200.0).await;
    let menu = MenuItemRepository::new(env.state.get_db());
    menu.soft_delete(gone.id.as_ref().unwrap()).await.unwrap();
    menu.set_visibility(hidden.id.as_ref().unwrap(), false).await.unwrap();

    let pin = env.open("A1").await;
    let mut items = vec![line(&noodles, 3), line(&gone, 1), line(&hidden, 1)];
    items.push(OrderItemInput {
        menu_item_id: "not a record id".into(),
        quantity: 1,
        note: None,
    });

    let placed = env.state.orders.place_order(request(&pin, items)).await.unwrap();
    assert_eq!(placed.orders.len(), 1);
    assert_eq!(placed.skipped, 3);
    assert_eq!(placed.orders[0].quantity, 3);
    assert_eq!(placed.orders[0].total_price, 135.0);
    assert_eq!(placed.table_number, "A1");
    assert_eq!(placed.pin, pin.code);
}

#[tokio::test]
async fn every_item_unavailable_creates_nothing_and_stays_quiet() {
    let env = setup().await;
    let recorder = Arc::new(Recorder::default());
    let ledger = OrderLedger::new(env.state.get_db(), recorder.clone(), OrderWorkflow::Permissive);

    let mains = env.category("Mains").await;
    let gone = env.menu_item(&mains, "Retired Dish", 10.0).await;
    MenuItemRepository::new(env.state.get_db())
        .soft_delete(gone.id.as_ref().unwrap())
        .await
        .unwrap();
    let pin = env.open("A2").await;

    let placed = ledger.place_order(request(&pin, vec![line(&gone, 2)])).await.unwrap();
    assert!(placed.orders.is_empty());
    assert_eq!(placed.skipped, 1);
    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn malformed_requests_are_rejected() {
    let env = setup().await;
    let mains = env.category("Mains").await;
    let dish = env.menu_item(&mains, "Larb", 60.0).await;
    let pin = env.open("A3").await;

    let empty = PlaceOrderRequest {
        pin: pin.code.clone(),
        items: Vec::new(),
    };
    assert!(matches!(
        env.state.orders.place_order(empty).await,
        Err(OrderError::InvalidRequest(_))
    ));

    assert!(matches!(
        env.state
            .orders
            .place_order(request(&pin, vec![line(&dish, 0)]))
            .await,
        Err(OrderError::InvalidRequest(_))
    ));

    let unknown = PlaceOrderRequest {
        pin: "zzzzzz".into(),
        items: vec![line(&dish, 1)],
    };
    assert!(matches!(
        env.state.orders.place_order(unknown).await,
        Err(OrderError::PinNotActive)
    ));
}

#[tokio::test]
async fn price_changes_do_not_touch_existing_orders() {
    let env = setup().await;
    let mains = env.category("Mains").await;
    let dish = env.menu_item(&mains, "Som Tam", 50.0).await;
    let pin = env.open("A4").await;

    let placed = env
        .state
        .orders
        .place_order(request(&pin, vec![line(&dish, 2)]))
        .await
        .unwrap();
    assert_eq!(placed.orders[0].total_price, 100.0);

    let menu = MenuItemRepository::new(env.state.get_db());
    let mut fields = order_server::db::repository::menu_item::MenuItemFields::from(dish.clone());
    fields.price = 65.0;
    menu.update(dish.id.as_ref().unwrap(), fields).await.unwrap();

    let view = env.state.orders.query_by_pin(&pin.code).await.unwrap();
    assert_eq!(view.orders.len(), 1);
    assert_eq!(view.orders[0].total_price, 100.0);
    // 实时菜单价格用于展示
    assert_eq!(view.orders[0].item_price, Some(65.0));
    assert_eq!(view.summary.total_price, 100.0);
}

#[tokio::test]
async fn session_view_summarizes_orders() {
    let env = setup().await;
    let staff = employee();
    let mains = env.category("Mains").await;
    let rice = env.menu_item(&mains, "Sticky Rice", 20.0).await;
    let soup = env.menu_item(&mains, "Tom Kha", 85.5).await;
    let pin = env.open("A5").await;

    let placed = env
        .state
        .orders
        .place_order(request(&pin, vec![line(&rice, 3), line(&soup, 1)]))
        .await
        .unwrap();
    env.state
        .orders
        .advance_status(&staff, &rid_string(&placed.orders[1].id), "cooking")
        .await
        .unwrap();

    let view = env.state.orders.query_by_pin(&pin.code).await.unwrap();
    assert_eq!(view.pin.code, pin.code);
    assert_eq!(view.summary.order_count, 2);
    assert_eq!(view.summary.total_items, 4);
    assert_eq!(view.summary.total_price, 145.5);
    assert_eq!(view.summary.status_count.pending, 1);
    assert_eq!(view.summary.status_count.cooking, 1);
}

#[tokio::test]
async fn live_view_excludes_closed_sessions() {
    let env = setup().await;
    let staff = employee();
    let mains = env.category("Mains").await;
    let dish = env.menu_item(&mains, "Khao Soi", 75.0).await;

    let open = env.open("B1").await;
    let closed = env.open("B2").await;
    for pin in [&open, &closed] {
        env.state
            .orders
            .place_order(request(pin, vec![line(&dish, 1)]))
            .await
            .unwrap();
    }
    env.state
        .pins
        .close_session(&staff, &rid_string(&closed.id))
        .await
        .unwrap();

    let live = env
        .state
        .orders
        .query_all(&staff, OrderListQuery::default())
        .await
        .unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].pin, *open.id.as_ref().unwrap());

    let by_pin = env
        .state
        .orders
        .query_all(
            &staff,
            OrderListQuery {
                pin_id: Some(rid_string(&closed.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(by_pin.is_empty());

    let cooking = env
        .state
        .orders
        .query_all(
            &staff,
            OrderListQuery {
                status: Some("cooking".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cooking.is_empty());

    assert!(matches!(
        env.state
            .orders
            .query_all(
                &staff,
                OrderListQuery {
                    status: Some("burnt".into()),
                    ..Default::default()
                },
            )
            .await,
        Err(OrderError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn capabilities_are_enforced() {
    let env = setup().await;
    let customer = CurrentUser::customer();
    let staff = employee();
    let mains = env.category("Mains").await;
    let dish = env.menu_item(&mains, "Pad Kra Pao", 55.0).await;
    let pin = env.open("C1").await;
    let placed = env
        .state
        .orders
        .place_order(request(&pin, vec![line(&dish, 1)]))
        .await
        .unwrap();
    let order_id = rid_string(&placed.orders[0].id);

    assert!(matches!(
        env.state.orders.advance_status(&customer, &order_id, "cooking").await,
        Err(OrderError::Forbidden(_))
    ));
    assert!(matches!(
        env.state.orders.query_all(&customer, OrderListQuery::default()).await,
        Err(OrderError::Forbidden(_))
    ));
    assert!(matches!(
        env.state.orders.delete_order(&staff, &order_id).await,
        Err(OrderError::Forbidden(_))
    ));

    let removed = env.state.orders.delete_order(&admin(), &order_id).await.unwrap();
    assert_eq!(removed.id, placed.orders[0].id);
    assert!(matches!(
        env.state.orders.delete_order(&admin(), &order_id).await,
        Err(OrderError::NotFound(_))
    ));
}

#[tokio::test]
async fn unknown_order_and_status_are_reported() {
    let env = setup().await;
    let staff = employee();

    assert!(matches!(
        env.state.orders.advance_status(&staff, "order:ghost", "served").await,
        Err(OrderError::NotFound(_))
    ));
    assert!(matches!(
        env.state.orders.advance_status(&staff, "order:ghost", "eaten").await,
        Err(OrderError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn permissive_workflow_allows_any_jump() {
    let env = setup().await;
    let staff = employee();
    let mains = env.category("Mains").await;
    let dish = env.menu_item(&mains, "Mango Sticky Rice", 65.0).await;
    let pin = env.open("D1").await;
    let placed = env
        .state
        .orders
        .place_order(request(&pin, vec![line(&dish, 1)]))
        .await
        .unwrap();
    let order_id = rid_string(&placed.orders[0].id);

    let done = env
        .state
        .orders
        .advance_status(&staff, &order_id, "completed")
        .await
        .unwrap();
    assert_eq!(done.status, OrderStatus::Completed);
    let back = env
        .state
        .orders
        .advance_status(&staff, &order_id, "pending")
        .await
        .unwrap();
    assert_eq!(back.status, OrderStatus::Pending);
}

#[tokio::test]
async fn strict_workflow_follows_the_kitchen_line() {
    let env = setup().await;
    let staff = employee();
    let recorder = Arc::new(Recorder::default());
    let ledger = OrderLedger::new(env.state.get_db(), recorder.clone(), OrderWorkflow::Strict);

    let mains = env.category("Mains").await;
    let dish = env.menu_item(&mains, "Gaeng Som", 70.0).await;
    let pin = env.open("D2").await;
    let placed = ledger.place_order(request(&pin, vec![line(&dish, 1)])).await.unwrap();
    let order_id = rid_string(&placed.orders[0].id);

    assert!(matches!(
        ledger.advance_status(&staff, &order_id, "completed").await,
        Err(OrderError::TransitionRejected {
            from: OrderStatus::Pending,
            to: OrderStatus::Completed
        })
    ));

    for status in ["cooking", "served", "completed"] {
        ledger.advance_status(&staff, &order_id, status).await.unwrap();
    }
    assert!(matches!(
        ledger.advance_status(&staff, &order_id, "cancel").await,
        Err(OrderError::TransitionRejected { .. })
    ));

    assert_eq!(
        recorder.events(),
        vec![
            NotificationEvent::OrderCreated,
            NotificationEvent::OrderUpdated,
            NotificationEvent::OrderUpdated,
            NotificationEvent::OrderUpdated,
        ]
    );
}

#[tokio::test]
async fn bus_subscribers_see_order_events() {
    let env = setup().await;
    let mut rx = env.state.message_bus().subscribe();
    let mains = env.category("Mains").await;
    let dish = env.menu_item(&mains, "Satay", 30.0).await;
    let pin = env.open("E1").await;

    let placed = env
        .state
        .orders
        .place_order(request(&pin, vec![line(&dish, 4)]))
        .await
        .unwrap();

    let created = rx.recv().await.unwrap();
    assert_eq!(created.event, NotificationEvent::OrderCreated);
    assert_eq!(created.payload["table_number"], "E1");
    assert_eq!(created.payload["pin"], pin.code.as_str());
    assert_eq!(created.payload["orders"].as_array().map(Vec::len), Some(1));

    let order_id = rid_string(&placed.orders[0].id);
    env.state.orders.delete_order(&admin(), &order_id).await.unwrap();
    let deleted = rx.recv().await.unwrap();
    assert_eq!(deleted.event, NotificationEvent::OrderDeleted);
    assert_eq!(deleted.payload["order_id"], order_id.as_str());
}

#[tokio::test]
async fn unpriceable_menu_item_fails_the_batch() {
    let env = setup().await;
    let mains = env.category("Mains").await;
    let fine = env.menu_item(&mains, "Pad See Ew", 60.0).await;
    // 直接写库绕过请求校验
    let absurd = env.menu_item(&mains, "Golden Curry", 1e30).await;
    let pin = env.open("F1").await;

    let result = env
        .state
        .orders
        .place_order(request(&pin, vec![line(&fine, 1), line(&absurd, 1)]))
        .await;
    assert!(matches!(result, Err(OrderError::Money(_))));

    let view = env.state.orders.query_by_pin(&pin.code).await.unwrap();
    assert!(view.orders.is_empty());
}
