use lastmile_admin::domain::model::{NewOrder, OrderFilters, OrderStatus, OrderType, Point};
use lastmile_admin::domain::ports::{OrderRepository, RiderRepository};
use lastmile_admin::{AdminError, Fixtures, InMemoryStore, OrderService, RiderService, ZoneService};

fn new_order(lng: f64, lat: f64) -> NewOrder {
    NewOrder {
        order_type: OrderType::Delivery,
        warehouse_id: "wh-001".to_string(),
        customer_name: "Noura Al-Harbi".to_string(),
        customer_phone: "+966551234567".to_string(),
        short_national_address: "RJOA1234".to_string(),
        location: Point::new(lng, lat),
        pod_required: true,
        notes: None,
        parent_order_id: None,
        source_ref: None,
    }
}

#[test]
fn test_order_zone_is_a_snapshot() {
    let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());

    let order = OrderService::new(&mut store, "admin-001")
        .create_order(new_order(46.68, 24.79))
        .unwrap();
    assert_eq!(order.zone_id.as_deref(), Some("zone-001"));

    // shrink zone-001 to its western half; the pin is now outside
    let mut zones = ZoneService::new(&mut store);
    let shrunk = vec![
        [46.66, 24.81],
        [46.67, 24.81],
        [46.67, 24.77],
        [46.66, 24.77],
    ];
    zones.replace_boundary("zone-001", &shrunk).unwrap();
    assert!(zones.locate(&Point::new(46.68, 24.79)).unwrap().is_none());

    let stored = store.order(&order.id).unwrap();
    assert_eq!(stored.zone_id.as_deref(), Some("zone-001"));
}

#[test]
fn test_order_outside_all_zones_has_no_zone() {
    let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
    let mut orders = OrderService::new(&mut store, "admin-001");

    let order = orders.create_order(new_order(46.90, 24.90)).unwrap();

    assert!(order.zone_id.is_none());
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(!order.auto_assigned);
    assert_eq!(orders.order_logs(&order.id).len(), 1);
}

#[test]
fn test_new_order_listed_first() {
    let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
    let mut orders = OrderService::new(&mut store, "admin-001");

    let created = orders.create_order(new_order(46.68, 24.79)).unwrap();
    let listed = orders.list_orders(&OrderFilters::default());

    assert_eq!(listed[0].id, created.id);
}

#[test]
fn test_create_order_rejects_unknown_warehouse() {
    let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
    let before = store.orders().len();

    let mut data = new_order(46.68, 24.79);
    data.warehouse_id = "wh-999".to_string();
    let result = OrderService::new(&mut store, "admin-001").create_order(data);

    assert!(matches!(result, Err(AdminError::NotFound { entity: "Warehouse", .. })));
    assert_eq!(store.orders().len(), before);
}

#[test]
fn test_cancel_appends_status_log() {
    let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
    let mut orders = OrderService::new(&mut store, "admin-002");
    let logs_before = orders.order_logs("ord-006").len();

    let cancelled = orders.cancel_order("ord-006").unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let logs = orders.order_logs("ord-006");
    assert_eq!(logs.len(), logs_before + 1);
    let last = logs.last().unwrap();
    assert_eq!(last.status, OrderStatus::Cancelled);
    assert_eq!(last.changed_by, "admin-002");
    assert_eq!(last.note.as_deref(), Some("Order cancelled by admin"));
}

#[test]
fn test_reassign_sets_rider_and_clears_auto_assignment() {
    let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
    let mut orders = OrderService::new(&mut store, "admin-001");

    let order = orders.reassign_order("ord-006", "rider-004").unwrap();
    assert_eq!(order.rider_id.as_deref(), Some("rider-004"));
    assert_eq!(order.status, OrderStatus::Assigned);
    assert!(!order.auto_assigned);
    assert_eq!(
        orders.order_logs("ord-006").last().map(|l| l.status),
        Some(OrderStatus::Assigned)
    );

    assert!(matches!(
        orders.reassign_order("ord-006", "rider-404"),
        Err(AdminError::NotFound { entity: "Rider", .. })
    ));
}

#[test]
fn test_filter_by_status_and_zone() {
    let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
    let orders = OrderService::new(&mut store, "admin-001");

    let filters = OrderFilters {
        statuses: vec![OrderStatus::Pending],
        zone_id: Some("zone-003".to_string()),
        ..Default::default()
    };
    let ids: Vec<&str> = orders
        .list_orders(&filters)
        .into_iter()
        .map(|o| o.id.as_str())
        .collect();
    assert_eq!(ids, vec!["ord-006"]);
}

#[test]
fn test_adding_existing_rider_zone_is_noop() {
    let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
    let before = store.rider_zones().len();

    let added = RiderService::new(&mut store)
        .add_rider_zone("rider-001", "zone-001")
        .unwrap();

    assert!(!added);
    assert_eq!(store.rider_zones().len(), before);
}
