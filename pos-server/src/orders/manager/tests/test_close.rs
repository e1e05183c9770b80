use super::*;

#[test]
fn test_close_order_archives_and_resets() {
    let (manager, store) = create_test_manager();
    let casado = menu_item("1", "Casado", 5000.0);
    let table = table_with_items(&manager, "Mesa 4", &[casado.clone(), casado]);

    let sale = manager.close_order(&table.id).unwrap();

    assert_eq!(sale.table_id, table.id);
    assert_eq!(sale.table_name, "Mesa 4");
    assert_eq!(sale.items, table.items);
    assert_eq!(sale.subtotal, 10000.0);
    assert_eq!(sale.card_tax, 0.0);
    assert_eq!(sale.total, 10000.0);
    assert_eq!(sale.payment_method, PaymentMethod::Cash);

    let reset = store.get_table(&table.id).unwrap().unwrap();
    assert!(reset.items.is_empty());
    assert_eq!(reset.status, TableStatus::Free);
    assert_eq!(reset.payment, PaymentMethod::Cash);

    assert_eq!(store.list_sales(None).unwrap(), vec![sale]);
}

#[test]
fn test_close_order_by_card() {
    let (manager, _store) = create_test_manager();
    let table = table_with_items(
        &manager,
        "Mesa 2",
        &[
            menu_item("1", "Casado", 5000.0),
            menu_item("1", "Casado", 5000.0),
            menu_item("9", "Filet", 7500.0),
        ],
    );
    manager
        .set_payment_method(&table.id, PaymentMethod::Card)
        .unwrap();

    let sale = manager.close_order(&table.id).unwrap();

    assert_eq!(sale.subtotal, 17500.0);
    assert_eq!(sale.card_tax, 2275.0);
    assert_eq!(sale.total, 19775.0);
    assert_eq!(sale.payment_method, PaymentMethod::Card);
}

#[test]
fn test_close_empty_order_is_archived() {
    let (manager, store) = create_test_manager();
    let table = manager.create_table("Mesa 1").unwrap();

    let sale = manager.close_order(&table.id).unwrap();

    assert!(sale.items.is_empty());
    assert_eq!(sale.total, 0.0);
    assert_eq!(store.sales_count().unwrap(), 1);
}

#[test]
fn test_close_missing_table_writes_nothing() {
    let (manager, store) = create_test_manager();

    let err = manager.close_order("vanished").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(store.sales_count().unwrap(), 0);
}

#[test]
fn test_close_retries_after_concurrent_write() {
    let inner = RedbStore::open_in_memory().unwrap();
    let store = Arc::new(InterferingStore::new(inner.clone(), 1));
    let manager = OrdersManager::new(store.clone(), Arc::new(SequentialIdGenerator::new("id")));
    let table = table_with_items(&manager, "Mesa 1", &[menu_item("1", "Casado", 5000.0)]);

    let sale = manager.close_order(&table.id).unwrap();

    assert_eq!(store.close_calls(), 2);
    // The retry recomputed from fresh state, including the late item
    assert_eq!(sale.items.len(), 2);
    assert_eq!(sale.total, 6000.0);
    assert_eq!(inner.sales_count().unwrap(), 1);
    assert!(inner.get_table(&table.id).unwrap().unwrap().items.is_empty());
}

#[test]
fn test_close_gives_up_after_max_retries() {
    let inner = RedbStore::open_in_memory().unwrap();
    let store = Arc::new(InterferingStore::new(inner.clone(), 10));
    let manager = OrdersManager::new(store.clone(), Arc::new(SequentialIdGenerator::new("id")))
        .with_close_retries(2);
    let table = table_with_items(&manager, "Mesa 1", &[menu_item("1", "Casado", 5000.0)]);

    let err = manager.close_order(&table.id).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransactionConflict);
    assert_eq!(store.close_calls(), 3);
    // Nothing archived, table still holds its order
    assert_eq!(inner.sales_count().unwrap(), 0);
    assert!(!inner.get_table(&table.id).unwrap().unwrap().items.is_empty());
}

#[test]
fn test_close_without_retries_surfaces_conflict() {
    let inner = RedbStore::open_in_memory().unwrap();
    let store = Arc::new(InterferingStore::new(inner.clone(), 1));
    let manager = OrdersManager::new(store.clone(), Arc::new(SequentialIdGenerator::new("id")))
        .with_close_retries(0);
    let table = manager.create_table("Mesa 1").unwrap();

    let err = manager.close_order(&table.id).unwrap_err();

    assert!(matches!(err, ManagerError::TransactionConflict(ref id) if id == &table.id));
    assert_eq!(store.close_calls(), 1);
}

#[test]
fn test_sales_accumulate_newest_first() {
    let (manager, store) = create_test_manager();
    let casado = menu_item("1", "Casado", 5000.0);
    let t1 = table_with_items(&manager, "Mesa 1", &[casado.clone()]);
    let first = manager.close_order(&t1.id).unwrap();
    manager.add_item(&t1.id, &casado, None).unwrap();
    manager.add_item(&t1.id, &casado, None).unwrap();
    let second = manager.close_order(&t1.id).unwrap();

    let sales = store.list_sales(None).unwrap();
    assert_eq!(sales.len(), 2);
    assert!(sales[0].timestamp >= sales[1].timestamp);
    let ids: Vec<_> = sales.iter().map(|s| s.id.clone()).collect();
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));
}
