//! Integration tests for the cart store

use std::{cell::RefCell, rc::Rc};

use testresult::TestResult;

use concierge::{
    cart::{Cart, CartError, CartLine, CartStore, LineId},
    catalog::{CatalogEntry, CatalogItem, menu::MenuItem},
    fixtures::Catalogs,
    storage::MemoryStorage,
};

fn soup() -> MenuItem {
    MenuItem::new("m1", "Soup", 500, "Soups")
}

fn tea() -> MenuItem {
    MenuItem::new("m2", "Tea", 250, "Drinks")
}

fn assert_consistent(cart: &Cart) {
    let quantity: u64 = cart.lines().iter().map(|l| u64::from(l.quantity())).sum();
    let price: u64 = cart.lines().iter().map(CartLine::subtotal).sum();

    assert_eq!(cart.total_quantity(), quantity, "total quantity out of step");
    assert_eq!(cart.total_price(), price, "total price out of step");
}

#[test]
fn scenarios_add_merge_and_remove() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());

    let line = store.add_item(&soup(), 1)?;

    assert_eq!(store.len(), 1);
    assert_eq!(store.cart().total_quantity(), 1);
    assert_eq!(store.cart().total_price(), 500);

    let merged = store.add_item(&soup(), 2)?;

    assert_eq!(merged.line_id(), line.line_id());
    assert_eq!(store.len(), 1);
    assert_eq!(merged.quantity(), 3);
    assert_eq!(store.cart().total_price(), 1500);

    assert!(store.update_item_quantity(line.line_id(), 0));

    assert!(store.is_empty());
    assert_eq!(store.cart().total_quantity(), 0);
    assert_eq!(store.cart().total_price(), 0);

    Ok(())
}

#[test]
fn clear_persists_so_cleared_items_stay_gone() -> TestResult {
    let storage = MemoryStorage::new();
    let mut store = CartStore::new(storage.clone());

    store.add_item(&soup(), 1)?;
    store.add_item(&tea(), 1)?;
    store.clear_cart();

    assert!(store.is_empty());
    assert_eq!(store.cart().total_quantity(), 0);
    assert_eq!(store.cart().total_price(), 0);

    let reopened = CartStore::new(storage);

    assert!(reopened.is_empty());

    Ok(())
}

#[test]
fn re_adding_never_duplicates_lines() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());

    store.add_item(&soup(), 1)?;
    store.add_item(&soup(), 1)?;

    assert_eq!(store.len(), 1);
    assert_eq!(store.catalog_item_quantity("m1"), 2);

    Ok(())
}

#[test]
fn non_positive_quantity_removes_the_line() -> TestResult {
    for quantity in [0, -5] {
        let mut store = CartStore::new(MemoryStorage::new());
        let line = store.add_item(&soup(), 2)?;

        assert!(store.update_item_quantity(line.line_id(), quantity));
        assert!(store.line(line.line_id()).is_none());
    }

    Ok(())
}

#[test]
fn unknown_line_ids_are_not_errors() {
    let mut store = CartStore::new(MemoryStorage::new());
    let missing = LineId::from("cart-missing");

    assert!(!store.remove_item(&missing));
    assert!(!store.update_item_quantity(&missing, 3));
    assert!(!store.increment_item(&missing));
    assert!(!store.decrement_item(&missing));
}

#[test]
fn totals_stay_consistent_through_every_mutation() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());

    let soup_line = store.add_item(&soup(), 3)?;
    assert_consistent(store.cart());

    let tea_line = store.add_item(&tea(), 1)?;
    assert_consistent(store.cart());

    store.update_item_quantity(soup_line.line_id(), 7);
    assert_consistent(store.cart());

    store.increment_item(tea_line.line_id());
    assert_consistent(store.cart());

    store.decrement_item(soup_line.line_id());
    assert_consistent(store.cart());

    store.remove_item(tea_line.line_id());
    assert_consistent(store.cart());

    assert_eq!(store.cart().total_quantity(), 6);
    assert_eq!(store.cart().total_price(), 3000);

    Ok(())
}

#[test]
fn decrement_to_zero_removes() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());
    let line = store.add_item(&tea(), 1)?;

    assert!(store.decrement_item(line.line_id()));
    assert!(store.is_empty());

    Ok(())
}

#[test]
fn insertion_order_is_preserved() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());

    store.add_item(&tea(), 1)?;
    store.add_item(&soup(), 1)?;
    store.add_item(&tea(), 1)?;

    let ids: Vec<_> = store
        .cart()
        .lines()
        .iter()
        .map(CartLine::catalog_item_id)
        .collect();

    assert_eq!(ids, ["m2", "m1"]);

    Ok(())
}

#[test]
fn lines_snapshot_the_catalog_item() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());
    let mut item = soup();

    store.add_item(&item, 1)?;

    item.price = 9_999;
    item.name = "Renamed".to_string();

    let line = store.add_item(&item, 1)?;

    assert_eq!(line.unit_price(), 500);
    assert_eq!(line.name(), "Soup");
    assert_eq!(store.cart().total_price(), 1000);

    Ok(())
}

#[test]
fn zero_add_is_rejected() {
    let mut store = CartStore::new(MemoryStorage::new());

    assert_eq!(store.add_item(&soup(), 0), Err(CartError::ZeroQuantity));
    assert!(store.is_empty());
}

#[test]
fn snapshots_are_detached_copies() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());

    store.add_item(&soup(), 1)?;

    let snapshot = store.snapshot();

    store.add_item(&tea(), 1)?;

    assert_eq!(snapshot.len(), 1);
    assert_eq!(store.len(), 2);

    Ok(())
}

#[test]
fn subscribers_fan_out_once_per_mutation() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());
    let seen: Rc<RefCell<Vec<(usize, u64)>>> = Rc::default();

    let subscriptions: Vec<_> = (0..3)
        .map(|index| {
            let seen = Rc::clone(&seen);

            store.subscribe(move |cart| seen.borrow_mut().push((index, cart.total_quantity())))
        })
        .collect();

    store.add_item(&soup(), 2)?;

    assert_eq!(*seen.borrow(), [(0, 2), (1, 2), (2, 2)]);

    let first = subscriptions.first().ok_or("missing subscription")?;

    assert!(first.unsubscribe());
    assert!(!first.unsubscribe());

    seen.borrow_mut().clear();
    store.add_item(&tea(), 1)?;

    assert_eq!(*seen.borrow(), [(1, 3), (2, 3)]);
    assert_eq!(store.subscriber_count(), 2);

    Ok(())
}

#[test]
fn unchanged_mutations_do_not_notify() {
    let mut store = CartStore::new(MemoryStorage::new());
    let calls = Rc::new(RefCell::new(0));
    let counted = Rc::clone(&calls);

    store.subscribe(move |_| *counted.borrow_mut() += 1);

    store.remove_item(&LineId::from("missing"));
    store.update_item_quantity(&LineId::from("missing"), 2);

    assert_eq!(*calls.borrow(), 0);

    store.clear_cart();

    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn independent_stores_do_not_share_state() -> TestResult {
    let mut first = CartStore::with_key(MemoryStorage::new(), "room-101");
    let second = CartStore::with_key(MemoryStorage::new(), "room-102");

    first.add_item(&soup(), 1)?;

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());

    Ok(())
}

#[test]
fn limits_guard_views_before_adding() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());

    store.add_item(&soup(), 9)?;

    assert_eq!(store.can_add_item(&soup(), 1), Ok(()));
    assert_eq!(
        store.can_add_item(&soup(), 2),
        Err(CartError::ItemLimitExceeded {
            limit: 10,
            requested: 11,
        })
    );
    assert_eq!(store.can_add_item(&tea(), 0), Err(CartError::ZeroQuantity));

    Ok(())
}

#[test]
fn bundled_menu_items_go_straight_into_the_cart() -> TestResult {
    let catalogs = Catalogs::bundled()?;
    let borscht = catalogs.menu.item("borscht").ok_or("missing borscht")?;

    let mut store = CartStore::new(MemoryStorage::new());
    let line = store.add_item(borscht, 2)?;

    assert_eq!(line.catalog_item_id(), borscht.id());
    assert_eq!(line.name(), borscht.name());
    assert_eq!(line.category(), "Soups");
    assert_eq!(store.cart().total_price(), borscht.price() * 2);

    Ok(())
}
