use diesel::connection::SimpleConnection;
use diesel::{Connection, SqliteConnection};

use crate::services::bootstrap::{self, DEFAULT_VARIANT_NAME};
use crate::services::catalog;
use crate::services::db_models::{AppSettings, MenuItemDraft, Variant};
use crate::types::CatalogError;

fn fresh_conn() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").expect("in-memory sqlite");
    conn.batch_execute("PRAGMA foreign_keys = ON;").unwrap();
    conn
}

fn initialized_conn() -> SqliteConnection {
    let mut conn = fresh_conn();
    bootstrap::init_schema(&mut conn).unwrap();
    catalog::save_settings(&mut conn, test_settings()).unwrap();
    conn
}

fn test_settings() -> AppSettings {
    AppSettings {
        brand_name: "Lazzat Food".to_owned(),
        logo_url: String::new(),
        primary_color: "#e11d48".to_owned(),
        heading_color: "#1f2937".to_owned(),
        body_text_color: "#4b5563".to_owned(),
        admin_password: None,
    }
}

fn variant(name: &str, price: i64) -> Variant {
    Variant {
        name: name.to_owned(),
        price,
    }
}

fn draft(name: &str, branch_ids: Vec<String>, variants: Vec<Variant>) -> MenuItemDraft {
    MenuItemDraft {
        name: name.to_owned(),
        description: String::new(),
        image_url: String::new(),
        category_id: None,
        is_active: true,
        sort_order: 0,
        branch_ids,
        variants,
    }
}

#[test]
fn branch_assignments_replace_not_merge() {
    let mut conn = initialized_conn();

    let a = catalog::create_branch(&mut conn, "A".into(), "".into(), "".into()).unwrap();
    let b = catalog::create_branch(&mut conn, "B".into(), "".into(), "".into()).unwrap();

    let item_id = catalog::create_menu_item(
        &mut conn,
        draft("Lagmon", vec![a.clone(), b.clone()], vec![variant("Katta", 30000)]),
    )
    .unwrap();

    let mut expected = vec![a.clone(), b.clone()];
    expected.sort();
    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert_eq!(snap.items[0].branch_ids, expected);

    // Omitting a branch on update un-assigns it.
    catalog::update_menu_item(
        &mut conn,
        item_id.clone(),
        draft("Lagmon", vec![b.clone()], vec![variant("Katta", 30000)]),
    )
    .unwrap();
    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert_eq!(snap.items[0].branch_ids, vec![b]);

    catalog::update_menu_item(
        &mut conn,
        item_id,
        draft("Lagmon", vec![], vec![variant("Katta", 30000)]),
    )
    .unwrap();
    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert!(snap.items[0].branch_ids.is_empty());
}

#[test]
fn duplicate_branch_ids_collapse_to_a_set() {
    let mut conn = initialized_conn();
    let a = catalog::create_branch(&mut conn, "A".into(), "".into(), "".into()).unwrap();

    catalog::create_menu_item(
        &mut conn,
        draft("Somsa", vec![a.clone(), a.clone()], vec![variant("Dona", 8000)]),
    )
    .unwrap();

    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert_eq!(snap.items[0].branch_ids, vec![a]);
}

#[test]
fn item_write_rejected_without_usable_variants() {
    let mut conn = initialized_conn();

    let res = catalog::create_menu_item(
        &mut conn,
        draft("Choy", vec![], vec![variant("", 5000), variant("Piyola", 0)]),
    );
    assert!(matches!(res, Err(CatalogError::Validation(_))));

    // The snapshot must not contain a half-written item.
    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert!(snap.items.is_empty());
}

#[test]
fn item_write_keeps_only_usable_variants() {
    let mut conn = initialized_conn();

    catalog::create_menu_item(
        &mut conn,
        draft(
            "Choy",
            vec![],
            vec![variant("", 5000), variant("Piyola", 3000), variant("Chaynik", -1)],
        ),
    )
    .unwrap();

    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert_eq!(snap.items[0].variants, vec![variant("Piyola", 3000)]);
}

#[test]
fn malformed_stored_variants_dropped_at_read() {
    let mut conn = initialized_conn();
    catalog::create_menu_item(&mut conn, draft("Shashlik", vec![], vec![variant("Sixta", 18000)]))
        .unwrap();

    // Simulate pre-validation legacy rows written by an older generation.
    conn.batch_execute(
        r#"UPDATE menu_items SET variants =
           '[{"name":"","price":5},{"name":"Eski","price":-1},{"name":"Kichik","price":15000}]'"#,
    )
    .unwrap();
    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert_eq!(snap.items[0].variants, vec![variant("Kichik", 15000)]);

    // Unparseable JSON degrades to an empty list instead of failing the read.
    conn.batch_execute("UPDATE menu_items SET variants = 'oops'").unwrap();
    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert!(snap.items[0].variants.is_empty());
}

#[test]
fn category_delete_nullifies_but_keeps_items() {
    let mut conn = initialized_conn();

    let cat = catalog::create_category(&mut conn, "Ichimliklar".into(), 1).unwrap();
    let mut d = draft("Cola", vec![], vec![variant("0.5L", 12000)]);
    d.category_id = Some(cat.clone());
    let item_id = catalog::create_menu_item(&mut conn, d).unwrap();

    catalog::delete_category(&mut conn, cat).unwrap();

    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert!(snap.categories.is_empty());
    assert_eq!(snap.items.len(), 1);
    assert_eq!(snap.items[0].id, item_id);
    assert_eq!(snap.items[0].category_id, None);
}

#[test]
fn branch_delete_cascades_assignments_only() {
    let mut conn = initialized_conn();

    let a = catalog::create_branch(&mut conn, "A".into(), "".into(), "".into()).unwrap();
    let item_id =
        catalog::create_menu_item(&mut conn, draft("Osh", vec![a.clone()], vec![variant("Katta", 40000)]))
            .unwrap();

    catalog::delete_branch(&mut conn, a).unwrap();

    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert!(snap.branches.is_empty());
    assert_eq!(snap.items.len(), 1);
    assert_eq!(snap.items[0].id, item_id);
    assert!(snap.items[0].branch_ids.is_empty());
}

#[test]
fn item_delete_removes_assignments() {
    let mut conn = initialized_conn();

    let a = catalog::create_branch(&mut conn, "A".into(), "".into(), "".into()).unwrap();
    let item_id =
        catalog::create_menu_item(&mut conn, draft("Osh", vec![a.clone()], vec![variant("Katta", 40000)]))
            .unwrap();

    catalog::delete_menu_item(&mut conn, item_id).unwrap();

    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert!(snap.items.is_empty());
    assert_eq!(snap.branches.len(), 1);
}

#[test]
fn item_referencing_unknown_category_is_rejected() {
    let mut conn = initialized_conn();

    let mut d = draft("Cola", vec![], vec![variant("0.5L", 12000)]);
    d.category_id = Some("no-such-category".into());
    let res = catalog::create_menu_item(&mut conn, d);
    assert_eq!(res.unwrap_err(), CatalogError::NotFound("category"));
}

#[test]
fn missing_ids_surface_not_found() {
    let mut conn = initialized_conn();

    let res = catalog::update_branch(
        &mut conn,
        "missing".into(),
        "X".into(),
        "".into(),
        "".into(),
        true,
    );
    assert_eq!(res.unwrap_err(), CatalogError::NotFound("branch"));

    let res = catalog::update_category(&mut conn, "missing".into(), "X".into());
    assert_eq!(res.unwrap_err(), CatalogError::NotFound("category"));

    let res = catalog::delete_menu_item(&mut conn, "missing".into());
    assert_eq!(res.unwrap_err(), CatalogError::NotFound("menu item"));

    let res = catalog::set_menu_item_active(&mut conn, "missing".into(), false);
    assert_eq!(res.unwrap_err(), CatalogError::NotFound("menu item"));
}

#[test]
fn empty_names_are_rejected() {
    let mut conn = initialized_conn();

    let res = catalog::create_branch(&mut conn, "   ".into(), "".into(), "".into());
    assert!(matches!(res, Err(CatalogError::Validation(_))));

    let res = catalog::create_category(&mut conn, "".into(), 1);
    assert!(matches!(res, Err(CatalogError::Validation(_))));
}

#[test]
fn snapshot_orders_by_sort_order_then_id() {
    let mut conn = initialized_conn();

    catalog::create_category(&mut conn, "Shirinliklar".into(), 2).unwrap();
    catalog::create_category(&mut conn, "Pitsalar".into(), 1).unwrap();
    catalog::create_category(&mut conn, "Lavashlar".into(), 1).unwrap();

    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    let orders: Vec<i32> = snap.categories.iter().map(|c| c.sort_order).collect();
    assert_eq!(orders, vec![1, 1, 2]);

    // Ties break on id, so repeated reads agree.
    let again = catalog::fetch_snapshot(&mut conn).unwrap();
    let ids: Vec<&str> = snap.categories.iter().map(|c| c.id.as_str()).collect();
    let ids_again: Vec<&str> = again.categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ids_again);
}

#[test]
fn settings_save_replaces_the_singleton() {
    let mut conn = initialized_conn();

    let mut new = test_settings();
    new.brand_name = "Yangi Brend".to_owned();
    new.admin_password = Some("sirli".to_owned());
    catalog::save_settings(&mut conn, new).unwrap();

    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert_eq!(snap.settings.brand_name, "Yangi Brend");
    assert_eq!(snap.settings.admin_password.as_deref(), Some("sirli"));
}

#[test]
fn legacy_scalar_prices_migrate_losslessly() {
    let mut conn = fresh_conn();

    // A store written by the scalar-price generation: no variants column.
    conn.batch_execute(
        "CREATE TABLE menu_items (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            image_url TEXT NOT NULL DEFAULT '',
            category_id TEXT,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            sort_order INTEGER NOT NULL DEFAULT 0,
            price BIGINT
        );
        INSERT INTO menu_items (id, name, price) VALUES ('101', 'Pepperoni Pitsa', 85000);",
    )
    .unwrap();

    bootstrap::init_schema(&mut conn).unwrap();
    bootstrap::migrate_legacy_prices(&mut conn).unwrap();
    catalog::save_settings(&mut conn, test_settings()).unwrap();

    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert_eq!(snap.items.len(), 1);
    assert_eq!(snap.items[0].variants, vec![variant(DEFAULT_VARIANT_NAME, 85000)]);

    // Second run is a no-op and the snapshot is unchanged.
    bootstrap::migrate_legacy_prices(&mut conn).unwrap();
    let again = catalog::fetch_snapshot(&mut conn).unwrap();
    assert_eq!(again.items.len(), 1);
    assert_eq!(again.items[0].variants, snap.items[0].variants);
}

#[test]
fn migration_on_a_fresh_store_is_a_noop() {
    let mut conn = fresh_conn();
    bootstrap::init_schema(&mut conn).unwrap();

    bootstrap::migrate_legacy_prices(&mut conn).unwrap();
    bootstrap::migrate_legacy_prices(&mut conn).unwrap();

    catalog::save_settings(&mut conn, test_settings()).unwrap();
    assert!(catalog::fetch_snapshot(&mut conn).unwrap().items.is_empty());
}

#[test]
fn seed_runs_once_and_only_on_an_empty_store() {
    let mut conn = fresh_conn();
    bootstrap::init_schema(&mut conn).unwrap();

    bootstrap::seed_if_empty(&mut conn).unwrap();
    bootstrap::seed_if_empty(&mut conn).unwrap();

    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert_eq!(snap.branches.len(), 2);
    assert_eq!(snap.categories.len(), 4);
    assert_eq!(snap.items.len(), 4);
    assert_eq!(snap.settings.brand_name, "Lazzat Food");
    assert!(snap.items.iter().all(|item| !item.variants.is_empty()));
    assert!(snap.items.iter().all(|item| item.branch_ids.len() == 2));
}

#[test]
fn seed_skipped_when_settings_exist() {
    let mut conn = initialized_conn();
    bootstrap::seed_if_empty(&mut conn).unwrap();

    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert!(snap.branches.is_empty());
    assert!(snap.items.is_empty());
    assert_eq!(snap.settings.brand_name, "Lazzat Food");
}

#[test]
fn end_to_end_catalog_flow() {
    let mut conn = initialized_conn();

    let branch_a =
        catalog::create_branch(&mut conn, "Branch A".into(), "Main st. 1".into(), "+998".into())
            .unwrap();
    let drinks = catalog::create_category(&mut conn, "Drinks".into(), 1).unwrap();

    let mut cola = draft("Cola", vec![branch_a.clone()], vec![variant("0.5L", 12000)]);
    cola.category_id = Some(drinks.clone());
    let cola_id = catalog::create_menu_item(&mut conn, cola).unwrap();

    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert_eq!(snap.branches.len(), 1);
    assert_eq!(snap.categories.len(), 1);
    assert_eq!(snap.items.len(), 1);
    assert_eq!(snap.items[0].branch_ids, vec![branch_a.clone()]);
    assert_eq!(snap.items[0].variants, vec![variant("0.5L", 12000)]);

    let mut cola = draft("Cola", vec![], vec![variant("0.5L", 12000)]);
    cola.category_id = Some(drinks);
    catalog::update_menu_item(&mut conn, cola_id, cola).unwrap();

    let snap = catalog::fetch_snapshot(&mut conn).unwrap();
    assert!(snap.items[0].branch_ids.is_empty());
}
