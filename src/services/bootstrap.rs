use diesel::connection::SimpleConnection;
use diesel::sql_types::{BigInt, Text};
use diesel::{QueryDsl, QueryableByName, RunQueryDsl, SqliteConnection};
use tracing::info;

use crate::schema::settings;
use crate::services::db_models::Variant;
use crate::services::insertable::{
    ItemBranchPair, NewBranch, NewCategory, NewMenuItem, NewSettings,
};
use crate::types::{CatalogError, CatalogResult};

/// Name given to the single variant synthesized from a legacy scalar price.
pub const DEFAULT_VARIANT_NAME: &str = "Standart";

const SCHEMA_DDL: &str = "
CREATE TABLE IF NOT EXISTS branches (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    address TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL DEFAULT '',
    is_active BOOLEAN NOT NULL DEFAULT 1
);
CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS menu_items (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    image_url TEXT NOT NULL DEFAULT '',
    category_id TEXT REFERENCES categories (id) ON DELETE SET NULL,
    is_active BOOLEAN NOT NULL DEFAULT 1,
    sort_order INTEGER NOT NULL DEFAULT 0,
    variants TEXT NOT NULL DEFAULT '[]'
);
CREATE TABLE IF NOT EXISTS item_branches (
    item_id TEXT NOT NULL REFERENCES menu_items (id) ON DELETE CASCADE,
    branch_id TEXT NOT NULL REFERENCES branches (id) ON DELETE CASCADE,
    PRIMARY KEY (item_id, branch_id)
);
CREATE TABLE IF NOT EXISTS settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    brand_name TEXT NOT NULL,
    logo_url TEXT NOT NULL DEFAULT '',
    primary_color TEXT NOT NULL DEFAULT '',
    heading_color TEXT NOT NULL DEFAULT '',
    body_text_color TEXT NOT NULL DEFAULT '',
    admin_password TEXT
);
";

pub fn init_schema(conn: &mut SqliteConnection) -> CatalogResult<()> {
    conn.batch_execute(SCHEMA_DDL)
        .map_err(|err| CatalogError::Storage(err.to_string()))
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    n: i64,
}

#[derive(QueryableByName)]
struct LegacyPriceRow {
    #[diesel(sql_type = Text)]
    id: String,
    #[diesel(sql_type = BigInt)]
    price: i64,
}

fn has_column(conn: &mut SqliteConnection, table: &str, column: &str) -> CatalogResult<bool> {
    let row: CountRow =
        diesel::sql_query("SELECT COUNT(*) AS n FROM pragma_table_info(?) WHERE name = ?")
            .bind::<Text, _>(table)
            .bind::<Text, _>(column)
            .get_result(conn)?;
    Ok(row.n > 0)
}

/// One-time schema evolution from the scalar `price` column to embedded
/// variant lists. Every legacy item without populated variants becomes a
/// single variant named [`DEFAULT_VARIANT_NAME`] at the old price, then the
/// legacy column is dropped. The whole rewrite is one transaction, so a
/// crash leaves the legacy representation fully intact. No-op when the
/// column is already gone.
pub fn migrate_legacy_prices(conn: &mut SqliteConnection) -> CatalogResult<()> {
    if !has_column(conn, "menu_items", "price")? {
        return Ok(());
    }
    info!("legacy scalar prices detected, rewriting as variant lists");

    let result: CatalogResult<()> = conn.immediate_transaction(|conn| {
        if !has_column(conn, "menu_items", "variants")? {
            diesel::sql_query(
                "ALTER TABLE menu_items ADD COLUMN variants TEXT NOT NULL DEFAULT '[]'",
            )
            .execute(conn)?;
        }

        let legacy: Vec<LegacyPriceRow> = diesel::sql_query(
            "SELECT id, price FROM menu_items \
             WHERE price IS NOT NULL AND (variants IS NULL OR variants = '' OR variants = '[]')",
        )
        .load(conn)?;

        for row in legacy {
            let variants = vec![Variant {
                name: DEFAULT_VARIANT_NAME.to_owned(),
                price: row.price,
            }];
            let encoded = serde_json::to_string(&variants)
                .map_err(|err| CatalogError::Migration(err.to_string()))?;
            diesel::sql_query("UPDATE menu_items SET variants = ? WHERE id = ?")
                .bind::<Text, _>(encoded)
                .bind::<Text, _>(row.id)
                .execute(conn)?;
        }

        diesel::sql_query("ALTER TABLE menu_items DROP COLUMN price").execute(conn)?;
        Ok(())
    });

    result.map_err(|err| match err {
        CatalogError::Migration(msg) => CatalogError::Migration(msg),
        other => CatalogError::Migration(other.to_string()),
    })
}

fn one_variant(name: &str, price: i64) -> CatalogResult<String> {
    serde_json::to_string(&vec![Variant {
        name: name.to_owned(),
        price,
    }])
    .map_err(|err| CatalogError::Storage(err.to_string()))
}

/// Loads the starter catalog into an empty store. "Empty" means no settings
/// row: once any initialized store exists, even a partially filled one, the
/// seed never runs again.
pub fn seed_if_empty(conn: &mut SqliteConnection) -> CatalogResult<()> {
    let existing: i64 = settings::table.count().get_result(conn)?;
    if existing > 0 {
        return Ok(());
    }
    info!("empty catalog store, loading the starter menu");

    let seed_branches = vec![
        NewBranch {
            id: "1".to_owned(),
            name: "Markaziy Filial".to_owned(),
            address: "Amir Temur ko'chasi, 15".to_owned(),
            phone: "+998 90 123 45 67".to_owned(),
            is_active: true,
        },
        NewBranch {
            id: "2".to_owned(),
            name: "Chilonzor Filiali".to_owned(),
            address: "Bunyodkor shoh ko'chasi, 5".to_owned(),
            phone: "+998 90 987 65 43".to_owned(),
            is_active: true,
        },
    ];

    let seed_categories = vec![
        NewCategory { id: "1".to_owned(), name: "Pitsalar".to_owned(), sort_order: 1 },
        NewCategory { id: "2".to_owned(), name: "Lavashlar".to_owned(), sort_order: 2 },
        NewCategory { id: "3".to_owned(), name: "Ichimliklar".to_owned(), sort_order: 3 },
        NewCategory { id: "4".to_owned(), name: "Shirinliklar".to_owned(), sort_order: 4 },
    ];

    let seed_items = vec![
        NewMenuItem {
            id: "101".to_owned(),
            name: "Pepperoni Pitsa".to_owned(),
            description: "Mol go'shti, motsarella pishlog'i, maxsus sous, pepperoni.".to_owned(),
            image_url: "https://picsum.photos/800/450?random=1".to_owned(),
            category_id: Some("1".to_owned()),
            is_active: true,
            sort_order: 1,
            variants: one_variant(DEFAULT_VARIANT_NAME, 85000)?,
        },
        NewMenuItem {
            id: "102".to_owned(),
            name: "Margarita Pitsa".to_owned(),
            description: "Pomidor, motsarella pishlog'i, oregano.".to_owned(),
            image_url: "https://picsum.photos/800/450?random=2".to_owned(),
            category_id: Some("1".to_owned()),
            is_active: true,
            sort_order: 2,
            variants: one_variant(DEFAULT_VARIANT_NAME, 70000)?,
        },
        NewMenuItem {
            id: "201".to_owned(),
            name: "Tovuqli Lavash".to_owned(),
            description: "Tovuq go'shti, bodring, pomidor, chips, sous.".to_owned(),
            image_url: "https://picsum.photos/800/450?random=3".to_owned(),
            category_id: Some("2".to_owned()),
            is_active: true,
            sort_order: 1,
            variants: one_variant(DEFAULT_VARIANT_NAME, 35000)?,
        },
        NewMenuItem {
            id: "301".to_owned(),
            name: "Coca Cola".to_owned(),
            description: "Yaxna ichimlik.".to_owned(),
            image_url: "https://picsum.photos/800/450?random=4".to_owned(),
            category_id: Some("3".to_owned()),
            is_active: true,
            sort_order: 1,
            variants: one_variant("0.5L", 12000)?,
        },
    ];

    let seed_settings = NewSettings {
        id: 1,
        brand_name: "Lazzat Food".to_owned(),
        logo_url: "https://cdn-icons-png.flaticon.com/512/3448/3448609.png".to_owned(),
        primary_color: "#e11d48".to_owned(),
        heading_color: "#1f2937".to_owned(),
        body_text_color: "#4b5563".to_owned(),
        admin_password: Some("admin".to_owned()),
    };

    conn.immediate_transaction(|conn| {
        use crate::schema::{branches, categories, item_branches, menu_items};

        diesel::insert_into(branches::table)
            .values(&seed_branches)
            .execute(conn)?;
        diesel::insert_into(categories::table)
            .values(&seed_categories)
            .execute(conn)?;

        for item in &seed_items {
            diesel::insert_into(menu_items::table)
                .values(item)
                .execute(conn)?;
            for branch in &seed_branches {
                diesel::insert_into(item_branches::table)
                    .values(ItemBranchPair {
                        item_id: item.id.clone(),
                        branch_id: branch.id.clone(),
                    })
                    .execute(conn)?;
            }
        }

        diesel::insert_into(settings::table)
            .values(&seed_settings)
            .execute(conn)?;

        Ok(())
    })
}
