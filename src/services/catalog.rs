use std::collections::HashMap;

use actix::Handler;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::{
    ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SqliteConnection,
};
use tracing::info;

use crate::schema::{branches, categories, item_branches, menu_items, settings};
use crate::services::db_models::{
    AppSettings, Branch, Category, MenuItemDraft, MenuItemRow, MenuItemView, SettingsRow,
    Snapshot, Variant,
};
use crate::services::db_utils::{DbActor, SqlitePool};
use crate::services::ids;
use crate::services::insertable::{
    ItemBranchPair, NewBranch, NewCategory, NewMenuItem, NewSettings,
};
use crate::services::messages::{
    CreateBranch, CreateCategory, CreateMenuItem, DeleteBranch, DeleteCategory, DeleteMenuItem,
    FetchSnapshot, SaveSettings, SetMenuItemActive, UpdateBranch, UpdateCategory, UpdateMenuItem,
};
use crate::types::{CatalogError, CatalogResult};

fn establish_connection(
    pool: &SqlitePool,
) -> CatalogResult<PooledConnection<ConnectionManager<SqliteConnection>>> {
    pool.get()
        .map_err(|err| CatalogError::Storage(format!("failed to establish connection: {err}")))
}

fn require_name(name: &str) -> CatalogResult<()> {
    if name.trim().is_empty() {
        return Err(CatalogError::Validation("name must not be empty".to_owned()));
    }
    Ok(())
}

/// Write-side filter: a variant is only worth storing with a real name and
/// a positive price.
fn usable_variants(variants: Vec<Variant>) -> Vec<Variant> {
    variants
        .into_iter()
        .filter(|v| !v.name.trim().is_empty() && v.price > 0)
        .collect()
}

/// Read-side filter for legacy rows: malformed entries are dropped instead
/// of failing the whole snapshot.
fn sanitize_variants(raw: &str) -> Vec<Variant> {
    let parsed: Vec<Variant> = serde_json::from_str(raw).unwrap_or_default();
    parsed
        .into_iter()
        .filter(|v| !v.name.trim().is_empty() && v.price >= 0)
        .collect()
}

pub fn fetch_snapshot(conn: &mut SqliteConnection) -> CatalogResult<Snapshot> {
    let settings_row: Option<SettingsRow> = settings::table.first(conn).optional()?;
    let settings_row = settings_row
        .ok_or_else(|| CatalogError::Storage("settings row is missing".to_owned()))?;

    let branch_rows: Vec<Branch> = branches::table.order(branches::id.asc()).load(conn)?;

    let category_rows: Vec<Category> = categories::table
        .order((categories::sort_order.asc(), categories::id.asc()))
        .load(conn)?;

    let item_rows: Vec<MenuItemRow> = menu_items::table
        .order((menu_items::sort_order.asc(), menu_items::id.asc()))
        .load(conn)?;

    let pairs: Vec<(String, String)> = item_branches::table
        .select((item_branches::item_id, item_branches::branch_id))
        .order((item_branches::item_id.asc(), item_branches::branch_id.asc()))
        .load(conn)?;

    let mut assignments: HashMap<String, Vec<String>> = HashMap::new();
    for (item_id, branch_id) in pairs {
        assignments.entry(item_id).or_default().push(branch_id);
    }

    let items = item_rows
        .into_iter()
        .map(|row| MenuItemView {
            variants: sanitize_variants(&row.variants),
            branch_ids: assignments.remove(&row.id).unwrap_or_default(),
            id: row.id,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            category_id: row.category_id,
            is_active: row.is_active,
            sort_order: row.sort_order,
        })
        .collect();

    Ok(Snapshot {
        branches: branch_rows,
        categories: category_rows,
        items,
        settings: AppSettings::from(settings_row),
    })
}

pub fn create_branch(
    conn: &mut SqliteConnection,
    name: String,
    address: String,
    phone: String,
) -> CatalogResult<String> {
    require_name(&name)?;

    let branch = NewBranch {
        id: ids::next_id(),
        name,
        address,
        phone,
        is_active: true,
    };
    diesel::insert_into(branches::table)
        .values(&branch)
        .execute(conn)?;

    info!(id = %branch.id, "created branch");
    Ok(branch.id)
}

pub fn update_branch(
    conn: &mut SqliteConnection,
    id: String,
    name: String,
    address: String,
    phone: String,
    is_active: bool,
) -> CatalogResult<()> {
    require_name(&name)?;

    let updated = diesel::update(branches::table.find(&id))
        .set((
            branches::name.eq(&name),
            branches::address.eq(&address),
            branches::phone.eq(&phone),
            branches::is_active.eq(is_active),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(CatalogError::NotFound("branch"));
    }
    Ok(())
}

pub fn delete_branch(conn: &mut SqliteConnection, id: String) -> CatalogResult<()> {
    conn.immediate_transaction(|conn| {
        diesel::delete(item_branches::table.filter(item_branches::branch_id.eq(&id)))
            .execute(conn)?;
        let deleted = diesel::delete(branches::table.find(&id)).execute(conn)?;
        if deleted == 0 {
            return Err(CatalogError::NotFound("branch"));
        }
        info!(%id, "deleted branch and its assignments");
        Ok(())
    })
}

pub fn create_category(
    conn: &mut SqliteConnection,
    name: String,
    sort_order: i32,
) -> CatalogResult<String> {
    require_name(&name)?;

    let category = NewCategory {
        id: ids::next_id(),
        name,
        sort_order,
    };
    diesel::insert_into(categories::table)
        .values(&category)
        .execute(conn)?;

    info!(id = %category.id, "created category");
    Ok(category.id)
}

pub fn update_category(
    conn: &mut SqliteConnection,
    id: String,
    name: String,
) -> CatalogResult<()> {
    require_name(&name)?;

    let updated = diesel::update(categories::table.find(&id))
        .set(categories::name.eq(&name))
        .execute(conn)?;
    if updated == 0 {
        return Err(CatalogError::NotFound("category"));
    }
    Ok(())
}

/// Items referencing the category survive with a cleared reference; the
/// nullify and the row delete commit together or not at all.
pub fn delete_category(conn: &mut SqliteConnection, id: String) -> CatalogResult<()> {
    conn.immediate_transaction(|conn| {
        diesel::update(menu_items::table.filter(menu_items::category_id.eq(&id)))
            .set(menu_items::category_id.eq(None::<String>))
            .execute(conn)?;
        let deleted = diesel::delete(categories::table.find(&id)).execute(conn)?;
        if deleted == 0 {
            return Err(CatalogError::NotFound("category"));
        }
        info!(%id, "deleted category, references nullified");
        Ok(())
    })
}

pub fn create_menu_item(
    conn: &mut SqliteConnection,
    draft: MenuItemDraft,
) -> CatalogResult<String> {
    write_menu_item(conn, None, draft)
}

pub fn update_menu_item(
    conn: &mut SqliteConnection,
    id: String,
    draft: MenuItemDraft,
) -> CatalogResult<()> {
    write_menu_item(conn, Some(id), draft).map(|_| ())
}

/// One transaction per write: item row upsert, full delete of the old
/// assignment rows, insert of exactly the supplied branch ids. An update
/// omitting a previously assigned branch un-assigns it.
fn write_menu_item(
    conn: &mut SqliteConnection,
    id: Option<String>,
    draft: MenuItemDraft,
) -> CatalogResult<String> {
    require_name(&draft.name)?;

    let variants = usable_variants(draft.variants.clone());
    if variants.is_empty() {
        return Err(CatalogError::Validation(
            "a menu item needs at least one variant with a name and a positive price".to_owned(),
        ));
    }
    let variants_json =
        serde_json::to_string(&variants).map_err(|err| CatalogError::Storage(err.to_string()))?;

    let mut branch_ids = draft.branch_ids.clone();
    branch_ids.sort();
    branch_ids.dedup();

    conn.immediate_transaction(|conn| {
        if let Some(category_id) = &draft.category_id {
            let referenced: i64 = categories::table
                .filter(categories::id.eq(category_id))
                .count()
                .get_result(conn)?;
            if referenced == 0 {
                return Err(CatalogError::NotFound("category"));
            }
        }

        let item_id = match id {
            Some(id) => {
                let updated = diesel::update(menu_items::table.find(&id))
                    .set((
                        menu_items::name.eq(&draft.name),
                        menu_items::description.eq(&draft.description),
                        menu_items::image_url.eq(&draft.image_url),
                        menu_items::category_id.eq(draft.category_id.clone()),
                        menu_items::is_active.eq(draft.is_active),
                        menu_items::sort_order.eq(draft.sort_order),
                        menu_items::variants.eq(&variants_json),
                    ))
                    .execute(conn)?;
                if updated == 0 {
                    return Err(CatalogError::NotFound("menu item"));
                }
                info!(%id, "updated menu item");
                id
            }
            None => {
                let item = NewMenuItem {
                    id: ids::next_id(),
                    name: draft.name.clone(),
                    description: draft.description.clone(),
                    image_url: draft.image_url.clone(),
                    category_id: draft.category_id.clone(),
                    is_active: draft.is_active,
                    sort_order: draft.sort_order,
                    variants: variants_json.clone(),
                };
                diesel::insert_into(menu_items::table)
                    .values(&item)
                    .execute(conn)?;
                info!(id = %item.id, "created menu item");
                item.id
            }
        };

        diesel::delete(item_branches::table.filter(item_branches::item_id.eq(&item_id)))
            .execute(conn)?;
        for branch_id in &branch_ids {
            diesel::insert_into(item_branches::table)
                .values(ItemBranchPair {
                    item_id: item_id.clone(),
                    branch_id: branch_id.clone(),
                })
                .execute(conn)?;
        }

        Ok(item_id)
    })
}

pub fn delete_menu_item(conn: &mut SqliteConnection, id: String) -> CatalogResult<()> {
    // Assignment rows go with the item via the store's cascade rule.
    let deleted = diesel::delete(menu_items::table.find(&id)).execute(conn)?;
    if deleted == 0 {
        return Err(CatalogError::NotFound("menu item"));
    }
    info!(%id, "deleted menu item");
    Ok(())
}

pub fn set_menu_item_active(
    conn: &mut SqliteConnection,
    id: String,
    is_active: bool,
) -> CatalogResult<()> {
    let updated = diesel::update(menu_items::table.find(&id))
        .set(menu_items::is_active.eq(is_active))
        .execute(conn)?;
    if updated == 0 {
        return Err(CatalogError::NotFound("menu item"));
    }
    Ok(())
}

/// Full replace of the singleton settings row.
pub fn save_settings(conn: &mut SqliteConnection, new: AppSettings) -> CatalogResult<()> {
    diesel::replace_into(settings::table)
        .values(&NewSettings {
            id: 1,
            brand_name: new.brand_name,
            logo_url: new.logo_url,
            primary_color: new.primary_color,
            heading_color: new.heading_color,
            body_text_color: new.body_text_color,
            admin_password: new.admin_password,
        })
        .execute(conn)?;
    Ok(())
}

impl Handler<FetchSnapshot> for DbActor {
    type Result = CatalogResult<Snapshot>;

    fn handle(&mut self, _msg: FetchSnapshot, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;
        fetch_snapshot(&mut conn)
    }
}

impl Handler<CreateBranch> for DbActor {
    type Result = CatalogResult<String>;

    fn handle(&mut self, msg: CreateBranch, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;
        create_branch(&mut conn, msg.name, msg.address, msg.phone)
    }
}

impl Handler<UpdateBranch> for DbActor {
    type Result = CatalogResult<()>;

    fn handle(&mut self, msg: UpdateBranch, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;
        update_branch(&mut conn, msg.id, msg.name, msg.address, msg.phone, msg.is_active)
    }
}

impl Handler<DeleteBranch> for DbActor {
    type Result = CatalogResult<()>;

    fn handle(&mut self, msg: DeleteBranch, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;
        delete_branch(&mut conn, msg.0)
    }
}

impl Handler<CreateCategory> for DbActor {
    type Result = CatalogResult<String>;

    fn handle(&mut self, msg: CreateCategory, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;
        create_category(&mut conn, msg.name, msg.sort_order)
    }
}

impl Handler<UpdateCategory> for DbActor {
    type Result = CatalogResult<()>;

    fn handle(&mut self, msg: UpdateCategory, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;
        update_category(&mut conn, msg.id, msg.name)
    }
}

impl Handler<DeleteCategory> for DbActor {
    type Result = CatalogResult<()>;

    fn handle(&mut self, msg: DeleteCategory, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;
        delete_category(&mut conn, msg.0)
    }
}

impl Handler<CreateMenuItem> for DbActor {
    type Result = CatalogResult<String>;

    fn handle(&mut self, msg: CreateMenuItem, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;
        create_menu_item(&mut conn, msg.0)
    }
}

impl Handler<UpdateMenuItem> for DbActor {
    type Result = CatalogResult<()>;

    fn handle(&mut self, msg: UpdateMenuItem, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;
        update_menu_item(&mut conn, msg.id, msg.draft)
    }
}

impl Handler<DeleteMenuItem> for DbActor {
    type Result = CatalogResult<()>;

    fn handle(&mut self, msg: DeleteMenuItem, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;
        delete_menu_item(&mut conn, msg.0)
    }
}

impl Handler<SetMenuItemActive> for DbActor {
    type Result = CatalogResult<()>;

    fn handle(&mut self, msg: SetMenuItemActive, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;
        set_menu_item_active(&mut conn, msg.id, msg.is_active)
    }
}

impl Handler<SaveSettings> for DbActor {
    type Result = CatalogResult<()>;

    fn handle(&mut self, msg: SaveSettings, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;
        save_settings(&mut conn, msg.0)
    }
}
