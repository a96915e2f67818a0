use diesel::Insertable;
use serde::Serialize;

use crate::schema::branches;
use crate::schema::categories;
use crate::schema::item_branches;
use crate::schema::menu_items;
use crate::schema::settings;

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = branches)]
pub struct NewBranch {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub is_active: bool,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = categories)]
pub struct NewCategory {
    pub id: String,
    pub name: String,
    pub sort_order: i32,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = menu_items)]
pub struct NewMenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub category_id: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub variants: String,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = item_branches)]
pub struct ItemBranchPair {
    pub item_id: String,
    pub branch_id: String,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = settings)]
pub struct NewSettings {
    pub id: i32,
    pub brand_name: String,
    pub logo_url: String,
    pub primary_color: String,
    pub heading_color: String,
    pub body_text_color: String,
    pub admin_password: Option<String>,
}
