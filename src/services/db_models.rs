use diesel::Queryable;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub is_active: bool,
}

#[derive(Queryable, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub sort_order: i32,
}

/// A named price point of a menu item. Variants have no identity of their
/// own; the whole list lives embedded in the item row as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub price: i64,
}

/// Raw item row as stored; `variants` is the JSON-encoded list.
#[derive(Queryable, Debug, Clone)]
pub struct MenuItemRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub category_id: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub variants: String,
}

/// Denormalized item as served to read clients: assignments resolved,
/// variants parsed and sanitized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub category_id: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub variants: Vec<Variant>,
    pub branch_ids: Vec<String>,
}

#[derive(Queryable, Debug, Clone)]
pub struct SettingsRow {
    pub id: i32,
    pub brand_name: String,
    pub logo_url: String,
    pub primary_color: String,
    pub heading_color: String,
    pub body_text_color: String,
    pub admin_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub brand_name: String,
    pub logo_url: String,
    pub primary_color: String,
    pub heading_color: String,
    pub body_text_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
}

impl From<SettingsRow> for AppSettings {
    fn from(row: SettingsRow) -> Self {
        AppSettings {
            brand_name: row.brand_name,
            logo_url: row.logo_url,
            primary_color: row.primary_color,
            heading_color: row.heading_color,
            body_text_color: row.body_text_color,
            admin_password: row.admin_password,
        }
    }
}

/// Everything a write call may set on a menu item. `branch_ids` is the full
/// replacement set of assignments, not a delta.
#[derive(Debug, Clone)]
pub struct MenuItemDraft {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub category_id: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub branch_ids: Vec<String>,
    pub variants: Vec<Variant>,
}

/// The full denormalized read model of the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub branches: Vec<Branch>,
    pub categories: Vec<Category>,
    pub items: Vec<MenuItemView>,
    pub settings: AppSettings,
}
