use actix::Message;

use crate::services::db_models::{AppSettings, MenuItemDraft, Snapshot};
use crate::types::CatalogResult;

#[derive(Message)]
#[rtype(result = "CatalogResult<Snapshot>")]
pub struct FetchSnapshot;

#[derive(Message)]
#[rtype(result = "CatalogResult<String>")]
pub struct CreateBranch {
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Message)]
#[rtype(result = "CatalogResult<()>")]
pub struct UpdateBranch {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub is_active: bool,
}

#[derive(Message)]
#[rtype(result = "CatalogResult<()>")]
pub struct DeleteBranch(pub String);

#[derive(Message)]
#[rtype(result = "CatalogResult<String>")]
pub struct CreateCategory {
    pub name: String,
    pub sort_order: i32,
}

#[derive(Message)]
#[rtype(result = "CatalogResult<()>")]
pub struct UpdateCategory {
    pub id: String,
    pub name: String,
}

#[derive(Message)]
#[rtype(result = "CatalogResult<()>")]
pub struct DeleteCategory(pub String);

#[derive(Message)]
#[rtype(result = "CatalogResult<String>")]
pub struct CreateMenuItem(pub MenuItemDraft);

#[derive(Message)]
#[rtype(result = "CatalogResult<()>")]
pub struct UpdateMenuItem {
    pub id: String,
    pub draft: MenuItemDraft,
}

#[derive(Message)]
#[rtype(result = "CatalogResult<()>")]
pub struct DeleteMenuItem(pub String);

#[derive(Message)]
#[rtype(result = "CatalogResult<()>")]
pub struct SetMenuItemActive {
    pub id: String,
    pub is_active: bool,
}

#[derive(Message)]
#[rtype(result = "CatalogResult<()>")]
pub struct SaveSettings(pub AppSettings);
