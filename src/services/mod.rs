use actix_web::{get, HttpResponse, Responder};

use crate::types::CatalogError;

pub mod bootstrap;
pub mod catalog;
pub mod db_models;
pub mod db_utils;
pub mod ids;
pub mod insertable;
pub mod messages;

#[get("/")]
pub async fn home_page() -> impl Responder {
    HttpResponse::Ok().body("Lazzat menu service")
}

#[get("/health")]
pub async fn healthcheck() -> impl Responder {
    HttpResponse::Ok().body("I'm alive!")
}

pub(crate) fn error_response(err: &CatalogError) -> HttpResponse {
    let body = err.to_string();
    match err {
        CatalogError::Validation(_) => HttpResponse::BadRequest().json(body),
        CatalogError::NotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

pub(crate) fn default_true() -> bool {
    true
}

// sub-route "/api"
pub mod menu_route {
    use actix_web::web::Data;
    use actix_web::{get, HttpResponse, Responder};

    use crate::services::db_utils::AppState;
    use crate::services::messages::FetchSnapshot;

    #[get("/all-data")]
    pub async fn fetch_all_data(state: Data<AppState>) -> impl Responder {
        match state.db.send(FetchSnapshot).await {
            Ok(Ok(snapshot)) => HttpResponse::Ok().json(snapshot),
            Ok(Err(err)) => super::error_response(&err),
            Err(err) => HttpResponse::InternalServerError()
                .json(format!("Unable to reach catalog service: {err}")),
        }
    }
}

// sub-route "/api/branches"
pub mod branches_route {
    use actix_web::web::{Data, Json, Path};
    use actix_web::{delete, post, put, HttpResponse, Responder};
    use serde::Deserialize;

    use crate::services::db_utils::AppState;
    use crate::services::messages::{CreateBranch, DeleteBranch, UpdateBranch};

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateBranchBody {
        pub name: String,
        #[serde(default)]
        pub address: String,
        #[serde(default)]
        pub phone: String,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UpdateBranchBody {
        pub name: String,
        #[serde(default)]
        pub address: String,
        #[serde(default)]
        pub phone: String,
        #[serde(default = "crate::services::default_true")]
        pub is_active: bool,
    }

    #[post("/add")]
    pub async fn add_branch(state: Data<AppState>, body: Json<CreateBranchBody>) -> impl Responder {
        let body = body.into_inner();
        match state
            .db
            .send(CreateBranch {
                name: body.name,
                address: body.address,
                phone: body.phone,
            })
            .await
        {
            Ok(Ok(id)) => HttpResponse::Ok().json(id),
            Ok(Err(err)) => super::error_response(&err),
            Err(err) => HttpResponse::InternalServerError()
                .json(format!("Unable to reach catalog service: {err}")),
        }
    }

    #[put("/{id}")]
    pub async fn update_branch(
        state: Data<AppState>,
        path: Path<String>,
        body: Json<UpdateBranchBody>,
    ) -> impl Responder {
        let body = body.into_inner();
        match state
            .db
            .send(UpdateBranch {
                id: path.into_inner(),
                name: body.name,
                address: body.address,
                phone: body.phone,
                is_active: body.is_active,
            })
            .await
        {
            Ok(Ok(())) => HttpResponse::Ok().json("Branch updated"),
            Ok(Err(err)) => super::error_response(&err),
            Err(err) => HttpResponse::InternalServerError()
                .json(format!("Unable to reach catalog service: {err}")),
        }
    }

    #[delete("/{id}")]
    pub async fn delete_branch(state: Data<AppState>, path: Path<String>) -> impl Responder {
        match state.db.send(DeleteBranch(path.into_inner())).await {
            Ok(Ok(())) => HttpResponse::Ok().json("Branch deleted"),
            Ok(Err(err)) => super::error_response(&err),
            Err(err) => HttpResponse::InternalServerError()
                .json(format!("Unable to reach catalog service: {err}")),
        }
    }
}

// sub-route "/api/categories"
pub mod categories_route {
    use actix_web::web::{Data, Json, Path};
    use actix_web::{delete, post, put, HttpResponse, Responder};
    use serde::Deserialize;

    use crate::services::db_utils::AppState;
    use crate::services::messages::{CreateCategory, DeleteCategory, UpdateCategory};

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateCategoryBody {
        pub name: String,
        #[serde(default)]
        pub sort_order: i32,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UpdateCategoryBody {
        pub name: String,
    }

    #[post("/add")]
    pub async fn add_category(
        state: Data<AppState>,
        body: Json<CreateCategoryBody>,
    ) -> impl Responder {
        let body = body.into_inner();
        match state
            .db
            .send(CreateCategory {
                name: body.name,
                sort_order: body.sort_order,
            })
            .await
        {
            Ok(Ok(id)) => HttpResponse::Ok().json(id),
            Ok(Err(err)) => super::error_response(&err),
            Err(err) => HttpResponse::InternalServerError()
                .json(format!("Unable to reach catalog service: {err}")),
        }
    }

    #[put("/{id}")]
    pub async fn update_category(
        state: Data<AppState>,
        path: Path<String>,
        body: Json<UpdateCategoryBody>,
    ) -> impl Responder {
        match state
            .db
            .send(UpdateCategory {
                id: path.into_inner(),
                name: body.into_inner().name,
            })
            .await
        {
            Ok(Ok(())) => HttpResponse::Ok().json("Category updated"),
            Ok(Err(err)) => super::error_response(&err),
            Err(err) => HttpResponse::InternalServerError()
                .json(format!("Unable to reach catalog service: {err}")),
        }
    }

    #[delete("/{id}")]
    pub async fn delete_category(state: Data<AppState>, path: Path<String>) -> impl Responder {
        match state.db.send(DeleteCategory(path.into_inner())).await {
            Ok(Ok(())) => HttpResponse::Ok().json("Category deleted"),
            Ok(Err(err)) => super::error_response(&err),
            Err(err) => HttpResponse::InternalServerError()
                .json(format!("Unable to reach catalog service: {err}")),
        }
    }
}

// sub-route "/api/items"
pub mod items_route {
    use actix_web::web::{Data, Json, Path};
    use actix_web::{delete, post, put, HttpResponse, Responder};
    use serde::Deserialize;

    use crate::services::db_models::{MenuItemDraft, Variant};
    use crate::services::db_utils::AppState;
    use crate::services::messages::{
        CreateMenuItem, DeleteMenuItem, SetMenuItemActive, UpdateMenuItem,
    };

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MenuItemBody {
        pub name: String,
        #[serde(default)]
        pub description: String,
        #[serde(default)]
        pub image_url: String,
        #[serde(default)]
        pub category_id: Option<String>,
        #[serde(default = "crate::services::default_true")]
        pub is_active: bool,
        #[serde(default)]
        pub sort_order: i32,
        #[serde(default)]
        pub branch_ids: Vec<String>,
        #[serde(default)]
        pub variants: Vec<Variant>,
    }

    impl From<MenuItemBody> for MenuItemDraft {
        fn from(body: MenuItemBody) -> Self {
            MenuItemDraft {
                name: body.name,
                description: body.description,
                image_url: body.image_url,
                category_id: body.category_id,
                is_active: body.is_active,
                sort_order: body.sort_order,
                branch_ids: body.branch_ids,
                variants: body.variants,
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ActiveBody {
        pub is_active: bool,
    }

    #[post("/add")]
    pub async fn add_item(state: Data<AppState>, body: Json<MenuItemBody>) -> impl Responder {
        match state.db.send(CreateMenuItem(body.into_inner().into())).await {
            Ok(Ok(id)) => HttpResponse::Ok().json(id),
            Ok(Err(err)) => super::error_response(&err),
            Err(err) => HttpResponse::InternalServerError()
                .json(format!("Unable to reach catalog service: {err}")),
        }
    }

    #[put("/{id}")]
    pub async fn update_item(
        state: Data<AppState>,
        path: Path<String>,
        body: Json<MenuItemBody>,
    ) -> impl Responder {
        match state
            .db
            .send(UpdateMenuItem {
                id: path.into_inner(),
                draft: body.into_inner().into(),
            })
            .await
        {
            Ok(Ok(())) => HttpResponse::Ok().json("Menu item updated"),
            Ok(Err(err)) => super::error_response(&err),
            Err(err) => HttpResponse::InternalServerError()
                .json(format!("Unable to reach catalog service: {err}")),
        }
    }

    #[put("/{id}/active")]
    pub async fn set_item_active(
        state: Data<AppState>,
        path: Path<String>,
        body: Json<ActiveBody>,
    ) -> impl Responder {
        match state
            .db
            .send(SetMenuItemActive {
                id: path.into_inner(),
                is_active: body.is_active,
            })
            .await
        {
            Ok(Ok(())) => HttpResponse::Ok().json("Menu item visibility updated"),
            Ok(Err(err)) => super::error_response(&err),
            Err(err) => HttpResponse::InternalServerError()
                .json(format!("Unable to reach catalog service: {err}")),
        }
    }

    #[delete("/{id}")]
    pub async fn delete_item(state: Data<AppState>, path: Path<String>) -> impl Responder {
        match state.db.send(DeleteMenuItem(path.into_inner())).await {
            Ok(Ok(())) => HttpResponse::Ok().json("Menu item deleted"),
            Ok(Err(err)) => super::error_response(&err),
            Err(err) => HttpResponse::InternalServerError()
                .json(format!("Unable to reach catalog service: {err}")),
        }
    }
}

// sub-route "/api/settings"
pub mod settings_route {
    use actix_web::web::{Data, Json};
    use actix_web::{put, HttpResponse, Responder};

    use crate::services::db_models::AppSettings;
    use crate::services::db_utils::AppState;
    use crate::services::messages::SaveSettings;

    #[put("/settings")]
    pub async fn save_settings(state: Data<AppState>, body: Json<AppSettings>) -> impl Responder {
        match state.db.send(SaveSettings(body.into_inner())).await {
            Ok(Ok(())) => HttpResponse::Ok().json("Settings saved"),
            Ok(Err(err)) => super::error_response(&err),
            Err(err) => HttpResponse::InternalServerError()
                .json(format!("Unable to reach catalog service: {err}")),
        }
    }
}
