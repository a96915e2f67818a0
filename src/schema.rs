diesel::table! {
    branches (id) {
        id -> Text,
        name -> Text,
        address -> Text,
        phone -> Text,
        is_active -> Bool,
    }
}

diesel::table! {
    categories (id) {
        id -> Text,
        name -> Text,
        sort_order -> Integer,
    }
}

diesel::table! {
    menu_items (id) {
        id -> Text,
        name -> Text,
        description -> Text,
        image_url -> Text,
        category_id -> Nullable<Text>,
        is_active -> Bool,
        sort_order -> Integer,
        variants -> Text,
    }
}

diesel::table! {
    item_branches (item_id, branch_id) {
        item_id -> Text,
        branch_id -> Text,
    }
}

diesel::table! {
    settings (id) {
        id -> Integer,
        brand_name -> Text,
        logo_url -> Text,
        primary_color -> Text,
        heading_color -> Text,
        body_text_color -> Text,
        admin_password -> Nullable<Text>,
    }
}

diesel::joinable!(menu_items -> categories (category_id));
diesel::joinable!(item_branches -> menu_items (item_id));
diesel::joinable!(item_branches -> branches (branch_id));

diesel::allow_tables_to_appear_in_same_query!(
    branches,
    categories,
    item_branches,
    menu_items,
    settings,
);
