use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// The back-office CRUD surface, nested under /sys. Every mutation of a
/// user or role (and of menus, transitively) runs through a handler that
/// triggers the matching policy synchronization after the persistence write
/// commits; the routing table itself stays dumb.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- Users ---
        // GET /sys/user?page=&limit=&username=
        // Paged listing, concurrently projected, order preserved.
        .route(
            "/user",
            get(handlers::list_users)
                .post(handlers::create_user)
                .put(handlers::update_user),
        )
        .route(
            "/user/{id}",
            get(handlers::get_user).delete(handlers::delete_user),
        )
        // --- Roles ---
        .route(
            "/role",
            get(handlers::list_roles)
                .post(handlers::create_role)
                .put(handlers::update_role),
        )
        // GET /sys/role/select
        // Unpaged role list for the user form's role picker.
        .route("/role/select", get(handlers::select_roles))
        .route(
            "/role/{id}",
            get(handlers::get_role).delete(handlers::delete_role),
        )
        // --- Menus ---
        .route(
            "/menu",
            get(handlers::list_menus)
                .post(handlers::create_menu)
                .put(handlers::update_menu),
        )
        .route(
            "/menu/{id}",
            get(handlers::get_menu).delete(handlers::delete_menu),
        )
        // --- Articles ---
        .route(
            "/article",
            get(handlers::list_articles)
                .post(handlers::create_article)
                .put(handlers::update_article),
        )
        .route(
            "/article/{id}",
            get(handlers::get_article).delete(handlers::delete_article),
        )
        // --- System Config ---
        // GET /sys/config?key=
        .route(
            "/config",
            get(handlers::get_config).put(handlers::update_config),
        )
}
