use crate::{
    AppState,
    aggregate::aggregate,
    auth,
    error::ServiceError,
    models::{
        Article, ArticleInfo, ConfigEntry, CreateArticleRequest, CreateMenuRequest,
        CreateRoleRequest, CreateUserRequest, Menu, MenuInfo, Page, Role, RoleInfo,
        UpdateArticleRequest, UpdateConfigRequest, UpdateMenuRequest, UpdateRoleRequest,
        UpdateUserRequest, User, UserInfo,
    },
    policy::RuleKind,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Filter Structs ---

/// UserFilter
///
/// Query parameters for GET /sys/user: pagination plus an optional username
/// substring filter.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct UserFilter {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub username: Option<String>,
}

/// RoleFilter
///
/// Query parameters for GET /sys/role.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct RoleFilter {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub role_name: Option<String>,
}

/// ArticleFilter
///
/// Query parameters for GET /sys/article.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ArticleFilter {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub title: Option<String>,
    pub cate_id: Option<i64>,
}

/// ConfigKeyQuery
///
/// Query parameter for GET /sys/config: the unique `param_key`.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ConfigKeyQuery {
    pub key: String,
}

/// CreatedResponse
///
/// Minimal body returned by the create endpoints: the new record's id.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatedResponse {
    pub id: i64,
}

/// ConfigResponse
///
/// The get-by-key response. `param_value` is the raw string for
/// `value_type = 1` and a parsed JSON object for `value_type = 2`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct ConfigResponse {
    pub id: i64,
    pub param_key: String,
    pub remark: String,
    pub value_type: i64,
    pub param_value: Value,
}

/// Pagination arithmetic shared by the list handlers.
/// Returns (offset, page, limit) with page clamped to >= 1 and limit to 1..=100.
/// The offset saturates and stays within i64 range, so an absurd page number
/// yields an empty page rather than a panic or a negative bind.
fn page_setting(page: Option<u64>, limit: Option<u64>) -> (u64, u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1).saturating_mul(limit).min(i64::MAX as u64);
    (offset, page, limit)
}

// --- User Handlers ---

/// list_users
///
/// Page fetch in the gateway's descending-id order, then concurrent
/// projection to `UserInfo` via the aggregator. A projection failure aborts
/// the request; no success envelope is built around a partial page.
#[utoipa::path(
    get,
    path = "/sys/user",
    params(UserFilter),
    responses((status = 200, description = "Paged users"))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Page<UserInfo>>, ServiceError> {
    let (offset, page, limit) = page_setting(filter.page, filter.limit);
    let (users, total) = state
        .repo
        .get_user_page(filter.username, offset, limit)
        .await?;
    let list = aggregate(users, |u| u.id, |u| Ok(UserInfo::from(u))).await?;
    Ok(Json(Page::new(total, page, limit, list)))
}

/// get_user
///
/// Single-record fetch including the user's assigned role ids.
#[utoipa::path(
    get,
    path = "/sys/user/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses((status = 200, description = "Found", body = User))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ServiceError> {
    Ok(Json(state.repo.get_user(id).await?))
}

/// create_user
///
/// Duplicate-username guard, hash, insert, then exactly one user-policy
/// synchronization, after the write has committed and never before.
#[utoipa::path(
    post,
    path = "/sys/user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = CreatedResponse),
        (status = 409, description = "Username taken")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(mut payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServiceError> {
    if state.repo.user_exists(&payload.username, None).await? {
        return Err(ServiceError::Conflict);
    }
    payload.password = auth::hash_password(&payload.password);
    let id = state.repo.create_user(payload).await?;
    state.sync.sync_user_policy(id).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// update_user
///
/// A missing password leaves the stored hash untouched. The role-assignment
/// rules are rebuilt afterwards so the store reflects the new associations.
#[utoipa::path(
    put,
    path = "/sys/user",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Username taken")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Json(mut payload): Json<UpdateUserRequest>,
) -> Result<StatusCode, ServiceError> {
    if state
        .repo
        .user_exists(&payload.username, Some(payload.id))
        .await?
    {
        return Err(ServiceError::Conflict);
    }
    payload.password = payload
        .password
        .filter(|p| !p.is_empty())
        .map(|p| auth::hash_password(&p));
    let id = payload.id;
    state.repo.update_user(payload).await?;
    state.sync.sync_user_policy(id).await?;
    Ok(StatusCode::OK)
}

/// delete_user
///
/// The username is captured before the delete so the user's role-assignment
/// rules can be dropped from the policy store once the row is gone.
#[utoipa::path(
    delete,
    path = "/sys/user/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let user = state.repo.get_user(id).await?;
    state.repo.delete_user(id).await?;
    state
        .policy
        .remove_subject_rules(&user.username, RuleKind::RoleAssignment);
    Ok(StatusCode::NO_CONTENT)
}

// --- Role Handlers ---

/// list_roles
///
/// Paged role listing; menu ids ride along in each projection.
#[utoipa::path(
    get,
    path = "/sys/role",
    params(RoleFilter),
    responses((status = 200, description = "Paged roles"))
)]
pub async fn list_roles(
    State(state): State<AppState>,
    Query(filter): Query<RoleFilter>,
) -> Result<Json<Page<RoleInfo>>, ServiceError> {
    let (offset, page, limit) = page_setting(filter.page, filter.limit);
    let (roles, total) = state
        .repo
        .get_role_page(filter.role_name, offset, limit)
        .await?;
    let list = aggregate(roles, |r| r.id, |r| Ok(RoleInfo::from(r))).await?;
    Ok(Json(Page::new(total, page, limit, list)))
}

/// select_roles
///
/// Unpaged role listing used by the user form's role picker.
#[utoipa::path(
    get,
    path = "/sys/role/select",
    responses((status = 200, description = "All roles", body = [RoleInfo]))
)]
pub async fn select_roles(
    State(state): State<AppState>,
) -> Result<Json<Vec<RoleInfo>>, ServiceError> {
    let roles = state.repo.get_all_roles().await?;
    let list = aggregate(roles, |r| r.id, |r| Ok(RoleInfo::from(r))).await?;
    Ok(Json(list))
}

/// get_role
#[utoipa::path(
    get,
    path = "/sys/role/{id}",
    params(("id" = i64, Path, description = "Role ID")),
    responses((status = 200, description = "Found", body = Role))
)]
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Role>, ServiceError> {
    Ok(Json(state.repo.get_role(id).await?))
}

/// create_role
///
/// Duplicate-name guard, insert with menu associations, then one role-policy
/// synchronization to file the new role's permission grants.
#[utoipa::path(
    post,
    path = "/sys/role",
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Created", body = CreatedResponse),
        (status = 409, description = "Role name taken")
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServiceError> {
    if state.repo.role_exists(&payload.role_name, None).await? {
        return Err(ServiceError::Conflict);
    }
    let id = state.repo.create_role(payload).await?;
    state.sync.sync_role_policy(id).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// update_role
#[utoipa::path(
    put,
    path = "/sys/role",
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Role name taken")
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<StatusCode, ServiceError> {
    if state
        .repo
        .role_exists(&payload.role_name, Some(payload.id))
        .await?
    {
        return Err(ServiceError::Conflict);
    }
    let id = payload.id;
    state.repo.update_role(payload).await?;
    state.sync.sync_role_policy(id).await?;
    Ok(StatusCode::OK)
}

/// delete_role
///
/// Cascade contract: the gateway returns the users that held the role; each
/// one is resynchronized so the deleted role vanishes from their
/// role-assignment rules. The role's own grants are dropped by name.
#[utoipa::path(
    delete,
    path = "/sys/role/{id}",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let role = state.repo.get_role(id).await?;
    let affected_users = state.repo.delete_role(id).await?;
    state
        .policy
        .remove_subject_rules(&role.role_name, RuleKind::PermissionGrant);
    for user_id in affected_users {
        state.sync.sync_user_policy(user_id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- Menu Handlers ---

/// list_menus
///
/// Unpaged menu listing in `order_num` order, projected concurrently.
#[utoipa::path(
    get,
    path = "/sys/menu",
    responses((status = 200, description = "All menus", body = [MenuInfo]))
)]
pub async fn list_menus(
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuInfo>>, ServiceError> {
    let menus = state.repo.get_all_menus().await?;
    let list = aggregate(menus, |m| m.id, |m| Ok(MenuInfo::from(m))).await?;
    Ok(Json(list))
}

/// get_menu
#[utoipa::path(
    get,
    path = "/sys/menu/{id}",
    params(("id" = i64, Path, description = "Menu ID")),
    responses((status = 200, description = "Found", body = Menu))
)]
pub async fn get_menu(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Menu>, ServiceError> {
    Ok(Json(state.repo.get_menu(id).await?))
}

/// create_menu
///
/// A freshly created menu is attached to no role yet, so there is nothing
/// to synchronize.
#[utoipa::path(
    post,
    path = "/sys/menu",
    request_body = CreateMenuRequest,
    responses((status = 201, description = "Created", body = CreatedResponse))
)]
pub async fn create_menu(
    State(state): State<AppState>,
    Json(payload): Json<CreateMenuRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServiceError> {
    let id = state.repo.create_menu(payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// update_menu
///
/// A URL change invalidates the grants of every role carrying this menu;
/// the gateway reports those roles and each one is resynchronized.
#[utoipa::path(
    put,
    path = "/sys/menu",
    request_body = UpdateMenuRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_menu(
    State(state): State<AppState>,
    Json(payload): Json<UpdateMenuRequest>,
) -> Result<StatusCode, ServiceError> {
    let affected_roles = state.repo.update_menu(payload).await?;
    for role_id in affected_roles {
        state.sync.sync_role_policy(role_id).await?;
    }
    Ok(StatusCode::OK)
}

/// delete_menu
#[utoipa::path(
    delete,
    path = "/sys/menu/{id}",
    params(("id" = i64, Path, description = "Menu ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_menu(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let affected_roles = state.repo.delete_menu(id).await?;
    for role_id in affected_roles {
        state.sync.sync_role_policy(role_id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- Article Handlers ---

/// list_articles
#[utoipa::path(
    get,
    path = "/sys/article",
    params(ArticleFilter),
    responses((status = 200, description = "Paged articles"))
)]
pub async fn list_articles(
    State(state): State<AppState>,
    Query(filter): Query<ArticleFilter>,
) -> Result<Json<Page<ArticleInfo>>, ServiceError> {
    let (offset, page, limit) = page_setting(filter.page, filter.limit);
    let (articles, total) = state
        .repo
        .get_article_page(filter.title, filter.cate_id, offset, limit)
        .await?;
    let list = aggregate(articles, |a| a.id, |a| Ok(ArticleInfo::from(a))).await?;
    Ok(Json(Page::new(total, page, limit, list)))
}

/// get_article
#[utoipa::path(
    get,
    path = "/sys/article/{id}",
    params(("id" = i64, Path, description = "Article ID")),
    responses((status = 200, description = "Found", body = Article))
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Article>, ServiceError> {
    Ok(Json(state.repo.get_article(id).await?))
}

/// create_article
#[utoipa::path(
    post,
    path = "/sys/article",
    request_body = CreateArticleRequest,
    responses((status = 201, description = "Created", body = CreatedResponse))
)]
pub async fn create_article(
    State(state): State<AppState>,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServiceError> {
    let id = state.repo.create_article(payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// update_article
#[utoipa::path(
    put,
    path = "/sys/article",
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_article(
    State(state): State<AppState>,
    Json(payload): Json<UpdateArticleRequest>,
) -> Result<StatusCode, ServiceError> {
    state.repo.update_article(payload).await?;
    Ok(StatusCode::OK)
}

/// delete_article
#[utoipa::path(
    delete,
    path = "/sys/article/{id}",
    params(("id" = i64, Path, description = "Article ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.repo.delete_article(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Config Handlers ---

/// get_config
///
/// Fetch by `param_key`. Type-2 entries hold a JSON object in
/// `param_value`; it is parsed before the response is built so clients get
/// structure, not a string of JSON.
#[utoipa::path(
    get,
    path = "/sys/config",
    params(ConfigKeyQuery),
    responses(
        (status = 200, description = "Found", body = ConfigResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_config(
    State(state): State<AppState>,
    Query(query): Query<ConfigKeyQuery>,
) -> Result<Json<ConfigResponse>, ServiceError> {
    let entry: ConfigEntry = state.repo.get_config_by_key(&query.key).await?;
    let param_value = match entry.value_type {
        2 => serde_json::from_str(&entry.param_value).map_err(|e| {
            ServiceError::Internal(format!("config '{}' is not valid JSON: {e}", entry.param_key))
        })?,
        _ => Value::String(entry.param_value),
    };
    Ok(Json(ConfigResponse {
        id: entry.id,
        param_key: entry.param_key,
        remark: entry.remark,
        value_type: entry.value_type,
        param_value,
    }))
}

/// update_config
#[utoipa::path(
    put,
    path = "/sys/config",
    request_body = UpdateConfigRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_config(
    State(state): State<AppState>,
    Json(payload): Json<UpdateConfigRequest>,
) -> Result<StatusCode, ServiceError> {
    state.repo.update_config(payload).await?;
    Ok(StatusCode::OK)
}
