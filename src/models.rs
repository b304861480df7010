use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

/// Timestamp rendering used by every `*Info` projection.
/// Matches the `YYYY-MM-DD HH:MM:SS` format the admin frontend expects.
pub fn format_time(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// A back-office account from the `sys_user` table. The password column
/// holds a hash, never plaintext, and is excluded from serialization.
/// `role_ids` comes from the `sys_user_role` join table and is filled in by
/// the repository after the row fetch.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub mobile: String,
    pub email: String,
    // 0 = disabled, 1 = active.
    pub status: i64,
    pub create_user_id: i64,
    #[sqlx(skip)]
    pub role_ids: Vec<i64>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// UserInfo
///
/// The list projection of a `User`: no password hash, timestamps rendered
/// as strings. Built concurrently by the list aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub mobile: String,
    pub email: String,
    pub status: i64,
    pub create_user_id: i64,
    pub create_time: String,
    pub update_time: String,
}

impl From<User> for UserInfo {
    fn from(u: User) -> Self {
        UserInfo {
            id: u.id,
            username: u.username,
            mobile: u.mobile,
            email: u.email,
            status: u.status,
            create_user_id: u.create_user_id,
            create_time: format_time(&u.created_at),
            update_time: format_time(&u.updated_at),
        }
    }
}

/// Role
///
/// A role from the `sys_role` table. `role_name` is the key under which the
/// policy store files this role's permission grants, so renaming a role
/// requires re-synchronization. `menu_ids` comes from `sys_role_menu`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Role {
    pub id: i64,
    pub role_name: String,
    pub remark: String,
    pub create_user_id: i64,
    #[sqlx(skip)]
    pub menu_ids: Vec<i64>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// RoleInfo
///
/// The list projection of a `Role`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct RoleInfo {
    pub id: i64,
    pub role_name: String,
    pub remark: String,
    pub menu_ids: Vec<i64>,
    pub create_user_id: i64,
    pub create_time: String,
}

impl From<Role> for RoleInfo {
    fn from(r: Role) -> Self {
        RoleInfo {
            id: r.id,
            role_name: r.role_name,
            remark: r.remark,
            menu_ids: r.menu_ids,
            create_user_id: r.create_user_id,
            create_time: format_time(&r.created_at),
        }
    }
}

/// Menu
///
/// A navigation/permission node from the `sys_menu` table. `url` doubles as
/// the permission string filed into the policy store; an empty `url` marks a
/// pure UI grouping with no enforceable permission.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Menu {
    pub id: i64,
    pub parent_id: i64,
    pub name: String,
    pub url: String,
    // 0 = directory, 1 = menu, 2 = button.
    pub menu_type: i64,
    pub icon: String,
    pub order_num: i64,
}

/// MenuInfo
///
/// The list projection of a `Menu`. Field-for-field today, but kept separate
/// so the list surface can diverge from the row shape without schema churn.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct MenuInfo {
    pub id: i64,
    pub parent_id: i64,
    pub name: String,
    pub url: String,
    pub menu_type: i64,
    pub icon: String,
    pub order_num: i64,
}

impl From<Menu> for MenuInfo {
    fn from(m: Menu) -> Self {
        MenuInfo {
            id: m.id,
            parent_id: m.parent_id,
            name: m.name,
            url: m.url,
            menu_type: m.menu_type,
            icon: m.icon,
            order_num: m.order_num,
        }
    }
}

/// Article
///
/// A CMS article from the `article` table.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Article {
    pub id: i64,
    pub user_id: i64,
    pub cate_id: i64,
    pub title: String,
    pub thumb: String,
    pub content: String,
    #[ts(type = "string")]
    pub release_time: DateTime<Utc>,
}

/// ArticleInfo
///
/// The list projection of an `Article`: drops the (potentially large)
/// `content` body.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct ArticleInfo {
    pub id: i64,
    pub user_id: i64,
    pub cate_id: i64,
    pub title: String,
    pub thumb: String,
    pub release_time: String,
}

impl From<Article> for ArticleInfo {
    fn from(a: Article) -> Self {
        ArticleInfo {
            id: a.id,
            user_id: a.user_id,
            cate_id: a.cate_id,
            title: a.title,
            thumb: a.thumb,
            release_time: format_time(&a.release_time),
        }
    }
}

/// ConfigEntry
///
/// A key/value system parameter from the `sys_config` table. `value_type`
/// selects how `param_value` is rendered by the get-by-key endpoint:
/// 1 = plain string, 2 = JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ConfigEntry {
    pub id: i64,
    pub param_key: String,
    pub param_value: String,
    pub value_type: i64,
    pub remark: String,
}

// --- Request Payloads (Input Schemas) ---

/// CreateUserRequest
///
/// Input payload for POST /sys/user. The password arrives in plaintext and
/// is hashed before it reaches the repository.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub mobile: String,
    pub email: String,
    pub status: i64,
    pub create_user_id: i64,
    pub role_ids: Vec<i64>,
}

/// UpdateUserRequest
///
/// Input payload for PUT /sys/user. A `None` password leaves the stored
/// hash untouched.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateUserRequest {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub mobile: String,
    pub email: String,
    pub status: i64,
    pub role_ids: Vec<i64>,
}

/// CreateRoleRequest
///
/// Input payload for POST /sys/role. `menu_ids` drives both the
/// `sys_role_menu` join rows and the subsequent policy synchronization.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateRoleRequest {
    pub role_name: String,
    pub remark: String,
    pub create_user_id: i64,
    pub menu_ids: Vec<i64>,
}

/// UpdateRoleRequest
///
/// Input payload for PUT /sys/role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateRoleRequest {
    pub id: i64,
    pub role_name: String,
    pub remark: String,
    pub menu_ids: Vec<i64>,
}

/// CreateMenuRequest
///
/// Input payload for POST /sys/menu.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateMenuRequest {
    pub parent_id: i64,
    pub name: String,
    pub url: String,
    pub menu_type: i64,
    pub icon: String,
    pub order_num: i64,
}

/// UpdateMenuRequest
///
/// Input payload for PUT /sys/menu. Changing `url` invalidates the grants of
/// every role holding this menu, so the handler resynchronizes them all.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateMenuRequest {
    pub id: i64,
    pub parent_id: i64,
    pub name: String,
    pub url: String,
    pub menu_type: i64,
    pub icon: String,
    pub order_num: i64,
}

/// CreateArticleRequest
///
/// Input payload for POST /sys/article. `release_time` is stamped
/// server-side at insertion.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateArticleRequest {
    pub user_id: i64,
    pub cate_id: i64,
    pub title: String,
    pub thumb: String,
    pub content: String,
}

/// UpdateArticleRequest
///
/// Input payload for PUT /sys/article.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateArticleRequest {
    pub id: i64,
    pub user_id: i64,
    pub cate_id: i64,
    pub title: String,
    pub thumb: String,
    pub content: String,
}

/// UpdateConfigRequest
///
/// Input payload for PUT /sys/config.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateConfigRequest {
    pub id: i64,
    pub param_key: String,
    pub param_value: String,
    pub value_type: i64,
    pub remark: String,
}

// --- Response Envelopes ---

/// Page
///
/// The pagination envelope returned by every list endpoint: the gateway's
/// total row count plus the requested page of projections, in the gateway's
/// sort order.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct Page<T: TS> {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub list: Vec<T>,
}

impl<T: TS> Page<T> {
    pub fn new(total: u64, page: u64, limit: u64, list: Vec<T>) -> Self {
        Page {
            total,
            page,
            limit,
            list,
        }
    }
}
