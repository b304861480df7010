use crate::error::ServiceError;
use crate::models::{
    Article, ConfigEntry, CreateArticleRequest, CreateMenuRequest, CreateRoleRequest,
    CreateUserRequest, Menu, Role, UpdateArticleRequest, UpdateConfigRequest, UpdateMenuRequest,
    UpdateRoleRequest, UpdateUserRequest, User,
};
use async_trait::async_trait;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::sync::Arc;

/// Repository Trait
///
/// The persistence gateway contract: record-by-id fetch, filtered page
/// fetch, unique-name existence checks, insert/update/delete, and the
/// association reads the policy synchronizer depends on. Handlers and the
/// synchronizer only ever see this trait, so tests substitute an in-memory
/// implementation.
///
/// Deletes return the ids of *other* subjects whose policy rules the caller
/// must resynchronize: deleting a role yields the users that held it,
/// mutating a menu yields the roles that carry it.
///
/// **Send + Sync + async_trait** make the trait object (`Arc<dyn Repository>`)
/// shareable across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn get_user(&self, id: i64) -> Result<User, ServiceError>;
    async fn get_all_users(&self) -> Result<Vec<User>, ServiceError>;
    // Page fetch: optional username substring filter, descending id order.
    async fn get_user_page(
        &self,
        username: Option<String>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<User>, u64), ServiceError>;
    // Existence check for the duplicate-name guard; `exclude_id` skips the
    // record being edited.
    async fn user_exists(
        &self,
        username: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, ServiceError>;
    // The password in `req` must already be hashed by the caller.
    async fn create_user(&self, req: CreateUserRequest) -> Result<i64, ServiceError>;
    async fn update_user(&self, req: UpdateUserRequest) -> Result<(), ServiceError>;
    async fn delete_user(&self, id: i64) -> Result<(), ServiceError>;
    // Roles currently assigned to the user (for role-assignment sync).
    async fn get_user_roles(&self, user_id: i64) -> Result<Vec<Role>, ServiceError>;

    // --- Roles ---
    async fn get_role(&self, id: i64) -> Result<Role, ServiceError>;
    async fn get_all_roles(&self) -> Result<Vec<Role>, ServiceError>;
    async fn get_role_page(
        &self,
        role_name: Option<String>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Role>, u64), ServiceError>;
    async fn role_exists(
        &self,
        role_name: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, ServiceError>;
    async fn create_role(&self, req: CreateRoleRequest) -> Result<i64, ServiceError>;
    async fn update_role(&self, req: UpdateRoleRequest) -> Result<(), ServiceError>;
    /// Deletes the role and its associations; returns the ids of the users
    /// that held it so their role-assignment rules can be rebuilt.
    async fn delete_role(&self, id: i64) -> Result<Vec<i64>, ServiceError>;
    // Menus currently associated with the role (for permission-grant sync).
    async fn get_role_menus(&self, role_id: i64) -> Result<Vec<Menu>, ServiceError>;

    // --- Menus ---
    async fn get_menu(&self, id: i64) -> Result<Menu, ServiceError>;
    async fn get_all_menus(&self) -> Result<Vec<Menu>, ServiceError>;
    async fn create_menu(&self, req: CreateMenuRequest) -> Result<i64, ServiceError>;
    /// Returns the ids of the roles carrying this menu; their grants are
    /// stale once the URL changes.
    async fn update_menu(&self, req: UpdateMenuRequest) -> Result<Vec<i64>, ServiceError>;
    async fn delete_menu(&self, id: i64) -> Result<Vec<i64>, ServiceError>;

    // --- Articles ---
    async fn get_article(&self, id: i64) -> Result<Article, ServiceError>;
    async fn get_article_page(
        &self,
        title: Option<String>,
        cate_id: Option<i64>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Article>, u64), ServiceError>;
    async fn create_article(&self, req: CreateArticleRequest) -> Result<i64, ServiceError>;
    async fn update_article(&self, req: UpdateArticleRequest) -> Result<(), ServiceError>;
    async fn delete_article(&self, id: i64) -> Result<(), ServiceError>;

    // --- System Config ---
    async fn get_config_by_key(&self, key: &str) -> Result<ConfigEntry, ServiceError>;
    async fn update_config(&self, req: UpdateConfigRequest) -> Result<(), ServiceError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by
/// PostgreSQL. Associations (user↔role, role↔menu) live in join tables and
/// are written inside one transaction with the parent row.
pub struct PostgresRepository {
    pool: PgPool,
}

const USER_COLUMNS: &str =
    "id, username, password, mobile, email, status, create_user_id, created_at, updated_at";
const ROLE_COLUMNS: &str = "id, role_name, remark, create_user_id, created_at";
const MENU_COLUMNS: &str = "id, parent_id, name, url, menu_type, icon, order_num";
const ARTICLE_COLUMNS: &str = "id, user_id, cate_id, title, thumb, content, release_time";

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user(&self, id: i64) -> Result<User, ServiceError> {
        let mut user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM sys_user WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound)?;

        user.role_ids =
            sqlx::query_scalar::<_, i64>("SELECT role_id FROM sys_user_role WHERE user_id = $1")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;
        Ok(user)
    }

    async fn get_all_users(&self) -> Result<Vec<User>, ServiceError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM sys_user ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// get_user_page
    ///
    /// Filtered page fetch using QueryBuilder for safe parameterization.
    /// The descending id order here is the authoritative order the list
    /// aggregator must preserve.
    async fn get_user_page(
        &self,
        username: Option<String>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<User>, u64), ServiceError> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM sys_user WHERE 1=1"));
        let mut count_builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM sys_user WHERE 1=1");

        if let Some(name) = username {
            let pattern = format!("%{}%", name);
            builder.push(" AND username ILIKE ");
            builder.push_bind(pattern.clone());
            count_builder.push(" AND username ILIKE ");
            count_builder.push_bind(pattern);
        }

        builder.push(" ORDER BY id DESC LIMIT ");
        builder.push_bind(limit as i64);
        builder.push(" OFFSET ");
        builder.push_bind(offset as i64);

        let users = builder.build_query_as::<User>().fetch_all(&self.pool).await?;
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok((users, total as u64))
    }

    async fn user_exists(
        &self,
        username: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, ServiceError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sys_user WHERE username = $1 AND ($2::bigint IS NULL OR id <> $2))",
        )
        .bind(username)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create_user(&self, req: CreateUserRequest) -> Result<i64, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO sys_user (username, password, mobile, email, status, create_user_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) RETURNING id",
        )
        .bind(&req.username)
        .bind(&req.password)
        .bind(&req.mobile)
        .bind(&req.email)
        .bind(req.status)
        .bind(req.create_user_id)
        .fetch_one(&mut *tx)
        .await?;

        for role_id in &req.role_ids {
            sqlx::query("INSERT INTO sys_user_role (user_id, role_id) VALUES ($1, $2)")
                .bind(id)
                .bind(role_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(id)
    }

    /// update_user
    ///
    /// COALESCE keeps the stored hash when no new password was supplied.
    /// Role associations are replaced wholesale inside the transaction.
    async fn update_user(&self, req: UpdateUserRequest) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE sys_user SET username = $2, password = COALESCE($3::varchar, password), \
             mobile = $4, email = $5, status = $6, updated_at = NOW() WHERE id = $1",
        )
        .bind(req.id)
        .bind(&req.username)
        .bind(&req.password)
        .bind(&req.mobile)
        .bind(&req.email)
        .bind(req.status)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }

        sqlx::query("DELETE FROM sys_user_role WHERE user_id = $1")
            .bind(req.id)
            .execute(&mut *tx)
            .await?;
        for role_id in &req.role_ids {
            sqlx::query("INSERT INTO sys_user_role (user_id, role_id) VALUES ($1, $2)")
                .bind(req.id)
                .bind(role_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM sys_user_role WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM sys_user WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get_user_roles(&self, user_id: i64) -> Result<Vec<Role>, ServiceError> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT r.id, r.role_name, r.remark, r.create_user_id, r.created_at \
             FROM sys_role r JOIN sys_user_role ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 ORDER BY r.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    async fn get_role(&self, id: i64) -> Result<Role, ServiceError> {
        let mut role = sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM sys_role WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound)?;

        role.menu_ids =
            sqlx::query_scalar::<_, i64>("SELECT menu_id FROM sys_role_menu WHERE role_id = $1")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;
        Ok(role)
    }

    async fn get_all_roles(&self) -> Result<Vec<Role>, ServiceError> {
        let mut roles = sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM sys_role ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        for role in roles.iter_mut() {
            role.menu_ids = sqlx::query_scalar::<_, i64>(
                "SELECT menu_id FROM sys_role_menu WHERE role_id = $1",
            )
            .bind(role.id)
            .fetch_all(&self.pool)
            .await?;
        }
        Ok(roles)
    }

    async fn get_role_page(
        &self,
        role_name: Option<String>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Role>, u64), ServiceError> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {ROLE_COLUMNS} FROM sys_role WHERE 1=1"));
        let mut count_builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM sys_role WHERE 1=1");

        if let Some(name) = role_name {
            let pattern = format!("%{}%", name);
            builder.push(" AND role_name ILIKE ");
            builder.push_bind(pattern.clone());
            count_builder.push(" AND role_name ILIKE ");
            count_builder.push_bind(pattern);
        }

        builder.push(" ORDER BY id DESC LIMIT ");
        builder.push_bind(limit as i64);
        builder.push(" OFFSET ");
        builder.push_bind(offset as i64);

        let mut roles = builder.build_query_as::<Role>().fetch_all(&self.pool).await?;
        for role in roles.iter_mut() {
            role.menu_ids = sqlx::query_scalar::<_, i64>(
                "SELECT menu_id FROM sys_role_menu WHERE role_id = $1",
            )
            .bind(role.id)
            .fetch_all(&self.pool)
            .await?;
        }
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok((roles, total as u64))
    }

    async fn role_exists(
        &self,
        role_name: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, ServiceError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sys_role WHERE role_name = $1 AND ($2::bigint IS NULL OR id <> $2))",
        )
        .bind(role_name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create_role(&self, req: CreateRoleRequest) -> Result<i64, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO sys_role (role_name, remark, create_user_id, created_at) \
             VALUES ($1, $2, $3, NOW()) RETURNING id",
        )
        .bind(&req.role_name)
        .bind(&req.remark)
        .bind(req.create_user_id)
        .fetch_one(&mut *tx)
        .await?;

        for menu_id in &req.menu_ids {
            sqlx::query("INSERT INTO sys_role_menu (role_id, menu_id) VALUES ($1, $2)")
                .bind(id)
                .bind(menu_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(id)
    }

    async fn update_role(&self, req: UpdateRoleRequest) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("UPDATE sys_role SET role_name = $2, remark = $3 WHERE id = $1")
            .bind(req.id)
            .bind(&req.role_name)
            .bind(&req.remark)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }

        sqlx::query("DELETE FROM sys_role_menu WHERE role_id = $1")
            .bind(req.id)
            .execute(&mut *tx)
            .await?;
        for menu_id in &req.menu_ids {
            sqlx::query("INSERT INTO sys_role_menu (role_id, menu_id) VALUES ($1, $2)")
                .bind(req.id)
                .bind(menu_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// delete_role
    ///
    /// Collects the holders *before* the delete so the caller can rebuild
    /// their role-assignment rules after the commit.
    async fn delete_role(&self, id: i64) -> Result<Vec<i64>, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let affected_users =
            sqlx::query_scalar::<_, i64>("SELECT user_id FROM sys_user_role WHERE role_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM sys_user_role WHERE role_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM sys_role_menu WHERE role_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM sys_role WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        tx.commit().await?;
        Ok(affected_users)
    }

    async fn get_role_menus(&self, role_id: i64) -> Result<Vec<Menu>, ServiceError> {
        let menus = sqlx::query_as::<_, Menu>(
            "SELECT m.id, m.parent_id, m.name, m.url, m.menu_type, m.icon, m.order_num \
             FROM sys_menu m JOIN sys_role_menu rm ON rm.menu_id = m.id \
             WHERE rm.role_id = $1 ORDER BY m.order_num, m.id",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(menus)
    }

    async fn get_menu(&self, id: i64) -> Result<Menu, ServiceError> {
        sqlx::query_as::<_, Menu>(&format!("SELECT {MENU_COLUMNS} FROM sys_menu WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    async fn get_all_menus(&self) -> Result<Vec<Menu>, ServiceError> {
        let menus = sqlx::query_as::<_, Menu>(&format!(
            "SELECT {MENU_COLUMNS} FROM sys_menu ORDER BY order_num, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(menus)
    }

    async fn create_menu(&self, req: CreateMenuRequest) -> Result<i64, ServiceError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO sys_menu (parent_id, name, url, menu_type, icon, order_num) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(req.parent_id)
        .bind(&req.name)
        .bind(&req.url)
        .bind(req.menu_type)
        .bind(&req.icon)
        .bind(req.order_num)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update_menu(&self, req: UpdateMenuRequest) -> Result<Vec<i64>, ServiceError> {
        let result = sqlx::query(
            "UPDATE sys_menu SET parent_id = $2, name = $3, url = $4, menu_type = $5, \
             icon = $6, order_num = $7 WHERE id = $1",
        )
        .bind(req.id)
        .bind(req.parent_id)
        .bind(&req.name)
        .bind(&req.url)
        .bind(req.menu_type)
        .bind(&req.icon)
        .bind(req.order_num)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }

        let affected_roles =
            sqlx::query_scalar::<_, i64>("SELECT role_id FROM sys_role_menu WHERE menu_id = $1")
                .bind(req.id)
                .fetch_all(&self.pool)
                .await?;
        Ok(affected_roles)
    }

    async fn delete_menu(&self, id: i64) -> Result<Vec<i64>, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let affected_roles =
            sqlx::query_scalar::<_, i64>("SELECT role_id FROM sys_role_menu WHERE menu_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM sys_role_menu WHERE menu_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM sys_menu WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        tx.commit().await?;
        Ok(affected_roles)
    }

    async fn get_article(&self, id: i64) -> Result<Article, ServiceError> {
        sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM article WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound)
    }

    async fn get_article_page(
        &self,
        title: Option<String>,
        cate_id: Option<i64>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Article>, u64), ServiceError> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {ARTICLE_COLUMNS} FROM article WHERE 1=1"));
        let mut count_builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM article WHERE 1=1");

        if let Some(t) = title {
            let pattern = format!("%{}%", t);
            builder.push(" AND title ILIKE ");
            builder.push_bind(pattern.clone());
            count_builder.push(" AND title ILIKE ");
            count_builder.push_bind(pattern);
        }
        if let Some(cate) = cate_id {
            builder.push(" AND cate_id = ");
            builder.push_bind(cate);
            count_builder.push(" AND cate_id = ");
            count_builder.push_bind(cate);
        }

        builder.push(" ORDER BY id DESC LIMIT ");
        builder.push_bind(limit as i64);
        builder.push(" OFFSET ");
        builder.push_bind(offset as i64);

        let articles = builder
            .build_query_as::<Article>()
            .fetch_all(&self.pool)
            .await?;
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok((articles, total as u64))
    }

    async fn create_article(&self, req: CreateArticleRequest) -> Result<i64, ServiceError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO article (user_id, cate_id, title, thumb, content, release_time) \
             VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING id",
        )
        .bind(req.user_id)
        .bind(req.cate_id)
        .bind(&req.title)
        .bind(&req.thumb)
        .bind(&req.content)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update_article(&self, req: UpdateArticleRequest) -> Result<(), ServiceError> {
        let result = sqlx::query(
            "UPDATE article SET user_id = $2, cate_id = $3, title = $4, thumb = $5, content = $6 \
             WHERE id = $1",
        )
        .bind(req.id)
        .bind(req.user_id)
        .bind(req.cate_id)
        .bind(&req.title)
        .bind(&req.thumb)
        .bind(&req.content)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    async fn delete_article(&self, id: i64) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM article WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    async fn get_config_by_key(&self, key: &str) -> Result<ConfigEntry, ServiceError> {
        sqlx::query_as::<_, ConfigEntry>(
            "SELECT id, param_key, param_value, value_type, remark FROM sys_config WHERE param_key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound)
    }

    async fn update_config(&self, req: UpdateConfigRequest) -> Result<(), ServiceError> {
        let result = sqlx::query(
            "UPDATE sys_config SET param_key = $2, param_value = $3, value_type = $4, remark = $5 \
             WHERE id = $1",
        )
        .bind(req.id)
        .bind(&req.param_key)
        .bind(&req.param_value)
        .bind(req.value_type)
        .bind(&req.remark)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }
}
