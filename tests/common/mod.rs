#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use cladmin::error::ServiceError;
use cladmin::models::{
    Article, ConfigEntry, CreateArticleRequest, CreateMenuRequest, CreateRoleRequest,
    CreateUserRequest, Menu, Role, UpdateArticleRequest, UpdateConfigRequest, UpdateMenuRequest,
    UpdateRoleRequest, UpdateUserRequest, User,
};
use cladmin::policy::PolicyStore;
use cladmin::repository::Repository;
use cladmin::sync::PolicySynchronizer;
use cladmin::{AppConfig, AppState};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

/// In-memory `Repository` implementation backing the integration tests.
/// Associations mirror the join tables: `user_roles` holds
/// (user_id, role_id) pairs, a role's menus are resolved through its
/// `menu_ids` against the `menus` list.
#[derive(Default)]
pub struct MockRepo {
    pub users: Mutex<Vec<User>>,
    pub roles: Mutex<Vec<Role>>,
    pub menus: Mutex<Vec<Menu>>,
    pub user_roles: Mutex<Vec<(i64, i64)>>,
    pub articles: Mutex<Vec<Article>>,
    pub configs: Mutex<Vec<ConfigEntry>>,
    next_id: AtomicI64,
    /// When set, every gateway call fails with a store error. Used to
    /// exercise the abort-on-first-failure contract of the bulk loads.
    pub fail: AtomicBool,
}

impl MockRepo {
    pub fn new() -> Self {
        MockRepo {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), ServiceError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Store(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    pub fn seed_menu(&self, url: &str) -> i64 {
        let id = self.next_id();
        self.menus.lock().unwrap().push(Menu {
            id,
            parent_id: 0,
            name: format!("menu-{id}"),
            url: url.to_string(),
            menu_type: 1,
            icon: String::new(),
            order_num: id,
        });
        id
    }

    pub fn seed_role(&self, role_name: &str, menu_ids: Vec<i64>) -> i64 {
        let id = self.next_id();
        self.roles.lock().unwrap().push(Role {
            id,
            role_name: role_name.to_string(),
            remark: String::new(),
            create_user_id: 1,
            menu_ids,
            created_at: Utc::now(),
        });
        id
    }

    pub fn seed_user(&self, username: &str, role_ids: Vec<i64>) -> i64 {
        let id = self.next_id();
        self.users.lock().unwrap().push(User {
            id,
            username: username.to_string(),
            password: "hashed".to_string(),
            mobile: String::new(),
            email: format!("{username}@example.com"),
            status: 1,
            create_user_id: 1,
            role_ids: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        let mut assoc = self.user_roles.lock().unwrap();
        for role_id in role_ids {
            assoc.push((id, role_id));
        }
        id
    }

    /// Direct row access for assertions, bypassing the gateway contract.
    pub fn get_user_plain(&self, id: i64) -> User {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .expect("user not seeded")
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn get_user(&self, id: i64) -> Result<User, ServiceError> {
        self.check_failure()?;
        let mut user = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound)?;
        user.role_ids = self
            .user_roles
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, _)| *uid == id)
            .map(|(_, rid)| *rid)
            .collect();
        Ok(user)
    }

    async fn get_all_users(&self) -> Result<Vec<User>, ServiceError> {
        self.check_failure()?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn get_user_page(
        &self,
        username: Option<String>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<User>, u64), ServiceError> {
        self.check_failure()?;
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| match &username {
                Some(name) => u.username.contains(name.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        // Descending id order, like the real gateway.
        users.sort_by(|a, b| b.id.cmp(&a.id));
        let total = users.len() as u64;
        let page: Vec<User> = users
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn user_exists(
        &self,
        username: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, ServiceError> {
        self.check_failure()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.username == username && Some(u.id) != exclude_id))
    }

    async fn create_user(&self, req: CreateUserRequest) -> Result<i64, ServiceError> {
        self.check_failure()?;
        let id = self.next_id();
        self.users.lock().unwrap().push(User {
            id,
            username: req.username,
            password: req.password,
            mobile: req.mobile,
            email: req.email,
            status: req.status,
            create_user_id: req.create_user_id,
            role_ids: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        let mut assoc = self.user_roles.lock().unwrap();
        for role_id in req.role_ids {
            assoc.push((id, role_id));
        }
        Ok(id)
    }

    async fn update_user(&self, req: UpdateUserRequest) -> Result<(), ServiceError> {
        self.check_failure()?;
        {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id == req.id)
                .ok_or(ServiceError::NotFound)?;
            user.username = req.username;
            if let Some(password) = req.password {
                user.password = password;
            }
            user.mobile = req.mobile;
            user.email = req.email;
            user.status = req.status;
            user.updated_at = Utc::now();
        }
        let mut assoc = self.user_roles.lock().unwrap();
        assoc.retain(|(uid, _)| *uid != req.id);
        for role_id in req.role_ids {
            assoc.push((req.id, role_id));
        }
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), ServiceError> {
        self.check_failure()?;
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(ServiceError::NotFound);
        }
        self.user_roles.lock().unwrap().retain(|(uid, _)| *uid != id);
        Ok(())
    }

    async fn get_user_roles(&self, user_id: i64) -> Result<Vec<Role>, ServiceError> {
        self.check_failure()?;
        let role_ids: Vec<i64> = self
            .user_roles
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, rid)| *rid)
            .collect();
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|r| role_ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn get_role(&self, id: i64) -> Result<Role, ServiceError> {
        self.check_failure()?;
        self.roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    async fn get_all_roles(&self) -> Result<Vec<Role>, ServiceError> {
        self.check_failure()?;
        Ok(self.roles.lock().unwrap().clone())
    }

    async fn get_role_page(
        &self,
        role_name: Option<String>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Role>, u64), ServiceError> {
        self.check_failure()?;
        let mut roles: Vec<Role> = self
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|r| match &role_name {
                Some(name) => r.role_name.contains(name.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        roles.sort_by(|a, b| b.id.cmp(&a.id));
        let total = roles.len() as u64;
        let page: Vec<Role> = roles
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn role_exists(
        &self,
        role_name: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, ServiceError> {
        self.check_failure()?;
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.role_name == role_name && Some(r.id) != exclude_id))
    }

    async fn create_role(&self, req: CreateRoleRequest) -> Result<i64, ServiceError> {
        self.check_failure()?;
        let id = self.next_id();
        self.roles.lock().unwrap().push(Role {
            id,
            role_name: req.role_name,
            remark: req.remark,
            create_user_id: req.create_user_id,
            menu_ids: req.menu_ids,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn update_role(&self, req: UpdateRoleRequest) -> Result<(), ServiceError> {
        self.check_failure()?;
        let mut roles = self.roles.lock().unwrap();
        let role = roles
            .iter_mut()
            .find(|r| r.id == req.id)
            .ok_or(ServiceError::NotFound)?;
        role.role_name = req.role_name;
        role.remark = req.remark;
        role.menu_ids = req.menu_ids;
        Ok(())
    }

    async fn delete_role(&self, id: i64) -> Result<Vec<i64>, ServiceError> {
        self.check_failure()?;
        let mut roles = self.roles.lock().unwrap();
        let before = roles.len();
        roles.retain(|r| r.id != id);
        if roles.len() == before {
            return Err(ServiceError::NotFound);
        }
        let mut assoc = self.user_roles.lock().unwrap();
        let affected: Vec<i64> = assoc
            .iter()
            .filter(|(_, rid)| *rid == id)
            .map(|(uid, _)| *uid)
            .collect();
        assoc.retain(|(_, rid)| *rid != id);
        Ok(affected)
    }

    async fn get_role_menus(&self, role_id: i64) -> Result<Vec<Menu>, ServiceError> {
        self.check_failure()?;
        let menu_ids = self
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == role_id)
            .map(|r| r.menu_ids.clone())
            .ok_or(ServiceError::NotFound)?;
        Ok(self
            .menus
            .lock()
            .unwrap()
            .iter()
            .filter(|m| menu_ids.contains(&m.id))
            .cloned()
            .collect())
    }

    async fn get_menu(&self, id: i64) -> Result<Menu, ServiceError> {
        self.check_failure()?;
        self.menus
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    async fn get_all_menus(&self) -> Result<Vec<Menu>, ServiceError> {
        self.check_failure()?;
        Ok(self.menus.lock().unwrap().clone())
    }

    async fn create_menu(&self, req: CreateMenuRequest) -> Result<i64, ServiceError> {
        self.check_failure()?;
        let id = self.next_id();
        self.menus.lock().unwrap().push(Menu {
            id,
            parent_id: req.parent_id,
            name: req.name,
            url: req.url,
            menu_type: req.menu_type,
            icon: req.icon,
            order_num: req.order_num,
        });
        Ok(id)
    }

    async fn update_menu(&self, req: UpdateMenuRequest) -> Result<Vec<i64>, ServiceError> {
        self.check_failure()?;
        {
            let mut menus = self.menus.lock().unwrap();
            let menu = menus
                .iter_mut()
                .find(|m| m.id == req.id)
                .ok_or(ServiceError::NotFound)?;
            menu.parent_id = req.parent_id;
            menu.name = req.name;
            menu.url = req.url;
            menu.menu_type = req.menu_type;
            menu.icon = req.icon;
            menu.order_num = req.order_num;
        }
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.menu_ids.contains(&req.id))
            .map(|r| r.id)
            .collect())
    }

    async fn delete_menu(&self, id: i64) -> Result<Vec<i64>, ServiceError> {
        self.check_failure()?;
        let mut menus = self.menus.lock().unwrap();
        let before = menus.len();
        menus.retain(|m| m.id != id);
        if menus.len() == before {
            return Err(ServiceError::NotFound);
        }
        let mut roles = self.roles.lock().unwrap();
        let affected: Vec<i64> = roles
            .iter()
            .filter(|r| r.menu_ids.contains(&id))
            .map(|r| r.id)
            .collect();
        for role in roles.iter_mut() {
            role.menu_ids.retain(|mid| *mid != id);
        }
        Ok(affected)
    }

    async fn get_article(&self, id: i64) -> Result<Article, ServiceError> {
        self.check_failure()?;
        self.articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    async fn get_article_page(
        &self,
        title: Option<String>,
        cate_id: Option<i64>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Article>, u64), ServiceError> {
        self.check_failure()?;
        let mut articles: Vec<Article> = self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| match &title {
                Some(t) => a.title.contains(t.as_str()),
                None => true,
            })
            .filter(|a| match cate_id {
                Some(cate) => a.cate_id == cate,
                None => true,
            })
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.id.cmp(&a.id));
        let total = articles.len() as u64;
        let page: Vec<Article> = articles
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn create_article(&self, req: CreateArticleRequest) -> Result<i64, ServiceError> {
        self.check_failure()?;
        let id = self.next_id();
        self.articles.lock().unwrap().push(Article {
            id,
            user_id: req.user_id,
            cate_id: req.cate_id,
            title: req.title,
            thumb: req.thumb,
            content: req.content,
            release_time: Utc::now(),
        });
        Ok(id)
    }

    async fn update_article(&self, req: UpdateArticleRequest) -> Result<(), ServiceError> {
        self.check_failure()?;
        let mut articles = self.articles.lock().unwrap();
        let article = articles
            .iter_mut()
            .find(|a| a.id == req.id)
            .ok_or(ServiceError::NotFound)?;
        article.user_id = req.user_id;
        article.cate_id = req.cate_id;
        article.title = req.title;
        article.thumb = req.thumb;
        article.content = req.content;
        Ok(())
    }

    async fn delete_article(&self, id: i64) -> Result<(), ServiceError> {
        self.check_failure()?;
        let mut articles = self.articles.lock().unwrap();
        let before = articles.len();
        articles.retain(|a| a.id != id);
        if articles.len() == before {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    async fn get_config_by_key(&self, key: &str) -> Result<ConfigEntry, ServiceError> {
        self.check_failure()?;
        self.configs
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.param_key == key)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    async fn update_config(&self, req: UpdateConfigRequest) -> Result<(), ServiceError> {
        self.check_failure()?;
        let mut configs = self.configs.lock().unwrap();
        let entry = configs
            .iter_mut()
            .find(|c| c.id == req.id)
            .ok_or(ServiceError::NotFound)?;
        entry.param_key = req.param_key;
        entry.param_value = req.param_value;
        entry.value_type = req.value_type;
        entry.remark = req.remark;
        Ok(())
    }
}

/// Builds an `AppState` wired to a fresh mock repository. Returns the mock
/// alongside so tests can seed and inspect it directly.
pub fn test_state() -> (Arc<MockRepo>, AppState) {
    let repo = Arc::new(MockRepo::new());
    let policy = Arc::new(PolicyStore::new());
    let sync = Arc::new(PolicySynchronizer::new(repo.clone(), policy.clone()));
    let state = AppState {
        repo: repo.clone(),
        policy,
        sync,
        config: AppConfig::default(),
    };
    (repo, state)
}
