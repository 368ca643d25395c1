//! User management route handlers.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use tower_sessions::Session;
use tracing::instrument;

use prifam_core::AdminRole;

use crate::components::{Criteria, TableFilter, UserCriteria, UserQuery};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{AdminContext, RequireAdminAuth, set_flash, take_flash};
use crate::models::User;
use crate::services::{ActionKind, CreateUserForm, perform, validate_new_user};
use crate::state::AppState;

use super::{PageChrome, cancelled_or, render, render_with_status, today};

/// User list template.
#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersTemplate {
    pub chrome: PageChrome,
    pub filter_bar: Vec<TableFilter>,
    pub users: Vec<User>,
    pub total: usize,
}

/// Role choice on the create-user form.
#[derive(Debug, Clone)]
pub struct RoleOption {
    pub value: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub checked: bool,
}

/// Create-user form template. The password is never echoed back.
#[derive(Template)]
#[template(path = "users/create.html")]
pub struct CreateUserTemplate {
    pub chrome: PageChrome,
    pub name: String,
    pub email: String,
    pub roles: Vec<RoleOption>,
    pub active: bool,
    pub error: Option<String>,
}

impl CreateUserTemplate {
    fn new(ctx: &AdminContext, form: Option<&CreateUserForm>, error: Option<String>) -> Self {
        let selected = form.map_or("", |f| f.role.trim());
        Self {
            chrome: PageChrome::new(&ctx.admin, "/create-user", None),
            name: form.map(|f| f.name.clone()).unwrap_or_default(),
            email: form.map(|f| f.email.clone()).unwrap_or_default(),
            roles: AdminRole::ASSIGNABLE
                .iter()
                .map(|role| RoleOption {
                    value: role.slug(),
                    title: role.title(),
                    description: role.description(),
                    checked: role.slug() == selected,
                })
                .collect(),
            // A fresh form starts with the account active.
            active: form.is_none_or(|f| f.active.is_some()),
            error,
        }
    }
}

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user-management", get(user_list))
        .route("/create-user", get(create_user_page).post(create_user))
}

/// Filterable user list.
///
/// GET /user-management
#[instrument(skip_all)]
async fn user_list(
    RequireAdminAuth(ctx): RequireAdminAuth,
    session: Session,
    Query(query): Query<UserQuery>,
) -> Response {
    let criteria = match UserCriteria::from_query(&query) {
        Ok(criteria) => criteria,
        Err(e) => return e.into_response(),
    };
    let flash = take_flash(&session).await;

    let (users, total) = {
        let workspace = ctx.workspace.lock();
        let users: Vec<User> = criteria
            .apply(&workspace.users)
            .into_iter()
            .cloned()
            .collect();
        (users, workspace.users.len())
    };

    render(&UsersTemplate {
        chrome: PageChrome::new(&ctx.admin, "/user-management", flash),
        filter_bar: criteria.filters(),
        users,
        total,
    })
}

/// Create-user form.
///
/// GET /create-user
#[instrument(skip_all)]
async fn create_user_page(RequireAdminAuth(ctx): RequireAdminAuth) -> Response {
    render(&CreateUserTemplate::new(&ctx, None, None))
}

/// Create a user in the session workspace.
///
/// POST /create-user
#[instrument(skip_all, fields(email = %form.email))]
async fn create_user(
    State(state): State<AppState>,
    RequireAdminAuth(ctx): RequireAdminAuth,
    session: Session,
    Form(form): Form<CreateUserForm>,
) -> Response {
    let failed = |err: &AppError| {
        render_with_status(
            err.status(),
            &CreateUserTemplate::new(&ctx, Some(&form), Some(err.user_message())),
        )
    };

    let new_user = match validate_new_user(&form) {
        Ok(new_user) => new_user,
        Err(e) => return failed(&AppError::from(e)),
    };
    let name = new_user.name.clone();

    let created = perform(
        &ctx.workspace,
        ActionKind::CreateUser,
        state.config().latency.create_user,
        async { Ok(()) },
        move |ws, ()| Ok(ws.add_user(new_user, today())),
    )
    .await;

    match created {
        Ok(id) => {
            tracing::info!(user_id = %id, "User created");
            let message = format!("User {name} created.");
            if let Err(e) = set_flash(&session, &message).await {
                return AppError::from(e).into_response();
            }
            Redirect::to("/user-management").into_response()
        }
        Err(e) => cancelled_or(e, |e| failed(&e)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::CurrentAdmin;
    use crate::store::{ReferenceData, WorkspaceHandle, WorkspaceId};
    use crate::store::workspace::Workspace;

    fn context() -> AdminContext {
        let data = ReferenceData::seeded().unwrap();
        AdminContext {
            admin: CurrentAdmin {
                username: "admin".to_string(),
                role: AdminRole::Admin,
                workspace: WorkspaceId::new(),
            },
            workspace: WorkspaceHandle::new(Workspace::from_reference(&data)),
        }
    }

    #[test]
    fn test_fresh_form_defaults_to_active() {
        let page = CreateUserTemplate::new(&context(), None, None);
        assert!(page.active);
        assert_eq!(page.roles.len(), 3);
        assert!(page.roles.iter().all(|r| !r.checked));
    }

    #[test]
    fn test_rejected_form_echoes_fields() {
        let form = CreateUserForm {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password: "s3cr3t".to_string(),
            role: "agent".to_string(),
            active: None,
        };
        let page = CreateUserTemplate::new(&context(), Some(&form), Some("bad".to_string()));
        assert_eq!(page.name, "Asha");
        assert!(!page.active);
        assert!(page.roles.iter().any(|r| r.checked && r.value == "agent"));
        assert!(page.render().is_ok_and(|html| !html.contains("s3cr3t")));
    }
}
