//! Action resolution: `?action=<name>` plus the HTTP method picks one
//! operation on one endpoint.
//!
//! When `action` is absent the method decides: GET with an `id` is `get`,
//! GET without is `list` (`overview` on the dashboard), POST is `create`
//! (`register` for members), PUT/PATCH is `update`, DELETE is `delete`.

use std::fmt;

use axum::http::Method;

use super::error::ApiError;

/// Top-level endpoints under `/api`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Members,
    Events,
    Blogs,
    Dashboard,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Members => "members",
            Self::Events => "events",
            Self::Blogs => "blogs",
            Self::Dashboard => "dashboard",
        }
    }
}

/// Every operation the router can reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RegisterMember,
    ListMembers,
    GetMember,
    CheckEmail,
    UpdateMember,
    DeleteMember,

    CreateEvent,
    ListEvents,
    GetEvent,
    UpdateEvent,
    DeleteEvent,

    CreateBlog,
    ListBlogs,
    GetBlog,
    UpdateBlog,
    DeleteBlog,

    DashboardStats,
    DashboardDepartments,
    DashboardRecent,
    DashboardOverview,
}

/// Methods an action accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accepts {
    Read,
    Create,
    Update,
    Remove,
}

impl Accepts {
    fn allows(self, method: &Method) -> bool {
        match self {
            Self::Read => method == Method::GET || method == Method::HEAD,
            Self::Create => method == Method::POST,
            Self::Update => method == Method::PUT || method == Method::PATCH,
            Self::Remove => method == Method::DELETE,
        }
    }

    fn allow_header(self) -> &'static str {
        match self {
            Self::Read => "GET, HEAD",
            Self::Create => "POST",
            Self::Update => "PUT, PATCH",
            Self::Remove => "DELETE",
        }
    }
}

/// (endpoint, action name, action). Several names may map to one action.
const ACTIONS: &[(Endpoint, &str, Action)] = &[
    (Endpoint::Members, "register", Action::RegisterMember),
    (Endpoint::Members, "create", Action::RegisterMember),
    (Endpoint::Members, "list", Action::ListMembers),
    (Endpoint::Members, "get", Action::GetMember),
    (Endpoint::Members, "check-email", Action::CheckEmail),
    (Endpoint::Members, "update", Action::UpdateMember),
    (Endpoint::Members, "delete", Action::DeleteMember),
    (Endpoint::Events, "create", Action::CreateEvent),
    (Endpoint::Events, "list", Action::ListEvents),
    (Endpoint::Events, "get", Action::GetEvent),
    (Endpoint::Events, "update", Action::UpdateEvent),
    (Endpoint::Events, "delete", Action::DeleteEvent),
    (Endpoint::Blogs, "create", Action::CreateBlog),
    (Endpoint::Blogs, "list", Action::ListBlogs),
    (Endpoint::Blogs, "get", Action::GetBlog),
    (Endpoint::Blogs, "update", Action::UpdateBlog),
    (Endpoint::Blogs, "delete", Action::DeleteBlog),
    (Endpoint::Dashboard, "stats", Action::DashboardStats),
    (Endpoint::Dashboard, "departments", Action::DashboardDepartments),
    (Endpoint::Dashboard, "recent", Action::DashboardRecent),
    (Endpoint::Dashboard, "overview", Action::DashboardOverview),
];

impl Action {
    fn accepts(self) -> Accepts {
        match self {
            Self::RegisterMember | Self::CreateEvent | Self::CreateBlog => Accepts::Create,
            Self::UpdateMember | Self::UpdateEvent | Self::UpdateBlog => Accepts::Update,
            Self::DeleteMember | Self::DeleteEvent | Self::DeleteBlog => Accepts::Remove,
            Self::ListMembers
            | Self::GetMember
            | Self::CheckEmail
            | Self::ListEvents
            | Self::GetEvent
            | Self::ListBlogs
            | Self::GetBlog
            | Self::DashboardStats
            | Self::DashboardDepartments
            | Self::DashboardRecent
            | Self::DashboardOverview => Accepts::Read,
        }
    }

    /// Canonical action name
    pub fn name(self) -> &'static str {
        ACTIONS
            .iter()
            .find(|(_, _, action)| *action == self)
            .map(|(_, name, _)| *name)
            .unwrap_or("unknown")
    }

    /// Resolve the action for a request.
    pub fn resolve(
        endpoint: Endpoint,
        method: &Method,
        action: Option<&str>,
        has_id: bool,
    ) -> Result<Self, ApiError> {
        let name = match action.map(str::trim).filter(|a| !a.is_empty()) {
            Some(explicit) => explicit.to_lowercase(),
            None => default_action(endpoint, method, has_id)
                .ok_or_else(|| ApiError::MethodNotAllowed {
                    action: "(default)".to_string(),
                    method: method.to_string(),
                    allow: "GET, HEAD, POST, PUT, PATCH, DELETE",
                })?
                .to_string(),
        };

        let resolved = ACTIONS
            .iter()
            .find(|(e, n, _)| *e == endpoint && *n == name)
            .map(|(_, _, action)| *action)
            .ok_or_else(|| ApiError::UnknownAction {
                endpoint: endpoint.as_str(),
                action: name.clone(),
            })?;

        let accepts = resolved.accepts();
        if !accepts.allows(method) {
            return Err(ApiError::MethodNotAllowed {
                action: name,
                method: method.to_string(),
                allow: accepts.allow_header(),
            });
        }
        Ok(resolved)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_action(endpoint: Endpoint, method: &Method, has_id: bool) -> Option<&'static str> {
    match *method {
        Method::GET | Method::HEAD => Some(match (endpoint, has_id) {
            (Endpoint::Dashboard, _) => "overview",
            (_, true) => "get",
            (_, false) => "list",
        }),
        Method::POST => Some(match endpoint {
            Endpoint::Members => "register",
            _ => "create",
        }),
        Method::PUT | Method::PATCH => Some("update"),
        Method::DELETE => Some("delete"),
        _ => None,
    }
}
