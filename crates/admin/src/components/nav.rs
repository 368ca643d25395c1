//! Role-based navigation menu.

use serde::Serialize;

use prifam_core::AdminRole;

/// One sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    /// Phosphor icon class.
    pub icon: &'static str,
    pub active: bool,
}

impl NavItem {
    const fn new(label: &'static str, path: &'static str, icon: &'static str) -> Self {
        Self {
            label,
            path,
            icon,
            active: false,
        }
    }
}

/// A labelled sidebar section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavMenu {
    pub group_label: &'static str,
    pub items: Vec<NavItem>,
}

impl NavMenu {
    /// Mark the entry whose path equals `current_path` as active.
    #[must_use]
    pub fn with_active(mut self, current_path: &str) -> Self {
        for item in &mut self.items {
            item.active = item.path == current_path;
        }
        self
    }
}

/// Menu for a role. Only super admins get the super-admin menu.
#[must_use]
pub fn menu_for(role: AdminRole) -> NavMenu {
    if role.is_super_admin() {
        NavMenu {
            group_label: "Super Admin",
            items: vec![
                NavItem::new("Dashboard", "/super-admin", "ph ph-gauge"),
                NavItem::new("Admin Management", "/admin-management", "ph ph-shield-check"),
                NavItem::new("User Management", "/user-management", "ph ph-users"),
                NavItem::new("Site Configuration", "/configuration", "ph ph-sliders"),
                NavItem::new("Settings", "/settings", "ph ph-gear"),
            ],
        }
    } else {
        NavMenu {
            group_label: "Main",
            items: vec![
                NavItem::new("Dashboard", "/dashboard", "ph ph-gauge"),
                NavItem::new("Reviews", "/reviews", "ph ph-chat-circle-text"),
                NavItem::new("Upload", "/upload", "ph ph-upload-simple"),
                NavItem::new("User Management", "/user-management", "ph ph-users"),
                NavItem::new("Site Configuration", "/configuration", "ph ph-sliders"),
                NavItem::new("Settings", "/settings", "ph ph-gear"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(menu: &NavMenu) -> Vec<&str> {
        menu.items.iter().map(|i| i.path).collect()
    }

    #[test]
    fn test_admin_menu() {
        let menu = menu_for(AdminRole::Admin);
        assert_eq!(menu.group_label, "Main");
        assert_eq!(
            paths(&menu),
            [
                "/dashboard",
                "/reviews",
                "/upload",
                "/user-management",
                "/configuration",
                "/settings"
            ]
        );
    }

    #[test]
    fn test_super_admin_menu() {
        let menu = menu_for(AdminRole::SuperAdmin);
        assert_eq!(menu.group_label, "Super Admin");
        assert_eq!(
            paths(&menu),
            [
                "/super-admin",
                "/admin-management",
                "/user-management",
                "/configuration",
                "/settings"
            ]
        );
    }

    #[test]
    fn test_other_roles_get_admin_menu() {
        assert_eq!(menu_for(AdminRole::Viewer), menu_for(AdminRole::Admin));
        assert_eq!(menu_for(AdminRole::Agent), menu_for(AdminRole::Admin));
    }

    #[test]
    fn test_active_marking() {
        let menu = menu_for(AdminRole::Admin).with_active("/reviews");
        let active: Vec<&str> = menu.items.iter().filter(|i| i.active).map(|i| i.label).collect();
        assert_eq!(active, ["Reviews"]);

        let menu = menu_for(AdminRole::Admin).with_active("/nowhere");
        assert!(menu.items.iter().all(|i| !i.active));
    }
}
