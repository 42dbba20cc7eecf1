// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Navigation menu filtered by role.

use serde::{Deserialize, Serialize};

use super::evaluator::can_access;
use super::table::PolicyTable;
use crate::session::Session;

/// One entry of the navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    /// Stable identifier
    pub id: String,
    /// Text shown to the user
    pub label: String,
    /// Where the entry navigates to
    pub path: String,
    /// Policy table identifier deciding who sees the entry
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// Leaf node governed by `menu:<id>`.
    pub fn new(id: &str, label: &str, path: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            path: path.to_string(),
            resource_id: format!("menu:{id}"),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<MenuNode>) -> Self {
        self.children = children;
        self
    }
}

/// Keep the nodes `session` may access, filtering children the same way.
///
/// A hidden node hides its whole subtree; an allowed node is kept even when
/// none of its children survive.
pub fn filter_menu(session: &Session, table: &PolicyTable, nodes: &[MenuNode]) -> Vec<MenuNode> {
    nodes
        .iter()
        .filter(|node| can_access(session, table, &node.resource_id).is_allowed())
        .map(|node| MenuNode {
            children: filter_menu(session, table, &node.children),
            ..node.clone()
        })
        .collect()
}

/// Menu of the workload application; pairs with [`PolicyTable::academic`].
pub fn academic_menu() -> Vec<MenuNode> {
    vec![
        MenuNode::new("home", "Home", "/"),
        MenuNode::new("subjects", "Subjects", "/subjects").with_children(vec![
            MenuNode::new("subjects-list", "Subject list", "/subjects"),
            MenuNode::new("subjects-create", "Create subject", "/subjects/create"),
        ]),
        MenuNode::new("terms", "Academic terms", "/terms"),
        MenuNode::new("course-status", "Course status", "/course-status"),
        MenuNode::new("my-subjects", "My subjects", "/my-subjects"),
        MenuNode::new("dashboard", "Dashboard", "/dashboard"),
        MenuNode::new("role-management", "Permissions", "/permissions"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::testing::token_for;
    use crate::auth::Role;

    fn session(roles: &[&str]) -> Session {
        Session::from_token(token_for("u_6401", roles, 3600), None).unwrap()
    }

    fn ids(nodes: &[MenuNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.id.as_str()).collect()
    }

    fn node(id: &str, resource_id: &str) -> MenuNode {
        MenuNode {
            resource_id: resource_id.to_string(),
            ..MenuNode::new(id, id, "/")
        }
    }

    #[test]
    fn parent_kept_with_only_permitted_children() {
        let table = PolicyTable::builder()
            .allow("menu:parent", &[Role::AcademicOfficer])
            .allow("menu:child-prof", &[Role::Professor])
            .allow("menu:child-officer", &[Role::AcademicOfficer])
            .build()
            .unwrap();
        let menu = vec![node("parent", "menu:parent").with_children(vec![
            node("child-prof", "menu:child-prof"),
            node("child-officer", "menu:child-officer"),
        ])];

        let filtered = filter_menu(&session(&["Academic Officer"]), &table, &menu);

        assert_eq!(ids(&filtered), vec!["parent"]);
        assert_eq!(ids(&filtered[0].children), vec!["child-officer"]);
    }

    #[test]
    fn hidden_parent_never_promotes_children() {
        let table = PolicyTable::builder()
            .allow("menu:parent", &[Role::AcademicOfficer])
            .allow("menu:child", &[Role::Professor])
            .build()
            .unwrap();
        let menu = vec![node("parent", "menu:parent").with_children(vec![node("child", "menu:child")])];

        assert!(filter_menu(&session(&["Professor"]), &table, &menu).is_empty());
    }

    #[test]
    fn allowed_parent_without_surviving_children_is_kept() {
        let table = PolicyTable::builder()
            .allow("menu:parent", &[Role::Student])
            .allow("menu:child", &[Role::Professor])
            .build()
            .unwrap();
        let menu = vec![node("parent", "menu:parent").with_children(vec![node("child", "menu:child")])];

        let filtered = filter_menu(&session(&["Student"]), &table, &menu);
        assert_eq!(ids(&filtered), vec!["parent"]);
        assert!(filtered[0].children.is_empty());
    }

    #[test]
    fn input_menu_is_not_modified() {
        let table = PolicyTable::academic();
        let menu = academic_menu();
        let _ = filter_menu(&session(&["Student"]), &table, &menu);
        assert_eq!(menu, academic_menu());
    }

    #[test]
    fn academic_menu_per_role() {
        let table = PolicyTable::academic();
        let menu = academic_menu();

        let officer = filter_menu(&session(&["Academic Officer"]), &table, &menu);
        assert_eq!(
            ids(&officer),
            vec![
                "home",
                "subjects",
                "terms",
                "course-status",
                "my-subjects",
                "dashboard",
                "role-management"
            ]
        );
        assert_eq!(ids(&officer[1].children), vec!["subjects-list", "subjects-create"]);

        let professor = filter_menu(&session(&["Professor"]), &table, &menu);
        assert_eq!(ids(&professor), vec!["home", "course-status", "my-subjects"]);

        let student = filter_menu(&session(&["Student"]), &table, &menu);
        assert_eq!(ids(&student), vec!["home"]);

        assert!(filter_menu(&Session::empty(), &table, &menu).is_empty());
    }

    #[test]
    fn every_academic_menu_node_has_a_policy_entry() {
        fn check(table: &PolicyTable, nodes: &[MenuNode]) {
            for node in nodes {
                assert!(table.resolve(&node.resource_id).is_some(), "{}", node.resource_id);
                check(table, &node.children);
            }
        }
        check(&PolicyTable::academic(), &academic_menu());
    }
}
