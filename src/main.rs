// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Command-line front for the access layer.
//!
//! ```text
//! workload-access login <username> <password>
//! workload-access logout
//! workload-access <path>...
//! ```
//!
//! The last form prints the guard outcome for each path using the stored
//! session.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::error;
use workload_access::{
    auth::HttpAuthService,
    config::AccessConfig,
    guard::{GuardOutcome, RouteGuard},
    logging,
    policy::{academic_menu, filter_menu, PolicyTable},
    session::{FileStorage, SessionStore},
};

const USAGE: &str = "usage: workload-access login <username> <password> | logout | <path>...";

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AccessConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(config.log_format) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let auth = match HttpAuthService::new(&config.api_base_url, config.http_timeout) {
        Ok(auth) => auth,
        Err(e) => {
            error!(error = %e, "Failed to build authentication client");
            return ExitCode::FAILURE;
        }
    };
    let store = SessionStore::new(auth, FileStorage::new(&config.session_dir));
    let policy = Arc::new(PolicyTable::academic());
    let guard = RouteGuard::new(store.subscribe(), policy.clone());

    let session = store.initialize();
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["login", username, password] => match store.login(username, password).await {
            Ok(session) => {
                let roles: Vec<_> = session.roles().iter().map(|r| r.as_str()).collect();
                println!(
                    "Signed in as {} ({})",
                    session.subject_id().unwrap_or("unknown"),
                    roles.join(", ")
                );
                for node in filter_menu(&session, &policy, &academic_menu()) {
                    println!("  {} -> {}", node.label, node.path);
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Login failed: {e}");
                ExitCode::FAILURE
            }
        },
        ["logout"] => {
            store.logout().await;
            println!("Signed out");
            ExitCode::SUCCESS
        }
        [] => {
            eprintln!("{USAGE}");
            ExitCode::FAILURE
        }
        paths => {
            println!(
                "Session: {}",
                if session.is_authenticated() { "signed in" } else { "signed out" }
            );
            for path in paths {
                let outcome = match guard.check(path) {
                    GuardOutcome::Render => "render".to_string(),
                    GuardOutcome::Pending => "pending".to_string(),
                    redirect => format!("redirect {}", redirect.location().unwrap_or_default()),
                };
                println!("{path}: {outcome}");
            }
            ExitCode::SUCCESS
        }
    }
}
