//! Auth subcommands: login, logout, register, status.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};
use std::sync::Arc;

use farmgate_client::types::NewAccount;
use farmgate_client::{ApiClient, ApiError};
use farmgate_core::role::Role;
use farmgate_core::session::SessionStore;

/// Auth subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Log in as a customer or farmer.
    Login {
        /// Account email.
        #[arg(short, long)]
        email: String,
        /// Password.
        #[arg(short, long)]
        password: String,
    },
    /// Log in against the admin credential table.
    AdminLogin {
        /// Admin email.
        #[arg(short, long)]
        email: String,
        /// Password.
        #[arg(short, long)]
        password: String,
    },
    /// Create a customer or farmer account.
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Account role: customer or farmer.
        #[arg(short, long)]
        role: Role,
        #[arg(short, long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Drop the stored session.
    Logout,
    /// Show the stored session without touching the network.
    Status,
    /// Verify the stored token against the server.
    Check,
}

/// Execute an auth subcommand.
pub async fn run(
    action: AuthAction,
    client: &Arc<ApiClient>,
    session: &Arc<SessionStore>,
) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        AuthAction::Login { email, password } => {
            login(client, &email, &password, false).await?;
        }
        AuthAction::AdminLogin { email, password } => {
            login(client, &email, &password, true).await?;
        }
        AuthAction::Register {
            email,
            password,
            role,
            name,
            phone,
            address,
        } => {
            if role == Role::Admin {
                anyhow::bail!("admin accounts cannot be self-registered");
            }
            let ack = client
                .register(&NewAccount {
                    email,
                    password,
                    user_type: role.as_str().into(),
                    name,
                    phone,
                    address,
                })
                .await?;
            writeln!(out, "{}", ack.message)?;
        }
        AuthAction::Logout => {
            session.clear();
            writeln!(out, "Logged out")?;
        }
        AuthAction::Status => match session.current() {
            Some(s) => {
                writeln!(out, "Logged in as user {} ({})", s.user_id, s.role)?;
            }
            None => writeln!(out, "Not logged in")?,
        },
        AuthAction::Check => {
            let identity = client.check_auth().await?;
            writeln!(
                out,
                "Token valid: {} <{}> ({})",
                identity.name, identity.email, identity.user_type
            )?;
        }
    }
    Ok(())
}

async fn login(client: &Arc<ApiClient>, email: &str, password: &str, admin: bool) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let result = if admin {
        client.admin_login(email, password).await
    } else {
        client.login(email, password).await
    };
    match result {
        Ok(s) => writeln!(out, "Logged in as {email} ({})", s.role)?,
        Err(e) => return Err(login_error(e)),
    }
    Ok(())
}

/// Bad credentials surface as a plain "Login failed" error (and a
/// non-zero exit); the stored session, if any, is left untouched.
/// Everything else propagates as-is.
fn login_error(e: ApiError) -> anyhow::Error {
    match e {
        ApiError::Api { status: 401, message } => anyhow::anyhow!("Login failed: {message}"),
        other => other.into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bad_credentials_become_login_failure() {
        let err = login_error(ApiError::Api {
            status: 401,
            message: "Email ou mot de passe incorrect".into(),
        });
        assert_eq!(err.to_string(), "Login failed: Email ou mot de passe incorrect");
        assert!(err.downcast_ref::<ApiError>().is_none());
    }

    #[test]
    fn other_rejections_pass_through() {
        let err = login_error(ApiError::Api {
            status: 403,
            message: "Compte désactivé".into(),
        });
        match err.downcast_ref::<ApiError>() {
            Some(ApiError::Api { status: 403, .. }) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
