//! Login, signup and password reset flows with role-aware routing

use crate::error::AuthError;
use crate::profile::{is_complete, timestamp, USERS};
use crate::state::forms::{AuthForm, AuthMode};
use crate::state::{Role, Session, View};
use crate::store::{AuthProvider, Document, DocumentStore};
use chrono::Utc;
use serde_json::{json, Value};

/// Where a successful flow lands, plus the notice to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub session: Session,
    pub view: View,
    pub notice: String,
}

fn is_admin_email(email: &str, admin_email: &str) -> bool {
    email.trim().eq_ignore_ascii_case(admin_email.trim())
}

fn validated(form: &AuthForm) -> Result<(), AuthError> {
    match form.first_error() {
        Some(message) => Err(AuthError::Invalid(message)),
        None => Ok(()),
    }
}

async fn find_user(
    store: &dyn DocumentStore,
    email: &str,
) -> Result<Option<(String, Document)>, AuthError> {
    let mut found = store
        .find_by_field(USERS, "email", &Value::String(email.to_string()))
        .await?;
    Ok(found.pop())
}

fn registered_role(user: &Document) -> Option<Role> {
    user.get("role").and_then(Value::as_str).and_then(Role::parse)
}

fn display_name(user: &Document) -> &str {
    user.get("name")
        .or_else(|| user.get("displayName"))
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Sign in with the role selected on the form
pub async fn login(
    auth: &dyn AuthProvider,
    store: &dyn DocumentStore,
    form: &AuthForm,
    admin_email: &str,
) -> Result<AuthOutcome, AuthError> {
    validated(form)?;
    let email = form.email.as_text().trim();
    let password = form.password.as_text();

    if is_admin_email(email, admin_email) {
        let identity = auth.sign_in(email, password).await?;
        tracing::info!("Administrator signed in");
        return Ok(AuthOutcome {
            session: Session {
                uid: identity.uid,
                email: identity.email,
                role: None,
            },
            view: View::Admin,
            notice: "Welcome Admin!".to_string(),
        });
    }

    let Some((_, user)) = find_user(store, email).await? else {
        return Err(AuthError::UserNotFound);
    };
    let selected = form.role;
    match registered_role(&user) {
        Some(registered) if registered != selected => {
            return Err(AuthError::RoleMismatch {
                registered: registered.to_string(),
                requested: selected.to_string(),
            });
        }
        _ => {}
    }

    let identity = auth.sign_in(email, password).await.map_err(|e| {
        tracing::warn!("Sign-in failed for {email}: {e}");
        e
    })?;
    tracing::info!("{selected} {} signed in", identity.uid);

    let view = if is_complete(&user) {
        View::Dashboard
    } else {
        View::Wizard
    };
    Ok(AuthOutcome {
        notice: format!("Welcome back, {}!", display_name(&user)),
        session: Session {
            uid: identity.uid,
            email: identity.email,
            role: Some(selected),
        },
        view,
    })
}

/// Create an account for the selected role and start onboarding.
/// Signing up with the administrator email only provisions the account.
pub async fn signup(
    auth: &dyn AuthProvider,
    store: &dyn DocumentStore,
    form: &AuthForm,
    admin_email: &str,
) -> Result<AuthOutcome, AuthError> {
    validated(form)?;
    let name = form.name.as_text().trim();
    let email = form.email.as_text().trim();
    let role = form.role;

    if is_admin_email(email, admin_email) {
        let identity = auth.create_account(email, form.password.as_text()).await?;
        tracing::info!("Administrator account created");
        return Ok(AuthOutcome {
            session: Session {
                uid: identity.uid,
                email: identity.email,
                role: None,
            },
            view: View::Admin,
            notice: "Welcome Admin!".to_string(),
        });
    }

    if let Some((_, existing)) = find_user(store, email).await? {
        let role = registered_role(&existing).unwrap_or(role);
        return Err(AuthError::AlreadyRegistered {
            role: role.to_string(),
        });
    }

    let identity = auth.create_account(email, form.password.as_text()).await?;
    let stamp = timestamp(Utc::now());
    let mut user = Document::new();
    user.insert("name".to_string(), json!(name));
    user.insert("email".to_string(), json!(email));
    user.insert("role".to_string(), json!(role));
    user.insert("profileComplete".to_string(), json!(false));
    user.insert("createdAt".to_string(), json!(stamp));
    user.insert("updatedAt".to_string(), json!(stamp));
    store.set(USERS, &identity.uid, user, true).await?;
    tracing::info!("Created {role} account {}", identity.uid);

    Ok(AuthOutcome {
        session: Session {
            uid: identity.uid,
            email: identity.email,
            role: Some(role),
        },
        view: View::Wizard,
        notice: format!("Welcome {name}! Please complete your {role} profile."),
    })
}

/// Request a password reset; returns the confirmation notice
pub async fn reset_password(
    auth: &dyn AuthProvider,
    store: &dyn DocumentStore,
    form: &AuthForm,
) -> Result<String, AuthError> {
    if form.mode != AuthMode::Reset {
        return Err(AuthError::Invalid("Not on the reset screen".to_string()));
    }
    validated(form)?;
    let email = form.email.as_text().trim();
    if find_user(store, email).await?.is_none() {
        return Err(AuthError::UserNotFound);
    }
    auth.send_password_reset(email).await?;
    Ok("Password reset link sent to your email".to_string())
}

/// Route a resumed session: administrators to moderation, complete
/// profiles to the dashboard, everyone else to onboarding.
pub async fn landing_view(store: &dyn DocumentStore, session: &Session) -> Result<View, AuthError> {
    if session.is_admin() {
        return Ok(View::Admin);
    }
    let user = store.get(USERS, &session.uid).await?;
    Ok(match user {
        Some(user) if is_complete(&user) => View::Dashboard,
        _ => View::Wizard,
    })
}

/// Rebuild a session for the identity the provider still holds
pub async fn resume_session(
    auth: &dyn AuthProvider,
    store: &dyn DocumentStore,
    admin_email: &str,
) -> Result<Option<Session>, AuthError> {
    let Some(identity) = auth.current_user() else {
        return Ok(None);
    };
    if is_admin_email(&identity.email, admin_email) {
        return Ok(Some(Session {
            uid: identity.uid,
            email: identity.email,
            role: None,
        }));
    }
    let role = store
        .get(USERS, &identity.uid)
        .await?
        .as_ref()
        .and_then(registered_role);
    Ok(role.map(|role| Session {
        uid: identity.uid,
        email: identity.email,
        role: Some(role),
    }))
}

pub async fn logout(auth: &dyn AuthProvider) -> Result<(), AuthError> {
    auth.sign_out().await?;
    tracing::info!("Signed out");
    Ok(())
}
