//! One handler per subcommand.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use innkeeper_core::api::{Customers, Employees, Reservations, Resource, Rooms};
use innkeeper_core::models::LoginForm;
use innkeeper_core::{ApiError, AppContext, Dashboard, Route};

use crate::output;
use crate::{LookupKind, ResourceKind};

/// Environment variable supplying the password non-interactively
const PASSWORD_ENV: &str = "INNKEEPER_PASSWORD";

/// Refuse protected commands before touching the network.
fn guard(ctx: &AppContext, route: Route) -> Result<()> {
    if ctx.resolve(route.path()) != route {
        return Err(anyhow::Error::from(ApiError::NotAuthenticated))
            .context("Please log in first with `innkeeper login`");
    }
    Ok(())
}

pub async fn login(ctx: &AppContext, username: Option<String>) -> Result<()> {
    let username = match username.or_else(|| ctx.config.last_username.clone()) {
        Some(name) if !name.trim().is_empty() => name,
        _ => prompt_username()?,
    };
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(p) if !p.is_empty() => p,
        _ => rpassword::prompt_password("Password: ")?,
    };

    let form = LoginForm {
        username: username.clone(),
        password,
    };

    if let Err(e) = ctx.login(&form).await {
        error!(error = %e, "Login failed");
        let message = match e.downcast_ref::<ApiError>() {
            Some(ApiError::Unauthorized) | Some(ApiError::BadRequest(_)) => {
                "Invalid username or password".to_string()
            }
            Some(ApiError::NetworkError(_)) => {
                "Unable to connect to server. Check the API URL and your connection.".to_string()
            }
            _ => format!("Login failed: {}", e),
        };
        bail!(message);
    }

    let mut config = ctx.config.clone();
    config.last_username = Some(username);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    info!("Login successful");
    match ctx.session.expires_at() {
        Some(expiry) => println!("Logged in. Session expires at {}.", expiry.to_rfc3339()),
        None => println!("Logged in."),
    }
    Ok(())
}

fn prompt_username() -> Result<String> {
    print!("Username: ");
    io::stdout().flush()?;

    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    Ok(username.trim().to_string())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    let was_authenticated = ctx.session.is_authenticated();
    ctx.logout();
    if was_authenticated {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn status(ctx: &AppContext) -> Result<()> {
    if !ctx.session.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }
    match ctx.session.minutes_until_expiry() {
        Some(minutes) => println!("Logged in. Session expires in {} minutes.", minutes),
        None => println!("Logged in. Session expiry unknown."),
    }
    Ok(())
}

pub async fn dashboard(ctx: &AppContext) -> Result<()> {
    guard(ctx, Route::Dashboard)?;
    let dashboard = ctx
        .authorized(|api| async move { Dashboard::load(&api).await })
        .await?;
    output::print_dashboard(&dashboard);
    Ok(())
}

pub async fn list(ctx: &AppContext, resource: ResourceKind) -> Result<()> {
    guard(ctx, resource.route())?;
    match resource {
        ResourceKind::Rooms => output::print_rooms(&fetch_all::<Rooms>(ctx).await?),
        ResourceKind::Customers => output::print_customers(&fetch_all::<Customers>(ctx).await?),
        ResourceKind::Employees => output::print_employees(&fetch_all::<Employees>(ctx).await?),
        ResourceKind::Reservations => {
            output::print_reservations(&fetch_all::<Reservations>(ctx).await?)
        }
    }
    Ok(())
}

async fn fetch_all<R: Resource>(ctx: &AppContext) -> Result<Vec<R::Item>> {
    ctx.authorized(|api| async move { api.list::<R>().await }).await
}

pub async fn create(ctx: &AppContext, resource: ResourceKind, data: &str) -> Result<()> {
    guard(ctx, resource.route())?;
    match resource {
        ResourceKind::Rooms => create_one::<Rooms>(ctx, data).await,
        ResourceKind::Customers => create_one::<Customers>(ctx, data).await,
        ResourceKind::Employees => create_one::<Employees>(ctx, data).await,
        ResourceKind::Reservations => create_one::<Reservations>(ctx, data).await,
    }
}

async fn create_one<R: Resource>(ctx: &AppContext, data: &str) -> Result<()>
where
    R::Form: DeserializeOwned,
{
    let form: R::Form = parse_form::<R>(data, false)?;
    let id = ctx
        .authorized(|api| async move { api.create::<R>(&form).await })
        .await?;
    println!("Created {} {}", R::NAME, id);
    Ok(())
}

pub async fn update(ctx: &AppContext, resource: ResourceKind, data: &str) -> Result<()> {
    guard(ctx, resource.route())?;
    match resource {
        ResourceKind::Rooms => update_one::<Rooms>(ctx, data).await,
        ResourceKind::Customers => update_one::<Customers>(ctx, data).await,
        ResourceKind::Employees => update_one::<Employees>(ctx, data).await,
        ResourceKind::Reservations => update_one::<Reservations>(ctx, data).await,
    }
}

async fn update_one<R: Resource>(ctx: &AppContext, data: &str) -> Result<()>
where
    R::Form: DeserializeOwned,
{
    let form: R::Form = parse_form::<R>(data, true)?;
    ctx.authorized(|api| async move { api.update::<R>(&form).await })
        .await?;
    println!("Updated {}", R::NAME);
    Ok(())
}

pub async fn delete(ctx: &AppContext, resource: ResourceKind, id: &str) -> Result<()> {
    guard(ctx, resource.route())?;
    let id = id.trim();
    if id.is_empty() {
        bail!("An id is required");
    }
    match resource {
        ResourceKind::Rooms => delete_one::<Rooms>(ctx, id).await?,
        ResourceKind::Customers => delete_one::<Customers>(ctx, id).await?,
        ResourceKind::Employees => delete_one::<Employees>(ctx, id).await?,
        ResourceKind::Reservations => delete_one::<Reservations>(ctx, id).await?,
    }
    println!("Deleted {}", id);
    Ok(())
}

async fn delete_one<R: Resource>(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.authorized(|api| async move { api.delete::<R>(id).await })
        .await
}

/// Summaries feed the room and customer ids a reservation needs.
pub async fn lookup(ctx: &AppContext, kind: LookupKind) -> Result<()> {
    guard(ctx, Route::Reservations)?;
    match kind {
        LookupKind::Rooms => {
            let rooms = ctx
                .authorized(|api| async move { api.fetch_room_summaries().await })
                .await?;
            output::print_room_summaries(&rooms);
        }
        LookupKind::Customers => {
            let customers = ctx
                .authorized(|api| async move { api.fetch_customer_summaries().await })
                .await?;
            output::print_customer_summaries(&customers);
        }
    }
    Ok(())
}

/// Decode a `--data` body. Updates must name the item they replace.
fn parse_form<R: Resource>(data: &str, require_id: bool) -> Result<R::Form>
where
    R::Form: DeserializeOwned,
{
    let value: serde_json::Value = serde_json::from_str(data)
        .with_context(|| format!("--data is not valid JSON for a {}", R::NAME))?;

    if !value.is_object() {
        bail!("--data must be a JSON object");
    }
    if require_id {
        let has_id = value
            .get("id")
            .and_then(|v| v.as_str())
            .is_some_and(|id| !id.trim().is_empty());
        if !has_id {
            bail!("--data must include the \"id\" of the {} to update", R::NAME);
        }
    }

    serde_json::from_value(value).with_context(|| format!("--data does not describe a {}", R::NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use innkeeper_core::models::{RoomStatus, Validate};

    #[test]
    fn test_parse_form_for_create() {
        let form = parse_form::<Rooms>(
            r#"{"name":"Garden Suite","number":101,"guestCount":2,"status":1}"#,
            false,
        )
        .unwrap();
        assert_eq!(form.status, Some(RoomStatus::Maintenance));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_parse_form_update_requires_id() {
        let body = r#"{"firstName":"Ana","lastName":"Pop","jobType":1}"#;
        let err = parse_form::<Employees>(body, true).unwrap_err();
        assert!(err.to_string().contains("\"id\""));

        let body = r#"{"id":"e1","firstName":"Ana","lastName":"Pop","jobType":1}"#;
        let form = parse_form::<Employees>(body, true).unwrap();
        assert_eq!(form.id.as_deref(), Some("e1"));
    }

    #[test]
    fn test_parse_form_rejects_garbage() {
        assert!(parse_form::<Customers>("not json", false).is_err());
        assert!(parse_form::<Customers>("[1, 2]", false).is_err());
        assert!(parse_form::<Rooms>(r#"{"status": -1}"#, false).is_err());

        let body = r#"{"name":"Attic","number":7,"guestCount":1,"status":7}"#;
        let form = parse_form::<Rooms>(body, false).unwrap();
        assert_eq!(form.validate().unwrap_err().fields(), vec!["status"]);
    }
}
