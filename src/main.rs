use anyhow::{bail, Context, Result};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use user_admin::api::envelope::decode_all;
use user_admin::core::config::Config;
use user_admin::core::messages::{Locale, Message};
use user_admin::core::routes::FormMode;
use user_admin::core::state::AppState;
use user_admin::core::tracing_init::init_tracing;
use user_admin::models::role::Role;
use user_admin::models::session::CurrentUser;
use user_admin::views::pagination::PageButton;
use user_admin::views::user_list::{DeleteOutcome, PageStats, UserListView};
use user_admin::views::Access;

const USAGE: &str = "\
usage: user-admin [--config <path>] <command>

commands:
  session login <token> <user-json> [--remember]
  session logout
  session whoami
  users list [--page N] [--search TERM]
  users show <id>
  users toggle <id>
  users delete <id>
  roles list";

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let config_path = match args.iter().position(|a| a == "--config") {
        Some(pos) => {
            if pos + 1 >= args.len() {
                bail!("--config needs a path\n\n{}", USAGE);
            }
            let path = PathBuf::from(args.remove(pos + 1));
            args.remove(pos);
            path
        }
        None => PathBuf::from("config.toml"),
    };

    let config = Config::load(&config_path).context(format!(
        "Failed to load configuration from '{}'. \
        Copy config.example.toml to config.toml and adjust the values.",
        config_path.display()
    ))?;

    init_tracing(&config.logging);

    // One cooperative thread: every suspension point is a network round-trip
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(async_main(config, config_path, args))
}

async fn async_main(config: Config, config_path: PathBuf, args: Vec<String>) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        origin = %config.api.origin,
        locale = config.ui.locale.as_str(),
        "user-admin starting"
    );

    let state = AppState::new(config)?;
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["session", "login", token, user_json, rest @ ..] => {
            let remember = rest.contains(&"--remember");
            session_login(&state, token, user_json, remember)
        }
        ["session", "logout"] => {
            state.auth.logout();
            println!("Signed out");
            Ok(())
        }
        ["session", "whoami"] => {
            session_whoami(&state);
            Ok(())
        }
        ["users", "list", rest @ ..] => users_list(&state, rest).await,
        ["users", "show", id] => users_show(&state, parse_id(id)?).await,
        ["users", "toggle", id] => users_toggle(&state, parse_id(id)?).await,
        ["users", "delete", id] => users_delete(&state, parse_id(id)?).await,
        ["roles", "list"] => roles_list(&state).await,
        _ => bail!("{}", USAGE),
    }
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse()
        .with_context(|| format!("'{}' is not a valid id", raw))
}

fn locale(state: &AppState) -> Locale {
    state.config.ui.locale
}

fn ensure_access(access: Access, locale: Locale) -> Result<()> {
    match access {
        Access::Granted => Ok(()),
        Access::Denied(message) => bail!(message.text(locale)),
    }
}

fn session_login(state: &AppState, token: &str, user_json: &str, remember: bool) -> Result<()> {
    let user: CurrentUser =
        serde_json::from_str(user_json).context("User must be a JSON object")?;
    state
        .auth
        .login(token, user.clone(), remember)
        .context("Failed to store the session")?;

    println!(
        "Signed in as {} ({})",
        user.username,
        user.role_name().unwrap_or("N/A")
    );
    Ok(())
}

fn session_whoami(state: &AppState) {
    match state.auth.current_user() {
        Some(user) => println!(
            "{} <{}> role={}",
            user.name,
            user.username,
            user.role_name().unwrap_or("N/A")
        ),
        None => println!("Not signed in"),
    }
}

async fn users_list(state: &AppState, rest: &[&str]) -> Result<()> {
    let mut page = 1u32;
    let mut search = None;

    let mut iter = rest.iter();
    while let Some(flag) = iter.next() {
        match *flag {
            "--page" => {
                let value = iter.next().context("--page needs a number")?;
                page = value
                    .parse()
                    .with_context(|| format!("'{}' is not a page number", value))?;
            }
            "--search" => {
                search = Some(iter.next().context("--search needs a term")?.to_string());
            }
            other => bail!("Unknown option '{}'\n\n{}", other, USAGE),
        }
    }

    let mut view = state.user_list();
    ensure_access(view.access(), locale(state))?;

    if let Some(term) = search {
        view.set_search_term(term);
    }
    let in_range = view.open_page(page).await;

    if let Some(error) = view.error() {
        bail!(error.to_string());
    }
    if !in_range {
        bail!(
            "Page {} is out of range, there are {} page(s)",
            page,
            view.pagination().total_pages()
        );
    }

    print_list(&view, locale(state));
    Ok(())
}

fn print_list(view: &UserListView, locale: Locale) {
    if let Some(message) = view.empty_message() {
        println!("{}", message.text(locale));
        return;
    }

    println!(
        "{:>5}  {:<24} {:<20} {:<14} {:<8}",
        "ID", "NAME", "USERNAME", "ROLE", "STATUS"
    );
    for user in view.rows() {
        let actions = view.row_actions(user);
        let mut flags = Vec::new();
        if actions.edit {
            flags.push("edit");
        }
        if actions.delete {
            flags.push("delete");
        }
        if actions.toggle_enabled {
            flags.push("toggle");
        }
        println!(
            "{:>5}  {:<24} {:<20} {:<14} {:<8} [{}]",
            user.id,
            user.name,
            user.username,
            user.role_name(),
            user.status_label(),
            flags.join(",")
        );
    }

    let pagination = view.pagination();
    let buttons: Vec<String> = pagination
        .buttons()
        .into_iter()
        .map(|button| match button {
            PageButton::Page(p) if p == pagination.page() => format!("[{}]", p),
            PageButton::Page(p) => p.to_string(),
            PageButton::Ellipsis => "...".to_string(),
        })
        .collect();
    println!();
    println!("pages: {}", buttons.join(" "));
    if let Some((start, end)) = pagination.item_range() {
        println!("showing {}-{} of {}", start, end, pagination.total_items());
    }

    let stats = view.stats();
    println!(
        "{}: {} users, {} active ({:.0}%), {} inactive, {} admins",
        PageStats::SCOPE_LABEL,
        stats.total,
        stats.active,
        stats.percent(stats.active),
        stats.inactive,
        stats.admins
    );
}

async fn users_show(state: &AppState, id: i64) -> Result<()> {
    let mut view = state.user_form(FormMode::View(id));
    ensure_access(view.access(), locale(state))?;

    view.mount().await;
    if let Some(error) = view.error() {
        bail!(error.to_string());
    }

    let data = view.data();
    let role = view
        .roles()
        .iter()
        .find(|role| role.id.to_string() == data.role_id)
        .map_or("N/A", |role| role.name.as_str());

    println!("id:       {}", id);
    println!("name:     {}", data.name);
    println!("username: {}", data.username);
    println!("email:    {}", data.email);
    println!("phone:    {}", data.phone);
    println!("address:  {}", data.address);
    println!("role:     {}", role);
    println!("status:   {}", data.status);
    println!(
        "photo:    {}",
        if view.image_preview().is_some() { "yes" } else { "no" }
    );
    Ok(())
}

async fn users_toggle(state: &AppState, id: i64) -> Result<()> {
    let mut view = state.user_list();
    ensure_access(view.access(), locale(state))?;
    view.mount().await;

    // The row may live on another page; look it up directly
    let target = match view.rows().iter().find(|u| u.id == id) {
        Some(user) => user.toggled_status(),
        None => {
            let mut form = state.user_form(FormMode::View(id));
            form.mount().await;
            if let Some(error) = form.error() {
                bail!(error.to_string());
            }
            form.data().status.toggled()
        }
    };

    if !view.set_status(id, target).await {
        let message = view
            .error()
            .map(str::to_string)
            .unwrap_or_else(|| Message::StatusToggleFailed.text(locale(state)));
        bail!(message);
    }

    println!("User {} is now {}", id, target);
    Ok(())
}

async fn users_delete(state: &AppState, id: i64) -> Result<()> {
    let mut view = state.user_list();
    ensure_access(view.access(), locale(state))?;
    view.mount().await;

    let outcome = view.delete(id, &stdin_confirm).await;
    match outcome {
        DeleteOutcome::Deleted => println!("Deleted user {}", id),
        DeleteOutcome::Cancelled => println!("Cancelled"),
        DeleteOutcome::NotAllowed => bail!(Message::NoDeletePermission.text(locale(state))),
        DeleteOutcome::Failed(message) => bail!(message),
    }
    Ok(())
}

fn stdin_confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

async fn roles_list(state: &AppState) -> Result<()> {
    let envelope = state.roles.list().await;
    let roles = if envelope.success {
        envelope
            .collection(&["roles", "data"])
            .and_then(|values| decode_all::<Role>(values))
    } else {
        None
    };

    let Some(roles) = roles else {
        bail!(envelope.display_message(Message::FetchRolesFailed, locale(state)));
    };

    println!("{:>5}  {:<20} {:>5}  {}", "ID", "NAME", "PERMS", "DESCRIPTION");
    for role in &roles {
        println!(
            "{:>5}  {:<20} {:>5}  {}",
            role.id,
            role.name,
            role.permissions.len(),
            role.description
        );
    }
    Ok(())
}
