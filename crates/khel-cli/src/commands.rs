//! CLI command implementations.

use khel_client::{
    ApiError, AuthPhase, Config, ConfigError, CredentialSubmitter, FileBackend, KhelClient,
    Resolution, Role, RoleRouter, RouteTree, Session, SessionError, SessionStore, SubRoute,
    SubmitError,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("{}", .0.user_message())]
    Submit(#[from] SubmitError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Could not determine config directory; pass --config and --session-file")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Everything a command needs: configuration, the persisted session store,
/// the API client and the router.
pub struct Context {
    pub config: Config,
    pub session_file: PathBuf,
    pub store: Arc<SessionStore>,
    pub client: KhelClient,
    pub router: RoleRouter,
}

impl Context {
    /// Builds the context from the config file and command-line overrides.
    pub fn new(
        config_file: Option<&Path>,
        api_url: Option<String>,
        session_file: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        };
        if let Some(url) = api_url {
            config.api_url = url;
        }

        let session_file = session_file
            .or_else(FileBackend::default_path)
            .ok_or(CliError::NoConfigDir)?;

        Self::with_config(config, session_file)
    }

    /// Builds the context from an explicit configuration.
    pub fn with_config(config: Config, session_file: PathBuf) -> Result<Self> {
        let store = Arc::new(SessionStore::new(Arc::new(FileBackend::new(
            session_file.clone(),
        ))));
        let client = KhelClient::with_timeout(config.api_url.clone(), config.request_timeout())?;
        let router =
            RoleRouter::new(Arc::clone(&store)).with_sign_in_path(config.sign_in_path.clone());

        tracing::debug!(api_url = %config.api_url, session_file = %session_file.display(), "Context ready");

        Ok(Self {
            config,
            session_file,
            store,
            client,
            router,
        })
    }

    /// The stored session, if any.
    fn session(&self) -> Result<Option<Session>> {
        match self.store.recover() {
            Ok(session) => Ok(Some(session)),
            Err(SessionError::SessionMissing) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Parses a role argument.
pub fn parse_role(s: &str) -> std::result::Result<Role, String> {
    s.parse().map_err(|_| {
        let known: Vec<&str> = Role::ALL.iter().map(Role::slug).collect();
        format!("unknown role '{s}' (expected one of: {})", known.join(", "))
    })
}

/// Sign in and store the session.
pub async fn login(ctx: &Context, role: Role, email: &str, password: &str) -> Result<()> {
    tracing::info!(%role, email = %email, "Signing in");

    let submitter = CredentialSubmitter::new(ctx.client.clone(), Arc::clone(&ctx.store));
    let session = submitter.submit(role, email, password).await?;

    println!(
        "Signed in as {} ({})",
        session.profile().display_name().unwrap_or(email),
        role
    );
    println!("Dashboard: {}", session.default_path());
    Ok(())
}

/// Show the signed-in identity.
pub fn whoami(ctx: &Context) -> Result<()> {
    let Some(session) = ctx.session()? else {
        println!("Not signed in. Use 'khel login' to sign in.");
        return Ok(());
    };

    let profile = session.profile();
    println!("Role:         {}", session.role());
    println!("Name:         {}", profile.display_name().unwrap_or("-"));
    println!("Email:        {}", profile.email.as_deref().unwrap_or("-"));
    println!("Organization: {}", profile.organization_id().unwrap_or("-"));
    println!("Dashboard:    {}", session.base_path());
    Ok(())
}

/// Resolve a path, or the app root, against the stored session.
pub fn route(ctx: &Context, path: Option<&str>) -> Result<()> {
    let resolution = match path {
        Some(path) => ctx.router.resolve_current_location(path),
        None => ctx.router.resolve_current(),
    };
    println!("{}", describe_resolution(&resolution, path));
    Ok(())
}

/// One-line summary of a routing decision.
pub fn describe_resolution(resolution: &Resolution, path: Option<&str>) -> String {
    match resolution {
        Resolution::Mount(tree) => {
            let view = match &tree.sub_route {
                SubRoute::Index | SubRoute::Item(_) => tree
                    .sub_route
                    .active_item(tree.descriptor())
                    .map(|item| item.label.to_string())
                    .unwrap_or_default(),
                SubRoute::Fallback(rest) => format!("fallback for '{rest}'"),
            };
            format!("mount {} [{}] ({view})", tree.current_path(), tree.role)
        }
        Resolution::Redirect(redirect) => {
            format!("redirect {} ({})", redirect.to, redirect.reason)
        }
        Resolution::Unmatched => {
            format!("unmatched: {} is not a dashboard path", path.unwrap_or("/"))
        }
    }
}

/// List the navigation of the signed-in role.
pub fn nav(ctx: &Context) -> Result<()> {
    let Some(session) = ctx.session()? else {
        println!("Not signed in. Use 'khel login' to sign in.");
        return Ok(());
    };

    let tree = RouteTree::for_session(&session, SubRoute::Index);
    for line in nav_lines(&tree) {
        println!("{line}");
    }
    Ok(())
}

/// Navigation entries, one per line, the active one starred.
pub fn nav_lines(tree: &RouteTree) -> Vec<String> {
    let width = tree
        .links
        .iter()
        .map(|l| l.item.label.len())
        .max()
        .unwrap_or(0);
    tree.links
        .iter()
        .map(|link| {
            let marker = if link.active { '*' } else { ' ' };
            format!("{marker} {:width$}  {}", link.item.label, link.href)
        })
        .collect()
}

/// Show status.
pub fn status(ctx: &Context) -> Result<()> {
    // An unreadable session shows up as a signed-out phase.
    if let Err(e) = ctx.session() {
        tracing::debug!(error = %e, "No session recovered");
    }

    println!("Khel Status");
    println!("===========");
    println!("Version:      {}", env!("CARGO_PKG_VERSION"));
    println!("API:          {}", ctx.config.api_url);
    println!("Session file: {}", ctx.session_file.display());
    println!("Phase:        {}", ctx.store.phase());
    if let AuthPhase::Authenticated(_) = ctx.store.phase() {
        if let Some(path) = ctx.router.resolve_current().target_path() {
            println!("Dashboard:    {path}");
        }
    }
    Ok(())
}

/// Sign out locally and, where the role supports it, on the server.
pub async fn logout(ctx: &Context) -> Result<()> {
    let session = ctx.session().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Stored session unreadable, clearing it");
        None
    });

    let submitter = CredentialSubmitter::new(ctx.client.clone(), Arc::clone(&ctx.store));
    submitter.sign_out().await?;

    match session {
        Some(session) => println!("Signed out {} ({})", session.role(), session.base_path()),
        None => println!("Signed out"),
    }
    Ok(())
}

/// The `--config` override, or the default config file.
pub fn config_file(path: Option<PathBuf>) -> Result<PathBuf> {
    path.or_else(Config::config_path).ok_or(CliError::NoConfigDir)
}

/// Print the configuration in effect.
pub fn config_show(path: &Path) -> Result<()> {
    let config = Config::load_from(path);
    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(&config).map_err(ConfigError::from)?);
    Ok(())
}

/// Change one setting and write the config file back.
pub fn config_set(path: &Path, key: &str, value: &str) -> Result<Config> {
    let mut config = Config::load_from(path);
    config.set(key, value)?;
    config.save_to(path)?;
    println!("Set {key} in {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context(api_url: &str, dir: &tempfile::TempDir) -> Context {
        let config = Config {
            api_url: api_url.to_string(),
            ..Config::default()
        };
        Context::with_config(config, dir.path().join("session.json")).unwrap()
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("coach").unwrap(), Role::Coach);
        assert_eq!(parse_role("MedicalStaff").unwrap(), Role::MedicalStaff);
        let err = parse_role("referee").unwrap_err();
        assert!(err.contains("assistantcoach"));
    }

    #[tokio::test]
    async fn test_login_persists_session_for_next_process() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/coach/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"coach": {"name": "Jane Doe", "organization": "org1"}}
            })))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&mock_server.uri(), &dir);
        login(&ctx, Role::Coach, "a@b.com", "x").await.unwrap();

        let next = context(&mock_server.uri(), &dir);
        let resolution = next.router.resolve_current();
        assert_eq!(
            resolution.target_path().as_deref(),
            Some("/coach-dashboard/org1/jane-doe/teammanagement")
        );
    }

    #[tokio::test]
    async fn test_login_failure_shows_generic_message() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("User does not exist"))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&mock_server.uri(), &dir);
        let err = login(&ctx, Role::Athlete, "a@b.com", "x").await.unwrap_err();
        assert_eq!(err.to_string(), khel_client::AUTH_FAILED_MESSAGE);
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_logout_clears_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context("http://127.0.0.1:9", &dir);
        ctx.store
            .write(Role::Athlete, khel_client::Profile::member("Sam Roy", "org3"))
            .unwrap();

        logout(&ctx).await.unwrap();

        let next = context("http://127.0.0.1:9", &dir);
        assert!(matches!(next.session(), Ok(None)));
    }

    #[test]
    fn test_describe_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context("http://127.0.0.1:9", &dir);
        assert_eq!(
            describe_resolution(&ctx.router.resolve_current(), None),
            "redirect / (no session)"
        );

        let session = ctx
            .store
            .write(Role::Coach, khel_client::Profile::member("Jane Doe", "org1"))
            .unwrap();
        let mounted = ctx
            .router
            .resolve_location(Some(&session), "/coach-dashboard/org1/jane-doe/reports");
        assert_eq!(
            describe_resolution(&mounted, None),
            "mount /coach-dashboard/org1/jane-doe/reports [Coach] (Reports and Analytics)"
        );
        assert_eq!(
            describe_resolution(&Resolution::Unmatched, Some("/about")),
            "unmatched: /about is not a dashboard path"
        );
    }

    #[test]
    fn test_nav_lines_star_default_item() {
        let session =
            Session::new(Role::Sponsor, khel_client::Profile {
                name: Some("Acme".into()),
                ..Default::default()
            })
            .unwrap();
        let lines = nav_lines(&RouteTree::for_session(&session, SubRoute::Index));
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("* View Metrics"));
        assert!(lines[0].ends_with("/sponsor-dashboard/acme/viewmetrics"));
        assert!(lines[1].starts_with("  Analytics"));
    }

    #[test]
    fn test_status_with_unreadable_session() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("session.json"),
            json!({"userType": "referee", "userData": "{}"}).to_string(),
        )
        .unwrap();

        let ctx = context("http://127.0.0.1:9", &dir);
        assert!(matches!(ctx.session(), Err(CliError::Session(_))));
        status(&ctx).unwrap();
        assert_eq!(ctx.store.phase(), AuthPhase::Unauthenticated);
    }

    #[test]
    fn test_config_set_is_used_by_next_context() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("khel").join("config.json");

        config_set(&file, "api_url", "https://api.khel.example").unwrap();
        config_set(&file, "sign_in_path", "/login").unwrap();
        assert!(matches!(
            config_set(&file, "sign_in_path", "login"),
            Err(CliError::Config(ConfigError::InvalidValue { .. }))
        ));

        let session_file = dir.path().join("session.json");
        let ctx = Context::new(Some(file.as_path()), None, Some(session_file)).unwrap();
        assert_eq!(ctx.config.api_url, "https://api.khel.example");
        assert_eq!(ctx.config.sign_in_path, "/login");
        assert_eq!(ctx.router.resolve_current().target_path().as_deref(), Some("/login"));
    }

    #[test]
    fn test_config_file_override() {
        let path = PathBuf::from("/tmp/khel-test.json");
        assert_eq!(config_file(Some(path.clone())).unwrap(), path);
    }
}
