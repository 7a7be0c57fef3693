//! Application state and core logic

use crate::config::TuiConfig;
use crate::contact::{self, THANK_YOU};
use crate::regions::RegionData;
use crate::state::forms::{AuthForm, AuthMode, FieldValue, Form, Wizard, WizardState, STEPS};
use crate::state::{AppState, Session, View};
use crate::store::{AuthProvider, DocumentStore, Identity, JsonFileStore, LocalAuth};
use crate::{auth, media, platform, profile};
use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Document store shared with the auth provider
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
    /// Reference data resolved at startup
    pub regions: RegionData,
    pub config: TuiConfig,
    /// Write the config back after logins
    persist_config: bool,
    /// Whether the app should quit
    quit: bool,
    /// Feedback shown in the status bar until the next key press
    pub status_message: Option<String>,
}

impl App {
    /// Create a new App instance from the user configuration
    pub async fn new(config: TuiConfig) -> Result<Self> {
        let (json_store, store_error) = match JsonFileStore::open(config.store_path()).await {
            Ok(store) => (store, None),
            Err(e) => {
                tracing::error!("Failed to open document store: {e}");
                (JsonFileStore::in_memory(), Some(e))
            }
        };
        if let Some(path) = json_store.path() {
            tracing::info!("Using document store at {}", path.display());
        }
        let store: Arc<dyn DocumentStore> = Arc::new(json_store);
        let (local_auth, session_error) = match LocalAuth::open(store.clone()).await {
            Ok(auth) => (auth, None),
            Err(e) => {
                tracing::warn!("Failed to restore session: {e}");
                (LocalAuth::new(store.clone()), Some(e))
            }
        };
        let auth: Arc<dyn AuthProvider> = Arc::new(local_auth);
        let (regions, region_error) = RegionData::resolve(config.regions_path.as_deref()).await;

        let mut app = Self::with_collaborators(store, auth, regions, config);
        app.persist_config = true;
        if let Some(e) = store_error {
            app.push_error(format!("{e}. Changes will not be saved this session."));
        }
        if let Some(e) = session_error {
            app.push_error(format!("Could not restore your session: {e}"));
        }
        if let Some(e) = region_error {
            app.push_error(e.to_string());
        }
        Ok(app)
    }

    /// Create an App around explicit collaborators
    pub fn with_collaborators(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        regions: RegionData,
        config: TuiConfig,
    ) -> Self {
        let mut state = AppState::default();
        state.auth_form = AuthForm::new(config.default_role());
        if let Some(email) = &config.last_email {
            state.auth_form.email.set_text(email);
        }
        if let RegionData::Unavailable(message) = &regions {
            state.region_notice = Some(message.clone());
        }

        Self {
            state,
            store,
            auth,
            regions,
            config,
            persist_config: false,
            quit: false,
            status_message: None,
        }
    }

    /// Resume a session still held by the auth provider
    pub async fn start(&mut self) {
        let resumed = auth::resume_session(
            self.auth.as_ref(),
            self.store.as_ref(),
            self.config.admin_email(),
        )
        .await;
        match resumed {
            Ok(Some(session)) => {
                tracing::info!("Resuming session for {}", session.uid);
                self.state.session = Some(session);
                self.route_session().await;
            }
            Ok(None) => {}
            Err(e) => self.push_error(e.to_string()),
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn identity(&self) -> Option<Identity> {
        self.state.session.as_ref().map(|s| Identity {
            uid: s.uid.clone(),
            email: s.email.clone(),
        })
    }

    /// Navigate to a new view
    pub fn navigate(&mut self, view: View) {
        if self.state.current_view != view {
            self.state
                .view_history
                .push(self.state.current_view.clone());
            self.state.current_view = view;
        }
        self.state.selected_index = 0;
        self.state.scroll_offset = 0;
    }

    /// Go back to the previous view
    pub fn go_back(&mut self) {
        if let Some(view) = self.state.view_history.pop() {
            self.state.current_view = view;
        }
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.status_message = None;

        // Logout from any signed-in view
        if self.state.session.is_some()
            && platform::is_action(key.modifiers)
            && key.code == KeyCode::Char('l')
        {
            self.logout().await;
            return Ok(());
        }

        match self.state.current_view {
            View::Auth => self.handle_auth_key(key).await?,
            View::Contact => self.handle_contact_key(key).await?,
            View::Wizard => self.handle_wizard_key(key).await?,
            View::Dashboard => self.handle_dashboard_key(key).await?,
            View::Admin => self.handle_admin_key(key).await?,
        }
        Ok(())
    }

    /// Handle keys in the Auth view
    async fn handle_auth_key(&mut self, key: KeyEvent) -> Result<()> {
        let form = &mut self.state.auth_form;
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::F(1) => form.set_mode(AuthMode::Login),
            KeyCode::F(2) => form.set_mode(AuthMode::Signup),
            KeyCode::F(3) => form.set_mode(AuthMode::Reset),
            KeyCode::F(4) => form.toggle_role(),
            KeyCode::F(5) => self.navigate(View::Contact),
            KeyCode::Esc if form.mode != AuthMode::Login => form.set_mode(AuthMode::Login),
            KeyCode::Esc => self.quit = true,
            KeyCode::Enter => self.submit_auth().await,
            KeyCode::Char('s') if platform::is_action(key.modifiers) => {
                self.submit_auth().await
            }
            KeyCode::Char(c) => form.get_active_field_mut().push_char(c),
            KeyCode::Backspace => form.get_active_field_mut().pop_char(),
            _ => {}
        }
        Ok(())
    }

    /// Run the flow for the current auth screen
    async fn submit_auth(&mut self) {
        self.state.auth_form.attempted = true;
        if self.state.auth_form.submitting || !self.state.auth_form.is_valid() {
            return;
        }

        self.state.auth_form.submitting = true;
        let form = self.state.auth_form.clone();
        let admin_email = self.config.admin_email().to_string();
        let store = self.store.clone();
        let provider = self.auth.clone();

        match form.mode {
            AuthMode::Reset => {
                let result = auth::reset_password(provider.as_ref(), store.as_ref(), &form).await;
                self.state.auth_form.submitting = false;
                match result {
                    Ok(notice) => {
                        self.status_message = Some(notice);
                        self.state.auth_form.set_mode(AuthMode::Login);
                    }
                    Err(e) => self.push_error(e.to_string()),
                }
            }
            AuthMode::Login | AuthMode::Signup => {
                let result = if form.mode == AuthMode::Login {
                    auth::login(provider.as_ref(), store.as_ref(), &form, &admin_email).await
                } else {
                    auth::signup(provider.as_ref(), store.as_ref(), &form, &admin_email).await
                };
                self.state.auth_form.submitting = false;
                match result {
                    Ok(outcome) => {
                        self.remember_login(&outcome.session);
                        self.state.auth_form.password.clear();
                        self.state.auth_form.confirm.clear();
                        self.state.session = Some(outcome.session);
                        self.open_view(outcome.view).await;
                        self.status_message = Some(outcome.notice);
                    }
                    Err(e) => self.push_error(e.to_string()),
                }
            }
        }
    }

    fn remember_login(&mut self, session: &Session) {
        self.config.remember_login(&session.email, session.role);
        if self.persist_config {
            if let Err(e) = self.config.save() {
                tracing::warn!("Failed to save config: {e}");
            }
        }
    }

    /// Send the signed-in user where their session belongs
    async fn route_session(&mut self) {
        let Some(session) = self.state.session.clone() else {
            return;
        };
        match auth::landing_view(self.store.as_ref(), &session).await {
            Ok(view) => self.open_view(view).await,
            Err(e) => self.push_error(e.to_string()),
        }
    }

    /// Load what a view needs, then show it
    async fn open_view(&mut self, view: View) {
        match view {
            View::Wizard => self.mount_wizard().await,
            View::Dashboard => self.load_dashboard().await,
            View::Admin => self.refresh_messages().await,
            View::Auth | View::Contact => {}
        }
        if view == View::Wizard && self.state.wizard.is_none() {
            return;
        }
        self.navigate(view);
    }

    /// Create the role's wizard, hydrated from any saved profile
    async fn mount_wizard(&mut self) {
        let Some(session) = self.state.session.clone() else {
            return;
        };
        let Some(role) = session.role else {
            return;
        };

        let mut wizard = WizardState::for_role(role, &self.regions);
        match profile::load_profile(self.store.as_ref(), &session.uid, role).await {
            Ok(Some(saved)) => wizard.wizard_mut().hydrate(&saved, &self.regions),
            Ok(None) => {}
            Err(e) => self.push_error(format!("Failed to load profile: {e}")),
        }
        if let Some(message) = self.state.region_notice.clone() {
            tracing::warn!("Wizard opened without reference data: {message}");
        }
        self.state.wizard = Some(wizard);
    }

    /// Handle keys in the Wizard view
    async fn handle_wizard_key(&mut self, key: KeyEvent) -> Result<()> {
        let today = self.today();
        let Some(wizard_state) = self.state.wizard.as_mut() else {
            return Ok(());
        };
        let wizard = wizard_state.wizard_mut();

        match key.code {
            KeyCode::Tab | KeyCode::Down => wizard.form_mut().next_field(),
            KeyCode::BackTab | KeyCode::Up => wizard.form_mut().prev_field(),
            KeyCode::Left => {
                if let Some(field) = wizard.form_mut().active_field_mut() {
                    field.prev_option();
                }
                wizard.form_mut().sync_districts(&self.regions);
            }
            KeyCode::Right => {
                if let Some(field) = wizard.form_mut().active_field_mut() {
                    field.next_option();
                }
                wizard.form_mut().sync_districts(&self.regions);
            }
            KeyCode::Esc => {
                wizard.prev_step();
            }
            KeyCode::Char('s') if platform::is_action(key.modifiers) => {
                self.submit_wizard().await;
            }
            KeyCode::Enter => {
                let attachment = wizard
                    .form()
                    .active_field()
                    .filter(|f| matches!(f.value, FieldValue::Attachment { .. }))
                    .filter(|f| !f.as_text().is_empty() && f.data_url().is_none())
                    .map(|f| (f.name.clone(), f.as_text().to_string()));

                if let Some((name, path)) = attachment {
                    self.attach_media(&name, &path).await;
                } else if wizard.current_step() < STEPS {
                    let ctx = wizard.context(&self.regions, today);
                    if !wizard.next_step(&ctx) {
                        self.status_message =
                            Some("Please fix the highlighted fields".to_string());
                    }
                } else {
                    self.submit_wizard().await;
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = wizard.form_mut().active_field_mut() {
                    field.push_char(c);
                }
                wizard.form_mut().sync_districts(&self.regions);
            }
            KeyCode::Backspace => {
                if let Some(field) = wizard.form_mut().active_field_mut() {
                    field.pop_char();
                }
                wizard.form_mut().sync_districts(&self.regions);
            }
            _ => {}
        }
        Ok(())
    }

    /// Read an image into an attachment field; last write wins
    async fn attach_media(&mut self, field_name: &str, path: &str) {
        match media::attach_image(path).await {
            Ok(encoded) => {
                if let Some(field) = self
                    .state
                    .wizard
                    .as_mut()
                    .and_then(|w| w.wizard_mut().form_mut().field_mut(field_name))
                {
                    field.set_data_url(encoded);
                }
                self.status_message = Some("Image attached".to_string());
            }
            Err(e) => self.push_error(e.to_string()),
        }
    }

    /// Persist the completed wizard
    async fn submit_wizard(&mut self) {
        let today = self.today();
        let Some(identity) = self.identity() else {
            return;
        };
        let Some(wizard_state) = self.state.wizard.as_mut() else {
            return;
        };
        let ctx = wizard_state.wizard().context(&self.regions, today);
        if !wizard_state.wizard_mut().request_submit(&ctx) {
            if !wizard_state.wizard().form().submitting {
                self.status_message = Some("Please fix the highlighted fields".to_string());
            }
            return;
        }

        wizard_state.wizard_mut().form_mut().submitting = true;
        let store = self.store.clone();
        let result =
            profile::submit_profile(store.as_ref(), &identity, wizard_state.wizard(), Utc::now())
                .await;
        wizard_state.wizard_mut().form_mut().submitting = false;

        match result {
            Ok(()) => {
                self.state.wizard = None;
                self.open_view(View::Dashboard).await;
                self.status_message = Some("Profile successfully saved!".to_string());
            }
            Err(e) => {
                tracing::error!("Profile submission failed: {e}");
                self.push_error(format!("Failed to save profile: {e}"));
            }
        }
    }

    /// Load the saved profile for the dashboard summary
    async fn load_dashboard(&mut self) {
        let Some(session) = self.state.session.clone() else {
            return;
        };
        let Some(role) = session.role else {
            return;
        };
        match profile::load_profile(self.store.as_ref(), &session.uid, role).await {
            Ok(saved) => self.state.profile = saved,
            Err(e) => self.push_error(format!("Failed to load profile: {e}")),
        }
    }

    /// Handle keys in the Dashboard view
    async fn handle_dashboard_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('e') => self.open_view(View::Wizard).await,
            KeyCode::Char('r') => self.load_dashboard().await,
            KeyCode::Char('c') => self.navigate(View::Contact),
            KeyCode::Char('l') => self.logout().await,
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in the Contact view
    async fn handle_contact_key(&mut self, key: KeyEvent) -> Result<()> {
        let form = &mut self.state.contact_form;
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Esc => self.go_back(),
            KeyCode::Enter => self.submit_contact().await,
            KeyCode::Char('s') if platform::is_action(key.modifiers) => {
                self.submit_contact().await
            }
            KeyCode::Char(c) => form.get_active_field_mut().push_char(c),
            KeyCode::Backspace => form.get_active_field_mut().pop_char(),
            _ => {}
        }
        Ok(())
    }

    async fn submit_contact(&mut self) {
        let form = &mut self.state.contact_form;
        form.attempted = true;
        if form.submitting || !form.is_valid() {
            return;
        }
        form.submitting = true;

        let store = self.store.clone();
        let result = contact::submit_contact(store.as_ref(), &self.state.contact_form, Utc::now()).await;
        self.state.contact_form.submitting = false;
        match result {
            Ok(_) => {
                self.state.contact_form.reset();
                self.status_message = Some(THANK_YOU.to_string());
            }
            Err(e) => self.push_error(format!("Failed to send message: {e}")),
        }
    }

    /// Re-query the contact messages
    async fn refresh_messages(&mut self) {
        match contact::list_messages(self.store.as_ref()).await {
            Ok(messages) => {
                self.state.clamp_selection(messages.len());
                self.state.messages = messages;
            }
            Err(e) => self.push_error(format!("Failed to load messages: {e}")),
        }
    }

    /// Handle keys in the Admin view
    async fn handle_admin_key(&mut self, key: KeyEvent) -> Result<()> {
        if let Some(id) = self.state.confirm_delete.clone() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.state.confirm_delete = None;
                    match contact::delete_message(self.store.as_ref(), &id).await {
                        Ok(()) => self.status_message = Some("Message deleted".to_string()),
                        Err(e) => self.push_error(format!("Failed to delete message: {e}")),
                    }
                    self.refresh_messages().await;
                }
                KeyCode::Char('n') | KeyCode::Esc => self.state.confirm_delete = None,
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.state.messages.len();
                self.state.move_selection_down(len);
            }
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Char('m') | KeyCode::Enter => {
                if let Some(id) = self.state.selected_message().map(|m| m.id.clone()) {
                    match contact::mark_read(self.store.as_ref(), &id).await {
                        Ok(true) => self.status_message = Some("Marked as read".to_string()),
                        Ok(false) => {
                            self.status_message = Some("Message no longer exists".to_string())
                        }
                        Err(e) => self.push_error(format!("Failed to update message: {e}")),
                    }
                    self.refresh_messages().await;
                }
            }
            KeyCode::Char('d') => {
                self.state.confirm_delete = self.state.selected_message().map(|m| m.id.clone());
            }
            KeyCode::Char('r') => self.refresh_messages().await,
            KeyCode::Char('l') => self.logout().await,
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
        Ok(())
    }

    /// Sign out and return to the login screen
    pub async fn logout(&mut self) {
        if let Err(e) = auth::logout(self.auth.as_ref()).await {
            self.push_error(e.to_string());
            return;
        }
        self.state.clear_session();
        self.state.auth_form.set_mode(AuthMode::Login);
        self.state.current_view = View::Auth;
        self.status_message = Some("Logged out".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::regions::RegionCatalog;
    use crate::state::Role;
    use crate::store::{Document, MockDocumentStore};
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const REGIONS: &str = r#"{"Punjab": ["Ludhiana", "Patiala"], "Haryana": ["Karnal"]}"#;

    fn regions() -> RegionData {
        RegionData::Loaded(RegionCatalog::from_json(REGIONS).unwrap())
    }

    fn test_app() -> (App, Arc<JsonFileStore>) {
        let store = Arc::new(JsonFileStore::in_memory());
        let auth = Arc::new(LocalAuth::new(store.clone()));
        let app = App::with_collaborators(store.clone(), auth, regions(), TuiConfig::default());
        (app, store)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn press(app: &mut App, code: KeyCode) {
        app.handle_key(key(code)).await.unwrap();
    }

    async fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c)).await;
        }
    }

    async fn sign_up(app: &mut App, role: Role) {
        press(app, KeyCode::F(2)).await;
        if app.state.auth_form.role != role {
            press(app, KeyCode::F(4)).await;
        }
        type_str(app, "Asha").await;
        press(app, KeyCode::Tab).await;
        type_str(app, "asha@farm.in").await;
        press(app, KeyCode::Tab).await;
        type_str(app, "Secret1!").await;
        press(app, KeyCode::Tab).await;
        type_str(app, "Secret1!").await;
        press(app, KeyCode::Enter).await;
    }

    fn fill_farmer(app: &mut App) {
        let saved: Document = match json!({
            "name": "Asha Devi",
            "dob": "1990-03-20",
            "mobile": "9123456789",
            "language": "Punjabi",
            "state": "Punjab",
            "district": "Ludhiana",
            "village": "Khanna",
            "pincode": "141401",
            "soilType": "Loamy",
            "crops": ["Rice"],
            "landSize": 3
        }) {
            serde_json::Value::Object(map) => map,
            _ => Document::new(),
        };
        let regions = app.regions.clone();
        app.state
            .wizard
            .as_mut()
            .unwrap()
            .wizard_mut()
            .hydrate(&saved, &regions);
    }

    mod auth_screen {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_signup_opens_wizard() {
            let (mut app, _) = test_app();
            sign_up(&mut app, Role::Farmer).await;

            assert_eq!(app.state.current_view, View::Wizard);
            assert!(matches!(app.state.wizard, Some(WizardState::Farmer(_))));
            assert_eq!(
                app.status_message.as_deref(),
                Some("Welcome Asha! Please complete your farmer profile.")
            );
            assert_eq!(app.state.auth_form.password.as_text(), "");
        }

        #[tokio::test]
        async fn test_invalid_login_stays_and_reveals_errors() {
            let (mut app, _) = test_app();
            press(&mut app, KeyCode::Enter).await;
            assert_eq!(app.state.current_view, View::Auth);
            assert!(app.state.auth_form.attempted);
            assert!(!app.state.has_errors());
            assert!(app.state.auth_form.visible_check("email").is_some());
        }

        #[tokio::test]
        async fn test_flow_errors_are_modal() {
            let (mut app, _) = test_app();
            type_str(&mut app, "ghost@farm.in").await;
            press(&mut app, KeyCode::Tab).await;
            type_str(&mut app, "Secret1!").await;
            press(&mut app, KeyCode::Enter).await;

            assert_eq!(
                app.state.current_error(),
                Some("No account found with this email address")
            );
            // Keys other than Enter/Esc are swallowed while the error shows
            press(&mut app, KeyCode::Char('x')).await;
            assert_eq!(app.state.auth_form.password.as_text(), "Secret1!");
            press(&mut app, KeyCode::Esc).await;
            assert!(!app.state.has_errors());
        }

        #[tokio::test]
        async fn test_esc_quits_from_login() {
            let (mut app, _) = test_app();
            press(&mut app, KeyCode::F(3)).await;
            press(&mut app, KeyCode::Esc).await;
            assert_eq!(app.state.auth_form.mode, AuthMode::Login);
            assert!(!app.should_quit());
            press(&mut app, KeyCode::Esc).await;
            assert!(app.should_quit());
        }
    }

    mod wizard_screen {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_enter_blocked_on_invalid_step() {
            let (mut app, _) = test_app();
            sign_up(&mut app, Role::Farmer).await;
            press(&mut app, KeyCode::Enter).await;

            let wizard = app.state.wizard.as_ref().unwrap().wizard();
            assert_eq!(wizard.current_step(), 1);
            assert_eq!(
                app.status_message.as_deref(),
                Some("Please fix the highlighted fields")
            );
        }

        #[tokio::test]
        async fn test_choosing_state_resets_district() {
            let (mut app, _) = test_app();
            sign_up(&mut app, Role::Farmer).await;
            fill_farmer(&mut app);
            app.state
                .wizard
                .as_mut()
                .unwrap()
                .wizard_mut()
                .form_mut()
                .step = 2;

            // Focus is on the state choice; step back to the previous state
            press(&mut app, KeyCode::Left).await;
            let form = app.state.wizard.as_ref().unwrap().wizard().form();
            assert_eq!(form.value("state"), "Haryana");
            assert_eq!(form.value("district"), "");
        }

        #[tokio::test]
        async fn test_submit_saves_and_opens_dashboard() {
            let (mut app, store) = test_app();
            sign_up(&mut app, Role::Farmer).await;
            fill_farmer(&mut app);
            for _ in 0..2 {
                press(&mut app, KeyCode::Enter).await;
            }
            assert_eq!(
                app.state.wizard.as_ref().unwrap().wizard().current_step(),
                STEPS
            );

            press(&mut app, KeyCode::Enter).await;
            assert_eq!(app.state.current_view, View::Dashboard);
            assert!(app.state.wizard.is_none());
            assert_eq!(
                app.status_message.as_deref(),
                Some("Profile successfully saved!")
            );

            let uid = app.state.session.as_ref().unwrap().uid.clone();
            let farmer = store.get("farmers", &uid).await.unwrap().unwrap();
            assert_eq!(farmer.get("village"), Some(&json!("Khanna")));
            assert_eq!(
                app.state.profile.as_ref().and_then(|p| p.get("village")),
                Some(&json!("Khanna"))
            );
        }

        #[tokio::test]
        async fn test_failed_submit_keeps_wizard() {
            let mut store = MockDocumentStore::new();
            store.expect_get().returning(|_, _| Ok(None));
            store
                .expect_set()
                .returning(|_, _, _, _| Err(StoreError::Unavailable("offline".to_string())));
            let store: Arc<dyn DocumentStore> = Arc::new(store);
            let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuth::new(Arc::new(JsonFileStore::in_memory())));
            let mut app = App::with_collaborators(store, auth, regions(), TuiConfig::default());
            app.state.session = Some(Session {
                uid: "u1".to_string(),
                email: "asha@farm.in".to_string(),
                role: Some(Role::Farmer),
            });
            app.open_view(View::Wizard).await;
            fill_farmer(&mut app);
            app.state
                .wizard
                .as_mut()
                .unwrap()
                .wizard_mut()
                .form_mut()
                .step = STEPS;
            let before = app.state.wizard.as_ref().unwrap().wizard().to_record();

            press(&mut app, KeyCode::Enter).await;

            assert_eq!(app.state.current_view, View::Wizard);
            assert_eq!(
                app.state.current_error(),
                Some("Failed to save profile: storage unavailable: offline")
            );
            let wizard = app.state.wizard.as_ref().unwrap().wizard();
            assert!(!wizard.form().submitting);
            assert_eq!(wizard.to_record(), before);
        }

        #[tokio::test]
        async fn test_edit_profile_rehydrates() {
            let (mut app, _) = test_app();
            sign_up(&mut app, Role::Farmer).await;
            fill_farmer(&mut app);
            for _ in 0..3 {
                press(&mut app, KeyCode::Enter).await;
            }
            assert_eq!(app.state.current_view, View::Dashboard);

            press(&mut app, KeyCode::Char('e')).await;
            assert_eq!(app.state.current_view, View::Wizard);
            let form = app.state.wizard.as_ref().unwrap().wizard().form();
            assert_eq!(form.value("district"), "Ludhiana");
        }

        fn focus_photo(app: &mut App) {
            let form = app.state.wizard.as_mut().unwrap().wizard_mut().form_mut();
            form.step = STEPS;
            form.active_field = 3;
        }

        fn photo(app: &App) -> Option<String> {
            app.state
                .wizard
                .as_ref()
                .and_then(|w| w.wizard().form().field("profilePhotoUrl"))
                .and_then(|f| f.data_url().map(str::to_string))
        }

        fn clear_photo_path(app: &mut App) {
            let form = app.state.wizard.as_mut().unwrap().wizard_mut().form_mut();
            if let Some(field) = form.field_mut("profilePhotoUrl") {
                field.clear();
            }
        }

        fn image(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> String {
            let path = dir.path().join(name);
            std::fs::write(&path, bytes).unwrap();
            path.display().to_string()
        }

        #[tokio::test]
        async fn test_enter_attaches_photo_and_last_write_wins() {
            let dir = tempfile::tempdir().unwrap();
            let first = image(&dir, "first.png", &[0x89, b'P', b'N', b'G']);
            let second = image(&dir, "second.png", b"GIF8");

            let (mut app, store) = test_app();
            sign_up(&mut app, Role::Farmer).await;
            fill_farmer(&mut app);
            focus_photo(&mut app);

            type_str(&mut app, &first).await;
            press(&mut app, KeyCode::Enter).await;
            assert_eq!(photo(&app).as_deref(), Some("data:image/png;base64,iVBORw=="));
            assert_eq!(app.status_message.as_deref(), Some("Image attached"));
            assert_eq!(app.state.current_view, View::Wizard);

            clear_photo_path(&mut app);
            type_str(&mut app, &second).await;
            assert_eq!(photo(&app), None);
            press(&mut app, KeyCode::Enter).await;
            assert_eq!(photo(&app).as_deref(), Some("data:image/png;base64,R0lGOA=="));

            // With the payload in place Enter submits the wizard
            press(&mut app, KeyCode::Enter).await;
            assert_eq!(app.state.current_view, View::Dashboard);

            let uid = app.state.session.as_ref().unwrap().uid.clone();
            let farmer = store.get("farmers", &uid).await.unwrap().unwrap();
            assert_eq!(
                farmer.get("profilePhotoUrl"),
                Some(&json!("data:image/png;base64,R0lGOA=="))
            );
            let user = store.get("users", &uid).await.unwrap().unwrap();
            assert_eq!(
                user.get("profilePhotoUrl"),
                Some(&json!("data:image/png;base64,R0lGOA=="))
            );
        }

        #[tokio::test]
        async fn test_failed_attachment_keeps_earlier_payload() {
            let dir = tempfile::tempdir().unwrap();
            let first = image(&dir, "first.png", &[0x89, b'P', b'N', b'G']);
            let notes = image(&dir, "notes.txt", b"hello");

            let (mut app, _) = test_app();
            sign_up(&mut app, Role::Farmer).await;
            fill_farmer(&mut app);
            focus_photo(&mut app);
            type_str(&mut app, &first).await;
            press(&mut app, KeyCode::Enter).await;

            app.attach_media("profilePhotoUrl", &notes).await;
            assert_eq!(app.state.current_error(), Some("Please upload an image file"));
            assert_eq!(photo(&app).as_deref(), Some("data:image/png;base64,iVBORw=="));

            let missing = dir.path().join("missing.jpg").display().to_string();
            app.attach_media("profilePhotoUrl", &missing).await;
            assert_eq!(app.state.queued_errors(), 1);
            assert_eq!(photo(&app).as_deref(), Some("data:image/png;base64,iVBORw=="));
        }

        #[tokio::test]
        async fn test_failed_attachment_after_save_keeps_stored_photo() {
            let dir = tempfile::tempdir().unwrap();
            let first = image(&dir, "first.png", &[0x89, b'P', b'N', b'G']);
            let notes = image(&dir, "notes.txt", b"hello");

            let (mut app, store) = test_app();
            sign_up(&mut app, Role::Farmer).await;
            fill_farmer(&mut app);
            focus_photo(&mut app);
            type_str(&mut app, &first).await;
            press(&mut app, KeyCode::Enter).await;
            press(&mut app, KeyCode::Enter).await;
            assert_eq!(app.state.current_view, View::Dashboard);

            // Reopen the wizard and point the photo at a file that is not an image
            press(&mut app, KeyCode::Char('e')).await;
            focus_photo(&mut app);
            assert_eq!(photo(&app).as_deref(), Some("data:image/png;base64,iVBORw=="));
            clear_photo_path(&mut app);
            type_str(&mut app, &notes).await;
            press(&mut app, KeyCode::Enter).await;
            assert_eq!(app.state.current_error(), Some("Please upload an image file"));
            press(&mut app, KeyCode::Esc).await;

            app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
                .await
                .unwrap();
            assert_eq!(app.state.current_view, View::Dashboard);

            let uid = app.state.session.as_ref().unwrap().uid.clone();
            let farmer = store.get("farmers", &uid).await.unwrap().unwrap();
            assert_eq!(
                farmer.get("profilePhotoUrl"),
                Some(&json!("data:image/png;base64,iVBORw=="))
            );
        }
    }

    mod contact_screen {
        use super::*;
        use pretty_assertions::assert_eq;

        async fn fill_contact(app: &mut App) {
            press(app, KeyCode::F(5)).await;
            type_str(app, "Ravi").await;
            press(app, KeyCode::Tab).await;
            type_str(app, "ravi@fuels.in").await;
            press(app, KeyCode::Tab).await;
            type_str(app, "Need paddy straw").await;
        }

        #[tokio::test]
        async fn test_contact_success_resets_form() {
            let (mut app, store) = test_app();
            fill_contact(&mut app).await;
            press(&mut app, KeyCode::Enter).await;

            assert_eq!(app.status_message.as_deref(), Some(THANK_YOU));
            assert_eq!(app.state.contact_form.message.as_text(), "");
            assert_eq!(contact::list_messages(&*store).await.unwrap().len(), 1);

            press(&mut app, KeyCode::Esc).await;
            assert_eq!(app.state.current_view, View::Auth);
        }

        #[tokio::test]
        async fn test_contact_failure_keeps_form() {
            let mut store = MockDocumentStore::new();
            store
                .expect_add()
                .returning(|_, _| Err(StoreError::Unavailable("offline".to_string())));
            let store: Arc<dyn DocumentStore> = Arc::new(store);
            let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuth::new(store.clone()));
            let mut app = App::with_collaborators(store, auth, regions(), TuiConfig::default());

            fill_contact(&mut app).await;
            press(&mut app, KeyCode::Enter).await;
            assert!(app.state.has_errors());
            assert_eq!(
                app.state.contact_form.message.as_text(),
                "Need paddy straw"
            );
        }
    }

    mod admin_screen {
        use super::*;
        use pretty_assertions::assert_eq;

        async fn admin_app() -> (App, Arc<JsonFileStore>) {
            let (mut app, store) = test_app();
            let provider = LocalAuth::new(store.clone());
            provider
                .create_account("admin@gmail.com", "AdminPass1!")
                .await
                .unwrap();

            for (name, day) in [("Old", "2024-01-01T00:00:00Z"), ("New", "2024-02-01T00:00:00Z")] {
                let mut doc = Document::new();
                doc.insert("name".to_string(), json!(name));
                doc.insert("timestamp".to_string(), json!(day));
                doc.insert("status".to_string(), json!("unread"));
                store.add(contact::CONTACT_MESSAGES, doc).await.unwrap();
            }

            app.state.auth_form.email.clear();
            type_str(&mut app, "admin@gmail.com").await;
            press(&mut app, KeyCode::Tab).await;
            type_str(&mut app, "AdminPass1!").await;
            press(&mut app, KeyCode::Enter).await;
            (app, store)
        }

        #[tokio::test]
        async fn test_admin_lists_newest_first() {
            let (app, _) = admin_app().await;
            assert_eq!(app.state.current_view, View::Admin);
            let names: Vec<&str> = app.state.messages.iter().map(|m| m.name.as_str()).collect();
            assert_eq!(names, vec!["New", "Old"]);
        }

        #[tokio::test]
        async fn test_mark_read_then_delete_with_confirmation() {
            let (mut app, _) = admin_app().await;
            press(&mut app, KeyCode::Char('m')).await;
            assert!(!app.state.messages[0].is_unread());

            press(&mut app, KeyCode::Down).await;
            press(&mut app, KeyCode::Char('d')).await;
            assert!(app.state.confirm_delete.is_some());
            press(&mut app, KeyCode::Char('n')).await;
            assert_eq!(app.state.messages.len(), 2);

            press(&mut app, KeyCode::Char('d')).await;
            press(&mut app, KeyCode::Char('y')).await;
            assert_eq!(app.state.messages.len(), 1);
            assert_eq!(app.state.messages[0].name, "New");
            assert_eq!(app.state.selected_index, 0);
        }

        #[tokio::test]
        async fn test_logout_returns_to_login() {
            let (mut app, _) = admin_app().await;
            app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL))
                .await
                .unwrap();
            assert_eq!(app.state.current_view, View::Auth);
            assert!(app.state.session.is_none());
            assert!(app.state.messages.is_empty());
        }
    }

    #[test]
    fn test_start_resumes_existing_session() {
        let store = Arc::new(JsonFileStore::in_memory());
        let provider = Arc::new(LocalAuth::new(store.clone()));
        let mut app =
            App::with_collaborators(store.clone(), provider.clone(), regions(), TuiConfig::default());

        tokio_test::block_on(async {
            provider
                .create_account("admin@gmail.com", "AdminPass1!")
                .await
                .unwrap();
            app.start().await;
        });
        assert_eq!(app.state.current_view, View::Admin);
    }

    #[test]
    fn test_unavailable_regions_set_notice() {
        let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::in_memory());
        let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuth::new(store.clone()));
        let app = App::with_collaborators(
            store,
            auth,
            RegionData::Unavailable("Failed to load states data: missing".to_string()),
            TuiConfig::default(),
        );
        assert_eq!(
            app.state.region_notice.as_deref(),
            Some("Failed to load states data: missing")
        );
    }

    #[test]
    fn test_last_email_prefilled() {
        let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::in_memory());
        let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuth::new(store.clone()));
        let config = TuiConfig {
            last_email: Some("asha@farm.in".to_string()),
            default_role: Some("farmer".to_string()),
            ..Default::default()
        };
        let app = App::with_collaborators(store, auth, regions(), config);
        assert_eq!(app.state.auth_form.email.as_text(), "asha@farm.in");
        assert_eq!(app.state.auth_form.role, Role::Farmer);
    }
}
