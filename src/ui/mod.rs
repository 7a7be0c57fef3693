//! UI module for rendering the TUI

mod admin;
mod components;
mod dashboard;
mod forms;
mod layout;

use crate::app::App;
use crate::state::View;
use components::{render_confirm_dialog, render_error_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    // Draw main content based on current view
    match &app.state.current_view {
        View::Auth => forms::draw_auth(frame, main_area, app),
        View::Contact => forms::draw_contact(frame, main_area, app),
        View::Wizard => forms::draw_wizard(frame, main_area, app),
        View::Dashboard => dashboard::draw(frame, main_area, app),
        View::Admin => admin::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    // Overlays, error dialog on top
    if let Some(id) = &app.state.confirm_delete {
        if let Some(message) = app.state.messages.iter().find(|m| &m.id == id) {
            render_confirm_dialog(frame, message);
        }
    }
    if let Some(error) = app.state.current_error() {
        render_error_dialog(frame, error, app.state.queued_errors());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TuiConfig;
    use crate::regions::RegionData;
    use crate::store::{AuthProvider, DocumentStore, JsonFileStore, LocalAuth};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::in_memory());
        let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuth::new(store.clone()));
        App::with_collaborators(store, auth, RegionData::default(), TuiConfig::default())
    }

    #[test]
    fn test_login_screen_renders() {
        let screen = render(&app());
        assert!(screen.contains("AgriLink"));
        assert!(screen.contains("Manufacturer"));
        assert!(screen.contains("Login"));
    }

    #[test]
    fn test_error_dialog_overlays_view() {
        let mut app = app();
        app.push_error("Incorrect password");
        let screen = render(&app);
        assert!(screen.contains("Error"));
        assert!(screen.contains("Incorrect password"));
    }

    #[test]
    fn test_wizard_renders_free_text_regions_without_data() {
        let mut app = app();
        app.state.wizard = Some(crate::state::forms::WizardState::for_role(
            crate::state::Role::Farmer,
            &app.regions,
        ));
        app.state.wizard.as_mut().unwrap().wizard_mut().form_mut().step = 2;
        app.state.current_view = View::Wizard;
        let screen = render(&app);
        assert!(screen.contains("Step 2 of 3"));
        assert!(screen.contains("manually"));
    }
}
