//! Plain-text rendering of the view model for the terminal.

use super::{DashboardState, DashboardView, Navigation, Severity, UiMessage};

pub fn render_message(message: &UiMessage) -> String {
    match message.severity {
        _ if message.is_empty() => String::new(),
        Severity::None => message.text.clone(),
        Severity::Success => format!("[ok] {}", message.text),
        Severity::Error => format!("[error] {}", message.text),
    }
}

pub fn render_dashboard(view: &DashboardView) -> String {
    let mut lines = Vec::new();

    if view.state == DashboardState::Unauthenticated || view.is_terminal() {
        if !view.message.is_empty() {
            lines.push(render_message(&view.message));
        }
        lines.push("Not logged in. Run `dashgate login` first.".to_string());
        return lines.join("\n");
    }

    lines.push(format!("Hello, {}", view.greeting_name()));
    lines.push(format!(
        "  email:    {}",
        view.email.as_deref().unwrap_or("-")
    ));
    lines.push(format!("  age:      {}", view.age.as_deref().unwrap_or("-")));
    lines.push(format!(
        "  avatar:   {}",
        view.avatar_url.as_deref().unwrap_or("-")
    ));
    if let Some(updated) = view.last_updated {
        lines.push(format!(
            "  updated:  {}",
            updated.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    lines.push(format!("  progress: {}%", view.daily_progress));
    if view.state == DashboardState::Degraded {
        lines.push("  (showing cached values)".to_string());
    }
    if !view.message.is_empty() {
        lines.push(render_message(&view.message));
    }

    lines.join("\n")
}

pub fn render_navigation(navigation: Navigation) -> &'static str {
    match navigation {
        Navigation::Login => "Session ended, please log in again.",
        Navigation::Dashboard { .. } => "Opening dashboard...",
    }
}
