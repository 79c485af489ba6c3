use chatfill_core::duplicate::{Notification, NotificationLevel};
use colored::Colorize;

/// Renders a duplication summary on stdout.
pub fn print_notification(notification: Notification) {
    println!("{}", render(&notification));
}

fn render(notification: &Notification) -> String {
    let (icon, message) = match notification.level {
        NotificationLevel::Success => ("✅".normal(), notification.message.green()),
        NotificationLevel::Info => ("ℹ️".normal(), notification.message.normal()),
        NotificationLevel::Warning => ("⚠️".normal(), notification.message.yellow()),
        NotificationLevel::Error => ("❌".normal(), notification.message.red()),
    };
    format!("{} {}", icon, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_message_text() {
        colored::control::set_override(false);
        let rendered = render(&Notification {
            level: NotificationLevel::Warning,
            message: "Select a character or group first.".to_string(),
        });
        assert_eq!(rendered, "⚠️ Select a character or group first.");
    }
}
