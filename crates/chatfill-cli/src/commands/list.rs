use super::Context;
use anyhow::Result;
use chatfill_core::session::EntityRef;
use chatfill_infrastructure::FileSessionStore;
use colored::Colorize;

pub fn run(ctx: &Context, entity: &EntityRef) -> Result<()> {
    let store = FileSessionStore::new(ctx.sessions_dir()?)?;
    let sessions = store.list_sessions(entity)?;

    if sessions.is_empty() {
        println!("No chats stored for {}", entity);
        return Ok(());
    }

    println!("{}", format!("Chats for {}:", entity).bold());
    for session in sessions {
        println!(
            "  {}  {:>4} msg  {}  {}",
            session.id.cyan(),
            session.message_count,
            session.updated_at.dimmed(),
            session.title
        );
    }
    Ok(())
}
