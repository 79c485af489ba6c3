use super::Context;
use anyhow::Result;

pub fn path(ctx: &Context) {
    println!("{}", ctx.config_service.path().display());
}

pub fn show(ctx: &Context) -> Result<()> {
    print!("{}", toml::to_string_pretty(&ctx.config()?)?);
    println!("# sessions directory: {}", ctx.sessions_dir()?.display());
    Ok(())
}
