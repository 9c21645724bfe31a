use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        what,
        format,
        file,
        range,
        force,
    } = cmd
    {
        let pool = DbPool::open_migrated(&cfg.database)?;
        ExportLogic::export(&pool, *what, *format, file, range.as_deref(), *force)?;
    }
    Ok(())
}
