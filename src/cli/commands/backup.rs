use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use std::io::{self, Write};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let dest = expand_tilde(file);

        let target = if *compress {
            dest.with_extension("zip")
        } else {
            dest.clone()
        };
        if target.exists() && !*force {
            print!("⚠️  Backup file '{}' already exists. Overwrite? [y/N]: ", target.display());
            io::stdout().flush().ok();

            let mut answer = String::new();
            io::stdin().read_line(&mut answer)?;
            let ans = answer.trim().to_ascii_lowercase();
            if ans != "y" && ans != "yes" {
                return Err(AppError::Other("Backup cancelled".to_string()));
            }
        }

        let pool = DbPool::new(&cfg.database)?;
        BackupLogic::backup(&pool, &cfg.database, &dest, *compress)?;
    }

    Ok(())
}
