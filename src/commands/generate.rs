//! Config document commands: print and diff.

use crate::Context;
use crate::confgen;
use crate::declaration::Declaration;
use crate::ui;
use anyhow::Result;
use colored::Colorize;
use similar::{ChangeTag, TextDiff};

/// Print the document that an install would write.
pub fn generate(_ctx: &Context, declaration: &Declaration) -> Result<()> {
    let settings = declaration.settings()?;
    let document = confgen::generate(&settings);
    print!("{}", confgen::render(&document)?);
    Ok(())
}

/// Show a unified diff between the on-disk config file and the generated one.
pub fn diff(ctx: &Context, declaration: &Declaration) -> Result<()> {
    let settings = declaration.settings()?;
    let generated = confgen::render(&confgen::generate(&settings))?;
    let on_disk = match std::fs::read_to_string(&declaration.config_path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    if on_disk == generated {
        if !ctx.quiet {
            ui::success(&format!(
                "{} is up to date",
                declaration.config_path.display()
            ));
        }
        return Ok(());
    }

    let text_diff = TextDiff::from_lines(&on_disk, &generated);
    for change in text_diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => print!("{}", format!("-{change}").red()),
            ChangeTag::Insert => print!("{}", format!("+{change}").green()),
            ChangeTag::Equal => print!(" {change}"),
        }
    }
    Ok(())
}
