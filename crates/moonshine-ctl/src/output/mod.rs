//! Terminal output for `moonshine-ctl`.
//!
//! Everything goes through `anstream`, which drops the styles when the
//! stream is not a terminal. Each printer has a `write_*` twin taking any
//! writer.

mod styles;

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

use moonshine_sdk::project::BuildReport;

pub(crate) use styles::clap_styles;

use styles::{CREATED, FAILED, GUIDE, NOTICE, SECTION};

const PROVIDER_HINT: &str = "Add the resources to the MoonShine service provider:";
const MENU_HINT: &str = "Add the menu items to the MoonShine layout:";

pub(crate) fn error(msg: impl Display) {
    writeln!(anstream::stderr().lock(), "{FAILED}✗ {msg}{FAILED:#}").ok();
}

pub(crate) fn warning(msg: impl Display) {
    writeln!(anstream::stdout().lock(), "{NOTICE}! {msg}{NOTICE:#}").ok();
}

/// Question awaiting an answer on the same line.
pub(crate) fn ask(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    write!(out, "{NOTICE}? {msg}{NOTICE:#} ").ok();
    out.flush().ok();
}

pub(crate) fn created(path: &Path) {
    write_created(&mut anstream::stdout().lock(), path).ok();
}

/// Bold title followed by one bullet per item.
pub(crate) fn listing<T: Display>(title: impl Display, items: impl IntoIterator<Item = T>) {
    write_listing(&mut anstream::stdout().lock(), title, items).ok();
}

/// Blank line, dimmed title, then the commands to run.
pub(crate) fn next_steps<T: Display>(title: &str, commands: impl IntoIterator<Item = T>) {
    write_next_steps(&mut anstream::stdout().lock(), title, commands).ok();
}

pub(crate) fn report(report: &BuildReport) {
    write_report(&mut anstream::stdout().lock(), report).ok();
}

fn write_created(out: &mut impl Write, path: &Path) -> io::Result<()> {
    writeln!(out, "{CREATED}✓ {} was created successfully!{CREATED:#}", path.display())
}

fn write_skipped(out: &mut impl Write, path: &Path) -> io::Result<()> {
    writeln!(out, "{NOTICE}! {} was skipped{NOTICE:#}", path.display())
}

fn write_listing<T: Display>(
    out: &mut impl Write,
    title: impl Display,
    items: impl IntoIterator<Item = T>,
) -> io::Result<()> {
    writeln!(out, "{SECTION}{title}{SECTION:#}")?;
    for item in items {
        writeln!(out, "  • {item}")?;
    }
    writeln!(out)
}

fn write_next_steps<T: Display>(
    out: &mut impl Write,
    title: &str,
    commands: impl IntoIterator<Item = T>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{GUIDE}{title}{GUIDE:#}")?;
    for command in commands {
        writeln!(out, "  {command}")?;
    }
    Ok(())
}

fn write_registration(out: &mut impl Write, hint: &str, lines: &[String]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{GUIDE}{hint}{GUIDE:#}")?;
    for line in lines {
        writeln!(out, "    {line}")?;
    }
    Ok(())
}

/// Created and skipped files, then the lines to paste into the service
/// provider and layout when any resource was built.
fn write_report(out: &mut impl Write, report: &BuildReport) -> io::Result<()> {
    for path in &report.created {
        write_created(out, path)?;
    }
    for path in &report.skipped {
        write_skipped(out, path)?;
    }

    if !report.resources.is_empty() {
        write_registration(out, PROVIDER_HINT, &report.resources)?;
        write_registration(out, MENU_HINT, &report.menu_items)?;
    }

    writeln!(out)?;
    writeln!(out, "{CREATED}✓ All done{CREATED:#}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn plain_text(bytes: Vec<u8>) -> String {
        let text = String::from_utf8(bytes).unwrap();
        anstream::adapter::strip_str(&text).to_string()
    }

    #[test]
    fn test_report_with_resources() {
        let report = BuildReport {
            created: vec![PathBuf::from("app/Models/Task.php")],
            skipped: vec![PathBuf::from("app/Models/Tag.php")],
            resources: vec!["TaskResource::class,".to_string()],
            menu_items: vec!["MenuItem::make('Tasks', TaskResource::class),".to_string()],
        };
        let mut out = Vec::new();
        write_report(&mut out, &report).unwrap();

        assert_eq!(
            plain_text(out),
            "✓ app/Models/Task.php was created successfully!\n\
             ! app/Models/Tag.php was skipped\n\
             \n\
             Add the resources to the MoonShine service provider:\n    \
             TaskResource::class,\n\
             \n\
             Add the menu items to the MoonShine layout:\n    \
             MenuItem::make('Tasks', TaskResource::class),\n\
             \n\
             ✓ All done\n"
        );
    }

    #[test]
    fn test_report_without_resources_has_no_hints() {
        let report = BuildReport {
            created: vec![PathBuf::from("database/migrations/2024_06_01_100000_create_tasks.php")],
            ..BuildReport::default()
        };
        let mut out = Vec::new();
        write_report(&mut out, &report).unwrap();

        let text = plain_text(out);
        assert!(!text.contains(PROVIDER_HINT));
        assert!(!text.contains(MENU_HINT));
        assert!(text.ends_with("create_tasks.php was created successfully!\n\n✓ All done\n"));
    }

    #[test]
    fn test_listing_and_next_steps() {
        let mut out = Vec::new();
        write_listing(&mut out, "Available build files in builds:", ["shop.json", "todo.json"])
            .unwrap();
        write_next_steps(&mut out, "To generate resources from it, run:", ["moonshine-ctl build a.json"])
            .unwrap();

        assert_eq!(
            plain_text(out),
            "Available build files in builds:\n  • shop.json\n  • todo.json\n\n\
             \n\
             To generate resources from it, run:\n  moonshine-ctl build a.json\n"
        );
    }
}
