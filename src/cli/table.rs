use anyhow::Result;
use cli_table::{ColorChoice, Table, WithTitle, print_stdout};

use crate::asset::ResolutionResult;

#[derive(Table)]
struct UwpRow {
    #[table(title = "No.")]
    index: usize,
    #[table(title = "Name")]
    name: String,
    #[table(title = "Architecture")]
    arch: String,
    #[table(title = "Extension")]
    extension: String,
    #[table(title = "Modified")]
    modified: String,
}

#[derive(Table)]
struct ClassicRow {
    #[table(title = "No.")]
    index: usize,
    #[table(title = "Name")]
    name: String,
    #[table(title = "Architecture")]
    arch: String,
    #[table(title = "Extension")]
    extension: String,
    #[table(title = "Locale")]
    locale: String,
}

/// Print the resolved assets as a numbered table. The family decides
/// whether the last column shows the bundle timestamp or the installer
/// locale. Rows are numbered from 1, matching the selection prompt.
pub fn print_assets(result: &ResolutionResult) -> Result<()> {
    match result {
        ResolutionResult::Uwp(assets) => {
            let rows: Vec<UwpRow> = assets
                .iter()
                .enumerate()
                .map(|(i, a)| UwpRow {
                    index: i + 1,
                    name: a.name.clone(),
                    arch: a.arch.clone(),
                    extension: a.extension.clone(),
                    modified: a.modified.clone(),
                })
                .collect();
            print_stdout(rows.with_title().color_choice(ColorChoice::Never))?;
        }
        ResolutionResult::Classic(assets) => {
            let rows: Vec<ClassicRow> = assets
                .iter()
                .enumerate()
                .map(|(i, a)| ClassicRow {
                    index: i + 1,
                    name: a.name.clone(),
                    arch: a.arch.clone(),
                    extension: a.extension.clone(),
                    locale: a.locale.clone(),
                })
                .collect();
            print_stdout(rows.with_title().color_choice(ColorChoice::Never))?;
        }
    }
    Ok(())
}
