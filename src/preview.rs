use crate::{
    item::{TemplateFolder, TemplateItem},
    tree::{Change, Operation},
};
use colored::Colorize;

fn render_items(items: &[TemplateItem], prefix: &str, out: &mut String) {
    let len = items.len();

    for (i, item) in items.iter().enumerate() {
        let is_last = i == len - 1;

        let connector = if is_last {
            "└── ".yellow()
        } else {
            "├── ".yellow()
        };
        let name = match item {
            TemplateItem::File(file) => file.display_name().green(),
            TemplateItem::Folder(folder) => folder.folder_name.blue(),
        };
        out.push_str(&format!("{}{}{}\n", prefix.yellow(), connector, name));

        if let TemplateItem::Folder(folder) = item {
            let child_prefix = if is_last {
                format!("{}    ", prefix)
            } else {
                format!("{}│   ", prefix)
            };
            render_items(&folder.items, &child_prefix, out);
        }
    }
}

/// Renders `root` and everything below it with box-drawing connectors.
/// Folders are blue, files green.
pub fn render_tree(root: &TemplateFolder) -> String {
    let mut out = format!("{}\n", root.folder_name.bold().blue());

    render_items(&root.items, "", &mut out);

    out
}

/// One line per direct child; folders end with `/`.
pub fn render_listing(folder: &TemplateFolder) -> String {
    folder
        .items
        .iter()
        .map(|item| match item {
            TemplateItem::File(file) => format!("{}\n", file.display_name().green()),
            TemplateItem::Folder(folder) => format!("{}/\n", folder.folder_name.blue()),
        })
        .collect()
}

pub fn preview_as_tree(root: &TemplateFolder) {
    println!(
        "Legend: {} = (folder), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    let header = format!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Preview".bold().bright_blue(),
    );

    println!("{}", header);

    print!("{}", render_tree(root));

    println!("\n{}", "└─".bold().bright_blue());
}

/// One-line summary of a change, e.g. `renamed file 'a.ts' -> 'b.ts' in src`.
pub fn describe_change(change: &Change) -> String {
    let location = change.parent.label();

    match &change.operation {
        Operation::Added => format!("added {} in {}", change.node, location),
        Operation::Replaced => format!("replaced {} in {}", change.node, location),
        Operation::Deleted { removed } if *removed > 1 => format!(
            "deleted {} in {} ({} nodes)",
            change.node, location, removed
        ),
        Operation::Deleted { .. } => format!("deleted {} in {}", change.node, location),
        Operation::Renamed { from } => format!(
            "renamed {} -> '{}' in {}",
            from,
            change.node.name(),
            location
        ),
    }
}

pub fn print_change(change: &Change) {
    let verb = match change.operation {
        Operation::Deleted { .. } => "✔".red(),
        _ => "✔".green(),
    };

    println!("{} {}", verb, describe_change(change));
}
