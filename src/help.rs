//! A minimal usage/help renderer (C10), grounded in
//! `argh_shared::write_description`'s column-aligned listing style. This
//! is pure formatting over already-compiled node metadata; it never
//! participates in analysis.

use crate::command::Alconna;
use crate::node::Node;

const NAME_COLUMN: usize = 18;

fn write_row(out: &mut String, names: &str, help: &str) {
    out.push_str("  ");
    out.push_str(names);
    if !help.is_empty() {
        if names.len() + 2 < NAME_COLUMN {
            out.push_str(&" ".repeat(NAME_COLUMN - names.len() - 2));
        } else {
            out.push(' ');
        }
        out.push_str(help);
    }
    out.push('\n');
}

/// `Usage: <headers> <command> [options] <main args>`
pub fn render_usage(command: &Alconna) -> String {
    let headers: Vec<String> = command.headers.iter().map(|h| h.literal()).collect();
    let head = if headers.len() == 1 {
        headers[0].clone()
    } else {
        format!("[{}]", headers.join("|"))
    };
    let mut usage = format!("Usage: {head}");
    if !command.options.is_empty() {
        usage.push_str(" [options]");
    }
    for slot in command.main_args.slots() {
        if slot.is_filler() {
            continue;
        }
        usage.push(' ');
        usage.push_str(&format!("<{}>", slot.name));
    }
    usage
}

/// The full help text: usage line, description, and `Options:`/
/// `Commands:` blocks.
pub fn render_help(command: &Alconna) -> String {
    let mut out = String::new();
    out.push_str(&render_usage(command));
    out.push('\n');
    if !command.meta.description.is_empty() {
        out.push('\n');
        out.push_str(&command.meta.description);
        out.push('\n');
    }

    let mut option_rows = Vec::new();
    let mut command_rows = Vec::new();
    for node in &command.options {
        let base = node.base();
        let names: Vec<&str> = base.aliases.iter().map(String::as_str).collect();
        let row = (names.join(", "), base.help_text.clone().unwrap_or_default());
        match node {
            Node::Option(_) => option_rows.push(row),
            Node::Subcommand(_) => command_rows.push(row),
        }
    }

    if !option_rows.is_empty() {
        out.push_str("\nOptions:\n");
        for (names, help) in &option_rows {
            write_row(&mut out, names, help);
        }
    }
    if !command_rows.is_empty() {
        out.push_str("\nCommands:\n");
        for (names, help) in &command_rows {
            write_row(&mut out, names, help);
        }
    }
    out
}
