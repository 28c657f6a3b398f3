//! Text views of the command tree and the variable list
//!
//! These map core data to printable lines. Colors are only emitted when asked for, so the
//! same functions back both the terminal output and the tests.

use anstyle::{Reset, Style};

use crate::commands::command::CommandDefinition;
use crate::commands::group::GroupNode;
use crate::settings::Settings;
use crate::sort::order;
use crate::state::ExpandedState;
use crate::theme;
use crate::variables::VariableDefinition;
use crate::variables::resolve::referenced_names;

/// Which groups of the tree are shown open
#[derive(Debug, Clone, Copy)]
pub enum Expansion<'a> {
    All,
    Persisted(&'a ExpandedState),
}

impl Expansion<'_> {
    fn is_expanded(&self, path: &str) -> bool {
        match self {
            Expansion::All => true,
            Expansion::Persisted(state) => state.is_expanded(path),
        }
    }
}

fn paint(text: &str, style: Style, color: bool) -> String {
    if color && style != Style::new() {
        format!("{style}{text}{Reset}")
    } else {
        text.to_string()
    }
}

struct TreeRenderer<'a> {
    expansion: Expansion<'a>,
    icon_color: &'a str,
    color: bool,
    lines: Vec<String>,
}

impl TreeRenderer<'_> {
    fn group(&mut self, group: &GroupNode, depth: usize) {
        let indent = "  ".repeat(depth);
        let expanded = self.expansion.is_expanded(&group.path);
        let marker = if expanded { '▾' } else { '▸' };
        let count = paint(
            &format!("({})", group.command_count()),
            Style::new().fg_color(Some(theme::DIM)),
            self.color,
        );
        self.lines.push(format!(
            "{indent}{marker} {} {count}",
            paint(&group.label, Style::new().bold(), self.color)
        ));
        if !expanded {
            return;
        }
        for child in &group.groups {
            self.group(child, depth + 1);
        }
        for command in &group.commands {
            self.command(command, depth + 1);
        }
    }

    fn command(&mut self, command: &CommandDefinition, depth: usize) {
        let indent = "  ".repeat(depth);
        let color_id = command
            .icon_color
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(self.icon_color);
        let bullet_style = Style::new().fg_color(theme::theme_color(color_id));
        let mut line = format!(
            "{indent}{} {}",
            paint("•", bullet_style, self.color),
            command.title
        );
        if let Some(description) = command.description.as_deref().filter(|d| !d.is_empty()) {
            line.push_str("  ");
            line.push_str(&paint(
                description,
                Style::new().fg_color(Some(theme::DIM)),
                self.color,
            ));
        }
        self.lines.push(line);
    }
}

/// Render the command tree, one line per visible group or command. The root is not shown.
#[must_use]
pub fn render_tree(
    root: &GroupNode,
    expansion: Expansion<'_>,
    icon_color: &str,
    color: bool,
) -> Vec<String> {
    let mut renderer = TreeRenderer {
        expansion,
        icon_color,
        color,
        lines: Vec::new(),
    };
    for group in &root.groups {
        renderer.group(group, 0);
    }
    for command in &root.commands {
        renderer.command(command, 0);
    }
    renderer.lines
}

fn variable_line(variable: &VariableDefinition, uses: usize, color: bool) -> String {
    let name = paint(&variable.name, Style::new().bold(), color);
    let mut line = match variable.choices() {
        Some(options) => format!(
            "{name} ∈ [{}] (default: {})",
            options.join(", "),
            variable.value
        ),
        None => format!("{name} = {}", variable.value),
    };
    let dim = Style::new().fg_color(Some(theme::DIM));
    if let Some(description) = variable.description.as_deref().filter(|d| !d.is_empty()) {
        line.push_str("  ");
        line.push_str(&paint(description, dim, color));
    }
    if uses > 0 {
        let plural = if uses == 1 { "" } else { "s" };
        line.push_str("  ");
        line.push_str(&paint(&format!("(used by {uses} command{plural})"), dim, color));
    }
    line
}

/// Render the variable list in the configured sort order
#[must_use]
pub fn render_variables(settings: &Settings, color: bool) -> Vec<String> {
    let variables: Vec<&VariableDefinition> = order(
        settings.variables.iter().collect(),
        |v| v.name.as_str(),
        settings.sort_order,
    );
    variables
        .into_iter()
        .map(|variable| {
            let uses = settings
                .commands
                .iter()
                .filter(|c| referenced_names(&c.command).contains(&variable.name.as_str()))
                .count();
            variable_line(variable, uses, color)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::group::build;
    use crate::sort::SortOrder;

    fn sample_commands() -> Vec<CommandDefinition> {
        let mut deploy =
            CommandDefinition::new("deploy", "./deploy ${env}").with_group("Ops/Deploy");
        deploy.description = Some("Ship it".to_string());
        vec![
            deploy,
            CommandDefinition::new("logs", "tail -f log").with_group("Ops"),
            CommandDefinition::new("ls", "ls -la"),
        ]
    }

    #[test]
    fn test_render_tree_all_expanded() {
        let root = build(&sample_commands(), SortOrder::Settings);
        let lines = render_tree(&root, Expansion::All, "", false);
        insta::assert_snapshot!(lines.join("\n"), @r"
        ▾ Ops (2)
          ▾ Deploy (1)
            • deploy  Ship it
          • logs
        ▾ Ungrouped (1)
          • ls
        ");
    }

    #[test]
    fn test_render_tree_respects_persisted_state() {
        let root = build(&sample_commands(), SortOrder::Settings);
        let mut state = ExpandedState::default();
        state.expand("Ops");
        let lines = render_tree(&root, Expansion::Persisted(&state), "", false);
        assert_eq!(
            lines,
            vec!["▾ Ops (2)", "  ▸ Deploy (1)", "  • logs", "▸ Ungrouped (1)"]
        );
    }

    #[test]
    fn test_render_tree_colors_bullets() {
        let root = build(&sample_commands(), SortOrder::Settings);
        let lines = render_tree(&root, Expansion::All, "terminal.ansiGreen", true);
        assert!(lines.iter().any(|l| l.contains("\x1b[32m•")));
    }

    #[test]
    fn test_render_variables() {
        let mut env = VariableDefinition::selectable("env", ["dev", "prod"]);
        env.description = Some("Target".to_string());
        let settings = Settings {
            sort_order: SortOrder::Alphabetical,
            variables: vec![VariableDefinition::fixed("host", "localhost"), env],
            commands: sample_commands(),
            ..Default::default()
        };
        let lines = render_variables(&settings, false);
        assert_eq!(
            lines,
            vec![
                "env ∈ [dev, prod] (default: dev)  Target  (used by 1 command)",
                "host = localhost",
            ]
        );
    }
}
