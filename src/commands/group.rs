use crate::commands::command::CommandDefinition;
use crate::sort::{SortOrder, order};

/// Group used for commands without a (non-blank) group path
pub const UNGROUPED: &str = "Ungrouped";

/// A node of the command tree
///
/// The root node has an empty label and path and is never displayed itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupNode {
    pub label: String,
    /// Full slash joined path from the root, e.g. `Ops/Deploy`
    pub path: String,
    pub groups: Vec<GroupNode>,
    pub commands: Vec<CommandDefinition>,
}

impl GroupNode {
    fn child(label: &str, parent_path: &str) -> Self {
        let path = if parent_path.is_empty() {
            label.to_string()
        } else {
            format!("{parent_path}/{label}")
        };
        Self {
            label: label.to_string(),
            path,
            ..Default::default()
        }
    }

    /// Returns the child group with `label`, creating it at the end if missing
    fn child_mut(&mut self, label: &str) -> &mut GroupNode {
        let index = match self.groups.iter().position(|g| g.label == label) {
            Some(index) => index,
            None => {
                let node = GroupNode::child(label, &self.path);
                self.groups.push(node);
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    fn sort(&mut self, mode: SortOrder) {
        self.groups = order(std::mem::take(&mut self.groups), |g| g.label.as_str(), mode);
        self.commands = order(std::mem::take(&mut self.commands), |c| c.title.as_str(), mode);
        for group in &mut self.groups {
            group.sort(mode);
        }
    }

    /// Returns all commands below this node, depth first with child groups before own commands
    #[must_use]
    pub fn all_commands(&self) -> Vec<(&GroupNode, &CommandDefinition)> {
        let mut result = Vec::new();
        for group in &self.groups {
            result.extend(group.all_commands());
        }
        result.extend(self.commands.iter().map(|c| (self, c)));
        result
    }

    /// Number of commands in this node and all of its descendants
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len() + self.groups.iter().map(GroupNode::command_count).sum::<usize>()
    }
}

/// Split a raw group path into its display segments.
///
/// Segments are trimmed and empty ones dropped; a blank or missing path yields
/// `["Ungrouped"]`.
#[must_use]
pub fn group_segments(group: Option<&str>) -> Vec<&str> {
    let segments: Vec<&str> = group
        .unwrap_or_default()
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        vec![UNGROUPED]
    } else {
        segments
    }
}

/// Build the command tree from the flat command list.
///
/// With `SortOrder::Settings` groups and commands appear in the order they are first
/// encountered. With `SortOrder::Alphabetical` every level is sorted, groups by label and
/// commands by title.
#[must_use]
pub fn build(commands: &[CommandDefinition], mode: SortOrder) -> GroupNode {
    let mut root = GroupNode::default();
    for command in commands {
        let mut node = &mut root;
        for segment in group_segments(command.group.as_deref()) {
            node = node.child_mut(segment);
        }
        node.commands.push(command.clone());
    }
    root.sort(mode);
    root
}

/// Find the node at `path`, following labels from the root. An empty path is the root.
#[must_use]
pub fn find_node<'a>(root: &'a GroupNode, path: &str) -> Option<&'a GroupNode> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .try_fold(root, |node, segment| {
            node.groups.iter().find(|g| g.label == segment)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cmd(title: &str, group: &str) -> CommandDefinition {
        CommandDefinition::new(title, format!("echo {title}")).with_group(group)
    }

    fn labels(nodes: &[GroupNode]) -> Vec<&str> {
        nodes.iter().map(|g| g.label.as_str()).collect()
    }

    fn titles(node: &GroupNode) -> Vec<&str> {
        node.commands.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_declared_order_example() {
        let commands = vec![
            make_cmd("B", "Ops/X"),
            make_cmd("A", "Ops/Y"),
            make_cmd("C", ""),
        ];
        let root = build(&commands, SortOrder::Settings);
        assert_eq!(labels(&root.groups), vec!["Ops", UNGROUPED]);
        assert_eq!(labels(&root.groups[0].groups), vec!["X", "Y"]);
        assert_eq!(titles(&root.groups[1]), vec!["C"]);
        assert!(root.label.is_empty());
        assert!(root.path.is_empty());
    }

    #[test]
    fn test_path_normalisation() {
        assert_eq!(group_segments(Some("Ops//Deploy/")), vec!["Ops", "Deploy"]);
        assert_eq!(group_segments(Some(" Ops / Deploy ")), vec!["Ops", "Deploy"]);
        assert_eq!(group_segments(Some(" / / ")), vec![UNGROUPED]);
        assert_eq!(group_segments(None), vec![UNGROUPED]);

        let root = build(&[make_cmd("deploy", "Ops//Deploy/")], SortOrder::Settings);
        let node = find_node(&root, "Ops/Deploy").unwrap();
        assert_eq!(node.path, "Ops/Deploy");
        assert_eq!(titles(node), vec!["deploy"]);
    }

    #[test]
    fn test_missing_group_goes_to_ungrouped() {
        let root = build(&[CommandDefinition::new("ls", "ls -la")], SortOrder::Settings);
        assert_eq!(labels(&root.groups), vec![UNGROUPED]);
        assert_eq!(root.groups[0].path, UNGROUPED);
        assert!(root.commands.is_empty());
    }

    #[test]
    fn test_labels_match_case_sensitively() {
        let root = build(
            &[make_cmd("a", "ops"), make_cmd("b", "Ops")],
            SortOrder::Settings,
        );
        assert_eq!(labels(&root.groups), vec!["ops", "Ops"]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let commands = vec![
            make_cmd("z", "B/C"),
            make_cmd("y", "A"),
            make_cmd("x", "B"),
            make_cmd("w", "B/C"),
        ];
        let first = build(&commands, SortOrder::Settings);
        let second = build(&commands, SortOrder::Settings);
        assert_eq!(first, second);
        assert_eq!(labels(&first.groups), vec!["B", "A"]);
        assert_eq!(titles(find_node(&first, "B/C").unwrap()), vec!["z", "w"]);
    }

    #[test]
    fn test_alphabetical_sorts_every_level() {
        let commands = vec![
            make_cmd("zeta", "ops/web"),
            make_cmd("Alpha", "ops/db"),
            make_cmd("beta", "ops/web"),
            make_cmd("gamma", "Build"),
        ];
        let root = build(&commands, SortOrder::Alphabetical);
        assert_eq!(labels(&root.groups), vec!["Build", "ops"]);
        let ops = find_node(&root, "ops").unwrap();
        assert_eq!(labels(&ops.groups), vec!["db", "web"]);
        assert_eq!(titles(find_node(&root, "ops/web").unwrap()), vec!["beta", "zeta"]);
    }

    #[test]
    fn test_alphabetical_keeps_ties_in_input_order() {
        let mut first = make_cmd("same", "g");
        first.command = "echo 1".to_string();
        let mut second = make_cmd("same", "g");
        second.command = "echo 2".to_string();
        let root = build(&[first, second], SortOrder::Alphabetical);
        let commands = &find_node(&root, "g").unwrap().commands;
        assert_eq!(commands[0].command, "echo 1");
        assert_eq!(commands[1].command, "echo 2");
    }

    #[test]
    fn test_find_node() {
        let root = build(&[make_cmd("a", "One/Two")], SortOrder::Settings);
        assert_eq!(find_node(&root, ""), Some(&root));
        assert_eq!(find_node(&root, "One").unwrap().label, "One");
        assert!(find_node(&root, "One/Three").is_none());
        assert!(find_node(&root, "one").is_none());
    }

    #[test]
    fn test_all_commands_and_count() {
        let commands = vec![
            make_cmd("top", "A"),
            make_cmd("nested", "A/B"),
            make_cmd("other", "C"),
        ];
        let root = build(&commands, SortOrder::Settings);
        let flat: Vec<&str> = root
            .all_commands()
            .iter()
            .map(|(_, c)| c.title.as_str())
            .collect();
        assert_eq!(flat, vec!["nested", "top", "other"]);
        assert_eq!(root.command_count(), 3);
        assert_eq!(find_node(&root, "A").unwrap().command_count(), 2);
    }
}
