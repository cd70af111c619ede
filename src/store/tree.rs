//! Navigation tree of prompts grouped by folder

use super::workspace::PromptEntry;

/// One row of the flattened tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub label: String,
    pub depth: usize,
    /// Index into the prompt list when this row is a template
    pub prompt: Option<usize>,
}

/// Group prompts by folder and flatten depth-first, keeping input order
pub fn build_tree(prompts: &[PromptEntry]) -> Vec<TreeItem> {
    let mut root = TreeNode::new("");
    for (index, prompt) in prompts.iter().enumerate() {
        let mut parts: Vec<&str> = prompt.folders.iter().map(String::as_str).collect();
        parts.push(&prompt.display_name);
        root.insert(&parts, index);
    }

    let mut items = Vec::new();
    root.flatten(0, &mut items);
    items
}

/// Indented listing, two spaces per level; folders end with `/`
pub fn format_tree(items: &[TreeItem]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&"  ".repeat(item.depth));
        out.push_str(&item.label);
        if item.prompt.is_none() {
            out.push('/');
        }
        out.push('\n');
    }
    out
}

#[derive(Debug)]
struct TreeNode {
    name: String,
    prompt: Option<usize>,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            prompt: None,
            children: Vec::new(),
        }
    }

    fn insert(&mut self, parts: &[&str], prompt: usize) {
        let Some((part, rest)) = parts.split_first() else {
            self.prompt = Some(prompt);
            return;
        };
        let index = match self.children.iter().position(|c| c.name == *part) {
            Some(index) => index,
            None => {
                self.children.push(TreeNode::new(part));
                self.children.len() - 1
            }
        };
        self.children[index].insert(rest, prompt);
    }

    fn flatten(&self, depth: usize, items: &mut Vec<TreeItem>) {
        for child in &self.children {
            items.push(TreeItem {
                label: child.name.clone(),
                depth,
                prompt: child.prompt,
            });
            child.flatten(depth + 1, items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn prompt(folders: &[&str], name: &str) -> PromptEntry {
        let mut parts: Vec<&str> = folders.to_vec();
        parts.push(name);
        PromptEntry {
            id: parts.join("/"),
            path: PathBuf::from(format!("{}.md", parts.join("/"))),
            display_name: name.to_string(),
            folders: folders.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_folders_are_shared() {
        let prompts = vec![
            prompt(&["stories"], "intro"),
            prompt(&["stories"], "outro"),
            prompt(&[], "scratch"),
        ];
        let items = build_tree(&prompts);
        let rows: Vec<(&str, usize, Option<usize>)> = items
            .iter()
            .map(|i| (i.label.as_str(), i.depth, i.prompt))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("stories", 0, None),
                ("intro", 1, Some(0)),
                ("outro", 1, Some(1)),
                ("scratch", 0, Some(2)),
            ]
        );
    }

    #[test]
    fn test_format_tree() {
        let prompts = vec![prompt(&["a", "b"], "deep"), prompt(&[], "top")];
        let listing = format_tree(&build_tree(&prompts));
        insta::assert_snapshot!(listing.trim_end(), @r"
        a/
          b/
            deep
        top
        ");
    }
}
