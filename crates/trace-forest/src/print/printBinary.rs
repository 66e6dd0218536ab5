/// Renders one subtree given the indentation for its own children.
pub type PrintChild<'a> = dyn Fn(&str) -> String + 'a;

fn render(child: Option<&PrintChild<'_>>, tab: &str) -> String {
    match child {
        Some(f) => f(tab),
        None => "∅".to_string(),
    }
}

/// Prints the left and right children of a binary node, one per line.
///
/// A missing child is drawn as `∅` when its sibling exists; a node with no
/// children prints nothing.
pub fn print_binary(tab: &str, left: Option<&PrintChild<'_>>, right: Option<&PrintChild<'_>>) -> String {
    if left.is_none() && right.is_none() {
        return String::new();
    }

    let child_tab = format!("{tab}  ");
    format!(
        "\n{tab}← {}\n{tab}→ {}",
        render(left, &child_tab),
        render(right, &child_tab)
    )
}
