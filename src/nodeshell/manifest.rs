//! Pod manifest for node shells

const TEMPLATE: &str = include_str!("nodeshell.yaml");

/// Render the privileged shell pod bound to `node`
pub fn render(namespace: &str, name: &str, node: &str, image: &str) -> String {
    TEMPLATE
        .replace("{{name}}", name)
        .replace("{{namespace}}", namespace)
        .replace("{{node}}", node)
        .replace("{{image}}", image)
}
