//! Placeholder substitution for file templates.

use std::collections::HashMap;

use chrono::Datelike;

use crate::domain::ScaffoldOpts;

/// Variables available to templates as `{{NAME}}` placeholders.
///
/// | Variable | Example |
/// |----------|---------|
/// | `PROJECT_NAME` | "My Awesome App" |
/// | `PROJECT_NAME_SNAKE` | "my_awesome_app" |
/// | `PROJECT_NAME_KEBAB` | "my-awesome-app" |
/// | `PACKAGE` | "my_awesome_app" |
/// | `AUTHOR` | "Jane Doe" |
/// | `LICENSE` | "MIT" |
/// | `YEAR` | "2026" |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    variables: HashMap<String, String>,
}

impl RenderContext {
    /// Derive the naming variants of `project_name`.
    pub fn new(project_name: &str) -> Self {
        let mut variables = HashMap::new();
        variables.insert("PROJECT_NAME".to_string(), project_name.to_string());
        variables.insert("PROJECT_NAME_SNAKE".to_string(), to_snake_case(project_name));
        variables.insert("PROJECT_NAME_KEBAB".to_string(), to_kebab_case(project_name));
        variables.insert("YEAR".to_string(), chrono::Local::now().year().to_string());
        Self { variables }
    }

    /// Everything a built-in template can refer to.
    pub fn from_opts(opts: &ScaffoldOpts) -> Self {
        Self::new(&opts.name)
            .with_variable("PACKAGE", &opts.package)
            .with_variable("AUTHOR", &opts.author)
            .with_variable("LICENSE", &opts.license)
    }

    /// Add or override a variable.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace every known `{{VARIABLE}}`. Unknown placeholders stay as they are.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            result = result.replace(&format!("{{{{{key}}}}}"), value);
        }
        result
    }
}

pub(crate) fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Split on `_`, `-`, whitespace, dots and lower→upper case transitions.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        current.push(c);
        if c.is_lowercase() && chars.peek().is_some_and(|n| n.is_uppercase()) {
            words.push(current.to_lowercase());
            current.clear();
        }
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }
    words
}
